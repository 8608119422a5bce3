use thiserror::Error;

/// Errors raised by the analytic pipeline.
#[derive(Debug, Error)]
pub enum ScopeError {
    /// Invalid sizes or parameters, rejected when the pipeline is built.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The Hilbert kernel support length cannot produce a usable filter.
    #[error("invalid kernel support: {0}")]
    Kernel(String),

    /// A chunk handed to the ring buffer does not match `buffer_size`.
    #[error("chunk has {actual} samples, expected {expected}")]
    ChunkLength { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, ScopeError>;
