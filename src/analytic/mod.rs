pub mod frame;
pub mod kernel;
pub mod metrics;
pub mod pipeline;
pub mod ring;
pub mod sink;
pub mod spectral;

pub use frame::{OutputFrame, ScopeVertex};
pub use pipeline::ScopePipeline;
pub use sink::OutputSink;
