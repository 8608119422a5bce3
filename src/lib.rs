//! Real-time analytic signal (Hilbert transform) pipeline for an audio
//! oscilloscope display.
//!
//! A producer pushes fixed-size chunks of mono samples into a
//! [`ScopePipeline`]; each chunk is filtered against a frequency-domain
//! Hilbert kernel and the resulting trace is published to an [`OutputSink`]
//! that a render loop can read at its own cadence.

pub mod analytic;
pub mod audio;
pub mod config;
pub mod encode;
pub mod error;

pub use analytic::{OutputFrame, OutputSink, ScopePipeline, ScopeVertex};
pub use config::AnalysisSettings;
pub use error::{Result, ScopeError};
