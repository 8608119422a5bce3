use rustfft::num_complex::Complex;
use std::sync::Arc;

use super::frame::OutputFrame;
use super::kernel::{self, support_length};
use super::ring::TimeRingBuffer;
use super::sink::OutputSink;
use super::spectral::SpectralProcessor;
use crate::config::AnalysisSettings;
use crate::error::Result;

/// Producer side of the scope: ring buffer, spectral processor and the sink
/// it publishes into.
pub struct ScopePipeline {
    ring: TimeRingBuffer,
    processor: SpectralProcessor,
    sink: Arc<OutputSink>,
    cycles: u64,
}

impl ScopePipeline {
    pub fn new(settings: &AnalysisSettings) -> Result<Self> {
        settings.validate()?;

        let n = support_length(settings.fft_size);
        let kernel = kernel::build(n, settings.fft_size)?;
        let processor = SpectralProcessor::new(kernel, settings)?;
        let ring = TimeRingBuffer::new(settings.fft_size, settings.buffer_size, settings.gain)?;
        let sink = Arc::new(OutputSink::new(settings.buffer_size));

        log::info!(
            "Analytic pipeline: fft_size={}, buffer_size={}, support={}, gain={:.2}, sample_rate={}Hz",
            settings.fft_size,
            settings.buffer_size,
            n,
            settings.gain,
            settings.sample_rate
        );

        Ok(Self {
            ring,
            processor,
            sink,
            cycles: 0,
        })
    }

    /// Write one chunk, filter the current window and publish the result.
    pub fn push_chunk(&mut self, samples: &[f32]) -> Result<Arc<OutputFrame>> {
        self.ring.write(samples)?;
        let frame = self.processor.process(self.ring.window())?;
        self.cycles += 1;
        log::debug!(
            "Cycle {}: cursor={}, frame sequence={}",
            self.cycles,
            self.ring.cursor(),
            frame.sequence
        );
        Ok(self.sink.publish(frame))
    }

    /// Handle for the render side.
    pub fn sink(&self) -> Arc<OutputSink> {
        Arc::clone(&self.sink)
    }

    pub fn kernel(&self) -> &[Complex<f32>] {
        self.processor.kernel()
    }

    pub fn window(&self) -> &[Complex<f32>] {
        self.ring.window()
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }
}
