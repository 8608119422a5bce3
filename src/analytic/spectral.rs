use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

use super::frame::{OutputFrame, ScopeVertex};
use super::kernel::AnalyticKernel;
use super::metrics::PhaseTracker;
use crate::config::AnalysisSettings;
use crate::error::{Result, ScopeError};

/// Applies the analytic kernel to a time window by FFT convolution.
pub struct SpectralProcessor {
    kernel: AnalyticKernel,
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
    spectrum: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    fft_size: usize,
    buffer_size: usize,
    tracker: PhaseTracker,
    sequence: u64,
}

impl SpectralProcessor {
    pub fn new(kernel: AnalyticKernel, settings: &AnalysisSettings) -> Result<Self> {
        let fft_size = settings.fft_size;
        let buffer_size = settings.buffer_size;
        if fft_size == 0 || buffer_size == 0 || buffer_size > fft_size {
            return Err(ScopeError::Config(format!(
                "cannot keep {} of {} filtered samples",
                buffer_size, fft_size
            )));
        }
        if kernel.len() != fft_size {
            return Err(ScopeError::Config(format!(
                "kernel has {} bins, window has {}",
                kernel.len(),
                fft_size
            )));
        }

        let mut planner = FftPlanner::<f32>::new();
        let forward = planner.plan_fft_forward(fft_size);
        let inverse = planner.plan_fft_inverse(fft_size);
        let scratch_len = forward
            .get_inplace_scratch_len()
            .max(inverse.get_inplace_scratch_len());

        Ok(Self {
            kernel,
            forward,
            inverse,
            spectrum: vec![Complex::new(0.0, 0.0); fft_size],
            scratch: vec![Complex::new(0.0, 0.0); scratch_len],
            fft_size,
            buffer_size,
            tracker: PhaseTracker::new(settings.velocity_smoothing, settings.noise_smoothing),
            sequence: 0,
        })
    }

    /// Analytic signal for the newest `buffer_size` samples of `window`.
    pub fn process(&mut self, window: &[Complex<f32>]) -> Result<OutputFrame> {
        if window.len() != self.fft_size {
            return Err(ScopeError::ChunkLength {
                expected: self.fft_size,
                actual: window.len(),
            });
        }

        self.spectrum.copy_from_slice(window);
        self.forward.process_with_scratch(&mut self.spectrum, &mut self.scratch);

        for (bin, k) in self.spectrum.iter_mut().zip(self.kernel.iter()) {
            *bin *= *k;
        }

        self.inverse.process_with_scratch(&mut self.spectrum, &mut self.scratch);

        // Forward and inverse are both unscaled, so the pair gains fft_size.
        let scale = self.fft_size as f32;
        let settled = &self.spectrum[self.fft_size - self.buffer_size..];
        let vertices = settled
            .iter()
            .map(|c| {
                let sample = Complex::new(c.re / scale, c.im / scale);
                let (velocity, noise) = self.tracker.update(sample);
                ScopeVertex {
                    real: sample.re,
                    imag: sample.im,
                    velocity,
                    noise,
                }
            })
            .collect();

        self.sequence += 1;
        Ok(OutputFrame {
            sequence: self.sequence,
            vertices,
        })
    }

    pub fn kernel(&self) -> &[Complex<f32>] {
        &self.kernel
    }

    /// Forget the angular velocity history, e.g. after a discontinuity in the input.
    pub fn reset(&mut self) {
        self.tracker.reset();
    }
}
