use rustfft::num_complex::Complex;

use crate::error::{Result, ScopeError};

/// Time-domain history of the newest `fft_size` samples.
///
/// Every sample is stored twice, at `idx` and `idx + fft_size`, so the window
/// starting at the cursor is always one contiguous slice.
pub struct TimeRingBuffer {
    buffer: Vec<Complex<f32>>,
    fft_size: usize,
    buffer_size: usize,
    gain: f32,
    idx: usize,
}

impl TimeRingBuffer {
    /// `fft_size` must be a non-zero multiple of `buffer_size` so that the
    /// doubled write of a chunk never runs past `2 * fft_size`.
    pub fn new(fft_size: usize, buffer_size: usize, gain: f32) -> Result<Self> {
        if buffer_size == 0 || fft_size < buffer_size || fft_size % buffer_size != 0 {
            return Err(ScopeError::Config(format!(
                "ring of {} samples cannot be filled in chunks of {}",
                fft_size, buffer_size
            )));
        }
        Ok(Self {
            buffer: vec![Complex::new(0.0, 0.0); 2 * fft_size],
            fft_size,
            buffer_size,
            gain,
            idx: 0,
        })
    }

    /// Store one chunk of `buffer_size` samples and advance the cursor.
    pub fn write(&mut self, samples: &[f32]) -> Result<()> {
        if samples.len() != self.buffer_size {
            return Err(ScopeError::ChunkLength {
                expected: self.buffer_size,
                actual: samples.len(),
            });
        }

        for (i, &s) in samples.iter().enumerate() {
            let mono = Complex::new(self.gain * s, 0.0);
            self.buffer[self.idx + i] = mono;
            self.buffer[self.idx + self.fft_size + i] = mono;
        }
        self.idx = (self.idx + self.buffer_size) % self.fft_size;
        Ok(())
    }

    /// The `fft_size` samples starting at the cursor, oldest first.
    pub fn window(&self) -> &[Complex<f32>] {
        &self.buffer[self.idx..self.idx + self.fft_size]
    }

    pub fn cursor(&self) -> usize {
        self.idx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reals(window: &[Complex<f32>]) -> Vec<f32> {
        window.iter().map(|c| c.re).collect()
    }

    #[test]
    fn window_holds_newest_samples_in_order() {
        let mut ring = TimeRingBuffer::new(8, 4, 1.0).unwrap();
        ring.write(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(reals(ring.window()), vec![0.0, 0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 4.0]);

        ring.write(&[5.0, 6.0, 7.0, 8.0]).unwrap();
        assert_eq!(reals(ring.window()), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);

        ring.write(&[9.0, 10.0, 11.0, 12.0]).unwrap();
        assert_eq!(reals(ring.window()), vec![5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);
    }

    #[test]
    fn window_matches_linear_history_over_many_cycles() {
        let (fft_size, buffer_size) = (16, 4);
        let mut ring = TimeRingBuffer::new(fft_size, buffer_size, 1.0).unwrap();
        let mut history: Vec<f32> = vec![0.0; fft_size];

        for cycle in 0..37 {
            let chunk: Vec<f32> = (0..buffer_size).map(|i| (cycle * buffer_size + i) as f32).collect();
            ring.write(&chunk).unwrap();
            history.extend_from_slice(&chunk);

            let window = ring.window();
            assert_eq!(window.len(), fft_size);
            assert_eq!(reals(window), history[history.len() - fft_size..].to_vec());
            assert!(window.iter().all(|c| c.im == 0.0));
        }
    }

    #[test]
    fn cursor_returns_after_full_window() {
        let mut ring = TimeRingBuffer::new(32, 8, 1.0).unwrap();
        let start = ring.cursor();
        for n in 1..=4 {
            ring.write(&[0.5; 8]).unwrap();
            assert_eq!(ring.cursor(), (start + n * 8) % 32);
        }
        assert_eq!(ring.cursor(), start);
    }

    #[test]
    fn applies_gain() {
        let mut ring = TimeRingBuffer::new(4, 2, 2.5).unwrap();
        ring.write(&[1.0, -2.0]).unwrap();
        assert_eq!(reals(ring.window()), vec![0.0, 0.0, 2.5, -5.0]);
    }

    #[test]
    fn rejects_wrong_chunk_length() {
        let mut ring = TimeRingBuffer::new(8, 4, 1.0).unwrap();
        let err = ring.write(&[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, ScopeError::ChunkLength { expected: 4, actual: 3 }));
        assert_eq!(ring.cursor(), 0);
    }

    #[test]
    fn rejects_sizes_that_overrun_the_buffer() {
        for (fft_size, buffer_size) in [(10, 4), (0, 0), (8, 0), (4, 8)] {
            assert!(
                matches!(TimeRingBuffer::new(fft_size, buffer_size, 1.0), Err(ScopeError::Config(_))),
                "accepted fft_size={} buffer_size={}",
                fft_size,
                buffer_size
            );
        }

        // A single chunk spanning the whole window is still well formed.
        let mut ring = TimeRingBuffer::new(4, 4, 1.0).unwrap();
        for _ in 0..3 {
            ring.write(&[1.0; 4]).unwrap();
            assert_eq!(ring.cursor(), 0);
        }
    }
}
