use rustfft::{num_complex::Complex, FftPlanner};
use std::f32::consts::PI;
use std::sync::Arc;

use crate::error::{Result, ScopeError};

/// Frequency-domain Hilbert kernel, one coefficient per FFT bin.
pub type AnalyticKernel = Arc<[Complex<f32>]>;

/// Odd FIR support length for a window of `fft_size` bins.
pub fn support_length(fft_size: usize) -> usize {
    if fft_size % 2 == 0 {
        fft_size.saturating_sub(1)
    } else {
        fft_size
    }
}

/// Build the analytic filter of support `n`, zero padded to `m` and
/// transformed with an unscaled forward FFT.
///
/// The real part removes DC and Nyquist, the imaginary part shifts by 90
/// degrees, so the filter passes only positive frequencies.
pub fn build(n: usize, m: usize) -> Result<AnalyticKernel> {
    if n % 2 == 0 {
        return Err(ScopeError::Kernel(format!("support length {} must be odd", n)));
    }
    if n > m {
        return Err(ScopeError::Kernel(format!(
            "support length {} exceeds window {}",
            n, m
        )));
    }
    let mid = (n - 1) / 2;
    if mid <= 1 {
        return Err(ScopeError::Kernel(format!(
            "support length {} is too short (needs mid > 1, got {})",
            n, mid
        )));
    }

    let mut impulse = impulse_response(mid, m);

    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(m);
    fft.process(&mut impulse);

    log::debug!("Built analytic kernel n={}, m={}", n, m);
    Ok(impulse.into())
}

/// Hamming-windowed Hilbert impulse centred on `mid`, length `m`.
fn impulse_response(mid: usize, m: usize) -> Vec<Complex<f32>> {
    let mut impulse = vec![Complex::new(0.0f32, 0.0); m];
    impulse[mid].re = 1.0;

    let re = -1.0 / (mid - 1) as f32;
    for i in 1..=mid {
        if i % 2 == 0 {
            impulse[mid + i].re = re;
            impulse[mid - i].re = re;
        } else {
            let im = 2.0 / PI / i as f32;
            impulse[mid + i].im = im;
            impulse[mid - i].im = -im;
        }
        // hamming window
        let k = 0.53836 + 0.46164 * (i as f32 * PI / (mid + 1) as f32).cos();
        impulse[mid + i] = impulse[mid + i].scale(k);
        impulse[mid - i] = impulse[mid - i].scale(k);
    }

    impulse
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_dft(input: &[Complex<f32>]) -> Vec<Complex<f32>> {
        let n = input.len();
        (0..n)
            .map(|k| {
                input.iter().enumerate().fold(Complex::new(0.0f32, 0.0), |acc, (t, x)| {
                    let phase = -2.0 * PI * (k * t) as f32 / n as f32;
                    acc + x * Complex::new(phase.cos(), phase.sin())
                })
            })
            .collect()
    }

    #[test]
    fn support_length_is_odd() {
        assert_eq!(support_length(1024), 1023);
        assert_eq!(support_length(9), 9);
        assert_eq!(support_length(8), 7);
    }

    #[test]
    fn build_is_deterministic() {
        let a = build(1023, 1024).unwrap();
        let b = build(1023, 1024).unwrap();
        assert_eq!(a.len(), 1024);
        let bits = |k: &AnalyticKernel| -> Vec<(u32, u32)> {
            k.iter().map(|c| (c.re.to_bits(), c.im.to_bits())).collect()
        };
        assert_eq!(bits(&a), bits(&b));
    }

    #[test]
    fn impulse_matches_hand_computed_taps() {
        let h = impulse_response(3, 8);
        let k1 = 0.53836 + 0.46164 * (PI / 4.0).cos();
        let k2 = 0.53836f32;
        let k3 = 0.53836 + 0.46164 * (3.0 * PI / 4.0).cos();

        let expected = [
            Complex::new(0.0, -2.0 / (3.0 * PI) * k3),
            Complex::new(-0.5 * k2, 0.0),
            Complex::new(0.0, -2.0 / PI * k1),
            Complex::new(1.0, 0.0),
            Complex::new(0.0, 2.0 / PI * k1),
            Complex::new(-0.5 * k2, 0.0),
            Complex::new(0.0, 2.0 / (3.0 * PI) * k3),
            Complex::new(0.0, 0.0),
        ];
        for (got, want) in h.iter().zip(expected.iter()) {
            assert!((got - want).norm() < 1e-6, "{} != {}", got, want);
        }
    }

    #[test]
    fn kernel_is_unscaled_dft_of_impulse() {
        let kernel = build(7, 8).unwrap();
        let reference = naive_dft(&impulse_response(3, 8));
        for (got, want) in kernel.iter().zip(reference.iter()) {
            assert!((got - want).norm() < 1e-5, "{} != {}", got, want);
        }
        // DC bin is the plain sum of the taps: 1 - 0.53836, no imaginary part.
        assert!((kernel[0].re - 0.46164).abs() < 1e-5);
        assert!(kernel[0].im.abs() < 1e-5);
    }

    #[test]
    fn kernel_suppresses_negative_frequencies() {
        let m = 256;
        let kernel = build(support_length(m), m).unwrap();
        // Bins above Nyquist are negative frequencies; the filter should pass
        // far less there than in the matching positive bin.
        let pos = kernel[m / 8].norm();
        let neg = kernel[m - m / 8].norm();
        assert!(pos > 1.5, "positive gain {}", pos);
        assert!(neg < 0.1, "negative gain {}", neg);
    }

    #[test]
    fn rejects_degenerate_support() {
        assert!(matches!(build(3, 4), Err(ScopeError::Kernel(_))));
        assert!(matches!(build(1, 2), Err(ScopeError::Kernel(_))));
        assert!(matches!(build(8, 8), Err(ScopeError::Kernel(_))));
        assert!(matches!(build(9, 8), Err(ScopeError::Kernel(_))));
        assert!(build(5, 6).is_ok());
    }
}
