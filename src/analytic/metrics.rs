use rustfft::num_complex::Complex;
use std::f32::consts::PI;

/// Angle between two complex numbers scaled into [0, 0.5].
///
/// Returns 0 when either vector has zero length.
pub fn angle(u: Complex<f32>, v: Complex<f32>) -> f32 {
    let len_product = u.norm() * v.norm();
    if len_product == 0.0 || !len_product.is_finite() {
        return 0.0;
    }
    let cos_theta = ((u.re * v.re + u.im * v.im) / len_product).clamp(-1.0, 1.0);
    cos_theta.acos() / (2.0 * PI)
}

/// One-pole IIR low-pass, `y += alpha * (x - y)` with `alpha = 1 - smoothing`.
#[derive(Clone, Debug)]
pub struct OnePole {
    alpha: f32,
    state: f32,
}

impl OnePole {
    pub fn new(smoothing: f32) -> Self {
        Self {
            alpha: 1.0 - smoothing,
            state: 0.0,
        }
    }

    pub fn process(&mut self, x: f32) -> f32 {
        self.state += self.alpha * (x - self.state);
        self.state
    }

    pub fn reset(&mut self) {
        self.state = 0.0;
    }
}

/// Smoothed angular velocity and angular noise of the analytic trace.
#[derive(Clone, Debug)]
pub struct PhaseTracker {
    prev_sample: Complex<f32>,
    prev_diff: Complex<f32>,
    velocity: OnePole,
    noise: OnePole,
}

impl PhaseTracker {
    pub fn new(velocity_smoothing: f32, noise_smoothing: f32) -> Self {
        Self {
            prev_sample: Complex::new(0.0, 0.0),
            prev_diff: Complex::new(0.0, 0.0),
            velocity: OnePole::new(velocity_smoothing),
            noise: OnePole::new(noise_smoothing),
        }
    }

    /// Feed the next output sample; returns `(velocity, noise)`.
    pub fn update(&mut self, sample: Complex<f32>) -> (f32, f32) {
        let diff = sample - self.prev_sample;
        let a = angle(diff, self.prev_diff);
        let velocity = self.velocity.process(a);
        let noise = self.noise.process((a - velocity).abs());
        self.prev_sample = sample;
        self.prev_diff = diff;
        (velocity, noise)
    }

    pub fn reset(&mut self) {
        self.prev_sample = Complex::new(0.0, 0.0);
        self.prev_diff = Complex::new(0.0, 0.0);
        self.velocity.reset();
        self.noise.reset();
    }
}
