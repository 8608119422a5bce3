use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Result, ScopeError};

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisSettings,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Sizes and tuning for one analytic pipeline.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct AnalysisSettings {
    /// Transform window length.
    #[serde(default = "default_fft_size")]
    pub fft_size: usize,
    /// New samples consumed per processing cycle.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
    /// Informational; used for pacing and logging only.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    #[serde(default = "default_gain")]
    pub gain: f32,
    /// Capacity of the capture re-framing FIFO, in chunks.
    #[serde(default = "default_ring_multiplier")]
    pub ring_multiplier: usize,
    #[serde(default = "default_smoothing")]
    pub velocity_smoothing: f32,
    #[serde(default = "default_smoothing")]
    pub noise_smoothing: f32,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Jsonl,
    Texture,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default = "default_max_amplitude")]
    pub max_amplitude: f32,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            fft_size: default_fft_size(),
            buffer_size: default_buffer_size(),
            sample_rate: default_sample_rate(),
            gain: default_gain(),
            ring_multiplier: default_ring_multiplier(),
            velocity_smoothing: default_smoothing(),
            noise_smoothing: default_smoothing(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            fps: default_fps(),
            max_amplitude: default_max_amplitude(),
        }
    }
}

impl AnalysisSettings {
    /// Settings with the given window and chunk sizes and defaults elsewhere.
    pub fn with_sizes(fft_size: usize, buffer_size: usize) -> Self {
        Self {
            fft_size,
            buffer_size,
            ..Self::default()
        }
    }

    /// Reject configurations the ring buffer and spectral processor cannot run.
    pub fn validate(&self) -> Result<()> {
        if self.fft_size == 0 || self.buffer_size == 0 {
            return Err(ScopeError::Config(format!(
                "sizes must be positive (fft_size={}, buffer_size={})",
                self.fft_size, self.buffer_size
            )));
        }
        if self.fft_size <= self.buffer_size {
            return Err(ScopeError::Config(format!(
                "fft_size ({}) must exceed buffer_size ({})",
                self.fft_size, self.buffer_size
            )));
        }
        // The cursor steps by buffer_size; a partial last step would write
        // past the doubled half of the ring.
        if self.fft_size % self.buffer_size != 0 {
            return Err(ScopeError::Config(format!(
                "fft_size ({}) must be a multiple of buffer_size ({})",
                self.fft_size, self.buffer_size
            )));
        }
        if !self.gain.is_finite() {
            return Err(ScopeError::Config(format!("gain must be finite, got {}", self.gain)));
        }
        if self.ring_multiplier == 0 {
            return Err(ScopeError::Config("ring_multiplier must be at least 1".into()));
        }
        for (name, value) in [
            ("velocity_smoothing", self.velocity_smoothing),
            ("noise_smoothing", self.noise_smoothing),
        ] {
            if !(0.0..1.0).contains(&value) {
                return Err(ScopeError::Config(format!(
                    "{} must be in [0, 1), got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Duration of one chunk at the configured sample rate.
    pub fn chunk_duration(&self) -> std::time::Duration {
        let rate = self.sample_rate.max(1) as f64;
        std::time::Duration::from_secs_f64(self.buffer_size as f64 / rate)
    }
}

fn default_fft_size() -> usize { 1024 }
fn default_buffer_size() -> usize { 256 }
fn default_sample_rate() -> u32 { 44100 }
fn default_gain() -> f32 { 1.0 }
fn default_ring_multiplier() -> usize { 3 }
fn default_smoothing() -> f32 { 0.95 }
fn default_fps() -> u32 { 60 }
fn default_max_amplitude() -> f32 { 4.0 }

pub fn load_config(path: &Path) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(cfg) => Some(cfg),
        Err(err) => {
            log::warn!("Invalid config {}: {}", path.display(), err);
            None
        }
    }
}

/// Explicit path, else `scope.toml` in the working directory, else the user config dir.
pub fn discover_config(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = PathBuf::from("scope.toml");
    if local.exists() {
        return Some(local);
    }
    if let Some(home) = dirs::home_dir() {
        let xdg = home.join(".config").join("analytic-scope").join("config.toml");
        if xdg.exists() {
            return Some(xdg);
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        let platform = config_dir.join("analytic-scope").join("config.toml");
        if platform.exists() {
            return Some(platform);
        }
    }
    None
}
