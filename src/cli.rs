use clap::Parser;
use std::path::PathBuf;

use analytic_scope::config::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "analytic-scope", about = "Hilbert transform oscilloscope trace generator")]
pub struct Cli {
    /// Input audio file (WAV, MP3, FLAC, OGG)
    pub input: PathBuf,

    /// Output dump file
    #[arg(short, long, default_value = "scope.dump")]
    pub output: PathBuf,

    /// Dump format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Config file (defaults to scope.toml or the user config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Transform window length
    #[arg(long, default_value_t = 1024)]
    pub fft_size: usize,

    /// Samples per processing cycle
    #[arg(long, default_value_t = 256)]
    pub buffer_size: usize,

    /// Gain applied to every input sample
    #[arg(long, default_value_t = 1.0)]
    pub gain: f32,

    /// Capture FIFO capacity, in processing chunks
    #[arg(long, default_value_t = 3)]
    pub ring_multiplier: usize,

    /// Size of the simulated capture callbacks
    #[arg(long, default_value_t = 240)]
    pub capture_block: usize,

    /// Pace input at the file's sample rate and sample frames from a render thread
    #[arg(long)]
    pub realtime: bool,

    /// Render thread refresh rate (realtime mode)
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Amplitude mapped to the edge of the texture
    #[arg(long, default_value_t = 4.0)]
    pub max_amplitude: f32,
}
