mod cli;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use analytic_scope::audio::{decode_audio, AudioData, ChunkFramer};
use analytic_scope::config::{self, AnalysisSettings, OutputFormat};
use analytic_scope::encode::DumpWriter;
use analytic_scope::{OutputFrame, OutputSink, ScopePipeline};
use cli::Cli;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut cli = Cli::parse();
    let mut settings = AnalysisSettings::default();

    // Config values apply only where the CLI is still at its default.
    if let Some(path) = config::discover_config(cli.config.as_deref()) {
        if let Some(cfg) = config::load_config(&path) {
            log::info!("Loaded config from {}", path.display());
            if cli.fft_size == 1024 { cli.fft_size = cfg.analysis.fft_size; }
            if cli.buffer_size == 256 { cli.buffer_size = cfg.analysis.buffer_size; }
            if cli.gain == 1.0 { cli.gain = cfg.analysis.gain; }
            if cli.ring_multiplier == 3 { cli.ring_multiplier = cfg.analysis.ring_multiplier; }
            if cli.format == OutputFormat::Text { cli.format = cfg.output.format; }
            if cli.fps == 60 { cli.fps = cfg.output.fps; }
            if cli.max_amplitude == 4.0 { cli.max_amplitude = cfg.output.max_amplitude; }
            settings.velocity_smoothing = cfg.analysis.velocity_smoothing;
            settings.noise_smoothing = cfg.analysis.noise_smoothing;
        } else {
            log::warn!("Failed to load config from {}", path.display());
        }
    }

    if !cli.input.exists() {
        anyhow::bail!("Input file not found: {}", cli.input.display());
    }

    log::info!("analytic-scope - Hilbert oscilloscope trace generator");
    log::info!("Input: {}", cli.input.display());
    log::info!("Output: {} ({:?})", cli.output.display(), cli.format);

    let audio = decode_audio(&cli.input)?;

    settings.fft_size = cli.fft_size;
    settings.buffer_size = cli.buffer_size;
    settings.gain = cli.gain;
    settings.ring_multiplier = cli.ring_multiplier;
    settings.sample_rate = audio.sample_rate;

    let pipeline = ScopePipeline::new(&settings).context("Invalid analysis settings")?;
    let framer = ChunkFramer::new(settings.buffer_size, settings.ring_multiplier)?;
    if cli.capture_block + settings.buffer_size > framer.capacity() {
        log::warn!(
            "Capture block {} may overflow the {}-sample FIFO; raise --ring-multiplier",
            cli.capture_block,
            framer.capacity()
        );
    }
    let writer = DumpWriter::create(&cli.output, cli.format, cli.max_amplitude)?;

    let pb = ProgressBar::new(audio.samples.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} samples ({eta} remaining)")?
            .progress_chars("=>-"),
    );

    let feed = Feed {
        audio: &audio,
        capture_block: cli.capture_block,
        pipeline,
        framer,
        pb: &pb,
    };
    let written = if cli.realtime {
        run_realtime(feed, writer, cli.fps)?
    } else {
        run_offline(feed, writer)?
    };
    pb.finish_with_message("Processing complete");

    log::info!("Done! {} frames written to {}", written, cli.output.display());
    Ok(())
}

/// Producer-side state shared by both run modes.
struct Feed<'a> {
    audio: &'a AudioData,
    capture_block: usize,
    pipeline: ScopePipeline,
    framer: ChunkFramer,
    pb: &'a ProgressBar,
}

impl Feed<'_> {
    /// Deliver one capture block and hand every frame it completes to `on_frame`.
    fn deliver<F>(&mut self, block: &[f32], mut on_frame: F) -> Result<()>
    where
        F: FnMut(&OutputFrame) -> Result<()>,
    {
        self.framer.push(block);
        while let Some(chunk) = self.framer.next_chunk() {
            let frame = self.pipeline.push_chunk(&chunk)?;
            on_frame(&frame)?;
        }
        self.pb.inc(block.len() as u64);
        Ok(())
    }

    fn finish(&self) {
        log::info!(
            "Processed {} cycles, {} samples left unframed, {} dropped",
            self.pipeline.cycles(),
            self.framer.pending(),
            self.framer.dropped()
        );
    }
}

/// Write every published frame from the producer thread.
fn run_offline<W: Write>(mut feed: Feed<'_>, mut writer: DumpWriter<W>) -> Result<u64> {
    let audio = feed.audio;
    for block in audio.capture_blocks(feed.capture_block) {
        feed.deliver(block, |frame| writer.write_frame(frame))?;
    }
    feed.finish();
    writer.finish()
}

/// Pace capture blocks at the file's sample rate while a render thread
/// samples the sink at `fps`.
fn run_realtime<W>(mut feed: Feed<'_>, writer: DumpWriter<W>, fps: u32) -> Result<u64>
where
    W: Write + Send + 'static,
{
    let stop = Arc::new(AtomicBool::new(false));
    let render = spawn_render_loop(feed.pipeline.sink(), writer, fps, Arc::clone(&stop));

    let audio = feed.audio;
    let rate = audio.sample_rate.max(1) as f64;
    let start = Instant::now();
    let mut delivered = 0usize;
    let mut produced = Ok(());
    for block in audio.capture_blocks(feed.capture_block) {
        // The render loop only exits on its own when it failed.
        if render.is_finished() {
            log::warn!("Render loop stopped, halting capture after {} samples", delivered);
            break;
        }
        delivered += block.len();
        let deadline = start + Duration::from_secs_f64(delivered as f64 / rate);
        if let Some(wait) = deadline.checked_duration_since(Instant::now()) {
            thread::sleep(wait);
        }
        if let Err(err) = feed.deliver(block, |_| Ok(())) {
            produced = Err(err);
            break;
        }
    }

    stop.store(true, Ordering::Release);
    let written = render
        .join()
        .map_err(|_| anyhow!("Render thread panicked"))??;
    produced?;
    feed.finish();
    Ok(written)
}

fn spawn_render_loop<W>(
    sink: Arc<OutputSink>,
    mut writer: DumpWriter<W>,
    fps: u32,
    stop: Arc<AtomicBool>,
) -> thread::JoinHandle<Result<u64>>
where
    W: Write + Send + 'static,
{
    let period = Duration::from_secs_f64(1.0 / fps.max(1) as f64);
    thread::spawn(move || {
        let mut last_sequence = 0;
        loop {
            let stopping = stop.load(Ordering::Acquire);
            let frame = sink.snapshot();
            if frame.sequence != last_sequence {
                writer.write_frame(&frame)?;
                last_sequence = frame.sequence;
            }
            if stopping {
                break;
            }
            thread::sleep(period);
        }
        writer.finish()
    })
}
