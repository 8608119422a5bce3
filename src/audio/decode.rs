use anyhow::{Context, Result};
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Decoded mono samples of a whole file.
pub struct AudioData {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl AudioData {
    pub fn duration(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate.max(1) as f32
    }

    /// Split into capture-sized blocks, the way a device callback would deliver them.
    pub fn capture_blocks(&self, block_size: usize) -> std::slice::Chunks<'_, f32> {
        self.samples.chunks(block_size.max(1))
    }
}

pub fn decode_audio(path: &Path) -> Result<AudioData> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open audio file: {}", path.display()))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .context("Failed to probe audio format")?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .context("No audio tracks found")?;
    let track_id = track.id;
    let channels = track.codec_params.channels.map_or(1, |c| c.count());
    let sample_rate = track.codec_params.sample_rate.context("Unknown sample rate")?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("Failed to create audio decoder")?;

    let mut mono: Vec<f32> = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(e.into()),
        };
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(err)) => {
                log::debug!("Skipping undecodable packet: {}", err);
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let mut sample_buf = SampleBuffer::<f32>::new(decoded.frames() as u64, *decoded.spec());
        sample_buf.copy_interleaved_ref(decoded);
        downmix_into(sample_buf.samples(), channels, &mut mono);
    }

    let audio = AudioData {
        samples: mono,
        sample_rate,
    };
    log::info!(
        "Decoded {}: {} mono samples, {}Hz, {} channel(s), {:.1}s",
        path.display(),
        audio.samples.len(),
        sample_rate,
        channels,
        audio.duration()
    );
    Ok(audio)
}

/// Average interleaved channels down to one.
fn downmix_into(interleaved: &[f32], channels: usize, out: &mut Vec<f32>) {
    if channels <= 1 {
        out.extend_from_slice(interleaved);
        return;
    }
    out.extend(
        interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downmix_averages_channels() {
        let mut out = Vec::new();
        downmix_into(&[1.0, 3.0, -1.0, 1.0], 2, &mut out);
        assert_eq!(out, vec![2.0, 0.0]);
    }

    #[test]
    fn mono_passes_through() {
        let mut out = vec![9.0];
        downmix_into(&[0.5, 0.25], 1, &mut out);
        assert_eq!(out, vec![9.0, 0.5, 0.25]);
    }

    #[test]
    fn capture_blocks_cover_all_samples() {
        let audio = AudioData {
            samples: (0..10).map(|i| i as f32).collect(),
            sample_rate: 8000,
        };
        let sizes: Vec<usize> = audio.capture_blocks(4).map(|b| b.len()).collect();
        assert_eq!(sizes, vec![4, 4, 2]);
        assert!((audio.duration() - 10.0 / 8000.0).abs() < 1e-9);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(decode_audio(Path::new("/nonexistent/scope-input.wav")).is_err());
    }
}
