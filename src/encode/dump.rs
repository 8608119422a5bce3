use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

use super::texture::encode_texture;
use crate::analytic::OutputFrame;
use crate::config::OutputFormat;

/// Writes consumed frames to a dump file in one of the supported formats.
pub struct DumpWriter<W: Write> {
    out: W,
    format: OutputFormat,
    max_amplitude: f32,
    frames: u64,
}

impl DumpWriter<BufWriter<File>> {
    pub fn create(path: &Path, format: OutputFormat, max_amplitude: f32) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create dump file: {}", path.display()))?;
        log::info!("Writing {:?} frames to {}", format, path.display());
        Ok(Self::new(BufWriter::new(file), format, max_amplitude))
    }
}

impl<W: Write> DumpWriter<W> {
    pub fn new(out: W, format: OutputFormat, max_amplitude: f32) -> Self {
        Self {
            out,
            format,
            max_amplitude,
            frames: 0,
        }
    }

    pub fn write_frame(&mut self, frame: &OutputFrame) -> Result<()> {
        match self.format {
            OutputFormat::Text => {
                for value in frame.as_floats() {
                    write!(self.out, "{},", value)?;
                }
                writeln!(self.out)?;
            }
            OutputFormat::Jsonl => {
                serde_json::to_writer(&mut self.out, frame).context("Failed to serialize frame")?;
                writeln!(self.out)?;
            }
            OutputFormat::Texture => {
                self.out.write_all(&encode_texture(frame, self.max_amplitude))?;
            }
        }
        self.frames += 1;
        Ok(())
    }

    /// Flush and return the number of frames written.
    pub fn finish(mut self) -> Result<u64> {
        self.out.flush().context("Failed to flush dump file")?;
        log::info!("Dump complete: {} frames", self.frames);
        Ok(self.frames)
    }
}

/// Parse a text dump back into one flat row of floats per frame.
pub fn read_text_dump<R: BufRead>(reader: R) -> Result<Vec<Vec<f32>>> {
    let mut rows = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let row = line
            .split(',')
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .map(|field| {
                field
                    .parse::<f32>()
                    .with_context(|| format!("Bad sample {:?} on line {}", field, line_no + 1))
            })
            .collect::<Result<Vec<f32>>>()?;
        rows.push(row);
    }
    Ok(rows)
}
