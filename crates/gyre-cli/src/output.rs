use std::io::Write;

use clap::ValueEnum;
use gyre_core::{Mode, Transform};
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// One JSON object per frame
    #[default]
    Json,
    /// `<t> <mode> matrix3d(...)` per frame
    Css,
}

/// One emitted frame.
#[derive(Debug, Serialize)]
pub struct FrameRecord<'a> {
    pub frame: u64,
    pub t: f64,
    pub mode: Mode,
    #[serde(flatten)]
    pub transform: &'a Transform,
}

pub struct FrameWriter<W: Write> {
    out: W,
    format: Format,
    frames: u64,
}

impl<W: Write> FrameWriter<W> {
    pub fn new(out: W, format: Format) -> Self {
        Self {
            out,
            format,
            frames: 0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn write(&mut self, t: f64, mode: Mode, transform: &Transform) -> std::io::Result<()> {
        match self.format {
            Format::Json => {
                let record = FrameRecord {
                    frame: self.frames,
                    t,
                    mode,
                    transform,
                };
                serde_json::to_writer(&mut self.out, &record)?;
                writeln!(self.out)?;
            }
            Format::Css => {
                let mode = match mode {
                    Mode::Autonomous => "autonomous",
                    Mode::Tracking => "tracking",
                };
                writeln!(
                    self.out,
                    "{t:.4} {mode} {}",
                    transform.matrix4.to_css_matrix3d()
                )?;
            }
        }
        self.frames += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.out.flush()
    }
}

/// Parse a pointer line: `x y` or `x,y`.
pub fn parse_pointer_line(line: &str) -> Option<(f64, f64)> {
    let mut parts = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty());
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((x, y))
}
