//! Headless, deterministic runs on simulated frame times.

use std::io::Write;

use anyhow::{Context, Result, bail};
use gyre_core::{Driver, EngineConfig, InputSource, Mode, PointerSample, ScriptedInput, Viewport};
use rand::rngs::SmallRng;

use crate::output::{Format, FrameWriter};

pub struct SimulateOptions {
    pub duration: f64,
    pub fps: f64,
    pub viewport: Viewport,
    pub format: Format,
}

#[derive(Debug, Default)]
pub struct Summary {
    pub frames: u64,
    pub tracking_frames: u64,
    pub mode_changes: u64,
}

pub fn simulate(
    config: EngineConfig,
    options: &SimulateOptions,
    script: Vec<PointerSample>,
    rng: SmallRng,
    out: impl Write,
) -> Result<Summary> {
    if !(options.fps.is_finite() && options.fps > 0.0) {
        bail!("--fps must be a positive number, got {}", options.fps);
    }
    if !(options.duration.is_finite() && options.duration >= 0.0) {
        bail!("--duration must be non-negative, got {}", options.duration);
    }

    let mut driver = Driver::new(config, options.viewport, rng);
    let mut input = ScriptedInput::new(script);
    let mut writer = FrameWriter::new(out, options.format);
    let mut summary = Summary::default();
    let mut last_mode = driver.mode();

    let frames = (options.duration * options.fps).round() as u64;
    for i in 0..=frames {
        let now = i as f64 / options.fps;
        if let Some(pointer) = input.poll_pointer(now) {
            driver.pointer_moved(pointer.x, pointer.y);
        }
        let Some(transform) = driver.tick(now) else {
            break;
        };

        let mode = driver.mode();
        if mode != last_mode {
            summary.mode_changes += 1;
            last_mode = mode;
        }
        if mode == Mode::Tracking {
            summary.tracking_frames += 1;
        }
        writer
            .write(now, mode, &transform)
            .context("failed to write frame")?;
    }

    driver.teardown();
    writer.flush().context("failed to flush output")?;
    summary.frames = writer.frames();
    tracing::info!(
        frames = summary.frames,
        tracking = summary.tracking_frames,
        mode_changes = summary.mode_changes,
        "simulation complete"
    );
    Ok(summary)
}
