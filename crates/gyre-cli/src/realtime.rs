//! Wall-clock run loop.
//!
//! One task owns the driver and multiplexes three event sources: the frame
//! interval, pointer lines from stdin, and cancellation (Ctrl-C or the
//! optional duration). Everything touching the driver runs on this task.
//! Stdin is read on a plain thread so a blocked read never holds up
//! shutdown.

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use gyre_core::{Clock, Driver, EngineConfig, InstantClock, Viewport};
use rand::rngs::SmallRng;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::output::{Format, FrameWriter, parse_pointer_line};

pub struct RunOptions {
    pub fps: f64,
    pub duration: Option<f64>,
    pub viewport: Viewport,
    pub format: Format,
}

pub async fn run(
    config: EngineConfig,
    options: &RunOptions,
    rng: SmallRng,
    out: impl Write,
) -> Result<u64> {
    if !(options.fps.is_finite() && options.fps > 0.0) {
        bail!("--fps must be a positive number, got {}", options.fps);
    }
    let period = match Duration::try_from_secs_f64(1.0 / options.fps) {
        Ok(period) if !period.is_zero() => period,
        _ => bail!("--fps {} gives no usable frame interval", options.fps),
    };
    let run_for = match options.duration {
        Some(seconds) if !(seconds.is_finite() && seconds >= 0.0) => {
            bail!("--duration must be non-negative, got {seconds}")
        }
        Some(seconds) => Some(
            Duration::try_from_secs_f64(seconds)
                .with_context(|| format!("--duration {seconds} is out of range"))?,
        ),
        None => None,
    };

    let token = CancellationToken::new();
    spawn_ctrl_c(token.clone());
    if let Some(run_for) = run_for {
        let deadline = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(run_for).await;
            deadline.cancel();
        });
    }

    let mut driver = Driver::new(config, options.viewport, rng);
    let clock = InstantClock::new();
    let mut writer = FrameWriter::new(out, options.format);

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut lines = spawn_stdin_reader();
    let mut stdin_open = true;

    tracing::info!(fps = options.fps, "run loop started");
    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            line = lines.recv(), if stdin_open => match line {
                Some(line) => match parse_pointer_line(&line) {
                    Some((x, y)) => driver.pointer_moved(x, y),
                    None => tracing::warn!("ignoring pointer line {line:?}"),
                },
                None => {
                    tracing::debug!("stdin closed, no more pointer input");
                    stdin_open = false;
                }
            },
            _ = interval.tick() => {
                let now = clock.now();
                if let Some(transform) = driver.tick(now) {
                    writer
                        .write(now, driver.mode(), &transform)
                        .context("failed to write frame")?;
                }
            }
        }
    }

    driver.teardown();
    writer.flush().context("failed to flush output")?;
    tracing::info!(frames = writer.frames(), "run loop stopped");
    Ok(writer.frames())
}

fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!("stdin read failed: {e}");
                    break;
                }
            }
        }
    });
    rx
}

fn spawn_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("interrupt received, shutting down");
                token.cancel();
            }
            Err(e) => tracing::warn!("failed to listen for Ctrl-C: {e}"),
        }
    });
}
