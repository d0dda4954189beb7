//! Seams to the host environment: a time source, pointer input, and the
//! render sink that consumes each frame's transform.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::matrix::{Mat3, Mat4};
use crate::quaternion::Quaternion;
use crate::resolver::PointerPosition;

/// Monotonic time source, in seconds.
pub trait Clock {
    fn now(&self) -> f64;
}

/// Pointer input, sampled once per frame.
pub trait InputSource {
    /// Latest pointer position reported since the previous poll, if any.
    fn poll_pointer(&mut self, now: f64) -> Option<PointerPosition>;
}

/// Consumer of the per-frame transform.
pub trait RenderSink {
    fn apply(&mut self, transform: &Transform);
}

/// Outbound per-frame rotation. Both matrices come from the same
/// orientation and agree on the 3×3 block.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub orientation: Quaternion,
    pub matrix3: Mat3,
    pub matrix4: Mat4,
}

impl From<Quaternion> for Transform {
    fn from(q: Quaternion) -> Self {
        Self {
            orientation: q,
            matrix3: q.to_mat3(),
            matrix4: q.to_mat4(),
        }
    }
}

impl<F: FnMut(&Transform)> RenderSink for F {
    fn apply(&mut self, transform: &Transform) {
        self(transform)
    }
}

/// Clock advanced by hand. Used for deterministic simulation.
#[derive(Clone, Copy, Debug, Default)]
pub struct ManualClock {
    now: f64,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self { now: start }
    }

    pub fn advance(&mut self, seconds: f64) {
        self.now += seconds;
    }

    pub fn set(&mut self, now: f64) {
        self.now = now;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now
    }
}

/// Wall clock measured from construction.
#[derive(Clone, Copy, Debug)]
pub struct InstantClock {
    origin: Instant,
}

impl InstantClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for InstantClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for InstantClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Input source that never reports movement.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullInput;

impl InputSource for NullInput {
    fn poll_pointer(&mut self, _now: f64) -> Option<PointerPosition> {
        None
    }
}

/// A timestamped pointer sample.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    pub t: f64,
    pub x: f64,
    pub y: f64,
}

impl PointerSample {
    pub fn position(&self) -> PointerPosition {
        PointerPosition::new(self.x, self.y)
    }
}

/// Replays recorded samples against the clock. Each poll returns the most
/// recent sample whose time has passed; older ones are skipped.
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    samples: Vec<PointerSample>,
    next: usize,
}

impl ScriptedInput {
    pub fn new(mut samples: Vec<PointerSample>) -> Self {
        samples.sort_by(|a, b| a.t.total_cmp(&b.t));
        Self { samples, next: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.samples.len() - self.next
    }
}

impl InputSource for ScriptedInput {
    fn poll_pointer(&mut self, now: f64) -> Option<PointerPosition> {
        let mut latest = None;
        while let Some(sample) = self.samples.get(self.next) {
            if sample.t > now {
                break;
            }
            latest = Some(sample.position());
            self.next += 1;
        }
        latest
    }
}

/// Sink that keeps every transform it receives.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    pub frames: Vec<Transform>,
}

impl RecordingSink {
    pub fn last(&self) -> Option<&Transform> {
        self.frames.last()
    }
}

impl RenderSink for RecordingSink {
    fn apply(&mut self, transform: &Transform) {
        self.frames.push(*transform);
    }
}
