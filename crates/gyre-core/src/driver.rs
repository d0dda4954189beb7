//! The animation state machine.
//!
//! A [`Driver`] owns one object's [`AnimationState`] and advances it one
//! frame at a time. Two modes:
//!
//! - **Autonomous** (default): per-axis drift speeds are integrated into a
//!   world-space incremental rotation each frame.
//! - **Tracking**: the orientation SLERPs toward the target resolved from
//!   the latest pointer position.
//!
//! Pointer movement switches to Tracking and restarts the idle timer; the
//! idle timer firing switches back. Everything runs on one thread: pointer
//! samples are queued and applied at the top of the next tick, before any
//! motion is computed.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::constants::AXES;
use crate::drift::{Axis, DriftGenerator};
use crate::host::{Clock, InputSource, RenderSink, Transform};
use crate::quaternion::Quaternion;
use crate::resolver::{PointerPosition, TargetResolver, Viewport};
use crate::timer::{TimerId, TimerSet};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Autonomous,
    Tracking,
}

/// Mutable per-object animation state.
#[derive(Clone, Debug)]
pub struct AnimationState {
    pub current_orientation: Quaternion,
    pub target_orientation: Quaternion,
    pub mode: Mode,
    /// Per-axis angular speed (rad/s), X, Y, Z.
    pub current_speed: [f64; 3],
    pub target_speed: [f64; 3],
    pub initialized: bool,
    /// Clock time of the first tick (s).
    pub start_time: f64,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            current_orientation: Quaternion::identity(),
            target_orientation: Quaternion::identity(),
            mode: Mode::Autonomous,
            current_speed: [0.0; 3],
            target_speed: [0.0; 3],
            initialized: false,
            start_time: 0.0,
        }
    }
}

pub struct Driver<R: Rng> {
    config: EngineConfig,
    state: AnimationState,
    resolver: TargetResolver,
    viewport: Viewport,
    drift: DriftGenerator,
    timers: TimerSet,
    rng: R,
    pending_pointer: Option<PointerPosition>,
    last_time: f64,
    stopped: bool,
}

impl<R: Rng> Driver<R> {
    /// An invalid config is accepted but logged: drift sampling and the
    /// non-finite guard keep every tick panic-free regardless.
    pub fn new(config: EngineConfig, viewport: Viewport, rng: R) -> Self {
        if let Err(e) = config.validate() {
            tracing::warn!("driver created with invalid config: {e}");
        }
        let resolver = TargetResolver::new(
            config.tracking.perspective_depth,
            config.tracking.min_rotation_angle,
        );
        let drift = DriftGenerator::new(&config.drift);
        Self {
            config,
            state: AnimationState::default(),
            resolver,
            viewport,
            drift,
            timers: TimerSet::new(),
            rng,
            pending_pointer: None,
            last_time: 0.0,
            stopped: false,
        }
    }

    /// Start from a given orientation instead of identity.
    pub fn with_orientation(mut self, orientation: Quaternion) -> Self {
        let q = orientation.normalize();
        if q.is_finite() {
            self.state.current_orientation = q;
            self.state.target_orientation = q;
        }
        self
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn orientation(&self) -> Quaternion {
        self.state.current_orientation
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn timers(&self) -> &TimerSet {
        &self.timers
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Record a pointer move. Applied at the top of the next tick; a later
    /// move before that tick replaces this one.
    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        if self.stopped {
            return;
        }
        self.pending_pointer = Some(PointerPosition::new(x, y));
    }

    /// Advance one frame at clock time `now` (seconds).
    ///
    /// Returns the transform for this frame, or `None` after teardown.
    pub fn tick(&mut self, now: f64) -> Option<Transform> {
        if self.stopped {
            return None;
        }

        if !self.state.initialized {
            self.initialize(now);
        }

        let delta = (now - self.last_time).max(0.0);
        if now > self.last_time {
            self.last_time = now;
        }

        if let Some(pointer) = self.pending_pointer.take() {
            self.apply_pointer(pointer, now);
        }

        for id in self.timers.take_due(now) {
            self.fire(id, now);
        }

        let previous = self.state.current_orientation;
        let next = match self.state.mode {
            Mode::Tracking => self.track_step(delta),
            Mode::Autonomous => self.drift_step(delta, now),
        };

        if next.is_finite() {
            self.state.current_orientation = next;
        } else {
            tracing::warn!(?next, "discarding non-finite orientation");
            self.state.current_orientation = previous;
        }

        Some(Transform::from(self.state.current_orientation))
    }

    /// One frame driven by the host interfaces.
    pub fn frame(
        &mut self,
        clock: &impl Clock,
        input: &mut impl InputSource,
        sink: &mut impl RenderSink,
    ) -> Option<Transform> {
        if self.stopped {
            return None;
        }
        let now = clock.now();
        if let Some(pointer) = input.poll_pointer(now) {
            self.pointer_moved(pointer.x, pointer.y);
        }
        let transform = self.tick(now)?;
        sink.apply(&transform);
        Some(transform)
    }

    /// Cancel all timers, drop queued input, and stop responding.
    pub fn teardown(&mut self) {
        if self.stopped {
            return;
        }
        self.timers.cancel_all();
        self.pending_pointer = None;
        self.stopped = true;
        tracing::debug!("driver torn down");
    }

    fn initialize(&mut self, now: f64) {
        self.state.start_time = now;
        self.last_time = now;
        self.drift.initialize(&mut self.rng);
        self.timers.start();
        for axis in Axis::ALL {
            let dwell = self.drift.dwell_duration(&mut self.rng);
            self.timers.schedule(TimerId::Dwell(axis), now + dwell);
        }
        self.sync_speeds();
        self.state.initialized = true;
        tracing::debug!(start = now, speeds = ?self.state.target_speed, "driver initialized");
    }

    fn apply_pointer(&mut self, pointer: PointerPosition, now: f64) {
        self.state.target_orientation =
            self.resolver
                .resolve(pointer, self.viewport, self.state.current_orientation);
        if self.state.mode != Mode::Tracking {
            tracing::debug!(at = now, "mode -> tracking");
        }
        self.state.mode = Mode::Tracking;
        self.timers
            .schedule(TimerId::Idle, now + self.config.tracking.idle_timeout);
    }

    fn fire(&mut self, id: TimerId, now: f64) {
        match id {
            TimerId::Dwell(axis) => {
                let dwell = self.drift.retarget(axis, &mut self.rng);
                self.timers.schedule(id, now + dwell);
                self.sync_speeds();
            }
            TimerId::Idle => {
                tracing::debug!(at = now, "idle timeout, mode -> autonomous");
                self.state.mode = Mode::Autonomous;
            }
        }
    }

    fn track_step(&self, delta: f64) -> Quaternion {
        let tracking = &self.config.tracking;
        let t = (tracking.interpolation_rate * delta * tracking.target_frame_rate).min(1.0);
        self.state
            .current_orientation
            .slerp_with_threshold(self.state.target_orientation, t, tracking.slerp_threshold)
            .normalize()
    }

    fn drift_step(&mut self, delta: f64, now: f64) -> Quaternion {
        if now - self.state.start_time < self.config.drift.initial_hold {
            return self.state.current_orientation;
        }

        self.drift.advance();
        self.sync_speeds();

        let [sx, sy, sz] = self.state.current_speed;
        let qx = Quaternion::from_axis_angle(AXES[0], sx * delta);
        let qy = Quaternion::from_axis_angle(AXES[1], sy * delta);
        let qz = Quaternion::from_axis_angle(AXES[2], sz * delta);

        // Z applied first, then Y, then X, all about world axes.
        let increment = qx * qy * qz;
        (increment * self.state.current_orientation).normalize()
    }

    fn sync_speeds(&mut self) {
        self.state.current_speed = self.drift.current_speed();
        self.state.target_speed = self.drift.target_speed();
    }
}
