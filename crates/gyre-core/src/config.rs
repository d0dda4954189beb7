use serde::{Deserialize, Serialize};

use crate::constants::{
    IDLE_TIMEOUT, INITIAL_HOLD, INTERPOLATION_RATE, MAX_HOLD, MIN_HOLD, MIN_ROTATION_ANGLE,
    PERSPECTIVE_DEPTH, SLERP_THRESHOLD, SMOOTHING_FACTOR, TARGET_FRAME_RATE,
};

/// Closed interval `[min, max]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }

    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

/// Autonomous drift tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftConfig {
    pub smoothing_factor: f64,
    /// Seconds after start with no rotation applied.
    pub initial_hold: f64,
    /// Angular speed ranges (rad/s) for the X, Y and Z axes.
    pub speed_x: Range,
    pub speed_y: Range,
    pub speed_z: Range,
    /// How long (s) each target speed is held.
    pub dwell: Range,
}

impl DriftConfig {
    pub fn speed_ranges(&self) -> [Range; 3] {
        [self.speed_x, self.speed_y, self.speed_z]
    }
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            smoothing_factor: SMOOTHING_FACTOR,
            initial_hold: INITIAL_HOLD,
            speed_x: Range::new(0.05, 0.25),
            speed_y: Range::new(0.15, 0.45),
            speed_z: Range::new(-0.1, 0.1),
            dwell: Range::new(MIN_HOLD, MAX_HOLD),
        }
    }
}

/// Pointer tracking tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    pub idle_timeout: f64,
    pub interpolation_rate: f64,
    pub target_frame_rate: f64,
    pub min_rotation_angle: f64,
    pub perspective_depth: f64,
    /// Dot product above which SLERP falls back to NLERP.
    pub slerp_threshold: f64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            idle_timeout: IDLE_TIMEOUT,
            interpolation_rate: INTERPOLATION_RATE,
            target_frame_rate: TARGET_FRAME_RATE,
            min_rotation_angle: MIN_ROTATION_ANGLE,
            perspective_depth: PERSPECTIVE_DEPTH,
            slerp_threshold: SLERP_THRESHOLD,
        }
    }
}

/// Every tunable constant of the engine.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub drift: DriftConfig,
    pub tracking: TrackingConfig,
}

impl EngineConfig {
    /// Check every value is in a usable range. Returns the first problem.
    pub fn validate(&self) -> Result<(), String> {
        let d = &self.drift;
        for (name, r) in [
            ("drift.speed_x", d.speed_x),
            ("drift.speed_y", d.speed_y),
            ("drift.speed_z", d.speed_z),
        ] {
            if !r.is_valid() {
                return Err(format!("{name}: expected finite min <= max, got {r:?}"));
            }
        }
        if !d.dwell.is_valid() || d.dwell.min <= 0.0 {
            return Err(format!(
                "drift.dwell: expected 0 < min <= max, got {:?}",
                d.dwell
            ));
        }
        if !(d.smoothing_factor > 0.0 && d.smoothing_factor <= 1.0) {
            return Err(format!(
                "drift.smoothing_factor: expected (0, 1], got {}",
                d.smoothing_factor
            ));
        }
        non_negative("drift.initial_hold", d.initial_hold)?;

        let t = &self.tracking;
        positive("tracking.idle_timeout", t.idle_timeout)?;
        positive("tracking.interpolation_rate", t.interpolation_rate)?;
        positive("tracking.target_frame_rate", t.target_frame_rate)?;
        non_negative("tracking.min_rotation_angle", t.min_rotation_angle)?;
        positive("tracking.perspective_depth", t.perspective_depth)?;

        let s = t.slerp_threshold;
        if !(s > 0.0 && s < 1.0) {
            return Err(format!("tracking.slerp_threshold: expected (0, 1), got {s}"));
        }
        Ok(())
    }
}

fn positive(name: &str, v: f64) -> Result<(), String> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(format!("{name}: expected a positive number, got {v}"))
    }
}

fn non_negative(name: &str, v: f64) -> Result<(), String> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(format!("{name}: expected a non-negative number, got {v}"))
    }
}
