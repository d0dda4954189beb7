//! Autonomous drift: three per-axis angular speeds that wander between
//! randomly chosen targets and are eased toward them every frame.

use rand::Rng;

use crate::config::{DriftConfig, Range};

/// Rotation axis index for the drift generator and its dwell timers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Uniform sample in `[min, max]`. A degenerate range yields `min`.
///
/// Never panics: a NaN or infinite bound falls back to the finite bound (or
/// 0), and a span too wide to represent yields the midpoint.
fn sample(range: Range, rng: &mut impl Rng) -> f64 {
    let Range { min, max } = range;
    if !(min.is_finite() && max.is_finite()) {
        return [min, max].into_iter().find(|v| v.is_finite()).unwrap_or(0.0);
    }
    if max <= min {
        return min;
    }
    if !(max - min).is_finite() {
        return min / 2.0 + max / 2.0;
    }
    rng.random_range(min..=max)
}

#[derive(Clone, Debug)]
pub struct DriftGenerator {
    ranges: [Range; 3],
    dwell: Range,
    smoothing_factor: f64,
    current_speed: [f64; 3],
    target_speed: [f64; 3],
}

impl DriftGenerator {
    pub fn new(config: &DriftConfig) -> Self {
        Self {
            ranges: config.speed_ranges(),
            dwell: config.dwell,
            smoothing_factor: config.smoothing_factor,
            current_speed: [0.0; 3],
            target_speed: [0.0; 3],
        }
    }

    /// Pick a starting target per axis and start each current speed on it.
    pub fn initialize(&mut self, rng: &mut impl Rng) {
        for axis in Axis::ALL {
            let i = axis.index();
            self.target_speed[i] = sample(self.ranges[i], rng);
            self.current_speed[i] = self.target_speed[i];
        }
    }

    /// Choose a new target speed for `axis`. Returns how long (s) to hold it.
    pub fn retarget(&mut self, axis: Axis, rng: &mut impl Rng) -> f64 {
        let i = axis.index();
        self.target_speed[i] = sample(self.ranges[i], rng);
        tracing::debug!(?axis, target = self.target_speed[i], "drift retarget");
        self.dwell_duration(rng)
    }

    pub fn dwell_duration(&self, rng: &mut impl Rng) -> f64 {
        sample(self.dwell, rng)
    }

    /// Ease every current speed toward its target by the smoothing factor.
    pub fn advance(&mut self) {
        for (current, target) in self.current_speed.iter_mut().zip(self.target_speed) {
            *current += (target - *current) * self.smoothing_factor;
        }
    }

    pub fn current_speed(&self) -> [f64; 3] {
        self.current_speed
    }

    pub fn target_speed(&self) -> [f64; 3] {
        self.target_speed
    }
}
