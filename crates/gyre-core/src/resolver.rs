//! Pointer position → target orientation.
//!
//! The pointer is lifted into 3D as `(dx, dy, depth)` relative to the
//! viewport center, and the target is the rotation carrying the forward
//! axis onto that direction.

use serde::{Deserialize, Serialize};

use crate::constants::{FORWARD, MIN_ROTATION_ANGLE, PERSPECTIVE_DEPTH};
use crate::matrix::{cross3, dot3, normalize3};
use crate::quaternion::Quaternion;

/// Pointer position in viewport pixels, origin top-left.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl PointerPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> PointerPosition {
        PointerPosition::new(self.width / 2.0, self.height / 2.0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// Resolves pointer positions to target orientations.
#[derive(Clone, Copy, Debug)]
pub struct TargetResolver {
    pub perspective_depth: f64,
    pub min_rotation_angle: f64,
}

impl Default for TargetResolver {
    fn default() -> Self {
        Self {
            perspective_depth: PERSPECTIVE_DEPTH,
            min_rotation_angle: MIN_ROTATION_ANGLE,
        }
    }
}

impl TargetResolver {
    pub fn new(perspective_depth: f64, min_rotation_angle: f64) -> Self {
        Self {
            perspective_depth,
            min_rotation_angle,
        }
    }

    /// Orientation that turns the forward axis toward `pointer`.
    ///
    /// Returns `current` unchanged when the pointer is within the minimum
    /// rotation angle of forward, or when any input is non-finite.
    pub fn resolve(
        &self,
        pointer: PointerPosition,
        viewport: Viewport,
        current: Quaternion,
    ) -> Quaternion {
        let dx = pointer.x - viewport.width / 2.0;
        let dy = pointer.y - viewport.height / 2.0;
        let dir = normalize3([dx, dy, self.perspective_depth]);
        if !dir.iter().all(|c| c.is_finite()) {
            return current;
        }

        let angle = dot3(FORWARD, dir).clamp(-1.0, 1.0).acos();
        if angle < self.min_rotation_angle {
            return current;
        }

        let axis = normalize3(cross3(FORWARD, dir));
        Quaternion::from_axis_angle(axis, angle).normalize()
    }
}

/// Free-function form of [`TargetResolver::resolve`].
pub fn resolve_target(
    pointer: PointerPosition,
    viewport: Viewport,
    perspective_depth: f64,
    current: Quaternion,
) -> Quaternion {
    TargetResolver {
        perspective_depth,
        ..TargetResolver::default()
    }
    .resolve(pointer, viewport, current)
}
