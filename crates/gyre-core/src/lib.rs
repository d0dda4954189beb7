//! Quaternion orientation engine.
//!
//! Drives one object's 3D orientation: it drifts on its own at slowly
//! wandering per-axis speeds, and turns to face the pointer while the pointer
//! is moving. An idle timer hands control back to the drift.
//!
//! Zero I/O: time, input and rendering come in through the [`host`] traits.

pub mod config;
pub mod constants;
pub mod drift;
pub mod driver;
pub mod host;
pub mod matrix;
pub mod quaternion;
pub mod resolver;
pub mod timer;

pub use config::{DriftConfig, EngineConfig, Range, TrackingConfig};
pub use constants::{EPSILON, FORWARD, MIN_ROTATION_ANGLE, SLERP_THRESHOLD};
pub use drift::{Axis, DriftGenerator};
pub use driver::{AnimationState, Driver, Mode};
pub use host::{
    Clock, InputSource, InstantClock, ManualClock, NullInput, PointerSample, RecordingSink,
    RenderSink, ScriptedInput, Transform,
};
pub use matrix::{Mat3, Mat4};
pub use quaternion::{AxisAngle, Quaternion};
pub use resolver::{PointerPosition, TargetResolver, Viewport, resolve_target};
pub use timer::{TimerId, TimerSet};
