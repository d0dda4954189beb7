/// Numerical epsilon for near-zero comparisons
pub const EPSILON: f64 = 1e-10;

/// SLERP near-parallel threshold. Above this dot product the sine formula
/// divides by a vanishing sin(θ), so interpolation falls back to NLERP.
pub const SLERP_THRESHOLD: f64 = 0.9995;

/// Pointer directions closer than this to the forward axis (radians) leave
/// the orientation unchanged.
pub const MIN_ROTATION_ANGLE: f64 = 0.001;

/// Fixed reference axis the tracked object faces with identity orientation.
pub const FORWARD: [f64; 3] = [0.0, 0.0, 1.0];

/// Rotation axes for autonomous drift, indexed X, Y, Z.
pub const AXES: [[f64; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// Assumed frame rate the interpolation rate is tuned for (frames/s).
pub const TARGET_FRAME_RATE: f64 = 60.0;

/// Fraction of the remaining arc covered per target-rate frame while tracking.
pub const INTERPOLATION_RATE: f64 = 0.08;

/// Fraction of the speed gap closed per frame by the drift generator.
pub const SMOOTHING_FACTOR: f64 = 0.02;

/// Seconds without pointer movement before tracking reverts to drift.
pub const IDLE_TIMEOUT: f64 = 3.0;

/// Seconds after start during which no rotation is applied.
pub const INITIAL_HOLD: f64 = 1.0;

/// Dwell range (seconds) a drift target speed is held before re-randomizing.
pub const MIN_HOLD: f64 = 3.0;
pub const MAX_HOLD: f64 = 8.0;

/// Virtual eye distance (pixels) used to lift the 2D pointer into 3D.
pub const PERSPECTIVE_DEPTH: f64 = 800.0;
