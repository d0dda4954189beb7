use std::ops::Mul;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{EPSILON, SLERP_THRESHOLD};
use crate::matrix::{Mat3, Mat4};

/// Rotation quaternion (w, x, y, z).
///
/// Orientations are kept at unit norm. Intermediate values produced while
/// interpolating or composing may drift off the unit sphere; call
/// [`Quaternion::normalize`] before treating one as an orientation.
/// q and -q represent the same rotation.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct Quaternion {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl PartialEq for Quaternion {
    fn eq(&self, other: &Self) -> bool {
        (self.w - other.w).abs() < EPSILON
            && (self.x - other.x).abs() < EPSILON
            && (self.y - other.y).abs() < EPSILON
            && (self.z - other.z).abs() < EPSILON
    }
}

/// Unit rotation axis plus an angle in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisAngle {
    pub axis: [f64; 3],
    pub angle: f64,
}

impl AxisAngle {
    pub fn new(axis: [f64; 3], angle: f64) -> Self {
        Self { axis, angle }
    }
}

impl Quaternion {
    /// Raw components, not normalized.
    pub const fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    /// Identity quaternion (1, 0, 0, 0).
    pub const fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0)
    }

    /// Rotation of `angle` radians about `axis`.
    ///
    /// The axis must already be unit length; it is not renormalized here.
    pub fn from_axis_angle(axis: [f64; 3], angle: f64) -> Self {
        let half = angle / 2.0;
        let s = half.sin();
        Self {
            w: half.cos(),
            x: axis[0] * s,
            y: axis[1] * s,
            z: axis[2] * s,
        }
    }

    pub fn norm(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Normalize to unit length. A zero quaternion normalizes to identity.
    pub fn normalize(self) -> Self {
        let norm = self.norm();
        if norm == 0.0 {
            return Self::identity();
        }
        Self {
            w: self.w / norm,
            x: self.x / norm,
            y: self.y / norm,
            z: self.z / norm,
        }
    }

    /// 4D dot product.
    pub fn dot(self, other: Self) -> f64 {
        self.w * other.w + self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn conjugate(self) -> Self {
        Self {
            w: self.w,
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }

    pub fn is_finite(self) -> bool {
        self.w.is_finite() && self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Rotation angle between two orientations. Range: [0, π].
    /// Uses abs(dot) so q and -q are distance 0 apart.
    pub fn angular_distance(self, other: Self) -> f64 {
        let d = self.dot(other).abs().clamp(0.0, 1.0);
        2.0 * d.acos()
    }

    /// Spherical linear interpolation along the shorter arc, with NLERP
    /// fallback for nearly parallel inputs.
    ///
    /// `t` is not clamped. Callers pass values in [0, 1].
    pub fn slerp(self, other: Self, t: f64) -> Self {
        self.slerp_with_threshold(other, t, SLERP_THRESHOLD)
    }

    /// [`slerp`](Self::slerp) with an explicit near-parallel threshold.
    pub fn slerp_with_threshold(self, other: Self, t: f64, threshold: f64) -> Self {
        let mut dot = self.dot(other);
        let mut o = other;

        // Take shorter arc
        if dot < 0.0 {
            o = -other;
            dot = -dot;
        }

        // Near-parallel: NLERP fallback
        if dot > threshold {
            return Self {
                w: self.w + t * (o.w - self.w),
                x: self.x + t * (o.x - self.x),
                y: self.y + t * (o.y - self.y),
                z: self.z + t * (o.z - self.z),
            }
            .normalize();
        }

        let theta = dot.acos();
        let sin_theta = theta.sin();

        let s0 = ((1.0 - t) * theta).sin() / sin_theta;
        let s1 = (t * theta).sin() / sin_theta;

        Self {
            w: s0 * self.w + s1 * o.w,
            x: s0 * self.x + s1 * o.x,
            y: s0 * self.y + s1 * o.y,
            z: s0 * self.z + s1 * o.z,
        }
    }

    /// Columns of the rotation matrix for this quaternion.
    ///
    /// Both matrix forms are built from this one computation.
    fn basis(self) -> [[f64; 3]; 3] {
        let Self { w, x, y, z } = self;
        let (xx, yy, zz) = (x * x, y * y, z * z);
        let (xy, xz, yz) = (x * y, x * z, y * z);
        let (wx, wy, wz) = (w * x, w * y, w * z);

        [
            [1.0 - 2.0 * (yy + zz), 2.0 * (xy + wz), 2.0 * (xz - wy)],
            [2.0 * (xy - wz), 1.0 - 2.0 * (xx + zz), 2.0 * (yz + wx)],
            [2.0 * (xz + wy), 2.0 * (yz - wx), 1.0 - 2.0 * (xx + yy)],
        ]
    }

    /// 3×3 rotation matrix, column-major.
    pub fn to_mat3(self) -> Mat3 {
        Mat3::from_columns(self.basis())
    }

    /// 4×4 homogeneous rotation, column-major, no translation.
    pub fn to_mat4(self) -> Mat4 {
        Mat4::from_rotation(self.basis())
    }

    /// Rotate a 3-vector: v' = q v q*.
    pub fn rotate_vector(self, v: [f64; 3]) -> [f64; 3] {
        self.to_mat3().transform(v)
    }

    /// Uniform random orientation using Shoemake's method.
    pub fn random(rng: &mut impl Rng) -> Self {
        let s1: f64 = rng.random();
        let t1 = std::f64::consts::TAU * rng.random::<f64>();
        let t2 = std::f64::consts::TAU * rng.random::<f64>();

        let r1 = (1.0 - s1).sqrt();
        let r2 = s1.sqrt();

        Self {
            w: r1 * t1.sin(),
            x: r1 * t1.cos(),
            y: r2 * t2.sin(),
            z: r2 * t2.cos(),
        }
    }

    /// Convert to [w, x, y, z] array for serialization.
    pub fn to_array(self) -> [f64; 4] {
        [self.w, self.x, self.y, self.z]
    }

    /// Create from [w, x, y, z] array, as-is.
    pub fn from_array(arr: [f64; 4]) -> Self {
        Self::new(arr[0], arr[1], arr[2], arr[3])
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<AxisAngle> for Quaternion {
    fn from(aa: AxisAngle) -> Self {
        Self::from_axis_angle(aa.axis, aa.angle)
    }
}

impl From<[f64; 4]> for Quaternion {
    fn from(arr: [f64; 4]) -> Self {
        Self::from_array(arr)
    }
}

impl From<Quaternion> for [f64; 4] {
    fn from(q: Quaternion) -> Self {
        q.to_array()
    }
}

impl std::ops::Neg for Quaternion {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            w: -self.w,
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

/// Hamilton product.
///
/// Composition order: `a * b` applies `b` first, then `a`. Left-multiplying
/// an incremental rotation onto an orientation therefore rotates it about
/// world axes; right-multiplying rotates about the object's local axes.
impl Mul for Quaternion {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self {
            w: self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
            x: self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            y: self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            z: self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(42)
    }

    fn assert_unit(q: Quaternion) {
        let norm = q.norm();
        assert!(
            (norm - 1.0).abs() < 1e-10,
            "quaternion not unit: norm = {norm}"
        );
    }

    fn assert_approx_eq(a: Quaternion, b: Quaternion, tol: f64) {
        let diff = (a.w - b.w)
            .abs()
            .max((a.x - b.x).abs())
            .max((a.y - b.y).abs())
            .max((a.z - b.z).abs());
        assert!(
            diff < tol,
            "quaternions not approx equal: {a:?} vs {b:?} (diff = {diff})"
        );
    }

    #[test]
    fn test_identity_exact() {
        assert_eq!(Quaternion::identity().to_array(), [1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_from_axis_angle_quarter_turn_z() {
        let q = Quaternion::from_axis_angle([0.0, 0.0, 1.0], FRAC_PI_2);
        let expected = Quaternion::new(0.707_106_78, 0.0, 0.0, 0.707_106_78);
        assert_approx_eq(q, expected, 1e-6);
    }

    #[test]
    fn test_from_axis_angle_struct() {
        let aa = AxisAngle::new([1.0, 0.0, 0.0], PI);
        let q = Quaternion::from(aa);
        assert_approx_eq(q, Quaternion::new(0.0, 1.0, 0.0, 0.0), 1e-12);
        assert_eq!(q, Quaternion::from_axis_angle(aa.axis, aa.angle));
    }

    #[test]
    fn test_from_axis_angle_zero_is_identity() {
        let q = Quaternion::from_axis_angle([0.0, 1.0, 0.0], 0.0);
        assert_eq!(q.to_array(), [1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_normalize_exact() {
        let q = Quaternion::new(2.0, 0.0, 0.0, 0.0).normalize();
        assert_eq!(q.to_array(), [1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_normalize_zero_falls_back_to_identity() {
        let q = Quaternion::new(0.0, 0.0, 0.0, 0.0).normalize();
        assert_eq!(q.to_array(), [1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_dot_product() {
        let a = Quaternion::identity();
        assert!((a.dot(a) - 1.0).abs() < EPSILON);

        let c = Quaternion::new(0.0, 1.0, 0.0, 0.0);
        assert!(a.dot(c).abs() < EPSILON);
    }

    #[test]
    fn test_angular_distance_antipodal() {
        let a = Quaternion::from_axis_angle([1.0, 0.0, 0.0], 1.0);
        assert!(a.angular_distance(-a) < 1e-7);
    }

    #[test]
    fn test_slerp_endpoints() {
        let mut rng = rng();
        for _ in 0..20 {
            let a = Quaternion::random(&mut rng);
            let mut b = Quaternion::random(&mut rng);
            // Endpoint identity holds on the short-arc representative
            if a.dot(b) < 0.0 {
                b = -b;
            }
            assert_approx_eq(a.slerp(b, 0.0), a, 1e-4);
            assert_approx_eq(a.slerp(b, 1.0), b, 1e-4);
        }
    }

    #[test]
    fn test_slerp_identity() {
        let mut rng = rng();
        let q = Quaternion::random(&mut rng);

        for t in [0.0, 0.25, 0.5, 0.75, 1.0] {
            assert_approx_eq(q.slerp(q, t), q, 1e-10);
        }
    }

    #[test]
    fn test_slerp_midpoint() {
        let a = Quaternion::identity();
        let b = Quaternion::from_axis_angle([1.0, 0.0, 0.0], FRAC_PI_2);
        let mid = a.slerp(b, 0.5);
        assert_unit(mid);

        let da = a.angular_distance(mid);
        let db = mid.angular_distance(b);
        assert!(
            (da - db).abs() < 1e-9,
            "midpoint not equidistant: {da} vs {db}"
        );
        assert!((da - PI / 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_slerp_antipodal_is_not_degenerate() {
        let q = Quaternion::from_axis_angle([0.0, 1.0, 0.0], 0.7);
        let mid = q.slerp(-q, 0.5);
        assert!(mid.norm() > 0.5, "antipodal slerp collapsed: {mid:?}");
        assert_unit(mid);
        assert!(mid.angular_distance(q) < 1e-7);
    }

    #[test]
    fn test_slerp_takes_short_arc() {
        let a = Quaternion::identity();
        let b = -Quaternion::from_axis_angle([0.0, 0.0, 1.0], 0.4);
        let mid = a.slerp(b, 0.5);
        assert!(
            (a.angular_distance(mid) - 0.2).abs() < 1e-9,
            "long-way spin: {mid:?}"
        );
    }

    #[test]
    fn test_slerp_near_parallel_nlerp_fallback() {
        let a = Quaternion::identity();
        let b = Quaternion::new(1.0, 0.0001, 0.0, 0.0).normalize();
        let mid = a.slerp(b, 0.5);
        assert_unit(mid);
    }

    #[test]
    fn test_hamilton_product_identity() {
        let mut rng = rng();
        let q = Quaternion::random(&mut rng);
        let id = Quaternion::identity();

        assert_approx_eq(q * id, q, 1e-12);
        assert_approx_eq(id * q, q, 1e-12);
    }

    #[test]
    fn test_hamilton_product_not_commutative() {
        let a = Quaternion::from_axis_angle([1.0, 0.0, 0.0], FRAC_PI_2);
        let b = Quaternion::from_axis_angle([0.0, 1.0, 0.0], FRAC_PI_2);
        assert_ne!(a * b, b * a);
    }

    #[test]
    fn test_product_applies_right_operand_first() {
        // Rotate +X by 90° about Z → +Y, then 90° about X → +Z
        let about_z = Quaternion::from_axis_angle([0.0, 0.0, 1.0], FRAC_PI_2);
        let about_x = Quaternion::from_axis_angle([1.0, 0.0, 0.0], FRAC_PI_2);
        let v = (about_x * about_z).rotate_vector([1.0, 0.0, 0.0]);
        assert!(v[0].abs() < 1e-12 && v[1].abs() < 1e-12 && (v[2] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rotate_vector_matches_sandwich_product() {
        let mut rng = rng();
        let q = Quaternion::random(&mut rng);
        let v = [0.3, -1.2, 2.5];
        let p = q * Quaternion::new(0.0, v[0], v[1], v[2]) * q.conjugate();
        let r = q.rotate_vector(v);
        assert!((p.x - r[0]).abs() < 1e-12);
        assert!((p.y - r[1]).abs() < 1e-12);
        assert!((p.z - r[2]).abs() < 1e-12);
    }

    #[test]
    fn test_serde_as_array() {
        let q = Quaternion::new(1.0, 0.0, 0.5, 0.0);
        let json = serde_json::to_string(&q).unwrap();
        assert_eq!(json, "[1.0,0.0,0.5,0.0]");
        let back: Quaternion = serde_json::from_str(&json).unwrap();
        assert_eq!(back, q);
    }
}
