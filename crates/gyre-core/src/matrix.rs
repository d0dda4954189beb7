//! Read-only rotation matrices derived from a [`Quaternion`](crate::Quaternion).
//!
//! Storage is column-major: element (row r, column c) lives at `c * n + r`.

use serde::{Deserialize, Serialize};

/// 3×3 rotation matrix, column-major.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mat3(pub [f64; 9]);

/// 4×4 homogeneous rotation matrix, column-major. The last row and column
/// are always (0, 0, 0, 1).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mat4(pub [f64; 16]);

impl Mat3 {
    pub fn from_columns(cols: [[f64; 3]; 3]) -> Self {
        let mut m = [0.0; 9];
        for (c, col) in cols.iter().enumerate() {
            m[c * 3..c * 3 + 3].copy_from_slice(col);
        }
        Self(m)
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.0[col * 3 + row]
    }

    pub fn column(&self, col: usize) -> [f64; 3] {
        [self.0[col * 3], self.0[col * 3 + 1], self.0[col * 3 + 2]]
    }

    pub fn as_array(&self) -> &[f64; 9] {
        &self.0
    }

    /// Matrix-vector product.
    pub fn transform(&self, v: [f64; 3]) -> [f64; 3] {
        let mut out = [0.0; 3];
        for (c, vc) in v.iter().enumerate() {
            let col = self.column(c);
            for (o, cr) in out.iter_mut().zip(col) {
                *o += cr * vc;
            }
        }
        out
    }

    /// Columns are unit length and pairwise orthogonal within `tol`.
    pub fn is_orthonormal(&self, tol: f64) -> bool {
        let cols = [self.column(0), self.column(1), self.column(2)];
        for i in 0..3 {
            if (dot3(cols[i], cols[i]).sqrt() - 1.0).abs() > tol {
                return false;
            }
            for j in (i + 1)..3 {
                if dot3(cols[i], cols[j]).abs() > tol {
                    return false;
                }
            }
        }
        true
    }
}

impl Mat4 {
    /// Embed a rotation (given as columns) into a homogeneous matrix.
    pub fn from_rotation(cols: [[f64; 3]; 3]) -> Self {
        let mut m = [0.0; 16];
        for (c, col) in cols.iter().enumerate() {
            m[c * 4..c * 4 + 3].copy_from_slice(col);
        }
        m[15] = 1.0;
        Self(m)
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.0[col * 4 + row]
    }

    pub fn as_array(&self) -> &[f64; 16] {
        &self.0
    }

    pub fn top_left_3x3(&self) -> Mat3 {
        let m = &self.0;
        Mat3::from_columns([
            [m[0], m[1], m[2]],
            [m[4], m[5], m[6]],
            [m[8], m[9], m[10]],
        ])
    }

    /// CSS `matrix3d(...)` text. CSS lists the 16 values column by column,
    /// which is exactly the storage order.
    pub fn to_css_matrix3d(&self) -> String {
        let values: Vec<String> = self.0.iter().map(|v| format!("{v:.6}")).collect();
        format!("matrix3d({})", values.join(", "))
    }
}

pub(crate) fn dot3(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub(crate) fn cross3(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Normalize a 3-vector. A zero vector is returned unchanged.
///
/// Components are scaled by the largest magnitude first so the squared
/// length cannot overflow for huge inputs.
pub(crate) fn normalize3(v: [f64; 3]) -> [f64; 3] {
    let scale = v.iter().fold(0.0_f64, |m, c| m.max(c.abs()));
    if scale == 0.0 {
        return v;
    }
    let s = [v[0] / scale, v[1] / scale, v[2] / scale];
    let len = dot3(s, s).sqrt();
    [s[0] / len, s[1] / len, s[2] / len]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Quaternion;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_identity_matrices() {
        let q = Quaternion::identity();
        assert_eq!(
            q.to_mat3().0,
            [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]
        );
        let m4 = q.to_mat4();
        for r in 0..4 {
            for c in 0..4 {
                let expected = if r == c { 1.0 } else { 0.0 };
                assert_eq!(m4.get(r, c), expected);
            }
        }
    }

    #[test]
    fn test_orthonormal_for_random_axis_angles() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..64 {
            let axis = normalize3([
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
            ]);
            let angle = rng.random_range(-10.0..10.0);
            let m = Quaternion::from_axis_angle(axis, angle).to_mat3();
            assert!(m.is_orthonormal(1e-6), "not orthonormal: {m:?}");
        }
    }

    #[test]
    fn test_mat4_agrees_with_mat3() {
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..32 {
            let q = Quaternion::random(&mut rng);
            let m3 = q.to_mat3();
            let m4 = q.to_mat4();
            for r in 0..3 {
                for c in 0..3 {
                    assert!((m3.get(r, c) - m4.get(r, c)).abs() < 1e-6);
                }
                assert_eq!(m4.get(r, 3), 0.0);
                assert_eq!(m4.get(3, r), 0.0);
            }
            assert_eq!(m4.get(3, 3), 1.0);
            assert_eq!(m4.top_left_3x3(), m3);
        }
    }

    #[test]
    fn test_css_matrix3d_format() {
        let css = Quaternion::identity().to_mat4().to_css_matrix3d();
        assert!(css.starts_with("matrix3d(1.000000, 0.000000"));
        assert!(css.ends_with("1.000000)"));
        assert_eq!(css.matches(',').count(), 15);
    }

    #[test]
    fn test_normalize3_zero_is_finite() {
        assert_eq!(normalize3([0.0, 0.0, 0.0]), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_cross_right_handed() {
        assert_eq!(cross3([1.0, 0.0, 0.0], [0.0, 1.0, 0.0]), [0.0, 0.0, 1.0]);
    }
}
