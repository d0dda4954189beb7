//! Invariants of the quaternion algebra over generated inputs.

use gyre_core::Quaternion;
use proptest::prelude::*;

fn unit_axis() -> impl Strategy<Value = [f64; 3]> {
    (-1.0f64..1.0, -1.0f64..1.0, -1.0f64..1.0)
        .prop_filter("axis too short", |(x, y, z)| x * x + y * y + z * z > 1e-4)
        .prop_map(|(x, y, z)| {
            let len = (x * x + y * y + z * z).sqrt();
            [x / len, y / len, z / len]
        })
}

fn rotation() -> impl Strategy<Value = Quaternion> {
    (unit_axis(), -10.0f64..10.0).prop_map(|(axis, angle)| Quaternion::from_axis_angle(axis, angle))
}

fn max_diff(a: Quaternion, b: Quaternion) -> f64 {
    a.to_array()
        .iter()
        .zip(b.to_array())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

proptest! {
    #[test]
    fn from_axis_angle_is_unit(axis in unit_axis(), angle in -10.0f64..10.0) {
        let q = Quaternion::from_axis_angle(axis, angle);
        prop_assert!((q.norm() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn slerp_stays_on_unit_sphere(a in rotation(), b in rotation(), t in 0.0f64..=1.0) {
        let q = a.slerp(b, t);
        prop_assert!((q.norm() - 1.0).abs() < 1e-6, "norm {}", q.norm());
    }

    #[test]
    fn slerp_hits_endpoints(a in rotation(), b in rotation()) {
        // Endpoints are compared on the short-arc representative of b
        let b = if a.dot(b) < 0.0 { -b } else { b };
        prop_assert!(max_diff(a.slerp(b, 0.0), a) < 1e-4);
        prop_assert!(max_diff(a.slerp(b, 1.0), b) < 1e-4);
    }

    #[test]
    fn slerp_far_endpoint_is_same_rotation(a in rotation(), b in rotation()) {
        prop_assert!(a.slerp(b, 1.0).angular_distance(b) < 1e-3);
    }

    #[test]
    fn slerp_antipodal_is_non_degenerate(q in rotation(), t in 0.0f64..=1.0) {
        let r = q.slerp(-q, t);
        prop_assert!(r.is_finite());
        prop_assert!((r.norm() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn rotation_matrix_is_orthonormal(axis in unit_axis(), angle in -10.0f64..10.0) {
        let m = Quaternion::from_axis_angle(axis, angle).to_mat3();
        prop_assert!(m.is_orthonormal(1e-6), "{m:?}");
    }

    #[test]
    fn mat4_block_matches_mat3(q in rotation()) {
        let m3 = q.to_mat3();
        let m4 = q.to_mat4();
        for r in 0..3 {
            for c in 0..3 {
                prop_assert!((m3.get(r, c) - m4.get(r, c)).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn product_of_rotations_is_unit(a in rotation(), b in rotation()) {
        prop_assert!(((a * b).norm() - 1.0).abs() < 1e-9);
    }
}
