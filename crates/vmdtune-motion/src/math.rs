//! Vector and quaternion primitives used by the interpolators.
//!
//! Positions and rotations are `glam`'s double-precision types; this module
//! only adds the conventions the keyframe engine relies on.

use glam::DVec4;

pub use glam::{DQuat as Quat, DVec3 as Vec3};

/// Component-wise linear interpolation of two points. `t` is not clamped.
pub fn lerp(p0: Vec3, p1: Vec3, t: f64) -> Vec3 {
    p0.lerp(p1, t)
}

/// Spherical linear interpolation along the shorter arc.
///
/// Returns `q0` and `q1` unchanged at `t <= 0` and `t >= 1`.
pub fn slerp(q0: Quat, q1: Quat, t: f64) -> Quat {
    if t <= 0.0 {
        return q0;
    }
    if t >= 1.0 {
        return q1;
    }
    let q1 = if q0.dot(q1) < 0.0 { -q1 } else { q1 };
    q0.slerp(q1, t).normalize()
}

/// Unit-length copy of `q`; the identity when `q` is zero or not finite.
pub fn normalize_rotation(q: Quat) -> Quat {
    DVec4::from(q)
        .try_normalize()
        .map_or(Quat::IDENTITY, Quat::from_vec4)
}
