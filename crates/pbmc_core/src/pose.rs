//! World-space poses and rotation error

use glam::{Quat, Vec3};
use core::ops::Mul;

/// Position + orientation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Pose {
    /// Origin, no rotation
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    #[inline]
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    #[inline]
    pub fn from_position(position: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY)
    }

    /// Build from plain arrays (rotation as x, y, z, w)
    pub fn from_arrays(position: [f32; 3], rotation: [f32; 4]) -> Self {
        Self::new(
            Vec3::from_array(position),
            Quat::from_array(rotation).normalize(),
        )
    }

    /// Plain arrays (rotation as x, y, z, w)
    pub fn to_arrays(&self) -> ([f32; 3], [f32; 4]) {
        (self.position.to_array(), self.rotation.to_array())
    }

    /// Apply `self` after `local`: the world pose of `local` expressed in `self`'s frame
    pub fn compose(&self, local: &Pose) -> Pose {
        Pose {
            position: self.position + self.rotation * local.position,
            rotation: (self.rotation * local.rotation).normalize(),
        }
    }

    pub fn inverse(&self) -> Pose {
        let inv = self.rotation.inverse();
        Pose {
            position: inv * -self.position,
            rotation: inv,
        }
    }

    /// This pose expressed relative to `parent`
    pub fn relative_to(&self, parent: &Pose) -> Pose {
        parent.inverse().compose(self)
    }

    #[inline]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.position + self.rotation * point
    }

    /// Compare within a tolerance
    pub fn abs_diff_eq(&self, other: &Pose, eps: f32) -> bool {
        self.position.abs_diff_eq(other.position, eps)
            && rotation_error(self.rotation, other.rotation).length() <= eps
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Pose {
    type Output = Pose;

    fn mul(self, rhs: Pose) -> Pose {
        self.compose(&rhs)
    }
}

/// Rotation that takes `current` to `target`, as axis * angle (radians).
///
/// Always the shortest arc: the angle lies in `[0, π]` regardless of the
/// quaternion signs, so there is no discontinuity at the 180° boundary beyond
/// the axis choice itself.
pub fn rotation_error(current: Quat, target: Quat) -> Vec3 {
    let mut delta = (target * current.inverse()).normalize();
    if delta.w < 0.0 {
        delta = Quat::from_xyzw(-delta.x, -delta.y, -delta.z, -delta.w);
    }

    let v = delta.xyz();
    let sin_half = v.length();
    if sin_half <= f32::EPSILON {
        return Vec3::ZERO;
    }

    let angle = 2.0 * sin_half.atan2(delta.w);
    v * (angle / sin_half)
}
