//! Body identities and per-body descriptors

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-owning reference to a body (or trigger volume) in the scene
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u64);

impl BodyId {
    /// Create from a raw value
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw value
    #[inline]
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BodyId({})", self.0)
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What kind of mesh a body belongs to.
///
/// Doubles as the follower's target-source selector: a follower drives
/// exactly one kind of mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyKind {
    /// Rigid prop; the only kind a grasp volume reacts to
    StaticMesh,
    /// Articulated mesh such as a hand
    #[default]
    SkeletalMesh,
}

/// Transform mobility of a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mobility {
    /// Never moves
    Static,
    /// Moves only through editing, not at runtime
    Stationary,
    /// Free to move at runtime
    #[default]
    Movable,
}

impl Mobility {
    /// Whether the transform may change at runtime
    #[inline]
    pub fn is_movable(self) -> bool {
        self == Mobility::Movable
    }
}

/// How a child is attached to its parent.
///
/// Attachment always keeps the child's current world pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttachRule {
    /// Merge the child into the parent's physics body
    pub weld: bool,
}

impl AttachRule {
    /// Keep world pose, keep separate physics bodies
    pub const KEEP_WORLD: Self = Self { weld: false };

    /// Keep world pose and weld
    pub const KEEP_WORLD_WELDED: Self = Self { weld: true };
}

/// World-space axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box of the given full size centred on a point
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self::new(center - half, center + half)
    }

    /// Extent along each axis
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Length of the box diagonal
    #[inline]
    pub fn diagonal(&self) -> f32 {
        self.size().length()
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Smallest box containing both
    pub fn union(&self, other: &Bounds) -> Self {
        Self::new(self.min.min(other.min), self.max.max(other.max))
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_diagonal() {
        let b = Bounds::from_center_size(Vec3::ZERO, Vec3::new(3.0, 4.0, 12.0));
        assert!((b.diagonal() - 13.0).abs() < 1e-5);
    }

    #[test]
    fn test_bounds_union() {
        let a = Bounds::new(Vec3::ZERO, Vec3::ONE);
        let b = Bounds::new(Vec3::splat(-1.0), Vec3::splat(0.5));
        let u = a.union(&b);
        assert_eq!(u.min, Vec3::splat(-1.0));
        assert_eq!(u.max, Vec3::ONE);
        assert!(u.contains_point(Vec3::splat(0.75)));
        assert!(!u.contains_point(Vec3::splat(2.0)));
    }

    #[test]
    fn test_mobility() {
        assert!(Mobility::Movable.is_movable());
        assert!(!Mobility::Stationary.is_movable());
        assert!(!Mobility::Static.is_movable());
    }
}
