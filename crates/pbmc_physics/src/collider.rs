//! Collision shapes

use rapier3d::prelude as rapier;
use serde::{Deserialize, Serialize};

/// Collision shape type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColliderShape {
    /// Sphere with radius
    Sphere { radius: f32 },
    /// Box with half-extents
    Box { half_extents: [f32; 3] },
    /// Capsule aligned along Z axis
    Capsule { half_height: f32, radius: f32 },
}

impl Default for ColliderShape {
    fn default() -> Self {
        Self::Box {
            half_extents: [0.5, 0.5, 0.5],
        }
    }
}

impl ColliderShape {
    /// Create a sphere shape
    pub fn sphere(radius: f32) -> Self {
        Self::Sphere { radius }
    }

    /// Create a box shape from half-extents
    pub fn cuboid(hx: f32, hy: f32, hz: f32) -> Self {
        Self::Box {
            half_extents: [hx, hy, hz],
        }
    }

    /// Create a box shape from full size
    pub fn from_size(width: f32, depth: f32, height: f32) -> Self {
        Self::cuboid(width * 0.5, depth * 0.5, height * 0.5)
    }

    /// Create a capsule shape (Z-aligned)
    pub fn capsule(half_height: f32, radius: f32) -> Self {
        Self::Capsule { half_height, radius }
    }

    /// Whether every dimension is positive and finite
    pub fn is_valid(&self) -> bool {
        let ok = |v: f32| v.is_finite() && v > 0.0;
        match self {
            Self::Sphere { radius } => ok(*radius),
            Self::Box { half_extents } => half_extents.iter().all(|h| ok(*h)),
            Self::Capsule { half_height, radius } => ok(*half_height) && ok(*radius),
        }
    }

    /// Build a Rapier shared shape
    pub(crate) fn to_rapier(&self) -> rapier::SharedShape {
        match self {
            Self::Sphere { radius } => rapier::SharedShape::ball(*radius),
            Self::Box { half_extents } => {
                rapier::SharedShape::cuboid(half_extents[0], half_extents[1], half_extents[2])
            }
            Self::Capsule { half_height, radius } => {
                rapier::SharedShape::capsule_z(*half_height, *radius)
            }
        }
    }
}
