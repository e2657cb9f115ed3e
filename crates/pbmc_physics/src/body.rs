//! Body descriptions and glam/nalgebra conversions

use crate::collider::ColliderShape;
use glam::{Quat, Vec3};
use pbmc_core::{BodyKind, Mobility, Pose};
use rapier3d::na::{Quaternion, UnitQuaternion};
use rapier3d::prelude as rapier;
use serde::{Deserialize, Serialize};

/// Description for creating a body with a single solid collider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyDesc {
    pub kind: BodyKind,
    pub mobility: Mobility,
    /// Initial position
    pub position: [f32; 3],
    /// Initial rotation (quaternion: x, y, z, w)
    pub rotation: [f32; 4],
    pub shape: ColliderShape,
    /// Mass in kilograms
    pub mass: f32,
    /// Driven by the simulation (kinematic otherwise)
    pub simulate: bool,
    pub gravity: bool,
    /// Takes part in overlap events
    pub generate_overlaps: bool,
}

impl Default for BodyDesc {
    fn default() -> Self {
        Self {
            kind: BodyKind::StaticMesh,
            mobility: Mobility::Movable,
            position: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0, 1.0],
            shape: ColliderShape::default(),
            mass: 1.0,
            simulate: true,
            gravity: true,
            generate_overlaps: true,
        }
    }
}

impl BodyDesc {
    /// Simulated static-mesh prop
    pub fn prop(shape: ColliderShape, mass: f32) -> Self {
        Self {
            shape,
            mass,
            ..Default::default()
        }
    }

    /// Skeletal hand mesh, kinematic until a follower takes it over
    pub fn hand(shape: ColliderShape) -> Self {
        Self {
            kind: BodyKind::SkeletalMesh,
            shape,
            simulate: false,
            gravity: false,
            ..Default::default()
        }
    }

    /// Immovable level geometry
    pub fn fixed(shape: ColliderShape) -> Self {
        Self {
            mobility: Mobility::Static,
            simulate: false,
            shape,
            ..Default::default()
        }
    }

    /// Set position
    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = [x, y, z];
        self
    }

    /// Set rotation
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation.to_array();
        self
    }

    pub fn pose(&self) -> Pose {
        Pose::from_arrays(self.position, self.rotation)
    }
}

/// Rapier body type for a body's current state
pub(crate) fn body_type(mobility: Mobility, simulating: bool, attached: bool) -> rapier::RigidBodyType {
    match mobility {
        Mobility::Static => rapier::RigidBodyType::Fixed,
        Mobility::Movable if simulating && !attached => rapier::RigidBodyType::Dynamic,
        _ => rapier::RigidBodyType::KinematicPositionBased,
    }
}

#[inline]
pub(crate) fn to_vector(v: Vec3) -> rapier::Vector<f32> {
    rapier::Vector::new(v.x, v.y, v.z)
}

#[inline]
pub(crate) fn from_vector(v: &rapier::Vector<f32>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

pub(crate) fn to_isometry(pose: &Pose) -> rapier::Isometry<f32> {
    let q = pose.rotation;
    rapier::Isometry::from_parts(
        rapier::Translation::new(pose.position.x, pose.position.y, pose.position.z),
        UnitQuaternion::from_quaternion(Quaternion::new(q.w, q.x, q.y, q.z)),
    )
}

pub(crate) fn from_isometry(iso: &rapier::Isometry<f32>) -> Pose {
    let rot = iso.rotation;
    Pose::new(
        from_vector(&iso.translation.vector),
        Quat::from_xyzw(rot.i, rot.j, rot.k, rot.w),
    )
}
