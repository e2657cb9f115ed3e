//! Grasp eligibility

use crate::config::GraspConfig;
use pbmc_core::{BodyId, Mobility, RigidBodies};

/// The properties of a body that decide whether it can be grasped
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraspCandidate {
    pub mobility: Mobility,
    pub simulating: bool,
    pub mass: f32,
    /// Length of the world bounding-box diagonal
    pub diagonal: f32,
}

impl GraspCandidate {
    /// Read a body's current properties. `None` if the body is gone.
    pub fn capture<S>(scene: &S, body: BodyId) -> Option<Self>
    where
        S: RigidBodies + ?Sized,
    {
        if !scene.contains(body) {
            return None;
        }
        Some(Self {
            mobility: scene.mobility(body).ok()?,
            simulating: scene.is_simulating(body).ok()?,
            mass: scene.mass(body).ok()?,
            diagonal: scene.bounds(body).ok()?.diagonal(),
        })
    }
}

/// Movable, simulating, lighter than `max_mass` and shorter than
/// `max_length`. Both limits are strict.
pub fn can_be_grasped(candidate: &GraspCandidate, config: &GraspConfig) -> bool {
    candidate.mobility.is_movable()
        && candidate.simulating
        && candidate.mass < config.max_mass
        && candidate.diagonal < config.max_length
}
