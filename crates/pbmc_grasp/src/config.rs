//! Grasp configuration

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid grasp limits
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraspConfigError {
    #[error("max_mass must be positive and finite, got {0}")]
    MaxMass(f32),

    #[error("max_length must be positive and finite, got {0}")]
    MaxLength(f32),

    #[error("volume_radius must be positive and finite, got {0}")]
    VolumeRadius(f32),
}

/// Grasp limits, set once before activation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraspConfig {
    /// Objects must weigh strictly less than this
    pub max_mass: f32,

    /// Bounding-box diagonal must be strictly shorter than this
    pub max_length: f32,

    /// Weld fixated objects into the hand's physics body
    pub weld_fixation: bool,

    /// Radius of the grasp volume created around the hand anchor
    pub volume_radius: f32,
}

impl Default for GraspConfig {
    fn default() -> Self {
        Self {
            max_mass: 15.0,
            max_length: 50.0,
            weld_fixation: true,
            volume_radius: 3.0,
        }
    }
}

impl GraspConfig {
    /// Set the mass limit
    pub fn with_max_mass(mut self, max_mass: f32) -> Self {
        self.max_mass = max_mass;
        self
    }

    /// Set the size limit
    pub fn with_max_length(mut self, max_length: f32) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn with_weld(mut self, weld: bool) -> Self {
        self.weld_fixation = weld;
        self
    }

    pub fn validate(&self) -> Result<(), GraspConfigError> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.max_mass) {
            return Err(GraspConfigError::MaxMass(self.max_mass));
        }
        if !positive(self.max_length) {
            return Err(GraspConfigError::MaxLength(self.max_length));
        }
        if !positive(self.volume_radius) {
            return Err(GraspConfigError::VolumeRadius(self.volume_radius));
        }
        Ok(())
    }
}
