//! Follower configuration

use crate::pid::PidGains;
use pbmc_core::BodyKind;
use serde::{Deserialize, Serialize};

/// How the PID outputs are applied to the body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlType {
    /// Acceleration-change force and torque
    #[default]
    Position,
    /// Outputs written directly as linear and angular velocity
    Velocity,
}

/// Pose follower configuration, set once before activation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowerConfig {
    pub control_type: ControlType,
    /// Kind of mesh the follower is allowed to drive
    pub target_source: BodyKind,
    /// Position channel
    pub linear: PidGains,
    /// Orientation channel
    pub angular: PidGains,
}

impl Default for FollowerConfig {
    fn default() -> Self {
        Self {
            control_type: ControlType::Position,
            target_source: BodyKind::SkeletalMesh,
            linear: PidGains::LINEAR,
            angular: PidGains::ANGULAR,
        }
    }
}

impl FollowerConfig {
    pub fn velocity() -> Self {
        Self {
            control_type: ControlType::Velocity,
            ..Default::default()
        }
    }

    pub fn with_target_source(mut self, kind: BodyKind) -> Self {
        self.target_source = kind;
        self
    }

    pub fn is_valid(&self) -> bool {
        self.linear.is_valid() && self.angular.is_valid()
    }
}
