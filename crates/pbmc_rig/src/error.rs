//! Rig errors

use crate::config::ConfigError;
use pbmc_physics::PhysicsError;
use thiserror::Error;

/// Errors raised while setting up a rig
#[derive(Debug, Error)]
pub enum RigError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Physics error: {0}")]
    Physics(#[from] PhysicsError),

    #[error("Hand {0} failed to activate")]
    Activation(crate::hand::Hand),
}

pub type Result<T> = std::result::Result<T, RigError>;
