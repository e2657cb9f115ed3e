//! Error types for the physics backend

use pbmc_core::SceneError;
use thiserror::Error;

/// Physics backend errors
#[derive(Debug, Error)]
pub enum PhysicsError {
    /// A scene-level failure (missing body, bad attachment)
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// Invalid configuration
    #[error("Invalid physics configuration: {0}")]
    InvalidConfig(String),

    /// Shape creation failed
    #[error("Failed to create collision shape: {0}")]
    ShapeCreationFailed(String),
}

/// Result type for physics operations
pub type Result<T> = std::result::Result<T, PhysicsError>;
