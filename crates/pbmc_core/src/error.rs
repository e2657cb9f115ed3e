//! Error types for scene access

use crate::body::BodyId;
use thiserror::Error;

/// Errors reported by scene collaborators
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    /// Body is not (or no longer) part of the scene
    #[error("Body not found: {0}")]
    BodyNotFound(BodyId),

    /// Body exists but is not a trigger volume
    #[error("Body {0} is not an overlap volume")]
    NotAVolume(BodyId),

    /// Child is already attached to a parent
    #[error("Body {0} is already attached")]
    AlreadyAttached(BodyId),

    /// Child has no parent to detach from
    #[error("Body {0} is not attached")]
    NotAttached(BodyId),

    /// A body cannot be attached to itself
    #[error("Body {0} cannot be attached to itself")]
    SelfAttachment(BodyId),
}

/// Result type for scene operations
pub type Result<T> = std::result::Result<T, SceneError>;
