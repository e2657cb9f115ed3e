//! Target pose sources

use crate::pose::Pose;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A tracked point whose pose drives a controller
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionSource {
    /// Left hand controller
    Left,
    /// Right hand controller
    Right,
    /// Any other tracked device, by name
    Named(String),
}

impl MotionSource {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }
}

impl fmt::Display for MotionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
            Self::Named(name) => write!(f, "{}", name),
        }
    }
}

/// Supplies world-space target poses every tick.
///
/// Returning `None` means the source has no valid sample yet; tracking
/// runtimes typically report nothing useful before the second frame.
pub trait TrackingSource {
    fn pose(&self, source: &MotionSource) -> Option<Pose>;
}

/// Last known pose per tracked point, written by the host
#[derive(Debug, Clone, Default)]
pub struct TrackingTable {
    poses: HashMap<MotionSource, Pose>,
}

impl TrackingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new sample
    pub fn set(&mut self, source: MotionSource, pose: Pose) {
        self.poses.insert(source, pose);
    }

    /// Forget a tracked point (tracking lost)
    pub fn clear(&mut self, source: &MotionSource) -> Option<Pose> {
        self.poses.remove(source)
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }
}

impl TrackingSource for TrackingTable {
    fn pose(&self, source: &MotionSource) -> Option<Pose> {
        self.poses.get(source).copied()
    }
}
