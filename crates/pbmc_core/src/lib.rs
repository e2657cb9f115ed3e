//! # pbmc_core - Physics-Based Motion Controller Core
//!
//! Shared vocabulary for the motion-controller components:
//! - Poses and body identities
//! - Capability traits for the rigid-body simulator, the attachment system
//!   and trigger volumes
//! - Tracking sources for controller target poses
//! - A host-owned tick scheduler for one-shot deferred tasks
//! - An overlap bus for explicit observer registration
//!
//! ## Architecture
//!
//! ```text
//!            ┌──────────────────────── host tick ─────────────────────────┐
//!            │                                                            │
//!  TrackingSource ──► Frame { scene, tracking } ──► Tickable::on_tick     │
//!                          │                                              │
//!                          ├──► TickScheduler::run_due (deferred tasks)   │
//!                          │                                              │
//!   Scene (RigidBodies + Attachments + OverlapVolumes)                    │
//!                          │                                              │
//!                          └──► OverlapEvent ──► OverlapBus ──► listeners │
//!            └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Components never own the scene; they hold [`BodyId`]s and check them with
//! [`RigidBodies::contains`] before every use.

pub mod body;
pub mod error;
pub mod events;
pub mod pose;
pub mod scene;
pub mod schedule;
pub mod tracking;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub mod prelude {
    //! Common imports for motion-controller components
    pub use crate::body::{AttachRule, BodyId, BodyKind, Bounds, Mobility};
    pub use crate::error::{Result, SceneError};
    pub use crate::events::{OverlapBus, OverlapEvent, OverlapKind, SubscriberId, Subscription};
    pub use crate::pose::{rotation_error, Pose};
    pub use crate::scene::{
        Attachments, Frame, OverlapVolumes, RigidBodies, Scene, Simulation, Tickable,
        VolumeOverlapListener,
    };
    pub use crate::schedule::{TaskId, TickScheduler};
    pub use crate::tracking::{MotionSource, TrackingSource, TrackingTable};
}

pub use prelude::*;

pub use glam::{Quat, Vec3};
