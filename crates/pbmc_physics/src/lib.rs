//! # pbmc_physics - Rapier 3D Scene Backend
//!
//! Implements the motion-controller scene capabilities on top of Rapier 3D.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                  PhysicsScene                    │
//! │  ┌─────────────┐  ┌─────────────┐  ┌──────────┐  │
//! │  │ RigidBodySet│  │ ColliderSet │  │ Volumes  │  │
//! │  └─────────────┘  └─────────────┘  └──────────┘  │
//! │  ┌────────────────────────────────────────────┐  │
//! │  │ queued accelerations → PhysicsPipeline     │  │
//! │  │   → attached children follow parents       │  │
//! │  │   → sensor events → OverlapEvent           │  │
//! │  └────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────┘
//!          │               │                │
//!          ▼               ▼                ▼
//!    RigidBodies      Attachments     OverlapVolumes
//! ```
//!
//! A body with simulation turned off, or attached to another body, becomes
//! kinematic. Welding moves the child's colliders onto the parent body.
//!
//! # Example
//!
//! ```ignore
//! use pbmc_physics::prelude::*;
//!
//! let mut scene = PhysicsScene::new(PhysicsConfig::default())?;
//! let hand = scene.add_body(BodyDesc::hand(ColliderShape::sphere(4.0)))?;
//! let volume = scene.add_volume(hand, 3.0, Vec3::ZERO)?;
//!
//! scene.step(1.0 / 90.0);
//! for event in scene.drain_overlap_events() {
//!     bus.publish(event);
//! }
//! ```

pub mod body;
pub mod collider;
pub mod config;
pub mod error;
mod events;
pub mod world;

pub mod prelude {
    //! Common imports for the physics backend
    pub use crate::body::BodyDesc;
    pub use crate::collider::ColliderShape;
    pub use crate::config::PhysicsConfig;
    pub use crate::error::{PhysicsError, Result};
    pub use crate::world::PhysicsScene;
}

pub use prelude::*;
