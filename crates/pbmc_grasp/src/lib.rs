//! # pbmc_grasp - Fixation Grasping
//!
//! A hand picks up props by attaching them to its anchor body instead of
//! simulating finger contact.
//!
//! ```text
//!            overlap begin            try_fixate
//!   Idle ───────────────────► InReach ──────────► Fixated
//!    ▲  ◄─────────────────────  │                   │
//!    │       overlap end        │                   │ try_detach
//!    └──────────────────────────┴───────────────────┘
//!          (ReachSet rebuilt from current overlaps)
//! ```
//!
//! While an object is fixated the grasp volume stops generating overlap
//! events and the reach set stays empty.

pub mod config;
pub mod controller;
pub mod eligibility;
pub mod reach;

pub mod prelude {
    //! Common imports for grasping
    pub use crate::config::{GraspConfig, GraspConfigError};
    pub use crate::controller::{GraspController, GraspState};
    pub use crate::eligibility::{can_be_grasped, GraspCandidate};
    pub use crate::reach::ReachSet;
}

pub use prelude::*;
