//! # pbmc_control - Pose Following
//!
//! Drives a simulated rigid body toward a tracked target pose every tick with
//! two independent PID channels, one linear and one angular.
//!
//! ```ignore
//! use pbmc_control::prelude::*;
//!
//! let mut follower = PoseFollower::new(FollowerConfig::default(), MotionSource::Left);
//! follower.init(&mut scene, &mut scheduler, Some(hand), None);
//!
//! // every tick, before the scheduler runs due tasks
//! follower.on_tick(&mut frame, dt);
//! ```

pub mod config;
pub mod follower;
pub mod pid;

pub mod prelude {
    //! Common imports for pose following
    pub use crate::config::{ControlType, FollowerConfig};
    pub use crate::follower::PoseFollower;
    pub use crate::pid::{PidController3, PidGains};
}

pub use prelude::*;
