//! # pbmc_rig - Hand Rig Host
//!
//! Owns one pose follower and one grasp controller per hand and runs them
//! in a fixed order every tick:
//!
//! ```text
//! begin_tick ─► followers on_tick ─► scheduled tasks ─► scene.advance
//!                                                          │
//!        grasp controllers ◄─ OverlapBus ◄─ overlap events ◄┘
//! ```
//!
//! Input actions (`LeftFixate`, `RightFixate`) are routed through
//! [`ActionBindings`] to the matching hand. [`spawn`] builds a Rapier scene
//! and a ready rig from a [`RigConfig`].

pub mod config;
pub mod error;
pub mod hand;
pub mod input;
pub mod rig;
pub mod spawn;

pub mod prelude {
    //! Common imports for hosts
    pub use crate::config::{ConfigError, HandConfig, PropConfig, RigConfig, CONFIG_ENV};
    pub use crate::error::{Result, RigError};
    pub use crate::hand::{GraspEvent, Hand, HandRig};
    pub use crate::input::{ActionBindings, ButtonState, GraspCommand};
    pub use crate::rig::Rig;
    pub use crate::spawn::{spawn, Spawned};
}

pub use prelude::*;
