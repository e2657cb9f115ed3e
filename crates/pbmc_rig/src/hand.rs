//! One tracked hand: a pose follower and a grasp controller

use crate::input::GraspCommand;
use pbmc_control::{FollowerConfig, PoseFollower};
use pbmc_core::prelude::*;
use pbmc_grasp::{GraspConfig, GraspController, GraspState};
use std::fmt;

/// Which hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    /// Tracking source driving this hand
    pub fn motion_source(self) -> MotionSource {
        match self {
            Hand::Left => MotionSource::Left,
            Hand::Right => MotionSource::Right,
        }
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hand::Left => write!(f, "left"),
            Hand::Right => write!(f, "right"),
        }
    }
}

/// Grasp notification raised to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraspEvent {
    Started { hand: Hand, object: BodyId },
    Finished { hand: Hand, object: BodyId },
}

impl GraspEvent {
    pub fn hand(&self) -> Hand {
        match self {
            Self::Started { hand, .. } | Self::Finished { hand, .. } => *hand,
        }
    }

    pub fn object(&self) -> BodyId {
        match self {
            Self::Started { object, .. } | Self::Finished { object, .. } => *object,
        }
    }
}

/// Components for one hand
#[derive(Debug)]
pub struct HandRig {
    hand: Hand,
    follower: PoseFollower,
    grasp: GraspController,
}

impl HandRig {
    pub fn new(hand: Hand, follower: FollowerConfig, grasp: GraspConfig) -> Self {
        Self {
            hand,
            follower: PoseFollower::new(follower, hand.motion_source()),
            grasp: GraspController::new(grasp),
        }
    }

    /// Activate both components.
    ///
    /// Returns whether both came up. Either may be active on its own.
    pub fn init(
        &mut self,
        scene: &mut dyn Scene,
        scheduler: &mut TickScheduler,
        bus: &mut OverlapBus,
        body: Option<BodyId>,
        volume: Option<BodyId>,
        offset: Option<Pose>,
    ) -> bool {
        let following = self.follower.init(scene, scheduler, body, offset);
        let grasping = self.grasp.init(&*scene, bus, volume, body);
        if following && grasping {
            log::info!("{} hand ready on {:?}", self.hand, body);
        }
        following && grasping
    }

    /// Release anything held and deactivate
    pub fn teardown(&mut self, scene: &mut dyn Scene, scheduler: &mut TickScheduler, bus: &mut OverlapBus) {
        if let Some(object) = self.grasp.try_detach(scene) {
            log::debug!("{} hand dropped {} on teardown", self.hand, object);
        }
        self.grasp.teardown(bus);
        self.follower.teardown(scheduler);
    }

    /// Run a grasp command, returning the resulting notification
    pub fn handle(&mut self, scene: &mut dyn Scene, command: GraspCommand) -> Option<GraspEvent> {
        let hand = self.hand;
        match command {
            GraspCommand::Fixate => self
                .grasp
                .try_fixate(scene)
                .map(|object| GraspEvent::Started { hand, object }),
            GraspCommand::Detach => self
                .grasp
                .try_detach(scene)
                .map(|object| GraspEvent::Finished { hand, object }),
        }
    }

    pub fn hand(&self) -> Hand {
        self.hand
    }

    pub fn follower(&self) -> &PoseFollower {
        &self.follower
    }

    pub fn grasp(&self) -> &GraspController {
        &self.grasp
    }

    pub fn state(&self) -> GraspState {
        self.grasp.state()
    }

    pub(crate) fn follower_mut(&mut self) -> &mut PoseFollower {
        &mut self.follower
    }

    pub(crate) fn grasp_mut(&mut self) -> &mut GraspController {
        &mut self.grasp
    }
}
