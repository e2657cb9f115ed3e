//! 6DOF PID pose follower
//!
//! Activation timeline for a follower initialized on tick `T`:
//!
//! ```text
//! T     init: body made movable, simulated, gravity off; snap scheduled
//! T+1   PID update, then the snap: velocities zeroed, queued forces
//!       dropped, body teleported onto the target
//! T+2.. PID update only
//! ```
//!
//! The snap exists because tracking sources are not guaranteed to report a
//! valid pose before the frame after activation.

use crate::config::{ControlType, FollowerConfig};
use crate::pid::PidController3;
use pbmc_core::prelude::*;
use pbmc_core::Vec3;

/// Drives one body toward a tracked pose
#[derive(Debug)]
pub struct PoseFollower {
    config: FollowerConfig,
    source: MotionSource,
    body: Option<BodyId>,
    /// Inverse of the body-to-target offset, fixed at init
    offset_inverse: Pose,
    linear: PidController3,
    angular: PidController3,
    snap_task: Option<TaskId>,
}

impl PoseFollower {
    pub fn new(config: FollowerConfig, source: MotionSource) -> Self {
        let linear = PidController3::new(config.linear);
        let angular = PidController3::new(config.angular);
        Self {
            config,
            source,
            body: None,
            offset_inverse: Pose::IDENTITY,
            linear,
            angular,
            snap_task: None,
        }
    }

    /// Bind to a body and activate.
    ///
    /// With an `offset`, the body is driven so that `body_pose * offset`
    /// tracks the target. Returns whether the follower is now active; a
    /// missing body, a body of the wrong kind, or a scene error leave it
    /// inactive.
    pub fn init(
        &mut self,
        scene: &mut dyn Scene,
        scheduler: &mut TickScheduler,
        body: Option<BodyId>,
        offset: Option<Pose>,
    ) -> bool {
        self.teardown(scheduler);

        let Some(body) = body else {
            log::warn!("Pose follower for {} has no body, staying inactive", self.source);
            return false;
        };
        if !scene.contains(body) {
            log::warn!("Pose follower for {}: body {} not found", self.source, body);
            return false;
        }

        match scene.kind(body) {
            Ok(kind) if kind == self.config.target_source => {}
            Ok(kind) => {
                log::warn!(
                    "Pose follower for {}: body {} is {:?}, expected {:?}",
                    self.source,
                    body,
                    kind,
                    self.config.target_source
                );
                return false;
            }
            Err(e) => {
                log::warn!("Pose follower for {}: {}", self.source, e);
                return false;
            }
        }

        if let Err(e) = prepare_body(scene, body) {
            log::warn!("Pose follower for {}: failed to prepare {}: {}", self.source, body, e);
            return false;
        }

        self.offset_inverse = offset.map(|o| o.inverse()).unwrap_or(Pose::IDENTITY);
        self.linear = PidController3::new(self.config.linear);
        self.angular = PidController3::new(self.config.angular);
        self.body = Some(body);

        let source = self.source.clone();
        let offset_inverse = self.offset_inverse;
        self.snap_task = Some(scheduler.schedule_next_tick(move |frame| {
            if let Err(e) = snap_to_target(frame, body, &source, offset_inverse) {
                log::warn!("Snap of {} to {} failed: {}", body, source, e);
            }
        }));

        log::debug!("Pose follower for {} driving {}", self.source, body);
        true
    }

    /// Deactivate, cancelling a pending snap
    pub fn teardown(&mut self, scheduler: &mut TickScheduler) {
        if let Some(task) = self.snap_task.take() {
            scheduler.cancel(task);
        }
        self.body = None;
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.body.is_some()
    }

    pub fn body(&self) -> Option<BodyId> {
        self.body
    }

    pub fn source(&self) -> &MotionSource {
        &self.source
    }

    pub fn config(&self) -> &FollowerConfig {
        &self.config
    }

    /// Target for the body itself once the offset is taken out
    fn body_target(&self, target: Pose) -> Pose {
        target.compose(&self.offset_inverse)
    }

    fn drive(&mut self, scene: &mut dyn Scene, body: BodyId, goal: Pose, dt: f32) -> Result<()> {
        let current = scene.pose(body)?;

        let linear = self.linear.update(goal.position - current.position, dt);
        let angular = self
            .angular
            .update(rotation_error(current.rotation, goal.rotation), dt);

        match self.config.control_type {
            ControlType::Position => {
                scene.add_acceleration(body, linear)?;
                scene.add_angular_acceleration(body, angular)?;
            }
            ControlType::Velocity => {
                scene.set_linear_velocity(body, linear)?;
                scene.set_angular_velocity(body, angular)?;
            }
        }
        Ok(())
    }
}

impl Tickable for PoseFollower {
    fn on_tick(&mut self, frame: &mut Frame<'_>, dt: f32) {
        let Some(body) = self.body else {
            return;
        };
        if !frame.scene.contains(body) {
            log::warn!("Body {} driven by {} is gone, deactivating", body, self.source);
            self.body = None;
            self.snap_task = None;
            return;
        }
        if dt <= 0.0 {
            return;
        }

        let Some(target) = frame.tracking.pose(&self.source) else {
            log::trace!("No tracking sample for {} on tick {}", self.source, frame.tick);
            return;
        };

        let goal = self.body_target(target);
        if let Err(e) = self.drive(&mut *frame.scene, body, goal, dt) {
            log::warn!("Pose follower for {} lost {}: {}", self.source, body, e);
            self.body = None;
        }
    }
}

fn prepare_body(scene: &mut dyn Scene, body: BodyId) -> Result<()> {
    scene.set_mobility(body, Mobility::Movable)?;
    scene.set_simulate_physics(body, true)?;
    scene.set_gravity_enabled(body, false)
}

/// Teleport `body` to the offset-adjusted target, the pose the PID drives toward
fn snap_to_target(
    frame: &mut Frame<'_>,
    body: BodyId,
    source: &MotionSource,
    offset_inverse: Pose,
) -> Result<()> {
    if !frame.scene.contains(body) {
        return Ok(());
    }
    let Some(target) = frame.tracking.pose(source) else {
        log::debug!("No sample for {} on snap tick {}, leaving {} in place", source, frame.tick, body);
        return Ok(());
    };

    let scene = &mut *frame.scene;
    scene.set_linear_velocity(body, Vec3::ZERO)?;
    scene.set_angular_velocity(body, Vec3::ZERO)?;
    scene.reset_forces(body)?;
    scene.set_pose(body, target.compose(&offset_inverse))
}
