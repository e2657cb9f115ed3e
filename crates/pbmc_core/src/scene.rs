//! Scene capabilities consumed by the motion-controller components
//!
//! The components never see a concrete physics engine. They talk to three
//! capability sets, grouped as [`Scene`]:
//!
//! - [`RigidBodies`]: the rigid-body simulator
//! - [`Attachments`]: parent/child attachment keeping world transforms
//! - [`OverlapVolumes`]: trigger volumes and their current overlaps

use crate::body::{AttachRule, BodyId, BodyKind, Bounds, Mobility};
use crate::error::Result;
use crate::events::OverlapEvent;
use crate::pose::Pose;
use crate::tracking::TrackingSource;
use glam::Vec3;

/// Rigid-body simulator
pub trait RigidBodies {
    /// Whether the body is (still) part of the scene
    fn contains(&self, body: BodyId) -> bool;

    /// Current world pose
    fn pose(&self, body: BodyId) -> Result<Pose>;

    /// Teleport to a world pose, without sweeping
    fn set_pose(&mut self, body: BodyId, pose: Pose) -> Result<()>;

    fn linear_velocity(&self, body: BodyId) -> Result<Vec3>;

    fn set_linear_velocity(&mut self, body: BodyId, velocity: Vec3) -> Result<()>;

    /// Angular velocity in radians per second
    fn angular_velocity(&self, body: BodyId) -> Result<Vec3>;

    fn set_angular_velocity(&mut self, body: BodyId, velocity: Vec3) -> Result<()>;

    /// Queue a linear acceleration for the next step, independent of mass
    fn add_acceleration(&mut self, body: BodyId, acceleration: Vec3) -> Result<()>;

    /// Queue an angular acceleration (rad/s²) for the next step, independent of inertia
    fn add_angular_acceleration(&mut self, body: BodyId, acceleration: Vec3) -> Result<()>;

    /// Discard all queued forces, torques and accelerations
    fn reset_forces(&mut self, body: BodyId) -> Result<()>;

    fn mass(&self, body: BodyId) -> Result<f32>;

    /// World-space bounding box of everything the body owns
    fn bounds(&self, body: BodyId) -> Result<Bounds>;

    fn mobility(&self, body: BodyId) -> Result<Mobility>;

    fn set_mobility(&mut self, body: BodyId, mobility: Mobility) -> Result<()>;

    fn kind(&self, body: BodyId) -> Result<BodyKind>;

    /// Whether the body is currently driven by the simulation
    fn is_simulating(&self, body: BodyId) -> Result<bool>;

    fn set_simulate_physics(&mut self, body: BodyId, simulate: bool) -> Result<()>;

    fn set_gravity_enabled(&mut self, body: BodyId, enabled: bool) -> Result<()>;

    /// Whether the body takes part in overlap events
    fn generates_overlaps(&self, body: BodyId) -> Result<bool>;

    fn set_generate_overlaps(&mut self, body: BodyId, enabled: bool) -> Result<()>;
}

/// Attachment system
pub trait Attachments {
    /// Attach `child` to `parent`, keeping the child's world pose
    fn attach(&mut self, child: BodyId, parent: BodyId, rule: AttachRule) -> Result<()>;

    /// Detach `child` from its parent, keeping its world pose.
    ///
    /// Like most engines, implementations reset the child's velocity.
    fn detach(&mut self, child: BodyId) -> Result<()>;

    fn parent_of(&self, child: BodyId) -> Option<BodyId>;
}

/// Trigger volumes
pub trait OverlapVolumes {
    fn is_volume(&self, volume: BodyId) -> bool;

    /// Whether the volume currently generates overlap events
    fn volume_enabled(&self, volume: BodyId) -> Result<bool>;

    fn set_volume_enabled(&mut self, volume: BodyId, enabled: bool) -> Result<()>;

    /// Bodies geometrically overlapping the volume right now, regardless of
    /// whether overlap events are enabled
    fn overlapping(&self, volume: BodyId) -> Result<Vec<BodyId>>;
}

/// Everything a motion-controller component may ask of the host scene
pub trait Scene: RigidBodies + Attachments + OverlapVolumes {}

impl<T: RigidBodies + Attachments + OverlapVolumes> Scene for T {}

/// A scene the host loop advances once per tick
pub trait Simulation: Scene {
    /// Advance the simulation by `dt` seconds
    fn advance(&mut self, dt: f32);

    /// Overlap events produced since the last call, in order
    fn take_overlap_events(&mut self) -> Vec<OverlapEvent>;
}

/// Per-tick context handed to components and scheduled tasks
pub struct Frame<'a> {
    /// The simulated scene
    pub scene: &'a mut dyn Scene,
    /// Source of target poses for this tick
    pub tracking: &'a dyn TrackingSource,
    /// Tick number, starting at 1 for the first tick
    pub tick: u64,
}

impl<'a> Frame<'a> {
    pub fn new(scene: &'a mut dyn Scene, tracking: &'a dyn TrackingSource, tick: u64) -> Self {
        Self {
            scene,
            tracking,
            tick,
        }
    }
}

/// Component updated once per simulation tick
pub trait Tickable {
    fn on_tick(&mut self, frame: &mut Frame<'_>, dt: f32);
}

/// Component reacting to a trigger volume's overlap events
pub trait VolumeOverlapListener {
    fn on_overlap_begin(&mut self, scene: &dyn Scene, other: BodyId);

    fn on_overlap_end(&mut self, other: BodyId);
}
