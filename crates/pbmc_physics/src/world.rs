//! Physics scene - Rapier simulation exposed through the scene capabilities

use crate::body::{body_type, from_isometry, from_vector, to_isometry, to_vector, BodyDesc};
use crate::config::PhysicsConfig;
use crate::error::{PhysicsError, Result};
use crate::events::{ChannelEventCollector, SensorContact};
use glam::Vec3;
use pbmc_core::prelude::{
    AttachRule, Attachments, BodyId, BodyKind, Bounds, Mobility, OverlapEvent, OverlapVolumes,
    Pose, RigidBodies, SceneError, Simulation,
};
use rapier3d::prelude as rapier;
use std::collections::HashMap;
use std::num::NonZeroUsize;

type SceneResult<T> = pbmc_core::Result<T>;

/// Book-keeping for a solid body
#[derive(Debug)]
struct BodyRecord {
    handle: rapier::RigidBodyHandle,
    /// Solid colliders created with the body, wherever they are parented now
    colliders: Vec<rapier::ColliderHandle>,
    kind: BodyKind,
    mobility: Mobility,
    simulating: bool,
    gravity: bool,
    generate_overlaps: bool,
    mass: f32,
}

#[derive(Debug)]
struct VolumeRecord {
    collider: rapier::ColliderHandle,
    owner: BodyId,
    enabled: bool,
}

#[derive(Debug)]
struct Attachment {
    parent: BodyId,
    /// Child pose relative to the parent
    local: Pose,
    /// Colliders moved onto the parent, with their original local poses
    welded: Vec<(rapier::ColliderHandle, rapier::Isometry<f32>)>,
}

/// Rapier-backed scene implementing the motion-controller capabilities
pub struct PhysicsScene {
    /// Configuration
    config: PhysicsConfig,

    /// Rapier physics pipeline
    pipeline: rapier::PhysicsPipeline,

    /// Gravity
    gravity: rapier::Vector<f32>,

    /// Integration parameters
    integration_params: rapier::IntegrationParameters,

    /// Island manager
    islands: rapier::IslandManager,

    /// Broad phase
    broad_phase: rapier::DefaultBroadPhase,

    /// Narrow phase
    narrow_phase: rapier::NarrowPhase,

    /// Impulse joint set
    impulse_joints: rapier::ImpulseJointSet,

    /// Multibody joint set
    multibody_joints: rapier::MultibodyJointSet,

    /// CCD solver
    ccd_solver: rapier::CCDSolver,

    /// Rigid body set
    rigid_bodies: rapier::RigidBodySet,

    /// Collider set
    colliders: rapier::ColliderSet,

    bodies: HashMap<BodyId, BodyRecord>,
    volumes: HashMap<BodyId, VolumeRecord>,
    attachments: HashMap<BodyId, Attachment>,

    /// Queued linear and angular acceleration per body
    accelerations: HashMap<BodyId, (Vec3, Vec3)>,

    /// Overlap events since the last drain
    overlap_events: Vec<OverlapEvent>,

    next_id: u64,

    /// Accumulated time for fixed timestep
    accumulated_time: f32,
}

impl PhysicsScene {
    /// Create a new physics scene
    pub fn new(config: PhysicsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: PhysicsConfig) -> Self {
        let gravity = rapier::Vector::new(config.gravity[0], config.gravity[1], config.gravity[2]);

        let mut integration_params = rapier::IntegrationParameters::default();
        integration_params.dt = config.timestep;
        integration_params.num_solver_iterations =
            NonZeroUsize::new(config.velocity_iterations).unwrap_or(NonZeroUsize::MIN);

        Self {
            config,
            pipeline: rapier::PhysicsPipeline::new(),
            gravity,
            integration_params,
            islands: rapier::IslandManager::new(),
            broad_phase: rapier::DefaultBroadPhase::new(),
            narrow_phase: rapier::NarrowPhase::new(),
            impulse_joints: rapier::ImpulseJointSet::new(),
            multibody_joints: rapier::MultibodyJointSet::new(),
            ccd_solver: rapier::CCDSolver::new(),
            rigid_bodies: rapier::RigidBodySet::new(),
            colliders: rapier::ColliderSet::new(),
            bodies: HashMap::new(),
            volumes: HashMap::new(),
            attachments: HashMap::new(),
            accelerations: HashMap::new(),
            overlap_events: Vec::new(),
            next_id: 1,
            accumulated_time: 0.0,
        }
    }

    /// Get the physics configuration
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    fn allocate_id(&mut self) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        id
    }

    // ==================== Bodies ====================

    /// Create a body with one solid collider
    pub fn add_body(&mut self, desc: BodyDesc) -> Result<BodyId> {
        if !desc.shape.is_valid() {
            return Err(PhysicsError::ShapeCreationFailed(format!("{:?}", desc.shape)));
        }
        if !(desc.mass.is_finite() && desc.mass > 0.0) {
            return Err(PhysicsError::InvalidConfig(format!(
                "body mass must be positive, got {}",
                desc.mass
            )));
        }

        let id = self.allocate_id();
        let builder = rapier::RigidBodyBuilder::new(body_type(desc.mobility, desc.simulate, false))
            .position(to_isometry(&desc.pose()))
            .gravity_scale(if desc.gravity { 1.0 } else { 0.0 })
            .user_data(id.raw() as u128);
        let handle = self.rigid_bodies.insert(builder);

        let collider = rapier::ColliderBuilder::new(desc.shape.to_rapier())
            .mass(desc.mass)
            .friction(self.config.default_friction)
            .user_data(id.raw() as u128);
        let collider = self
            .colliders
            .insert_with_parent(collider, handle, &mut self.rigid_bodies);

        self.bodies.insert(
            id,
            BodyRecord {
                handle,
                colliders: vec![collider],
                kind: desc.kind,
                mobility: desc.mobility,
                simulating: desc.simulate,
                gravity: desc.gravity,
                generate_overlaps: desc.generate_overlaps,
                mass: desc.mass,
            },
        );
        log::debug!("Created {:?} body {}", desc.kind, id);
        Ok(id)
    }

    /// Create a spherical trigger volume carried by `owner`
    pub fn add_volume(&mut self, owner: BodyId, radius: f32, offset: Vec3) -> Result<BodyId> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(PhysicsError::ShapeCreationFailed(format!("volume radius {}", radius)));
        }
        let handle = self.record(owner)?.handle;

        let id = self.allocate_id();
        let collider = rapier::ColliderBuilder::ball(radius)
            .sensor(true)
            .density(0.0)
            .translation(to_vector(offset))
            .active_collision_types(rapier::ActiveCollisionTypes::all())
            .active_events(rapier::ActiveEvents::COLLISION_EVENTS)
            .user_data(id.raw() as u128);
        let collider = self
            .colliders
            .insert_with_parent(collider, handle, &mut self.rigid_bodies);

        self.volumes.insert(
            id,
            VolumeRecord {
                collider,
                owner,
                enabled: true,
            },
        );
        log::debug!("Created volume {} on {}", id, owner);
        Ok(id)
    }

    /// Remove a body, its volumes and its attachments
    pub fn remove_body(&mut self, id: BodyId) -> Result<()> {
        if !self.bodies.contains_key(&id) {
            return Err(SceneError::BodyNotFound(id).into());
        }

        let children: Vec<BodyId> = self
            .attachments
            .iter()
            .filter(|(_, a)| a.parent == id)
            .map(|(child, _)| *child)
            .collect();
        for child in children {
            self.detach(child)?;
        }
        if self.attachments.contains_key(&id) {
            self.detach(id)?;
        }

        self.volumes.retain(|_, v| v.owner != id);
        self.accelerations.remove(&id);
        if let Some(record) = self.bodies.remove(&id) {
            self.rigid_bodies.remove(
                record.handle,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true, // Remove attached colliders
            );
        }
        log::debug!("Removed body {}", id);
        Ok(())
    }

    fn record(&self, id: BodyId) -> SceneResult<&BodyRecord> {
        self.bodies.get(&id).ok_or(SceneError::BodyNotFound(id))
    }

    fn record_mut(&mut self, id: BodyId) -> SceneResult<&mut BodyRecord> {
        self.bodies.get_mut(&id).ok_or(SceneError::BodyNotFound(id))
    }

    fn rigid_body(&self, id: BodyId) -> SceneResult<&rapier::RigidBody> {
        let handle = self.record(id)?.handle;
        self.rigid_bodies
            .get(handle)
            .ok_or(SceneError::BodyNotFound(id))
    }

    fn rigid_body_mut(&mut self, id: BodyId) -> SceneResult<&mut rapier::RigidBody> {
        let handle = self.record(id)?.handle;
        self.rigid_bodies
            .get_mut(handle)
            .ok_or(SceneError::BodyNotFound(id))
    }

    /// Match the Rapier body type to mobility, simulation and attachment
    fn sync_body_type(&mut self, id: BodyId) -> SceneResult<()> {
        let record = self.record(id)?;
        let wanted = body_type(
            record.mobility,
            record.simulating,
            self.attachments.contains_key(&id),
        );
        let body = self.rigid_body_mut(id)?;
        if body.body_type() != wanted {
            body.set_body_type(wanted, true);
        }
        Ok(())
    }

    fn collider_body(&self, handle: rapier::ColliderHandle) -> Option<BodyId> {
        self.colliders
            .get(handle)
            .map(|c| BodyId(c.user_data as u64))
    }

    // ==================== Simulation ====================

    /// Step the physics simulation with fixed timestep.
    ///
    /// Returns the number of substeps taken. Queued accelerations apply to
    /// every substep of this call and are then cleared, even when the call
    /// was too short to take a substep.
    pub fn step(&mut self, delta_time: f32) -> u32 {
        self.accumulated_time += delta_time;

        let mut steps = 0;
        while self.accumulated_time >= self.config.timestep && steps < self.config.max_substeps {
            self.step_internal();
            self.accumulated_time -= self.config.timestep;
            steps += 1;
        }

        self.accelerations.clear();
        steps
    }

    /// Internal fixed timestep
    fn step_internal(&mut self) {
        self.apply_accelerations();

        let (event_handler, sensor_events) = ChannelEventCollector::new();

        // Step simulation
        self.pipeline.step(
            &self.gravity,
            &self.integration_params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &event_handler,
        );

        self.follow_parents();

        for contact in sensor_events.try_iter() {
            if let Some(event) = self.overlap_event(contact) {
                self.overlap_events.push(event);
            }
        }
    }

    /// Apply queued accelerations to dynamic bodies as velocity changes
    fn apply_accelerations(&mut self) {
        let dt = self.integration_params.dt;
        for (id, (linear, angular)) in &self.accelerations {
            let Some(record) = self.bodies.get(id) else {
                continue;
            };
            let Some(body) = self.rigid_bodies.get_mut(record.handle) else {
                continue;
            };
            if !body.is_dynamic() {
                continue;
            }

            let linvel = from_vector(body.linvel()) + *linear * dt;
            let angvel = from_vector(body.angvel()) + *angular * dt;
            body.set_linvel(to_vector(linvel), true);
            body.set_angvel(to_vector(angvel), true);
        }
    }

    /// Move attached children with their parents
    fn follow_parents(&mut self) {
        for (child, attachment) in &self.attachments {
            let (Some(child), Some(parent)) =
                (self.bodies.get(child), self.bodies.get(&attachment.parent))
            else {
                continue;
            };
            let Some(parent_body) = self.rigid_bodies.get(parent.handle) else {
                continue;
            };

            let world = from_isometry(parent_body.position()).compose(&attachment.local);
            let point = rapier::Point::from(to_vector(world.position));
            let linvel = parent_body.velocity_at_point(&point);
            let angvel = *parent_body.angvel();

            if let Some(body) = self.rigid_bodies.get_mut(child.handle) {
                body.set_position(to_isometry(&world), true);
                body.set_linvel(linvel, true);
                body.set_angvel(angvel, true);
            }
        }
    }

    /// Translate a sensor contact into a volume overlap, if anyone should hear it
    fn overlap_event(&self, contact: SensorContact) -> Option<OverlapEvent> {
        let first = self.collider_body(contact.collider1)?;
        let second = self.collider_body(contact.collider2)?;

        let (volume, other) = if self.volumes.contains_key(&first) {
            (first, second)
        } else if self.volumes.contains_key(&second) {
            (second, first)
        } else {
            return None;
        };

        let record = self.volumes.get(&volume)?;
        let body = self.bodies.get(&other)?;
        if !record.enabled || !body.generate_overlaps || other == record.owner {
            return None;
        }

        Some(if contact.started {
            OverlapEvent::begin(volume, other)
        } else {
            OverlapEvent::end(volume, other)
        })
    }

    // ==================== Events ====================

    /// Overlap events since the last drain
    pub fn overlap_events(&self) -> &[OverlapEvent] {
        &self.overlap_events
    }

    /// Take the overlap events collected so far
    pub fn drain_overlap_events(&mut self) -> Vec<OverlapEvent> {
        std::mem::take(&mut self.overlap_events)
    }

    // ==================== Debug ====================

    /// Get number of bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Get number of volumes
    pub fn volume_count(&self) -> usize {
        self.volumes.len()
    }

    /// Get number of active (awake) bodies
    pub fn active_body_count(&self) -> usize {
        self.islands.active_dynamic_bodies().len()
    }
}

impl Default for PhysicsScene {
    fn default() -> Self {
        Self::build(PhysicsConfig::default())
    }
}

impl Simulation for PhysicsScene {
    fn advance(&mut self, dt: f32) {
        self.step(dt);
    }

    fn take_overlap_events(&mut self) -> Vec<OverlapEvent> {
        self.drain_overlap_events()
    }
}

impl RigidBodies for PhysicsScene {
    fn contains(&self, body: BodyId) -> bool {
        self.bodies.contains_key(&body)
    }

    fn pose(&self, body: BodyId) -> SceneResult<Pose> {
        Ok(from_isometry(self.rigid_body(body)?.position()))
    }

    fn set_pose(&mut self, body: BodyId, pose: Pose) -> SceneResult<()> {
        if let Some(parent) = self.attachments.get(&body).map(|a| a.parent) {
            let parent_pose = self.pose(parent)?;
            if let Some(attachment) = self.attachments.get_mut(&body) {
                attachment.local = pose.relative_to(&parent_pose);
            }
        }
        self.rigid_body_mut(body)?.set_position(to_isometry(&pose), true);
        Ok(())
    }

    fn linear_velocity(&self, body: BodyId) -> SceneResult<Vec3> {
        Ok(from_vector(self.rigid_body(body)?.linvel()))
    }

    fn set_linear_velocity(&mut self, body: BodyId, velocity: Vec3) -> SceneResult<()> {
        self.rigid_body_mut(body)?.set_linvel(to_vector(velocity), true);
        Ok(())
    }

    fn angular_velocity(&self, body: BodyId) -> SceneResult<Vec3> {
        Ok(from_vector(self.rigid_body(body)?.angvel()))
    }

    fn set_angular_velocity(&mut self, body: BodyId, velocity: Vec3) -> SceneResult<()> {
        self.rigid_body_mut(body)?.set_angvel(to_vector(velocity), true);
        Ok(())
    }

    fn add_acceleration(&mut self, body: BodyId, acceleration: Vec3) -> SceneResult<()> {
        self.record(body)?;
        self.accelerations.entry(body).or_default().0 += acceleration;
        Ok(())
    }

    fn add_angular_acceleration(&mut self, body: BodyId, acceleration: Vec3) -> SceneResult<()> {
        self.record(body)?;
        self.accelerations.entry(body).or_default().1 += acceleration;
        Ok(())
    }

    fn reset_forces(&mut self, body: BodyId) -> SceneResult<()> {
        let rigid_body = self.rigid_body_mut(body)?;
        rigid_body.reset_forces(true);
        rigid_body.reset_torques(true);
        self.accelerations.remove(&body);
        Ok(())
    }

    fn mass(&self, body: BodyId) -> SceneResult<f32> {
        Ok(self.record(body)?.mass)
    }

    fn bounds(&self, body: BodyId) -> SceneResult<Bounds> {
        let record = self.record(body)?;
        let bounds = record
            .colliders
            .iter()
            .filter_map(|h| self.colliders.get(*h))
            .map(|c| {
                let aabb = c.compute_aabb();
                Bounds::new(
                    Vec3::new(aabb.mins.x, aabb.mins.y, aabb.mins.z),
                    Vec3::new(aabb.maxs.x, aabb.maxs.y, aabb.maxs.z),
                )
            })
            .reduce(|a, b| a.union(&b));

        match bounds {
            Some(bounds) => Ok(bounds),
            None => {
                let position = self.pose(body)?.position;
                Ok(Bounds::new(position, position))
            }
        }
    }

    fn mobility(&self, body: BodyId) -> SceneResult<Mobility> {
        Ok(self.record(body)?.mobility)
    }

    fn set_mobility(&mut self, body: BodyId, mobility: Mobility) -> SceneResult<()> {
        self.record_mut(body)?.mobility = mobility;
        self.sync_body_type(body)
    }

    fn kind(&self, body: BodyId) -> SceneResult<BodyKind> {
        Ok(self.record(body)?.kind)
    }

    fn is_simulating(&self, body: BodyId) -> SceneResult<bool> {
        Ok(self.record(body)?.simulating)
    }

    fn set_simulate_physics(&mut self, body: BodyId, simulate: bool) -> SceneResult<()> {
        self.record_mut(body)?.simulating = simulate;
        self.sync_body_type(body)
    }

    fn set_gravity_enabled(&mut self, body: BodyId, enabled: bool) -> SceneResult<()> {
        self.record_mut(body)?.gravity = enabled;
        self.rigid_body_mut(body)?
            .set_gravity_scale(if enabled { 1.0 } else { 0.0 }, true);
        Ok(())
    }

    fn generates_overlaps(&self, body: BodyId) -> SceneResult<bool> {
        Ok(self.record(body)?.generate_overlaps)
    }

    fn set_generate_overlaps(&mut self, body: BodyId, enabled: bool) -> SceneResult<()> {
        self.record_mut(body)?.generate_overlaps = enabled;
        Ok(())
    }
}

impl Attachments for PhysicsScene {
    fn attach(&mut self, child: BodyId, parent: BodyId, rule: AttachRule) -> SceneResult<()> {
        if child == parent {
            return Err(SceneError::SelfAttachment(child));
        }
        if self.attachments.contains_key(&child) {
            return Err(SceneError::AlreadyAttached(child));
        }
        let parent_handle = self.record(parent)?.handle;
        let local = self.pose(child)?.relative_to(&self.pose(parent)?);

        let mut welded = Vec::new();
        if rule.weld {
            let local_iso = to_isometry(&local);
            for handle in self.record(child)?.colliders.clone() {
                let Some(old) = self
                    .colliders
                    .get(handle)
                    .map(|c| c.position_wrt_parent().copied().unwrap_or_else(rapier::Isometry::identity))
                else {
                    continue;
                };
                self.colliders
                    .set_parent(handle, Some(parent_handle), &mut self.rigid_bodies);
                if let Some(collider) = self.colliders.get_mut(handle) {
                    collider.set_position_wrt_parent(local_iso * old);
                }
                welded.push((handle, old));
            }
        }

        self.attachments.insert(
            child,
            Attachment {
                parent,
                local,
                welded,
            },
        );
        self.sync_body_type(child)?;
        log::trace!("Attached {} to {} (weld: {})", child, parent, rule.weld);
        Ok(())
    }

    fn detach(&mut self, child: BodyId) -> SceneResult<()> {
        let child_handle = self.record(child)?.handle;
        let attachment = self
            .attachments
            .remove(&child)
            .ok_or(SceneError::NotAttached(child))?;

        for (handle, old) in attachment.welded {
            self.colliders
                .set_parent(handle, Some(child_handle), &mut self.rigid_bodies);
            if let Some(collider) = self.colliders.get_mut(handle) {
                collider.set_position_wrt_parent(old);
            }
        }

        self.sync_body_type(child)?;
        let body = self.rigid_body_mut(child)?;
        body.set_linvel(rapier::Vector::zeros(), true);
        body.set_angvel(rapier::Vector::zeros(), true);
        log::trace!("Detached {} from {}", child, attachment.parent);
        Ok(())
    }

    fn parent_of(&self, child: BodyId) -> Option<BodyId> {
        self.attachments.get(&child).map(|a| a.parent)
    }
}

impl OverlapVolumes for PhysicsScene {
    fn is_volume(&self, volume: BodyId) -> bool {
        self.volumes.contains_key(&volume)
    }

    fn volume_enabled(&self, volume: BodyId) -> SceneResult<bool> {
        self.volumes
            .get(&volume)
            .map(|v| v.enabled)
            .ok_or(SceneError::NotAVolume(volume))
    }

    fn set_volume_enabled(&mut self, volume: BodyId, enabled: bool) -> SceneResult<()> {
        let record = self
            .volumes
            .get_mut(&volume)
            .ok_or(SceneError::NotAVolume(volume))?;
        record.enabled = enabled;

        if let Some(collider) = self.colliders.get_mut(record.collider) {
            collider.set_active_events(if enabled {
                rapier::ActiveEvents::COLLISION_EVENTS
            } else {
                rapier::ActiveEvents::empty()
            });
        }
        Ok(())
    }

    fn overlapping(&self, volume: BodyId) -> SceneResult<Vec<BodyId>> {
        let record = self
            .volumes
            .get(&volume)
            .ok_or(SceneError::NotAVolume(volume))?;

        let mut bodies = Vec::new();
        for (h1, h2, intersecting) in self.narrow_phase.intersection_pairs_with(record.collider) {
            if !intersecting {
                continue;
            }
            let other = if h1 == record.collider { h2 } else { h1 };
            let Some(id) = self.collider_body(other) else {
                continue;
            };
            if id != record.owner && self.bodies.contains_key(&id) && !bodies.contains(&id) {
                bodies.push(id);
            }
        }
        Ok(bodies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collider::ColliderShape;
    use approx::assert_relative_eq;

    const DT: f32 = 1.0 / 90.0;

    fn weightless() -> PhysicsScene {
        PhysicsScene::new(PhysicsConfig::default().with_gravity(0.0, 0.0, 0.0)).unwrap()
    }

    #[test]
    fn test_create_scene() {
        let scene = PhysicsScene::default();
        assert_eq!(scene.body_count(), 0);
        assert_eq!(scene.volume_count(), 0);
    }

    #[test]
    fn test_rejects_invalid_config() {
        assert!(PhysicsScene::new(PhysicsConfig::default().with_timestep(-1.0)).is_err());
    }

    #[test]
    fn test_gravity_fall() {
        let mut scene = PhysicsScene::default();
        let body = scene
            .add_body(BodyDesc::prop(ColliderShape::sphere(5.0), 1.0).with_position(0.0, 0.0, 100.0))
            .unwrap();

        let initial_z = scene.pose(body).unwrap().position.z;
        for _ in 0..30 {
            scene.step(DT);
        }

        let final_z = scene.pose(body).unwrap().position.z;
        assert!(final_z < initial_z, "Body should fall due to gravity");
    }

    #[test]
    fn test_gravity_disabled() {
        let mut scene = PhysicsScene::default();
        let body = scene
            .add_body(BodyDesc::prop(ColliderShape::sphere(5.0), 1.0).with_position(0.0, 0.0, 100.0))
            .unwrap();
        scene.set_gravity_enabled(body, false).unwrap();

        for _ in 0..10 {
            scene.step(DT);
        }
        assert_relative_eq!(scene.pose(body).unwrap().position.z, 100.0, epsilon = 1e-3);
    }

    #[test]
    fn test_acceleration_change_ignores_mass() {
        let mut scene = weightless();
        let light = scene.add_body(BodyDesc::prop(ColliderShape::sphere(1.0), 1.0)).unwrap();
        let heavy = scene
            .add_body(BodyDesc::prop(ColliderShape::sphere(1.0), 50.0).with_position(100.0, 0.0, 0.0))
            .unwrap();

        for body in [light, heavy] {
            scene.add_acceleration(body, Vec3::new(90.0, 0.0, 0.0)).unwrap();
        }
        assert_eq!(scene.step(DT), 1);

        for body in [light, heavy] {
            assert_relative_eq!(scene.linear_velocity(body).unwrap().x, 1.0, epsilon = 1e-3);
        }

        // Consumed by the step
        scene.step(DT);
        assert_relative_eq!(scene.linear_velocity(light).unwrap().x, 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_short_host_ticks_do_not_stack_accelerations() {
        let mut scene = weightless();
        let body = scene.add_body(BodyDesc::prop(ColliderShape::sphere(1.0), 1.0)).unwrap();

        // Host ticks at twice the physics rate, queueing the limit every tick
        scene.add_acceleration(body, Vec3::X * 9000.0).unwrap();
        assert_eq!(scene.step(DT * 0.5), 0);
        scene.add_acceleration(body, Vec3::X * 9000.0).unwrap();
        assert_eq!(scene.step(DT * 0.5), 1);

        assert_relative_eq!(scene.linear_velocity(body).unwrap().x, 9000.0 * DT, epsilon = 1e-2);
    }

    #[test]
    fn test_reset_forces_drops_queued_acceleration() {
        let mut scene = weightless();
        let body = scene.add_body(BodyDesc::prop(ColliderShape::sphere(1.0), 1.0)).unwrap();

        scene.add_acceleration(body, Vec3::X * 100.0).unwrap();
        scene.add_angular_acceleration(body, Vec3::Z * 100.0).unwrap();
        scene.reset_forces(body).unwrap();
        scene.step(DT);

        assert_eq!(scene.linear_velocity(body).unwrap(), Vec3::ZERO);
        assert_eq!(scene.angular_velocity(body).unwrap(), Vec3::ZERO);
    }

    #[test]
    fn test_simulation_off_is_kinematic() {
        let mut scene = PhysicsScene::default();
        let body = scene
            .add_body(BodyDesc::prop(ColliderShape::sphere(1.0), 1.0).with_position(0.0, 0.0, 50.0))
            .unwrap();
        scene.set_simulate_physics(body, false).unwrap();

        for _ in 0..10 {
            scene.step(DT);
        }
        assert_relative_eq!(scene.pose(body).unwrap().position.z, 50.0, epsilon = 1e-4);
        assert!(!scene.is_simulating(body).unwrap());
    }

    #[test]
    fn test_bounds() {
        let mut scene = weightless();
        let body = scene
            .add_body(BodyDesc::prop(ColliderShape::cuboid(1.5, 2.0, 6.0), 1.0).with_position(10.0, 0.0, 0.0))
            .unwrap();

        let bounds = scene.bounds(body).unwrap();
        assert_relative_eq!(bounds.diagonal(), 13.0, epsilon = 1e-3);
        assert!(bounds.center().abs_diff_eq(Vec3::new(10.0, 0.0, 0.0), 1e-4));
    }

    #[test]
    fn test_attached_child_follows_parent() {
        let mut scene = weightless();
        let hand = scene
            .add_body(BodyDesc::hand(ColliderShape::sphere(2.0)))
            .unwrap();
        scene.set_simulate_physics(hand, true).unwrap();
        let prop = scene
            .add_body(BodyDesc::prop(ColliderShape::sphere(1.0), 1.0).with_position(5.0, 0.0, 0.0))
            .unwrap();

        scene.set_simulate_physics(prop, false).unwrap();
        scene.attach(prop, hand, AttachRule::KEEP_WORLD_WELDED).unwrap();
        assert_eq!(scene.parent_of(prop), Some(hand));
        assert_eq!(
            scene.attach(prop, hand, AttachRule::KEEP_WORLD),
            Err(SceneError::AlreadyAttached(prop))
        );

        scene.set_linear_velocity(hand, Vec3::new(0.0, 90.0, 0.0)).unwrap();
        scene.step(DT);

        let hand_pos = scene.pose(hand).unwrap().position;
        let prop_pos = scene.pose(prop).unwrap().position;
        assert!(hand_pos.y > 0.5);
        assert!((prop_pos - hand_pos).abs_diff_eq(Vec3::new(5.0, 0.0, 0.0), 1e-3));
        assert!(scene.linear_velocity(prop).unwrap().y > 0.0);
        // Bounds follow the welded colliders
        assert!(scene.bounds(prop).unwrap().center().abs_diff_eq(prop_pos, 1e-3));

        scene.detach(prop).unwrap();
        assert_eq!(scene.parent_of(prop), None);
        assert_eq!(scene.linear_velocity(prop).unwrap(), Vec3::ZERO);
        assert_eq!(scene.detach(prop), Err(SceneError::NotAttached(prop)));
    }

    #[test]
    fn test_self_attachment() {
        let mut scene = weightless();
        let body = scene.add_body(BodyDesc::prop(ColliderShape::sphere(1.0), 1.0)).unwrap();
        assert_eq!(
            scene.attach(body, body, AttachRule::KEEP_WORLD),
            Err(SceneError::SelfAttachment(body))
        );
    }

    #[test]
    fn test_volume_overlap_events() {
        let mut scene = weightless();
        let hand = scene.add_body(BodyDesc::hand(ColliderShape::sphere(1.0))).unwrap();
        let volume = scene.add_volume(hand, 10.0, Vec3::ZERO).unwrap();
        let prop = scene
            .add_body(BodyDesc::prop(ColliderShape::sphere(1.0), 1.0).with_position(3.0, 0.0, 0.0))
            .unwrap();
        let quiet = scene
            .add_body(BodyDesc {
                generate_overlaps: false,
                ..BodyDesc::prop(ColliderShape::sphere(1.0), 1.0).with_position(-3.0, 0.0, 0.0)
            })
            .unwrap();

        scene.step(DT);
        let events = scene.drain_overlap_events();
        assert!(events.contains(&OverlapEvent::begin(volume, prop)));
        assert!(!events.iter().any(|e| e.other == quiet || e.other == hand));

        let mut overlapping = scene.overlapping(volume).unwrap();
        overlapping.sort();
        assert_eq!(overlapping, vec![prop, quiet]);

        scene.set_pose(prop, Pose::from_position(Vec3::new(100.0, 0.0, 0.0))).unwrap();
        scene.step(DT);
        assert!(scene
            .drain_overlap_events()
            .contains(&OverlapEvent::end(volume, prop)));
        assert_eq!(scene.overlapping(volume).unwrap(), vec![quiet]);
    }

    #[test]
    fn test_disabled_volume_is_silent() {
        let mut scene = weightless();
        let hand = scene.add_body(BodyDesc::hand(ColliderShape::sphere(1.0))).unwrap();
        let volume = scene.add_volume(hand, 10.0, Vec3::ZERO).unwrap();
        scene.set_volume_enabled(volume, false).unwrap();

        let prop = scene
            .add_body(BodyDesc::prop(ColliderShape::sphere(1.0), 1.0).with_position(3.0, 0.0, 0.0))
            .unwrap();
        scene.step(DT);

        assert!(scene.overlap_events().is_empty());
        // Geometry is still tracked
        assert_eq!(scene.overlapping(volume).unwrap(), vec![prop]);
        assert_eq!(scene.volume_enabled(volume), Ok(false));
        assert_eq!(scene.overlapping(prop), Err(SceneError::NotAVolume(prop)));
    }

    #[test]
    fn test_remove_body() {
        let mut scene = weightless();
        let hand = scene.add_body(BodyDesc::hand(ColliderShape::sphere(1.0))).unwrap();
        let volume = scene.add_volume(hand, 3.0, Vec3::ZERO).unwrap();
        let prop = scene.add_body(BodyDesc::prop(ColliderShape::sphere(1.0), 1.0)).unwrap();
        scene.attach(prop, hand, AttachRule::KEEP_WORLD_WELDED).unwrap();

        scene.remove_body(hand).unwrap();
        assert!(!scene.contains(hand));
        assert!(!scene.is_volume(volume));
        assert_eq!(scene.parent_of(prop), None);
        assert!(scene.bounds(prop).is_ok());
        assert!(matches!(
            scene.remove_body(hand),
            Err(PhysicsError::Scene(SceneError::BodyNotFound(_)))
        ));
    }
}
