//! In-memory scene for exercising components without a physics engine
//!
//! Bodies integrate queued accelerations with explicit Euler, attached
//! children follow their parent, and volume overlaps are whatever the test
//! declares with [`MemoryScene::set_overlapping`]. Declared changes are also
//! queued as overlap events, subject to the same filters a real trigger
//! system applies.

use crate::body::{AttachRule, BodyId, BodyKind, Bounds, Mobility};
use crate::error::{Result, SceneError};
use crate::events::OverlapEvent;
use crate::pose::Pose;
use crate::scene::{Attachments, OverlapVolumes, RigidBodies, Simulation};
use glam::{Quat, Vec3};
use std::collections::HashMap;

/// A body in a [`MemoryScene`]
#[derive(Debug, Clone)]
pub struct MemoryBody {
    pub pose: Pose,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    pub queued_acceleration: Vec3,
    pub queued_angular_acceleration: Vec3,
    pub mass: f32,
    /// Full bounding-box size, centred on the body
    pub size: Vec3,
    pub mobility: Mobility,
    pub kind: BodyKind,
    pub simulating: bool,
    pub gravity: bool,
    pub generate_overlaps: bool,
    pub parent: Option<(BodyId, Pose, AttachRule)>,
}

impl MemoryBody {
    /// Simulated, movable prop
    pub fn prop(mass: f32, size: Vec3) -> Self {
        Self {
            pose: Pose::IDENTITY,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            queued_acceleration: Vec3::ZERO,
            queued_angular_acceleration: Vec3::ZERO,
            mass,
            size,
            mobility: Mobility::Movable,
            kind: BodyKind::StaticMesh,
            simulating: true,
            gravity: true,
            generate_overlaps: true,
            parent: None,
        }
    }

    /// Skeletal hand mesh, not simulating until a follower activates it
    pub fn hand() -> Self {
        Self {
            kind: BodyKind::SkeletalMesh,
            simulating: false,
            mobility: Mobility::Stationary,
            ..Self::prop(1.0, Vec3::splat(10.0))
        }
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.pose.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.pose.rotation = rotation;
        self
    }

    pub fn with_mobility(mut self, mobility: Mobility) -> Self {
        self.mobility = mobility;
        self
    }

    pub fn with_kind(mut self, kind: BodyKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn simulating(mut self, simulating: bool) -> Self {
        self.simulating = simulating;
        self
    }
}

#[derive(Debug, Clone)]
struct MemoryVolume {
    enabled: bool,
    overlapping: Vec<BodyId>,
}

/// Scene kept entirely in memory
#[derive(Debug, Clone)]
pub struct MemoryScene {
    bodies: HashMap<BodyId, MemoryBody>,
    volumes: HashMap<BodyId, MemoryVolume>,
    events: Vec<OverlapEvent>,
    next_id: u64,
    pub gravity: Vec3,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self {
            bodies: HashMap::new(),
            volumes: HashMap::new(),
            events: Vec::new(),
            next_id: 1,
            gravity: Vec3::new(0.0, 0.0, -980.0),
        }
    }

    fn allocate(&mut self) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn add_body(&mut self, body: MemoryBody) -> BodyId {
        let id = self.allocate();
        self.bodies.insert(id, body);
        id
    }

    pub fn add_volume(&mut self) -> BodyId {
        let id = self.allocate();
        self.volumes.insert(
            id,
            MemoryVolume {
                enabled: true,
                overlapping: Vec::new(),
            },
        );
        id
    }

    /// Destroy a body or volume
    pub fn remove(&mut self, id: BodyId) {
        self.bodies.remove(&id);
        self.volumes.remove(&id);
    }

    /// Declare what a volume geometrically overlaps.
    ///
    /// Bodies entering or leaving queue begin/end events while the volume is
    /// enabled and the body generates overlaps.
    pub fn set_overlapping(&mut self, volume: BodyId, bodies: Vec<BodyId>) {
        let Some(v) = self.volumes.get_mut(&volume) else {
            return;
        };
        let previous = std::mem::replace(&mut v.overlapping, bodies);
        if !v.enabled {
            return;
        }

        let current = &v.overlapping;
        let ended = previous.iter().filter(|b| !current.contains(b));
        let began = current.iter().filter(|b| !previous.contains(b));
        let audible = |b: &&BodyId| self.bodies.get(*b).is_some_and(|body| body.generate_overlaps);

        let ended: Vec<_> = ended.filter(audible).map(|b| OverlapEvent::end(volume, *b)).collect();
        let began: Vec<_> = began.filter(audible).map(|b| OverlapEvent::begin(volume, *b)).collect();
        self.events.extend(ended);
        self.events.extend(began);
    }

    /// Queued overlap events, without taking them
    pub fn pending_events(&self) -> &[OverlapEvent] {
        &self.events
    }

    pub fn body(&self, id: BodyId) -> Option<&MemoryBody> {
        self.bodies.get(&id)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut MemoryBody> {
        self.bodies.get_mut(&id)
    }

    fn get(&self, id: BodyId) -> Result<&MemoryBody> {
        self.bodies.get(&id).ok_or(SceneError::BodyNotFound(id))
    }

    fn get_mut(&mut self, id: BodyId) -> Result<&mut MemoryBody> {
        self.bodies.get_mut(&id).ok_or(SceneError::BodyNotFound(id))
    }

    fn volume(&self, id: BodyId) -> Result<&MemoryVolume> {
        self.volumes.get(&id).ok_or(SceneError::NotAVolume(id))
    }

    /// Advance free bodies, then move attached children with their parents
    pub fn step(&mut self, dt: f32) {
        let gravity = self.gravity;
        for body in self.bodies.values_mut() {
            let free = body.parent.is_none() && body.simulating && body.mobility.is_movable();
            if free {
                let g = if body.gravity { gravity } else { Vec3::ZERO };
                body.linear_velocity += (body.queued_acceleration + g) * dt;
                body.angular_velocity += body.queued_angular_acceleration * dt;
                body.pose.position += body.linear_velocity * dt;

                let spin = body.angular_velocity * dt;
                if spin.length_squared() > 0.0 {
                    let delta = Quat::from_scaled_axis(spin);
                    body.pose.rotation = (delta * body.pose.rotation).normalize();
                }
            }
            body.queued_acceleration = Vec3::ZERO;
            body.queued_angular_acceleration = Vec3::ZERO;
        }

        let attached: Vec<_> = self
            .bodies
            .iter()
            .filter_map(|(id, b)| b.parent.map(|(parent, local, _)| (*id, parent, local)))
            .collect();
        for (child, parent, local) in attached {
            let Some((parent_pose, parent_vel)) = self
                .bodies
                .get(&parent)
                .map(|p| (p.pose, p.linear_velocity))
            else {
                continue;
            };
            if let Some(body) = self.bodies.get_mut(&child) {
                body.pose = parent_pose.compose(&local);
                body.linear_velocity = parent_vel;
            }
        }
    }
}

impl Default for MemoryScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulation for MemoryScene {
    fn advance(&mut self, dt: f32) {
        self.step(dt);
    }

    fn take_overlap_events(&mut self) -> Vec<OverlapEvent> {
        std::mem::take(&mut self.events)
    }
}

impl RigidBodies for MemoryScene {
    fn contains(&self, body: BodyId) -> bool {
        self.bodies.contains_key(&body)
    }

    fn pose(&self, body: BodyId) -> Result<Pose> {
        Ok(self.get(body)?.pose)
    }

    fn set_pose(&mut self, body: BodyId, pose: Pose) -> Result<()> {
        self.get_mut(body)?.pose = pose;
        Ok(())
    }

    fn linear_velocity(&self, body: BodyId) -> Result<Vec3> {
        Ok(self.get(body)?.linear_velocity)
    }

    fn set_linear_velocity(&mut self, body: BodyId, velocity: Vec3) -> Result<()> {
        self.get_mut(body)?.linear_velocity = velocity;
        Ok(())
    }

    fn angular_velocity(&self, body: BodyId) -> Result<Vec3> {
        Ok(self.get(body)?.angular_velocity)
    }

    fn set_angular_velocity(&mut self, body: BodyId, velocity: Vec3) -> Result<()> {
        self.get_mut(body)?.angular_velocity = velocity;
        Ok(())
    }

    fn add_acceleration(&mut self, body: BodyId, acceleration: Vec3) -> Result<()> {
        self.get_mut(body)?.queued_acceleration += acceleration;
        Ok(())
    }

    fn add_angular_acceleration(&mut self, body: BodyId, acceleration: Vec3) -> Result<()> {
        self.get_mut(body)?.queued_angular_acceleration += acceleration;
        Ok(())
    }

    fn reset_forces(&mut self, body: BodyId) -> Result<()> {
        let b = self.get_mut(body)?;
        b.queued_acceleration = Vec3::ZERO;
        b.queued_angular_acceleration = Vec3::ZERO;
        Ok(())
    }

    fn mass(&self, body: BodyId) -> Result<f32> {
        Ok(self.get(body)?.mass)
    }

    fn bounds(&self, body: BodyId) -> Result<Bounds> {
        let b = self.get(body)?;
        Ok(Bounds::from_center_size(b.pose.position, b.size))
    }

    fn mobility(&self, body: BodyId) -> Result<Mobility> {
        Ok(self.get(body)?.mobility)
    }

    fn set_mobility(&mut self, body: BodyId, mobility: Mobility) -> Result<()> {
        self.get_mut(body)?.mobility = mobility;
        Ok(())
    }

    fn kind(&self, body: BodyId) -> Result<BodyKind> {
        Ok(self.get(body)?.kind)
    }

    fn is_simulating(&self, body: BodyId) -> Result<bool> {
        Ok(self.get(body)?.simulating)
    }

    fn set_simulate_physics(&mut self, body: BodyId, simulate: bool) -> Result<()> {
        self.get_mut(body)?.simulating = simulate;
        Ok(())
    }

    fn set_gravity_enabled(&mut self, body: BodyId, enabled: bool) -> Result<()> {
        self.get_mut(body)?.gravity = enabled;
        Ok(())
    }

    fn generates_overlaps(&self, body: BodyId) -> Result<bool> {
        Ok(self.get(body)?.generate_overlaps)
    }

    fn set_generate_overlaps(&mut self, body: BodyId, enabled: bool) -> Result<()> {
        self.get_mut(body)?.generate_overlaps = enabled;
        Ok(())
    }
}

impl Attachments for MemoryScene {
    fn attach(&mut self, child: BodyId, parent: BodyId, rule: AttachRule) -> Result<()> {
        if child == parent {
            return Err(SceneError::SelfAttachment(child));
        }
        let parent_pose = self.get(parent)?.pose;
        let body = self.get_mut(child)?;
        if body.parent.is_some() {
            return Err(SceneError::AlreadyAttached(child));
        }
        body.parent = Some((parent, body.pose.relative_to(&parent_pose), rule));
        Ok(())
    }

    fn detach(&mut self, child: BodyId) -> Result<()> {
        let body = self.get_mut(child)?;
        if body.parent.take().is_none() {
            return Err(SceneError::NotAttached(child));
        }
        body.linear_velocity = Vec3::ZERO;
        body.angular_velocity = Vec3::ZERO;
        Ok(())
    }

    fn parent_of(&self, child: BodyId) -> Option<BodyId> {
        self.bodies.get(&child).and_then(|b| b.parent.map(|(p, _, _)| p))
    }
}

impl OverlapVolumes for MemoryScene {
    fn is_volume(&self, volume: BodyId) -> bool {
        self.volumes.contains_key(&volume)
    }

    fn volume_enabled(&self, volume: BodyId) -> Result<bool> {
        Ok(self.volume(volume)?.enabled)
    }

    fn set_volume_enabled(&mut self, volume: BodyId, enabled: bool) -> Result<()> {
        self.volumes
            .get_mut(&volume)
            .map(|v| v.enabled = enabled)
            .ok_or(SceneError::NotAVolume(volume))
    }

    fn overlapping(&self, volume: BodyId) -> Result<Vec<BodyId>> {
        // Destroyed bodies no longer overlap anything
        Ok(self
            .volume(volume)?
            .overlapping
            .iter()
            .copied()
            .filter(|id| self.bodies.contains_key(id))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attached_child_follows_parent() {
        let mut scene = MemoryScene::new();
        let parent = scene.add_body(MemoryBody::hand().simulating(true).at(Vec3::ZERO));
        let child = scene.add_body(MemoryBody::prop(1.0, Vec3::ONE).at(Vec3::X));
        scene.set_gravity_enabled(parent, false).unwrap();
        scene.set_mobility(parent, Mobility::Movable).unwrap();

        scene.attach(child, parent, AttachRule::KEEP_WORLD).unwrap();
        scene.set_linear_velocity(parent, Vec3::Y).unwrap();
        scene.step(1.0);

        assert!(scene.pose(child).unwrap().position.abs_diff_eq(Vec3::new(1.0, 1.0, 0.0), 1e-5));
        assert_eq!(scene.linear_velocity(child).unwrap(), Vec3::Y);

        scene.detach(child).unwrap();
        assert_eq!(scene.linear_velocity(child).unwrap(), Vec3::ZERO);
        assert_eq!(scene.detach(child), Err(SceneError::NotAttached(child)));
    }

    #[test]
    fn test_overlap_changes_queue_events() {
        let mut scene = MemoryScene::new();
        let volume = scene.add_volume();
        let a = scene.add_body(MemoryBody::prop(1.0, Vec3::ONE));
        let b = scene.add_body(MemoryBody::prop(1.0, Vec3::ONE));
        scene.set_generate_overlaps(b, false).unwrap();

        scene.set_overlapping(volume, vec![a, b]);
        assert_eq!(scene.take_overlap_events(), vec![OverlapEvent::begin(volume, a)]);

        scene.set_volume_enabled(volume, false).unwrap();
        scene.set_overlapping(volume, vec![]);
        assert!(scene.take_overlap_events().is_empty());

        scene.set_volume_enabled(volume, true).unwrap();
        scene.set_overlapping(volume, vec![a]);
        scene.set_overlapping(volume, vec![]);
        assert_eq!(
            scene.take_overlap_events(),
            vec![OverlapEvent::begin(volume, a), OverlapEvent::end(volume, a)]
        );
    }

    #[test]
    fn test_removed_body_leaves_overlaps() {
        let mut scene = MemoryScene::new();
        let volume = scene.add_volume();
        let a = scene.add_body(MemoryBody::prop(1.0, Vec3::ONE));
        let b = scene.add_body(MemoryBody::prop(1.0, Vec3::ONE));
        scene.set_overlapping(volume, vec![a, b]);

        scene.remove(a);
        assert_eq!(scene.overlapping(volume).unwrap(), vec![b]);
        assert!(!scene.contains(a));
    }
}
