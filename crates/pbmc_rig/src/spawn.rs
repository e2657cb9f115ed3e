//! Scene setup from a rig configuration

use crate::config::RigConfig;
use crate::error::{Result, RigError};
use crate::hand::Hand;
use crate::rig::Rig;
use glam::Vec3;
use pbmc_core::BodyId;
use pbmc_physics::{BodyDesc, ColliderShape, PhysicsScene};

/// Half thickness of the floor slab
const GROUND_HALF_THICKNESS: f32 = 5.0;
const GROUND_HALF_EXTENT: f32 = 500.0;

/// A populated scene and the rig driving it
pub struct Spawned {
    pub scene: PhysicsScene,
    pub rig: Rig,
    pub left: BodyId,
    pub right: BodyId,
    /// Props by configured name
    pub props: Vec<(String, BodyId)>,
}

impl Spawned {
    /// Body spawned for a named prop
    pub fn prop(&self, name: &str) -> Option<BodyId> {
        self.props.iter().find(|(n, _)| n == name).map(|(_, id)| *id)
    }

    pub fn hand_body(&self, hand: Hand) -> BodyId {
        match hand {
            Hand::Left => self.left,
            Hand::Right => self.right,
        }
    }
}

/// Build a Rapier scene with two hands, their grasp volumes and the
/// configured props, and activate a rig on it.
pub fn spawn(config: &RigConfig) -> Result<Spawned> {
    config.validate()?;
    let mut scene = PhysicsScene::new(config.physics.clone())?;

    if config.ground {
        let slab = ColliderShape::cuboid(GROUND_HALF_EXTENT, GROUND_HALF_EXTENT, GROUND_HALF_THICKNESS);
        scene.add_body(BodyDesc::fixed(slab).with_position(0.0, 0.0, -GROUND_HALF_THICKNESS))?;
    }

    let mut rig = Rig::new(config.follower.clone(), config.grasp.clone());
    let mut bodies = [BodyId::new(0); 2];
    for (slot, hand, hand_config) in [
        (0, Hand::Left, &config.left_hand),
        (1, Hand::Right, &config.right_hand),
    ] {
        let [x, y, z] = hand_config.start;
        let body = scene.add_body(BodyDesc::hand(hand_config.shape.clone()).with_position(x, y, z))?;
        let volume = scene.add_volume(
            body,
            config.grasp.volume_radius,
            Vec3::from(hand_config.volume_offset),
        )?;

        if !rig.init_hand(&mut scene, hand, Some(body), Some(volume), None) {
            return Err(RigError::Activation(hand));
        }
        bodies[slot] = body;
    }

    let mut props = Vec::with_capacity(config.props.len());
    for prop in &config.props {
        let [x, y, z] = prop.position;
        let id = scene.add_body(BodyDesc::prop(prop.shape.clone(), prop.mass).with_position(x, y, z))?;
        log::debug!("Spawned prop '{}' as {}", prop.name, id);
        props.push((prop.name.clone(), id));
    }

    log::info!(
        "Scene ready: {} bodies, {} volumes",
        scene.body_count(),
        scene.volume_count()
    );
    Ok(Spawned {
        scene,
        rig,
        left: bodies[0],
        right: bodies[1],
        props,
    })
}
