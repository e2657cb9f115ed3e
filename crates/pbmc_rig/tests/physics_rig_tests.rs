//! End-to-end grasp on the Rapier scene

use pbmc_core::prelude::*;
use pbmc_core::Vec3;
use pbmc_grasp::GraspState;
use pbmc_physics::ColliderShape;
use pbmc_rig::{spawn, ButtonState, GraspEvent, Hand, HandConfig, PropConfig, RigConfig, Spawned};

/// Weightless scene: right hand at the origin, one small ball just above it
fn weightless() -> (Spawned, TrackingTable, f32) {
    let mut config = RigConfig {
        ground: false,
        props: vec![PropConfig::new("ball", ColliderShape::sphere(1.0), 0.5, [0.0, 0.0, 3.5])],
        ..Default::default()
    };
    config.physics.gravity = [0.0, 0.0, 0.0];
    config.left_hand = HandConfig {
        start: [-50.0, 0.0, 0.0],
        ..Default::default()
    };
    config.right_hand = HandConfig {
        start: [0.0, 0.0, 0.0],
        ..Default::default()
    };

    let dt = config.tick_interval();
    let spawned = spawn(&config).unwrap();
    let mut tracking = TrackingTable::new();
    tracking.set(MotionSource::Left, Pose::from_position(Vec3::new(-50.0, 0.0, 0.0)));
    tracking.set(MotionSource::Right, Pose::IDENTITY);
    (spawned, tracking, dt)
}

#[test]
fn test_grab_carry_release() {
    let (mut s, mut tracking, dt) = weightless();
    let ball = s.prop("ball").unwrap();

    for _ in 0..5 {
        s.rig.tick(&mut s.scene, &tracking, dt);
    }
    assert_eq!(s.rig.hand(Hand::Right).state(), GraspState::InReach);
    assert_eq!(s.rig.hand(Hand::Left).state(), GraspState::Idle);

    let event = s.rig.input(&mut s.scene, "RightFixate", ButtonState::Pressed);
    assert_eq!(
        event,
        Some(GraspEvent::Started {
            hand: Hand::Right,
            object: ball
        })
    );
    assert_eq!(s.scene.parent_of(ball), Some(s.right));
    assert!(!s.scene.is_simulating(ball).unwrap());

    // Carry it up by 20
    tracking.set(MotionSource::Right, Pose::from_position(Vec3::new(0.0, 0.0, 20.0)));
    for _ in 0..120 {
        s.rig.tick(&mut s.scene, &tracking, dt);
    }
    let hand_z = s.scene.pose(s.right).unwrap().position.z;
    let ball_z = s.scene.pose(ball).unwrap().position.z;
    assert!(hand_z > 15.0, "hand at z={}", hand_z);
    assert!((ball_z - hand_z - 3.5).abs() < 0.5, "ball at z={}, hand at z={}", ball_z, hand_z);

    let event = s.rig.input(&mut s.scene, "RightFixate", ButtonState::Released);
    assert_eq!(event.map(|e| e.object()), Some(ball));
    assert_eq!(s.scene.parent_of(ball), None);
    assert!(s.scene.is_simulating(ball).unwrap());
    assert!(s.scene.volume_enabled(s.rig.hand(Hand::Right).grasp().volume().unwrap()).unwrap());
}

#[test]
fn test_release_without_grasp() {
    let (mut s, tracking, dt) = weightless();
    s.rig.tick(&mut s.scene, &tracking, dt);
    assert_eq!(s.rig.input(&mut s.scene, "RightFixate", ButtonState::Released), None);
    assert_eq!(s.rig.input(&mut s.scene, "LeftFixate", ButtonState::Pressed), None);
}

#[test]
fn test_release_after_hand_removed() {
    let (mut s, tracking, dt) = weightless();
    let ball = s.prop("ball").unwrap();
    for _ in 0..5 {
        s.rig.tick(&mut s.scene, &tracking, dt);
    }
    assert!(s.rig.input(&mut s.scene, "RightFixate", ButtonState::Pressed).is_some());

    s.scene.remove_body(s.right).unwrap();
    let event = s.rig.input(&mut s.scene, "RightFixate", ButtonState::Released);
    assert_eq!(event.map(|e| e.object()), Some(ball));
    assert!(s.scene.is_simulating(ball).unwrap());
    assert!(s.scene.generates_overlaps(ball).unwrap());
    assert!(!s.rig.hand(Hand::Right).grasp().is_active());

    // Left hand is unaffected
    s.rig.tick(&mut s.scene, &tracking, dt);
    assert!(s.rig.hand(Hand::Left).grasp().is_active());
}
