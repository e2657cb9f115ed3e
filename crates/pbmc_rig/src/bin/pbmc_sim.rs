//! Headless rig driver
//!
//! Builds a Rapier scene from the rig config, replays a scripted controller
//! path for the right hand (reach down, grab the mug, carry it, let go) and
//! logs grasp events along the way.
//!
//! Run with: cargo run --bin pbmc-sim
//!      or:  PBMC_CONFIG=rig.toml RUST_LOG=debug cargo run --bin pbmc-sim

use glam::Vec3;
use pbmc_core::{BodyId, MotionSource, Pose, RigidBodies, TrackingTable};
use pbmc_rig::prelude::*;

/// Seconds of simulated time
const DURATION: f32 = 7.0;

/// Seconds between position reports
const REPORT_INTERVAL: f32 = 0.5;

/// Right hand path, offsets from its start position
const RIGHT_PATH: &[(f32, [f32; 3])] = &[
    (0.0, [0.0, 0.0, 0.0]),
    (1.0, [0.0, 0.0, 0.0]),
    (2.5, [0.0, 0.0, -48.0]),
    (3.0, [0.0, 0.0, -48.0]),
    (4.5, [-20.0, 0.0, -10.0]),
    (7.0, [-20.0, 0.0, -10.0]),
];

/// Input script: time, action, state
const ACTIONS: &[(f32, &str, ButtonState)] = &[
    (2.8, "RightFixate", ButtonState::Pressed),
    (5.0, "RightFixate", ButtonState::Released),
];

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("Simulation failed: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = RigConfig::load()?;
    let mut spawned = spawn(&config)?;
    let dt = config.tick_interval();

    let left_start = Vec3::from(config.left_hand.start);
    let right_start = Vec3::from(config.right_hand.start);
    let mug = spawned.prop("mug");

    let mut tracking = TrackingTable::new();
    let mut next_action = 0;
    let mut next_report = 0.0;
    let mut events = Vec::new();

    let ticks = (DURATION / dt).ceil() as u64;
    for i in 0..ticks {
        let time = i as f32 * dt;

        tracking.set(MotionSource::Left, Pose::from_position(left_start));
        tracking.set(
            MotionSource::Right,
            Pose::from_position(right_start + sample_path(RIGHT_PATH, time)),
        );

        while let Some((at, action, state)) = ACTIONS.get(next_action) {
            if *at > time {
                break;
            }
            if let Some(event) = spawned.rig.input(&mut spawned.scene, action, *state) {
                events.push(event);
            } else {
                log::info!("{} {:?} at {:.2}s had no effect", action, state, time);
            }
            next_action += 1;
        }

        spawned.rig.tick(&mut spawned.scene, &tracking, dt);

        if time >= next_report {
            report(&spawned, mug, time);
            next_report += REPORT_INTERVAL;
        }
    }

    log::info!(
        "Done after {} ticks: {} grasp event(s), right hand {:?}",
        spawned.rig.tick_count(),
        events.len(),
        spawned.rig.hand(Hand::Right).state()
    );
    Ok(())
}

/// Piecewise-linear path lookup
fn sample_path(path: &[(f32, [f32; 3])], time: f32) -> Vec3 {
    let Some(&(_, first)) = path.first() else {
        return Vec3::ZERO;
    };
    let mut previous = (0.0, Vec3::from(first));
    for &(at, point) in path {
        let point = Vec3::from(point);
        if time <= at {
            let span = at - previous.0;
            if span <= 0.0 {
                return point;
            }
            return previous.1.lerp(point, (time - previous.0) / span);
        }
        previous = (at, point);
    }
    previous.1
}

fn report(spawned: &Spawned, mug: Option<BodyId>, time: f32) {
    let hand = spawned.hand_body(Hand::Right);
    let hand_pos = spawned.scene.pose(hand).map(|p| p.position).unwrap_or(Vec3::NAN);
    match mug.and_then(|m| spawned.scene.pose(m).ok()) {
        Some(mug_pose) => log::info!(
            "t={:.1}s right hand at {:.1?} ({:?}), mug at {:.1?}",
            time,
            hand_pos,
            spawned.rig.hand(Hand::Right).state(),
            mug_pose.position
        ),
        None => log::info!("t={:.1}s right hand at {:.1?}", time, hand_pos),
    }
}
