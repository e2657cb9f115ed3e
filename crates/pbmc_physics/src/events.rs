//! Sensor event collection

use crossbeam_channel::{Receiver, Sender};
use rapier3d::prelude as rapier;

/// Sensor begin/end between two colliders, as reported by Rapier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SensorContact {
    pub collider1: rapier::ColliderHandle,
    pub collider2: rapier::ColliderHandle,
    pub started: bool,
}

/// Channel-based event collector for Rapier
pub(crate) struct ChannelEventCollector {
    sensor_events: Sender<SensorContact>,
}

impl ChannelEventCollector {
    pub fn new() -> (Self, Receiver<SensorContact>) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        (
            Self {
                sensor_events: sender,
            },
            receiver,
        )
    }
}

impl rapier::EventHandler for ChannelEventCollector {
    fn handle_collision_event(
        &self,
        _bodies: &rapier::RigidBodySet,
        _colliders: &rapier::ColliderSet,
        event: rapier::CollisionEvent,
        _contact_pair: Option<&rapier::ContactPair>,
    ) {
        if !event.sensor() {
            return;
        }
        let contact = match event {
            rapier::CollisionEvent::Started(h1, h2, _) => SensorContact {
                collider1: h1,
                collider2: h2,
                started: true,
            },
            rapier::CollisionEvent::Stopped(h1, h2, _) => SensorContact {
                collider1: h1,
                collider2: h2,
                started: false,
            },
        };
        let _ = self.sensor_events.send(contact);
    }

    fn handle_contact_force_event(
        &self,
        _dt: f32,
        _bodies: &rapier::RigidBodySet,
        _colliders: &rapier::ColliderSet,
        _contact_pair: &rapier::ContactPair,
        _total_force_magnitude: f32,
    ) {
    }
}
