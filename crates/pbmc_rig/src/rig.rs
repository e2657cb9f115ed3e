//! Two-handed rig and its tick order

use crate::hand::{GraspEvent, Hand, HandRig};
use crate::input::{ActionBindings, ButtonState};
use pbmc_control::FollowerConfig;
use pbmc_core::prelude::*;
use pbmc_grasp::GraspConfig;

/// Both hands plus the host-owned scheduler and overlap bus
#[derive(Debug)]
pub struct Rig {
    left: HandRig,
    right: HandRig,
    scheduler: TickScheduler,
    bus: OverlapBus,
    bindings: ActionBindings,
}

impl Rig {
    pub fn new(follower: FollowerConfig, grasp: GraspConfig) -> Self {
        Self {
            left: HandRig::new(Hand::Left, follower.clone(), grasp.clone()),
            right: HandRig::new(Hand::Right, follower, grasp),
            scheduler: TickScheduler::new(),
            bus: OverlapBus::new(),
            bindings: ActionBindings::default(),
        }
    }

    /// Replace the input bindings
    pub fn with_bindings(mut self, bindings: ActionBindings) -> Self {
        self.bindings = bindings;
        self
    }

    /// Activate one hand on a body and its grasp volume
    pub fn init_hand(
        &mut self,
        scene: &mut dyn Scene,
        hand: Hand,
        body: Option<BodyId>,
        volume: Option<BodyId>,
        offset: Option<Pose>,
    ) -> bool {
        let rig = match hand {
            Hand::Left => &mut self.left,
            Hand::Right => &mut self.right,
        };
        rig.init(scene, &mut self.scheduler, &mut self.bus, body, volume, offset)
    }

    /// Release held objects and deactivate both hands
    pub fn teardown(&mut self, scene: &mut dyn Scene) {
        for rig in [&mut self.left, &mut self.right] {
            rig.teardown(scene, &mut self.scheduler, &mut self.bus);
        }
    }

    pub fn hand(&self, hand: Hand) -> &HandRig {
        match hand {
            Hand::Left => &self.left,
            Hand::Right => &self.right,
        }
    }

    pub fn hand_mut(&mut self, hand: Hand) -> &mut HandRig {
        match hand {
            Hand::Left => &mut self.left,
            Hand::Right => &mut self.right,
        }
    }

    pub fn bindings(&self) -> &ActionBindings {
        &self.bindings
    }

    pub fn bindings_mut(&mut self) -> &mut ActionBindings {
        &mut self.bindings
    }

    /// Current tick number
    pub fn tick_count(&self) -> u64 {
        self.scheduler.tick()
    }

    /// Route a button action to its hand
    pub fn input(&mut self, scene: &mut dyn Scene, action: &str, state: ButtonState) -> Option<GraspEvent> {
        let Some((hand, command)) = self.bindings.resolve(action, state) else {
            log::trace!("Unbound action {}", action);
            return None;
        };

        let event = self.hand_mut(hand).handle(scene, command);
        if let Some(event) = &event {
            log_grasp_event(event);
        }
        event
    }

    /// Advance one host tick.
    ///
    /// Followers run before due tasks so a snap on the activation tick
    /// overrides that tick's PID output. Overlaps raised by the physics step
    /// reach the grasp controllers on the same tick.
    pub fn tick<S: Simulation>(&mut self, scene: &mut S, tracking: &dyn TrackingSource, dt: f32) {
        let tick = self.scheduler.begin_tick();
        {
            let mut frame = Frame::new(&mut *scene, tracking, tick);
            self.left.follower_mut().on_tick(&mut frame, dt);
            self.right.follower_mut().on_tick(&mut frame, dt);
            let ran = self.scheduler.run_due(&mut frame);
            if ran > 0 {
                log::trace!("Tick {}: ran {} scheduled task(s)", tick, ran);
            }
        }

        scene.advance(dt);

        let events = scene.take_overlap_events();
        self.bus.publish_all(events);
        for rig in [&mut self.left, &mut self.right] {
            rig.grasp_mut().pump_overlaps(&*scene);
        }
    }
}

fn log_grasp_event(event: &GraspEvent) {
    match event {
        GraspEvent::Started { hand, object } => log::info!("Grasp started: {} hand holds {}", hand, object),
        GraspEvent::Finished { hand, object } => log::info!("Grasp finished: {} hand released {}", hand, object),
    }
}
