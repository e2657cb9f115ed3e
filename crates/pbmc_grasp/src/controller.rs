//! Grasp state machine

use crate::config::GraspConfig;
use crate::eligibility::{can_be_grasped, GraspCandidate};
use crate::reach::ReachSet;
use pbmc_core::prelude::*;
use pbmc_core::Vec3;

/// Observable grasp state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraspState {
    /// Nothing in reach, nothing held
    Idle,
    /// At least one candidate overlaps the grasp volume
    InReach,
    /// An object is attached to the hand
    Fixated,
}

/// Fixation grasp for one hand
#[derive(Debug)]
pub struct GraspController {
    config: GraspConfig,
    volume: Option<BodyId>,
    hand: Option<BodyId>,
    subscription: Option<Subscription>,
    reach: ReachSet,
    fixated: Option<BodyId>,
}

impl GraspController {
    pub fn new(config: GraspConfig) -> Self {
        Self {
            config,
            volume: None,
            hand: None,
            subscription: None,
            reach: ReachSet::new(),
            fixated: None,
        }
    }

    /// Bind to a grasp volume and a hand anchor and start listening to the
    /// volume's overlaps.
    ///
    /// Returns whether the controller is active. Without a valid volume and
    /// hand it stays inactive and every trigger is a no-op.
    pub fn init(
        &mut self,
        scene: &dyn Scene,
        bus: &mut OverlapBus,
        volume: Option<BodyId>,
        hand: Option<BodyId>,
    ) -> bool {
        self.teardown(bus);

        let (Some(volume), Some(hand)) = (volume, hand) else {
            log::warn!("Grasp controller needs both a volume and a hand, staying inactive");
            return false;
        };
        if !scene.is_volume(volume) {
            log::warn!("Grasp controller: {} is not an overlap volume", volume);
            return false;
        }
        if !scene.contains(hand) {
            log::warn!("Grasp controller: hand {} not found", hand);
            return false;
        }

        self.volume = Some(volume);
        self.hand = Some(hand);
        self.subscription = Some(bus.subscribe(volume));
        log::debug!("Grasp controller on volume {} for hand {}", volume, hand);
        true
    }

    /// Stop listening and forget all bodies.
    ///
    /// A held object stays attached; release it with [`try_detach`] first.
    ///
    /// [`try_detach`]: GraspController::try_detach
    pub fn teardown(&mut self, bus: &mut OverlapBus) {
        if let Some(subscription) = self.subscription.take() {
            bus.unsubscribe(subscription.id());
        }
        self.volume = None;
        self.hand = None;
        self.fixated = None;
        self.reach.clear();
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.volume.is_some() && self.hand.is_some()
    }

    pub fn state(&self) -> GraspState {
        if self.fixated.is_some() {
            GraspState::Fixated
        } else if !self.reach.is_empty() {
            GraspState::InReach
        } else {
            GraspState::Idle
        }
    }

    pub fn config(&self) -> &GraspConfig {
        &self.config
    }

    pub fn reach(&self) -> &ReachSet {
        &self.reach
    }

    pub fn fixated(&self) -> Option<BodyId> {
        self.fixated
    }

    pub fn volume(&self) -> Option<BodyId> {
        self.volume
    }

    pub fn hand(&self) -> Option<BodyId> {
        self.hand
    }

    /// Grab the most recently entered eligible candidate.
    ///
    /// Ineligible candidates are dropped on the way. Returns the fixated
    /// body, or `None` if something is already held or nothing qualifies.
    pub fn try_fixate(&mut self, scene: &mut dyn Scene) -> Option<BodyId> {
        if !self.check_bindings(&*scene) || self.fixated.is_some() {
            return None;
        }

        while let Some(candidate) = self.reach.pop() {
            let eligible = GraspCandidate::capture(&*scene, candidate)
                .is_some_and(|c| can_be_grasped(&c, &self.config));
            if !eligible {
                log::trace!("{} cannot be grasped", candidate);
                continue;
            }

            match self.fixate_object(scene, candidate) {
                Ok(()) => return Some(candidate),
                Err(e) => log::warn!("Failed to fixate {}: {}", candidate, e),
            }
        }
        None
    }

    /// Attach `object` to the hand at its current world pose.
    ///
    /// Simulation is turned off for the object and the grasp volume stops
    /// generating overlaps until the object is released.
    pub fn fixate_object(&mut self, scene: &mut dyn Scene, object: BodyId) -> Result<()> {
        let (Some(volume), Some(hand)) = (self.volume, self.hand) else {
            return Ok(());
        };

        let rule = if self.config.weld_fixation {
            AttachRule::KEEP_WORLD_WELDED
        } else {
            AttachRule::KEEP_WORLD
        };

        scene.set_simulate_physics(object, false)?;
        if let Err(e) = scene.attach(object, hand, rule) {
            scene.set_simulate_physics(object, true)?;
            return Err(e);
        }
        if let Err(e) = scene.set_volume_enabled(volume, false) {
            scene.detach(object)?;
            scene.set_simulate_physics(object, true)?;
            return Err(e);
        }

        self.fixated = Some(object);
        self.reach.clear();
        log::debug!("Fixated {} to hand {}", object, hand);
        Ok(())
    }

    /// Release the held object, keeping its momentum.
    ///
    /// Returns the released body, or `None` if nothing was held. Afterwards
    /// the reach set holds exactly the qualifying bodies overlapping the
    /// volume at this instant. The object is released even if the hand or
    /// volume has been destroyed meanwhile.
    pub fn try_detach(&mut self, scene: &mut dyn Scene) -> Option<BodyId> {
        let object = self.fixated.take()?;

        if scene.contains(object) {
            if let Err(e) = release(scene, object) {
                log::warn!("Failed to release {}: {}", object, e);
            }
        } else {
            log::debug!("Held object {} vanished before release", object);
        }

        if let Some(volume) = self.volume.filter(|v| scene.is_volume(*v)) {
            if let Err(e) = scene.set_volume_enabled(volume, true) {
                log::warn!("Failed to re-enable grasp volume {}: {}", volume, e);
            }
        }
        self.check_bindings(&*scene);
        self.refresh_reach(&*scene);
        Some(object)
    }

    /// Whether the controller is active with its hand and volume still in
    /// the scene. Deactivates if either is gone; a held object stays
    /// recorded so [`try_detach`] can still release it.
    ///
    /// [`try_detach`]: GraspController::try_detach
    fn check_bindings(&mut self, scene: &dyn Scene) -> bool {
        let (Some(volume), Some(hand)) = (self.volume, self.hand) else {
            return false;
        };
        if scene.is_volume(volume) && scene.contains(hand) {
            return true;
        }

        log::warn!("Grasp volume {} or hand {} is gone, deactivating", volume, hand);
        self.volume = None;
        self.hand = None;
        self.reach.clear();
        false
    }

    /// Rebuild the reach set from the volume's current overlaps.
    ///
    /// Leaves the set empty while an object is held.
    pub fn refresh_reach(&mut self, scene: &dyn Scene) {
        self.reach.clear();
        let Some(volume) = self.volume.filter(|_| self.fixated.is_none()) else {
            return;
        };

        match scene.overlapping(volume) {
            Ok(bodies) => {
                for body in bodies {
                    if self.qualifies(scene, body) {
                        self.reach.insert(body);
                    }
                }
            }
            Err(e) => log::warn!("Cannot query overlaps of {}: {}", volume, e),
        }
    }

    /// Deliver queued overlap events from the bus. Returns how many were
    /// handled.
    pub fn pump_overlaps(&mut self, scene: &dyn Scene) -> usize {
        let Some(subscription) = &self.subscription else {
            return 0;
        };
        let events: Vec<OverlapEvent> = subscription.drain().collect();

        for event in &events {
            match event.kind {
                OverlapKind::Begin => self.on_overlap_begin(scene, event.other),
                OverlapKind::End => self.on_overlap_end(event.other),
            }
        }
        events.len()
    }

    /// Static-mesh props other than the hand and the volume itself
    fn qualifies(&self, scene: &dyn Scene, body: BodyId) -> bool {
        Some(body) != self.hand
            && Some(body) != self.volume
            && scene.contains(body)
            && matches!(scene.kind(body), Ok(BodyKind::StaticMesh))
    }
}

impl VolumeOverlapListener for GraspController {
    fn on_overlap_begin(&mut self, scene: &dyn Scene, other: BodyId) {
        if !self.check_bindings(scene) || self.fixated.is_some() {
            return;
        }
        if self.qualifies(scene, other) && self.reach.insert(other) {
            log::trace!("{} in reach", other);
        }
    }

    fn on_overlap_end(&mut self, other: BodyId) {
        if !self.is_active() || self.fixated.is_some() {
            return;
        }
        if self.reach.remove(other) {
            log::trace!("{} out of reach", other);
        }
    }
}

fn release(scene: &mut dyn Scene, object: BodyId) -> Result<()> {
    // Detaching resets velocity
    let velocity = scene.linear_velocity(object).unwrap_or(Vec3::ZERO);

    // Destroying the hand may already have detached the object
    match scene.detach(object) {
        Ok(()) | Err(SceneError::NotAttached(_)) => {}
        Err(e) => log::warn!("Failed to detach {}: {}", object, e),
    }
    scene.set_simulate_physics(object, true)?;
    scene.set_generate_overlaps(object, true)?;
    scene.set_linear_velocity(object, velocity)
}
