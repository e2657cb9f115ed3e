//! Overlap events and explicit observer registration
//!
//! The trigger-volume system publishes [`OverlapEvent`]s on an
//! [`OverlapBus`]. A listener subscribes to one volume at initialization and
//! receives a [`Subscription`], a typed mailbox it drains on the tick
//! thread. Teardown unsubscribes by id.

use crate::body::BodyId;
use crossbeam_channel::{Receiver, Sender, TryIter};

/// Begin or end of an overlap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlapKind {
    Begin,
    End,
}

/// A body started or stopped overlapping a volume
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapEvent {
    /// The trigger volume
    pub volume: BodyId,
    /// The overlapping body
    pub other: BodyId,
    pub kind: OverlapKind,
}

impl OverlapEvent {
    pub fn begin(volume: BodyId, other: BodyId) -> Self {
        Self {
            volume,
            other,
            kind: OverlapKind::Begin,
        }
    }

    pub fn end(volume: BodyId, other: BodyId) -> Self {
        Self {
            volume,
            other,
            kind: OverlapKind::End,
        }
    }

    #[inline]
    pub fn is_begin(&self) -> bool {
        self.kind == OverlapKind::Begin
    }
}

/// Subscriber ID
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub u64);

/// Receiving end of a volume subscription
#[derive(Debug)]
pub struct Subscription {
    id: SubscriberId,
    volume: BodyId,
    receiver: Receiver<OverlapEvent>,
}

impl Subscription {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// The volume this subscription listens to
    pub fn volume(&self) -> BodyId {
        self.volume
    }

    /// Take all queued events without blocking
    pub fn drain(&self) -> TryIter<'_, OverlapEvent> {
        self.receiver.try_iter()
    }

    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }
}

/// Routes overlap events to the subscribers of each volume
#[derive(Debug)]
pub struct OverlapBus {
    subscribers: Vec<(SubscriberId, BodyId, Sender<OverlapEvent>)>,
    next_subscriber_id: u64,
}

impl OverlapBus {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            next_subscriber_id: 1,
        }
    }

    /// Listen to one volume's events
    pub fn subscribe(&mut self, volume: BodyId) -> Subscription {
        let id = SubscriberId(self.next_subscriber_id);
        self.next_subscriber_id += 1;

        let (sender, receiver) = crossbeam_channel::unbounded();
        self.subscribers.push((id, volume, sender));
        log::debug!("Subscriber {} listening to volume {}", id.0, volume);

        Subscription {
            id,
            volume,
            receiver,
        }
    }

    /// Stop delivering to a subscriber. Returns false if it was unknown.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    /// Deliver an event to every subscriber of its volume.
    ///
    /// Returns how many subscribers received it.
    pub fn publish(&self, event: OverlapEvent) -> usize {
        let mut delivered = 0;
        for (_, volume, sender) in &self.subscribers {
            // A dropped subscription without unsubscribe just loses the event
            if *volume == event.volume && sender.send(event).is_ok() {
                delivered += 1;
            }
        }
        delivered
    }

    /// Publish a batch in order
    pub fn publish_all<I>(&self, events: I) -> usize
    where
        I: IntoIterator<Item = OverlapEvent>,
    {
        events.into_iter().map(|e| self.publish(e)).sum()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl Default for OverlapBus {
    fn default() -> Self {
        Self::new()
    }
}
