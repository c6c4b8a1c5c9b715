//! Movement domain: semantic locomotion events and the subscription registry.

use std::collections::HashMap;

use bevy::ecs::message::Message;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::movement::{LocomotionController, Rig, StateTag};

/// Named occurrences raised by the locomotion controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocomotionEvent {
    MoveActionPressed,
    SprintActionPressed,
    JumpActionPressed,
    SlideActionPressed,
    SlideActionReleased,
    RollActionPressed,
    Landed,
    Jumped,
    Moved,
    SlideBegan,
    SlideEnded,
    WallRunBegan,
    WallRunEnded,
    RollBegan,
    RollEnded,
    TrickStarted,
}

/// Identity of one subscriber in an [`EventBus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u32);

/// Publish/subscribe registry keyed by event kind.
///
/// Subscribers of one kind are kept in registration order, which is also the
/// delivery order.
#[derive(Debug, Default)]
pub struct EventBus {
    next_id: u32,
    subscribers: HashMap<LocomotionEvent, Vec<ListenerId>>,
}

impl EventBus {
    /// Allocate a fresh listener identity.
    pub fn register(&mut self) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Subscribing twice to the same kind is a no-op.
    pub fn subscribe(&mut self, event: LocomotionEvent, id: ListenerId) {
        let list = self.subscribers.entry(event).or_default();
        if !list.contains(&id) {
            list.push(id);
        }
    }

    /// Returns whether `id` was subscribed.
    pub fn unsubscribe(&mut self, event: LocomotionEvent, id: ListenerId) -> bool {
        let Some(list) = self.subscribers.get_mut(&event) else {
            return false;
        };
        let before = list.len();
        list.retain(|existing| *existing != id);
        before != list.len()
    }

    pub fn unsubscribe_all(&mut self, id: ListenerId) {
        for list in self.subscribers.values_mut() {
            list.retain(|existing| *existing != id);
        }
    }

    pub fn subscribers(&self, event: LocomotionEvent) -> &[ListenerId] {
        self.subscribers
            .get(&event)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_subscribed(&self, event: LocomotionEvent, id: ListenerId) -> bool {
        self.subscribers(event).contains(&id)
    }
}

/// A group of listeners reachable by [`ListenerId`].
///
/// Listeners live with their owners (keychain, rhythm cues); the bus only
/// stores identities, so dispatch asks each set in turn to deliver.
pub trait ListenerSet {
    /// Deliver `event` to the listener registered as `id`.
    /// Returns `false` when `id` does not belong to this set.
    fn deliver(
        &mut self,
        id: ListenerId,
        event: LocomotionEvent,
        character: &mut LocomotionController,
        rig: &mut Rig<'_>,
    ) -> bool;
}

/// Outward copy of every event a player raised this frame, for animation/UI
#[derive(Debug)]
pub struct LocomotionMessage {
    pub entity: Entity,
    pub event: LocomotionEvent,
}

impl Message for LocomotionMessage {}

/// Fired once per completed state switch
#[derive(Debug)]
pub struct StateChangedMessage {
    pub entity: Entity,
    pub from: StateTag,
    pub to: StateTag,
}

impl Message for StateChangedMessage {}
