//! Charms domain: the fixed-capacity charm holder.

use std::fmt;

use bevy::prelude::*;

use crate::charms::Charm;
use crate::movement::{
    EventBus, ListenerId, ListenerSet, LocomotionController, LocomotionEvent, Rig,
};

/// Error for slot access outside the keychain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotError {
    /// Slots are 1-indexed; 0 and anything past the capacity are rejected.
    OutOfRange { slot: usize, capacity: usize },
    Full { capacity: usize },
}

impl fmt::Display for SlotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotError::OutOfRange { slot, capacity } => {
                write!(f, "slot {} is outside 1..={}", slot, capacity)
            }
            SlotError::Full { capacity } => write!(f, "all {} slots are taken", capacity),
        }
    }
}

impl std::error::Error for SlotError {}

#[derive(Debug)]
struct HeldCharm {
    charm: Box<dyn Charm>,
    /// Present while the keychain is active.
    listener: Option<ListenerId>,
}

impl HeldCharm {
    fn activate(&mut self, bus: &mut EventBus) {
        if self.listener.is_some() {
            return;
        }
        let id = bus.register();
        self.charm.activate(bus, id);
        self.listener = Some(id);
    }

    fn deactivate(&mut self, bus: &mut EventBus) {
        if let Some(id) = self.listener.take() {
            self.charm.deactivate(bus, id);
        }
    }
}

/// Slot container of charms, addressed 1..=capacity. Empty slots are inert.
#[derive(Component, Debug)]
pub struct Keychain {
    slots: Vec<Option<HeldCharm>>,
    active: bool,
}

impl Default for Keychain {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl Keychain {
    pub const DEFAULT_CAPACITY: usize = 3;

    pub fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            active: false,
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn slots_taken(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn charm(&self, slot: usize) -> Result<Option<&dyn Charm>, SlotError> {
        let index = self.index(slot)?;
        Ok(self.slots[index].as_ref().map(|held| held.charm.as_ref()))
    }

    /// Put `charm` into `slot` (or clear it with `None`) and return what was there.
    ///
    /// On an active keychain the displaced charm is deactivated and the new
    /// one activated.
    pub fn set_charm(
        &mut self,
        slot: usize,
        charm: Option<Box<dyn Charm>>,
        bus: &mut EventBus,
    ) -> Result<Option<Box<dyn Charm>>, SlotError> {
        let index = self.index(slot)?;

        let displaced = self.slots[index].take().map(|mut held| {
            held.deactivate(bus);
            held.charm
        });

        self.slots[index] = charm.map(|charm| {
            let mut held = HeldCharm {
                charm,
                listener: None,
            };
            if self.active {
                held.activate(bus);
            }
            held
        });

        Ok(displaced)
    }

    /// Place `charm` in the first empty slot and return its 1-based index.
    pub fn add_charm(
        &mut self,
        charm: Box<dyn Charm>,
        bus: &mut EventBus,
    ) -> Result<usize, SlotError> {
        let Some(index) = self.slots.iter().position(Option::is_none) else {
            return Err(SlotError::Full {
                capacity: self.slot_count(),
            });
        };
        self.set_charm(index + 1, Some(charm), bus)?;
        Ok(index + 1)
    }

    pub fn activate(&mut self, bus: &mut EventBus) {
        self.active = true;
        for held in self.slots.iter_mut().flatten() {
            held.activate(bus);
        }
    }

    pub fn deactivate(&mut self, bus: &mut EventBus) {
        self.active = false;
        for held in self.slots.iter_mut().flatten() {
            held.deactivate(bus);
        }
    }

    fn index(&self, slot: usize) -> Result<usize, SlotError> {
        if slot == 0 || slot > self.slots.len() {
            return Err(SlotError::OutOfRange {
                slot,
                capacity: self.slots.len(),
            });
        }
        Ok(slot - 1)
    }
}

impl ListenerSet for Keychain {
    fn deliver(
        &mut self,
        id: ListenerId,
        event: LocomotionEvent,
        character: &mut LocomotionController,
        rig: &mut Rig<'_>,
    ) -> bool {
        let Some(held) = self
            .slots
            .iter_mut()
            .flatten()
            .find(|held| held.listener == Some(id))
        else {
            return false;
        };
        held.charm.on_event(event, character, rig);
        true
    }
}
