//! Charms domain: ability modifiers that hook locomotion events.
//!
//! A charm never touches the state machine's internals. It subscribes to
//! events on the character's [`EventBus`] when activated and reacts through
//! the controller's public affordances (read accessors, `force_jump`).

mod double_jump;
mod keychain;

pub use double_jump::DoubleJump;
pub use keychain::{Keychain, SlotError};

use std::fmt;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::movement::{
    EventBus, ListenerId, LocomotionController, LocomotionEvent, LocomotionSet, Rig,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharmCategory {
    Movement,
    Rhythm,
    Combo,
    Stat,
}

/// A pluggable locomotion modifier.
pub trait Charm: fmt::Debug + Send + Sync {
    fn category(&self) -> CharmCategory;
    fn name(&self) -> &str;
    fn description(&self) -> &str;

    /// Subscribe `id` to the events this charm reacts to.
    fn activate(&mut self, bus: &mut EventBus, id: ListenerId);

    /// Remove every subscription held by `id`. Takes effect immediately.
    fn deactivate(&mut self, bus: &mut EventBus, id: ListenerId) {
        bus.unsubscribe_all(id);
    }

    fn on_event(
        &mut self,
        event: LocomotionEvent,
        character: &mut LocomotionController,
        rig: &mut Rig<'_>,
    );
}

/// Serialized form of a charm, as listed in `keychain.ron`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CharmDef {
    DoubleJump {
        #[serde(default = "default_double_jump_charges")]
        charges: u32,
    },
}

fn default_double_jump_charges() -> u32 {
    1
}

impl CharmDef {
    pub fn build(&self) -> Box<dyn Charm> {
        match self {
            CharmDef::DoubleJump { charges } => Box::new(DoubleJump::new(*charges)),
        }
    }
}

/// Starting keychain contents.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeychainDef {
    pub capacity: usize,
    pub charms: Vec<CharmDef>,
}

impl Default for KeychainDef {
    fn default() -> Self {
        Self {
            capacity: Keychain::DEFAULT_CAPACITY,
            charms: vec![CharmDef::DoubleJump { charges: 1 }],
        }
    }
}

impl KeychainDef {
    /// Build and activate a keychain against `bus`.
    ///
    /// Charms beyond the capacity are dropped with a warning.
    pub fn build(&self, bus: &mut EventBus) -> Keychain {
        let mut keychain = Keychain::new(self.capacity);
        keychain.activate(bus);
        for def in &self.charms {
            if let Err(err) = keychain.add_charm(def.build(), bus) {
                warn!("Skipping charm {:?}: {}", def, err);
            }
        }
        keychain
    }
}

pub struct CharmsPlugin;

impl Plugin for CharmsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<KeychainDef>()
            .add_systems(Update, equip_starting_keychain.before(LocomotionSet));
    }
}

/// Gives every controller without a keychain the configured starting charms.
fn equip_starting_keychain(
    mut commands: Commands,
    def: Res<KeychainDef>,
    mut query: Query<(Entity, &mut LocomotionController), Without<Keychain>>,
) {
    for (entity, mut controller) in &mut query {
        let keychain = def.build(controller.bus_mut());
        info!(
            "Equipped keychain: {}/{} slots taken",
            keychain.slots_taken(),
            keychain.slot_count()
        );
        commands.entity(entity).insert(keychain);
    }
}
