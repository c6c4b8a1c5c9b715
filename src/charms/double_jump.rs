//! Charms domain: one extra jump while airborne, refilled on landing.

use bevy::prelude::*;

use crate::charms::{Charm, CharmCategory};
use crate::movement::{EventBus, ListenerId, LocomotionController, LocomotionEvent, Rig};

#[derive(Debug, Clone)]
pub struct DoubleJump {
    max_charges: u32,
    charges: u32,
}

impl DoubleJump {
    pub fn new(max_charges: u32) -> Self {
        Self {
            max_charges,
            charges: max_charges,
        }
    }

    pub fn charges(&self) -> u32 {
        self.charges
    }
}

impl Default for DoubleJump {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Charm for DoubleJump {
    fn category(&self) -> CharmCategory {
        CharmCategory::Movement
    }

    fn name(&self) -> &str {
        "Double Jump"
    }

    fn description(&self) -> &str {
        "Jump again while airborne. Recharges on landing."
    }

    fn activate(&mut self, bus: &mut EventBus, id: ListenerId) {
        bus.subscribe(LocomotionEvent::JumpActionPressed, id);
        bus.subscribe(LocomotionEvent::Landed, id);
        self.charges = self.max_charges;
    }

    fn on_event(
        &mut self,
        event: LocomotionEvent,
        character: &mut LocomotionController,
        rig: &mut Rig<'_>,
    ) {
        match event {
            LocomotionEvent::JumpActionPressed => {
                // A ground or wall jump already used this press
                if character.is_grounded() || character.jump_consumed() || self.charges == 0 {
                    return;
                }
                self.charges -= 1;
                character.force_jump(rig);
                debug!("Double jump, {} charges left", self.charges);
            }
            LocomotionEvent::Landed => {
                self.charges = self.max_charges;
            }
            _ => {}
        }
    }
}
