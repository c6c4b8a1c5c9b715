//! Debug domain: overlay state and the serializable controller snapshot.

use bevy::prelude::*;
use serde::Serialize;

use crate::movement::{LocomotionController, StateTag};
use crate::rhythm::RhythmEngine;

/// Resource tracking debug mode state
#[derive(Resource, Debug)]
pub struct DebugState {
    /// Whether the locomotion overlay is visible
    pub show_info: bool,
    /// Message to display temporarily in the overlay
    pub status_message: Option<(String, f32)>,
}

impl Default for DebugState {
    fn default() -> Self {
        Self {
            show_info: true,
            status_message: None,
        }
    }
}

impl DebugState {
    /// Set a status message that will fade after a duration
    pub fn set_message(&mut self, message: impl Into<String>, duration: f32) {
        self.status_message = Some((message.into(), duration));
    }

    /// Count down the status message, clearing it once it runs out.
    pub fn tick_message(&mut self, dt: f32) {
        if let Some((_, remaining)) = &mut self.status_message {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.status_message = None;
            }
        }
    }
}

/// Point-in-time dump of one character, written as JSON on F6.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebugSnapshot {
    pub state: StateTag,
    pub position: [f32; 3],
    pub grounded: bool,
    pub y_velocity: f32,
    pub slide_penalty: f32,
    pub wall_run_lockout: bool,
    pub wall_reattach_cooldown: f32,
    pub stagger_timer: f32,
    pub gravity_enabled: bool,
    pub score: i64,
    pub multiplier: u32,
    pub charge: f32,
    pub challenges: usize,
}

impl DebugSnapshot {
    pub fn capture(
        controller: &LocomotionController,
        transform: &Transform,
        engine: &RhythmEngine,
    ) -> Self {
        let ctx = controller.context();
        Self {
            state: controller.state_tag(),
            position: transform.translation.to_array(),
            grounded: ctx.grounded,
            y_velocity: ctx.y_velocity,
            slide_penalty: ctx.slide_penalty,
            wall_run_lockout: ctx.wall_run_lockout,
            wall_reattach_cooldown: ctx.wall_reattach_cooldown,
            stagger_timer: ctx.stagger_timer,
            gravity_enabled: ctx.gravity_enabled,
            score: engine.score(),
            multiplier: engine.multiplier(),
            charge: engine.charge(),
            challenges: engine.queue_len(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
