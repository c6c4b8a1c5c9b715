//! Debug tooling for tuning locomotion by feel (feature `dev-tools`).
//!
//! Features:
//! - F3 toggles the state/score overlay
//! - F5 hot-reloads `locomotion.ron` and `rhythm.ron`
//! - F6 logs a JSON snapshot of the player controller

mod state;
mod systems;
mod ui;

pub use state::{DebugSnapshot, DebugState};

use bevy::prelude::*;

use crate::debug::systems::{
    dump_snapshot, reload_tuning, toggle_debug_info, update_debug_info_overlay,
    update_status_message,
};

pub struct DebugPlugin;

impl Plugin for DebugPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DebugState>()
            .add_systems(
                Update,
                (
                    toggle_debug_info,
                    reload_tuning,
                    dump_snapshot,
                    update_status_message,
                )
                    .chain(),
            )
            .add_systems(Update, update_debug_info_overlay);
    }
}
