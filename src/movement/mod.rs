//! Movement domain: first-person parkour locomotion.
//!
//! The controller and its states are plain Rust driven through [`Rig`]; the
//! systems in this module back the rig with avian3d queries, a kinematic
//! capsule and the player camera.

mod bootstrap;
mod components;
mod context;
mod controller;
mod events;
mod input;
mod resources;
mod rig;
mod states;
mod systems;
#[cfg(test)]
mod tests;
mod wall_run;

pub use bootstrap::SetupError;
pub use components::{
    BodyShape, GameLayer, LookState, Player, PlayerCamera, ProbeSample, WallSide,
};
pub use context::LocomotionContext;
pub use controller::{Lifecycle, LocomotionController};
pub use events::{
    EventBus, ListenerId, ListenerSet, LocomotionEvent, LocomotionMessage, StateChangedMessage,
};
pub use input::{ButtonSignal, InputEdgeTracker, InputSignals};
pub use resources::{MovementTuning, RawInput};
pub use rig::{CameraSink, CapsuleMover, CapsuleShape, MoveBasis, Rig};
pub use states::{MovementState, StateTag};
pub use wall_run::{WallRunCandidate, find_candidate, run_direction};

use bevy::prelude::*;

use crate::movement::bootstrap::{spawn_player, verify_player_setup};
use crate::movement::systems::{
    drive_locomotion, mouse_look, read_input, sample_probes, sync_camera,
};

/// Every per-frame locomotion system, in order.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocomotionSet;

pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MovementTuning>()
            .init_resource::<RawInput>()
            .add_message::<LocomotionMessage>()
            .add_message::<StateChangedMessage>()
            .add_systems(Startup, spawn_player)
            .add_systems(PostStartup, verify_player_setup)
            .add_systems(
                Update,
                (
                    read_input,
                    mouse_look,
                    sample_probes,
                    drive_locomotion,
                    sync_camera,
                )
                    .chain()
                    .in_set(LocomotionSet),
            );
    }
}
