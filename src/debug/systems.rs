//! Debug domain: hotkeys, hot reload and the overlay refresh.

use std::path::Path;

use bevy::prelude::*;

use crate::charms::KeychainDef;
use crate::content::{DATA_DIR, LoadedContent, ValidationError, load_tuning, validate_content};
use crate::core::CourseDef;
use crate::debug::state::{DebugSnapshot, DebugState};
use crate::debug::ui::{DebugInfoOverlay, spawn_debug_info_overlay};
use crate::movement::{LocomotionController, MovementTuning, Player};
use crate::rhythm::{RhythmEngine, RhythmTuning};

/// F3 toggles the overlay.
pub(crate) fn toggle_debug_info(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut debug_state: ResMut<DebugState>,
) {
    if keyboard.just_pressed(KeyCode::F3) {
        debug_state.show_info = !debug_state.show_info;
    }
}

/// F5 re-reads `locomotion.ron` and `rhythm.ron` in place.
///
/// Live state (slide penalty, score, queued challenges) is untouched; only
/// the numbers change. Cue subscriptions stay as they were at spawn.
/// Tuning that fails validation is rejected and the current values stay.
pub(crate) fn reload_tuning(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut debug_state: ResMut<DebugState>,
    mut movement: ResMut<MovementTuning>,
    mut rhythm: ResMut<RhythmTuning>,
    keychain: Res<KeychainDef>,
    course: Res<CourseDef>,
) {
    if !keyboard.just_pressed(KeyCode::F5) {
        return;
    }

    let (new_movement, new_rhythm, errors) = load_tuning(Path::new(DATA_DIR));
    if !errors.is_empty() {
        for err in &errors {
            error!("Hot reload: {}", err);
        }
        debug_state.set_message(format!("Reload failed: {} file(s)", errors.len()), 3.0);
        return;
    }

    match vet_tuning(new_movement, new_rhythm, &keychain, &course) {
        Ok(content) => {
            *movement = content.movement;
            *rhythm = content.rhythm;
            info!("Reloaded tuning");
            debug_state.set_message("Tuning reloaded", 2.0);
        }
        Err(problems) => {
            for problem in &problems {
                warn!("Hot reload: {}", problem);
            }
            debug_state.set_message(
                format!("Reload rejected: {} problem(s)", problems.len()),
                3.0,
            );
        }
    }
}

/// Validate freshly loaded tuning against the content already in play.
///
/// Keychain problems are ignored since a reload never touches the keychain.
pub(crate) fn vet_tuning(
    movement: MovementTuning,
    rhythm: RhythmTuning,
    keychain: &KeychainDef,
    course: &CourseDef,
) -> Result<LoadedContent, Vec<ValidationError>> {
    let content = LoadedContent {
        movement,
        rhythm,
        keychain: keychain.clone(),
        course: course.clone(),
    };
    let problems: Vec<_> = validate_content(&content)
        .into_iter()
        .filter(|problem| problem.section != "keychain")
        .collect();
    if problems.is_empty() {
        Ok(content)
    } else {
        Err(problems)
    }
}

/// F6 logs a JSON snapshot of every player.
pub(crate) fn dump_snapshot(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut debug_state: ResMut<DebugState>,
    engine: Res<RhythmEngine>,
    players: Query<(&LocomotionController, &Transform), With<Player>>,
) {
    if !keyboard.just_pressed(KeyCode::F6) {
        return;
    }

    for (controller, transform) in &players {
        match DebugSnapshot::capture(controller, transform, &engine).to_json() {
            Ok(json) => info!("Snapshot:\n{}", json),
            Err(err) => error!("Snapshot failed: {}", err),
        }
    }
    debug_state.set_message("Snapshot written to log", 2.0);
}

pub(crate) fn update_status_message(time: Res<Time>, mut debug_state: ResMut<DebugState>) {
    if debug_state.status_message.is_some() {
        debug_state.tick_message(time.delta_secs());
    }
}

pub(crate) fn update_debug_info_overlay(
    mut commands: Commands,
    debug_state: Res<DebugState>,
    engine: Res<RhythmEngine>,
    players: Query<(&LocomotionController, &Transform), With<Player>>,
    mut overlay_query: Query<&mut Text, With<DebugInfoOverlay>>,
    existing_overlay: Query<Entity, With<DebugInfoOverlay>>,
) {
    if !debug_state.show_info {
        // Cleanup overlay if it exists
        for entity in &existing_overlay {
            commands.entity(entity).despawn();
        }
        return;
    }

    // Ensure overlay exists
    if existing_overlay.is_empty() {
        spawn_debug_info_overlay(&mut commands);
        return;
    }

    if let (Some((controller, transform)), Ok(mut text)) =
        (players.iter().next(), overlay_query.single_mut())
    {
        let ctx = controller.context();
        let pos = transform.translation;
        let status = debug_state
            .status_message
            .as_ref()
            .map(|(message, _)| message.as_str())
            .unwrap_or("");
        **text = format!(
            "State: {:?}\nPos: ({:.1}, {:.1}, {:.1})\nGrounded: {}  vy: {:.2}\nSlide penalty: {:.2}\nScore: {}  x{}\nCharge: {:.1}s ({:.0}%)  Queue: {}\n{}",
            controller.state_tag(),
            pos.x,
            pos.y,
            pos.z,
            ctx.grounded,
            ctx.y_velocity,
            ctx.slide_penalty,
            engine.display_score(),
            engine.multiplier(),
            engine.charge(),
            engine.charge_fill() * 100.0,
            engine.queue_len(),
            status
        );
    }
}
