//! Movement domain: mouse look and camera placement.

use bevy::prelude::*;

use crate::movement::{LookState, MovementTuning, Player, PlayerCamera, RawInput};

/// Yaw turns the body, pitch goes to [`LookState`]. Ignored while look is disabled.
pub(crate) fn mouse_look(
    raw: Res<RawInput>,
    tuning: Res<MovementTuning>,
    mut query: Query<(&mut Transform, &mut LookState), With<Player>>,
) {
    if raw.look_delta == Vec2::ZERO {
        return;
    }

    for (mut transform, mut look) in &mut query {
        if !look.enabled {
            continue;
        }
        let yaw = -raw.look_delta.x * tuning.look_sensitivity;
        transform.rotate_y(yaw.to_radians());

        look.pitch += raw.look_delta.y * tuning.look_sensitivity;
        look.clamp_pitch();
    }
}

/// Copy the look offset and pitch onto the camera child.
pub(crate) fn sync_camera(
    players: Query<(&LookState, &Children), With<Player>>,
    mut cameras: Query<&mut Transform, (With<PlayerCamera>, Without<Player>)>,
) {
    for (look, children) in &players {
        for child in children.iter() {
            let Ok(mut transform) = cameras.get_mut(child) else {
                continue;
            };
            transform.translation = look.offset;
            // Positive pitch looks down, which is a negative turn about +X
            transform.rotation = Quat::from_rotation_x(-look.pitch.to_radians());
        }
    }
}
