//! Roll: a forward tumble after a hard landing, driven through the camera pitch.

use crate::movement::{LocomotionContext, LocomotionEvent, MovementState, Rig};

const FULL_TURN_DEGREES: f32 = 360.0;

pub(super) fn enter(ctx: &mut LocomotionContext, rig: &mut Rig<'_>) {
    ctx.roll_rotation = 0.0;
    rig.camera.set_look_enabled(false);
    ctx.emit(LocomotionEvent::RollBegan);
}

pub(super) fn update(ctx: &mut LocomotionContext, rig: &mut Rig<'_>) -> Option<MovementState> {
    ctx.roll_rotation += rig.tuning.roll_angular_speed * rig.dt;
    if ctx.roll_rotation >= FULL_TURN_DEGREES {
        return Some(MovementState::Run);
    }

    rig.camera.set_pitch(ctx.roll_rotation);
    let forward = rig.slope_basis().forward;
    rig.body.move_by(forward * rig.tuning.run_speed * rig.dt);
    ctx.emit(LocomotionEvent::Moved);
    None
}

pub(super) fn exit(ctx: &mut LocomotionContext, rig: &mut Rig<'_>) {
    ctx.roll_rotation = 0.0;
    rig.camera.set_pitch(0.0);
    rig.camera.set_look_enabled(true);
    ctx.emit(LocomotionEvent::RollEnded);
}
