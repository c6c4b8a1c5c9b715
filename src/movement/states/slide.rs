//! Slide: a momentum burst that bleeds off through friction and is refilled
//! going downhill. Each slide raises a penalty that weakens the next one until
//! it decays.

use bevy::prelude::*;

use crate::movement::{CapsuleShape, LocomotionContext, LocomotionEvent, MovementState, Rig};

pub(super) fn enter(
    speed: &mut f32,
    began: &mut bool,
    ctx: &mut LocomotionContext,
    rig: &mut Rig<'_>,
) -> Option<MovementState> {
    let tuning = rig.tuning;
    let available = tuning.slide_start_speed - ctx.slide_penalty;
    if available <= 0.0 {
        return Some(MovementState::ground(ctx.move_intent, ctx.sprint_held));
    }

    *speed = available;
    *began = true;
    ctx.slide_penalty += tuning.slide_penalty_step;

    rig.body.set_shape(CapsuleShape::sliding(tuning));
    rig.camera
        .set_local_offset(tuning.standing_camera_offset() - Vec3::Y * tuning.slide_camera_drop);
    rig.camera
        .set_pitch_clamp(tuning.slide_pitch_min, tuning.slide_pitch_max);
    ctx.emit(LocomotionEvent::SlideBegan);
    None
}

pub(super) fn update(
    speed: &mut f32,
    ctx: &mut LocomotionContext,
    rig: &mut Rig<'_>,
) -> Option<MovementState> {
    let tuning = rig.tuning;
    if ctx.move_intent.y <= 0.0 || *speed <= tuning.slide_end_speed {
        return Some(MovementState::ground(ctx.move_intent, ctx.sprint_held));
    }

    let forward = rig.slope_basis().forward;
    if forward.y < tuning.slide_downhill_threshold {
        *speed = (*speed + tuning.slide_downhill_accel * rig.dt).min(tuning.slide_max_speed);
    }

    rig.body.move_by(forward * *speed * rig.dt);
    *speed -= tuning.slide_friction * rig.dt;
    ctx.emit(LocomotionEvent::Moved);
    None
}

/// Restores body and camera whether or not the slide began; safe to repeat.
pub(super) fn exit(
    speed: &mut f32,
    began: &mut bool,
    ctx: &mut LocomotionContext,
    rig: &mut Rig<'_>,
) {
    let tuning = rig.tuning;
    rig.body.set_shape(CapsuleShape::standing(tuning));
    rig.camera.set_local_offset(tuning.standing_camera_offset());
    rig.camera.reset_pitch_clamp();

    if *began {
        ctx.emit(LocomotionEvent::SlideEnded);
    }
    *began = false;
    *speed = 0.0;
}
