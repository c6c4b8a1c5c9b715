//! Jump and Fall share air control and landing resolution.

use bevy::prelude::*;

use crate::movement::{LocomotionContext, LocomotionEvent, MovementState, Rig};

pub(super) fn enter_jump(ctx: &mut LocomotionContext, rig: &mut Rig<'_>) {
    ctx.y_velocity = rig.tuning.jump_force;
    ctx.jump_consumed = true;
    ctx.emit(LocomotionEvent::Jumped);
}

/// Rising or early descent. Past the hard-fall speed the jump becomes a fall.
pub(super) fn update_jump(
    ctx: &mut LocomotionContext,
    rig: &mut Rig<'_>,
) -> Option<MovementState> {
    if let Some(next) = settle_if_grounded(ctx, rig) {
        return Some(next);
    }
    if ctx.y_velocity <= rig.tuning.high_fall_threshold {
        return Some(MovementState::Fall);
    }
    if strafe(ctx, rig) {
        ctx.emit(LocomotionEvent::Moved);
    }
    None
}

pub(super) fn update_fall(
    ctx: &mut LocomotionContext,
    rig: &mut Rig<'_>,
) -> Option<MovementState> {
    if let Some(next) = settle_if_grounded(ctx, rig) {
        return Some(next);
    }
    strafe(ctx, rig);
    None
}

/// Flat-basis strafing at walk or run speed. Gravity is the controller's job.
fn strafe(ctx: &LocomotionContext, rig: &mut Rig<'_>) -> bool {
    if !ctx.has_move_intent() {
        return false;
    }
    let direction = rig.basis.direction(ctx.move_intent);
    let speed = ctx.strafe_speed(rig.tuning);
    rig.body.move_by(direction * speed * rig.dt);
    true
}

/// Ground contact without a landing edge, e.g. a jump that never left the floor.
fn settle_if_grounded(ctx: &mut LocomotionContext, rig: &Rig<'_>) -> Option<MovementState> {
    (ctx.grounded && ctx.y_velocity <= 0.0).then(|| resolve_landing(ctx, rig))
}

/// Pick the follow-up state for an airborne state that just touched ground.
///
/// Hard landings roll when the roll button is held, otherwise they stagger.
pub(super) fn resolve_landing(ctx: &mut LocomotionContext, rig: &Rig<'_>) -> MovementState {
    if ctx.y_velocity > rig.tuning.high_fall_threshold {
        return MovementState::ground(ctx.move_intent, ctx.sprint_held);
    }

    if ctx.roll_held {
        debug!("Hard landing at {:.2} m/s, rolling", ctx.y_velocity);
        return MovementState::Roll;
    }

    ctx.stagger_timer = rig.tuning.stagger_duration;
    info!(
        "Hard landing at {:.2} m/s, staggered for {:.2}s",
        ctx.y_velocity, ctx.stagger_timer
    );
    MovementState::ground(ctx.move_intent, ctx.sprint_held)
}
