//! Idle, Walk and Run.

use crate::movement::{LocomotionContext, LocomotionEvent, MovementState, Rig};

pub(super) fn update_idle(ctx: &LocomotionContext) -> Option<MovementState> {
    if !ctx.grounded {
        return Some(MovementState::Fall);
    }
    if ctx.has_move_intent() {
        return Some(MovementState::ground(ctx.move_intent, ctx.sprint_held));
    }
    None
}

pub(super) fn update_walk(ctx: &mut LocomotionContext, rig: &mut Rig<'_>) -> Option<MovementState> {
    if !ctx.has_move_intent() {
        return Some(MovementState::Idle);
    }
    if ctx.sprint_held {
        return Some(MovementState::Run);
    }
    if !ctx.grounded {
        return Some(MovementState::Fall);
    }
    let speed = rig.tuning.walk_speed;
    move_on_slope(ctx, rig, speed);
    None
}

pub(super) fn update_run(ctx: &mut LocomotionContext, rig: &mut Rig<'_>) -> Option<MovementState> {
    if !ctx.has_move_intent() {
        return Some(MovementState::Idle);
    }
    if !ctx.sprint_held {
        return Some(MovementState::Walk);
    }
    if !ctx.grounded {
        return Some(MovementState::Fall);
    }
    let speed = rig.tuning.run_speed;
    move_on_slope(ctx, rig, speed);
    None
}

fn move_on_slope(ctx: &mut LocomotionContext, rig: &mut Rig<'_>, speed: f32) {
    let direction = rig.slope_basis().direction(ctx.move_intent);
    let speed = speed * ctx.stagger_factor(rig.tuning);
    rig.body.move_by(direction * speed * rig.dt);
    ctx.emit(LocomotionEvent::Moved);
}
