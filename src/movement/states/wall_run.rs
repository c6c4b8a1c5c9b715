//! WallRun: gravity off, glued to a parkour wall while pushing forward.

use bevy::prelude::*;

use crate::movement::wall_run::run_direction;
use crate::movement::{LocomotionContext, LocomotionEvent, MovementState, Rig, WallSide};

pub(super) fn enter(
    side: WallSide,
    normal: Vec3,
    direction: &mut Vec3,
    ctx: &mut LocomotionContext,
) {
    ctx.gravity_enabled = false;
    ctx.y_velocity = 0.0;
    *direction = run_direction(side, normal);
    debug!("Wall run on {:?} wall, direction {:?}", side, *direction);
    ctx.emit(LocomotionEvent::WallRunBegan);
}

pub(super) fn update(
    side: WallSide,
    direction: Vec3,
    ctx: &mut LocomotionContext,
    rig: &mut Rig<'_>,
) -> Option<MovementState> {
    if rig.probes.wall(side).is_none() || ctx.move_intent.y <= 0.0 {
        return Some(MovementState::Fall);
    }

    rig.body.move_by(direction * rig.tuning.wall_run_speed * rig.dt);
    ctx.emit(LocomotionEvent::Moved);
    None
}

pub(super) fn exit(ctx: &mut LocomotionContext, rig: &mut Rig<'_>) {
    ctx.gravity_enabled = true;
    ctx.wall_reattach_cooldown = rig.tuning.wall_reattach_cooldown;
    ctx.emit(LocomotionEvent::WallRunEnded);
}

/// Jumping off locks wall runs out until the wall is out of reach.
pub(super) fn jump_off(ctx: &mut LocomotionContext) -> MovementState {
    ctx.wall_run_lockout = true;
    MovementState::Jump
}
