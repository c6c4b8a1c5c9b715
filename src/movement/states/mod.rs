//! Movement domain: the closed set of locomotion states.
//!
//! Each state is a variant of [`MovementState`] carrying only its own data.
//! Lifecycle hooks return `Some(next)` to request a switch; the controller
//! performs it and stops running the old state for the rest of the frame.

mod airborne;
mod ground;
mod roll;
mod slide;
mod wall_run;

use bevy::prelude::*;
use serde::Serialize;

use crate::movement::{LocomotionContext, Rig, WallRunCandidate, WallSide};

/// Active locomotion state and its private data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MovementState {
    Idle,
    Walk,
    Run,
    Jump,
    Fall,
    Slide {
        speed: f32,
        /// Set once the slide actually started; a redirected entry never begins.
        began: bool,
    },
    WallRun {
        side: WallSide,
        normal: Vec3,
        /// Computed on entry from `side` and `normal`.
        direction: Vec3,
    },
    Roll,
}

/// Data-free name of a [`MovementState`], for logs, messages and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StateTag {
    Idle,
    Walk,
    Run,
    Jump,
    Fall,
    Slide,
    WallRun,
    Roll,
}

impl MovementState {
    /// Grounded state matching the current input: Idle, Walk or Run.
    pub fn ground(move_intent: Vec2, sprint_held: bool) -> Self {
        if move_intent == Vec2::ZERO {
            MovementState::Idle
        } else if sprint_held {
            MovementState::Run
        } else {
            MovementState::Walk
        }
    }

    pub fn slide() -> Self {
        MovementState::Slide {
            speed: 0.0,
            began: false,
        }
    }

    pub fn wall_run(candidate: WallRunCandidate) -> Self {
        MovementState::WallRun {
            side: candidate.side,
            normal: candidate.normal,
            direction: Vec3::ZERO,
        }
    }

    pub fn tag(&self) -> StateTag {
        match self {
            MovementState::Idle => StateTag::Idle,
            MovementState::Walk => StateTag::Walk,
            MovementState::Run => StateTag::Run,
            MovementState::Jump => StateTag::Jump,
            MovementState::Fall => StateTag::Fall,
            MovementState::Slide { .. } => StateTag::Slide,
            MovementState::WallRun { .. } => StateTag::WallRun,
            MovementState::Roll => StateTag::Roll,
        }
    }
}

/// Input and environment edges a state may react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Signal {
    Move,
    Jump,
    SlidePressed,
    SlideReleased,
    Landed,
}

pub(crate) fn enter(
    state: &mut MovementState,
    ctx: &mut LocomotionContext,
    rig: &mut Rig<'_>,
) -> Option<MovementState> {
    match state {
        MovementState::Jump => {
            airborne::enter_jump(ctx, rig);
            None
        }
        MovementState::Slide { speed, began } => slide::enter(speed, began, ctx, rig),
        MovementState::WallRun {
            side,
            normal,
            direction,
        } => {
            wall_run::enter(*side, *normal, direction, ctx);
            None
        }
        MovementState::Roll => {
            roll::enter(ctx, rig);
            None
        }
        MovementState::Idle | MovementState::Walk | MovementState::Run | MovementState::Fall => {
            None
        }
    }
}

pub(crate) fn update(
    state: &mut MovementState,
    ctx: &mut LocomotionContext,
    rig: &mut Rig<'_>,
) -> Option<MovementState> {
    match state {
        MovementState::Idle => ground::update_idle(ctx),
        MovementState::Walk => ground::update_walk(ctx, rig),
        MovementState::Run => ground::update_run(ctx, rig),
        MovementState::Jump => airborne::update_jump(ctx, rig),
        MovementState::Fall => airborne::update_fall(ctx, rig),
        MovementState::Slide { speed, .. } => slide::update(speed, ctx, rig),
        MovementState::WallRun {
            side, direction, ..
        } => wall_run::update(*side, *direction, ctx, rig),
        MovementState::Roll => roll::update(ctx, rig),
    }
}

pub(crate) fn exit(state: &mut MovementState, ctx: &mut LocomotionContext, rig: &mut Rig<'_>) {
    match state {
        MovementState::Slide { speed, began } => slide::exit(speed, began, ctx, rig),
        MovementState::WallRun { .. } => wall_run::exit(ctx, rig),
        MovementState::Roll => roll::exit(ctx, rig),
        MovementState::Idle
        | MovementState::Walk
        | MovementState::Run
        | MovementState::Jump
        | MovementState::Fall => {}
    }
}

pub(crate) fn on_signal(
    state: &mut MovementState,
    signal: Signal,
    ctx: &mut LocomotionContext,
    rig: &mut Rig<'_>,
) -> Option<MovementState> {
    match (state, signal) {
        (MovementState::Idle, Signal::Move) => {
            Some(MovementState::ground(ctx.move_intent, ctx.sprint_held))
        }
        (MovementState::Run, Signal::SlidePressed) => Some(MovementState::slide()),
        (MovementState::Jump | MovementState::Fall, Signal::Landed) => {
            Some(airborne::resolve_landing(ctx, rig))
        }
        (MovementState::Slide { .. }, Signal::SlideReleased) => {
            Some(MovementState::ground(ctx.move_intent, ctx.sprint_held))
        }
        (MovementState::WallRun { .. }, Signal::Jump) => Some(wall_run::jump_off(ctx)),
        (MovementState::WallRun { .. }, Signal::Landed) => {
            Some(MovementState::ground(ctx.move_intent, ctx.sprint_held))
        }
        _ => None,
    }
}
