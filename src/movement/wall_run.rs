//! Movement domain: wall-run detection and run-direction math.

use bevy::prelude::*;

use crate::movement::{LocomotionContext, ProbeSample, WallSide};

/// A wall the character may start running along.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallRunCandidate {
    pub side: WallSide,
    pub normal: Vec3,
}

/// Returns a candidate when a parkour wall is in reach and a wall run is allowed.
///
/// Requires: airborne, not locked out from a wall jump, reattach cooldown
/// expired, and the player pushing forward.
pub fn find_candidate(ctx: &LocomotionContext, probes: &ProbeSample) -> Option<WallRunCandidate> {
    if ctx.grounded
        || ctx.wall_run_lockout
        || ctx.wall_reattach_cooldown > 0.0
        || ctx.move_intent.y <= 0.0
    {
        return None;
    }

    probes
        .any_wall()
        .map(|(side, normal)| WallRunCandidate { side, normal })
}

/// Direction parallel to the wall, pointing the way the player faces.
///
/// Right-handed with +Y up: a wall on the left runs along `normal × -Y`, a
/// wall on the right along `normal × +Y`.
pub fn run_direction(side: WallSide, normal: Vec3) -> Vec3 {
    let reference = match side {
        WallSide::Left => Vec3::NEG_Y,
        WallSide::Right => Vec3::Y,
    };
    normal.cross(reference).normalize_or_zero()
}
