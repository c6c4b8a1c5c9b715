//! Movement domain: the mutable record shared by every locomotion state.

use std::collections::VecDeque;

use bevy::prelude::*;

use crate::movement::{LocomotionEvent, MovementTuning};

/// Shared locomotion parameters for one character.
///
/// Written by the active state and by the controller's own frame step only.
#[derive(Debug, Clone)]
pub struct LocomotionContext {
    pub y_velocity: f32,
    /// x = strafe, y = forward.
    pub move_intent: Vec2,
    pub sprint_held: bool,
    pub roll_held: bool,
    pub grounded: bool,
    /// Last frame's `grounded`, kept to detect the landing edge.
    pub was_grounded: bool,
    /// Decaying debuff subtracted from the slide start speed.
    pub slide_penalty: f32,
    /// Set when jumping off a wall; cleared once no wall is in reach.
    pub wall_run_lockout: bool,
    /// Seconds before another wall run may start.
    pub wall_reattach_cooldown: f32,
    pub stagger_timer: f32,
    /// Degrees of camera pitch travelled during the current roll.
    pub roll_rotation: f32,
    pub gravity_enabled: bool,
    /// A jump already happened this frame.
    pub jump_consumed: bool,
    events: VecDeque<LocomotionEvent>,
}

impl Default for LocomotionContext {
    fn default() -> Self {
        Self {
            y_velocity: 0.0,
            move_intent: Vec2::ZERO,
            sprint_held: false,
            roll_held: false,
            grounded: false,
            was_grounded: false,
            slide_penalty: 0.0,
            wall_run_lockout: false,
            wall_reattach_cooldown: 0.0,
            stagger_timer: 0.0,
            roll_rotation: 0.0,
            gravity_enabled: true,
            jump_consumed: false,
            events: VecDeque::new(),
        }
    }
}

impl LocomotionContext {
    /// Store this frame's ground contact and report a false -> true edge.
    pub fn latch_grounded(&mut self, grounded: bool) -> bool {
        self.was_grounded = self.grounded;
        self.grounded = grounded;
        grounded && !self.was_grounded
    }

    /// Per-frame linear decay of every timer, floored at zero.
    pub fn decay_timers(&mut self, dt: f32, tuning: &MovementTuning) {
        self.slide_penalty = (self.slide_penalty - tuning.slide_penalty_decay * dt).max(0.0);
        self.stagger_timer = (self.stagger_timer - dt).max(0.0);
        self.wall_reattach_cooldown = (self.wall_reattach_cooldown - dt).max(0.0);
    }

    pub fn has_move_intent(&self) -> bool {
        self.move_intent != Vec2::ZERO
    }

    pub fn is_staggered(&self) -> bool {
        self.stagger_timer > 0.0
    }

    pub fn stagger_factor(&self, tuning: &MovementTuning) -> f32 {
        if self.is_staggered() {
            tuning.stagger_speed_factor
        } else {
            1.0
        }
    }

    /// Walk or run speed by the sprint flag, reduced while staggered.
    pub fn strafe_speed(&self, tuning: &MovementTuning) -> f32 {
        tuning.move_speed(self.sprint_held) * self.stagger_factor(tuning)
    }

    pub fn emit(&mut self, event: LocomotionEvent) {
        self.events.push_back(event);
    }

    pub(crate) fn take_event(&mut self) -> Option<LocomotionEvent> {
        self.events.pop_front()
    }

    pub(crate) fn clear_events(&mut self) {
        self.events.clear();
    }

    pub fn pending_events(&self) -> impl Iterator<Item = &LocomotionEvent> {
        self.events.iter()
    }
}
