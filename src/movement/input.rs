//! Movement domain: edge detection over raw per-frame input samples.

use bevy::prelude::*;

use crate::movement::RawInput;

/// Press/hold/release view of a single button for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonSignal {
    /// Went down this frame.
    pub pressed: bool,
    pub held: bool,
    /// Came up this frame.
    pub released: bool,
}

impl ButtonSignal {
    fn from_levels(previous: bool, current: bool) -> Self {
        Self {
            pressed: current && !previous,
            held: current,
            released: !current && previous,
        }
    }
}

/// Signals surfaced to the locomotion controller for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSignals {
    pub move_axis: Vec2,
    /// The move axis differs from last frame's value.
    pub move_changed: bool,
    pub sprint: ButtonSignal,
    pub jump: ButtonSignal,
    pub slide: ButtonSignal,
    pub roll: ButtonSignal,
    pub trick: ButtonSignal,
}

impl InputSignals {
    pub fn has_move_intent(&self) -> bool {
        self.move_axis != Vec2::ZERO
    }
}

/// Remembers the previous sample so each frame can be turned into edges.
#[derive(Component, Debug, Default)]
pub struct InputEdgeTracker {
    previous: RawInput,
}

impl InputEdgeTracker {
    pub fn sample(&mut self, raw: RawInput) -> InputSignals {
        let prev = self.previous;
        self.previous = raw;

        InputSignals {
            move_axis: raw.move_axis,
            move_changed: raw.move_axis != prev.move_axis,
            sprint: ButtonSignal::from_levels(prev.sprint, raw.sprint),
            jump: ButtonSignal::from_levels(prev.jump, raw.jump),
            slide: ButtonSignal::from_levels(prev.slide, raw.slide),
            roll: ButtonSignal::from_levels(prev.roll, raw.roll),
            trick: ButtonSignal::from_levels(prev.trick, raw.trick),
        }
    }
}
