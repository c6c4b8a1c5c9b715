//! Movement domain: tuning and input resources.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Every designer-tunable number the locomotion states read.
///
/// Loaded from `assets/data/locomotion.ron`; any field missing from the file
/// keeps its default.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementTuning {
    /// Downward acceleration applied while gravity is enabled (m/s²).
    pub gravity: f32,
    /// Vertical velocity the body is pinned to while grounded.
    pub ground_stick_velocity: f32,
    pub walk_speed: f32,
    pub run_speed: f32,
    pub jump_force: f32,

    pub slide_start_speed: f32,
    /// Slide ends once its speed drops to this value.
    pub slide_end_speed: f32,
    /// Cap for downhill acceleration while sliding.
    pub slide_max_speed: f32,
    pub slide_friction: f32,
    pub slide_downhill_accel: f32,
    /// `forward.y` below this counts as downhill.
    pub slide_downhill_threshold: f32,
    /// Added to the slide penalty every time a slide begins.
    pub slide_penalty_step: f32,
    /// Penalty units removed per second.
    pub slide_penalty_decay: f32,
    pub slide_camera_drop: f32,
    /// Pitch clamp while sliding. The max bound limits how far down you can look.
    pub slide_pitch_min: f32,
    pub slide_pitch_max: f32,

    pub wall_run_speed: f32,
    /// Probe reach beyond the capsule surface.
    pub wall_check_distance: f32,
    /// Seconds after leaving a wall before another wall run may start.
    pub wall_reattach_cooldown: f32,

    /// Landing at or below this vertical velocity is a hard landing.
    pub high_fall_threshold: f32,
    pub stagger_duration: f32,
    pub stagger_speed_factor: f32,
    /// Degrees per second of camera pitch while rolling.
    pub roll_angular_speed: f32,

    pub slope_probe_distance: f32,
    pub ground_check_radius: f32,

    pub capsule_radius: f32,
    pub standing_height: f32,
    pub standing_center: f32,
    pub slide_height: f32,
    pub slide_center: f32,
    pub camera_height: f32,
    pub pitch_min: f32,
    pub pitch_max: f32,
    pub look_sensitivity: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            gravity: 19.62,
            ground_stick_velocity: -2.0,
            walk_speed: 4.0,
            run_speed: 8.0,
            jump_force: 10.0,

            slide_start_speed: 12.0,
            slide_end_speed: 0.0,
            slide_max_speed: 20.0,
            slide_friction: 10.0,
            slide_downhill_accel: 15.0,
            slide_downhill_threshold: -0.1,
            slide_penalty_step: 5.0,
            slide_penalty_decay: 1.0,
            slide_camera_drop: 0.5,
            slide_pitch_min: -90.0,
            slide_pitch_max: 60.0,

            wall_run_speed: 8.0,
            wall_check_distance: 0.1,
            wall_reattach_cooldown: 0.25,

            high_fall_threshold: -15.0,
            stagger_duration: 1.0,
            stagger_speed_factor: 0.5,
            roll_angular_speed: 720.0,

            slope_probe_distance: 1.0,
            ground_check_radius: 0.4,

            capsule_radius: 0.5,
            standing_height: 2.0,
            standing_center: 0.0,
            slide_height: 1.0,
            slide_center: -0.5,
            camera_height: 0.5,
            pitch_min: -90.0,
            pitch_max: 90.0,
            look_sensitivity: 0.15,
        }
    }
}

impl MovementTuning {
    /// Horizontal speed for grounded or airborne strafing.
    pub fn move_speed(&self, sprinting: bool) -> f32 {
        if sprinting {
            self.run_speed
        } else {
            self.walk_speed
        }
    }

    /// Peak height of a jump from flat ground: h = v² / (2g)
    pub fn jump_height(&self) -> f32 {
        self.jump_force * self.jump_force / (2.0 * self.gravity)
    }

    /// Camera offset while standing, relative to the body origin.
    pub fn standing_camera_offset(&self) -> Vec3 {
        Vec3::new(0.0, self.camera_height, 0.0)
    }
}

/// Raw input for one frame, before edge detection.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct RawInput {
    /// x = strafe (right positive), y = forward.
    pub move_axis: Vec2,
    pub sprint: bool,
    pub jump: bool,
    pub slide: bool,
    pub roll: bool,
    pub trick: bool,
    /// Mouse delta accumulated this frame.
    pub look_delta: Vec2,
}
