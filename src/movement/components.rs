//! Movement domain: components and physics layers for locomotion.

use avian3d::prelude::*;
use bevy::prelude::*;

use crate::movement::CapsuleShape;

/// Physics layers for collision filtering
#[derive(PhysicsLayer, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GameLayer {
    #[default]
    Default,
    /// Walkable surfaces (floors, ramps)
    Ground,
    /// Solid walls that block but cannot be run on
    Wall,
    /// Walls tagged for wall running
    ParkourWall,
    /// Player character
    Player,
}

#[derive(Component, Debug)]
pub struct Player;

/// Marker for the first-person camera parented to the player body.
#[derive(Component, Debug)]
pub struct PlayerCamera;

/// Which side of the body a wall was detected on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WallSide {
    Left,
    Right,
}

/// Environment oracle results for the current frame.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct ProbeSample {
    pub grounded: bool,
    /// Surface normal of a parkour wall on the left, if any.
    pub left_wall: Option<Vec3>,
    pub right_wall: Option<Vec3>,
    /// Normal of whatever is directly below the feet.
    pub slope_normal: Option<Vec3>,
}

impl ProbeSample {
    pub fn wall(&self, side: WallSide) -> Option<Vec3> {
        match side {
            WallSide::Left => self.left_wall,
            WallSide::Right => self.right_wall,
        }
    }

    /// First wall hit, left before right.
    pub fn any_wall(&self) -> Option<(WallSide, Vec3)> {
        self.left_wall
            .map(|normal| (WallSide::Left, normal))
            .or_else(|| self.right_wall.map(|normal| (WallSide::Right, normal)))
    }
}

/// Mouse-look state for the camera: yaw lives on the body, pitch on the camera.
#[derive(Component, Debug, Clone)]
pub struct LookState {
    /// Degrees, positive looks down.
    pub pitch: f32,
    pub pitch_min: f32,
    pub pitch_max: f32,
    pub enabled: bool,
    /// Local offset of the camera from the body origin.
    pub offset: Vec3,
}

impl LookState {
    pub fn new(offset: Vec3, pitch_min: f32, pitch_max: f32) -> Self {
        Self {
            pitch: 0.0,
            pitch_min,
            pitch_max,
            enabled: true,
            offset,
        }
    }

    pub fn clamp_pitch(&mut self) {
        self.pitch = self.pitch.clamp(self.pitch_min, self.pitch_max);
    }
}

/// Capsule dimensions currently mirrored into the player's collider.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct BodyShape(pub CapsuleShape);
