//! Movement domain: the collaborators a locomotion step talks to.
//!
//! States never touch Bevy components directly. They push displacements and
//! shape changes into a [`CapsuleMover`] and camera changes into a
//! [`CameraSink`]; the systems layer backs both with the real body and
//! camera, tests back them with recorders.

use bevy::prelude::*;

use crate::movement::{MovementTuning, ProbeSample};

/// Height and vertical center offset of the character capsule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapsuleShape {
    pub height: f32,
    pub center: f32,
}

impl CapsuleShape {
    pub fn standing(tuning: &MovementTuning) -> Self {
        Self {
            height: tuning.standing_height,
            center: tuning.standing_center,
        }
    }

    pub fn sliding(tuning: &MovementTuning) -> Self {
        Self {
            height: tuning.slide_height,
            center: tuning.slide_center,
        }
    }
}

/// Moves the character capsule and resolves collisions along the way.
pub trait CapsuleMover {
    fn move_by(&mut self, displacement: Vec3);
    fn set_shape(&mut self, shape: CapsuleShape);
}

/// Accepts the numeric camera changes locomotion is allowed to make.
pub trait CameraSink {
    fn set_local_offset(&mut self, offset: Vec3);
    /// Degrees, positive looks down.
    fn set_pitch(&mut self, degrees: f32);
    fn set_pitch_clamp(&mut self, min: f32, max: f32);
    fn reset_pitch_clamp(&mut self);
    fn set_look_enabled(&mut self, enabled: bool);
}

/// Horizontal facing basis of the body for this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveBasis {
    pub forward: Vec3,
    pub right: Vec3,
}

impl Default for MoveBasis {
    /// Bevy convention: forward is -Z, right is +X.
    fn default() -> Self {
        Self {
            forward: Vec3::NEG_Z,
            right: Vec3::X,
        }
    }
}

impl MoveBasis {
    pub fn from_transform(transform: &Transform) -> Self {
        let forward = Vec3::from(transform.forward()).with_y(0.0).normalize_or_zero();
        let right = Vec3::from(transform.right()).with_y(0.0).normalize_or_zero();
        if forward == Vec3::ZERO || right == Vec3::ZERO {
            return Self::default();
        }
        Self { forward, right }
    }

    /// Re-project the basis onto a surface so movement hugs slopes.
    ///
    /// With `normal == Vec3::Y` this returns the basis unchanged.
    pub fn on_surface(self, normal: Vec3) -> Self {
        Self {
            forward: normal.cross(self.right).normalize_or(self.forward),
            right: self.forward.cross(normal).normalize_or(self.right),
        }
    }

    /// World-space direction for a 2D move intent (x = strafe, y = forward).
    pub fn direction(&self, intent: Vec2) -> Vec3 {
        self.forward * intent.y + self.right * intent.x
    }
}

/// Everything a single locomotion step needs from the outside world.
pub struct Rig<'a> {
    pub dt: f32,
    pub tuning: &'a MovementTuning,
    pub probes: &'a ProbeSample,
    pub basis: MoveBasis,
    pub body: &'a mut dyn CapsuleMover,
    pub camera: &'a mut dyn CameraSink,
}

impl Rig<'_> {
    /// Basis following the ground under the feet, flat if nothing was hit.
    pub fn slope_basis(&self) -> MoveBasis {
        match self.probes.slope_normal {
            Some(normal) => self.basis.on_surface(normal),
            None => self.basis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_ground_projection_is_identity() {
        let basis = MoveBasis::default();
        let projected = basis.on_surface(Vec3::Y);
        assert!((projected.forward - basis.forward).length() < 1e-6);
        assert!((projected.right - basis.right).length() < 1e-6);
    }

    #[test]
    fn test_downhill_projection_points_down() {
        // Ground falls away in front of the player (-Z)
        let normal = Vec3::new(0.0, 1.0, -0.5).normalize();
        let projected = MoveBasis::default().on_surface(normal);
        assert!(projected.forward.y < 0.0);
        assert!(projected.forward.z < 0.0);
        assert!(projected.forward.dot(normal).abs() < 1e-5);
    }
}
