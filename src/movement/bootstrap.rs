//! Movement domain: player bootstrap and wiring checks.

use std::fmt;

use avian3d::prelude::*;
use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::movement::systems::capsule_collider;
use crate::movement::{
    BodyShape, CapsuleShape, GameLayer, InputEdgeTracker, LocomotionController, LookState,
    MovementTuning, Player, PlayerCamera, ProbeSample,
};

/// Where the player starts on the test course.
const SPAWN_POINT: Vec3 = Vec3::new(0.0, 2.0, 0.0);

/// Missing wiring on the player entity, found once after startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    NoPlayer,
    MissingCamera { player: Entity },
    MissingCollider { player: Entity },
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::NoPlayer => write!(f, "no player entity was spawned"),
            SetupError::MissingCamera { player } => {
                write!(f, "player {:?} has no PlayerCamera child", player)
            }
            SetupError::MissingCollider { player } => {
                write!(f, "player {:?} has no collider", player)
            }
        }
    }
}

impl std::error::Error for SetupError {}

pub(crate) fn spawn_player(mut commands: Commands, tuning: Res<MovementTuning>) {
    let standing = CapsuleShape::standing(&tuning);
    let camera_offset = tuning.standing_camera_offset();

    commands
        .spawn((
            // Identity & locomotion
            (
                Player,
                LocomotionController::new(),
                InputEdgeTracker::default(),
                ProbeSample::default(),
                LookState::new(camera_offset, tuning.pitch_min, tuning.pitch_max),
                BodyShape(standing),
            ),
            Transform::from_translation(SPAWN_POINT),
            Visibility::default(),
            // Physics
            (
                RigidBody::Kinematic,
                capsule_collider(tuning.capsule_radius, standing),
                CollisionLayers::new(
                    GameLayer::Player,
                    [GameLayer::Ground, GameLayer::Wall, GameLayer::ParkourWall],
                ),
            ),
        ))
        .with_children(|parent| {
            parent.spawn((
                PlayerCamera,
                Camera3d::default(),
                Transform::from_translation(camera_offset),
            ));
        });

    info!("Spawned player at {:?}", SPAWN_POINT);
}

/// Check the player has everything locomotion needs.
pub(crate) fn check_player_setup(
    players: &Query<(Entity, Option<&Children>, Has<Collider>), With<Player>>,
    cameras: &Query<(), With<PlayerCamera>>,
) -> Result<(), SetupError> {
    let mut found = false;
    for (player, children, has_collider) in players {
        found = true;
        if !has_collider {
            return Err(SetupError::MissingCollider { player });
        }
        let has_camera = children
            .map(|children| children.iter().any(|child| cameras.contains(child)))
            .unwrap_or(false);
        if !has_camera {
            return Err(SetupError::MissingCamera { player });
        }
    }
    if found {
        Ok(())
    } else {
        Err(SetupError::NoPlayer)
    }
}

/// Runs once after startup; a broken player is fatal.
pub(crate) fn verify_player_setup(
    players: Query<(Entity, Option<&Children>, Has<Collider>), With<Player>>,
    cameras: Query<(), With<PlayerCamera>>,
    mut exit: MessageWriter<AppExit>,
) {
    match check_player_setup(&players, &cameras) {
        Ok(()) => debug!("Player setup verified"),
        Err(err) => {
            error!("Player setup failed: {}", err);
            exit.write(AppExit::error());
        }
    }
}
