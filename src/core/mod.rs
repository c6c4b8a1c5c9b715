//! Core domain: the world the player moves through.

mod course;

pub use course::{CourseDef, CoursePiece, PieceKind, generate_course};

use bevy::prelude::*;

use crate::core::course::spawn_course;

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CourseDef>()
            .insert_resource(ClearColor(Color::srgb(0.55, 0.7, 0.85)))
            .add_systems(Startup, (setup_lighting, spawn_course));
    }
}

fn setup_lighting(mut commands: Commands) {
    commands.spawn((
        DirectionalLight {
            illuminance: 10_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(20.0, 40.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}
