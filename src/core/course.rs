//! Core domain: the seeded parkour test course.
//!
//! Layout generation is a pure function of [`CourseDef`]; the startup system
//! only turns pieces into meshes and static colliders.

use avian3d::prelude::*;
use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::movement::GameLayer;

/// Z distance from spawn to the first wall pair.
const FIRST_PAIR_Z: f32 = -15.0;
/// Free run-up between consecutive wall pairs.
const PAIR_SPACING: f32 = 6.0;
const GROUND_THICKNESS: f32 = 1.0;
const RAMP_THICKNESS: f32 = 0.5;

/// Course parameters, loaded from `assets/data/course.ron`.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseDef {
    pub seed: u64,
    /// Side length of the square ground slab.
    pub ground_size: f32,
    pub ramp_length: f32,
    pub ramp_width: f32,
    /// Ramp incline in degrees.
    pub ramp_slope: f32,
    pub wall_pairs: u32,
    /// Free space between the two walls of a pair.
    pub wall_gap: f32,
    pub wall_length: f32,
    pub wall_height: f32,
    pub wall_thickness: f32,
    /// Largest sideways offset of a pair from the center line.
    pub wall_spread: f32,
}

impl Default for CourseDef {
    fn default() -> Self {
        Self {
            seed: 42,
            ground_size: 120.0,
            ramp_length: 20.0,
            ramp_width: 6.0,
            ramp_slope: 15.0,
            wall_pairs: 4,
            wall_gap: 4.0,
            wall_length: 10.0,
            wall_height: 4.0,
            wall_thickness: 0.5,
            wall_spread: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Ground,
    Ramp,
    ParkourWall,
}

impl PieceKind {
    pub fn layer(self) -> GameLayer {
        match self {
            PieceKind::Ground | PieceKind::Ramp => GameLayer::Ground,
            PieceKind::ParkourWall => GameLayer::ParkourWall,
        }
    }

    fn color(self) -> Color {
        match self {
            PieceKind::Ground => Color::srgb(0.35, 0.4, 0.35),
            PieceKind::Ramp => Color::srgb(0.6, 0.5, 0.35),
            PieceKind::ParkourWall => Color::srgb(0.3, 0.45, 0.7),
        }
    }
}

/// One box of the course.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoursePiece {
    pub kind: PieceKind,
    pub center: Vec3,
    /// Full box dimensions before rotation.
    pub size: Vec3,
    pub rotation: Quat,
}

impl CoursePiece {
    fn upright(kind: PieceKind, center: Vec3, size: Vec3) -> Self {
        Self {
            kind,
            center,
            size,
            rotation: Quat::IDENTITY,
        }
    }

    /// World-space normal of the box's top face.
    pub fn top_normal(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }
}

/// Lay out the course for `def`. Same definition, same pieces.
pub fn generate_course(def: &CourseDef) -> Vec<CoursePiece> {
    let mut rng = ChaCha8Rng::seed_from_u64(def.seed);
    let mut pieces = Vec::with_capacity(2 + 2 * def.wall_pairs as usize);

    // Ground top sits at y = 0
    pieces.push(CoursePiece::upright(
        PieceKind::Ground,
        Vec3::new(0.0, -GROUND_THICKNESS * 0.5, 0.0),
        Vec3::new(def.ground_size, GROUND_THICKNESS, def.ground_size),
    ));

    pieces.push(ramp(def));

    let half_gap = (def.wall_gap + def.wall_thickness) * 0.5;
    for pair in 0..def.wall_pairs {
        let x = if def.wall_spread > 0.0 {
            rng.random_range(-def.wall_spread..def.wall_spread)
        } else {
            0.0
        };
        let jitter: f32 = rng.random_range(-1.0..1.0);
        let z = FIRST_PAIR_Z
            - pair as f32 * (def.wall_length + PAIR_SPACING)
            - def.wall_length * 0.5
            + jitter;

        let size = Vec3::new(def.wall_thickness, def.wall_height, def.wall_length);
        for side in [-1.0, 1.0] {
            pieces.push(CoursePiece::upright(
                PieceKind::ParkourWall,
                Vec3::new(x + side * half_gap, def.wall_height * 0.5, z),
                size,
            ));
        }
    }

    pieces
}

/// A slab on the +X side of spawn, low end at ground level, rising toward +Z.
fn ramp(def: &CourseDef) -> CoursePiece {
    let angle = def.ramp_slope.to_radians();
    let rotation = Quat::from_rotation_x(-angle);
    let normal = rotation * Vec3::Y;

    let low_end = Vec3::new(def.ground_size * 0.3, 0.0, -def.ground_size * 0.25);
    let uphill = rotation * Vec3::Z;
    let surface_center = low_end + uphill * def.ramp_length * 0.5;

    CoursePiece {
        kind: PieceKind::Ramp,
        center: surface_center - normal * RAMP_THICKNESS * 0.5,
        size: Vec3::new(def.ramp_width, RAMP_THICKNESS, def.ramp_length),
        rotation,
    }
}

pub(crate) fn spawn_course(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    def: Res<CourseDef>,
) {
    let pieces = generate_course(&def);

    for piece in &pieces {
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::new(piece.size.x, piece.size.y, piece.size.z))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: piece.kind.color(),
                perceptual_roughness: 0.9,
                ..default()
            })),
            Transform::from_translation(piece.center).with_rotation(piece.rotation),
            RigidBody::Static,
            Collider::cuboid(piece.size.x, piece.size.y, piece.size.z),
            CollisionLayers::new(piece.kind.layer(), [GameLayer::Player]),
        ));
    }

    info!(
        "Spawned course from seed {}: {} pieces, {} wall pairs",
        def.seed,
        pieces.len(),
        def.wall_pairs
    );
}
