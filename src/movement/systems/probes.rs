//! Movement domain: ground, slope and wall probes against the physics world.

use avian3d::prelude::*;
use bevy::prelude::*;

use crate::movement::{BodyShape, GameLayer, MovementTuning, Player, ProbeSample};

/// Lift applied to the slope ray origin so it starts inside the capsule.
const SLOPE_RAY_LIFT: f32 = 0.05;

pub(crate) fn sample_probes(
    spatial_query: SpatialQuery,
    tuning: Res<MovementTuning>,
    mut query: Query<(Entity, &Transform, &BodyShape, &mut ProbeSample), With<Player>>,
) {
    let ground_filter = SpatialQueryFilter::from_mask(GameLayer::Ground);
    let wall_filter = SpatialQueryFilter::from_mask(GameLayer::ParkourWall);

    for (entity, transform, shape, mut probes) in &mut query {
        let BodyShape(capsule) = *shape;
        let feet = transform.translation + Vec3::Y * (capsule.center - capsule.height * 0.5);

        // Sphere overlap at the feet, ground layer only
        let foot_sphere = Collider::sphere(tuning.ground_check_radius);
        let grounded = !spatial_query
            .shape_intersections(&foot_sphere, feet, Quat::IDENTITY, &ground_filter)
            .is_empty();

        // Down ray from the feet, any layer except the player itself
        let slope_filter = SpatialQueryFilter::default().with_excluded_entities([entity]);
        let slope_normal = spatial_query
            .cast_ray(
                feet + Vec3::Y * SLOPE_RAY_LIFT,
                Dir3::NEG_Y,
                tuning.slope_probe_distance + SLOPE_RAY_LIFT,
                true,
                &slope_filter,
            )
            .map(|hit| hit.normal);

        // Side rays, parkour walls only
        let reach = tuning.capsule_radius + tuning.wall_check_distance;
        let origin = transform.translation;
        let left_wall = spatial_query
            .cast_ray(origin, transform.left(), reach, true, &wall_filter)
            .map(|hit| hit.normal);
        let right_wall = spatial_query
            .cast_ray(origin, transform.right(), reach, true, &wall_filter)
            .map(|hit| hit.normal);

        let sample = ProbeSample {
            grounded,
            left_wall,
            right_wall,
            slope_normal,
        };

        if sample.grounded != probes.grounded {
            debug!("Ground contact: {}", sample.grounded);
        }
        *probes = sample;
    }
}
