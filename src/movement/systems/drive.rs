//! Movement domain: runs each player's controller against the physics world.

use avian3d::prelude::*;
use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::charms::Keychain;
use crate::movement::{
    BodyShape, CameraSink, CapsuleMover, CapsuleShape, GameLayer, InputEdgeTracker, ListenerSet,
    LocomotionController, LocomotionMessage, LookState, MoveBasis, MovementTuning, Player,
    ProbeSample, RawInput, Rig, StateChangedMessage,
};
use crate::rhythm::RhythmCues;

/// Gap kept between the capsule and whatever it slides along.
const SKIN_WIDTH: f32 = 0.01;
/// Collide-and-slide iterations per displacement.
const MAX_SLIDES: usize = 4;

/// Player collider for a capsule shape: a capsule offset by the shape's center.
pub(crate) fn capsule_collider(radius: f32, shape: CapsuleShape) -> Collider {
    let length = (shape.height - 2.0 * radius).max(0.0);
    Collider::compound(vec![(
        Vec3::Y * shape.center,
        Quat::IDENTITY,
        Collider::capsule(radius, length),
    )])
}

/// Kinematic collide-and-slide over the spatial query pipeline.
struct KinematicMover<'a> {
    pipeline: &'a SpatialQueryPipeline,
    transform: &'a mut Transform,
    collider: &'a mut Collider,
    shape: &'a mut BodyShape,
    radius: f32,
    filter: SpatialQueryFilter,
}

impl CapsuleMover for KinematicMover<'_> {
    fn move_by(&mut self, displacement: Vec3) {
        let mut remaining = displacement;
        for _ in 0..MAX_SLIDES {
            let Ok((direction, length)) = Dir3::new_and_length(remaining) else {
                return;
            };

            let hit = self.pipeline.cast_shape(
                self.collider,
                self.transform.translation,
                Quat::IDENTITY,
                direction,
                &ShapeCastConfig::from_max_distance(length + SKIN_WIDTH),
                &self.filter,
            );

            let Some(hit) = hit else {
                self.transform.translation += remaining;
                return;
            };

            let travel = (hit.distance - SKIN_WIDTH).clamp(0.0, length);
            self.transform.translation += direction * travel;

            // Drop the part of the leftover motion that pushes into the surface
            remaining = direction * (length - travel);
            remaining -= hit.normal1 * remaining.dot(hit.normal1).min(0.0);
        }
    }

    fn set_shape(&mut self, shape: CapsuleShape) {
        if self.shape.0 == shape {
            return;
        }
        *self.collider = capsule_collider(self.radius, shape);
        self.shape.0 = shape;
    }
}

/// Camera changes land in [`LookState`]; `sync_camera` applies them.
struct LookSink<'a> {
    look: &'a mut LookState,
    tuning: &'a MovementTuning,
}

impl CameraSink for LookSink<'_> {
    fn set_local_offset(&mut self, offset: Vec3) {
        self.look.offset = offset;
    }

    fn set_pitch(&mut self, degrees: f32) {
        self.look.pitch = degrees;
    }

    fn set_pitch_clamp(&mut self, min: f32, max: f32) {
        self.look.pitch_min = min;
        self.look.pitch_max = max;
        self.look.clamp_pitch();
    }

    fn reset_pitch_clamp(&mut self) {
        self.look.pitch_min = self.tuning.pitch_min;
        self.look.pitch_max = self.tuning.pitch_max;
    }

    fn set_look_enabled(&mut self, enabled: bool) {
        self.look.enabled = enabled;
    }
}

/// Step every player's controller, deliver its events, then publish them.
#[allow(clippy::type_complexity)]
pub(crate) fn drive_locomotion(
    time: Res<Time>,
    raw: Res<RawInput>,
    tuning: Res<MovementTuning>,
    pipeline: Res<SpatialQueryPipeline>,
    mut query: Query<
        (
            Entity,
            &mut Transform,
            &mut Collider,
            &mut BodyShape,
            &mut LookState,
            &mut InputEdgeTracker,
            &mut LocomotionController,
            &ProbeSample,
            Option<&mut Keychain>,
            Option<&mut RhythmCues>,
        ),
        With<Player>,
    >,
    mut locomotion_messages: MessageWriter<LocomotionMessage>,
    mut state_messages: MessageWriter<StateChangedMessage>,
) {
    let dt = time.delta_secs();
    let collide_with = [GameLayer::Ground, GameLayer::Wall, GameLayer::ParkourWall];

    for (
        entity,
        mut transform,
        mut collider,
        mut shape,
        mut look,
        mut edges,
        mut controller,
        probes,
        mut keychain,
        mut cues,
    ) in &mut query
    {
        let signals = edges.sample(*raw);
        let basis = MoveBasis::from_transform(&transform);

        let mut body = KinematicMover {
            pipeline: &pipeline,
            transform: &mut transform,
            collider: &mut collider,
            shape: &mut shape,
            radius: tuning.capsule_radius,
            filter: SpatialQueryFilter::from_mask(collide_with).with_excluded_entities([entity]),
        };
        let mut camera = LookSink {
            look: &mut look,
            tuning: &tuning,
        };
        let mut rig = Rig {
            dt,
            tuning: &tuning,
            probes,
            basis,
            body: &mut body,
            camera: &mut camera,
        };

        controller.step(&signals, &mut rig);

        let mut listeners: Vec<&mut dyn ListenerSet> = Vec::with_capacity(2);
        if let Some(keychain) = keychain.as_deref_mut() {
            listeners.push(keychain);
        }
        if let Some(cues) = cues.as_deref_mut() {
            listeners.push(cues);
        }
        let published = controller.dispatch_events(&mut rig, &mut listeners);

        for (from, to) in controller.transitions() {
            state_messages.write(StateChangedMessage { entity, from, to });
        }
        for event in published {
            locomotion_messages.write(LocomotionMessage { entity, event });
        }
    }
}
