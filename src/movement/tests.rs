use bevy::prelude::*;

use crate::charms::{Keychain, KeychainDef};
use crate::movement::{
    CameraSink, CapsuleMover, CapsuleShape, InputEdgeTracker, Lifecycle, ListenerId, ListenerSet,
    LocomotionController, LocomotionEvent, MoveBasis, MovementTuning, ProbeSample, RawInput, Rig,
    StateTag,
};

const DT: f32 = 1.0 / 60.0;
const EPSILON: f32 = 1e-4;

#[derive(Debug, Default)]
struct RecordingBody {
    position: Vec3,
    moves: Vec<Vec3>,
    shapes: Vec<CapsuleShape>,
}

impl CapsuleMover for RecordingBody {
    fn move_by(&mut self, displacement: Vec3) {
        self.position += displacement;
        self.moves.push(displacement);
    }

    fn set_shape(&mut self, shape: CapsuleShape) {
        self.shapes.push(shape);
    }
}

#[derive(Debug)]
struct RecordingCamera {
    offset: Vec3,
    pitch: f32,
    clamp: Option<(f32, f32)>,
    look_enabled: bool,
}

impl RecordingCamera {
    fn new(tuning: &MovementTuning) -> Self {
        Self {
            offset: tuning.standing_camera_offset(),
            pitch: 0.0,
            clamp: None,
            look_enabled: true,
        }
    }
}

impl CameraSink for RecordingCamera {
    fn set_local_offset(&mut self, offset: Vec3) {
        self.offset = offset;
    }

    fn set_pitch(&mut self, degrees: f32) {
        self.pitch = degrees;
    }

    fn set_pitch_clamp(&mut self, min: f32, max: f32) {
        self.clamp = Some((min, max));
    }

    fn reset_pitch_clamp(&mut self) {
        self.clamp = None;
    }

    fn set_look_enabled(&mut self, enabled: bool) {
        self.look_enabled = enabled;
    }
}

struct Harness {
    controller: LocomotionController,
    edges: InputEdgeTracker,
    tuning: MovementTuning,
    probes: ProbeSample,
    body: RecordingBody,
    camera: RecordingCamera,
}

impl Harness {
    fn new(tuning: MovementTuning) -> Self {
        let camera = RecordingCamera::new(&tuning);
        Self {
            controller: LocomotionController::new(),
            edges: InputEdgeTracker::default(),
            tuning,
            probes: ProbeSample {
                grounded: true,
                slope_normal: Some(Vec3::Y),
                ..default()
            },
            body: RecordingBody::default(),
            camera,
        }
    }

    /// Standing on flat ground with the landing edge already consumed.
    fn grounded() -> Self {
        Self::grounded_with(MovementTuning::default())
    }

    fn grounded_with(tuning: MovementTuning) -> Self {
        let mut harness = Self::new(tuning);
        harness.step(RawInput::default());
        harness
    }

    fn airborne() -> Self {
        let mut harness = Self::new(MovementTuning::default());
        harness.probes.grounded = false;
        harness.probes.slope_normal = None;
        harness
    }

    fn step(&mut self, raw: RawInput) -> Vec<LocomotionEvent> {
        self.step_with(raw, &mut [])
    }

    fn step_with(
        &mut self,
        raw: RawInput,
        listeners: &mut [&mut dyn ListenerSet],
    ) -> Vec<LocomotionEvent> {
        let signals = self.edges.sample(raw);
        let mut rig = Rig {
            dt: DT,
            tuning: &self.tuning,
            probes: &self.probes,
            basis: MoveBasis::default(),
            body: &mut self.body,
            camera: &mut self.camera,
        };
        self.controller.step(&signals, &mut rig);
        self.controller.dispatch_events(&mut rig, listeners)
    }

    fn step_keyed(&mut self, keychain: &mut Keychain, raw: RawInput) -> Vec<LocomotionEvent> {
        let mut listeners: [&mut dyn ListenerSet; 1] = [keychain];
        self.step_with(raw, &mut listeners)
    }

    fn tag(&self) -> StateTag {
        self.controller.state_tag()
    }

    fn slide_penalty(&self) -> f32 {
        self.controller.context().slide_penalty
    }
}

fn idle() -> RawInput {
    RawInput::default()
}

fn forward(sprint: bool) -> RawInput {
    RawInput {
        move_axis: Vec2::Y,
        sprint,
        ..default()
    }
}

fn horizontal(v: Vec3) -> Vec3 {
    v.with_y(0.0)
}

fn assert_paired(log: &[Lifecycle]) {
    assert_eq!(log.first(), Some(&Lifecycle::Entered(StateTag::Idle)));
    for pair in log.windows(2) {
        match pair {
            [Lifecycle::Entered(entered), Lifecycle::Exited(exited)] => {
                assert_eq!(entered, exited, "exit does not match the state entered")
            }
            [Lifecycle::Exited(_), Lifecycle::Entered(_)] => {}
            other => panic!("unpaired lifecycle calls: {:?}", other),
        }
    }
}

// ============================================================================
// Ground states
// ============================================================================

#[test]
fn test_sprinting_from_idle_moves_at_run_speed() {
    let mut h = Harness::grounded();
    let start = h.body.position;
    let frames = 30;

    for _ in 0..frames {
        h.step(forward(true));
        assert_eq!(h.tag(), StateTag::Run);
    }

    let expected = Vec3::NEG_Z * h.tuning.run_speed * DT * frames as f32;
    let travelled = horizontal(h.body.position - start);
    assert!(
        (travelled - expected).length() < EPSILON,
        "travelled {:?}, expected {:?}",
        travelled,
        expected
    );
}

#[test]
fn test_walk_turns_into_run_once_sprint_is_held() {
    let mut h = Harness::grounded();

    h.step(forward(false));
    assert_eq!(h.tag(), StateTag::Walk);

    h.step(forward(true));
    assert_eq!(h.tag(), StateTag::Run);
    assert_eq!(
        h.controller.transitions(),
        vec![(StateTag::Walk, StateTag::Run)]
    );

    h.step(idle());
    assert_eq!(h.tag(), StateTag::Idle);
}

#[test]
fn test_move_press_is_reported_once_per_change() {
    let mut h = Harness::grounded();

    let events = h.step(forward(false));
    assert!(events.contains(&LocomotionEvent::MoveActionPressed));
    assert!(events.contains(&LocomotionEvent::Moved));

    let events = h.step(forward(false));
    assert!(!events.contains(&LocomotionEvent::MoveActionPressed));
}

#[test]
fn test_walking_off_a_ledge_falls() {
    let mut h = Harness::grounded();
    h.step(forward(false));
    assert_eq!(h.tag(), StateTag::Walk);

    h.probes.grounded = false;
    h.step(forward(false));
    assert_eq!(h.tag(), StateTag::Fall);
}

#[test]
fn test_gravity_pins_grounded_body_to_stick_velocity() {
    let mut h = Harness::grounded();
    for _ in 0..10 {
        h.step(idle());
    }
    assert_eq!(h.controller.y_velocity(), h.tuning.ground_stick_velocity);
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_every_switch_exits_then_enters_exactly_once() {
    let mut h = Harness::new(MovementTuning::default());
    let mut log = h.controller.lifecycle().to_vec();
    let mut record = |h: &mut Harness, raw: RawInput| {
        h.step(raw);
        log.extend_from_slice(h.controller.lifecycle());
    };

    record(&mut h, idle());
    record(&mut h, forward(true));
    record(
        &mut h,
        RawInput {
            slide: true,
            ..forward(true)
        },
    );
    record(&mut h, forward(true));
    record(
        &mut h,
        RawInput {
            jump: true,
            ..forward(true)
        },
    );
    h.probes.grounded = false;
    for _ in 0..5 {
        record(&mut h, forward(true));
    }
    h.probes.grounded = true;
    record(&mut h, forward(true));
    record(&mut h, idle());

    assert_paired(&log);
    assert!(log.len() > 8, "expected several switches, got {:?}", log);
}

// ============================================================================
// Slide
// ============================================================================

fn slide(sprint: bool) -> RawInput {
    RawInput {
        slide: true,
        ..forward(sprint)
    }
}

#[test]
fn test_slide_penalty_grows_across_consecutive_slides() {
    let mut h = Harness::grounded();
    h.step(forward(true));

    let mut penalties = Vec::new();
    for _ in 0..3 {
        h.step(slide(true));
        assert_eq!(h.tag(), StateTag::Slide);
        penalties.push(h.slide_penalty());
        h.step(forward(true));
        assert_eq!(h.tag(), StateTag::Run);
    }

    assert!(penalties.windows(2).all(|pair| pair[1] > pair[0]));
}

#[test]
fn test_slide_penalty_decays_at_fixed_rate_to_zero() {
    let mut h = Harness::grounded();
    h.step(forward(true));
    h.step(slide(true));
    h.step(idle());
    assert!(h.slide_penalty() > 0.0);

    let rate = h.tuning.slide_penalty_decay;
    let mut previous = h.slide_penalty();
    for _ in 0..600 {
        h.step(idle());
        let current = h.slide_penalty();
        if previous > rate * DT {
            assert!((previous - current - rate * DT).abs() < EPSILON);
        }
        assert!(current <= previous);
        previous = current;
    }
    assert_eq!(h.slide_penalty(), 0.0);
}

#[test]
fn test_exhausted_slide_redirects_without_sliding() {
    let tuning = MovementTuning {
        slide_start_speed: 4.0,
        ..default()
    };
    let mut h = Harness::grounded_with(tuning);
    h.step(forward(true));
    h.step(slide(true));
    assert_eq!(h.tag(), StateTag::Slide);
    h.step(forward(true));

    h.body.moves.clear();
    h.body.shapes.clear();
    let events = h.step(slide(true));

    assert_eq!(h.tag(), StateTag::Run);
    assert_eq!(
        h.controller.lifecycle(),
        &[
            Lifecycle::Exited(StateTag::Run),
            Lifecycle::Entered(StateTag::Slide),
            Lifecycle::Exited(StateTag::Slide),
            Lifecycle::Entered(StateTag::Run),
        ]
    );
    assert!(!events.contains(&LocomotionEvent::SlideBegan));
    assert!(!events.contains(&LocomotionEvent::SlideEnded));
    assert!(!h.body.shapes.contains(&CapsuleShape::sliding(&h.tuning)));

    // The only horizontal motion is the resumed run
    let travelled: Vec3 = h.body.moves.iter().copied().map(horizontal).sum();
    assert!((travelled.length() - h.tuning.run_speed * DT).abs() < EPSILON);
}

#[test]
fn test_slide_exit_restores_camera_and_capsule() {
    let mut h = Harness::grounded();
    h.step(forward(true));
    let events = h.step(slide(true));

    assert!(events.contains(&LocomotionEvent::SlideBegan));
    assert_eq!(h.body.shapes.last(), Some(&CapsuleShape::sliding(&h.tuning)));
    assert!(h.camera.offset.y < h.tuning.standing_camera_offset().y);
    assert_eq!(
        h.camera.clamp,
        Some((h.tuning.slide_pitch_min, h.tuning.slide_pitch_max))
    );
    // Only looking down is limited while sliding
    assert_eq!(h.camera.clamp, Some((-90.0, 60.0)));
    assert_eq!(h.tuning.slide_pitch_min, h.tuning.pitch_min);
    assert!(h.tuning.slide_pitch_max < h.tuning.pitch_max);

    let events = h.step(forward(true));
    assert!(events.contains(&LocomotionEvent::SlideEnded));
    assert_eq!(h.body.shapes.last(), Some(&CapsuleShape::standing(&h.tuning)));
    assert_eq!(h.camera.offset, h.tuning.standing_camera_offset());
    assert_eq!(h.camera.clamp, None);
}

#[test]
fn test_slide_ends_when_forward_input_is_released() {
    let mut h = Harness::grounded();
    h.step(forward(true));
    h.step(slide(true));

    h.step(RawInput {
        slide: true,
        sprint: true,
        ..default()
    });
    assert_eq!(h.tag(), StateTag::Idle);
}

#[test]
fn test_slide_runs_out_of_speed_on_flat_ground() {
    let mut h = Harness::grounded();
    h.step(forward(true));
    h.step(slide(true));

    // 12 m/s at 10 m/s² of friction lasts 1.2s
    for _ in 0..90 {
        h.step(slide(true));
    }
    assert_eq!(h.tag(), StateTag::Run);
}

#[test]
fn test_slide_accelerates_downhill() {
    let first_slide_move = |slope: Vec3| {
        let mut h = Harness::grounded();
        h.probes.slope_normal = Some(slope);
        h.step(forward(true));
        h.body.moves.clear();
        h.step(slide(true));
        h.body.moves[0]
    };

    let flat = first_slide_move(Vec3::Y);
    let downhill = first_slide_move(Vec3::new(0.0, 1.0, -0.5).normalize());

    let tuning = MovementTuning::default();
    assert!((flat.length() - tuning.slide_start_speed * DT).abs() < EPSILON);
    assert!(downhill.y < 0.0);
    assert!(downhill.length() > flat.length());
}

// ============================================================================
// Air
// ============================================================================

fn jump(input: RawInput) -> RawInput {
    RawInput {
        jump: true,
        ..input
    }
}

#[test]
fn test_grounded_jump_launches_from_any_ground_state() {
    let mut h = Harness::grounded();
    h.step(forward(true));
    let events = h.step(jump(forward(true)));

    assert_eq!(h.tag(), StateTag::Jump);
    let expected = h.tuning.jump_force - h.tuning.gravity * DT;
    assert!((h.controller.y_velocity() - expected).abs() < EPSILON);

    let jumped = events.iter().position(|e| *e == LocomotionEvent::Jumped);
    let pressed = events
        .iter()
        .position(|e| *e == LocomotionEvent::JumpActionPressed);
    assert!(jumped.is_some() && pressed.is_some());
    assert!(jumped < pressed);
}

#[test]
fn test_jump_lands_into_matching_ground_state() {
    let mut h = Harness::grounded();
    h.step(jump(idle()));
    h.probes.grounded = false;
    for _ in 0..10 {
        h.step(forward(false));
    }
    assert_eq!(h.tag(), StateTag::Jump);

    h.probes.grounded = true;
    let events = h.step(forward(false));
    assert!(events.contains(&LocomotionEvent::Landed));
    assert_eq!(h.tag(), StateTag::Walk);
}

/// Idle on the ground, then fall long enough to exceed the hard-landing speed.
fn fall_hard() -> Harness {
    let mut h = Harness::grounded();
    h.probes.grounded = false;
    for _ in 0..60 {
        h.step(idle());
    }
    assert_eq!(h.tag(), StateTag::Fall);
    assert!(h.controller.y_velocity() <= h.tuning.high_fall_threshold);
    h.probes.grounded = true;
    h
}

#[test]
fn test_hard_landing_staggers_and_slows_movement() {
    let mut h = fall_hard();
    h.step(idle());
    assert_eq!(h.tag(), StateTag::Idle);
    assert!(h.controller.context().is_staggered());

    h.body.moves.clear();
    h.step(forward(false));
    assert_eq!(h.tag(), StateTag::Walk);
    let expected = h.tuning.walk_speed * h.tuning.stagger_speed_factor * DT;
    assert!((h.body.moves[0].length() - expected).abs() < EPSILON);

    for _ in 0..70 {
        h.step(forward(false));
    }
    assert!(!h.controller.context().is_staggered());
}

#[test]
fn test_hard_landing_with_roll_held_rolls_into_run() {
    let mut h = fall_hard();
    let roll = RawInput {
        roll: true,
        ..idle()
    };
    let events = h.step(roll);

    assert_eq!(h.tag(), StateTag::Roll);
    assert!(events.contains(&LocomotionEvent::RollBegan));
    assert!(!h.camera.look_enabled);
    assert!(h.camera.pitch > 0.0);
    assert!(!h.controller.context().is_staggered());

    let mut frames = 0;
    while h.tag() == StateTag::Roll {
        h.step(roll);
        frames += 1;
        assert!(frames < 40, "roll never finished");
    }

    assert_eq!(
        h.controller.transitions(),
        vec![(StateTag::Roll, StateTag::Run)]
    );
    assert_eq!(h.camera.pitch, 0.0);
    assert!(h.camera.look_enabled);
}

#[test]
fn test_soft_landing_goes_straight_to_ground_state() {
    let mut h = Harness::grounded();
    h.probes.grounded = false;
    for _ in 0..5 {
        h.step(idle());
    }
    h.probes.grounded = true;
    h.step(forward(true));

    assert_eq!(h.tag(), StateTag::Run);
    assert!(!h.controller.context().is_staggered());
}

#[test]
fn test_long_jump_turns_into_fall_and_lands_hard() {
    let mut h = Harness::grounded();
    h.step(jump(idle()));
    h.probes.grounded = false;
    for _ in 0..90 {
        h.step(idle());
    }
    assert_eq!(h.tag(), StateTag::Fall);
    assert!(h.controller.y_velocity() <= h.tuning.high_fall_threshold);

    h.probes.grounded = true;
    let events = h.step(idle());

    assert!(events.contains(&LocomotionEvent::Landed));
    assert_eq!(h.tag(), StateTag::Idle);
    assert!(h.controller.context().is_staggered());
}

#[test]
fn test_jump_landing_past_fall_speed_staggers() {
    let mut h = Harness::grounded();
    h.step(jump(idle()));
    h.probes.grounded = false;

    // The switch to Fall happens a frame after gravity crosses the threshold
    let mut frames = 0;
    while h.controller.y_velocity() > h.tuning.high_fall_threshold {
        h.step(idle());
        frames += 1;
        assert!(frames < 120, "never reached fall speed");
    }
    assert_eq!(h.tag(), StateTag::Jump);

    h.probes.grounded = true;
    h.step(idle());

    assert_eq!(h.tag(), StateTag::Idle);
    assert!(h.controller.context().is_staggered());
}

#[test]
fn test_jump_that_never_leaves_ground_settles_on_descent() {
    let mut h = Harness::grounded();
    let events = h.step(jump(idle()));
    assert!(events.contains(&LocomotionEvent::Jumped));

    // No landing edge ever arrives
    for _ in 0..60 {
        h.step(idle());
    }

    assert_eq!(h.tag(), StateTag::Idle);
    assert!(!h.controller.context().is_staggered());
    assert_eq!(h.controller.y_velocity(), h.tuning.ground_stick_velocity);
}

#[test]
fn test_fall_strafes_without_reporting_movement() {
    let mut h = Harness::airborne();
    h.step(idle());
    assert_eq!(h.tag(), StateTag::Fall);

    h.body.moves.clear();
    let events = h.step(forward(false));

    assert_eq!(h.tag(), StateTag::Fall);
    assert!(!events.contains(&LocomotionEvent::Moved));
    let strafed: Vec3 = h.body.moves.iter().copied().map(horizontal).sum();
    assert!((strafed.length() - h.tuning.walk_speed * DT).abs() < EPSILON);
}

// ============================================================================
// Wall run
// ============================================================================

#[test]
fn test_wall_run_starts_airborne_and_runs_along_wall() {
    let mut h = Harness::airborne();
    h.probes.right_wall = Some(Vec3::NEG_X);

    let events = h.step(forward(false));

    assert_eq!(h.tag(), StateTag::WallRun);
    assert!(events.contains(&LocomotionEvent::WallRunBegan));
    assert_eq!(h.controller.y_velocity(), 0.0);
    assert!(!h.controller.context().gravity_enabled);

    let expected = Vec3::NEG_Z * h.tuning.wall_run_speed * DT;
    assert_eq!(h.body.moves.len(), 1, "gravity must not move the body");
    assert!((h.body.moves[0] - expected).length() < EPSILON);
}

#[test]
fn test_wall_run_needs_forward_input() {
    let mut h = Harness::airborne();
    h.probes.left_wall = Some(Vec3::X);

    h.step(RawInput {
        move_axis: Vec2::X,
        ..default()
    });
    assert_ne!(h.tag(), StateTag::WallRun);

    h.step(forward(false));
    assert_eq!(h.tag(), StateTag::WallRun);

    let events = h.step(idle());
    assert_eq!(h.tag(), StateTag::Fall);
    assert!(events.contains(&LocomotionEvent::WallRunEnded));
    assert!(h.controller.context().gravity_enabled);
}

#[test]
fn test_wall_jump_locks_out_until_wall_is_left() {
    let mut h = Harness::airborne();
    h.probes.right_wall = Some(Vec3::NEG_X);
    h.step(forward(false));
    assert_eq!(h.tag(), StateTag::WallRun);

    h.step(jump(forward(false)));
    assert_eq!(h.tag(), StateTag::Jump);
    assert!(h.controller.context().wall_run_lockout);
    let expected = h.tuning.jump_force - h.tuning.gravity * DT;
    assert!((h.controller.y_velocity() - expected).abs() < EPSILON);

    // Cooldown long expired, but the lockout holds while the wall is in reach
    for _ in 0..20 {
        h.step(forward(false));
        assert_eq!(h.tag(), StateTag::Jump);
    }

    h.probes.right_wall = None;
    h.step(forward(false));
    assert!(!h.controller.context().wall_run_lockout);

    h.probes.right_wall = Some(Vec3::NEG_X);
    h.step(forward(false));
    assert_eq!(h.tag(), StateTag::WallRun);
}

#[test]
fn test_wall_reattach_waits_for_cooldown() {
    let mut h = Harness::airborne();
    h.probes.right_wall = Some(Vec3::NEG_X);
    h.step(forward(false));

    // Drop off the wall, then touch it again right away
    h.probes.right_wall = None;
    h.step(forward(false));
    assert_eq!(h.tag(), StateTag::Fall);

    h.probes.right_wall = Some(Vec3::NEG_X);
    h.step(forward(false));
    assert_eq!(h.tag(), StateTag::Fall);

    for _ in 0..20 {
        h.step(forward(false));
    }
    assert_eq!(h.tag(), StateTag::WallRun);
}

#[test]
fn test_touching_ground_during_wall_run_returns_to_ground_state() {
    let mut h = Harness::airborne();
    h.probes.right_wall = Some(Vec3::NEG_X);
    h.step(forward(true));
    assert_eq!(h.tag(), StateTag::WallRun);

    h.probes.grounded = true;
    h.probes.slope_normal = Some(Vec3::Y);
    let events = h.step(forward(true));

    assert!(events.contains(&LocomotionEvent::Landed));
    assert!(events.contains(&LocomotionEvent::WallRunEnded));
    assert_eq!(h.tag(), StateTag::Run);
    assert!(h.controller.context().gravity_enabled);

    h.step(idle());
    assert_eq!(h.tag(), StateTag::Idle);
    for _ in 0..120 {
        h.step(forward(true));
    }
    assert_eq!(h.tag(), StateTag::Run);
}

// ============================================================================
// Event bus and charms
// ============================================================================

#[derive(Default)]
struct Recorder {
    owned: Vec<ListenerId>,
    /// Unsubscribed by the first delivery.
    victim: Option<ListenerId>,
    log: Vec<ListenerId>,
}

impl ListenerSet for Recorder {
    fn deliver(
        &mut self,
        id: ListenerId,
        event: LocomotionEvent,
        character: &mut LocomotionController,
        _rig: &mut Rig<'_>,
    ) -> bool {
        if !self.owned.contains(&id) {
            return false;
        }
        self.log.push(id);
        if let Some(victim) = self.victim.take() {
            character.bus_mut().unsubscribe(event, victim);
        }
        true
    }
}

fn trick() -> RawInput {
    RawInput {
        trick: true,
        ..default()
    }
}

#[test]
fn test_listeners_run_in_registration_order() {
    let mut h = Harness::grounded();
    let bus = h.controller.bus_mut();
    let first = bus.register();
    let second = bus.register();
    bus.subscribe(LocomotionEvent::TrickStarted, second);
    bus.subscribe(LocomotionEvent::TrickStarted, first);

    let mut recorder = Recorder {
        owned: vec![first, second],
        ..default()
    };
    let mut listeners: [&mut dyn ListenerSet; 1] = [&mut recorder];
    let events = h.step_with(trick(), &mut listeners);

    assert!(events.contains(&LocomotionEvent::TrickStarted));
    assert_eq!(recorder.log, vec![second, first]);
}

#[test]
fn test_unsubscribe_during_dispatch_skips_listener() {
    let mut h = Harness::grounded();
    let bus = h.controller.bus_mut();
    let first = bus.register();
    let second = bus.register();
    bus.subscribe(LocomotionEvent::TrickStarted, first);
    bus.subscribe(LocomotionEvent::TrickStarted, second);

    let mut recorder = Recorder {
        owned: vec![first, second],
        victim: Some(second),
        ..default()
    };
    let mut listeners: [&mut dyn ListenerSet; 1] = [&mut recorder];
    h.step_with(trick(), &mut listeners);

    assert_eq!(recorder.log, vec![first]);
    assert!(!h.controller.bus().is_subscribed(LocomotionEvent::TrickStarted, second));
}

#[test]
fn test_double_jump_fires_once_per_air_time() {
    let mut h = Harness::grounded();
    let mut keychain = KeychainDef::default().build(h.controller.bus_mut());
    assert_eq!(keychain.slots_taken(), 1);

    // Ground jump does not spend the charge
    h.step_keyed(&mut keychain, jump(idle()));
    assert_eq!(h.tag(), StateTag::Jump);
    h.probes.grounded = false;
    for _ in 0..5 {
        h.step_keyed(&mut keychain, idle());
    }

    let events = h.step_keyed(&mut keychain, jump(idle()));
    assert!(events.contains(&LocomotionEvent::Jumped));
    assert_eq!(h.controller.y_velocity(), h.tuning.jump_force);

    h.step_keyed(&mut keychain, idle());
    let events = h.step_keyed(&mut keychain, jump(idle()));
    assert!(!events.contains(&LocomotionEvent::Jumped));
    assert!(h.controller.y_velocity() < h.tuning.jump_force);

    // Landing restores the charge
    h.probes.grounded = true;
    h.step_keyed(&mut keychain, idle());
    h.step_keyed(&mut keychain, jump(idle()));
    h.probes.grounded = false;
    h.step_keyed(&mut keychain, idle());
    let events = h.step_keyed(&mut keychain, jump(idle()));
    assert!(events.contains(&LocomotionEvent::Jumped));
}

#[test]
fn test_wall_jump_does_not_trigger_double_jump() {
    let mut h = Harness::airborne();
    let mut keychain = KeychainDef::default().build(h.controller.bus_mut());
    h.probes.right_wall = Some(Vec3::NEG_X);
    h.step_keyed(&mut keychain, forward(false));
    assert_eq!(h.tag(), StateTag::WallRun);

    let events = h.step_keyed(&mut keychain, jump(forward(false)));
    let jumps = events
        .iter()
        .filter(|e| **e == LocomotionEvent::Jumped)
        .count();
    assert_eq!(jumps, 1);

    // The charge is still there for a real air jump
    h.step_keyed(&mut keychain, forward(false));
    let events = h.step_keyed(&mut keychain, jump(forward(false)));
    assert!(events.contains(&LocomotionEvent::Jumped));
}

#[test]
fn test_deactivated_keychain_stops_reacting() {
    let mut h = Harness::grounded();
    let mut keychain = KeychainDef::default().build(h.controller.bus_mut());
    keychain.deactivate(h.controller.bus_mut());

    h.step_keyed(&mut keychain, jump(idle()));
    h.probes.grounded = false;
    h.step_keyed(&mut keychain, idle());
    let events = h.step_keyed(&mut keychain, jump(idle()));

    assert!(!events.contains(&LocomotionEvent::Jumped));
}
