//! Movement domain: the per-character locomotion state machine.

use bevy::prelude::*;

use crate::movement::states::{self, Signal};
use crate::movement::wall_run::find_candidate;
use crate::movement::{
    EventBus, InputSignals, ListenerSet, LocomotionContext, LocomotionEvent, MovementState, Rig,
    StateTag,
};

/// Longest chain of entry redirects accepted in a single switch.
const MAX_REDIRECTS: usize = 8;

/// Events dispatched per frame before the queue is assumed to be looping.
const MAX_EVENTS_PER_FRAME: usize = 256;

/// One half of a state switch, in the order it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Exited(StateTag),
    Entered(StateTag),
}

/// Locomotion for one character: context, active state and event bus.
#[derive(Component, Debug)]
pub struct LocomotionController {
    ctx: LocomotionContext,
    state: MovementState,
    bus: EventBus,
    /// Lifecycle calls since the last `step`, oldest first.
    journal: Vec<Lifecycle>,
}

impl Default for LocomotionController {
    fn default() -> Self {
        Self::new()
    }
}

impl LocomotionController {
    /// Starts in Idle with gravity on.
    pub fn new() -> Self {
        Self {
            ctx: LocomotionContext::default(),
            state: MovementState::Idle,
            bus: EventBus::default(),
            journal: vec![Lifecycle::Entered(StateTag::Idle)],
        }
    }

    pub fn state(&self) -> &MovementState {
        &self.state
    }

    pub fn state_tag(&self) -> StateTag {
        self.state.tag()
    }

    pub fn context(&self) -> &LocomotionContext {
        &self.ctx
    }

    pub fn is_grounded(&self) -> bool {
        self.ctx.grounded
    }

    pub fn y_velocity(&self) -> f32 {
        self.ctx.y_velocity
    }

    /// True once any jump happened during the current frame.
    pub fn jump_consumed(&self) -> bool {
        self.ctx.jump_consumed
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    pub fn lifecycle(&self) -> &[Lifecycle] {
        &self.journal
    }

    /// Completed switches recorded since the last `step`, as (from, to).
    pub fn transitions(&self) -> Vec<(StateTag, StateTag)> {
        self.journal
            .windows(2)
            .filter_map(|pair| match pair {
                [Lifecycle::Exited(from), Lifecycle::Entered(to)] => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }

    /// Advance one frame.
    ///
    /// Order: ground latch, timers, landing, input edges, wall checks, the
    /// active state's update, then gravity.
    pub fn step(&mut self, input: &InputSignals, rig: &mut Rig<'_>) {
        self.journal.clear();

        let landed = self.ctx.latch_grounded(rig.probes.grounded);
        self.ctx.decay_timers(rig.dt, rig.tuning);
        self.ctx.jump_consumed = false;
        self.ctx.move_intent = input.move_axis;
        self.ctx.sprint_held = input.sprint.held;
        self.ctx.roll_held = input.roll.held;

        if landed {
            self.ctx.emit(LocomotionEvent::Landed);
            self.signal(Signal::Landed, rig);
        }

        self.handle_input(input, rig);
        self.check_walls(rig);

        if let Some(next) = states::update(&mut self.state, &mut self.ctx, rig) {
            self.switch_state(next, rig);
        }

        if self.ctx.gravity_enabled {
            self.apply_gravity(rig);
        }
    }

    /// Jump from any state, grounded or not. Used by charms.
    pub fn force_jump(&mut self, rig: &mut Rig<'_>) {
        self.switch_state(MovementState::Jump, rig);
    }

    /// Exit the current state and enter `next`, following entry redirects.
    ///
    /// Panics if entries keep redirecting past a fixed bound; that is a
    /// state table bug, not a runtime condition.
    pub(crate) fn switch_state(&mut self, next: MovementState, rig: &mut Rig<'_>) {
        let mut next = next;
        for _ in 0..MAX_REDIRECTS {
            states::exit(&mut self.state, &mut self.ctx, rig);
            let from = self.state.tag();
            self.journal.push(Lifecycle::Exited(from));

            self.state = next;
            self.journal.push(Lifecycle::Entered(next.tag()));
            debug!("Locomotion: {:?} -> {:?}", from, next.tag());

            match states::enter(&mut self.state, &mut self.ctx, rig) {
                Some(redirect) => next = redirect,
                None => return,
            }
        }
        panic!(
            "locomotion entry redirected more than {} times, last target {:?}",
            MAX_REDIRECTS,
            next.tag()
        );
    }

    /// Deliver every queued event to its subscribers, in emission order.
    ///
    /// Listeners may mutate the controller, including subscribing and
    /// unsubscribing; an unsubscribed listener is skipped for the rest of the
    /// delivery. Events raised during delivery are delivered in the same call.
    /// Returns everything that was published.
    pub fn dispatch_events(
        &mut self,
        rig: &mut Rig<'_>,
        listeners: &mut [&mut dyn ListenerSet],
    ) -> Vec<LocomotionEvent> {
        let mut published = Vec::new();
        while let Some(event) = self.ctx.take_event() {
            if published.len() >= MAX_EVENTS_PER_FRAME {
                warn!(
                    "Dropping locomotion events after {} in one frame, last {:?}",
                    MAX_EVENTS_PER_FRAME, event
                );
                self.ctx.clear_events();
                break;
            }
            published.push(event);

            let subscribers = self.bus.subscribers(event).to_vec();
            for id in subscribers {
                if !self.bus.is_subscribed(event, id) {
                    continue;
                }
                let delivered = listeners
                    .iter_mut()
                    .any(|set| set.deliver(id, event, self, rig));
                if !delivered {
                    warn!("No listener owns {:?} subscribed to {:?}", id, event);
                }
            }
        }
        published
    }

    fn signal(&mut self, signal: Signal, rig: &mut Rig<'_>) {
        if let Some(next) = states::on_signal(&mut self.state, signal, &mut self.ctx, rig) {
            self.switch_state(next, rig);
        }
    }

    fn handle_input(&mut self, input: &InputSignals, rig: &mut Rig<'_>) {
        if input.move_changed && input.has_move_intent() {
            self.ctx.emit(LocomotionEvent::MoveActionPressed);
            self.signal(Signal::Move, rig);
        }
        if input.sprint.pressed {
            self.ctx.emit(LocomotionEvent::SprintActionPressed);
        }
        if input.jump.pressed {
            if self.ctx.grounded {
                self.switch_state(MovementState::Jump, rig);
            }
            self.ctx.emit(LocomotionEvent::JumpActionPressed);
            self.signal(Signal::Jump, rig);
        }
        if input.slide.pressed {
            self.ctx.emit(LocomotionEvent::SlideActionPressed);
            self.signal(Signal::SlidePressed, rig);
        }
        if input.slide.released {
            self.ctx.emit(LocomotionEvent::SlideActionReleased);
            self.signal(Signal::SlideReleased, rig);
        }
        if input.roll.pressed {
            self.ctx.emit(LocomotionEvent::RollActionPressed);
        }
        if input.trick.pressed {
            self.ctx.emit(LocomotionEvent::TrickStarted);
        }
    }

    /// Clears the wall-jump lockout once no wall is in reach, otherwise
    /// starts a wall run when one is allowed.
    fn check_walls(&mut self, rig: &mut Rig<'_>) {
        if rig.probes.any_wall().is_none() {
            self.ctx.wall_run_lockout = false;
            return;
        }
        if matches!(self.state, MovementState::WallRun { .. }) {
            return;
        }
        if let Some(candidate) = find_candidate(&self.ctx, rig.probes) {
            self.switch_state(MovementState::wall_run(candidate), rig);
        }
    }

    fn apply_gravity(&mut self, rig: &mut Rig<'_>) {
        self.ctx.y_velocity -= rig.tuning.gravity * rig.dt;
        if self.ctx.grounded && self.ctx.y_velocity < 0.0 {
            self.ctx.y_velocity = rig.tuning.ground_stick_velocity;
        }
        rig.body.move_by(Vec3::Y * self.ctx.y_velocity * rig.dt);
    }
}
