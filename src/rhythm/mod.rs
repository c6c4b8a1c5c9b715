//! Rhythm domain: a timing minigame driven by locomotion events.
//!
//! Cues subscribe to a character's event bus; the engine judges and scores
//! challenges once per frame after locomotion has run.

mod cues;
mod engine;

pub use cues::{CueDef, RhythmCues};
pub use engine::{Challenge, RhythmEngine, RhythmOutcome};

use bevy::ecs::message::{Message, MessageWriter};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::movement::{LocomotionController, LocomotionEvent, LocomotionSet};

/// Charge below `below` earns `multiplier`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultiplierBand {
    pub below: f32,
    pub multiplier: u32,
}

/// Numbers for the rhythm minigame, loaded from `assets/data/rhythm.ron`.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RhythmTuning {
    /// Gap a freshly spawned challenge starts with.
    pub start_distance: f32,
    /// A challenge judged with a gap below this is a hit.
    pub detection_distance: f32,
    /// Gap at or below which an unjudged challenge expires.
    pub expiry_distance: f32,
    pub miss_penalty: i64,
    pub expiry_score_penalty: i64,
    pub expiry_time_penalty: f32,
    /// Charge seconds lost per second.
    pub charge_decay_rate: f32,
    /// Charge that fills the timer bar.
    pub charge_fill_scale: f32,
    /// Ascending by `below`.
    pub multiplier_bands: Vec<MultiplierBand>,
    /// Multiplier once the charge is past every band.
    pub top_multiplier: u32,
    pub max_display_score: u32,
    pub cues: Vec<CueDef>,
}

impl Default for RhythmTuning {
    fn default() -> Self {
        let band = |below, multiplier| MultiplierBand { below, multiplier };
        Self {
            start_distance: 600.0,
            detection_distance: 100.0,
            expiry_distance: 25.0,
            miss_penalty: 10,
            expiry_score_penalty: 100,
            expiry_time_penalty: 2.0,
            charge_decay_rate: 1.0,
            charge_fill_scale: 10.0,
            multiplier_bands: vec![
                band(5.0, 1),
                band(15.0, 2),
                band(20.0, 3),
                band(25.0, 4),
                band(28.0, 6),
                band(35.0, 8),
            ],
            top_multiplier: 10,
            max_display_score: 999_999,
            cues: vec![
                CueDef {
                    event: LocomotionEvent::SlideBegan,
                    closing_speed: 100.0,
                    score_reward: 100.0,
                    time_reward: 3.0,
                },
                CueDef {
                    event: LocomotionEvent::TrickStarted,
                    closing_speed: 300.0,
                    score_reward: 100.0,
                    time_reward: 2.0,
                },
            ],
        }
    }
}

impl RhythmTuning {
    pub fn multiplier_for(&self, charge: f32) -> u32 {
        self.multiplier_bands
            .iter()
            .find(|band| charge < band.below)
            .map(|band| band.multiplier)
            .unwrap_or(self.top_multiplier)
    }
}

/// One rhythm outcome, with score and multiplier as of the end of the frame.
#[derive(Debug)]
pub struct RhythmMessage {
    pub outcome: RhythmOutcome,
    pub score: i64,
    pub multiplier: u32,
}

impl Message for RhythmMessage {}

pub struct RhythmPlugin;

impl Plugin for RhythmPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RhythmTuning>()
            .init_resource::<RhythmEngine>()
            .add_message::<RhythmMessage>()
            .add_systems(
                Update,
                (attach_rhythm_cues, tick_rhythm)
                    .chain()
                    .after(LocomotionSet),
            );
    }
}

fn attach_rhythm_cues(
    mut commands: Commands,
    tuning: Res<RhythmTuning>,
    mut query: Query<(Entity, &mut LocomotionController), Without<RhythmCues>>,
) {
    for (entity, mut controller) in &mut query {
        let cues = RhythmCues::subscribe(&tuning.cues, controller.bus_mut());
        debug!("Attached {} rhythm cues to {:?}", tuning.cues.len(), entity);
        commands.entity(entity).insert(cues);
    }
}

/// Hand triggered cues to the engine, then advance it one frame.
fn tick_rhythm(
    time: Res<Time>,
    tuning: Res<RhythmTuning>,
    mut engine: ResMut<RhythmEngine>,
    mut cues: Query<&mut RhythmCues>,
    mut messages: MessageWriter<RhythmMessage>,
) {
    if tuning.is_changed() {
        engine.set_tuning(tuning.clone());
    }

    let mut outcomes = Vec::new();
    for mut character_cues in &mut cues {
        for cue in character_cues.drain_pending() {
            outcomes.extend(engine.activate(cue.closing_speed, cue.score_reward, cue.time_reward));
        }
    }
    outcomes.extend(engine.tick(time.delta_secs()));

    for outcome in outcomes {
        if let RhythmOutcome::Expired { .. } = outcome {
            debug!("Rhythm challenge expired, score {}", engine.score());
        }
        messages.write(RhythmMessage {
            outcome,
            score: engine.score(),
            multiplier: engine.multiplier(),
        });
    }
}
