//! Rhythm domain: challenge queue, judging and the charge-driven multiplier.

use std::collections::VecDeque;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::rhythm::RhythmTuning;

/// One in-flight timing challenge. Its gap closes every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    pub distance: f32,
    pub closing_speed: f32,
}

/// Everything the engine can report back from `activate` or `tick`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RhythmOutcome {
    Spawned {
        closing_speed: f32,
    },
    Hit {
        score_delta: i64,
        time_bonus: f32,
        multiplier: u32,
    },
    Missed {
        score_delta: i64,
    },
    Expired {
        score_delta: i64,
        time_delta: f32,
    },
}

/// Score, charge timer and the FIFO of challenges for the session.
#[derive(Resource, Debug, Clone, Default)]
pub struct RhythmEngine {
    tuning: RhythmTuning,
    /// May go negative; only the read-out is clamped.
    score: i64,
    /// Seconds of charge, never below zero.
    charge: f32,
    challenges: VecDeque<Challenge>,
}

impl RhythmEngine {
    pub fn new(tuning: RhythmTuning) -> Self {
        Self {
            tuning,
            ..default()
        }
    }

    pub fn tuning(&self) -> &RhythmTuning {
        &self.tuning
    }

    /// Swap tuning without touching score, charge or the queue.
    pub fn set_tuning(&mut self, tuning: RhythmTuning) {
        self.tuning = tuning;
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn charge(&self) -> f32 {
        self.charge
    }

    pub fn challenges(&self) -> impl Iterator<Item = &Challenge> {
        self.challenges.iter()
    }

    pub fn queue_len(&self) -> usize {
        self.challenges.len()
    }

    pub fn multiplier(&self) -> u32 {
        self.tuning.multiplier_for(self.charge)
    }

    /// Judge the head challenge, if any, then always spawn a fresh one.
    pub fn activate(
        &mut self,
        closing_speed: f32,
        score_reward: f32,
        time_reward: f32,
    ) -> Vec<RhythmOutcome> {
        let mut outcomes = Vec::with_capacity(2);

        if let Some(head) = self.challenges.pop_front() {
            if head.distance < self.tuning.detection_distance {
                let multiplier = self.multiplier();
                let score_delta = (score_reward * multiplier as f32).round() as i64;
                self.apply(score_delta, time_reward);
                outcomes.push(RhythmOutcome::Hit {
                    score_delta,
                    time_bonus: time_reward,
                    multiplier,
                });
            } else {
                let score_delta = -self.tuning.miss_penalty;
                self.apply(score_delta, 0.0);
                outcomes.push(RhythmOutcome::Missed { score_delta });
            }
        }

        self.challenges.push_back(Challenge {
            distance: self.tuning.start_distance,
            closing_speed,
        });
        outcomes.push(RhythmOutcome::Spawned { closing_speed });
        outcomes
    }

    /// Close every gap, expire collapsed challenges, then drain the charge.
    pub fn tick(&mut self, dt: f32) -> Vec<RhythmOutcome> {
        for challenge in &mut self.challenges {
            challenge.distance -= challenge.closing_speed * dt;
        }

        let expiry = self.tuning.expiry_distance;
        let before = self.challenges.len();
        self.challenges.retain(|challenge| challenge.distance > expiry);
        let expired = before - self.challenges.len();

        let mut outcomes = Vec::with_capacity(expired);
        for _ in 0..expired {
            let score_delta = -self.tuning.expiry_score_penalty;
            let time_delta = -self.tuning.expiry_time_penalty;
            self.apply(score_delta, time_delta);
            outcomes.push(RhythmOutcome::Expired {
                score_delta,
                time_delta,
            });
        }

        self.charge = (self.charge - self.tuning.charge_decay_rate * dt).max(0.0);
        outcomes
    }

    /// Score clamped for display.
    pub fn display_score(&self) -> u32 {
        self.score.clamp(0, self.tuning.max_display_score as i64) as u32
    }

    /// Charge as a 0..=1 fill fraction for the timer bar.
    pub fn charge_fill(&self) -> f32 {
        if self.tuning.charge_fill_scale <= 0.0 {
            return 0.0;
        }
        (self.charge / self.tuning.charge_fill_scale).clamp(0.0, 1.0)
    }

    fn apply(&mut self, score_delta: i64, time_delta: f32) {
        self.score += score_delta;
        self.charge = (self.charge + time_delta).max(0.0);
    }
}
