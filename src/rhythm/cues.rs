//! Rhythm domain: which locomotion events start challenges.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::movement::{
    EventBus, ListenerId, ListenerSet, LocomotionController, LocomotionEvent, Rig,
};

/// A locomotion event that triggers a challenge, with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CueDef {
    pub event: LocomotionEvent,
    pub closing_speed: f32,
    pub score_reward: f32,
    pub time_reward: f32,
}

/// Per-character cue subscriptions. Triggered cues queue up until the
/// rhythm tick hands them to the engine.
#[derive(Component, Debug, Default)]
pub struct RhythmCues {
    routes: Vec<(ListenerId, CueDef)>,
    pending: Vec<CueDef>,
}

impl RhythmCues {
    /// One listener per cue, in the order given.
    pub fn subscribe(cues: &[CueDef], bus: &mut EventBus) -> Self {
        let routes = cues
            .iter()
            .map(|cue| {
                let id = bus.register();
                bus.subscribe(cue.event, id);
                (id, *cue)
            })
            .collect();
        Self {
            routes,
            pending: Vec::new(),
        }
    }

    pub fn unsubscribe(&mut self, bus: &mut EventBus) {
        for (id, _) in self.routes.drain(..) {
            bus.unsubscribe_all(id);
        }
    }

    pub fn drain_pending(&mut self) -> impl Iterator<Item = CueDef> + '_ {
        self.pending.drain(..)
    }
}

impl ListenerSet for RhythmCues {
    fn deliver(
        &mut self,
        id: ListenerId,
        event: LocomotionEvent,
        _character: &mut LocomotionController,
        _rig: &mut Rig<'_>,
    ) -> bool {
        let Some((_, cue)) = self.routes.iter().find(|(route, _)| *route == id) else {
            return false;
        };
        debug!("Rhythm cue from {:?}", event);
        self.pending.push(*cue);
        true
    }
}
