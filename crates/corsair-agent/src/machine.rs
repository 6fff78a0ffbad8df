//! Utility-scored state machine with switch hysteresis.
//!
//! Every tick all behaviors are re-scored against the context; the
//! winner takes over only after the minimum dwell time has elapsed.
//! Ties prefer the currently active behavior, then declaration order,
//! which keeps transition sequences deterministic for identical inputs.

use rand_chacha::ChaCha8Rng;

use corsair_core::context::Context;
use corsair_core::enums::StateKind;

use crate::states::{Actuators, Behavior};

/// Behavior arbiter for one ship.
pub struct StateMachine {
    states: [Behavior; 6],
    active: usize,
    seconds_since_switch: f32,
    min_time_in_state: f32,
    scores: [f32; 6],
    /// Winning score recorded when the active behavior took over.
    score_at_switch: f32,
}

impl StateMachine {
    /// Starts in Idle. The dwell timer begins expired so the very first
    /// scoring pass may switch immediately.
    pub fn new(min_time_in_state: f32) -> Self {
        Self {
            states: Behavior::roster(),
            active: 0,
            seconds_since_switch: min_time_in_state,
            min_time_in_state,
            scores: [0.0; 6],
            score_at_switch: 0.0,
        }
    }

    /// Re-score, maybe switch, then tick the active behavior.
    pub fn update(
        &mut self,
        ctx: &Context,
        act: &mut Actuators,
        rng: &mut ChaCha8Rng,
        dt: f32,
    ) {
        for (i, state) in self.states.iter().enumerate() {
            self.scores[i] = state.compute_utility(ctx);
        }

        let best = select_best(&self.scores, self.active);

        self.seconds_since_switch += dt;
        if best != self.active && self.seconds_since_switch >= self.min_time_in_state {
            self.states[self.active].exit(act);
            self.active = best;
            self.states[best].enter(ctx, act, rng);
            self.seconds_since_switch = 0.0;
            self.score_at_switch = self.scores[best];
        }

        self.states[self.active].tick(ctx, act, rng, dt);
    }

    pub fn active_kind(&self) -> StateKind {
        self.states[self.active].kind()
    }

    /// Utility scores from the most recent update, in declaration order.
    pub fn scores(&self) -> &[f32; 6] {
        &self.scores
    }

    pub fn seconds_since_switch(&self) -> f32 {
        self.seconds_since_switch
    }

    /// Score the active behavior won with when it took over.
    pub fn score_at_switch(&self) -> f32 {
        self.score_at_switch
    }
}

/// Pick the winning behavior index.
///
/// The active behavior wins exact ties; among the others, the earliest
/// declared index wins (strict `>` never replaces an equal score).
pub fn select_best(scores: &[f32; 6], active: usize) -> usize {
    let mut best = active;
    let mut best_score = scores[active];
    for (i, &score) in scores.iter().enumerate() {
        if score > best_score {
            best = i;
            best_score = score;
        }
    }
    best
}
