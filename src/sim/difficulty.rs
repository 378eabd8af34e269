//! Difficulty ladder and escalation rules
//!
//! The ladder index only moves forward during a session. Both the 20 second
//! clock and score milestones advance it one rung at a time; the debug setter
//! is the only way to pick an arbitrary rung.

use serde::Serialize;

use super::state::GameState;
use crate::consts::{BASE_SPEED, SCORE_MILESTONE};

/// One rung of the ladder
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DifficultyLevel {
    pub name: &'static str,
    pub speed_multiplier: f32,
    pub obstacle_frequency_ms: u64,
    pub platform_frequency_ms: u64,
}

const fn rung(
    name: &'static str,
    speed_multiplier: f32,
    obstacle_frequency_ms: u64,
    platform_frequency_ms: u64,
) -> DifficultyLevel {
    DifficultyLevel {
        name,
        speed_multiplier,
        obstacle_frequency_ms,
        platform_frequency_ms,
    }
}

/// Faster scrolling and faster spawns at every step
pub const LADDER: [DifficultyLevel; 11] = [
    rung("Easy", 0.8, 2400, 4500),
    rung("Normal", 1.0, 2000, 4000),
    rung("Hard", 1.3, 1700, 3500),
    rung("Very Hard", 1.6, 1500, 3000),
    rung("Extreme", 2.0, 1300, 2500),
    rung("Impossible", 2.5, 1100, 2000),
    rung("Insane", 2.8, 1000, 1900),
    rung("Nightmare", 3.0, 900, 1800),
    rung("Hell", 3.3, 800, 1600),
    rung("Godzilla", 3.6, 700, 1400),
    rung("Burning Crap", 4.0, 600, 1200),
];

/// First rung with intense ambience and smaller spike fields
pub const INSANE_TIER: usize = 6;
/// First rung that forces reduced effects
pub const HELL_TIER: usize = 8;

pub const MAX_INDEX: usize = LADDER.len() - 1;

#[inline]
pub fn clamp_index(index: usize) -> usize {
    index.min(MAX_INDEX)
}

pub fn level(index: usize) -> &'static DifficultyLevel {
    &LADDER[clamp_index(index)]
}

/// Scroll speed for a rung
pub fn speed_for(index: usize) -> f32 {
    BASE_SPEED * level(index).speed_multiplier
}

/// Coarse bands collaborators switch ambience on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Tier {
    Standard,
    /// Insane up to (excluding) Hell
    Insane,
    /// Hell and above: reduced effects forced on
    Hell,
}

impl Tier {
    pub fn of(index: usize) -> Self {
        let index = clamp_index(index);
        if index >= HELL_TIER {
            Tier::Hell
        } else if index >= INSANE_TIER {
            Tier::Insane
        } else {
            Tier::Standard
        }
    }

    /// Intense ambience (music switch) is active
    pub fn is_intense(&self) -> bool {
        *self >= Tier::Insane
    }

    pub fn forces_reduced_effects(&self) -> bool {
        *self == Tier::Hell
    }
}

/// Outcome of an escalation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escalation {
    /// Already at the top rung (or nothing to do)
    Unchanged,
    Advanced { from: usize, to: usize },
}

impl Escalation {
    pub fn changed(&self) -> bool {
        matches!(self, Escalation::Advanced { .. })
    }

    /// New ambience when the change crosses the Insane boundary in either direction
    pub fn ambience_change(&self) -> Option<bool> {
        match *self {
            Escalation::Advanced { from, to } => {
                let intense = Tier::of(to).is_intense();
                (Tier::of(from).is_intense() != intense).then_some(intense)
            }
            Escalation::Unchanged => None,
        }
    }
}

/// Jump to `index` (clamped) and recompute the scroll speed
pub fn set_level(state: &mut GameState, index: usize) -> Escalation {
    let from = state.difficulty_index;
    let to = clamp_index(index);
    state.difficulty_index = to;
    state.game_speed = speed_for(to);

    if from == to {
        Escalation::Unchanged
    } else {
        log::info!(
            "Difficulty {} -> {} ({}, x{:.1})",
            from,
            to,
            LADDER[to].name,
            LADDER[to].speed_multiplier
        );
        Escalation::Advanced { from, to }
    }
}

/// Move one rung up, clamped at the top
pub fn advance(state: &mut GameState) -> Escalation {
    let next = clamp_index(state.difficulty_index + 1);
    if next == state.difficulty_index {
        return Escalation::Unchanged;
    }
    set_level(state, next)
}

/// Advance once per score milestone crossed between `old_score` and `new_score`
pub fn advance_for_score(state: &mut GameState, old_score: u32, new_score: u32) -> Escalation {
    let from = state.difficulty_index;
    for _ in 0..milestones_crossed(old_score, new_score) {
        if !advance(state).changed() {
            break;
        }
    }

    let to = state.difficulty_index;
    if from == to {
        Escalation::Unchanged
    } else {
        Escalation::Advanced { from, to }
    }
}

/// Number of positive multiples of [`SCORE_MILESTONE`] in `(old_score, new_score]`
pub fn milestones_crossed(old_score: u32, new_score: u32) -> u32 {
    if new_score <= old_score {
        return 0;
    }
    new_score / SCORE_MILESTONE - old_score / SCORE_MILESTONE
}
