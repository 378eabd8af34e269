//! Jump heuristic for unattended runs
//!
//! Jumps from support whenever an unpassed obstacle is within a lead distance
//! that scales with the current scroll speed.

use crate::sim::state::GameState;

/// Frames of warning at the current speed before jumping
pub const DEFAULT_LEAD_FRAMES: f32 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Autopilot {
    pub lead_frames: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            lead_frames: DEFAULT_LEAD_FRAMES,
        }
    }
}

impl Autopilot {
    /// Distance ahead of the character that triggers a jump
    pub fn lead_distance(&self, state: &GameState) -> f32 {
        state.game_speed * self.lead_frames
    }

    /// Whether a jump should be issued this frame
    pub fn wants_jump(&self, state: &GameState) -> bool {
        let character = &state.character;
        if !state.is_playing() || !character.is_grounded() {
            return false;
        }
        let lead = self.lead_distance(state);
        state
            .obstacles
            .iter()
            .filter(|o| !o.passed && o.right() > character.left())
            .any(|o| o.pos.x - character.right() <= lead)
    }
}
