//! Vertical motion and jumping

use serde::Serialize;

use super::state::Character;
use crate::consts::*;

/// Tentative vertical motion before support resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub y: f32,
    pub velocity_y: f32,
}

/// Apply one frame of gravity to `character` without touching it
pub fn integrate(character: &Character, gravity: f32) -> Motion {
    let gravity_factor = if character.velocity_y < 0.0 {
        ASCENT_GRAVITY_FACTOR
    } else {
        1.0
    };
    let velocity_y = character.velocity_y + gravity * gravity_factor;
    Motion {
        y: character.pos.y + velocity_y,
        velocity_y,
    }
}

/// Which impulse a jump produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JumpKind {
    Ground,
    Double,
}

/// Start a jump if the character is allowed one.
///
/// Returns `None` (and leaves the character untouched) when the game is over
/// or the double jump is already spent.
pub fn apply_jump(character: &mut Character, game_over: bool) -> Option<JumpKind> {
    if game_over || !character.can_jump() {
        return None;
    }

    let kind = if character.is_jumping {
        character.jump_count += 1;
        JumpKind::Double
    } else {
        character.jump_count = 0;
        character.pos.y -= JUMP_BOOST;
        JumpKind::Ground
    };

    character.velocity_y = JUMP_FORCE;
    character.is_jumping = true;
    character.on_platform = false;
    Some(kind)
}

/// Held-button state for auto-repeated ground jumps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JumpInput {
    pub held: bool,
    /// When the last jump (manual or repeated) started
    pub last_jump_ms: Option<u64>,
}

impl JumpInput {
    /// Key-down edge
    pub fn press(&mut self) {
        self.held = true;
    }

    /// Key-up edge
    pub fn release(&mut self) {
        self.held = false;
    }

    pub fn record_jump(&mut self, now_ms: u64) {
        self.last_jump_ms = Some(now_ms);
    }

    /// A held button re-triggers a jump once the character is back on support
    pub fn should_repeat(&self, character: &Character, now_ms: u64) -> bool {
        if !self.held || !character.is_grounded() {
            return false;
        }
        match self.last_jump_ms {
            Some(last) => now_ms.saturating_sub(last) > AUTO_JUMP_REPEAT_MS,
            None => true,
        }
    }
}
