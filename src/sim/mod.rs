//! Simulation module
//!
//! All gameplay logic lives here:
//! - One frame per display refresh (`tick`)
//! - Wall-clock timers for spawning and difficulty (`timers`)
//! - Randomness only through a caller-supplied `Rng`
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod physics;
pub mod scoring;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod timers;

pub use collision::{
    Rect, Support, Surface, first_lethal_collision, hitbox, rects_intersect, resolve_support,
};
pub use difficulty::{DifficultyLevel, Escalation, LADDER, Tier};
pub use physics::{JumpInput, JumpKind, Motion, apply_jump, integrate};
pub use state::{
    Character, GameEvent, GamePhase, GameState, Obstacle, ObstacleKind, Parallax, Platform,
    PlatformKind, Viewport,
};
pub use tick::{FrameReport, tick};
pub use timers::{Firing, TimerHandle, TimerKind, Timers};
