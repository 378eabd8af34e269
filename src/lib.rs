//! Capy Dash - a side-scrolling jump-and-dodge runner
//!
//! Core modules:
//! - `sim`: Simulation (physics, support resolution, spawning, difficulty, scoring)
//! - `engine`: Session owner: timers, commands, per-frame snapshots
//! - `platform`: Host abstraction (monotonic time, input intents)
//! - `session`: Single-consumer driver that drains intents and advances the engine
//! - `settings`: Data-driven configuration
//! - `autopilot`: Jump heuristic for unattended runs

pub mod autopilot;
pub mod engine;
pub mod error;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

pub use engine::{Engine, Snapshot};
pub use error::SettingsError;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Viewport used when no settings are supplied
    pub const DEFAULT_VIEWPORT_WIDTH: f32 = 800.0;
    pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 400.0;
    /// Thickness of the ground strip at the bottom of the viewport
    pub const GROUND_HEIGHT: f32 = 50.0;

    /// Character box (square)
    pub const CHARACTER_SIZE: f32 = 90.0;
    /// Horizontal spawn position of the character
    pub const CHARACTER_START_X: f32 = 100.0;

    /// Gravity added to vertical velocity every frame (pixels/frame²)
    pub const GRAVITY: f32 = 1.0;
    /// Lighter gravity while ascending for a floaty jump
    pub const ASCENT_GRAVITY_FACTOR: f32 = 0.85;
    /// Vertical velocity set by a jump (negative is up)
    pub const JUMP_FORCE: f32 = -16.0;
    /// One-time upward nudge on a jump from the ground
    pub const JUMP_BOOST: f32 = 8.0;
    /// Extra jumps allowed while airborne
    pub const MAX_EXTRA_JUMPS: u8 = 1;
    /// Held jump repeats a ground jump after this long
    pub const AUTO_JUMP_REPEAT_MS: u64 = 300;

    /// Horizontal scroll speed at multiplier 1.0 (pixels/frame)
    pub const BASE_SPEED: f32 = 9.0;
    /// Time-based difficulty escalation period
    pub const DIFFICULTY_INTERVAL_MS: u64 = 20_000;
    /// Every multiple of this score advances the difficulty
    pub const SCORE_MILESTONE: u32 = 15;

    /// Entities left of these lines are culled
    pub const OBSTACLE_CULL_X: f32 = -100.0;
    pub const PLATFORM_CULL_X: f32 = -200.0;

    /// Entity caps (normal / reduced effects)
    pub const OBSTACLE_CAP: usize = 30;
    pub const OBSTACLE_CAP_REDUCED: usize = 15;
    pub const PLATFORM_CAP: usize = 20;
    pub const PLATFORM_CAP_REDUCED: usize = 10;

    /// Vertical tolerance for catching the character on a ramp surface
    pub const RAMP_SNAP_TOLERANCE: f32 = 5.0;

    /// Maximum replayed firings per timer when the host falls behind
    pub const MAX_TIMER_CATCHUP: u64 = 8;
}
