//! Game state and core simulation types
//!
//! Everything a frame reads or writes lives in [`GameState`]. A restart throws
//! the whole value away and builds a fresh one.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::difficulty;
use crate::consts::*;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// State built, frame loop and timers not running yet
    Ready,
    /// Active gameplay
    Playing,
    /// Lethal collision happened; only a restart leaves this phase
    GameOver,
}

/// Visible play area in pixels, `y` grows downward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: DEFAULT_VIEWPORT_WIDTH,
            height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Top edge of the ground strip
    #[inline]
    pub fn ground_line(&self) -> f32 {
        self.height - GROUND_HEIGHT
    }

    /// `y` that puts an entity of the given height flush on the ground
    #[inline]
    pub fn rest_y(&self, height: f32) -> f32 {
        self.ground_line() - height
    }
}

/// The player-controlled runner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub velocity_y: f32,
    pub is_jumping: bool,
    /// Extra jumps used since leaving support
    pub jump_count: u8,
    pub on_platform: bool,
}

impl Character {
    /// Character standing at the spawn point of `viewport`
    pub fn spawn(viewport: &Viewport) -> Self {
        let size = Vec2::splat(CHARACTER_SIZE);
        Self {
            pos: Vec2::new(CHARACTER_START_X, viewport.rest_y(size.y)),
            size,
            velocity_y: 0.0,
            is_jumping: false,
            jump_count: 0,
            on_platform: false,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Resting `y` on the ground of `viewport`
    #[inline]
    pub fn ground_y(&self, viewport: &Viewport) -> f32 {
        viewport.rest_y(self.size.y)
    }

    /// Ground jump or the single double jump is still available
    pub fn can_jump(&self) -> bool {
        !self.is_jumping || self.jump_count < MAX_EXTRA_JUMPS
    }

    pub fn is_grounded(&self) -> bool {
        !self.is_jumping
    }
}

/// Obstacle shapes; each has its own hitbox
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Block,
    Triangle,
    Spike,
}

/// A lethal entity scrolling toward the character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub pos: Vec2,
    pub size: Vec2,
    /// Already counted toward score
    pub passed: bool,
}

impl Obstacle {
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    /// Trailing (right) edge
    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }
}

/// Platform shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformKind {
    /// Flat-topped pillar; the ring is purely decorative
    Column { has_ring: bool },
    /// Rises from the ground at its left edge to full height at its right edge
    Ramp,
}

/// A supporting entity the character can stand or slide on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub id: u32,
    pub kind: PlatformKind,
    pub pos: Vec2,
    pub size: Vec2,
}

impl Platform {
    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn has_ring(&self) -> bool {
        matches!(self.kind, PlatformKind::Column { has_ring: true })
    }
}

/// Scroll offsets of the four background layers (cosmetic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Parallax {
    pub stars: f32,
    pub mountains: f32,
    pub city: f32,
    pub grid: f32,
}

impl Parallax {
    /// Scroll every layer by its share of `speed`, faster at higher difficulty
    pub fn advance(&mut self, speed: f32, difficulty_index: usize, viewport_width: f32) {
        let speed_factor = if difficulty_index > 0 {
            1.0 + difficulty_index as f32 * 0.1
        } else {
            1.0
        };
        let wrap = viewport_width * 2.0;
        let step = |offset: f32, share: f32| (offset - speed * share * speed_factor) % wrap;

        self.stars = step(self.stars, 0.2);
        self.mountains = step(self.mountains, 0.4);
        self.city = step(self.city, 0.6);
        self.grid = step(self.grid, 0.8);
    }
}

/// Things collaborators (audio, HUD, effects) may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Jumped { double: bool },
    Landed,
    ObstaclePassed { id: u32 },
    ObstaclesSpawned { count: u32 },
    PlatformSpawned { id: u32 },
    DifficultyChanged { index: usize },
    /// Entered (or left, on restart) the intense ambience at Insane and above
    AmbienceChanged { intense: bool },
    Collision { obstacle_id: u32 },
    GameOver { score: u32 },
    Restarted,
}

/// Complete world state of one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    pub viewport: Viewport,
    pub character: Character,
    /// Live obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    /// Live platforms in spawn order
    pub platforms: Vec<Platform>,
    pub score: u32,
    pub difficulty_index: usize,
    /// Current scroll speed (pixels/frame)
    pub game_speed: f32,
    pub parallax: Parallax,
    /// Frames simulated this session
    pub frame_count: u64,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Fresh session state for the given viewport
    pub fn new(viewport: Viewport) -> Self {
        Self {
            phase: GamePhase::Ready,
            viewport,
            character: Character::spawn(&viewport),
            obstacles: Vec::new(),
            platforms: Vec::new(),
            score: 0,
            difficulty_index: 0,
            game_speed: difficulty::speed_for(0),
            parallax: Parallax::default(),
            frame_count: 0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn level(&self) -> &'static difficulty::DifficultyLevel {
        difficulty::level(self.difficulty_index)
    }

    /// Adopt a new viewport size.
    ///
    /// Obstacles and platforms keep sitting on the (moved) ground line; the
    /// character is scaled proportionally and never ends up below the ground.
    pub fn resize(&mut self, viewport: Viewport) {
        let old = self.viewport;
        let ground_shift = viewport.ground_line() - old.ground_line();

        for obstacle in &mut self.obstacles {
            obstacle.pos.y += ground_shift;
        }
        for platform in &mut self.platforms {
            platform.pos.y += ground_shift;
        }

        let character = &mut self.character;
        let was_on_ground = (character.pos.y - character.ground_y(&old)).abs() < 0.5;
        character.pos *= Vec2::new(viewport.width / old.width, viewport.height / old.height);

        let ground_y = character.ground_y(&viewport);
        if was_on_ground || character.pos.y > ground_y {
            character.pos.y = ground_y;
        }

        self.viewport = viewport;
    }
}
