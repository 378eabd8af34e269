//! Session owner
//!
//! [`Engine`] owns the world, the interval timers and the random source. All
//! mutation goes through its methods, one event at a time: a command, a timer
//! firing or a frame. Hosts call [`Engine::advance`] once per display refresh
//! with a monotonic timestamp and read back a [`Snapshot`].

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::consts::{DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH, DIFFICULTY_INTERVAL_MS};
use crate::platform::input::Intent;
use crate::settings::{Settings, validate_viewport};
use crate::sim::difficulty::{self, Escalation, Tier};
use crate::sim::physics::{JumpInput, JumpKind, apply_jump};
use crate::sim::spawner::{spawn_obstacles, spawn_platform};
use crate::sim::state::{
    Character, GameEvent, GamePhase, GameState, Obstacle, Parallax, Platform, Viewport,
};
use crate::sim::tick::{FrameReport, tick};
use crate::sim::timers::{Firing, TimerHandle, TimerKind, Timers};

/// Difficulty as shown to the UI
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DifficultySnapshot {
    pub index: usize,
    pub name: &'static str,
    pub speed_multiplier: f32,
    pub tier: Tier,
}

/// Read-only view of the world for renderers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub game_over: bool,
    pub viewport: Viewport,
    pub character: Character,
    pub obstacles: Vec<Obstacle>,
    pub platforms: Vec<Platform>,
    pub score: u32,
    pub difficulty: DifficultySnapshot,
    pub game_speed: f32,
    pub reduced_effects: bool,
    pub parallax: Parallax,
    pub frame_count: u64,
}

/// The simulation engine for one game at a time
#[derive(Debug)]
pub struct Engine<R = Pcg32> {
    state: GameState,
    settings: Settings,
    timers: Timers,
    rng: R,
    jump_input: JumpInput,
    events: Vec<GameEvent>,
}

impl Engine<Pcg32> {
    /// Engine with an OS-seeded (non-reproducible) random source
    pub fn new(settings: Settings) -> Self {
        Self::with_rng(settings, Pcg32::from_os_rng())
    }
}

impl<R: RngCore> Engine<R> {
    /// Engine drawing spawn decisions from `rng`
    ///
    /// A viewport that cannot hold the ground strip and the character is
    /// replaced by the default one.
    pub fn with_rng(mut settings: Settings, rng: R) -> Self {
        if let Err(err) = settings.validate() {
            log::warn!("Using default viewport: {}", err);
            settings.viewport_width = DEFAULT_VIEWPORT_WIDTH;
            settings.viewport_height = DEFAULT_VIEWPORT_HEIGHT;
        }
        Self {
            state: GameState::new(settings.viewport()),
            settings,
            timers: Timers::new(),
            rng,
            jump_input: JumpInput::default(),
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct world access for debugging and tests
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tier(&self) -> Tier {
        Tier::of(self.state.difficulty_index)
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    /// Begin play from `Ready`. From `GameOver` this is a restart; while
    /// playing it does nothing.
    pub fn start_game(&mut self, now_ms: u64) -> bool {
        match self.state.phase {
            GamePhase::Ready => {
                self.state.phase = GamePhase::Playing;
                self.arm_all(now_ms);
                self.events.push(GameEvent::Started);
                log::info!("Game started (session {})", self.timers.session());
                true
            }
            GamePhase::GameOver => {
                self.restart(now_ms);
                true
            }
            GamePhase::Playing => false,
        }
    }

    /// Throw the session away and start a fresh one immediately.
    ///
    /// Every timer of the old session is cancelled first, so nothing armed
    /// before this call can touch the new world.
    pub fn restart(&mut self, now_ms: u64) {
        self.timers.cancel_all();
        let was_intense = self.tier().is_intense();

        self.state = GameState::new(self.state.viewport);
        self.jump_input = JumpInput::default();
        self.state.phase = GamePhase::Playing;
        self.arm_all(now_ms);

        self.events.push(GameEvent::Restarted);
        if was_intense {
            self.events.push(GameEvent::AmbienceChanged { intense: false });
        }
        log::info!("Game restarted (session {})", self.timers.session());
    }

    /// Jump key down. Returns whether a jump actually started.
    pub fn jump(&mut self, now_ms: u64) -> bool {
        self.jump_input.press();
        self.try_jump(now_ms)
    }

    /// Jump key up; stops auto-repeat
    pub fn release_jump(&mut self) {
        self.jump_input.release();
    }

    /// Debug: move to any rung (clamped)
    pub fn set_difficulty_level(&mut self, index: usize, now_ms: u64) {
        let escalation = difficulty::set_level(&mut self.state, index);
        if let Escalation::Advanced { to, .. } = escalation {
            self.events.push(GameEvent::DifficultyChanged { index: to });
            self.after_level_change(escalation);
            if self.state.is_playing() {
                self.arm_spawners(now_ms);
            }
        }
    }

    /// Debug: obstacles stop being lethal
    pub fn set_invincible(&mut self, invincible: bool) {
        log::info!("Invincible: {}", invincible);
        self.settings.invincible = invincible;
    }

    pub fn set_reduced_effects(&mut self, reduced: bool) {
        log::info!("Reduced effects: {}", reduced);
        self.settings.reduced_effects = reduced;
    }

    /// Adopt a new viewport size. Unusable sizes (e.g. a minimized window) are ignored.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        if let Err(err) = validate_viewport(width, height) {
            log::warn!("Ignoring resize: {}", err);
            return false;
        }
        self.settings.viewport_width = width;
        self.settings.viewport_height = height;
        self.state.resize(Viewport::new(width, height));
        true
    }

    /// Apply a queued input intent
    pub fn apply(&mut self, intent: Intent, now_ms: u64) {
        match intent {
            Intent::Start => {
                self.start_game(now_ms);
            }
            Intent::Jump => {
                self.jump(now_ms);
            }
            Intent::ReleaseJump => self.release_jump(),
            Intent::Restart => self.restart(now_ms),
            Intent::Resize { width, height } => {
                self.resize(width, height);
            }
            Intent::SetDifficulty(index) => self.set_difficulty_level(index, now_ms),
            Intent::SetInvincible(on) => self.set_invincible(on),
            Intent::SetReducedEffects(on) => self.set_reduced_effects(on),
        }
    }

    /// Run every timer occurrence due by `now_ms`, then one frame.
    ///
    /// Returns `false` once the loop should stop scheduling frames.
    pub fn advance(&mut self, now_ms: u64) -> bool {
        if !self.state.is_playing() {
            return false;
        }
        while let Some(firing) = self.timers.pop_due(now_ms) {
            self.handle_firing(firing);
        }
        self.frame(now_ms)
    }

    /// One frame without servicing internal timers. For hosts that fire
    /// timers themselves through [`Engine::fire_timer`].
    pub fn frame(&mut self, now_ms: u64) -> bool {
        if !self.state.is_playing() {
            return false;
        }

        if self.settings.auto_repeat_jump
            && self.jump_input.should_repeat(&self.state.character, now_ms)
        {
            self.try_jump(now_ms);
        }

        let report: FrameReport = tick(&mut self.state, &self.settings, &mut self.events);
        if report.escalation.changed() {
            self.after_level_change(report.escalation);
            self.arm_spawners(now_ms);
        }

        if self.state.is_game_over() {
            self.timers.cancel_all();
            self.jump_input.release();
            log::info!(
                "Game over: score {} at {} after {} frames",
                self.state.score,
                self.state.level().name,
                self.state.frame_count
            );
            return false;
        }
        true
    }

    /// Apply an externally scheduled timer firing.
    ///
    /// Handles from a previous session or a superseded arming are rejected.
    pub fn fire_timer(&mut self, handle: TimerHandle, now_ms: u64) -> bool {
        if !self.state.is_playing() || !self.timers.is_live(&handle) {
            log::debug!("Ignoring stale {:?} timer (token {})", handle.kind, handle.token);
            return false;
        }
        self.handle_firing(Firing {
            handle,
            due_ms: now_ms,
        });
        true
    }

    /// Live timer handles of the current session
    pub fn armed_timers(&self) -> Vec<TimerHandle> {
        self.timers.handles()
    }

    /// Period of a live timer
    pub fn timer_period(&self, kind: TimerKind) -> Option<u64> {
        self.timers.period(kind)
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = &self.state;
        let level = state.level();
        Snapshot {
            phase: state.phase,
            game_over: state.is_game_over(),
            viewport: state.viewport,
            character: state.character,
            obstacles: state.obstacles.clone(),
            platforms: state.platforms.clone(),
            score: state.score,
            difficulty: DifficultySnapshot {
                index: state.difficulty_index,
                name: level.name,
                speed_multiplier: level.speed_multiplier,
                tier: self.tier(),
            },
            game_speed: state.game_speed,
            reduced_effects: self
                .settings
                .effective_reduced_effects(state.difficulty_index),
            parallax: state.parallax,
            frame_count: state.frame_count,
        }
    }

    fn try_jump(&mut self, now_ms: u64) -> bool {
        let blocked = !self.state.is_playing();
        match apply_jump(&mut self.state.character, blocked) {
            Some(kind) => {
                self.jump_input.record_jump(now_ms);
                self.events.push(GameEvent::Jumped {
                    double: kind == JumpKind::Double,
                });
                true
            }
            None => false,
        }
    }

    fn arm_all(&mut self, now_ms: u64) {
        self.timers
            .arm(TimerKind::Difficulty, DIFFICULTY_INTERVAL_MS, now_ms);
        self.arm_spawners(now_ms);
    }

    fn arm_spawners(&mut self, now_ms: u64) {
        let level = self.state.level();
        self.timers
            .arm(TimerKind::ObstacleSpawn, level.obstacle_frequency_ms, now_ms);
        self.timers
            .arm(TimerKind::PlatformSpawn, level.platform_frequency_ms, now_ms);
    }

    fn after_level_change(&mut self, escalation: Escalation) {
        if let Some(intense) = escalation.ambience_change() {
            log::info!("Ambience intense: {}", intense);
            self.events.push(GameEvent::AmbienceChanged { intense });
        }
        if let Escalation::Advanced { from, to } = escalation {
            if Tier::of(to).forces_reduced_effects() && !Tier::of(from).forces_reduced_effects() {
                log::info!("Reduced effects forced on at {}", difficulty::level(to).name);
            }
        }
    }

    fn handle_firing(&mut self, firing: Firing) {
        let reduced = self
            .settings
            .effective_reduced_effects(self.state.difficulty_index);

        match firing.handle.kind {
            TimerKind::ObstacleSpawn => {
                let count = spawn_obstacles(&mut self.state, reduced, &mut self.rng);
                if count > 0 {
                    self.events.push(GameEvent::ObstaclesSpawned {
                        count: count as u32,
                    });
                }
            }
            TimerKind::PlatformSpawn => {
                if let Some(id) = spawn_platform(&mut self.state, reduced, &mut self.rng) {
                    self.events.push(GameEvent::PlatformSpawned { id });
                }
            }
            TimerKind::Difficulty => {
                let escalation = difficulty::advance(&mut self.state);
                if let Escalation::Advanced { to, .. } = escalation {
                    self.events.push(GameEvent::DifficultyChanged { index: to });
                    self.after_level_change(escalation);
                }
                self.arm_spawners(firing.due_ms);
            }
        }
    }
}
