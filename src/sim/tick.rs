//! Per-frame simulation tick
//!
//! Sequences one display-refresh worth of work: physics, support, lethal
//! collision, scrolling and culling, caps, parallax, then scoring.

use super::collision::{Surface, first_lethal_collision, resolve_support};
use super::difficulty::{self, Escalation};
use super::physics::integrate;
use super::scoring::detect_passes;
use super::spawner::enforce_caps;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;
use crate::settings::Settings;

/// What happened during one tick
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub surface: Surface,
    /// Support went from none to some this frame
    pub landed: bool,
    /// Obstacle that ended the run
    pub collided_with: Option<u32>,
    pub passed: Vec<u32>,
    /// Score-milestone escalation
    pub escalation: Escalation,
}

impl FrameReport {
    fn idle() -> Self {
        Self {
            surface: Surface::Airborne,
            landed: false,
            collided_with: None,
            passed: Vec::new(),
            escalation: Escalation::Unchanged,
        }
    }
}

/// Advance the world by one frame. Does nothing unless the game is playing.
pub fn tick(
    state: &mut GameState,
    settings: &Settings,
    events: &mut Vec<GameEvent>,
) -> FrameReport {
    let mut report = FrameReport::idle();
    if state.phase != GamePhase::Playing {
        return report;
    }

    // 1. Physics candidate
    let candidate = integrate(&state.character, GRAVITY);

    // 2. Support, then lethal collision against obstacles before they move
    let was_supported = state.character.on_platform;
    let support = resolve_support(&state.character, candidate, &state.platforms, &state.viewport);
    support.apply(&mut state.character);
    report.surface = support.surface;
    report.landed = !was_supported && support.on_platform;
    if report.landed {
        events.push(GameEvent::Landed);
    }

    if let Some(obstacle_id) = first_lethal_collision(&state.character.rect(), &state.obstacles) {
        if settings.invincible {
            log::debug!("Ignoring collision with obstacle {} (invincible)", obstacle_id);
        } else {
            log::info!("Collision with obstacle {} at score {}", obstacle_id, state.score);
            state.phase = GamePhase::GameOver;
            report.collided_with = Some(obstacle_id);
            events.push(GameEvent::Collision { obstacle_id });
            events.push(GameEvent::GameOver { score: state.score });
        }
    }

    // 3. Scroll and cull
    let speed = state.game_speed;
    for obstacle in &mut state.obstacles {
        obstacle.pos.x -= speed;
    }
    state.obstacles.retain(|o| o.pos.x > OBSTACLE_CULL_X);
    for platform in &mut state.platforms {
        platform.pos.x -= speed;
    }
    state.platforms.retain(|p| p.pos.x > PLATFORM_CULL_X);

    // 4. Caps
    let reduced_effects = settings.effective_reduced_effects(state.difficulty_index);
    enforce_caps(state, reduced_effects);

    // 5. Background
    state
        .parallax
        .advance(speed, state.difficulty_index, state.viewport.width);

    // 6. Scoring, aggregated before the milestone check
    let old_score = state.score;
    report.passed = detect_passes(state);
    for &id in &report.passed {
        events.push(GameEvent::ObstaclePassed { id });
    }
    report.escalation = difficulty::advance_for_score(state, old_score, state.score);
    if let Escalation::Advanced { to, .. } = report.escalation {
        events.push(GameEvent::DifficultyChanged { index: to });
    }

    state.frame_count += 1;
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Obstacle, ObstacleKind, Platform, PlatformKind, Viewport};
    use glam::Vec2;

    fn playing() -> GameState {
        let mut state = GameState::new(Viewport::default());
        state.phase = GamePhase::Playing;
        state
    }

    fn block(state: &mut GameState, x: f32) -> u32 {
        let id = state.next_entity_id();
        let y = state.viewport.rest_y(45.0);
        state.obstacles.push(Obstacle {
            id,
            kind: ObstacleKind::Block,
            pos: Vec2::new(x, y),
            size: Vec2::new(60.0, 45.0),
            passed: false,
        });
        id
    }

    #[test]
    fn test_tick_does_nothing_unless_playing() {
        let mut state = GameState::new(Viewport::default());
        block(&mut state, 500.0);
        let mut events = Vec::new();
        tick(&mut state, &Settings::default(), &mut events);
        assert_eq!(state.frame_count, 0);
        assert_eq!(state.obstacles[0].pos.x, 500.0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_first_frame_settles_on_ground() {
        let mut state = playing();
        let mut events = Vec::new();
        let report = tick(&mut state, &Settings::default(), &mut events);
        assert_eq!(report.surface, Surface::Ground);
        assert!(report.landed);
        assert_eq!(events, vec![GameEvent::Landed]);
        assert!(state.character.on_platform);
        assert!(!state.character.is_jumping);
    }

    #[test]
    fn test_entities_scroll_and_cull() {
        let mut state = playing();
        block(&mut state, 500.0);
        block(&mut state, -95.0);
        let id = state.next_entity_id();
        state.platforms.push(Platform {
            id,
            kind: PlatformKind::Ramp,
            pos: Vec2::new(-195.0, 0.0),
            size: Vec2::new(160.0, 80.0),
        });

        let mut events = Vec::new();
        tick(&mut state, &Settings::default(), &mut events);
        let speed = state.game_speed;
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles[0].pos.x, 500.0 - speed);
        assert!(state.platforms.is_empty());
    }

    #[test]
    fn test_block_collision_ends_game() {
        let mut state = playing();
        let x = state.character.pos.x;
        let id = block(&mut state, x);
        let mut events = Vec::new();
        let report = tick(&mut state, &Settings::default(), &mut events);
        assert_eq!(report.collided_with, Some(id));
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(events.contains(&GameEvent::GameOver { score: 0 }));

        // terminal: further ticks are no-ops
        let frames = state.frame_count;
        tick(&mut state, &Settings::default(), &mut events);
        assert_eq!(state.frame_count, frames);
    }

    #[test]
    fn test_invincible_survives_collision() {
        let mut state = playing();
        let x = state.character.pos.x;
        block(&mut state, x);
        let settings = Settings {
            invincible: true,
            ..Settings::default()
        };
        let report = tick(&mut state, &settings, &mut Vec::new());
        assert_eq!(report.collided_with, None);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_score_milestone_escalates_difficulty() {
        let mut state = playing();
        state.score = 14;
        // right edge lands left of the character after this frame's scroll
        block(&mut state, 30.0);

        let mut events = Vec::new();
        let report = tick(&mut state, &Settings::default(), &mut events);
        assert_eq!(state.score, 15);
        assert_eq!(report.escalation, Escalation::Advanced { from: 0, to: 1 });
        assert_eq!(state.difficulty_index, 1);
        assert_eq!(
            state.game_speed,
            BASE_SPEED * difficulty::LADDER[1].speed_multiplier
        );
        assert!(events.contains(&GameEvent::DifficultyChanged { index: 1 }));
    }

    #[test]
    fn test_two_passes_across_milestone_escalate_once() {
        let mut state = playing();
        state.score = 14;
        block(&mut state, 20.0);
        block(&mut state, 25.0);
        let report = tick(&mut state, &Settings::default(), &mut Vec::new());
        assert_eq!(state.score, 16);
        assert_eq!(report.passed.len(), 2);
        assert_eq!(state.difficulty_index, 1);
    }

    #[test]
    fn test_caps_hold_after_tick() {
        let mut state = playing();
        for i in 0..50 {
            block(&mut state, 600.0 + i as f32 * 5.0);
        }
        tick(&mut state, &Settings::default(), &mut Vec::new());
        assert_eq!(state.obstacles.len(), OBSTACLE_CAP);

        state.difficulty_index = difficulty::HELL_TIER;
        for i in 0..50 {
            block(&mut state, 900.0 + i as f32 * 5.0);
        }
        tick(&mut state, &Settings::default(), &mut Vec::new());
        assert_eq!(state.obstacles.len(), OBSTACLE_CAP_REDUCED);
    }
}
