//! Procedural obstacle and platform generation
//!
//! Each generator is invoked by its own timer. Randomness comes from whatever
//! [`Rng`] the caller hands in.

use glam::Vec2;
use rand::Rng;

use super::difficulty::INSANE_TIER;
use super::state::{GameState, Obstacle, ObstacleKind, Platform, PlatformKind};
use crate::consts::*;

/// Chance to skip an obstacle firing under reduced effects
pub const OBSTACLE_SKIP_CHANCE: f64 = 0.3;
/// Chance to skip a platform firing under reduced effects
pub const PLATFORM_SKIP_CHANCE: f64 = 0.4;
pub const SPIKE_FIELD_CHANCE: f64 = 0.3;
pub const SPIKE_SPACING: f32 = 30.0;
pub const SPIKE_SIZE: Vec2 = Vec2::new(30.0, 30.0);
pub const OBSTACLE_WIDTH: f32 = 60.0;
pub const OBSTACLE_HEIGHTS: [f32; 2] = [45.0, 60.0];

pub const COLUMN_CHANCE: f64 = 0.5;
pub const COLUMN_WIDTH: f32 = 120.0;
pub const COLUMN_UNIT: f32 = 70.0;
pub const RING_CHANCE: f64 = 0.3;
pub const RAMP_WIDTH: f32 = 160.0;
pub const RAMP_UNIT: f32 = 80.0;

/// Emit the next wave of obstacles. Returns how many were added.
pub fn spawn_obstacles<R: Rng + ?Sized>(
    state: &mut GameState,
    reduced_effects: bool,
    rng: &mut R,
) -> usize {
    if reduced_effects && rng.random_bool(OBSTACLE_SKIP_CHANCE) {
        return 0;
    }

    let viewport = state.viewport;
    if rng.random_bool(SPIKE_FIELD_CHANCE) {
        let max_spikes = if reduced_effects || state.difficulty_index >= INSANE_TIER {
            3
        } else {
            5
        };
        let count = rng.random_range(2..=max_spikes);
        for i in 0..count {
            let id = state.next_entity_id();
            state.obstacles.push(Obstacle {
                id,
                kind: ObstacleKind::Spike,
                pos: Vec2::new(
                    viewport.width + i as f32 * SPIKE_SPACING,
                    viewport.rest_y(SPIKE_SIZE.y),
                ),
                size: SPIKE_SIZE,
                passed: false,
            });
        }
        count
    } else {
        let kind = if rng.random_bool(0.5) {
            ObstacleKind::Triangle
        } else {
            ObstacleKind::Block
        };
        let height = OBSTACLE_HEIGHTS[rng.random_range(0..OBSTACLE_HEIGHTS.len())];
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle {
            id,
            kind,
            pos: Vec2::new(viewport.width, viewport.rest_y(height)),
            size: Vec2::new(OBSTACLE_WIDTH, height),
            passed: false,
        });
        1
    }
}

/// Emit a column or a ramp. Returns the new platform's ID, if any.
pub fn spawn_platform<R: Rng + ?Sized>(
    state: &mut GameState,
    reduced_effects: bool,
    rng: &mut R,
) -> Option<u32> {
    if reduced_effects && rng.random_bool(PLATFORM_SKIP_CHANCE) {
        return None;
    }

    let (kind, size) = if rng.random_bool(COLUMN_CHANCE) {
        let max_units = if reduced_effects { 2 } else { 3 };
        let units = rng.random_range(1..=max_units);
        let has_ring = !reduced_effects && rng.random_bool(RING_CHANCE);
        (
            PlatformKind::Column { has_ring },
            Vec2::new(COLUMN_WIDTH, units as f32 * COLUMN_UNIT),
        )
    } else {
        let units = rng.random_range(1..=2);
        (
            PlatformKind::Ramp,
            Vec2::new(RAMP_WIDTH, units as f32 * RAMP_UNIT),
        )
    };

    let viewport = state.viewport;
    let id = state.next_entity_id();
    state.platforms.push(Platform {
        id,
        kind,
        pos: Vec2::new(viewport.width, viewport.rest_y(size.y)),
        size,
    });
    Some(id)
}

/// Keep only the nearest entities when the lists outgrow their caps
pub fn enforce_caps(state: &mut GameState, reduced_effects: bool) {
    let (obstacle_cap, platform_cap) = caps(reduced_effects);

    if state.obstacles.len() > obstacle_cap {
        log::debug!(
            "Evicting {} obstacles over cap {}",
            state.obstacles.len() - obstacle_cap,
            obstacle_cap
        );
        state.obstacles.sort_by(|a, b| a.pos.x.total_cmp(&b.pos.x));
        state.obstacles.truncate(obstacle_cap);
    }

    if state.platforms.len() > platform_cap {
        log::debug!(
            "Evicting {} platforms over cap {}",
            state.platforms.len() - platform_cap,
            platform_cap
        );
        state.platforms.sort_by(|a, b| a.pos.x.total_cmp(&b.pos.x));
        state.platforms.truncate(platform_cap);
    }
}

/// `(obstacle_cap, platform_cap)`
pub fn caps(reduced_effects: bool) -> (usize, usize) {
    if reduced_effects {
        (OBSTACLE_CAP_REDUCED, PLATFORM_CAP_REDUCED)
    } else {
        (OBSTACLE_CAP, PLATFORM_CAP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Viewport;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_obstacles_spawn_at_right_edge_on_ground() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut state = GameState::new(Viewport::default());
        for _ in 0..200 {
            spawn_obstacles(&mut state, false, &mut rng);
        }
        assert!(!state.obstacles.is_empty());
        for o in &state.obstacles {
            assert!(o.pos.x >= state.viewport.width);
            assert_eq!(o.pos.y + o.size.y, state.viewport.ground_line());
            assert!(!o.passed);
            match o.kind {
                ObstacleKind::Spike => assert_eq!(o.size, SPIKE_SIZE),
                _ => {
                    assert_eq!(o.size.x, OBSTACLE_WIDTH);
                    assert!(OBSTACLE_HEIGHTS.contains(&o.size.y));
                }
            }
        }
        let kinds: Vec<_> = state.obstacles.iter().map(|o| o.kind).collect();
        assert!(kinds.contains(&ObstacleKind::Spike));
        assert!(kinds.contains(&ObstacleKind::Block));
        assert!(kinds.contains(&ObstacleKind::Triangle));
    }

    #[test]
    fn test_spike_field_size_limits() {
        let mut rng = Pcg32::seed_from_u64(11);
        for (reduced, index, max) in [(false, 0, 5), (true, 0, 3), (false, INSANE_TIER, 3)] {
            for _ in 0..300 {
                let mut state = GameState::new(Viewport::default());
                state.difficulty_index = index;
                let n = spawn_obstacles(&mut state, reduced, &mut rng);
                let spikes = state
                    .obstacles
                    .iter()
                    .filter(|o| o.kind == ObstacleKind::Spike)
                    .count();
                if spikes > 0 {
                    assert_eq!(spikes, n);
                    assert!((2..=max).contains(&spikes), "{spikes} spikes, max {max}");
                    // spaced from the right edge
                    for (i, s) in state.obstacles.iter().enumerate() {
                        assert_eq!(s.pos.x, state.viewport.width + i as f32 * SPIKE_SPACING);
                    }
                }
            }
        }
    }

    #[test]
    fn test_reduced_effects_sometimes_skips() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut skipped = 0;
        for _ in 0..200 {
            let mut state = GameState::new(Viewport::default());
            if spawn_obstacles(&mut state, true, &mut rng) == 0 {
                skipped += 1;
            }
        }
        assert!(skipped > 20 && skipped < 120, "skipped {skipped}");

        let mut state = GameState::new(Viewport::default());
        for _ in 0..200 {
            assert!(spawn_obstacles(&mut state, false, &mut rng) > 0);
        }
    }

    #[test]
    fn test_platform_shapes() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut state = GameState::new(Viewport::default());
        for _ in 0..300 {
            assert!(spawn_platform(&mut state, false, &mut rng).is_some());
        }
        let mut rings = 0;
        for p in &state.platforms {
            assert_eq!(p.pos.x, state.viewport.width);
            assert_eq!(p.pos.y + p.size.y, state.viewport.ground_line());
            match p.kind {
                PlatformKind::Column { has_ring } => {
                    assert_eq!(p.size.x, COLUMN_WIDTH);
                    assert!([70.0, 140.0, 210.0].contains(&p.size.y));
                    rings += has_ring as u32;
                }
                PlatformKind::Ramp => {
                    assert_eq!(p.size.x, RAMP_WIDTH);
                    assert!([80.0, 160.0].contains(&p.size.y));
                }
            }
        }
        assert!(rings > 0);
    }

    #[test]
    fn test_reduced_effects_platforms_are_smaller_and_ringless() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut state = GameState::new(Viewport::default());
        for _ in 0..300 {
            spawn_platform(&mut state, true, &mut rng);
        }
        assert!(state.platforms.len() < 300);
        for p in &state.platforms {
            assert!(!p.has_ring());
            if let PlatformKind::Column { .. } = p.kind {
                assert!(p.size.y <= 140.0);
            }
        }
    }

    #[test]
    fn test_caps_keep_nearest() {
        let mut state = GameState::new(Viewport::default());
        for i in (0..40).rev() {
            let id = state.next_entity_id();
            state.obstacles.push(Obstacle {
                id,
                kind: ObstacleKind::Block,
                pos: Vec2::new(i as f32 * 10.0, 0.0),
                size: Vec2::new(60.0, 45.0),
                passed: false,
            });
        }
        for i in 0..25 {
            let id = state.next_entity_id();
            state.platforms.push(Platform {
                id,
                kind: PlatformKind::Ramp,
                pos: Vec2::new(1000.0 - i as f32, 0.0),
                size: Vec2::new(160.0, 80.0),
            });
        }

        enforce_caps(&mut state, false);
        assert_eq!(state.obstacles.len(), OBSTACLE_CAP);
        assert!(state.obstacles.iter().all(|o| o.pos.x < 300.0));
        assert_eq!(state.platforms.len(), PLATFORM_CAP);

        enforce_caps(&mut state, true);
        assert_eq!(state.obstacles.len(), OBSTACLE_CAP_REDUCED);
        assert_eq!(state.platforms.len(), PLATFORM_CAP_REDUCED);
        assert!(state.platforms.iter().all(|p| p.pos.x <= 985.0));
    }
}
