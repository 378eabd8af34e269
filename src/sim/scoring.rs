//! Pass detection

use super::state::GameState;

/// Mark every obstacle the character has fully cleared and add it to the score.
///
/// Returns the IDs passed this frame. An obstacle is counted at most once.
pub fn detect_passes(state: &mut GameState) -> Vec<u32> {
    let character_x = state.character.left();
    let mut passed = Vec::new();

    for obstacle in state.obstacles.iter_mut().filter(|o| !o.passed) {
        if character_x > obstacle.right() {
            obstacle.passed = true;
            passed.push(obstacle.id);
        }
    }

    state.score = state.score.saturating_add(passed.len() as u32);
    passed
}
