//! Support resolution and lethal collision
//!
//! Support is decided by walking every platform in list order. Rules are not
//! exclusive: a ramp tested after a column may overwrite the column's result,
//! and the last platform to claim the character wins.

use serde::{Deserialize, Serialize};

use super::physics::Motion;
use super::state::{Character, Obstacle, ObstacleKind, Platform, PlatformKind, Viewport};
use crate::consts::RAMP_SNAP_TOLERANCE;

/// Axis-aligned box, `y` grows downward
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

#[inline]
pub fn rects_intersect(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}

/// Lethal area of an obstacle; smaller than its visual box for pointy shapes
pub fn hitbox(obstacle: &Obstacle) -> Rect {
    let Rect { x, y, w, h } = obstacle.rect();
    match obstacle.kind {
        ObstacleKind::Block => Rect::new(x, y, w, h),
        ObstacleKind::Triangle => Rect::new(x + 15.0, y + 30.0, 30.0, 30.0),
        ObstacleKind::Spike => Rect::new(x + 8.0, y + 8.0, 14.0, 22.0),
    }
}

/// What the character ended up resting on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Surface {
    Airborne,
    Ground,
    PlatformTop { id: u32 },
    Ramp { id: u32 },
}

/// Final vertical state after support resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Support {
    pub y: f32,
    pub velocity_y: f32,
    pub on_platform: bool,
    pub jump_count: u8,
    pub surface: Surface,
}

impl Support {
    pub fn is_jumping(&self) -> bool {
        !self.on_platform
    }

    /// Write the result back into the character
    pub fn apply(&self, character: &mut Character) {
        character.pos.y = self.y;
        character.velocity_y = self.velocity_y;
        character.on_platform = self.on_platform;
        character.is_jumping = self.is_jumping();
        character.jump_count = self.jump_count;
    }
}

/// Decide where the character stands this frame.
///
/// `character` is last frame's state; `candidate` is the integrator's output.
pub fn resolve_support(
    character: &Character,
    candidate: Motion,
    platforms: &[Platform],
    viewport: &Viewport,
) -> Support {
    let height = character.size.y;
    let prev_bottom = character.bottom();
    let (left, right) = (character.left(), character.right());

    let mut support = Support {
        y: candidate.y,
        velocity_y: candidate.velocity_y,
        on_platform: false,
        jump_count: character.jump_count,
        surface: Surface::Airborne,
    };

    for platform in platforms {
        if !(right > platform.left() && left < platform.right()) {
            continue;
        }

        let top = platform.top();
        if support.velocity_y > 0.0 && prev_bottom <= top && support.y + height >= top {
            support.y = top - height;
            support.velocity_y = 0.0;
            support.on_platform = true;
            support.jump_count = 0;
            support.surface = Surface::PlatformTop { id: platform.id };
        }

        if let PlatformKind::Ramp = platform.kind {
            let progress = (right - platform.left()) / platform.size.x;
            let ramp_y = top + platform.size.y * (1.0 - progress);
            // a rising character passes through the slope; snapping it would
            // zero an upward velocity and hand back a spent double jump
            let catchable = support.velocity_y >= 0.0;
            if catchable && (prev_bottom - ramp_y).abs() <= RAMP_SNAP_TOLERANCE {
                support.y = ramp_y - height;
                support.velocity_y = 0.0;
                support.on_platform = true;
                support.jump_count = 0;
                support.surface = Surface::Ramp { id: platform.id };
            }
        }
    }

    let ground_y = character.ground_y(viewport);
    if !support.on_platform && support.y >= ground_y {
        support.y = ground_y;
        support.velocity_y = 0.0;
        support.on_platform = true;
        support.jump_count = 0;
        support.surface = Surface::Ground;
    }

    support
}

/// First obstacle whose hitbox overlaps `character`, in list order
pub fn first_lethal_collision(character: &Rect, obstacles: &[Obstacle]) -> Option<u32> {
    obstacles
        .iter()
        .find(|o| rects_intersect(character, &hitbox(o)))
        .map(|o| o.id)
}
