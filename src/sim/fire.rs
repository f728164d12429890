//! Player fire action
//!
//! Triggered by pointer-down, outside the frame step. Rate limited by a frame
//! count cooldown that shrinks with level.

use glam::Vec2;

use super::state::{GameEvent, GameState, Owner};
use crate::consts::BULLET_SPEED;
use crate::heading;

/// Fire toward `target` if the cooldown allows. Returns the spawn events.
pub fn fire(state: &mut GameState, target: Vec2) -> Vec<GameEvent> {
    if !state.is_playing() || !can_fire(state) {
        return Vec::new();
    }

    let level = state.player.level;
    let origin = state.player.pos;
    let angle = heading(origin, target);
    let damage = state.config.bullet_damage_at(level);
    let spread = state.config.spread_angle;

    state.player.last_fired = Some(state.frame);
    state.spawn_projectile(Owner::Player, origin, angle, BULLET_SPEED, damage);
    for pair in 1..=state.config.spread_pairs_at(level) {
        let offset = spread * pair as f32;
        state.spawn_projectile(Owner::Player, origin, angle - offset, BULLET_SPEED, damage);
        state.spawn_projectile(Owner::Player, origin, angle + offset, BULLET_SPEED, damage);
    }

    state.take_events()
}

/// Whether the shot cooldown has elapsed
pub fn can_fire(state: &GameState) -> bool {
    match state.player.last_fired {
        None => true,
        Some(last) => {
            state.frame.saturating_sub(last) >= state.config.fire_cooldown_at(state.player.level)
        }
    }
}
