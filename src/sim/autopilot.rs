//! Idle/demo mode - AI plays the game
//!
//! Reads the state and produces the same inputs a human would: held keys,
//! pointer position and clicks.

use glam::Vec2;

use super::fire::can_fire;
use super::state::{Enemy, GameState};
use super::tick::TickInput;

/// Enemies closer than this are treated as threats
const THREAT_RADIUS: f32 = 250.0;
/// Dash when a threat gets this close (beyond its radius)
const DASH_TRIGGER: f32 = 40.0;
/// Axis component needed before a key is held
const KEY_THRESHOLD: f32 = 0.3;

/// One frame of AI decisions
#[derive(Debug, Clone, Default)]
pub struct AutopilotCommand {
    pub input: TickInput,
    /// Click position when the AI wants to shoot
    pub fire_at: Option<Vec2>,
}

/// Decide this frame's input
pub fn autopilot(state: &GameState) -> AutopilotCommand {
    let player = &state.player;
    let nearest = state.enemies.iter().min_by(|a, b| {
        a.pos
            .distance_squared(player.pos)
            .partial_cmp(&b.pos.distance_squared(player.pos))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // Push away from every nearby enemy, weighted by closeness
    let mut flee = Vec2::ZERO;
    for enemy in &state.enemies {
        let away = player.pos - enemy.pos;
        let dist = away.length();
        if dist < THREAT_RADIUS && dist > f32::EPSILON {
            flee += away / dist * (1.0 - dist / THREAT_RADIUS);
        }
    }
    for bullet in &state.enemy_bullets {
        let away = player.pos - bullet.pos;
        let dist = away.length();
        if dist < THREAT_RADIUS * 0.5 && dist > f32::EPSILON {
            flee += away / dist * 0.5;
        }
    }

    let safe = flee == Vec2::ZERO;
    let nearest_pickup = state
        .pickups
        .iter()
        .min_by(|a, b| {
            a.pos
                .distance_squared(player.pos)
                .partial_cmp(&b.pos.distance_squared(player.pos))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|p| p.pos);

    let steer = if !safe {
        // Bias toward the middle so the AI does not pin itself in a corner
        let to_center = (state.config.viewport / 2.0 - player.pos) / state.config.viewport;
        flee.normalize_or_zero() + to_center
    } else if let Some(pickup) = nearest_pickup {
        pickup - player.pos
    } else {
        state.config.viewport / 2.0 - player.pos
    };
    let steer = if steer.length() < 5.0 {
        Vec2::ZERO
    } else {
        steer.normalize_or_zero()
    };

    let mut input = TickInput {
        up: steer.y < -KEY_THRESHOLD,
        down: steer.y > KEY_THRESHOLD,
        left: steer.x < -KEY_THRESHOLD,
        right: steer.x > KEY_THRESHOLD,
        dash: nearest.is_some_and(|e| too_close(state, e)),
        pointer: player.pos + Vec2::from_angle(player.facing) * 100.0,
    };

    let fire_at = nearest.map(|e| e.pos);
    if let Some(target) = fire_at {
        input.pointer = target;
    }

    AutopilotCommand {
        fire_at: fire_at.filter(|_| can_fire(state)),
        input,
    }
}

fn too_close(state: &GameState, enemy: &Enemy) -> bool {
    state.player.pos.distance(enemy.pos) < enemy.radius + DASH_TRIGGER
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::sim::archetype::EnemyArchetype;
    use crate::sim::state::PickupKind;

    fn playing() -> GameState {
        let mut state = GameState::new(SimConfig::default(), 5);
        state.start();
        state
    }

    #[test]
    fn test_flees_and_aims_at_threat() {
        let mut state = playing();
        let pos = state.player.pos + Vec2::new(100.0, 0.0);
        state.spawn_enemy(EnemyArchetype::Hunter, pos);

        let cmd = autopilot(&state);
        assert!(cmd.input.left);
        assert!(!cmd.input.right);
        assert_eq!(cmd.input.pointer, pos);
        assert_eq!(cmd.fire_at, Some(pos));
    }

    #[test]
    fn test_dashes_when_cornered() {
        let mut state = playing();
        let pos = state.player.pos + Vec2::new(20.0, 0.0);
        state.spawn_enemy(EnemyArchetype::Hunter, pos);
        assert!(autopilot(&state).input.dash);
    }

    #[test]
    fn test_collects_pickup_when_safe() {
        let mut state = playing();
        let pos = state.player.pos + Vec2::new(0.0, 200.0);
        state.spawn_pickup(PickupKind::Shield, pos, 100.0);

        let cmd = autopilot(&state);
        assert!(cmd.input.down);
        assert!(cmd.fire_at.is_none());
    }

    #[test]
    fn test_holds_fire_on_cooldown() {
        let mut state = playing();
        let pos = state.player.pos + Vec2::new(150.0, 0.0);
        state.spawn_enemy(EnemyArchetype::Hunter, pos);
        state.player.last_fired = Some(state.frame);
        assert!(autopilot(&state).fire_at.is_none());
    }
}
