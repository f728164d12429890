//! HUD snapshot handed to the DOM layer each frame

use serde::Serialize;

use super::state::{GameEvent, GamePhase, GameState};

/// Transient banners. The HUD shows them and clears them on its own timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HudAlert {
    LevelUp,
    BossIncoming,
}

/// Everything the HUD displays
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub score: u64,
    pub high_score: u64,
    pub health_fraction: f32,
    pub experience_fraction: f32,
    pub level: u32,
    /// "READY" or "CHARGING"
    pub dash_status: &'static str,
    /// "ACTIVE" or "INACTIVE"
    pub shield_status: &'static str,
    pub alerts: Vec<HudAlert>,
    pub game_over: bool,
}

impl HudSnapshot {
    pub fn capture(state: &GameState, events: &[GameEvent], high_score: u64) -> Self {
        let player = &state.player;
        let mut alerts = Vec::new();
        for event in events {
            let alert = match event {
                GameEvent::LevelUp { .. } => HudAlert::LevelUp,
                GameEvent::BossIncoming => HudAlert::BossIncoming,
                _ => continue,
            };
            if !alerts.contains(&alert) {
                alerts.push(alert);
            }
        }

        Self {
            score: state.score,
            high_score: high_score.max(state.score),
            health_fraction: player.health_fraction(),
            experience_fraction: player.experience_fraction(),
            level: player.level,
            dash_status: if player.dash_ready() { "READY" } else { "CHARGING" },
            shield_status: if player.shielded() { "ACTIVE" } else { "INACTIVE" },
            alerts,
            game_over: state.phase == GamePhase::Defeated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;

    #[test]
    fn test_snapshot_fractions_and_status() {
        let mut state = GameState::new(SimConfig::default(), 1);
        state.player.health = 25.0;
        state.player.experience = 50.0;
        state.player.dash_cooldown = 10.0;
        state.player.shield = 5.0;
        state.score = 300;

        let hud = HudSnapshot::capture(&state, &[], 1000);
        assert_eq!(hud.health_fraction, 0.25);
        assert_eq!(hud.experience_fraction, 0.5);
        assert_eq!(hud.dash_status, "CHARGING");
        assert_eq!(hud.shield_status, "ACTIVE");
        assert_eq!(hud.high_score, 1000);
        assert!(hud.alerts.is_empty());
    }

    #[test]
    fn test_alerts_from_events() {
        let state = GameState::new(SimConfig::default(), 1);
        let events = [
            GameEvent::LevelUp { level: 4 },
            GameEvent::LevelUp { level: 5 },
            GameEvent::BossIncoming,
        ];
        let hud = HudSnapshot::capture(&state, &events, 0);
        assert_eq!(hud.alerts, vec![HudAlert::LevelUp, HudAlert::BossIncoming]);
        assert_eq!(hud.dash_status, "READY");
        assert_eq!(hud.shield_status, "INACTIVE");
    }
}
