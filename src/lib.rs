//! Void Pulse - A single-screen survive-and-shoot arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, enemy AI, collisions, leveling, spawning)
//! - `session`: Lifecycle control surface driving the simulation from host time
//! - `config`: Variant presets and feature switches
//! - `highscore`: Persisted best score
//! - `platform`: Browser/native platform abstraction

pub mod config;
pub mod error;
pub mod highscore;
pub mod platform;
pub mod session;
pub mod sim;

pub use config::{SimConfig, Variant};
pub use error::{Error, Result};
pub use highscore::HighScore;
pub use session::Session;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Milliseconds in one reference frame (time scale 1.0 == one 60 Hz frame)
    pub const FRAME_MS: f32 = 1000.0 / 60.0;
    /// Largest time scale a single frame may advance (tab-switch hitch guard)
    pub const MAX_FRAME_SCALE: f32 = 4.0;

    /// Default viewport dimensions
    pub const VIEWPORT_WIDTH: f32 = 1280.0;
    pub const VIEWPORT_HEIGHT: f32 = 720.0;

    /// Player defaults
    pub const PLAYER_SPEED: f32 = 5.0;
    /// Half-size of the player triangle, also the viewport inset margin
    pub const PLAYER_MARGIN: f32 = 20.0;
    pub const PLAYER_RADIUS: f32 = 15.0;
    pub const PLAYER_MAX_HEALTH: f32 = 100.0;

    /// Projectiles
    pub const BULLET_SPEED: f32 = 15.0;
    pub const BULLET_RADIUS: f32 = 4.0;
    pub const ENEMY_BULLET_RADIUS: f32 = 5.0;
    /// Distance beyond the viewport edge at which projectiles are culled
    pub const CULL_MARGIN: f32 = 50.0;
    /// Distance beyond the viewport edge where enemies appear
    pub const SPAWN_MARGIN: f32 = 50.0;

    /// Particles lose this much life per reference frame
    pub const PARTICLE_FADE: f32 = 0.02;
    /// Maximum live particles (oldest are evicted first)
    pub const MAX_PARTICLES: usize = 512;
    pub const EXPLOSION_PARTICLES: usize = 10;
    pub const DASH_TRAIL_PARTICLES: usize = 8;

    /// Floating damage text
    pub const DAMAGE_TEXT_RISE: f32 = 1.0;
    pub const DAMAGE_TEXT_FADE: f32 = 0.02;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Angle of the vector pointing from `from` to `to`
#[inline]
pub fn heading(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_heading_cardinal() {
        let origin = Vec2::ZERO;
        assert!(heading(origin, Vec2::new(10.0, 0.0)).abs() < 1e-6);
        assert!((heading(origin, Vec2::new(0.0, 10.0)) - PI / 2.0).abs() < 1e-6);
        assert!((heading(origin, Vec2::new(-10.0, 0.0)).abs() - PI).abs() < 1e-6);
    }

    #[test]
    fn test_polar_round_trip_length() {
        let p = polar_to_cartesian(7.5, 1.1);
        assert!((p.length() - 7.5).abs() < 1e-5);
    }
}
