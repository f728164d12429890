//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only (stored in the state)
//! - Stable iteration order (entities are kept in id order)
//! - No rendering, DOM or platform dependencies

pub mod archetype;
pub mod autopilot;
pub mod collision;
pub mod fire;
pub mod hud;
pub mod spawner;
pub mod state;
pub mod tick;

pub use archetype::{ArchetypeParams, ArchetypeTable, EnemyArchetype};
pub use autopilot::{AutopilotCommand, autopilot};
pub use fire::{can_fire, fire};
pub use hud::{HudAlert, HudSnapshot};
pub use spawner::{SpawnOutcome, Spawner, spawn_tick};
pub use state::{
    DamageText, Enemy, EntityKind, GameEvent, GamePhase, GameState, Owner, Particle, Pickup,
    PickupKind, Player, Projectile,
};
pub use tick::{TickInput, tick};
