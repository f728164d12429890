//! Enemy spawner
//!
//! A self-rescheduling timer on its own millisecond clock. It runs beside the
//! frame step rather than inside it: the host advances it with wall time.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::archetype::EnemyArchetype;
use super::state::{GameEvent, GameState};
use crate::consts::SPAWN_MARGIN;

/// Upper bound on spawns fired by one `advance` call (long hitches)
const MAX_SPAWNS_PER_ADVANCE: u32 = 8;

/// Pending spawn timer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Spawner {
    /// Milliseconds until the next tick (None = suspended)
    pub next_in_ms: Option<f32>,
}

impl Spawner {
    pub fn schedule(&mut self, delay_ms: f32) {
        self.next_in_ms = Some(delay_ms.max(0.0));
    }

    pub fn suspend(&mut self) {
        self.next_in_ms = None;
    }

    pub fn is_suspended(&self) -> bool {
        self.next_in_ms.is_none()
    }
}

/// What a spawner tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome {
    /// Not playing, or a boss is alive
    Skipped,
    Regular { id: u32, archetype: EnemyArchetype },
    Boss { id: u32 },
}

/// Run the spawn timer forward by `elapsed_ms`, firing due ticks
pub fn advance(state: &mut GameState, elapsed_ms: f32) -> Vec<GameEvent> {
    if !state.is_playing() {
        return Vec::new();
    }

    let mut remaining = elapsed_ms.max(0.0);
    let mut fired = 0;
    while let Some(due) = state.spawner.next_in_ms {
        if due > remaining {
            state.spawner.next_in_ms = Some(due - remaining);
            break;
        }
        remaining -= due;
        state.spawner.suspend();
        spawn_tick(state);

        fired += 1;
        if fired >= MAX_SPAWNS_PER_ADVANCE {
            break;
        }
    }

    state.take_events()
}

/// One spawner tick. Reschedules itself after regular spawns only.
pub fn spawn_tick(state: &mut GameState) -> SpawnOutcome {
    if !state.is_playing() || state.boss_active {
        return SpawnOutcome::Skipped;
    }

    if state.boss_pending {
        let pos = edge_position(state);
        let id = state.spawn_enemy(EnemyArchetype::Boss, pos);
        state.boss_pending = false;
        state.boss_active = true;
        state.spawner.suspend();
        state.emit(GameEvent::BossSpawned { id });
        log::info!("Boss #{} spawned at level {}", id, state.player.level);
        return SpawnOutcome::Boss { id };
    }

    let archetype = pick_archetype(state);
    let pos = edge_position(state);
    let id = state.spawn_enemy(archetype, pos);

    let delay = state.config.spawn_delay_ms(state.difficulty());
    state.spawner.schedule(delay);

    SpawnOutcome::Regular { id, archetype }
}

/// Weighted roll over the archetypes unlocked at the current level
fn pick_archetype(state: &mut GameState) -> EnemyArchetype {
    let level = state.player.level;
    let total: u32 = state
        .config
        .enemy_mix
        .iter()
        .filter(|w| w.min_level <= level)
        .map(|w| w.weight)
        .sum();
    if total == 0 {
        return EnemyArchetype::Hunter;
    }

    let mut roll = state.rng.random_range(0..total);
    for entry in state.config.enemy_mix.iter().filter(|w| w.min_level <= level) {
        if roll < entry.weight {
            return entry.archetype;
        }
        roll -= entry.weight;
    }
    EnemyArchetype::Hunter
}

/// Random point just outside one of the four viewport edges
fn edge_position(state: &mut GameState) -> Vec2 {
    let size = state.config.viewport;
    let side = state.rng.random_range(0..4);
    let along_x = state.rng.random::<f32>() * size.x;
    let along_y = state.rng.random::<f32>() * size.y;
    match side {
        0 => Vec2::new(along_x, -SPAWN_MARGIN),
        1 => Vec2::new(size.x + SPAWN_MARGIN, along_y),
        2 => Vec2::new(along_x, size.y + SPAWN_MARGIN),
        _ => Vec2::new(-SPAWN_MARGIN, along_y),
    }
}
