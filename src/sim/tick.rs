//! Per-frame simulation step
//!
//! Advances the run by one display frame. `dt` is the elapsed-time scale where
//! 1.0 is one 60 Hz frame.

use glam::Vec2;
use rand::Rng;

use super::collision::{circles_overlap, hit_distance, newest_within, out_of_bounds, within};
use super::state::{
    Enemy, GameEvent, GamePhase, GameState, Owner, PickupKind, despawn_where,
};
use crate::consts::*;
use crate::{heading, polar_to_cartesian};

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Dash key held
    pub dash: bool,
    /// Cursor position in viewport coordinates
    pub pointer: Vec2,
}

impl TickInput {
    /// Update held state from a key name. Returns false for unmapped keys.
    pub fn set_key(&mut self, key: &str, held: bool) -> bool {
        let slot = match key.to_lowercase().as_str() {
            "w" | "arrowup" => &mut self.up,
            "s" | "arrowdown" => &mut self.down,
            "a" | "arrowleft" => &mut self.left,
            "d" | "arrowright" => &mut self.right,
            " " | "space" | "shift" => &mut self.dash,
            _ => return false,
        };
        *slot = held;
        true
    }

    /// Build input from the set of currently held key names
    pub fn from_keys<'a>(keys: impl IntoIterator<Item = &'a str>, pointer: Vec2) -> Self {
        let mut input = Self {
            pointer,
            ..Default::default()
        };
        for key in keys {
            input.set_key(key, true);
        }
        input
    }

    /// Unit movement direction (zero when idle or cancelled out)
    pub fn direction(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.up {
            dir.y -= 1.0;
        }
        if self.down {
            dir.y += 1.0;
        }
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        dir.normalize_or_zero()
    }
}

/// Advance the game state by one frame and return everything that happened
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    if state.phase != GamePhase::Playing {
        return Vec::new();
    }
    let dt = dt.clamp(0.0, MAX_FRAME_SCALE);

    state.frame += 1;
    state.difficulty_ramp += state.config.difficulty_ramp_per_frame * dt;

    move_player(state, input, dt);
    decay_status_timers(state, dt);
    update_effects(state, dt);
    update_projectiles(state, dt);
    update_enemies(state, dt);

    resolve_enemy_contacts(state);
    let killed = resolve_bullet_hits(state);
    resolve_enemy_bullets(state);

    award_kills(state, killed);
    apply_level_ups(state);

    if state.player.is_dead() {
        state.phase = GamePhase::Defeated;
        let score = state.score;
        state.spawner.suspend();
        state.emit(GameEvent::Defeated { score });
        log::info!(
            "Defeated at level {} with score {} (frame {})",
            state.player.level,
            score,
            state.frame
        );
    }

    state.take_events()
}

fn move_player(state: &mut GameState, input: &TickInput, dt: f32) {
    let mut speed = PLAYER_SPEED;
    let dashing = input.dash
        && state.player.dash_ready()
        && state.config.dash.is_some()
        && input.direction() != Vec2::ZERO;
    if dashing {
        if let Some(dash) = &state.config.dash {
            speed *= dash.multiplier;
            state.player.dash_cooldown = dash.cooldown_frames;
        }
        let trail_from = state.player.pos;
        state.spawn_particles(trail_from, DASH_TRAIL_PARTICLES, 0x00ffff, 4.0);
        state.emit(GameEvent::DashUsed);
    }

    let viewport = state.config.viewport;
    let player = &mut state.player;
    player.pos += input.direction() * speed * dt;
    player.pos.x = player.pos.x.clamp(PLAYER_MARGIN, viewport.x - PLAYER_MARGIN);
    player.pos.y = player.pos.y.clamp(PLAYER_MARGIN, viewport.y - PLAYER_MARGIN);
    player.facing = heading(player.pos, input.pointer);
}

fn decay_status_timers(state: &mut GameState, dt: f32) {
    let player = &mut state.player;
    player.dash_cooldown = (player.dash_cooldown - dt).max(0.0);
    player.shield = (player.shield - dt).max(0.0);
    player.contact_grace = (player.contact_grace - dt).max(0.0);
}

/// Particles, damage text and pickups
fn update_effects(state: &mut GameState, dt: f32) {
    for particle in state.particles.iter_mut() {
        particle.pos += particle.vel * dt;
        particle.life -= PARTICLE_FADE * dt;
    }
    despawn_where(&mut state.particles, &mut state.events, |p| p.life <= 0.0);

    for text in state.damage_texts.iter_mut() {
        text.pos += text.vel * dt;
        text.life -= DAMAGE_TEXT_FADE * dt;
    }
    despawn_where(&mut state.damage_texts, &mut state.events, |t| t.life <= 0.0);

    let Some(drops) = state.config.drops.clone() else {
        return;
    };
    let player_pos = state.player.pos;
    let mut collected = Vec::new();
    for pickup in state.pickups.iter_mut() {
        pickup.ttl -= dt;
        if within(player_pos, pickup.pos, drops.pickup_radius) {
            collected.push(pickup.id);
        }
    }
    for pickup in state.pickups.iter().filter(|p| collected.contains(&p.id)) {
        match pickup.kind {
            PickupKind::Heal => state.player.heal(drops.heal_amount),
            PickupKind::Shield => state.player.shield = drops.shield_frames,
        }
        state.events.push(GameEvent::ItemCollected { kind: pickup.kind });
    }
    despawn_where(&mut state.pickups, &mut state.events, |p| {
        collected.contains(&p.id) || p.ttl <= 0.0
    });
}

fn update_projectiles(state: &mut GameState, dt: f32) {
    let viewport = state.config.viewport;
    for bullet in state.bullets.iter_mut().chain(state.enemy_bullets.iter_mut()) {
        bullet.pos += bullet.vel * dt;
    }
    despawn_where(&mut state.bullets, &mut state.events, |b| {
        out_of_bounds(b.pos, viewport, CULL_MARGIN)
    });
    despawn_where(&mut state.enemy_bullets, &mut state.events, |b| {
        out_of_bounds(b.pos, viewport, CULL_MARGIN)
    });
}

fn update_enemies(state: &mut GameState, dt: f32) {
    let target = state.player.pos;
    let frame = state.frame;
    let speed_bonus = state.config.speed_per_difficulty * state.difficulty();
    let can_fire = state.config.enemy_fire;

    // (origin, angle) of each enemy projectile, spawned after the loop
    let mut shots: Vec<(Vec2, f32)> = Vec::new();

    for enemy in state.enemies.iter_mut() {
        let params = state.config.archetypes.get(enemy.archetype);
        let to_player = heading(enemy.pos, target);
        let fleeing = params
            .flee_radius
            .is_some_and(|r| within(enemy.pos, target, r));
        let angle = if fleeing {
            to_player + std::f32::consts::PI
        } else {
            to_player
        };
        enemy.pos += polar_to_cartesian((enemy.speed + speed_bonus) * dt, angle);

        let Some(interval) = params.fire_interval else {
            continue;
        };
        if !can_fire || params.volley == 0 || frame.saturating_sub(enemy.last_fired) < interval {
            continue;
        }
        enemy.last_fired = frame;
        if params.volley == 1 {
            shots.push((enemy.pos, heading(enemy.pos, target)));
        } else {
            let step = std::f32::consts::TAU / params.volley as f32;
            for k in 0..params.volley {
                shots.push((enemy.pos, step * k as f32));
            }
        }
    }

    let speed = state.config.enemy_bullet_speed;
    let damage = state.config.enemy_bullet_damage;
    for (origin, angle) in shots {
        state.spawn_projectile(Owner::Enemy, origin, angle, speed, damage);
    }
}

/// Apply damage to the player unless shielded
fn hurt_player(state: &mut GameState, amount: f32) {
    if state.player.shielded() {
        state.emit(GameEvent::ShieldBlocked);
        return;
    }
    let dealt = state.player.take_damage(amount);
    let health = state.player.health;
    state.emit(GameEvent::PlayerHit {
        amount: dealt,
        health,
    });
}

fn resolve_enemy_contacts(state: &mut GameState) {
    let fixed = state.config.fixed_hit_distance;
    let grace = state.config.contact_grace_frames;
    let player_pos = state.player.pos;

    let touching: Vec<f32> = state
        .enemies
        .iter()
        .filter(|e| within(player_pos, e.pos, hit_distance(fixed, PLAYER_RADIUS, e.radius)))
        .map(|e| e.contact_damage)
        .collect();

    for damage in touching {
        if state.player.contact_grace > 0.0 {
            break;
        }
        let shielded = state.player.shielded();
        hurt_player(state, damage);
        // Grace starts from a hit that landed
        if !shielded {
            state.player.contact_grace = grace;
        }
    }
}

/// Bullets vs enemies. Returns the enemies that died, already removed.
fn resolve_bullet_hits(state: &mut GameState) -> Vec<Enemy> {
    let fixed = state.config.fixed_hit_distance;
    let show_text = state.config.damage_text;
    let mut dead_ids = Vec::new();

    // Newest enemy first, and it takes the newest bullet in range
    for idx in (0..state.enemies.len()).rev() {
        let (enemy_id, enemy_pos, enemy_radius) = {
            let e = &state.enemies[idx];
            (e.id, e.pos, e.radius)
        };
        let reach = hit_distance(fixed, BULLET_RADIUS, enemy_radius);
        // At most one bullet per enemy per frame
        let Some(b_idx) = newest_within(enemy_pos, reach, state.bullets.iter().map(|b| &b.pos))
        else {
            continue;
        };
        let bullet = state.bullets.remove(b_idx);
        state.emit(GameEvent::Despawned { id: bullet.id });

        let enemy = &mut state.enemies[idx];
        let was_alive = enemy.health > 0.0;
        enemy.health = (enemy.health - bullet.damage).max(0.0);
        let now_dead = enemy.health <= 0.0;

        state.emit(GameEvent::DamageDealt {
            enemy_id,
            amount: bullet.damage,
            pos: enemy_pos,
        });
        if show_text {
            state.spawn_damage_text(enemy_pos, bullet.damage);
        }
        if was_alive && now_dead {
            dead_ids.push(enemy_id);
        }
    }

    // Kills resolve in the order they happened
    let killed: Vec<Enemy> = dead_ids
        .iter()
        .filter_map(|id| {
            let idx = state.enemies.iter().position(|e| e.id == *id)?;
            Some(state.enemies.remove(idx))
        })
        .collect();
    for enemy in &killed {
        state.events.push(GameEvent::Despawned { id: enemy.id });
    }
    killed
}

fn resolve_enemy_bullets(state: &mut GameState) {
    let player_pos = state.player.pos;
    let hits: Vec<(u32, f32)> = state
        .enemy_bullets
        .iter()
        .filter(|b| circles_overlap(player_pos, PLAYER_RADIUS, b.pos, b.radius))
        .map(|b| (b.id, b.damage))
        .collect();
    if hits.is_empty() {
        return;
    }

    despawn_where(&mut state.enemy_bullets, &mut state.events, |b| {
        hits.iter().any(|(id, _)| *id == b.id)
    });
    for (_, damage) in hits {
        hurt_player(state, damage);
    }
}

/// Explosion, score, experience and drops for each dead enemy
fn award_kills(state: &mut GameState, killed: Vec<Enemy>) {
    for enemy in killed {
        state.spawn_particles(enemy.pos, EXPLOSION_PARTICLES, enemy.archetype.color(), 10.0);
        state.score += enemy.score;
        if state.config.leveling {
            state.player.experience += enemy.experience;
        }
        state.emit(GameEvent::EnemyKilled {
            id: enemy.id,
            archetype: enemy.archetype,
            pos: enemy.pos,
            score: enemy.score,
        });
        log::debug!("Killed {} #{}", enemy.archetype.as_str(), enemy.id);

        if enemy.archetype.is_boss() {
            state.boss_active = false;
            let delay = state.config.boss_resume_delay_ms;
            state.spawner.schedule(delay);
            state.emit(GameEvent::BossDefeated { id: enemy.id });
            log::info!("Boss #{} defeated, spawning resumes in {}ms", enemy.id, delay);
        }

        if let Some(drops) = state.config.drops.clone() {
            if state.rng.random_bool(drops.chance) {
                let kind = if state.rng.random_bool(drops.heal_share) {
                    PickupKind::Heal
                } else {
                    PickupKind::Shield
                };
                state.spawn_pickup(kind, enemy.pos, drops.lifetime_frames);
            }
        }
    }
}

fn apply_level_ups(state: &mut GameState) {
    if !state.config.leveling {
        return;
    }
    while state.player.experience_to_next > 0.0
        && state.player.experience >= state.player.experience_to_next
    {
        let player = &mut state.player;
        player.experience -= player.experience_to_next;
        player.level += 1;
        player.experience_to_next *= state.config.experience_growth;
        player.heal(state.config.level_up_heal);

        let level = player.level;
        state.emit(GameEvent::LevelUp { level });
        log::info!("Level up: {}", level);

        if state
            .config
            .boss_every
            .is_some_and(|n| n > 0 && level % n == 0)
        {
            state.boss_pending = true;
            state.emit(GameEvent::BossIncoming);
        }
    }
    let player = &mut state.player;
    player.experience = player.experience.clamp(0.0, player.experience_to_next);
}
