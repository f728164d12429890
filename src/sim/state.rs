//! Game state and core simulation types
//!
//! Everything a run needs lives in [`GameState`], so a state plus an input
//! sequence replays identically.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::archetype::EnemyArchetype;
use super::spawner::Spawner;
use crate::config::SimConfig;
use crate::consts::*;
use crate::polar_to_cartesian;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, nothing simulates
    Menu,
    /// Active gameplay
    Playing,
    /// Player health hit zero; terminal until a new run is created
    Defeated,
}

/// Who fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy,
}

/// Pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    Heal,
    Shield,
}

/// What an entity handle refers to, so the renderer can pick a visual
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Projectile(Owner),
    Enemy(EnemyArchetype),
    Particle,
    Pickup(PickupKind),
    DamageText,
}

/// Events emitted by the simulation for the HUD and renderer
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A new entity exists; the renderer should create its visual
    Spawned { id: u32, kind: EntityKind },
    /// The entity is gone; the renderer should drop its visual
    Despawned { id: u32 },
    /// A player bullet hit an enemy
    DamageDealt { enemy_id: u32, amount: f32, pos: Vec2 },
    EnemyKilled {
        id: u32,
        archetype: EnemyArchetype,
        pos: Vec2,
        score: u64,
    },
    PlayerHit { amount: f32, health: f32 },
    /// The shield absorbed a hit
    ShieldBlocked,
    LevelUp { level: u32 },
    BossIncoming,
    BossSpawned { id: u32 },
    BossDefeated { id: u32 },
    ItemCollected { kind: PickupKind },
    DashUsed,
    /// Run over; carries the final score
    Defeated { score: u64 },
}

/// A bullet, fired by either side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub owner: Owner,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: f32,
}

/// A hostile entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub archetype: EnemyArchetype,
    pub pos: Vec2,
    pub speed: f32,
    pub health: f32,
    pub max_health: f32,
    pub radius: f32,
    pub contact_damage: f32,
    pub experience: f32,
    pub score: u64,
    /// Frame of the last volley
    pub last_fired: u64,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: u32,
    pub life: f32, // 0-1, doubles as opacity
    pub size: f32,
}

/// A collectible dropped by a dead enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub kind: PickupKind,
    pub pos: Vec2,
    pub ttl: f32,
}

/// Floating damage number
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamageText {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32,
    pub amount: f32,
}

/// The player avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Radians, pointing at the cursor
    pub facing: f32,
    pub health: f32,
    pub max_health: f32,
    pub level: u32,
    pub experience: f32,
    pub experience_to_next: f32,
    /// Frames until dash is ready again
    pub dash_cooldown: f32,
    /// Frames of shield remaining
    pub shield: f32,
    /// Frames of contact immunity remaining
    pub contact_grace: f32,
    /// Frame of the last shot (None = never fired)
    pub last_fired: Option<u64>,
}

impl Player {
    pub fn new(pos: Vec2, experience_to_next: f32) -> Self {
        Self {
            pos,
            facing: 0.0,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            level: 1,
            experience: 0.0,
            experience_to_next,
            dash_cooldown: 0.0,
            shield: 0.0,
            contact_grace: 0.0,
            last_fired: None,
        }
    }

    pub fn shielded(&self) -> bool {
        self.shield > 0.0
    }

    pub fn dash_ready(&self) -> bool {
        self.dash_cooldown <= 0.0
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Remove health, clamped at zero. Returns the amount actually removed.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let before = self.health;
        self.health = (self.health - amount.max(0.0)).clamp(0.0, self.max_health);
        before - self.health
    }

    /// Restore health, capped at max
    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount.max(0.0)).clamp(0.0, self.max_health);
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_health > 0.0 {
            self.health / self.max_health
        } else {
            0.0
        }
    }

    pub fn experience_fraction(&self) -> f32 {
        if self.experience_to_next > 0.0 {
            (self.experience / self.experience_to_next).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Anything with an entity handle
pub trait Entity {
    fn id(&self) -> u32;
}

macro_rules! impl_entity {
    ($($ty:ty),*) => {
        $(impl Entity for $ty {
            fn id(&self) -> u32 {
                self.id
            }
        })*
    };
}

impl_entity!(Projectile, Enemy, Particle, Pickup, DamageText);

/// Remove every item matching `dead`, emitting one `Despawned` per removal
pub(crate) fn despawn_where<T: Entity>(
    items: &mut Vec<T>,
    events: &mut Vec<GameEvent>,
    mut dead: impl FnMut(&T) -> bool,
) {
    items.retain(|item| {
        if dead(item) {
            events.push(GameEvent::Despawned { id: item.id() });
            false
        } else {
            true
        }
    });
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub config: SimConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Simulation frame counter
    pub frame: u64,
    pub score: u64,
    /// Time-based difficulty on top of the player level
    pub difficulty_ramp: f32,
    pub player: Player,
    /// Player bullets (sorted by id)
    pub bullets: Vec<Projectile>,
    /// Enemy bullets (sorted by id)
    pub enemy_bullets: Vec<Projectile>,
    /// Live enemies (sorted by id)
    pub enemies: Vec<Enemy>,
    pub particles: Vec<Particle>,
    pub pickups: Vec<Pickup>,
    pub damage_texts: Vec<DamageText>,
    /// A boss is alive; regular spawning is suspended
    pub boss_active: bool,
    /// The next spawner tick produces a boss
    pub boss_pending: bool,
    pub spawner: Spawner,
    /// Events produced since the last drain
    #[serde(skip)]
    pub(crate) events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new run in the menu phase
    pub fn new(config: SimConfig, seed: u64) -> Self {
        let player = Player::new(config.viewport / 2.0, config.experience_to_first_level);
        Self {
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Menu,
            frame: 0,
            score: 0,
            difficulty_ramp: 0.0,
            player,
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            enemies: Vec::new(),
            particles: Vec::new(),
            pickups: Vec::new(),
            damage_texts: Vec::new(),
            boss_active: false,
            boss_pending: false,
            spawner: Spawner::default(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Leave the menu and arm the spawner. Returns false outside the menu.
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::Menu {
            return false;
        }
        self.phase = GamePhase::Playing;
        self.spawner.schedule(0.0);
        log::info!(
            "Run started ({} variant, seed {})",
            self.config.variant.as_str(),
            self.seed
        );
        true
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Level plus the time ramp
    pub fn difficulty(&self) -> f32 {
        self.player.level as f32 + self.difficulty_ramp
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drain pending events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn register(&mut self, kind: EntityKind) -> u32 {
        let id = self.next_entity_id();
        self.emit(GameEvent::Spawned { id, kind });
        id
    }

    /// Fire a projectile from `pos` along `angle`
    pub fn spawn_projectile(&mut self, owner: Owner, pos: Vec2, angle: f32, speed: f32, damage: f32) -> u32 {
        let id = self.register(EntityKind::Projectile(owner));
        let radius = match owner {
            Owner::Player => BULLET_RADIUS,
            Owner::Enemy => ENEMY_BULLET_RADIUS,
        };
        let projectile = Projectile {
            id,
            owner,
            pos,
            vel: polar_to_cartesian(speed, angle),
            radius,
            damage,
        };
        match owner {
            Owner::Player => self.bullets.push(projectile),
            Owner::Enemy => self.enemy_bullets.push(projectile),
        }
        id
    }

    /// Create an enemy with its archetype's stats
    pub fn spawn_enemy(&mut self, archetype: EnemyArchetype, pos: Vec2) -> u32 {
        let id = self.register(EntityKind::Enemy(archetype));
        let params = self.config.archetypes.get(archetype);
        let enemy = Enemy {
            id,
            archetype,
            pos,
            speed: params.speed,
            health: params.max_health,
            max_health: params.max_health,
            radius: params.radius,
            contact_damage: params.contact_damage,
            experience: params.experience,
            score: params.score,
            last_fired: self.frame,
        };
        self.enemies.push(enemy);
        log::debug!("Spawned {} #{} at ({:.0}, {:.0})", archetype.as_str(), id, pos.x, pos.y);
        id
    }

    /// Burst of particles flying out from `pos`
    pub fn spawn_particles(&mut self, pos: Vec2, count: usize, color: u32, spread: f32) {
        for _ in 0..count {
            if self.particles.len() >= MAX_PARTICLES {
                let oldest = self.particles.remove(0);
                self.emit(GameEvent::Despawned { id: oldest.id });
            }
            let vel = Vec2::new(
                (self.rng.random::<f32>() - 0.5) * spread,
                (self.rng.random::<f32>() - 0.5) * spread,
            );
            let size = self.rng.random::<f32>() * 3.0;
            let id = self.register(EntityKind::Particle);
            self.particles.push(Particle {
                id,
                pos,
                vel,
                color,
                life: 1.0,
                size,
            });
        }
    }

    pub fn spawn_pickup(&mut self, kind: PickupKind, pos: Vec2, ttl: f32) -> u32 {
        let id = self.register(EntityKind::Pickup(kind));
        self.pickups.push(Pickup { id, kind, pos, ttl });
        id
    }

    pub fn spawn_damage_text(&mut self, pos: Vec2, amount: f32) -> u32 {
        let id = self.register(EntityKind::DamageText);
        self.damage_texts.push(DamageText {
            id,
            pos,
            vel: Vec2::new(0.0, -DAMAGE_TEXT_RISE),
            life: 1.0,
            amount,
        });
        id
    }

    /// Number of live entities (excluding the player)
    pub fn entity_count(&self) -> usize {
        self.bullets.len()
            + self.enemy_bullets.len()
            + self.enemies.len()
            + self.particles.len()
            + self.pickups.len()
            + self.damage_texts.len()
    }
}
