//! Simulation configuration and variant presets
//!
//! Every historical iteration of the game is a preset of the same core.
//! Presets can be tweaked and saved as JSON.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use crate::error::{Error, Result};
use crate::sim::archetype::{ArchetypeTable, EnemyArchetype};

/// Game variant presets, oldest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Variant {
    /// Hunters only, fixed hit distance, per-frame contact drain
    Classic,
    /// Experience, levels, spread fire, tanks
    Leveling,
    /// Snipers, enemy projectiles, damage text
    Ranged,
    /// Bosses, item drops, dash and shield
    #[default]
    Final,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Classic => "Classic",
            Variant::Leveling => "Leveling",
            Variant::Ranged => "Ranged",
            Variant::Final => "Final",
        }
    }

}

impl std::str::FromStr for Variant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "classic" | "v1" => Ok(Variant::Classic),
            "leveling" | "v2" => Ok(Variant::Leveling),
            "ranged" | "v3" => Ok(Variant::Ranged),
            "final" | "v4" => Ok(Variant::Final),
            _ => Err(Error::InvalidConfig(format!("unknown variant '{}'", s))),
        }
    }
}

/// Weighted entry in the regular spawn mix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnWeight {
    pub archetype: EnemyArchetype,
    pub weight: u32,
    /// Player level required before this archetype appears
    pub min_level: u32,
}

/// Dash ability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashConfig {
    /// Speed multiplier for the dash frame
    pub multiplier: f32,
    pub cooldown_frames: f32,
}

/// Item drops from killed enemies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropConfig {
    /// Probability that a kill drops anything
    pub chance: f64,
    /// Share of drops that are heals (the rest are shields)
    pub heal_share: f64,
    pub heal_amount: f32,
    pub shield_frames: f32,
    pub lifetime_frames: f32,
    /// Collection distance, independent of the pickup's drawn size
    pub pickup_radius: f32,
}

/// Complete simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    pub variant: Variant,
    pub viewport: Vec2,

    // === Combat ===
    /// Hit distance used instead of radii (None = sum of radii)
    pub fixed_hit_distance: Option<f32>,
    /// Frames of contact immunity after an enemy touches the player
    pub contact_grace_frames: f32,
    pub bullet_damage: f32,
    pub bullet_damage_per_level: f32,
    pub fire_cooldown_frames: u64,
    pub fire_cooldown_step: u64,
    pub fire_cooldown_min: u64,
    /// Each level listed here adds one extra pair of fanned bullets
    pub spread_levels: Vec<u32>,
    pub spread_angle: f32,
    pub enemy_fire: bool,
    pub enemy_bullet_speed: f32,
    pub enemy_bullet_damage: f32,
    pub damage_text: bool,

    // === Leveling ===
    pub leveling: bool,
    pub experience_to_first_level: f32,
    pub experience_growth: f32,
    pub level_up_heal: f32,
    /// Arm a boss every N levels
    pub boss_every: Option<u32>,

    // === Abilities and drops ===
    pub dash: Option<DashConfig>,
    pub drops: Option<DropConfig>,

    // === Difficulty and spawning ===
    pub difficulty_ramp_per_frame: f32,
    pub speed_per_difficulty: f32,
    pub spawn_base_ms: f32,
    pub spawn_step_ms: f32,
    pub spawn_floor_ms: f32,
    pub boss_resume_delay_ms: f32,
    pub enemy_mix: Vec<SpawnWeight>,
    pub archetypes: ArchetypeTable,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::preset(Variant::Final)
    }
}

impl SimConfig {
    /// Build the configuration for a variant
    pub fn preset(variant: Variant) -> Self {
        let mut config = Self {
            variant,
            viewport: Vec2::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT),

            fixed_hit_distance: None,
            contact_grace_frames: 30.0,
            bullet_damage: 10.0,
            bullet_damage_per_level: 2.0,
            fire_cooldown_frames: 12,
            fire_cooldown_step: 1,
            fire_cooldown_min: 4,
            spread_levels: vec![3, 6],
            spread_angle: 0.15,
            enemy_fire: false,
            enemy_bullet_speed: 6.0,
            enemy_bullet_damage: 10.0,
            damage_text: false,

            leveling: true,
            experience_to_first_level: 100.0,
            experience_growth: 1.5,
            level_up_heal: 20.0,
            boss_every: None,

            dash: None,
            drops: None,

            difficulty_ramp_per_frame: 0.0,
            speed_per_difficulty: 0.1,
            spawn_base_ms: 1000.0,
            spawn_step_ms: 50.0,
            spawn_floor_ms: 200.0,
            boss_resume_delay_ms: 2000.0,
            enemy_mix: vec![
                SpawnWeight {
                    archetype: EnemyArchetype::Hunter,
                    weight: 4,
                    min_level: 1,
                },
                SpawnWeight {
                    archetype: EnemyArchetype::Tank,
                    weight: 1,
                    min_level: 2,
                },
            ],
            archetypes: ArchetypeTable::default(),
        };

        match variant {
            Variant::Classic => {
                config.fixed_hit_distance = Some(25.0);
                config.contact_grace_frames = 0.0;
                config.bullet_damage_per_level = 0.0;
                config.fire_cooldown_frames = 0;
                config.fire_cooldown_step = 0;
                config.fire_cooldown_min = 0;
                config.spread_levels.clear();
                config.leveling = false;
                config.difficulty_ramp_per_frame = 0.001;
                config.speed_per_difficulty = 0.2;
                config.enemy_mix.truncate(1);
                config.enemy_mix[0].weight = 1;
                // Any bullet kills, contact drains one point per frame
                let hunter = &mut config.archetypes.hunter;
                hunter.speed = 2.0;
                hunter.max_health = 1.0;
                hunter.contact_damage = 1.0;
                hunter.experience = 0.0;
            }
            Variant::Leveling => {}
            Variant::Ranged | Variant::Final => {
                config.enemy_fire = true;
                config.damage_text = true;
                config.enemy_mix.push(SpawnWeight {
                    archetype: EnemyArchetype::Sniper,
                    weight: 2,
                    min_level: 3,
                });
            }
        }

        if variant == Variant::Final {
            config.boss_every = Some(5);
            config.dash = Some(DashConfig {
                multiplier: 6.0,
                cooldown_frames: 120.0,
            });
            config.drops = Some(DropConfig {
                chance: 0.2,
                heal_share: 0.6,
                heal_amount: 30.0,
                shield_frames: 300.0,
                lifetime_frames: 600.0,
                pickup_radius: 30.0,
            });
        }

        config
    }

    /// Reject configurations the simulation cannot run
    pub fn validate(&self) -> Result<()> {
        if self.viewport.x <= 0.0 || self.viewport.y <= 0.0 {
            return Err(Error::InvalidConfig("viewport must be positive".into()));
        }
        if self.leveling && self.experience_growth <= 1.0 {
            return Err(Error::InvalidConfig(
                "experience_growth must be greater than 1".into(),
            ));
        }
        if self.leveling && self.experience_to_first_level <= 0.0 {
            return Err(Error::InvalidConfig(
                "experience_to_first_level must be positive".into(),
            ));
        }
        if self.spawn_floor_ms <= 0.0 || self.spawn_base_ms < self.spawn_floor_ms {
            return Err(Error::InvalidConfig(
                "spawn delays must satisfy 0 < floor <= base".into(),
            ));
        }
        if self.boss_every == Some(0) {
            return Err(Error::InvalidConfig("boss_every must be at least 1".into()));
        }
        if self
            .enemy_mix
            .iter()
            .any(|w| w.archetype == EnemyArchetype::Boss)
        {
            return Err(Error::InvalidConfig(
                "bosses cannot be part of the regular spawn mix".into(),
            ));
        }
        if !self.enemy_mix.iter().any(|w| w.weight > 0 && w.min_level <= 1) {
            return Err(Error::InvalidConfig(
                "enemy_mix needs a weighted archetype available at level 1".into(),
            ));
        }
        if let Some(drops) = &self.drops {
            if !(0.0..=1.0).contains(&drops.chance) || !(0.0..=1.0).contains(&drops.heal_share) {
                return Err(Error::InvalidConfig(
                    "drop probabilities must be within [0, 1]".into(),
                ));
            }
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a JSON configuration file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!(
            "Loaded {} config from {}",
            config.variant.as_str(),
            path.display()
        );
        Ok(config)
    }

    /// Damage of a player bullet at the given level
    pub fn bullet_damage_at(&self, level: u32) -> f32 {
        self.bullet_damage + self.bullet_damage_per_level * level.saturating_sub(1) as f32
    }

    /// Frames between player shots at the given level
    pub fn fire_cooldown_at(&self, level: u32) -> u64 {
        self.fire_cooldown_frames
            .saturating_sub(self.fire_cooldown_step * level as u64)
            .max(self.fire_cooldown_min)
    }

    /// Extra bullet pairs fanned around the aimed shot
    pub fn spread_pairs_at(&self, level: u32) -> usize {
        self.spread_levels.iter().filter(|&&l| level >= l).count()
    }

    /// Delay before the spawner's next regular spawn
    pub fn spawn_delay_ms(&self, difficulty: f32) -> f32 {
        (self.spawn_base_ms - difficulty * self.spawn_step_ms).max(self.spawn_floor_ms)
    }
}
