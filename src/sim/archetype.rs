//! Enemy archetypes and their parameter table

use serde::{Deserialize, Serialize};

/// Behavioral class of an enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyArchetype {
    /// Basic homing chaser
    Hunter,
    /// Slow, heavy, hits hard
    Tank,
    /// Keeps its distance and shoots aimed projectiles
    Sniper,
    /// One-off encounter that fires projectile rings
    Boss,
}

impl EnemyArchetype {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnemyArchetype::Hunter => "hunter",
            EnemyArchetype::Tank => "tank",
            EnemyArchetype::Sniper => "sniper",
            EnemyArchetype::Boss => "boss",
        }
    }

    pub fn is_boss(&self) -> bool {
        *self == EnemyArchetype::Boss
    }

    /// Particle color tag used for explosions
    pub fn color(&self) -> u32 {
        match self {
            EnemyArchetype::Hunter => 0xff0055,
            EnemyArchetype::Tank => 0xff8800,
            EnemyArchetype::Sniper => 0xaa44ff,
            EnemyArchetype::Boss => 0xffee00,
        }
    }
}

/// Per-archetype stats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeParams {
    pub max_health: f32,
    /// Base speed in pixels per reference frame
    pub speed: f32,
    pub radius: f32,
    /// Damage dealt to the player on contact
    pub contact_damage: f32,
    pub experience: f32,
    pub score: u64,
    /// Frames between volleys (None = never fires)
    pub fire_interval: Option<u64>,
    /// Projectiles per volley: 1 is an aimed shot, more is an evenly spaced ring
    pub volley: u32,
    /// Inside this distance the enemy runs from the player instead
    pub flee_radius: Option<f32>,
}

/// Stats for every archetype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeTable {
    pub hunter: ArchetypeParams,
    pub tank: ArchetypeParams,
    pub sniper: ArchetypeParams,
    pub boss: ArchetypeParams,
}

impl ArchetypeTable {
    pub fn get(&self, archetype: EnemyArchetype) -> &ArchetypeParams {
        match archetype {
            EnemyArchetype::Hunter => &self.hunter,
            EnemyArchetype::Tank => &self.tank,
            EnemyArchetype::Sniper => &self.sniper,
            EnemyArchetype::Boss => &self.boss,
        }
    }
}

impl Default for ArchetypeTable {
    fn default() -> Self {
        Self {
            hunter: ArchetypeParams {
                max_health: 20.0,
                speed: 2.5,
                radius: 15.0,
                contact_damage: 10.0,
                experience: 10.0,
                score: 100,
                fire_interval: None,
                volley: 0,
                flee_radius: None,
            },
            tank: ArchetypeParams {
                max_health: 60.0,
                speed: 1.2,
                radius: 25.0,
                contact_damage: 20.0,
                experience: 25.0,
                score: 250,
                fire_interval: None,
                volley: 0,
                flee_radius: None,
            },
            sniper: ArchetypeParams {
                max_health: 15.0,
                speed: 1.8,
                radius: 12.0,
                contact_damage: 5.0,
                experience: 20.0,
                score: 200,
                fire_interval: Some(90),
                volley: 1,
                flee_radius: Some(250.0),
            },
            boss: ArchetypeParams {
                max_health: 500.0,
                speed: 0.8,
                radius: 60.0,
                contact_damage: 30.0,
                experience: 200.0,
                score: 5000,
                fire_interval: Some(60),
                volley: 12,
                flee_radius: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lookup_matches_archetype() {
        let table = ArchetypeTable::default();
        assert_eq!(table.get(EnemyArchetype::Tank).contact_damage, 20.0);
        assert!(table.get(EnemyArchetype::Boss).volley > 1);
        assert!(table.get(EnemyArchetype::Sniper).flee_radius.is_some());
        assert!(table.get(EnemyArchetype::Hunter).fire_interval.is_none());
    }

    #[test]
    fn test_only_boss_is_boss() {
        assert!(EnemyArchetype::Boss.is_boss());
        assert!(!EnemyArchetype::Tank.is_boss());
    }
}
