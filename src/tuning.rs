//! Data-driven game balance
//!
//! Every number that shapes a round lives here so it can be loaded from JSON.
//! Defaults reproduce the classic feel: a 1.66 x 1.0 arena, two large
//! asteroids per round, a new one every ten seconds.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Arena dimensions (world units)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaTuning {
    pub width: f32,
    pub height: f32,
}

impl Default for ArenaTuning {
    fn default() -> Self {
        Self {
            width: 1.66,
            height: 1.0,
        }
    }
}

impl ArenaTuning {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.size() * 0.5
    }
}

/// Round pacing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundTuning {
    /// Large asteroids spawned when a round (or the demo) starts
    pub initial_asteroids: u32,
    /// Seconds between large asteroid spawns
    pub asteroid_spawn_interval: f32,
    /// Seconds between UFO spawns
    pub ufo_spawn_interval: f32,
}

impl Default for RoundTuning {
    fn default() -> Self {
        Self {
            initial_asteroids: 2,
            asteroid_spawn_interval: 10.0,
            ufo_spawn_interval: 10.0,
        }
    }
}

/// Player ship handling and weapons
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipTuning {
    pub size: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub engage_impulse: f32,
    /// Radians per second
    pub rotation_speed: f32,
    pub bullet_cooldown: f32,
    pub laser_cooldown: f32,
    pub laser_max_charge: u32,
    /// Seconds to regain one laser charge
    pub laser_charging_interval: f32,
    /// Leave a blast behind when destroyed
    pub blast_on_break: bool,
}

impl Default for ShipTuning {
    fn default() -> Self {
        Self {
            size: 0.1,
            linear_damping: 5.0,
            angular_damping: 10.0,
            engage_impulse: 0.001,
            rotation_speed: 5.0,
            bullet_cooldown: 0.2,
            laser_cooldown: 0.2,
            laser_max_charge: 3,
            laser_charging_interval: 3.0,
            blast_on_break: true,
        }
    }
}

/// One asteroid size class and how it shatters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AsteroidTuning {
    pub size: f32,
    pub score_points: u32,
    pub min_shards: u32,
    pub max_shards: u32,
    pub min_shard_angular_velocity: f32,
    pub max_shard_angular_velocity: f32,
    pub min_shard_angular_offset: f32,
    pub max_shard_angular_offset: f32,
    pub shard_acceleration: f32,
    /// Shard jitter radius as a fraction of this asteroid's width (0 = no jitter)
    pub shard_scatter: f32,
}

impl AsteroidTuning {
    fn with_size(size: f32, score_points: u32) -> Self {
        Self {
            size,
            score_points,
            min_shards: 2,
            max_shards: 4,
            min_shard_angular_velocity: -0.5,
            max_shard_angular_velocity: 0.5,
            min_shard_angular_offset: -0.75,
            max_shard_angular_offset: 0.75,
            shard_acceleration: 1.25,
            shard_scatter: 0.5,
        }
    }
}

impl Default for AsteroidTuning {
    fn default() -> Self {
        Self::with_size(0.1, 20)
    }
}

/// The three asteroid classes plus how large ones enter the arena
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AsteroidsTuning {
    pub large: AsteroidTuning,
    pub medium: AsteroidTuning,
    pub small: AsteroidTuning,
    pub min_spawn_speed: f32,
    pub max_spawn_speed: f32,
    pub max_spawn_spin: f32,
}

impl Default for AsteroidsTuning {
    fn default() -> Self {
        Self {
            large: AsteroidTuning::with_size(0.1, 20),
            medium: AsteroidTuning::with_size(0.05, 50),
            small: AsteroidTuning::with_size(0.025, 100),
            min_spawn_speed: 0.1,
            max_spawn_speed: 0.2,
            max_spawn_spin: 0.7,
        }
    }
}

/// Pursuing enemy craft
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UfoTuning {
    pub size: f32,
    pub score_points: u32,
    /// Impulse applied toward the target every update
    pub engage_impulse: f32,
    pub linear_damping: f32,
}

impl Default for UfoTuning {
    fn default() -> Self {
        Self {
            size: 0.08,
            score_points: 200,
            engage_impulse: 0.00002,
            linear_damping: 2.0,
        }
    }
}

/// A projectile type
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    /// Removed on first collision (bullets) or keeps going (laser rays)
    pub self_destruct: bool,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            width: 0.01,
            height: 0.01,
            speed: 1.0,
            self_destruct: true,
        }
    }
}

/// Blast effect left behind by destroyed spacecraft
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlastTuning {
    /// Seconds before the blast removes itself
    pub lifetime: f32,
}

impl Default for BlastTuning {
    fn default() -> Self {
        Self { lifetime: 0.5 }
    }
}

/// Optional caps on outstanding pooled instances
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolTuning {
    pub max_asteroids: Option<usize>,
    pub max_ufos: Option<usize>,
    pub max_projectiles: Option<usize>,
    pub max_blasts: Option<usize>,
}

/// Complete balance sheet for a session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub arena: ArenaTuning,
    pub round: RoundTuning,
    pub ship: ShipTuning,
    pub asteroids: AsteroidsTuning,
    pub ufo: UfoTuning,
    pub bullet: ProjectileTuning,
    pub laser: ProjectileTuning,
    pub blast: BlastTuning,
    pub pools: PoolTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena: ArenaTuning::default(),
            round: RoundTuning::default(),
            ship: ShipTuning::default(),
            asteroids: AsteroidsTuning::default(),
            ufo: UfoTuning::default(),
            bullet: ProjectileTuning::default(),
            // Long, fast, piercing beam
            laser: ProjectileTuning {
                width: 0.01,
                height: 0.05,
                speed: 2.0,
                self_destruct: false,
            },
            blast: BlastTuning::default(),
            pools: PoolTuning::default(),
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Self =
            serde_json::from_str(json).map_err(|e| SimError::InvalidTuning(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation can't work with
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("arena.width", self.arena.width),
            ("arena.height", self.arena.height),
            ("round.asteroid_spawn_interval", self.round.asteroid_spawn_interval),
            ("round.ufo_spawn_interval", self.round.ufo_spawn_interval),
            ("ship.size", self.ship.size),
            ("ship.laser_charging_interval", self.ship.laser_charging_interval),
            ("asteroids.large.size", self.asteroids.large.size),
            ("asteroids.medium.size", self.asteroids.medium.size),
            ("asteroids.small.size", self.asteroids.small.size),
            ("ufo.size", self.ufo.size),
            ("bullet.width", self.bullet.width),
            ("bullet.height", self.bullet.height),
            ("laser.width", self.laser.width),
            ("laser.height", self.laser.height),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                log::warn!("Rejecting tuning: {} = {}", name, value);
                return Err(SimError::InvalidTuning(format!("{name} must be positive")));
            }
        }

        let non_negative = [
            ("ship.bullet_cooldown", self.ship.bullet_cooldown),
            ("ship.laser_cooldown", self.ship.laser_cooldown),
            ("blast.lifetime", self.blast.lifetime),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0) {
                log::warn!("Rejecting tuning: {} = {}", name, value);
                return Err(SimError::InvalidTuning(format!(
                    "{name} must not be negative"
                )));
            }
        }

        if self.asteroids.min_spawn_speed > self.asteroids.max_spawn_speed {
            return Err(SimError::InvalidTuning(
                "asteroids.min_spawn_speed exceeds max_spawn_speed".into(),
            ));
        }

        for (name, class) in [
            ("large", &self.asteroids.large),
            ("medium", &self.asteroids.medium),
            ("small", &self.asteroids.small),
        ] {
            if class.min_shards > class.max_shards
                || class.min_shard_angular_velocity > class.max_shard_angular_velocity
                || class.min_shard_angular_offset > class.max_shard_angular_offset
            {
                log::warn!("Rejecting tuning: asteroids.{} has an inverted range", name);
                return Err(SimError::InvalidTuning(format!(
                    "asteroids.{name} has a min greater than its max"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert!(!tuning.laser.self_destruct);
        assert!(tuning.bullet.self_destruct);
        assert_eq!(tuning.round.initial_asteroids, 2);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = Tuning::from_json(r#"{ "round": { "initial_asteroids": 5 } }"#).unwrap();
        assert_eq!(tuning.round.initial_asteroids, 5);
        assert_eq!(tuning.round.asteroid_spawn_interval, 10.0);
        assert_eq!(tuning.asteroids.medium.score_points, 50);
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SimError::InvalidTuning(_)));
    }

    #[test]
    fn test_inverted_shard_range_rejected() {
        let json = r#"{ "asteroids": { "large": { "min_shards": 5, "max_shards": 1 } } }"#;
        let err = Tuning::from_json(json).unwrap_err();
        assert!(err.to_string().contains("asteroids.large"));
    }

    #[test]
    fn test_zero_arena_rejected() {
        let mut tuning = Tuning::default();
        tuning.arena.width = 0.0;
        assert!(tuning.validate().is_err());
    }
}
