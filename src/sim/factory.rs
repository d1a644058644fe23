//! Builders for every entity the game places in the arena
//!
//! These produce the static configuration only (shape, collider, capabilities).
//! Per-spawn wiring such as shard supplies, score hooks and pursuit targets is
//! done by the spawner, because pooled instances lose it on reset.

use glam::Vec2;
use rand::Rng;

use super::entity::{
    Ammo, AsteroidSize, Breakable, Collider, Entity, EntityKind, Propulsion, Pursuit, ShardConfig, Supply,
};
use super::gun::{ChargeGun, Gun, Weapons};
use super::random;
use super::timers::Countdown;
use crate::consts::{CATEGORY_ALL, CATEGORY_HAZARD, CATEGORY_PROJECTILE, CATEGORY_SHIP};
use crate::tuning::{
    ArenaTuning, AsteroidTuning, AsteroidsTuning, BlastTuning, ProjectileTuning, ShipTuning, UfoTuning,
};

const DENSITY: f32 = 1.0;

/// Velocity and spin of the attract-mode ship
const DEMO_VELOCITY: Vec2 = Vec2::new(0.2, -0.2);
const DEMO_ROTATION: f32 = 0.75;

fn hazard_collider(diameter: f32) -> Collider {
    Collider::circle(diameter * 0.5, CATEGORY_HAZARD).with_mask(CATEGORY_SHIP | CATEGORY_PROJECTILE)
}

pub fn asteroid_tuning(tuning: &AsteroidsTuning, size: AsteroidSize) -> &AsteroidTuning {
    match size {
        AsteroidSize::Large => &tuning.large,
        AsteroidSize::Medium => &tuning.medium,
        AsteroidSize::Small => &tuning.small,
    }
}

/// An asteroid of the given class. Shards stay unwired until spawned.
pub fn new_asteroid(size: AsteroidSize, tuning: &AsteroidTuning) -> Entity {
    let mut asteroid = Entity::new(EntityKind::Asteroid(size), Vec2::splat(tuning.size))
        .with_collider(hazard_collider(tuning.size), DENSITY);
    asteroid.breakable = Some(Breakable {
        shards: ShardConfig {
            supply: None,
            min_count: tuning.min_shards,
            max_count: tuning.max_shards,
            min_angular_velocity: tuning.min_shard_angular_velocity,
            max_angular_velocity: tuning.max_shard_angular_velocity,
            min_angular_offset: tuning.min_shard_angular_offset,
            max_angular_offset: tuning.max_shard_angular_offset,
            acceleration: tuning.shard_acceleration,
            scatter: tuning.shard_scatter,
        },
        score_points: tuning.score_points,
        ..Default::default()
    });
    asteroid
}

/// Pursuing enemy craft; its target is set at spawn time
pub fn new_ufo(tuning: &UfoTuning) -> Entity {
    let mut ufo =
        Entity::new(EntityKind::EnemyCraft, Vec2::splat(tuning.size)).with_collider(hazard_collider(tuning.size), DENSITY);
    ufo.body.linear_damping = tuning.linear_damping;
    ufo.propulsion = Some(Propulsion {
        engage_impulse: tuning.engage_impulse,
        rotation_speed: 0.0,
    });
    ufo.pursuit = Some(Pursuit::default());
    ufo.breakable = Some(Breakable {
        score_points: tuning.score_points,
        ..Default::default()
    });
    ufo
}

/// Bullet or laser ray
pub fn new_projectile(tuning: &ProjectileTuning) -> Entity {
    let size = Vec2::new(tuning.width, tuning.height);
    let mut projectile = Entity::new(EntityKind::Projectile, size)
        .with_collider(Collider::rect(size, CATEGORY_PROJECTILE).with_mask(CATEGORY_HAZARD), DENSITY);
    projectile.ammo = Some(Ammo {
        speed: tuning.speed,
        self_destruct: tuning.self_destruct,
    });
    projectile
}

/// Short-lived explosion effect. No collider; size is set to the wreck's at spawn.
pub fn new_blast(tuning: &BlastTuning) -> Entity {
    let mut blast = Entity::new(EntityKind::Effect, Vec2::splat(0.1));
    blast.lifetime = Some(Countdown::new(tuning.lifetime));
    blast
}

/// The player's ship, armed with a machine gun and a charge laser
pub fn new_starship(tuning: &ShipTuning) -> Entity {
    let mut ship = Entity::new(EntityKind::Ship, Vec2::splat(tuning.size))
        .with_collider(Collider::circle(tuning.size * 0.5, CATEGORY_SHIP).with_mask(CATEGORY_ALL), DENSITY);
    ship.body.linear_damping = tuning.linear_damping;
    ship.body.angular_damping = tuning.angular_damping;
    ship.propulsion = Some(Propulsion {
        engage_impulse: tuning.engage_impulse,
        rotation_speed: tuning.rotation_speed,
    });
    ship.weapons = Some(Weapons {
        machine_gun: Gun::new(Some(Supply::Bullet), tuning.bullet_cooldown),
        laser: ChargeGun::new(
            Gun::new(Some(Supply::LaserRay), tuning.laser_cooldown),
            tuning.laser_max_charge,
            tuning.laser_charging_interval,
        ),
    });
    ship.breakable = Some(Breakable {
        blast: tuning.blast_on_break.then_some(Supply::Blast),
        ..Default::default()
    });
    ship
}

/// Attract-mode ship: drifts in from an edge and never touches anything
pub fn new_demo_starship(rng: &mut impl Rng, arena: &ArenaTuning, tuning: &ShipTuning) -> Entity {
    let size = Vec2::splat(tuning.size);
    let mut ship = Entity::new(EntityKind::Ship, size);
    ship.body.position = random::next_position_outside(rng, arena.size(), size);
    ship.body.linear_velocity = DEMO_VELOCITY;
    ship.body.rotation = DEMO_ROTATION;
    ship
}
