//! Spawning: one pool per supply, plus the wiring each spawn needs
//!
//! The spawner is also the arena's contact listener, because breaking things
//! is mostly about spawning shards and blasts.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::arena::{Arena, ContactListener};
use super::entity::{AsteroidSize, Entity, EntityId, EntityKind, Supply};
use super::factory;
use super::pool::{Pool, Poolable};
use super::random;
use super::reaction;
use super::state::BrokenHook;
use crate::tuning::Tuning;

/// A breakable entity was destroyed during the last step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakage {
    pub id: EntityId,
    pub kind: EntityKind,
    pub points: u32,
    pub hook: Option<BrokenHook>,
}

/// Pools for every supply
#[derive(Debug)]
pub struct Pools {
    large_asteroids: Pool<Entity>,
    medium_asteroids: Pool<Entity>,
    small_asteroids: Pool<Entity>,
    ufos: Pool<Entity>,
    blasts: Pool<Entity>,
    bullets: Pool<Entity>,
    laser_rays: Pool<Entity>,
}

impl Pools {
    pub fn new(tuning: &Tuning) -> Self {
        let caps = &tuning.pools;
        let asteroid_pool = |supply: Supply, size: AsteroidSize| {
            let t = factory::asteroid_tuning(&tuning.asteroids, size).clone();
            Pool::new(supply, move || factory::new_asteroid(size, &t)).with_maximum(caps.max_asteroids)
        };
        let ufo = tuning.ufo.clone();
        let blast = tuning.blast.clone();
        let bullet = tuning.bullet.clone();
        let laser = tuning.laser.clone();

        Self {
            large_asteroids: asteroid_pool(Supply::LargeAsteroid, AsteroidSize::Large),
            medium_asteroids: asteroid_pool(Supply::MediumAsteroid, AsteroidSize::Medium),
            small_asteroids: asteroid_pool(Supply::SmallAsteroid, AsteroidSize::Small),
            ufos: Pool::new(Supply::Ufo, move || factory::new_ufo(&ufo)).with_maximum(caps.max_ufos),
            blasts: Pool::new(Supply::Blast, move || factory::new_blast(&blast)).with_maximum(caps.max_blasts),
            bullets: Pool::new(Supply::Bullet, move || factory::new_projectile(&bullet))
                .with_maximum(caps.max_projectiles),
            laser_rays: Pool::new(Supply::LaserRay, move || factory::new_projectile(&laser))
                .with_maximum(caps.max_projectiles),
        }
    }

    pub fn get(&self, supply: Supply) -> &Pool<Entity> {
        match supply {
            Supply::LargeAsteroid => &self.large_asteroids,
            Supply::MediumAsteroid => &self.medium_asteroids,
            Supply::SmallAsteroid => &self.small_asteroids,
            Supply::Ufo => &self.ufos,
            Supply::Blast => &self.blasts,
            Supply::Bullet => &self.bullets,
            Supply::LaserRay => &self.laser_rays,
        }
    }

    pub fn get_mut(&mut self, supply: Supply) -> &mut Pool<Entity> {
        match supply {
            Supply::LargeAsteroid => &mut self.large_asteroids,
            Supply::MediumAsteroid => &mut self.medium_asteroids,
            Supply::SmallAsteroid => &mut self.small_asteroids,
            Supply::Ufo => &mut self.ufos,
            Supply::Blast => &mut self.blasts,
            Supply::Bullet => &mut self.bullets,
            Supply::LaserRay => &mut self.laser_rays,
        }
    }
}

#[derive(Debug)]
pub struct Spawner {
    tuning: Tuning,
    pools: Pools,
    rng: Pcg32,
    /// UFOs spawned from now on chase this entity
    player: Option<EntityId>,
    breakages: Vec<Breakage>,
}

impl Spawner {
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        Self {
            pools: Pools::new(&tuning),
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            player: None,
            breakages: Vec::new(),
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn pools(&self) -> &Pools {
        &self.pools
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    pub fn player(&self) -> Option<EntityId> {
        self.player
    }

    pub fn set_player(&mut self, player: Option<EntityId>) {
        self.player = player;
    }

    /// A configured, not yet live instance from `supply`'s pool.
    ///
    /// `None` when the pool is capped out; the caller simply skips the spawn.
    pub fn obtain(&mut self, supply: Supply) -> Option<Entity> {
        let mut entity = match self.pools.get_mut(supply).obtain() {
            Ok(entity) => entity,
            Err(err) => {
                log::debug!("Skipping spawn: {err}");
                return None;
            }
        };

        let arena_size = self.tuning.arena.size();
        match supply {
            Supply::LargeAsteroid => {
                let asteroids = &self.tuning.asteroids;
                entity.body.position = random::next_position_outside(&mut self.rng, arena_size, entity.size);
                entity.body.linear_velocity =
                    random::next_vector(&mut self.rng, asteroids.min_spawn_speed, asteroids.max_spawn_speed);
                entity.body.angular_velocity =
                    random::next_range(&mut self.rng, -asteroids.max_spawn_spin, asteroids.max_spawn_spin);
                wire_breakable(&mut entity, Some(Supply::MediumAsteroid), None);
            }
            Supply::MediumAsteroid => wire_breakable(&mut entity, Some(Supply::SmallAsteroid), None),
            Supply::SmallAsteroid => wire_breakable(&mut entity, None, None),
            Supply::Ufo => {
                entity.body.position = random::next_position_outside(&mut self.rng, arena_size, entity.size);
                if let Some(pursuit) = entity.pursuit.as_mut() {
                    pursuit.target = self.player;
                }
                wire_breakable(&mut entity, None, Some(Supply::Blast));
            }
            Supply::Blast | Supply::Bullet | Supply::LaserRay => {}
        }
        Some(entity)
    }

    /// Put a freshly obtained large asteroid in the arena
    pub fn spawn_large_asteroid(&mut self, arena: &mut Arena) -> Option<EntityId> {
        let asteroid = self.obtain(Supply::LargeAsteroid)?;
        Some(arena.add(asteroid))
    }

    pub fn spawn_ufo(&mut self, arena: &mut Arena) -> Option<EntityId> {
        let ufo = self.obtain(Supply::Ufo)?;
        Some(arena.add(ufo))
    }

    pub fn spawn_initial_asteroids(&mut self, arena: &mut Arena) {
        for _ in 0..self.tuning.round.initial_asteroids {
            self.spawn_large_asteroid(arena);
        }
    }

    /// Return removed entities to the pools they came from
    pub fn reclaim(&mut self, released: Vec<Entity>) {
        for entity in released {
            if let Some(home) = entity.home() {
                self.pools.get_mut(home).give_back(entity);
            }
        }
    }

    pub(crate) fn record_breakage(&mut self, breakage: Breakage) {
        self.breakages.push(breakage);
    }

    /// Breakages since the last call, in the order they happened
    pub fn take_breakages(&mut self) -> Vec<Breakage> {
        std::mem::take(&mut self.breakages)
    }

    /// Where a new shard of a parent at `position` with width `width` goes
    pub(crate) fn shard_offset(&mut self, width: f32, scatter: f32) -> Vec2 {
        random::next_vector(&mut self.rng, 0.0, width * scatter)
    }
}

/// Per-spawn breakable wiring; cleared by reset so it must be redone each time
fn wire_breakable(entity: &mut Entity, shards: Option<Supply>, blast: Option<Supply>) {
    if let Some(breakable) = entity.breakable.as_mut() {
        breakable.shards.supply = shards;
        breakable.blast = blast;
        breakable.on_broken = Some(BrokenHook::AddScore);
    }
}

impl ContactListener for Spawner {
    fn on_contact(&mut self, arena: &mut Arena, this: EntityId, other: EntityId) -> bool {
        reaction::react(arena, self, this, other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::PoolTuning;

    #[test]
    fn test_large_asteroid_spawns_outside_and_moving() {
        let tuning = Tuning::default();
        let mut spawner = Spawner::new(tuning.clone(), 3);
        let rock = spawner.obtain(Supply::LargeAsteroid).unwrap();

        let p = rock.position();
        let half = rock.half_size();
        let size = tuning.arena.size();
        let on_edge = (p.x + half.x).abs() < 1e-6
            || (p.x - size.x - half.x).abs() < 1e-6
            || (p.y + half.y).abs() < 1e-6
            || (p.y - size.y - half.y).abs() < 1e-6;
        assert!(on_edge, "spawned at {p}");

        let speed = rock.body.linear_velocity.length();
        assert!((0.1 - 1e-5..=0.2 + 1e-5).contains(&speed));
        let breakable = rock.breakable.as_ref().unwrap();
        assert_eq!(breakable.shards.supply, Some(Supply::MediumAsteroid));
        assert_eq!(breakable.on_broken, Some(BrokenHook::AddScore));
        assert_eq!(rock.home(), Some(Supply::LargeAsteroid));
    }

    #[test]
    fn test_ufo_targets_current_player() {
        let mut spawner = Spawner::new(Tuning::default(), 3);
        let player = EntityId::from_raw(42);
        spawner.set_player(Some(player));
        let ufo = spawner.obtain(Supply::Ufo).unwrap();
        assert_eq!(ufo.pursuit.unwrap().target, Some(player));
        assert_eq!(ufo.breakable.unwrap().blast, Some(Supply::Blast));
    }

    #[test]
    fn test_capped_pool_skips_spawn() {
        let tuning = Tuning {
            pools: PoolTuning {
                max_ufos: Some(1),
                ..Default::default()
            },
            ..Default::default()
        };
        let mut spawner = Spawner::new(tuning, 1);
        let mut arena = Arena::new(spawner.tuning().arena.size());

        assert!(spawner.spawn_ufo(&mut arena).is_some());
        assert!(spawner.spawn_ufo(&mut arena).is_none());

        // Removing the first frees the slot once reclaimed
        let first = arena.iter().next().unwrap().id();
        arena.remove(first);
        spawner.reclaim(arena.take_released());
        assert!(spawner.spawn_ufo(&mut arena).is_some());
        assert_eq!(spawner.pools().get(Supply::Ufo).created(), 1, "instance was recycled");
    }

    #[test]
    fn test_initial_asteroids() {
        let mut spawner = Spawner::new(Tuning::default(), 9);
        let mut arena = Arena::new(spawner.tuning().arena.size());
        spawner.spawn_initial_asteroids(&mut arena);
        assert_eq!(arena.len(), 2);
        assert!(arena.iter().all(|e| e.kind == EntityKind::Asteroid(AsteroidSize::Large)));
    }

    #[test]
    fn test_same_seed_same_spawns() {
        let mut a = Spawner::new(Tuning::default(), 42);
        let mut b = Spawner::new(Tuning::default(), 42);
        for _ in 0..5 {
            let ra = a.obtain(Supply::LargeAsteroid).unwrap();
            let rb = b.obtain(Supply::LargeAsteroid).unwrap();
            assert_eq!(ra.body.position, rb.body.position);
            assert_eq!(ra.body.linear_velocity, rb.body.linear_velocity);
        }
    }
}
