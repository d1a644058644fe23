//! The arena: live entity set, physics stepping and toroidal wrapping
//!
//! While the arena is stepping it is *locked*: adds and removals requested by
//! contact reactions are buffered and applied afterwards, removals first, so
//! the live set never changes under the physics step.

use std::collections::BTreeMap;

use glam::Vec2;

use super::entity::{Entity, EntityId};
use super::physics::{KinematicWorld, PhysicsBackend};
use super::pool::Poolable;

/// Identity of an arena; entities point back to it while live
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ArenaId(u32);

impl std::fmt::Display for ArenaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "arena#{}", self.0)
    }
}

/// Receives begin-contacts while the arena is locked
pub trait ContactListener {
    /// React to `this` touching `other`. Called once per side of a contact.
    ///
    /// Returns whether the contact was handled.
    fn on_contact(&mut self, arena: &mut Arena, this: EntityId, other: EntityId) -> bool;
}

/// Listener that ignores every contact
#[derive(Debug, Default)]
pub struct NoReaction;

impl ContactListener for NoReaction {
    fn on_contact(&mut self, _arena: &mut Arena, _this: EntityId, _other: EntityId) -> bool {
        false
    }
}

pub struct Arena {
    id: ArenaId,
    size: Vec2,
    entities: BTreeMap<EntityId, Entity>,
    pending_add: Vec<Entity>,
    pending_remove: Vec<EntityId>,
    locked: bool,
    world: Box<dyn PhysicsBackend>,
    /// Removed pooled entities waiting to go home
    released: Vec<Entity>,
    next_id: u64,
}

impl Arena {
    /// Arena with the built-in kinematic backend
    pub fn new(size: Vec2) -> Self {
        Self::with_backend(size, Box::new(KinematicWorld::new()))
    }

    pub fn with_backend(size: Vec2, world: Box<dyn PhysicsBackend>) -> Self {
        Self {
            id: ArenaId::default(),
            size,
            entities: BTreeMap::new(),
            pending_add: Vec::new(),
            pending_remove: Vec::new(),
            locked: false,
            world,
            released: Vec::new(),
            next_id: 1,
        }
    }

    pub fn id(&self) -> ArenaId {
        self.id
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Live entities in id order
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Live and queued for removal at the end of the current step
    pub fn is_pending_removal(&self, id: EntityId) -> bool {
        self.pending_remove.contains(&id)
    }

    pub fn world(&self) -> &dyn PhysicsBackend {
        self.world.as_ref()
    }

    /// Make `entity` live, or queue it if the arena is stepping.
    ///
    /// The entity gets its id here on its first add and keeps it through
    /// pooled reuse. Adding an entity that is already live (here or elsewhere)
    /// does nothing.
    pub fn add(&mut self, mut entity: Entity) -> EntityId {
        if let Some(owner) = entity.arena() {
            log::debug!("Ignoring add of {:?}: already live in {}", entity.id(), owner);
            return entity.id();
        }
        if !entity.id().is_assigned() || self.is_taken(entity.id()) {
            let id = self.allocate_id();
            entity.assign_id(id);
        }
        let id = entity.id();

        if self.locked {
            self.pending_add.push(entity);
            return id;
        }

        self.world.insert(id, entity.collider);
        entity.set_arena(Some(self.id));
        entity.on_added();
        self.entities.insert(id, entity);
        id
    }

    /// Take `id` out of the arena, or queue the removal if the arena is stepping.
    ///
    /// Returns false if `id` isn't live here.
    pub fn remove(&mut self, id: EntityId) -> bool {
        if !self.entities.contains_key(&id) {
            return false;
        }

        if self.locked {
            if !self.pending_remove.contains(&id) {
                self.pending_remove.push(id);
            }
            return true;
        }

        let Some(entity) = self.entities.remove(&id) else {
            return false;
        };
        self.world.remove(id);
        self.detach(entity);
        true
    }

    fn is_taken(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id) || self.pending_add.iter().any(|e| e.id() == id)
    }

    fn allocate_id(&mut self) -> EntityId {
        loop {
            let id = EntityId::from_raw(self.next_id);
            self.next_id += 1;
            if !self.is_taken(id) {
                return id;
            }
        }
    }

    /// Remove everything, live or queued
    pub fn clear(&mut self) {
        for (_, entity) in std::mem::take(&mut self.entities) {
            self.detach(entity);
        }
        for entity in std::mem::take(&mut self.pending_add) {
            if entity.home().is_some() {
                self.released.push(entity);
            }
        }
        self.pending_remove.clear();
        self.world.clear();
    }

    /// Pooled entities removed since the last call, for return to their pools
    pub fn take_released(&mut self) -> Vec<Entity> {
        std::mem::take(&mut self.released)
    }

    /// Advance one fixed step.
    ///
    /// Order: entity updates (weapons, pursuit, lifetimes), physics step with
    /// contact dispatch while locked, buffered removals then additions, wrap.
    pub fn tick(&mut self, dt: f32, listener: &mut dyn ContactListener) {
        self.update_entities(dt);

        self.locked = true;
        let mut contacts = Vec::new();
        self.world.step(dt, &mut self.entities, &mut contacts);
        for contact in contacts {
            self.dispatch(listener, contact.a, contact.b);
            self.dispatch(listener, contact.b, contact.a);
        }
        self.unlock();

        self.wrap();
    }

    fn update_entities(&mut self, dt: f32) {
        let targets: BTreeMap<EntityId, Vec2> = self
            .entities
            .values()
            .filter_map(|e| e.pursuit?.target)
            .filter_map(|target| Some((target, self.entities.get(&target)?.position())))
            .collect();

        let mut expired = Vec::new();
        for (id, entity) in self.entities.iter_mut() {
            let target = entity
                .pursuit
                .and_then(|p| p.target)
                .and_then(|t| targets.get(&t).copied());
            if entity.update(dt, target) {
                expired.push(*id);
            }
        }
        for id in expired {
            self.remove(id);
        }
    }

    fn dispatch(&mut self, listener: &mut dyn ContactListener, this: EntityId, other: EntityId) {
        // A doomed side reacts no further, but whatever it touched still does
        if !self.contains(this) || !self.contains(other) || self.is_pending_removal(this) {
            return;
        }
        listener.on_contact(self, this, other);
    }

    fn unlock(&mut self) {
        self.locked = false;
        for id in std::mem::take(&mut self.pending_remove) {
            self.remove(id);
        }
        for entity in std::mem::take(&mut self.pending_add) {
            self.add(entity);
        }
    }

    fn wrap(&mut self) {
        let mut departed = Vec::new();
        for (id, entity) in self.entities.iter_mut() {
            let Some(wrapped) = entity.wrapped_position(self.size) else {
                continue;
            };
            if entity.on_flew_out() {
                departed.push(*id);
            } else {
                entity.body.position = wrapped;
            }
        }
        for id in departed {
            self.remove(id);
        }
    }

    fn detach(&mut self, mut entity: Entity) {
        entity.set_arena(None);
        entity.on_removed();
        if entity.home().is_some() {
            self.released.push(entity);
        }
    }
}

impl std::fmt::Debug for Arena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arena")
            .field("id", &self.id)
            .field("size", &self.size)
            .field("entities", &self.entities.len())
            .field("locked", &self.locked)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{CATEGORY_HAZARD, CATEGORY_PROJECTILE, CATEGORY_SHIP};
    use crate::sim::entity::{Ammo, AsteroidSize, Collider, EntityKind, Supply};
    use crate::sim::timers::Countdown;

    const SIZE: Vec2 = Vec2::new(1.66, 1.0);
    const DT: f32 = 1.0 / 60.0;

    fn rock(position: Vec2) -> Entity {
        let mut e = Entity::new(EntityKind::Asteroid(AsteroidSize::Large), Vec2::splat(0.1)).with_collider(
            Collider::circle(0.05, CATEGORY_HAZARD).with_mask(CATEGORY_SHIP | CATEGORY_PROJECTILE),
            1.0,
        );
        e.body.position = position;
        e
    }

    fn bullet(position: Vec2) -> Entity {
        let mut e = Entity::new(EntityKind::Projectile, Vec2::splat(0.01))
            .with_collider(Collider::rect(Vec2::splat(0.01), CATEGORY_PROJECTILE).with_mask(CATEGORY_HAZARD), 1.0);
        e.ammo = Some(Ammo {
            speed: 1.0,
            self_destruct: true,
        });
        e.body.position = position;
        e
    }

    /// Removes both sides of every contact and queues a replacement
    #[derive(Default)]
    struct Shatter {
        seen: Vec<(EntityId, EntityId)>,
        spawned: Vec<EntityId>,
    }

    impl ContactListener for Shatter {
        fn on_contact(&mut self, arena: &mut Arena, this: EntityId, other: EntityId) -> bool {
            assert!(arena.is_locked());
            self.seen.push((this, other));
            let live = arena.len();

            assert!(arena.remove(this));
            assert!(arena.contains(this), "removals are buffered while locked");
            assert!(arena.is_pending_removal(this));
            assert_eq!(arena.len(), live);

            let spawned = arena.add(rock(Vec2::new(0.2, 0.2)));
            assert!(!arena.contains(spawned), "adds are buffered while locked");
            assert_eq!(arena.len(), live);
            self.spawned.push(spawned);
            true
        }
    }

    #[test]
    fn test_add_and_remove() {
        let mut arena = Arena::new(SIZE);
        let id = arena.add(rock(Vec2::new(0.5, 0.5)));
        assert!(arena.contains(id));
        assert!(arena.get(id).unwrap().is_live());
        assert_eq!(arena.world().len(), 1);

        assert!(arena.remove(id));
        assert!(!arena.contains(id));
        assert!(arena.world().is_empty());
        assert!(!arena.remove(id), "removing a non-member is a no-op");
    }

    #[test]
    fn test_add_live_entity_is_noop() {
        let mut first = Arena::new(SIZE);
        let mut second = Arena::new(SIZE);
        let id = first.add(rock(Vec2::new(0.5, 0.5)));

        let copy = first.get(id).unwrap().clone();
        assert_eq!(copy.arena(), Some(first.id()));
        second.add(copy.clone());
        assert!(second.is_empty(), "entity still points at its arena");
        first.add(copy);
        assert_eq!(first.len(), 1);
    }

    #[test]
    fn test_locked_mutations_flush_removals_first() {
        let mut arena = Arena::new(SIZE);
        let a = arena.add(rock(Vec2::new(0.5, 0.5)));
        let b = arena.add(bullet(Vec2::new(0.52, 0.5)));

        let mut listener = Shatter::default();
        arena.tick(DT, &mut listener);

        // Each side removed only itself, so both got their turn
        assert_eq!(listener.seen, vec![(a, b), (b, a)]);
        assert!(!arena.contains(a));
        assert!(!arena.contains(b));
        assert_eq!(listener.spawned.len(), 2);
        assert!(listener.spawned.iter().all(|id| arena.contains(*id)));
        assert!(!arena.is_locked());
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_doomed_side_skipped_but_partner_still_reacts() {
        /// Projectiles remove whatever they touch
        #[derive(Default)]
        struct Smash(Vec<(EntityId, EntityId)>);
        impl ContactListener for Smash {
            fn on_contact(&mut self, arena: &mut Arena, this: EntityId, other: EntityId) -> bool {
                self.0.push((this, other));
                arena.get(this).is_some_and(|e| e.kind == EntityKind::Projectile) && arena.remove(other)
            }
        }

        let mut arena = Arena::new(SIZE);
        let a = arena.add(rock(Vec2::new(0.5, 0.5)));
        let b = arena.add(bullet(Vec2::new(0.52, 0.5)));
        let c = arena.add(bullet(Vec2::new(0.48, 0.5)));
        let mut smash = Smash::default();
        arena.tick(DT, &mut smash);

        // b dooms a, so a sits out (a, c); c still gets its turn against a
        assert_eq!(smash.0, vec![(a, b), (b, a), (c, a)]);
        assert!(!arena.contains(a));
        assert!(arena.contains(b) && arena.contains(c));
    }

    #[test]
    fn test_ids_follow_add_order_and_survive_readd() {
        let mut first = Arena::new(SIZE);
        let mut second = Arena::new(SIZE);
        let a = first.add(rock(Vec2::new(0.5, 0.5)));
        let b = first.add(rock(Vec2::new(0.7, 0.5)));
        assert_eq!(second.add(rock(Vec2::new(0.5, 0.5))), a, "numbering is per arena");
        assert!(a < b);

        let mut pool = crate::sim::pool::Pool::new(Supply::Bullet, || bullet(Vec2::ZERO));
        let shot = first.add(pool.obtain().unwrap());
        first.remove(shot);
        for entity in first.take_released() {
            pool.give_back(entity);
        }
        assert_eq!(first.add(pool.obtain().unwrap()), shot, "pooled instances keep their id");
    }

    #[test]
    fn test_contact_dispatched_both_ways() {
        #[derive(Default)]
        struct Record(Vec<(EntityId, EntityId)>);
        impl ContactListener for Record {
            fn on_contact(&mut self, _arena: &mut Arena, this: EntityId, other: EntityId) -> bool {
                self.0.push((this, other));
                true
            }
        }

        let mut arena = Arena::new(SIZE);
        let a = arena.add(rock(Vec2::new(0.5, 0.5)));
        let b = arena.add(bullet(Vec2::new(0.52, 0.5)));
        let mut record = Record::default();
        arena.tick(DT, &mut record);
        assert_eq!(record.0, vec![(a, b), (b, a)]);
    }

    #[test]
    fn test_projectile_leaving_arena_is_removed() {
        let mut arena = Arena::new(SIZE);
        let mut shot = bullet(Vec2::new(0.0, 0.5));
        shot.fire(Vec2::NEG_X);
        let id = arena.add(shot);

        for _ in 0..10 {
            arena.tick(DT, &mut NoReaction);
        }
        assert!(!arena.contains(id));
    }

    #[test]
    fn test_asteroid_wraps_to_opposite_edge() {
        let mut arena = Arena::new(SIZE);
        let mut r = rock(Vec2::new(0.3, -0.049));
        r.body.linear_velocity = Vec2::new(0.0, -1.0);
        let id = arena.add(r);

        arena.tick(DT, &mut NoReaction);
        let pos = arena.get(id).unwrap().position();
        assert!((pos.y - 1.05).abs() < 1e-5);
        assert!((pos.x - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_lifetime_expiry_removes_entity() {
        let mut arena = Arena::new(SIZE);
        let mut blast = Entity::new(EntityKind::Effect, Vec2::splat(0.1));
        blast.lifetime = Some(Countdown::new(0.1));
        blast.body.position = Vec2::new(0.5, 0.5);
        let id = arena.add(blast);

        for _ in 0..5 {
            arena.tick(DT, &mut NoReaction);
        }
        assert!(arena.contains(id));
        for _ in 0..3 {
            arena.tick(DT, &mut NoReaction);
        }
        assert!(!arena.contains(id));
    }

    #[test]
    fn test_pooled_entities_are_released() {
        use crate::sim::pool::Pool;

        let mut pool = Pool::new(Supply::Bullet, || bullet(Vec2::ZERO));
        let mut arena = Arena::new(SIZE);
        let mut shot = pool.obtain().unwrap();
        shot.body.position = Vec2::new(0.5, 0.5);
        let id = arena.add(shot);
        arena.add(rock(Vec2::new(1.2, 0.5)));

        arena.remove(id);
        arena.clear();
        let released = arena.take_released();
        assert_eq!(released.len(), 1, "only pooled entities are released");
        for entity in released {
            assert!(!entity.is_live());
            pool.give_back(entity);
        }
        assert_eq!(pool.outstanding(), 0);
        assert!(arena.is_empty());
        assert!(arena.world().is_empty());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn live_entities_stay_within_wrap_margins(
                bodies in proptest::collection::vec(
                    ((0.0f32..1.66, 0.0f32..1.0), (-3.0f32..3.0, -3.0f32..3.0), 0.01f32..0.2),
                    1..20
                ),
                ticks in 1usize..120
            ) {
                let mut arena = Arena::new(SIZE);
                for ((x, y), (vx, vy), size) in bodies {
                    let mut e = Entity::new(EntityKind::Asteroid(AsteroidSize::Large), Vec2::splat(size));
                    e.body.position = Vec2::new(x, y);
                    e.body.linear_velocity = Vec2::new(vx, vy);
                    arena.add(e);
                }
                for _ in 0..ticks {
                    arena.tick(DT, &mut NoReaction);
                    for e in arena.iter() {
                        let half = e.half_size();
                        let p = e.position();
                        prop_assert!(p.x >= -half.x && p.x <= SIZE.x + half.x, "x={} half={}", p.x, half.x);
                        prop_assert!(p.y >= -half.y && p.y <= SIZE.y + half.y, "y={} half={}", p.y, half.y);
                    }
                }
            }
        }
    }
}
