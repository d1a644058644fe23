//! What happens when two entities touch

use glam::Vec2;

use super::arena::Arena;
use super::entity::{EntityId, EntityKind};
use super::random;
use super::spawner::{Breakage, Spawner};

/// Apply `this`'s reaction to touching `other`. Runs while the arena is locked.
pub fn react(arena: &mut Arena, spawner: &mut Spawner, this: EntityId, other: EntityId) -> bool {
    let (Some(me), Some(them)) = (arena.get(this), arena.get(other)) else {
        return false;
    };
    let my_kind = me.kind;
    let their_kind = them.kind;
    let other_breakable = them.breakable.is_some();
    let self_destruct = me.ammo.is_some_and(|ammo| ammo.self_destruct);

    match my_kind {
        EntityKind::Projectile => {
            if other_breakable {
                break_entity(arena, spawner, other);
            }
            if self_destruct {
                arena.remove(this);
            }
            true
        }
        EntityKind::Ship => break_entity(arena, spawner, this),
        // Only weapons bring a UFO down
        EntityKind::EnemyCraft if their_kind == EntityKind::Projectile => break_entity(arena, spawner, this),
        EntityKind::EnemyCraft | EntityKind::Asteroid(_) | EntityKind::Effect => false,
    }
}

/// Destroy a live breakable entity: scatter shards, leave a blast, report it, remove it.
///
/// Breaking is once per lifecycle; returns false if `id` was already broken,
/// already leaving, or isn't breakable.
pub fn break_entity(arena: &mut Arena, spawner: &mut Spawner, id: EntityId) -> bool {
    if arena.is_pending_removal(id) {
        return false;
    }
    let Some(entity) = arena.get_mut(id) else {
        return false;
    };
    let kind = entity.kind;
    let position = entity.position();
    let velocity = entity.body.linear_velocity;
    let size = entity.size;
    let Some(breakable) = entity.breakable.as_mut() else {
        return false;
    };
    if breakable.broken {
        return false;
    }
    breakable.broken = true;
    let breakable = breakable.clone();

    let shards = &breakable.shards;
    if let Some(supply) = shards.supply {
        let count = random::next_count(spawner.rng(), shards.min_count, shards.max_count);
        for _ in 0..count {
            let Some(mut shard) = spawner.obtain(supply) else {
                continue;
            };
            let offset = random::next_range(spawner.rng(), shards.min_angular_offset, shards.max_angular_offset);
            shard.body.linear_velocity = Vec2::from_angle(offset).rotate(velocity) * shards.acceleration;
            shard.body.angular_velocity =
                random::next_range(spawner.rng(), shards.min_angular_velocity, shards.max_angular_velocity);
            shard.body.position = position + spawner.shard_offset(size.x, shards.scatter);
            arena.add(shard);
        }
    }

    if let Some(supply) = breakable.blast {
        if let Some(mut blast) = spawner.obtain(supply) {
            blast.body.position = position;
            blast.size = size;
            arena.add(blast);
        }
    }

    log::debug!("{:?} {:?} broken ({} points)", kind, id, breakable.score_points);
    spawner.record_breakage(Breakage {
        id,
        kind,
        points: breakable.score_points,
        hook: breakable.on_broken,
    });
    arena.remove(id);
    true
}
