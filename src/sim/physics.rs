//! Physics backend seam
//!
//! The arena owns one backend. It registers every live entity as a dynamic
//! body, integrates motion each step and reports begin-contacts between
//! fixtures whose category/mask filters accept each other.

use std::collections::{BTreeMap, BTreeSet};

use super::collision::{Placed, shapes_overlap};
use super::entity::{Collider, Entity, EntityId};

/// Two fixtures started touching this step. `a < b` by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Contact {
    pub a: EntityId,
    pub b: EntityId,
}

/// What the arena needs from a physics engine
pub trait PhysicsBackend {
    /// Register a body; `collider` of `None` moves but never touches anything
    fn insert(&mut self, id: EntityId, collider: Option<Collider>);

    /// Unregister a body and forget its contacts
    fn remove(&mut self, id: EntityId);

    fn clear(&mut self);

    fn contains(&self, id: EntityId) -> bool;

    /// Number of registered bodies
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Advance registered bodies by `dt` and append begin-contacts to `contacts`
    fn step(&mut self, dt: f32, bodies: &mut BTreeMap<EntityId, Entity>, contacts: &mut Vec<Contact>);
}

/// Built-in backend: Euler integration plus overlap tests, no contact response.
///
/// Every pair that can touch in this game involves a sensor (ship or
/// projectile) or is filtered out (hazard vs hazard), so overlaps are only
/// reported, never resolved.
#[derive(Debug, Default)]
pub struct KinematicWorld {
    bodies: BTreeMap<EntityId, Option<Collider>>,
    touching: BTreeSet<(EntityId, EntityId)>,
}

impl KinematicWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pairs currently overlapping
    #[cfg(test)]
    fn touching_len(&self) -> usize {
        self.touching.len()
    }
}

impl PhysicsBackend for KinematicWorld {
    fn insert(&mut self, id: EntityId, collider: Option<Collider>) {
        self.bodies.insert(id, collider);
    }

    fn remove(&mut self, id: EntityId) {
        self.bodies.remove(&id);
        self.touching.retain(|(a, b)| *a != id && *b != id);
    }

    fn clear(&mut self) {
        self.bodies.clear();
        self.touching.clear();
    }

    fn contains(&self, id: EntityId) -> bool {
        self.bodies.contains_key(&id)
    }

    fn len(&self) -> usize {
        self.bodies.len()
    }

    fn step(&mut self, dt: f32, bodies: &mut BTreeMap<EntityId, Entity>, contacts: &mut Vec<Contact>) {
        // Integrate
        for (id, entity) in bodies.iter_mut() {
            if self.bodies.contains_key(id) {
                entity.body.integrate(dt);
            }
        }

        // Broad phase is a plain sorted sweep; counts stay in the dozens
        let fixtures: Vec<(EntityId, Collider, Placed)> = self
            .bodies
            .iter()
            .filter_map(|(id, collider)| {
                let collider = (*collider)?;
                let entity = bodies.get(id)?;
                let placed = Placed {
                    shape: collider.shape,
                    position: entity.body.position,
                    rotation: entity.body.rotation,
                };
                Some((*id, collider, placed))
            })
            .collect();

        for (i, (a, a_collider, a_placed)) in fixtures.iter().enumerate() {
            for (b, b_collider, b_placed) in &fixtures[i + 1..] {
                let key = (*a, *b);
                if !a_collider.accepts(b_collider) {
                    continue;
                }
                if shapes_overlap(a_placed, b_placed) {
                    if self.touching.insert(key) {
                        contacts.push(Contact { a: *a, b: *b });
                    }
                } else {
                    self.touching.remove(&key);
                }
            }
        }
    }
}
