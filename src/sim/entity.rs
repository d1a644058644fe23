//! Entities placed in the arena
//!
//! There is one `Entity` type. What an entity *is* comes from its `kind` tag;
//! what it can *do* comes from the optional capability blocks it carries
//! (breakable, propulsion, weapons, pursuit, ammo, lifetime).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::arena::ArenaId;
use super::gun::Weapons;
use super::pool::Poolable;
use super::state::BrokenHook;
use super::timers::Countdown;
use crate::consts::{CATEGORY_ALL, CATEGORY_NONE};
use crate::{look_direction, normalize_angle};

/// Stable identity of an entity instance, kept across pooled reuse.
///
/// The arena hands ids out in order the first time an entity is added, so a
/// replayed session numbers its entities the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Carried by entities that have never been added to an arena
    pub const UNASSIGNED: EntityId = EntityId(0);

    pub(crate) const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }

    pub fn is_assigned(self) -> bool {
        self != Self::UNASSIGNED
    }
}

/// Asteroid size classes, largest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AsteroidSize {
    Large,
    Medium,
    Small,
}

/// What an entity is; drives collision reactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Ship,
    Asteroid(AsteroidSize),
    Projectile,
    EnemyCraft,
    Effect,
}

/// Named source of configured entities. Each supply is backed by its own pool,
/// and pooled instances remember the supply they came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Supply {
    LargeAsteroid,
    MediumAsteroid,
    SmallAsteroid,
    Ufo,
    Blast,
    Bullet,
    LaserRay,
}

/// Rigid-body state the physics backend integrates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub position: Vec2,
    /// Radians; 0 faces up
    pub rotation: f32,
    pub linear_velocity: Vec2,
    pub angular_velocity: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub mass: f32,
}

impl Default for Body {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            linear_velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
            mass: 1.0,
        }
    }
}

impl Body {
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        if self.mass > 0.0 {
            self.linear_velocity += impulse / self.mass;
        }
    }

    /// Explicit Euler step with Box2D-style damping
    pub fn integrate(&mut self, dt: f32) {
        self.linear_velocity *= 1.0 / (1.0 + dt * self.linear_damping);
        self.angular_velocity *= 1.0 / (1.0 + dt * self.angular_damping);
        self.position += self.linear_velocity * dt;
        self.rotation = normalize_angle(self.rotation + self.angular_velocity * dt);
    }
}

/// Collision geometry in body space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f32 },
    Rect { half_extents: Vec2 },
}

impl Shape {
    pub fn area(&self) -> f32 {
        match *self {
            Shape::Circle { radius } => std::f32::consts::PI * radius * radius,
            Shape::Rect { half_extents } => 4.0 * half_extents.x * half_extents.y,
        }
    }
}

/// Shape plus the category/mask pair that decides who can touch whom
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    pub shape: Shape,
    pub category: u16,
    pub mask: u16,
}

impl Collider {
    pub fn circle(radius: f32, category: u16) -> Self {
        Self {
            shape: Shape::Circle { radius },
            category,
            mask: CATEGORY_ALL,
        }
    }

    pub fn rect(size: Vec2, category: u16) -> Self {
        Self {
            shape: Shape::Rect {
                half_extents: size * 0.5,
            },
            category,
            mask: CATEGORY_ALL,
        }
    }

    pub fn with_mask(mut self, mask: u16) -> Self {
        self.mask = mask;
        self
    }

    /// Both sides must accept each other
    pub fn accepts(&self, other: &Collider) -> bool {
        self.mask & other.category != CATEGORY_NONE && other.mask & self.category != CATEGORY_NONE
    }
}

/// How a broken entity scatters children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShardConfig {
    /// Where shards come from; no supply means no shards
    pub supply: Option<Supply>,
    pub min_count: u32,
    pub max_count: u32,
    pub min_angular_velocity: f32,
    pub max_angular_velocity: f32,
    pub min_angular_offset: f32,
    pub max_angular_offset: f32,
    /// Shard speed relative to the parent's
    pub acceleration: f32,
    /// Jitter radius as a fraction of the parent's width
    pub scatter: f32,
}

impl Default for ShardConfig {
    fn default() -> Self {
        Self {
            supply: None,
            min_count: 2,
            max_count: 4,
            min_angular_velocity: -0.5,
            max_angular_velocity: 0.5,
            min_angular_offset: -0.75,
            max_angular_offset: 0.75,
            acceleration: 1.25,
            scatter: 0.5,
        }
    }
}

/// Can be destroyed; may leave shards or a blast and award points
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Breakable {
    pub shards: ShardConfig,
    pub score_points: u32,
    /// Effect left at the wreck
    pub blast: Option<Supply>,
    /// What the session does when this breaks
    pub on_broken: Option<BrokenHook>,
    /// Set on the first break of a lifecycle
    pub broken: bool,
}

/// Thrust and turning for spacecraft
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Propulsion {
    pub engage_impulse: f32,
    /// Radians per second
    pub rotation_speed: f32,
}

/// Chases another entity
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pursuit {
    pub target: Option<EntityId>,
}

/// Projectile behavior
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ammo {
    pub speed: f32,
    /// Removed after its first hit
    pub self_destruct: bool,
}

/// Anything simulated in the arena
#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    pub kind: EntityKind,
    /// Width/height used for wrap margins and sprite scale
    pub size: Vec2,
    pub body: Body,
    /// `None` means the physics backend never reports contacts for it
    pub collider: Option<Collider>,
    /// Back-reference to the owning arena; set only while live
    arena: Option<ArenaId>,
    /// Pool this instance returns to when removed
    home: Option<Supply>,
    pub breakable: Option<Breakable>,
    pub propulsion: Option<Propulsion>,
    pub weapons: Option<Weapons>,
    pub pursuit: Option<Pursuit>,
    pub ammo: Option<Ammo>,
    /// Removes the entity when it runs out
    pub lifetime: Option<Countdown>,
}

impl Entity {
    pub fn new(kind: EntityKind, size: Vec2) -> Self {
        Self {
            id: EntityId::UNASSIGNED,
            kind,
            size,
            body: Body::default(),
            collider: None,
            arena: None,
            home: None,
            breakable: None,
            propulsion: None,
            weapons: None,
            pursuit: None,
            ammo: None,
            lifetime: None,
        }
    }

    /// Attach a collider and derive mass from its area
    pub fn with_collider(mut self, collider: Collider, density: f32) -> Self {
        self.body.mass = (collider.shape.area() * density).max(f32::EPSILON);
        self.collider = Some(collider);
        self
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: EntityId) {
        self.id = id;
    }

    pub fn arena(&self) -> Option<ArenaId> {
        self.arena
    }

    pub fn is_live(&self) -> bool {
        self.arena.is_some()
    }

    pub(crate) fn set_arena(&mut self, arena: Option<ArenaId>) {
        self.arena = arena;
    }

    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    pub fn rotation(&self) -> f32 {
        self.body.rotation
    }

    pub fn half_size(&self) -> Vec2 {
        self.size * 0.5
    }

    pub fn look_direction(&self) -> Vec2 {
        look_direction(self.body.rotation)
    }

    /// Thrust forward
    pub fn engage(&mut self) {
        let direction = self.look_direction();
        self.engage_toward(direction);
    }

    /// Thrust along `direction` (expected unit length or zero)
    pub fn engage_toward(&mut self, direction: Vec2) {
        if let Some(propulsion) = self.propulsion {
            self.body.apply_impulse(direction * propulsion.engage_impulse);
        }
    }

    pub fn rotate_left(&mut self, dt: f32) {
        if let Some(propulsion) = self.propulsion {
            self.body.rotation = normalize_angle(self.body.rotation - propulsion.rotation_speed * dt);
        }
    }

    pub fn rotate_right(&mut self, dt: f32) {
        if let Some(propulsion) = self.propulsion {
            self.body.rotation = normalize_angle(self.body.rotation + propulsion.rotation_speed * dt);
        }
    }

    /// Launch a projectile along `direction`
    pub fn fire(&mut self, direction: Vec2) {
        if let Some(ammo) = self.ammo {
            self.body.linear_velocity = direction * ammo.speed;
        }
    }

    /// Per-tick bookkeeping: weapon clocks, lifetime, pursuit.
    ///
    /// `target_position` is where the pursuit target currently is, if it's live.
    /// Returns true when the entity's lifetime has run out.
    pub fn update(&mut self, dt: f32, target_position: Option<Vec2>) -> bool {
        if let Some(weapons) = self.weapons.as_mut() {
            weapons.update(dt);
        }

        if self.pursuit.is_some() {
            let direction = target_position
                .map(|target| (target - self.body.position).normalize_or_zero())
                .unwrap_or(Vec2::ZERO);
            self.engage_toward(direction);
        }

        self.lifetime.as_mut().is_some_and(|lifetime| lifetime.update(dt))
    }

    /// Called by the arena right after the entity becomes live
    pub(crate) fn on_added(&mut self) {
        if let Some(lifetime) = self.lifetime.as_mut() {
            lifetime.restart();
        }
    }

    /// Called by the arena right after the entity stops being live
    pub(crate) fn on_removed(&mut self) {
        if let Some(lifetime) = self.lifetime.as_mut() {
            lifetime.stop();
        }
    }

    /// Called before the arena relocates an entity that crossed an edge.
    /// Returns true if the entity wants to be removed instead.
    pub(crate) fn on_flew_out(&mut self) -> bool {
        self.ammo.is_some()
    }

    /// Where the entity belongs after toroidal wrapping, if it crossed an edge.
    ///
    /// The margin is the entity's own half size, so sprites leave the screen
    /// completely before reappearing on the other side.
    pub fn wrapped_position(&self, arena_size: Vec2) -> Option<Vec2> {
        let half = self.half_size();
        let pos = self.body.position;
        let mut wrapped = pos;

        if pos.x < -half.x {
            wrapped.x = arena_size.x + half.x;
        } else if pos.x > arena_size.x + half.x {
            wrapped.x = -half.x;
        }

        if pos.y < -half.y {
            wrapped.y = arena_size.y + half.y;
        } else if pos.y > arena_size.y + half.y {
            wrapped.y = -half.y;
        }

        (wrapped != pos).then_some(wrapped)
    }
}

impl Poolable for Entity {
    type Home = Supply;

    fn reset(&mut self) {
        // Shape, size, collider and static configuration survive; per-life state doesn't
        self.body.position = Vec2::ZERO;
        self.body.rotation = 0.0;
        self.body.linear_velocity = Vec2::ZERO;
        self.body.angular_velocity = 0.0;

        if let Some(breakable) = self.breakable.as_mut() {
            breakable.broken = false;
            breakable.on_broken = None;
            breakable.blast = None;
            breakable.shards.supply = None;
        }
        if let Some(pursuit) = self.pursuit.as_mut() {
            pursuit.target = None;
        }
        if let Some(lifetime) = self.lifetime.as_mut() {
            lifetime.stop();
        }
        if let Some(weapons) = self.weapons.as_mut() {
            weapons.reset();
        }
    }

    fn home(&self) -> Option<Supply> {
        self.home
    }

    fn set_home(&mut self, home: Option<Supply>) {
        self.home = home;
    }
}
