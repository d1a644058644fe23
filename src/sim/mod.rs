//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod arena;
pub mod collision;
pub mod entity;
pub mod factory;
pub mod gun;
pub mod physics;
pub mod pool;
pub mod random;
pub mod reaction;
pub mod session;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod timers;

pub use arena::{Arena, ArenaId, ContactListener, NoReaction};
pub use collision::{Placed, shapes_overlap};
pub use entity::{AsteroidSize, Body, Collider, Entity, EntityId, EntityKind, Shape, Supply};
pub use gun::{ChargeGun, Gun, Weapon, WeaponSlot, Weapons};
pub use physics::{Contact, KinematicWorld, PhysicsBackend};
pub use pool::{Pool, Poolable};
pub use session::{GameSession, SpawnEvent};
pub use spawner::{Breakage, Spawner};
pub use state::{BrokenHook, GameEvent, RoundState};
pub use tick::{TickInput, tick};
pub use timers::{ContinuousClock, Countdown, Timers};
