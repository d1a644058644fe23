//! Weapons
//!
//! A gun is not an entity of its own. It rides on a wielder, gates how often
//! it may shoot, and when allowed pulls a projectile from its ammo supply and
//! launches it from the wielder's position along the wielder's facing.

use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::entity::{Entity, EntityId, Supply};
use super::timers::Countdown;

/// Which of the ship's weapons to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponSlot {
    MachineGun,
    Laser,
}

/// Hands out a configured projectile for a supply, or `None` if it can't
pub type AmmoSource<'a> = dyn FnMut(Supply) -> Option<Entity> + 'a;

/// Common face of every weapon
pub trait Weapon {
    /// Try to shoot. Returns the projectile to place, or `None` if the weapon
    /// is gated (cooling down, out of charge) or has nothing to shoot.
    fn fire(&mut self, ammo: &mut AmmoSource<'_>) -> Option<Entity>;

    /// Advance cooldown/charging clocks
    fn update(&mut self, dt: f32);

    /// Readiness for HUD bars, 0.0 (just fired) ..= 1.0 (ready)
    fn readiness(&self) -> f32;

    /// Back to a freshly built state
    fn reset(&mut self);
}

/// Cooldown-gated gun: Ready -> Cooling -> Ready
#[derive(Debug, Clone, PartialEq)]
pub struct Gun {
    /// Projectile supply; an unconfigured gun never fires
    pub ammo: Option<Supply>,
    /// Seconds between shots
    pub cooldown: f32,
    cooldown_timer: Countdown,
}

impl Gun {
    pub fn new(ammo: Option<Supply>, cooldown: f32) -> Self {
        Self {
            ammo,
            cooldown,
            cooldown_timer: Countdown::new(cooldown),
        }
    }

    pub fn is_cooling(&self) -> bool {
        self.cooldown_timer.is_running()
    }
}

impl Weapon for Gun {
    fn fire(&mut self, ammo: &mut AmmoSource<'_>) -> Option<Entity> {
        if self.is_cooling() {
            return None;
        }
        let supply = self.ammo?;
        let projectile = ammo(supply)?;

        self.cooldown_timer.set_interval(self.cooldown);
        self.cooldown_timer.restart();
        Some(projectile)
    }

    fn update(&mut self, dt: f32) {
        self.cooldown_timer.update(dt);
    }

    fn readiness(&self) -> f32 {
        if self.is_cooling() {
            self.cooldown_timer.progress()
        } else {
            1.0
        }
    }

    fn reset(&mut self) {
        self.cooldown_timer.stop();
    }
}

/// Gun with a bounded charge that slowly regenerates (the laser)
#[derive(Debug, Clone, PartialEq)]
pub struct ChargeGun {
    pub gun: Gun,
    max_charge: u32,
    charge: u32,
    charging: Countdown,
}

impl ChargeGun {
    pub fn new(gun: Gun, max_charge: u32, charging_interval: f32) -> Self {
        Self {
            gun,
            max_charge,
            charge: max_charge,
            charging: Countdown::new(charging_interval),
        }
    }

    pub fn charge(&self) -> u32 {
        self.charge
    }

    /// Progress toward the next charge, 0.0..=1.0 (0.0 when full)
    pub fn charging_progress(&self) -> f32 {
        if self.charging.is_running() {
            self.charging.progress()
        } else {
            0.0
        }
    }

    fn start_charging(&mut self) {
        if self.charge < self.max_charge && !self.charging.is_running() {
            self.charging.restart();
        }
    }
}

impl Weapon for ChargeGun {
    fn fire(&mut self, ammo: &mut AmmoSource<'_>) -> Option<Entity> {
        if self.charge == 0 {
            return None;
        }
        let projectile = self.gun.fire(ammo)?;
        self.charge -= 1;
        self.start_charging();
        Some(projectile)
    }

    fn update(&mut self, dt: f32) {
        self.gun.update(dt);

        if self.charging.update(dt) {
            self.charge = (self.charge + 1).min(self.max_charge);
            self.start_charging();
        }
    }

    /// Charge level rather than cooldown: that's what the ammo bar shows
    fn readiness(&self) -> f32 {
        if self.max_charge == 0 {
            return 0.0;
        }
        self.charge as f32 / self.max_charge as f32
    }

    fn reset(&mut self) {
        self.gun.reset();
        self.charging.stop();
        self.charge = self.max_charge;
    }
}

/// The player ship's armament
#[derive(Debug, Clone, PartialEq)]
pub struct Weapons {
    pub machine_gun: Gun,
    pub laser: ChargeGun,
}

impl Weapons {
    pub fn slot_mut(&mut self, slot: WeaponSlot) -> &mut dyn Weapon {
        match slot {
            WeaponSlot::MachineGun => &mut self.machine_gun,
            WeaponSlot::Laser => &mut self.laser,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.machine_gun.update(dt);
        self.laser.update(dt);
    }

    pub fn reset(&mut self) {
        self.machine_gun.reset();
        self.laser.reset();
    }
}

/// Fire `slot` on the live entity `wielder` and put the projectile in the arena.
///
/// The projectile starts at the wielder's position and rotation and flies
/// along its look direction. Returns the projectile id, or `None` when nothing
/// was fired.
pub fn fire_weapon(
    arena: &mut Arena,
    ammo: &mut AmmoSource<'_>,
    wielder: EntityId,
    slot: WeaponSlot,
) -> Option<EntityId> {
    let shooter = arena.get_mut(wielder)?;
    let position = shooter.position();
    let rotation = shooter.rotation();
    let direction = shooter.look_direction();

    let mut projectile = shooter.weapons.as_mut()?.slot_mut(slot).fire(ammo)?;
    projectile.body.position = position;
    projectile.body.rotation = rotation;
    projectile.fire(direction);
    Some(arena.add(projectile))
}
