//! Game session: round state machine, score and spawn timers
//!
//! The session owns the arena and the spawner side by side so contact
//! reactions can borrow both. After every arena tick it polls the spawner for
//! breakages, applies their hooks, and hands removed pooled entities back.

use super::arena::Arena;
use super::entity::{Entity, EntityId};
use super::factory;
use super::gun::{self, Weapon, WeaponSlot};
use super::physics::{KinematicWorld, PhysicsBackend};
use super::spawner::Spawner;
use super::state::{BrokenHook, GameEvent, RoundState};
use super::timers::Timers;
use crate::error::{Result, SimError};
use crate::tuning::Tuning;

/// What a spawn clock asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnEvent {
    LargeAsteroid,
    Ufo,
}

#[derive(Debug)]
pub struct GameSession {
    state: RoundState,
    score: u64,
    arena: Arena,
    spawner: Spawner,
    timers: Timers<SpawnEvent>,
    /// Player ship, or the demo ship before the first round
    ship: Option<EntityId>,
    events: Vec<GameEvent>,
}

impl GameSession {
    /// New session in the `Fresh` state with the demo running
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        Self::with_backend(tuning, seed, Box::new(KinematicWorld::new()))
    }

    pub fn with_backend(tuning: Tuning, seed: u64, backend: Box<dyn PhysicsBackend>) -> Self {
        let mut timers = Timers::new();
        timers.add(SpawnEvent::LargeAsteroid, tuning.round.asteroid_spawn_interval);
        timers.add(SpawnEvent::Ufo, tuning.round.ufo_spawn_interval);

        let mut session = Self {
            state: RoundState::Fresh,
            score: 0,
            arena: Arena::with_backend(tuning.arena.size(), backend),
            spawner: Spawner::new(tuning, seed),
            timers,
            ship: None,
            events: Vec::new(),
        };
        session.show_demo();
        session
    }

    fn show_demo(&mut self) {
        let tuning = self.spawner.tuning();
        let (arena, ship) = (tuning.arena.clone(), tuning.ship.clone());
        let demo = factory::new_demo_starship(self.spawner.rng(), &arena, &ship);
        self.ship = Some(self.arena.add(demo));
        self.spawner.spawn_initial_asteroids(&mut self.arena);
        log::info!("Demo started with {} entities", self.arena.len());
    }

    /// Advance the whole simulation by `dt`
    pub fn update(&mut self, dt: f32) {
        for event in self.timers.update(dt) {
            match event {
                SpawnEvent::LargeAsteroid => {
                    self.spawner.spawn_large_asteroid(&mut self.arena);
                }
                SpawnEvent::Ufo => {
                    self.spawner.spawn_ufo(&mut self.arena);
                }
            }
        }

        self.arena.tick(dt, &mut self.spawner);
        self.apply_breakages();
        self.spawner.reclaim(self.arena.take_released());
    }

    fn apply_breakages(&mut self) {
        for breakage in self.spawner.take_breakages() {
            self.events.push(GameEvent::Broken {
                id: breakage.id,
                kind: breakage.kind,
                points: breakage.points,
            });
            match breakage.hook {
                Some(BrokenHook::AddScore) if self.state == RoundState::RoundStarted => {
                    self.score += u64::from(breakage.points);
                }
                Some(BrokenHook::FinishRound) => self.finish_round(),
                _ => {}
            }
        }
    }

    /// Clear the arena and start a new round with a fresh ship at the center
    pub fn start_round(&mut self) -> Result<()> {
        if self.state == RoundState::RoundStarted {
            return Err(SimError::InvalidState {
                operation: "start a round",
                state: self.state,
            });
        }

        self.state = RoundState::RoundStarted;
        self.score = 0;

        self.arena.clear();
        self.spawner.reclaim(self.arena.take_released());
        // Breakages from the previous round no longer count
        self.spawner.take_breakages();

        let tuning = self.spawner.tuning();
        let mut ship = factory::new_starship(&tuning.ship);
        ship.body.position = tuning.arena.center();
        if let Some(breakable) = ship.breakable.as_mut() {
            breakable.on_broken = Some(BrokenHook::FinishRound);
        }
        let ship = self.arena.add(ship);
        self.ship = Some(ship);
        self.spawner.set_player(Some(ship));

        self.timers.restart();
        self.spawner.spawn_initial_asteroids(&mut self.arena);

        log::info!("Round started with {} entities", self.arena.len());
        self.events.push(GameEvent::RoundStarted);
        Ok(())
    }

    /// End the current round; no-op unless a round is running
    pub fn finish_round(&mut self) {
        if self.state != RoundState::RoundStarted {
            return;
        }
        self.state = RoundState::RoundFinished;
        self.timers.stop();

        log::info!("Round finished with score {}", self.score);
        self.events.push(GameEvent::RoundFinished { score: self.score });
    }

    fn ship_mut(&mut self) -> Option<&mut Entity> {
        self.arena.get_mut(self.ship?)
    }

    pub fn engage(&mut self) {
        if let Some(ship) = self.ship_mut() {
            ship.engage();
        }
    }

    pub fn rotate_left(&mut self, dt: f32) {
        if let Some(ship) = self.ship_mut() {
            ship.rotate_left(dt);
        }
    }

    pub fn rotate_right(&mut self, dt: f32) {
        if let Some(ship) = self.ship_mut() {
            ship.rotate_right(dt);
        }
    }

    /// Pull the trigger on one of the ship's weapons
    pub fn fire(&mut self, slot: WeaponSlot) -> Option<EntityId> {
        let ship = self.ship?;
        let spawner = &mut self.spawner;
        let projectile = gun::fire_weapon(&mut self.arena, &mut |supply| spawner.obtain(supply), ship, slot)?;
        self.events.push(GameEvent::ShotFired { slot });
        Some(projectile)
    }

    pub fn fire_bullet(&mut self) -> Option<EntityId> {
        self.fire(WeaponSlot::MachineGun)
    }

    pub fn fire_laser(&mut self) -> Option<EntityId> {
        self.fire(WeaponSlot::Laser)
    }

    /// Events since the last call, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// The live ship, if any
    pub fn ship(&self) -> Option<&Entity> {
        self.arena.get(self.ship?)
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn spawner(&self) -> &Spawner {
        &self.spawner
    }

    pub fn tuning(&self) -> &Tuning {
        self.spawner.tuning()
    }

    /// Machine gun readiness, 0.0 (just fired) ..= 1.0
    pub fn bullet_cooldown(&self) -> f32 {
        self.ship()
            .and_then(|ship| ship.weapons.as_ref())
            .map_or(0.0, |weapons| weapons.machine_gun.readiness())
    }

    /// Laser charge as a fraction of its maximum
    pub fn laser_charge(&self) -> f32 {
        self.ship()
            .and_then(|ship| ship.weapons.as_ref())
            .map_or(0.0, |weapons| weapons.laser.readiness())
    }

    /// Progress toward the next laser charge
    pub fn laser_charging_progress(&self) -> f32 {
        self.ship()
            .and_then(|ship| ship.weapons.as_ref())
            .map_or(0.0, |weapons| weapons.laser.charging_progress())
    }
}
