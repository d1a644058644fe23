//! Asteroid Arena entry point
//!
//! Runs the simulation headless with a scripted pilot and logs what happens.
//!
//! Usage: `asteroid-arena [seed] [tuning.json]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use asteroid_arena::consts::{MAX_SUBSTEPS, SIM_DT};
    use asteroid_arena::sim::{EntityKind, GameEvent, GameSession, RoundState, Supply, TickInput, tick};

    /// Simulated seconds per run
    const RUN_SECONDS: f32 = 180.0;
    /// Pretend display refresh, deliberately off the sim rate
    const FRAME_DT: f32 = 1.0 / 50.0;
    /// Rounds the pilot plays before giving up
    const MAX_ROUNDS: u32 = 5;

    /// Session plus the frame-to-tick accumulator
    pub struct Game {
        session: GameSession,
        accumulator: f32,
        input: TickInput,
        ticks: u64,
        rounds: u32,
        scores: Vec<u64>,
    }

    impl Game {
        pub fn new(session: GameSession) -> Self {
            Self {
                session,
                accumulator: 0.0,
                input: TickInput::default(),
                ticks: 0,
                rounds: 0,
                scores: Vec::new(),
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                self.pilot();
                let input = self.input.clone();
                tick(&mut self.session, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;
                self.ticks += 1;

                // Clear one-shot inputs after processing
                self.input.start_round = false;

                self.report();
            }
        }

        /// Spin, shoot everything, and nudge forward now and then
        fn pilot(&mut self) {
            match self.session.state() {
                RoundState::RoundStarted => {
                    self.input.rotate_right = true;
                    self.input.fire_bullet = true;
                    self.input.fire_laser = self.session.laser_charge() > 0.5;
                    self.input.engage = self.ticks % 120 < 10;
                }
                RoundState::Fresh | RoundState::RoundFinished => {
                    self.input = TickInput::default();
                    // Let the wreck settle for a second between rounds
                    self.input.start_round = self.rounds < MAX_ROUNDS && self.ticks % 60 == 0;
                }
            }
        }

        fn report(&mut self) {
            for event in self.session.drain_events() {
                match event {
                    GameEvent::RoundStarted => {
                        self.rounds += 1;
                        log::info!("Round {} started at tick {}", self.rounds, self.ticks);
                    }
                    GameEvent::RoundFinished { score } => {
                        log::info!("Round {} over at tick {}: score {}", self.rounds, self.ticks, score);
                        self.scores.push(score);
                    }
                    GameEvent::Broken { id, kind, points } => {
                        log::debug!("{:?} {:?} broken for {} points", kind, id, points);
                    }
                    GameEvent::ShotFired { slot } => {
                        log::trace!("{:?} fired", slot);
                    }
                }
            }
        }

        pub fn run(&mut self, seconds: f32) {
            let frames = (seconds / FRAME_DT) as u32;
            for frame in 0..frames {
                self.update(FRAME_DT);
                if frame % 500 == 0 {
                    let arena = self.session.arena();
                    let asteroids = arena.iter().filter(|e| matches!(e.kind, EntityKind::Asteroid(_))).count();
                    let ufos = arena.iter().filter(|e| e.kind == EntityKind::EnemyCraft).count();
                    log::info!(
                        "t={:.1}s state={:?} score={} entities={} asteroids={} ufos={}",
                        frame as f32 * FRAME_DT,
                        self.session.state(),
                        self.session.score(),
                        arena.len(),
                        asteroids,
                        ufos
                    );
                }
            }
        }

        pub fn summary(&self) {
            let best = self.scores.iter().max().copied().unwrap_or(0);
            println!(
                "Simulated {} ticks, {} rounds, scores {:?}, best {}",
                self.ticks, self.rounds, self.scores, best
            );
            if self.session.state() == RoundState::RoundStarted {
                println!("Round {} still running with score {}", self.rounds, self.session.score());
            }

            let pools = self.session.spawner().pools();
            for supply in [
                Supply::LargeAsteroid,
                Supply::MediumAsteroid,
                Supply::SmallAsteroid,
                Supply::Ufo,
                Supply::Blast,
                Supply::Bullet,
                Supply::LaserRay,
            ] {
                let pool = pools.get(supply);
                log::info!("{:?} pool: {} built, {} out", supply, pool.created(), pool.outstanding());
            }
        }
    }

    pub fn run_seconds() -> f32 {
        RUN_SECONDS
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use asteroid_arena::Tuning;
    use asteroid_arena::sim::GameSession;

    env_logger::init();
    log::info!("Asteroid Arena (headless) starting...");

    let mut args = std::env::args().skip(1);
    let seed = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(seed)) => seed,
        Some(Err(err)) => {
            eprintln!("Invalid seed: {err}");
            std::process::exit(2);
        }
        None => 0x5eed,
    };

    let tuning = match args.next() {
        Some(path) => {
            let json = std::fs::read_to_string(&path).unwrap_or_else(|err| {
                eprintln!("Cannot read {path}: {err}");
                std::process::exit(2);
            });
            Tuning::from_json(&json).unwrap_or_else(|err| {
                eprintln!("{path}: {err}");
                std::process::exit(2);
            })
        }
        None => Tuning::default(),
    };

    log::info!("Seed {seed}");
    let mut game = headless::Game::new(GameSession::new(tuning, seed));
    game.run(headless::run_seconds());
    game.summary();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser front end; the library is the product on this target
}
