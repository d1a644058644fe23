//! Simulation clocks
//!
//! Both flavors advance only when the owner feeds them elapsed sim time, so
//! pausing the simulation pauses every timer for free.

/// One-shot countdown: runs for `interval` seconds, reports completion once, then stops
#[derive(Debug, Clone, PartialEq)]
pub struct Countdown {
    interval: f32,
    elapsed: f32,
    running: bool,
}

impl Countdown {
    /// A stopped countdown
    pub fn new(interval: f32) -> Self {
        Self {
            interval: interval.max(0.0),
            elapsed: 0.0,
            running: false,
        }
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Takes effect on the next `restart`
    pub fn set_interval(&mut self, interval: f32) {
        self.interval = interval.max(0.0);
    }

    /// Resume without clearing elapsed time
    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Clear elapsed time and run from zero
    pub fn restart(&mut self) {
        self.elapsed = 0.0;
        self.running = true;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Fraction of the interval already run, 0.0..=1.0
    pub fn progress(&self) -> f32 {
        if self.interval <= 0.0 {
            return if self.running { 0.0 } else { 1.0 };
        }
        (self.elapsed / self.interval).clamp(0.0, 1.0)
    }

    /// Advance; returns true on the update that completes the countdown
    pub fn update(&mut self, dt: f32) -> bool {
        if !self.running {
            return false;
        }
        self.elapsed += dt;
        if self.elapsed >= self.interval {
            self.elapsed = self.interval;
            self.running = false;
            return true;
        }
        false
    }
}

/// Repeating clock: ticks every `interval` seconds and keeps going
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuousClock {
    interval: f32,
    elapsed: f32,
    running: bool,
}

impl ContinuousClock {
    /// A stopped clock
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            elapsed: 0.0,
            running: false,
        }
    }

    /// Resume without clearing elapsed time
    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn restart(&mut self) {
        self.elapsed = 0.0;
        self.running = true;
    }

    /// Advance; returns how many ticks elapsed during `dt`
    pub fn update(&mut self, dt: f32) -> u32 {
        if !self.running || self.interval <= 0.0 {
            return 0;
        }
        self.elapsed += dt;
        let mut ticks = 0;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            ticks += 1;
        }
        ticks
    }
}

/// A set of continuous clocks, each bound to the event it fires
#[derive(Debug, Clone, Default)]
pub struct Timers<E: Copy> {
    clocks: Vec<(ContinuousClock, E)>,
}

impl<E: Copy> Timers<E> {
    pub fn new() -> Self {
        Self { clocks: Vec::new() }
    }

    /// Register a clock; it stays stopped until `restart`
    pub fn add(&mut self, event: E, interval: f32) {
        self.clocks.push((ContinuousClock::new(interval), event));
    }

    pub fn stop(&mut self) {
        for (clock, _) in &mut self.clocks {
            clock.stop();
        }
    }

    pub fn restart(&mut self) {
        for (clock, _) in &mut self.clocks {
            clock.restart();
        }
    }

    /// Advance every clock, returning fired events in registration order
    pub fn update(&mut self, dt: f32) -> Vec<E> {
        let mut fired = Vec::new();
        for (clock, event) in &mut self.clocks {
            for _ in 0..clock.update(dt) {
                fired.push(*event);
            }
        }
        fired
    }
}
