//! Fixed timestep loop driver
//!
//! Turns variable wall-clock animation frames into a whole number of fixed
//! simulation ticks, and hands out frame handles that go stale the moment the
//! loop is halted.

use crate::consts::{MAX_FRAME_MS, MAX_SUBSTEPS, TICK_MS};

/// Token for one scheduled animation callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHandle {
    generation: u64,
}

/// Accumulates frame time and releases fixed ticks
#[derive(Debug, Clone)]
pub struct LoopDriver {
    tick_ms: f32,
    accumulator: f64,
    last_time: Option<f64>,
    generation: u64,
    armed: bool,
}

impl Default for LoopDriver {
    fn default() -> Self {
        Self::new(TICK_MS)
    }
}

impl LoopDriver {
    pub fn new(tick_ms: f32) -> Self {
        Self {
            tick_ms,
            accumulator: 0.0,
            last_time: None,
            generation: 0,
            armed: false,
        }
    }

    pub fn tick_ms(&self) -> f32 {
        self.tick_ms
    }

    /// Start (or continue) scheduling; returns the handle for the next frame
    pub fn arm(&mut self) -> FrameHandle {
        if !self.armed {
            // Fresh start: don't count the time spent halted
            self.accumulator = 0.0;
            self.last_time = None;
            self.armed = true;
        }
        FrameHandle {
            generation: self.generation,
        }
    }

    /// Handle for the next frame while armed
    pub fn handle(&self) -> Option<FrameHandle> {
        self.armed.then_some(FrameHandle {
            generation: self.generation,
        })
    }

    /// Stop scheduling. Every handle issued so far becomes stale.
    pub fn halt(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.armed = false;
        self.accumulator = 0.0;
        self.last_time = None;
    }

    /// True if `handle` was issued since the last halt
    pub fn is_current(&self, handle: FrameHandle) -> bool {
        self.armed && handle.generation == self.generation
    }

    /// Feed a frame timestamp (ms) and return how many ticks to run now
    pub fn accumulate(&mut self, now_ms: f64) -> u32 {
        let elapsed = match self.last_time {
            Some(last) => (now_ms - last).clamp(0.0, MAX_FRAME_MS),
            // First frame after arming primes the clock
            None => 0.0,
        };
        self.last_time = Some(now_ms);
        self.accumulator += elapsed;

        let step = self.tick_ms as f64;
        let mut ticks = 0;
        while self.accumulator >= step && ticks < MAX_SUBSTEPS {
            self.accumulator -= step;
            ticks += 1;
        }
        if ticks == MAX_SUBSTEPS && self.accumulator >= step {
            log::debug!(
                "Dropping {:.1}ms of simulation backlog",
                self.accumulator
            );
            self.accumulator %= step;
        }
        ticks
    }
}
