//! Client logical clock with drift correction
//!
//! The clock counts ticks the way the server does, but its tick duration is
//! adjusted continuously from the measured disagreement between its own time
//! and the ticks of the snapshots it accepts. When it runs ahead of the data
//! it pauses, and the next accepted snapshot snaps it back into place.

use log::debug;
use shared::{DRIFT_GAIN, MIN_TICK_DURATION_RATIO, OFFSET_WINDOW_SIZE};
use std::collections::VecDeque;

/// Bounded FIFO of clock offset samples.
#[derive(Debug, Clone)]
pub struct OffsetWindow {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl OffsetWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Adds a sample, evicting the oldest one when full.
    pub fn push(&mut self, offset: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(offset);
    }

    /// Mean of the retained samples, zero when empty.
    pub fn mean(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }
}

impl Default for OffsetWindow {
    fn default() -> Self {
        Self::new(OFFSET_WINDOW_SIZE)
    }
}

/// Copy of the clock's state for inspection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockState {
    pub tick: u64,
    pub accumulator: f64,
    pub tick_duration: f64,
    pub paused: bool,
}

#[derive(Debug, Clone)]
pub struct ClientClock {
    tick: u64,
    accumulator: f64,
    tick_duration: f64,
    base_tick_duration: f64,
    paused: bool,
    offsets: OffsetWindow,
}

impl ClientClock {
    /// Creates a running clock at tick zero.
    pub fn new(base_tick_duration: f64) -> Self {
        Self {
            tick: 0,
            accumulator: 0.0,
            tick_duration: base_tick_duration,
            base_tick_duration,
            paused: false,
            offsets: OffsetWindow::default(),
        }
    }

    /// Accounts for an accepted snapshot of `server_tick`.
    ///
    /// Resumes a paused clock at that tick, then samples the offset between
    /// the server tick and client time and re-applies drift correction.
    pub fn on_snapshot_accepted(&mut self, server_tick: u64) -> f64 {
        if self.paused {
            self.resume_at(server_tick);
        }

        let offset = server_tick as f64 - self.sub_tick();
        self.offsets.push(offset);
        self.apply_drift_correction();
        offset
    }

    fn resume_at(&mut self, server_tick: u64) {
        debug!("Clock resumed at tick {}", server_tick);
        self.tick = server_tick;
        self.accumulator = 0.0;
        self.paused = false;
    }

    /// Speeds the clock up while it is behind the server, by at most 10%.
    /// Slowing down is not bounded.
    fn apply_drift_correction(&mut self) {
        let base = self.base_tick_duration;
        let average = self.offsets.mean();
        self.tick_duration = f64::max(
            base * MIN_TICK_DURATION_RATIO,
            base - DRIFT_GAIN * average * base,
        );
    }

    /// Advances by `rdt` seconds of real time. Does nothing while paused.
    pub fn advance(&mut self, rdt: f64) {
        if self.paused {
            return;
        }
        self.accumulator += rdt;
        while self.accumulator > self.tick_duration {
            self.accumulator -= self.tick_duration;
            self.tick += 1;
        }
    }

    /// Stops the clock until the next accepted snapshot.
    pub fn pause(&mut self) {
        if !self.paused {
            debug!("Clock paused at tick {}", self.tick);
            self.paused = true;
        }
    }

    /// Changes the nominal tick duration, e.g. after a tick rate change.
    pub fn set_base_tick_duration(&mut self, base_tick_duration: f64) {
        self.base_tick_duration = base_tick_duration;
        self.apply_drift_correction();
    }

    /// Client time in fractional ticks.
    pub fn sub_tick(&self) -> f64 {
        self.tick as f64 + self.accumulator / self.tick_duration
    }

    /// Fractional tick to render, `interpolation_delay` ticks behind client time.
    pub fn render_target(&self, interpolation_delay: f64) -> f64 {
        self.sub_tick() - interpolation_delay
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    pub fn tick_duration(&self) -> f64 {
        self.tick_duration
    }

    pub fn base_tick_duration(&self) -> f64 {
        self.base_tick_duration
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn offsets(&self) -> &OffsetWindow {
        &self.offsets
    }

    pub fn state(&self) -> ClockState {
        ClockState {
            tick: self.tick,
            accumulator: self.accumulator,
            tick_duration: self.tick_duration,
            paused: self.paused,
        }
    }
}
