//! Frame time sources

use std::time::Instant;

/// Supplies a monotonically increasing timestamp in seconds, once per frame.
pub trait TimeSource {
    fn now(&mut self) -> f64;
}

/// Wall-clock time since creation.
#[derive(Debug, Clone)]
pub struct SystemTimeSource {
    start: Instant,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemTimeSource {
    fn now(&mut self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Time that only moves when told to.
#[derive(Debug, Clone, Default)]
pub struct ManualTimeSource {
    now: f64,
}

impl ManualTimeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, seconds: f64) {
        self.now += seconds;
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&mut self) -> f64 {
        self.now
    }
}

/// Turns successive timestamps into frame deltas.
#[derive(Debug, Clone, Default)]
pub struct FrameTimer {
    last: Option<f64>,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous call. The first call sets the baseline and
    /// returns zero.
    pub fn delta(&mut self, now: f64) -> f64 {
        let rdt = match self.last {
            Some(last) => (now - last).max(0.0),
            None => 0.0,
        };
        self.last = Some(now);
        rdt
    }
}
