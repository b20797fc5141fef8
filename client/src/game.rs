use crate::buffer::{Sample, SnapshotBuffer};
use crate::clock::{ClientClock, ClockState};
use crate::rendering::RenderFrame;
use log::debug;
use shared::{Position, Snapshot};

/// Counters for the client side of the pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientStats {
    pub accepted: u64,
    pub stale_discarded: u64,
    pub pauses: u64,
    pub resumes: u64,
}

/// What one frame of the client pipeline did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// Positions were interpolated with the given factor.
    Interpolated { alpha: f64 },
    /// The render target is older than every buffered snapshot. Positions hold.
    InsufficientHistory,
    /// The clock is paused waiting for data. Positions hold.
    Paused,
}

/// Client-side reconciliation state: admission gate, clock and snapshot buffer
pub struct ClientGameState {
    id: usize,
    clock: ClientClock,
    buffer: SnapshotBuffer,
    last_accepted_tick: Option<u64>,
    interpolation_delay: f64,
    raw_positions: Vec<Position>,
    interpolated_positions: Vec<Position>,
    stats: ClientStats,
}

impl ClientGameState {
    pub fn new(base_tick_duration: f64, interpolation_delay: f64) -> Self {
        Self {
            id: 0,
            clock: ClientClock::new(base_tick_duration),
            buffer: SnapshotBuffer::new(),
            last_accepted_tick: None,
            interpolation_delay,
            raw_positions: Vec::new(),
            interpolated_positions: Vec::new(),
            stats: ClientStats::default(),
        }
    }

    /// Tags this client for presentation when several share one sink.
    pub fn with_id(mut self, id: usize) -> Self {
        self.id = id;
        self
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Admission gate for a delivered snapshot.
    ///
    /// Only snapshots newer than the last accepted one get through; anything
    /// else is discarded without touching the clock or the buffer. An accepted
    /// snapshot resumes a paused clock, feeds the drift controller and enters
    /// the buffer. Returns whether the snapshot was accepted.
    pub fn receive(&mut self, snapshot: Snapshot) -> bool {
        if let Some(last) = self.last_accepted_tick {
            if snapshot.tick <= last {
                self.stats.stale_discarded += 1;
                debug!(
                    "Discarded stale snapshot for tick {} (last accepted {})",
                    snapshot.tick, last
                );
                return false;
            }
        }

        self.last_accepted_tick = Some(snapshot.tick);
        self.stats.accepted += 1;

        if self.clock.is_paused() {
            self.stats.resumes += 1;
        }
        self.clock.on_snapshot_accepted(snapshot.tick);

        self.raw_positions.clone_from(&snapshot.entity_positions);
        self.buffer.push(snapshot);
        true
    }

    /// Runs the client half of one frame.
    ///
    /// Advances the clock, pauses it if the buffer cannot bracket the render
    /// target, otherwise interpolates and trims the buffer.
    pub fn update(&mut self, rdt: f64) -> FrameOutcome {
        if self.clock.is_paused() {
            return FrameOutcome::Paused;
        }
        self.clock.advance(rdt);

        let target = self.render_target();
        let outcome = match self.buffer.sample(target) {
            Sample::Starved => {
                self.clock.pause();
                self.stats.pauses += 1;
                FrameOutcome::Paused
            }
            Sample::InsufficientHistory => FrameOutcome::InsufficientHistory,
            Sample::Interpolated { alpha, positions } => {
                self.interpolated_positions = positions;
                FrameOutcome::Interpolated { alpha }
            }
        };

        self.buffer.trim(target);
        outcome
    }

    /// Fractional tick currently being rendered.
    pub fn render_target(&self) -> f64 {
        self.clock.render_target(self.interpolation_delay)
    }

    pub fn set_interpolation_delay(&mut self, interpolation_delay: f64) {
        self.interpolation_delay = interpolation_delay;
    }

    pub fn set_base_tick_duration(&mut self, base_tick_duration: f64) {
        self.clock.set_base_tick_duration(base_tick_duration);
    }

    pub fn render_frame(&self) -> RenderFrame<'_> {
        RenderFrame {
            client_id: self.id,
            tick: self.clock.tick(),
            paused: self.clock.is_paused(),
            raw: &self.raw_positions,
            interpolated: &self.interpolated_positions,
        }
    }

    pub fn last_accepted_tick(&self) -> Option<u64> {
        self.last_accepted_tick
    }

    pub fn interpolation_delay(&self) -> f64 {
        self.interpolation_delay
    }

    pub fn clock(&self) -> &ClientClock {
        &self.clock
    }

    pub fn clock_state(&self) -> ClockState {
        self.clock.state()
    }

    pub fn buffer(&self) -> &SnapshotBuffer {
        &self.buffer
    }

    pub fn raw_positions(&self) -> &[Position] {
        &self.raw_positions
    }

    pub fn interpolated_positions(&self) -> &[Position] {
        &self.interpolated_positions
    }

    pub fn stats(&self) -> ClientStats {
        self.stats
    }
}
