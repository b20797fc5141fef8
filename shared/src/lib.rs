//! Types shared by the server tick loop, the simulated transport and the
//! client reconciliation pipeline.

use serde::{Deserialize, Serialize};

pub mod config;
pub mod error;
pub mod rng;
pub mod transport;

pub use config::{NetworkConditions, SimulationConfig};
pub use error::{ConfigError, Result};
pub use rng::{RandomSource, SeededRandom};
pub use transport::{InFlightMessage, SimulatedTransport, TransportStats};

pub const DEFAULT_TICK_RATE_HZ: f64 = 20.0;
pub const DEFAULT_LATENCY_MS: f64 = 100.0;
pub const DEFAULT_JITTER_MS: f64 = 20.0;
pub const DEFAULT_PACKET_LOSS: f64 = 0.05;
pub const DEFAULT_INTERPOLATION_DELAY_TICKS: f64 = 2.0;
pub const DEFAULT_ENTITY_COUNT: usize = 8;

/// Number of offset samples averaged by the client drift controller.
pub const OFFSET_WINDOW_SIZE: usize = 5;
/// Proportional gain applied to the averaged clock offset.
pub const DRIFT_GAIN: f64 = 0.01;
/// Lower bound of the client tick duration as a fraction of the base duration.
pub const MIN_TICK_DURATION_RATIO: f64 = 0.9;

/// Entity position in the unit square.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Linear interpolation, exact at both ends of the unit interval.
pub fn lerp(a: f32, b: f32, alpha: f32) -> f32 {
    if alpha == 1.0 {
        return b;
    }
    a + (b - a) * alpha
}

/// Component-wise [`lerp`] between two positions.
pub fn lerp_position(a: Position, b: Position, alpha: f32) -> Position {
    Position {
        x: lerp(a.x, b.x, alpha),
        y: lerp(a.y, b.y, alpha),
    }
}

/// Complete entity state at one server tick. Never mutated after it is sent.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Snapshot {
    pub tick: u64,
    pub entity_positions: Vec<Position>,
}

impl Snapshot {
    pub fn new(tick: u64, entity_positions: Vec<Position>) -> Self {
        Self {
            tick,
            entity_positions,
        }
    }
}

/// Wire frame carried by the simulated transport.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub enum Packet {
    Snapshot(Snapshot),
}
