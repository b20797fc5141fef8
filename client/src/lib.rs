//! # Client Reconciliation Library
//!
//! This library provides the client half of the netcode simulation: it turns
//! a lossy, jittery, possibly reordered stream of server snapshots into a
//! smooth view of the authoritative world.
//!
//! ## Architecture Overview
//!
//! ### Admission Gate
//! Every delivered snapshot passes through a gate that accepts only snapshots
//! newer than the last accepted one. Late and duplicate arrivals are discarded
//! silently (and counted) without touching any other state.
//!
//! ### Clock and Drift Correction
//! The client keeps its own logical tick clock. Each accepted snapshot gives a
//! sample of how far the client clock disagrees with the server. The last five
//! samples are averaged and the clock's tick duration is nudged to close the
//! gap, speeding up by at most 10% when behind. When the clock runs out of data
//! it pauses, and the next accepted snapshot snaps it to that snapshot's tick.
//!
//! ### Interpolation
//! Rendering deliberately lags the clock by a configurable number of ticks.
//! The snapshot buffer finds the two snapshots around that render target and
//! blends entity positions linearly between them. Nothing is ever
//! extrapolated past the newest snapshot.
//!
//! ## Module Organization
//!
//! ### Clock Module (`clock`)
//! - Fractional tick clock with fixed-step accumulator
//! - Bounded offset sample window
//! - Drift correction law and pause/resume transitions
//!
//! ### Buffer Module (`buffer`)
//! - Ascending snapshot storage
//! - Bracket search and linear interpolation
//! - Trimming of unreachable history
//!
//! ### Game Module (`game`)
//! - Admission gate and per-frame pipeline
//! - Raw and interpolated positions for presentation
//! - Observability counters
//!
//! ### Rendering Module (`rendering`)
//! - Render sink contract, entities bound by index
//! - Logging and recording sinks
//!
//! ## Usage Example
//!
//! ```rust
//! use client::game::{ClientGameState, FrameOutcome};
//! use shared::{Position, Snapshot};
//!
//! let mut client = ClientGameState::new(0.05, 1.0);
//!
//! // nothing buffered yet: the clock pauses
//! assert_eq!(client.update(0.016), FrameOutcome::Paused);
//!
//! // the first accepted snapshot resumes it at the snapshot's tick
//! client.receive(Snapshot::new(12, vec![Position::new(0.5, 0.5)]));
//! assert_eq!(client.clock().tick(), 12);
//! assert!(!client.clock().is_paused());
//! ```

pub mod buffer;
pub mod clock;
pub mod game;
pub mod rendering;

pub use buffer::{interpolate_positions, Bracket, Sample, SnapshotBuffer};
pub use clock::{ClientClock, ClockState, OffsetWindow};
pub use game::{ClientGameState, ClientStats, FrameOutcome};
pub use rendering::{LogSink, RecordedFrame, RecordingSink, RenderFrame, RenderSink};
