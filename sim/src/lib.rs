//! # Netcode Simulation Driver
//!
//! Wires the server, the simulated links and the clients into one frame
//! pipeline and runs it, either step by step or from a real-time timer.
//!
//! ## Frame Order
//!
//! Every frame runs the same fixed sequence:
//! 1. The server spends the frame time on whole ticks and dispatches at most
//!    one snapshot to every link
//! 2. Each link advances and delivers due snapshots to its client's admission gate
//! 3. Each client advances its clock, pauses or interpolates, and trims its buffer
//! 4. Each client's raw and interpolated positions are handed to the render sink
//!
//! Configuration changes are validated when they are made and take effect at
//! the start of the next frame.
//!
//! ## Usage Example
//!
//! ```rust
//! use client::RecordingSink;
//! use shared::{SeededRandom, SimulationConfig};
//! use sim::FrameDriver;
//!
//! let mut driver = FrameDriver::new(
//!     SimulationConfig::default(),
//!     4,
//!     1,
//!     Box::new(SeededRandom::new(7)),
//! )
//! .unwrap();
//! let mut sink = RecordingSink::new();
//!
//! for _ in 0..120 {
//!     driver.step(1.0 / 60.0, &mut sink);
//! }
//!
//! let view = driver.debug_view();
//! assert_eq!(view.frames, 120);
//! assert!(view.server_tick > 0);
//! ```

pub mod driver;
pub mod realtime;
pub mod time;

pub use driver::{ClientDebugView, DebugView, FrameDriver, FrameReport};
pub use realtime::run_realtime;
pub use time::{FrameTimer, ManualTimeSource, SystemTimeSource, TimeSource};
