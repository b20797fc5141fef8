//! # Authoritative Server
//!
//! This library provides the authoritative half of the netcode simulation. It
//! owns the canonical world state, advances it at a fixed tick rate and hands
//! snapshots of that state to the simulated transport of every client.
//!
//! ## Core Responsibilities
//!
//! ### Authoritative Simulation
//! The server runs the definitive version of the world. Clients never modify
//! it; they only receive snapshots and reconstruct a smooth view from them.
//! The world itself is a toy: balls bouncing inside the unit square. Only its
//! data contract matters to the rest of the pipeline, one position per entity
//! per tick.
//!
//! ### Fixed Timestep
//! Real frame time is accumulated and spent in whole ticks. A tick only runs
//! once the accumulator strictly exceeds the tick duration, and the same
//! sequence of ticks occurs however the frames are spaced.
//!
//! ### Snapshot Dispatch
//! When one or more ticks ran in a frame, exactly one snapshot of the latest
//! state is sent to each client link. Intermediate ticks are not sent
//! individually.
//!
//! ## Module Organization
//!
//! ### Game Module (`game`)
//! - World state with ball positions and velocities
//! - Wall reflection physics
//! - Snapshot construction
//!
//! ### Network Module (`network`)
//! - Tick accumulator and tick rate changes
//! - Broadcast of snapshots over the simulated transports
//!
//! ## Usage Example
//!
//! ```rust
//! use server::game::GameState;
//! use server::network::Server;
//! use shared::{NetworkConditions, SeededRandom, SimulatedTransport};
//!
//! let mut rng = SeededRandom::new(7);
//! let world = GameState::with_random_balls(4, &mut rng);
//! let mut server = Server::new(20.0, world).expect("valid tick rate");
//! let mut links = vec![SimulatedTransport::new()];
//!
//! // a 20 Hz tick needs more than three 60 Hz frames of accumulated time
//! let conditions = NetworkConditions::perfect(80.0);
//! for _ in 0..4 {
//!     if let Some(snapshot) = server.update(1.0 / 60.0) {
//!         server.broadcast(&snapshot, &mut links, &conditions, &mut rng);
//!     }
//! }
//! assert_eq!(server.tick(), 1);
//! ```

pub mod game;
pub mod network;

pub use game::{Ball, GameState};
pub use network::Server;
