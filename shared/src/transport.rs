//! Simulated unreliable channel between the server and one client
//!
//! Loss is decided once, at send time. A message that survives gets an
//! independently drawn delay, so delivery order can differ from send order.
//! Nothing is ever retried.

use crate::config::NetworkConditions;
use crate::rng::RandomSource;
use crate::{Packet, Snapshot};
use bincode::{deserialize, serialize};
use log::{trace, warn};

/// A scheduled message. The snapshot is held as an encoded wire frame so the
/// receiver always gets its own copy.
#[derive(Debug, Clone)]
pub struct InFlightMessage {
    payload: Vec<u8>,
    time_remaining: f64,
}

impl InFlightMessage {
    /// Seconds until delivery. Zero or negative means due.
    pub fn time_remaining(&self) -> f64 {
        self.time_remaining
    }

    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }
}

/// Counters describing what the channel did with the traffic it was given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransportStats {
    pub sent: u64,
    pub dropped: u64,
    pub delivered: u64,
    pub decode_failures: u64,
}

#[derive(Debug, Default)]
pub struct SimulatedTransport {
    in_flight: Vec<InFlightMessage>,
    stats: TransportStats,
}

impl SimulatedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands a snapshot to the channel.
    ///
    /// Returns `true` if the message was scheduled and `false` if the channel
    /// dropped it. A drop is a modelled outcome, not an error.
    pub fn send(
        &mut self,
        snapshot: &Snapshot,
        conditions: &NetworkConditions,
        rng: &mut dyn RandomSource,
    ) -> bool {
        self.stats.sent += 1;

        if rng.chance(conditions.packet_loss) {
            self.stats.dropped += 1;
            trace!("Dropped snapshot for tick {}", snapshot.tick);
            return false;
        }

        let jitter_ms = rng.uniform(-conditions.jitter_ms, conditions.jitter_ms);
        let delay = (conditions.latency_ms / 2.0 + jitter_ms) / 1000.0;

        let payload = match serialize(&Packet::Snapshot(snapshot.clone())) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to encode snapshot for tick {}: {}", snapshot.tick, e);
                return false;
            }
        };

        trace!(
            "Scheduled snapshot for tick {} with {:.1}ms delay",
            snapshot.tick,
            delay * 1000.0
        );
        self.in_flight.push(InFlightMessage {
            payload,
            time_remaining: delay,
        });
        true
    }

    /// Advances channel time by `dt` seconds and passes every message that is
    /// now due to `receive`, in the order the messages were sent.
    ///
    /// Returns the number of snapshots delivered.
    pub fn advance<F>(&mut self, dt: f64, mut receive: F) -> usize
    where
        F: FnMut(Snapshot),
    {
        for message in &mut self.in_flight {
            message.time_remaining -= dt;
        }

        let (due, pending): (Vec<_>, Vec<_>) = self
            .in_flight
            .drain(..)
            .partition(|message| message.time_remaining <= 0.0);
        self.in_flight = pending;

        let mut delivered = 0;
        for message in due {
            match deserialize::<Packet>(&message.payload) {
                Ok(Packet::Snapshot(snapshot)) => {
                    self.stats.delivered += 1;
                    delivered += 1;
                    receive(snapshot);
                }
                Err(e) => {
                    self.stats.decode_failures += 1;
                    warn!("Failed to decode in-flight message: {}", e);
                }
            }
        }
        delivered
    }

    /// Messages still travelling, in send order.
    pub fn in_flight(&self) -> &[InFlightMessage] {
        &self.in_flight
    }

    pub fn pending(&self) -> usize {
        self.in_flight.len()
    }

    pub fn stats(&self) -> TransportStats {
        self.stats
    }
}
