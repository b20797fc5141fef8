//! Fixed-timestep server loop and snapshot dispatch to client links

use crate::game::GameState;
use log::{debug, trace};
use shared::{ConfigError, NetworkConditions, RandomSource, SimulatedTransport, Snapshot};

/// Authoritative server advancing the world at a fixed tick rate
///
/// Frame time is accumulated and spent in whole ticks, so the sequence of
/// ticks is the same however the frames are spaced. At most one snapshot is
/// produced per frame, taken from the latest state.
pub struct Server {
    game_state: GameState,
    tick_duration: f64,
    tick_accumulator: f64,
    snapshots_sent: u64,
}

impl Server {
    pub fn new(tick_rate_hz: f64, game_state: GameState) -> Result<Self, ConfigError> {
        Ok(Server {
            game_state,
            tick_duration: Self::duration_for(tick_rate_hz)?,
            tick_accumulator: 0.0,
            snapshots_sent: 0,
        })
    }

    fn duration_for(tick_rate_hz: f64) -> Result<f64, ConfigError> {
        if !tick_rate_hz.is_finite() || tick_rate_hz <= 0.0 {
            return Err(ConfigError::InvalidTickRate(tick_rate_hz));
        }
        Ok(1.0 / tick_rate_hz)
    }

    /// Changes the tick rate. The accumulator is kept, so time already
    /// elapsed is spent at the new rate.
    pub fn set_tick_rate(&mut self, tick_rate_hz: f64) -> Result<(), ConfigError> {
        self.tick_duration = Self::duration_for(tick_rate_hz)?;
        debug!("Server tick rate set to {} Hz", tick_rate_hz);
        Ok(())
    }

    /// Spends `rdt` seconds of real time on whole ticks.
    ///
    /// Returns a snapshot of the latest state if at least one tick ran.
    pub fn update(&mut self, rdt: f64) -> Option<Snapshot> {
        self.tick_accumulator += rdt;

        let mut ticks_run = 0;
        while self.tick_accumulator > self.tick_duration {
            self.tick_accumulator -= self.tick_duration;
            self.game_state.step(self.tick_duration as f32);
            ticks_run += 1;
        }

        if ticks_run == 0 {
            return None;
        }
        if ticks_run > 1 {
            trace!(
                "Ran {} ticks in one frame, sending tick {} only",
                ticks_run,
                self.game_state.tick
            );
        }
        Some(self.game_state.snapshot())
    }

    /// Hands one copy of `snapshot` to every client link.
    ///
    /// Returns how many links scheduled it; the rest dropped it.
    pub fn broadcast(
        &mut self,
        snapshot: &Snapshot,
        links: &mut [SimulatedTransport],
        conditions: &NetworkConditions,
        rng: &mut dyn RandomSource,
    ) -> usize {
        self.snapshots_sent += 1;

        let mut scheduled = 0;
        for link in links.iter_mut() {
            if link.send(snapshot, conditions, &mut *rng) {
                scheduled += 1;
            }
        }
        scheduled
    }

    pub fn tick(&self) -> u64 {
        self.game_state.tick
    }

    pub fn tick_duration(&self) -> f64 {
        self.tick_duration
    }

    pub fn tick_accumulator(&self) -> f64 {
        self.tick_accumulator
    }

    pub fn snapshots_sent(&self) -> u64 {
        self.snapshots_sent
    }

    pub fn game_state(&self) -> &GameState {
        &self.game_state
    }
}
