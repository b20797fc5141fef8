//! Runtime configuration surface of the simulation
//!
//! Every value is validated before it is applied. Out-of-range values are
//! rejected with a [`ConfigError`], never clamped.

use crate::error::{ConfigError, Result};
use crate::{
    DEFAULT_INTERPOLATION_DELAY_TICKS, DEFAULT_JITTER_MS, DEFAULT_LATENCY_MS,
    DEFAULT_PACKET_LOSS, DEFAULT_TICK_RATE_HZ,
};
use serde::{Deserialize, Serialize};

/// Per-message behaviour of the simulated channel.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct NetworkConditions {
    /// Round-trip latency. One-way delay is half of this.
    pub latency_ms: f64,
    /// Half-width of the uniform delay noise.
    pub jitter_ms: f64,
    /// Probability that a message is dropped at send time.
    pub packet_loss: f64,
}

impl NetworkConditions {
    pub fn new(latency_ms: f64, jitter_ms: f64, packet_loss: f64) -> Result<Self> {
        let conditions = Self {
            latency_ms,
            jitter_ms,
            packet_loss,
        };
        conditions.validate()?;
        Ok(conditions)
    }

    /// A lossless channel with a fixed one-way delay of `latency_ms / 2`.
    pub fn perfect(latency_ms: f64) -> Self {
        Self {
            latency_ms,
            jitter_ms: 0.0,
            packet_loss: 0.0,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.latency_ms.is_finite() || self.latency_ms < 0.0 {
            return Err(ConfigError::NegativeLatency(self.latency_ms));
        }
        if !self.jitter_ms.is_finite() || self.jitter_ms < 0.0 {
            return Err(ConfigError::NegativeJitter(self.jitter_ms));
        }
        if !(0.0..=1.0).contains(&self.packet_loss) {
            return Err(ConfigError::PacketLossOutOfRange(self.packet_loss));
        }
        Ok(())
    }
}

impl Default for NetworkConditions {
    fn default() -> Self {
        Self {
            latency_ms: DEFAULT_LATENCY_MS,
            jitter_ms: DEFAULT_JITTER_MS,
            packet_loss: DEFAULT_PACKET_LOSS,
        }
    }
}

/// Full configuration surface. Changes take effect on the next frame.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    pub tick_rate_hz: f64,
    pub latency_ms: f64,
    pub jitter_ms: f64,
    pub packet_loss: f64,
    pub interpolation_delay_ticks: f64,
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.tick_rate_hz.is_finite() || self.tick_rate_hz <= 0.0 {
            return Err(ConfigError::InvalidTickRate(self.tick_rate_hz));
        }
        self.conditions().validate()?;
        let delay = self.interpolation_delay_ticks;
        if !delay.is_finite() || delay < 0.0 {
            return Err(ConfigError::NegativeInterpolationDelay(
                self.interpolation_delay_ticks,
            ));
        }
        Ok(())
    }

    /// Seconds per server tick.
    pub fn tick_duration(&self) -> f64 {
        1.0 / self.tick_rate_hz
    }

    pub fn conditions(&self) -> NetworkConditions {
        NetworkConditions {
            latency_ms: self.latency_ms,
            jitter_ms: self.jitter_ms,
            packet_loss: self.packet_loss,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: DEFAULT_TICK_RATE_HZ,
            latency_ms: DEFAULT_LATENCY_MS,
            jitter_ms: DEFAULT_JITTER_MS,
            packet_loss: DEFAULT_PACKET_LOSS,
            interpolation_delay_ticks: DEFAULT_INTERPOLATION_DELAY_TICKS,
        }
    }
}
