//! Error types for configuration of the netcode simulation

use thiserror::Error;

/// Rejected configuration value. Values are never clamped into range.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("tick rate must be positive and finite, got {0} Hz")]
    InvalidTickRate(f64),

    #[error("latency must be a non-negative number of milliseconds, got {0}")]
    NegativeLatency(f64),

    #[error("jitter must be a non-negative number of milliseconds, got {0}")]
    NegativeJitter(f64),

    #[error("packet loss must be a probability in [0, 1], got {0}")]
    PacketLossOutOfRange(f64),

    #[error("interpolation delay must be a non-negative number of ticks, got {0}")]
    NegativeInterpolationDelay(f64),

    #[error("simulation needs at least one {0}")]
    Empty(&'static str),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
