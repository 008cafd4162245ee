//! Error types for coordinate handling and placement

use thiserror::Error;

/// Result type for geodetic and placement operations
pub type GeoResult<T> = Result<T, GeoError>;

/// Errors raised by coordinate construction, anchoring and node placement
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    /// Latitude/longitude/altitude outside the accepted range or not finite
    #[error("invalid coordinate ({latitude}, {longitude}): {reason}")]
    InvalidCoordinate {
        latitude: f64,
        longitude: f64,
        reason: &'static str,
    },
    /// Projection attempted before the first fix or after a reset
    #[error("world anchor has no origin yet")]
    AnchorNotReady,
    /// No tracked node registered under this id
    #[error("no tracked node with id {id}")]
    NodeNotFound { id: u64 },
}

/// How a caller should react to an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryStrategy {
    /// Keep the previous state and try again on the next tick
    RetryNextTick,
    /// Drop the offending input
    Reject,
    /// Ignore and continue
    Skip,
}

impl GeoError {
    /// Get the recommended recovery strategy for this error
    pub fn recovery_strategy(&self) -> RecoveryStrategy {
        match self {
            GeoError::InvalidCoordinate { .. } => RecoveryStrategy::Reject,
            GeoError::AnchorNotReady => RecoveryStrategy::RetryNextTick,
            GeoError::NodeNotFound { .. } => RecoveryStrategy::Skip,
        }
    }

    /// Check if this error clears up by itself once new data arrives
    pub fn is_recoverable(&self) -> bool {
        matches!(self.recovery_strategy(), RecoveryStrategy::RetryNextTick)
    }
}
