//! Location feed error types and handling

use thiserror::Error;

/// Result type for feed operations
pub type FeedResult<T> = Result<T, FeedError>;

/// Errors reported by a location feed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeedError {
    /// Events requested while not subscribed
    #[error("location feed is not subscribed")]
    NotSubscribed,
    /// The underlying source went away
    #[error("location source {source_id} disconnected")]
    Disconnected { source_id: u8 },
    /// A sample could not be turned into a fix or heading
    #[error("invalid location sample: {details}")]
    InvalidSample { details: String },
}

/// Recovery strategy for feed failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedRecovery {
    /// Subscribe again and continue
    Resubscribe,
    /// Drop the sample and keep reading
    Skip,
    /// Stop pumping until the source comes back
    Wait,
}

impl FeedError {
    /// Get the recommended recovery strategy for this error
    pub fn recovery_strategy(&self) -> FeedRecovery {
        match self {
            FeedError::NotSubscribed => FeedRecovery::Resubscribe,
            FeedError::Disconnected { .. } => FeedRecovery::Wait,
            FeedError::InvalidSample { .. } => FeedRecovery::Skip,
        }
    }

    /// Check if pumping can continue right away
    pub fn is_recoverable(&self) -> bool {
        !matches!(self.recovery_strategy(), FeedRecovery::Wait)
    }
}
