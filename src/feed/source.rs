//! Location feed interface

use serde::{Deserialize, Serialize};

use crate::core::{Bearing, Fix};
use crate::feed::FeedResult;

/// A sample delivered by the location feed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FeedEvent {
    /// Device position sample
    Fix(Fix),
    /// Device heading sample
    Heading { bearing: Bearing, timestamp_ms: u64 },
}

/// Source of device fixes and heading samples.
///
/// Implementations wrap whatever produces locations on the host; the crate
/// only consumes the samples.
pub trait LocationFeed {
    /// Start delivering events
    fn subscribe(&mut self) -> FeedResult<()>;

    /// Stop delivering events
    fn unsubscribe(&mut self);

    fn is_subscribed(&self) -> bool;

    /// Next queued event.
    /// Returns Ok(None) when nothing is pending (non-blocking).
    fn next_event(&mut self) -> FeedResult<Option<FeedEvent>>;
}
