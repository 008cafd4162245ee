//! Location feed abstraction
//!
//! The feed is the external producer of device fixes and heading samples.
//! Acquisition itself happens outside this crate; `MockFeed` replays scripted
//! samples for tests and the demo binary.

pub mod error;
pub mod mock;
pub mod source;

pub use error::{FeedError, FeedRecovery, FeedResult};
pub use mock::MockFeed;
pub use source::{FeedEvent, LocationFeed};
