//! Geodetic anchoring for augmented-reality scenes
//!
//! Pins a local east/up/north frame to the device's first GPS fix and keeps
//! virtual content placed at real-world coordinates as fixes and heading
//! samples arrive.

pub mod core;
pub mod algorithms;
pub mod world;
pub mod validation;
pub mod utils;
pub mod feed;
pub mod api;

// Re-export commonly used types
pub use core::{Bearing, Fix, GeoPoint, LocalTransform, LocalVector, DEFAULT_DEVICE_HEIGHT_M, EARTH_MEAN_RADIUS_M};
pub use algorithms::geo_math;
pub use world::{AnchorSnapshot, AnchorState, TrackedNode, WorldAnchor};
pub use validation::{GeoError, GeoResult, RecoveryStrategy};
pub use utils::{ConfigError, ConfigManager, SessionConfig};
pub use feed::{FeedError, FeedEvent, FeedResult, LocationFeed, MockFeed};
pub use api::{GeoSession, NodeId, TickReport};
