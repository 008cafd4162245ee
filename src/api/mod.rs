//! Session-level API for host applications
//!
//! A host creates one `GeoSession` per AR session, feeds it location events
//! and calls `tick` from its render loop.

pub mod session;

pub use session::{GeoSession, NodeId, TickReport};
