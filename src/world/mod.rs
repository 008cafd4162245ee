//! Local scene frame and the nodes placed in it

pub mod anchor;
pub mod node;

pub use anchor::{AnchorSnapshot, AnchorState, WorldAnchor};
pub use node::TrackedNode;
