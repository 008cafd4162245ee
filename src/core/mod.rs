//! Core types and constants for geodetic anchoring

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;
