//! Input validation and error classification

pub mod coordinates;
pub mod error;

pub use coordinates::CoordinateValidator;
pub use error::{GeoError, GeoResult, RecoveryStrategy};
