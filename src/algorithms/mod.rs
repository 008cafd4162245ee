//! Geodetic algorithms

pub mod geo_math;

pub use geo_math::{bearing, destination, distance, project, unproject};
