//! Physical constants and placement defaults

/// Mean Earth radius used by the spherical formulas (m)
pub const EARTH_MEAN_RADIUS_M: f64 = 6_371_000.0;

/// Height of a hand-held device above the ground (m)
pub const DEFAULT_DEVICE_HEIGHT_M: f64 = 1.5;
