//! Range checks for geodetic input

use crate::validation::{GeoError, GeoResult};

/// Coordinate validation utilities
pub struct CoordinateValidator;

impl CoordinateValidator {
    /// Latitude must be finite and within [-90, 90]
    pub fn validate_latitude(latitude: f64, longitude: f64) -> GeoResult<()> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoError::InvalidCoordinate {
                latitude,
                longitude,
                reason: "latitude must be between -90 and 90 degrees",
            });
        }
        Ok(())
    }

    /// Longitude only has to be finite; range is fixed by wrapping
    pub fn validate_longitude(latitude: f64, longitude: f64) -> GeoResult<()> {
        if !longitude.is_finite() {
            return Err(GeoError::InvalidCoordinate {
                latitude,
                longitude,
                reason: "longitude must be finite",
            });
        }
        Ok(())
    }

    /// Altitude only has to be finite
    pub fn validate_altitude(latitude: f64, longitude: f64, altitude: f64) -> GeoResult<()> {
        if !altitude.is_finite() {
            return Err(GeoError::InvalidCoordinate {
                latitude,
                longitude,
                reason: "altitude must be finite",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_validation() {
        assert!(CoordinateValidator::validate_latitude(37.7749, -122.4194).is_ok());
        assert!(CoordinateValidator::validate_latitude(91.0, -122.4194).is_err());
        assert!(CoordinateValidator::validate_latitude(-90.5, 0.0).is_err());
        assert!(CoordinateValidator::validate_longitude(0.0, 725.0).is_ok());
        assert!(CoordinateValidator::validate_longitude(0.0, f64::NAN).is_err());
    }

    #[test]
    fn test_altitude_validation() {
        assert!(CoordinateValidator::validate_altitude(0.0, 0.0, 35.0).is_ok());
        assert!(CoordinateValidator::validate_altitude(0.0, 0.0, -12_000.0).is_ok());
        assert!(CoordinateValidator::validate_altitude(0.0, 0.0, f64::NAN).is_err());
        assert!(CoordinateValidator::validate_altitude(0.0, 0.0, f64::INFINITY).is_err());
    }
}
