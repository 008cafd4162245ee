//! Core data types for geodetic anchoring

use std::fmt;

use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::validation::{CoordinateValidator, GeoError, GeoResult};

/// Geodetic position (WGS84 latitude/longitude in degrees, altitude in meters)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeoPoint")]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
    altitude: Option<f64>,
}

impl GeoPoint {
    /// Create a point without altitude.
    ///
    /// Latitude outside [-90, 90] or non-finite input is rejected with
    /// `InvalidCoordinate`; longitude is wrapped into [-180, 180).
    pub fn new(latitude: f64, longitude: f64) -> GeoResult<Self> {
        CoordinateValidator::validate_latitude(latitude, longitude)?;
        CoordinateValidator::validate_longitude(latitude, longitude)?;

        Ok(Self {
            latitude,
            longitude: normalize_longitude(longitude),
            altitude: None,
        })
    }

    /// Create a point with an altitude in meters
    pub fn with_altitude(latitude: f64, longitude: f64, altitude: f64) -> GeoResult<Self> {
        let point = Self::new(latitude, longitude)?;
        CoordinateValidator::validate_altitude(latitude, longitude, altitude)?;
        Ok(Self {
            altitude: Some(altitude),
            ..point
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn altitude(&self) -> Option<f64> {
        self.altitude
    }

    /// Build from already computed values, clamping latitude and wrapping longitude.
    /// Only for results of the spherical formulas, which can overshoot by rounding.
    pub(crate) fn from_computed(latitude: f64, longitude: f64, altitude: Option<f64>) -> Self {
        Self {
            latitude: latitude.clamp(-90.0, 90.0),
            longitude: normalize_longitude(longitude),
            altitude,
        }
    }

    /// Same horizontal position with the altitude replaced
    pub fn at_altitude(self, altitude: Option<f64>) -> Self {
        Self { altitude, ..self }
    }

    /// True when both points share latitude and longitude (altitude ignored)
    pub fn same_position(&self, other: &GeoPoint) -> bool {
        self.latitude == other.latitude && self.longitude == other.longitude
    }
}

/// Unchecked wire form; deserialization goes through the same validation as `new`
#[derive(Deserialize)]
struct RawGeoPoint {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    altitude: Option<f64>,
}

impl TryFrom<RawGeoPoint> for GeoPoint {
    type Error = GeoError;

    fn try_from(raw: RawGeoPoint) -> Result<Self, Self::Error> {
        match raw.altitude {
            Some(alt) => GeoPoint::with_altitude(raw.latitude, raw.longitude, alt),
            None => GeoPoint::new(raw.latitude, raw.longitude),
        }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.altitude {
            Some(alt) => write!(f, "({:.6}, {:.6}, {:.1}m)", self.latitude, self.longitude, alt),
            None => write!(f, "({:.6}, {:.6})", self.latitude, self.longitude),
        }
    }
}

/// Wrap a longitude into [-180, 180)
pub(crate) fn normalize_longitude(longitude: f64) -> f64 {
    (longitude + 180.0).rem_euclid(360.0) - 180.0
}

/// Direction in degrees clockwise from true north, always in [0, 360)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Bearing(f64);

impl Bearing {
    pub const NORTH: Bearing = Bearing(0.0);
    pub const EAST: Bearing = Bearing(90.0);
    pub const SOUTH: Bearing = Bearing(180.0);
    pub const WEST: Bearing = Bearing(270.0);

    /// Normalize any angle in degrees. Non-finite input becomes north.
    pub fn new(degrees: f64) -> Self {
        if !degrees.is_finite() {
            return Bearing(0.0);
        }
        let wrapped = degrees.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360 for tiny negative inputs
        if wrapped >= 360.0 {
            Bearing(0.0)
        } else {
            Bearing(wrapped)
        }
    }

    pub fn from_radians(radians: f64) -> Self {
        Self::new(radians.to_degrees())
    }

    pub fn degrees(self) -> f64 {
        self.0
    }

    pub fn radians(self) -> f64 {
        self.0.to_radians()
    }

    /// Signed angle in (-180, 180] turning from `self` to `other`
    pub fn delta_to(self, other: Bearing) -> f64 {
        let diff = (other.0 - self.0).rem_euclid(360.0);
        if diff > 180.0 {
            diff - 360.0
        } else {
            diff
        }
    }
}

impl From<f64> for Bearing {
    fn from(degrees: f64) -> Self {
        Bearing::new(degrees)
    }
}

impl From<Bearing> for f64 {
    fn from(bearing: Bearing) -> Self {
        bearing.0
    }
}

impl fmt::Display for Bearing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°", self.0)
    }
}

/// A timestamped location sample from the feed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    pub point: GeoPoint,
    pub timestamp_ms: u64,
    /// Direction of travel, when the receiver reports one
    pub course: Option<Bearing>,
    /// Ground speed in m/s, when the receiver reports one
    pub speed_mps: Option<f64>,
}

impl Fix {
    pub fn new(point: GeoPoint, timestamp_ms: u64) -> Self {
        Self {
            point,
            timestamp_ms,
            course: None,
            speed_mps: None,
        }
    }

    pub fn with_motion(mut self, course: Bearing, speed_mps: f64) -> Self {
        self.course = Some(course);
        self.speed_mps = Some(speed_mps);
        self
    }
}

/// Offset in meters from the anchor origin: x east, y up, z north
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LocalVector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl LocalVector {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn zeros() -> Self {
        Self::default()
    }

    pub fn magnitude(&self) -> f64 {
        self.to_vector3().norm()
    }

    /// Length of the east/north component only
    pub fn horizontal_distance(&self) -> f64 {
        self.x.hypot(self.z)
    }

    pub fn to_vector3(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }
}

impl From<Vector3<f64>> for LocalVector {
    fn from(v: Vector3<f64>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<LocalVector> for Vector3<f64> {
    fn from(v: LocalVector) -> Self {
        v.to_vector3()
    }
}

/// Placement written by a tracked node for the scene graph to apply
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalTransform {
    pub position: LocalVector,
    /// Rotation about +y turning local forward (+z) toward `yaw`
    pub rotation: UnitQuaternion<f64>,
    /// Yaw relative to the scene's reference direction
    pub yaw: Bearing,
    /// Tick time the placement was computed for
    pub computed_at_ms: u64,
}

impl LocalTransform {
    pub fn new(position: LocalVector, yaw: Bearing, computed_at_ms: u64) -> Self {
        // Positive rotation about +y carries +z toward +x, i.e. north toward east
        let rotation = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), yaw.radians());
        Self {
            position,
            rotation,
            yaw,
            computed_at_ms,
        }
    }

    /// Unit vector the content faces in the local frame
    pub fn forward(&self) -> LocalVector {
        (self.rotation * Vector3::z()).into()
    }
}
