//! World anchor: the geodetic origin of the local scene frame
//!
//! The anchor is set once from the first device fix and then held fixed.
//! Re-centering on every fix would make already placed content drift and
//! jitter; the cost is tangent-plane error growing for content far from the
//! original anchor point.

use log::{info, trace};

use crate::algorithms::geo_math;
use crate::core::{Bearing, Fix, GeoPoint, LocalVector};
use crate::validation::{GeoError, GeoResult};

/// Lifecycle state of the anchor
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnchorState {
    /// Waiting for the first fix
    Uninitialized,
    /// Origin fixed at a geodetic point
    Anchored {
        origin: GeoPoint,
        initialized_at_ms: u64,
    },
}

/// Consistent copy of the anchor taken before a batch of placements
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorSnapshot {
    pub origin: GeoPoint,
    pub heading: Bearing,
    pub north_offset: Bearing,
}

impl AnchorSnapshot {
    pub fn project(&self, point: &GeoPoint) -> LocalVector {
        geo_math::project(&self.origin, point)
    }

    pub fn heading_reference(&self) -> Bearing {
        self.north_offset
    }
}

/// Single shared coordinate frame for a session.
///
/// Callers hold it explicitly; there is no global instance.
#[derive(Debug, Clone)]
pub struct WorldAnchor {
    state: AnchorState,
    heading: Option<Bearing>,
    north_offset: Bearing,
}

impl Default for WorldAnchor {
    fn default() -> Self {
        Self::new(Bearing::NORTH)
    }
}

impl WorldAnchor {
    /// Create an uninitialized anchor whose scene zero-yaw points at `north_offset`
    pub fn new(north_offset: Bearing) -> Self {
        Self {
            state: AnchorState::Uninitialized,
            heading: None,
            north_offset,
        }
    }

    /// Anchor at the fix's position. Returns `false` (and changes nothing)
    /// when already anchored; use [`WorldAnchor::reinitialize`] to move it.
    pub fn initialize(&mut self, fix: &Fix) -> bool {
        if self.is_anchored() {
            return false;
        }

        self.state = AnchorState::Anchored {
            origin: fix.point,
            initialized_at_ms: fix.timestamp_ms,
        };
        info!("World anchored at {} (t={}ms)", fix.point, fix.timestamp_ms);
        true
    }

    /// Reset and anchor again at `fix`
    pub fn reinitialize(&mut self, fix: &Fix) {
        self.reset();
        self.initialize(fix);
    }

    /// Drop the origin. The heading sample survives a reset.
    pub fn reset(&mut self) {
        if let AnchorState::Anchored { origin, .. } = self.state {
            info!("World anchor at {} reset", origin);
        }
        self.state = AnchorState::Uninitialized;
    }

    pub fn state(&self) -> AnchorState {
        self.state
    }

    pub fn is_anchored(&self) -> bool {
        matches!(self.state, AnchorState::Anchored { .. })
    }

    pub fn origin(&self) -> Option<GeoPoint> {
        match self.state {
            AnchorState::Anchored { origin, .. } => Some(origin),
            AnchorState::Uninitialized => None,
        }
    }

    pub fn initialized_at(&self) -> Option<u64> {
        match self.state {
            AnchorState::Anchored { initialized_at_ms, .. } => Some(initialized_at_ms),
            AnchorState::Uninitialized => None,
        }
    }

    /// Record the latest device heading sample
    pub fn update_heading(&mut self, heading: Bearing) {
        trace!("Device heading {}", heading);
        self.heading = Some(heading);
    }

    /// Most recent device heading; north until a sample has arrived
    pub fn current_heading(&self) -> Bearing {
        self.heading.unwrap_or(Bearing::NORTH)
    }

    pub fn has_heading(&self) -> bool {
        self.heading.is_some()
    }

    /// Yaw of the scene's zero direction relative to true north.
    ///
    /// The frame's axes stay east/north; device heading orients the camera
    /// separately and never rotates the frame.
    pub fn heading_reference(&self) -> Bearing {
        self.north_offset
    }

    /// Local offset of `point` from the origin
    pub fn project(&self, point: &GeoPoint) -> GeoResult<LocalVector> {
        match self.state {
            AnchorState::Anchored { origin, .. } => Ok(geo_math::project(&origin, point)),
            AnchorState::Uninitialized => Err(GeoError::AnchorNotReady),
        }
    }

    /// Geodetic point at a local offset from the origin
    pub fn unproject(&self, local: &LocalVector) -> GeoResult<GeoPoint> {
        let origin = self.origin().ok_or(GeoError::AnchorNotReady)?;
        Ok(geo_math::unproject(&origin, local))
    }

    /// Copy of {origin, heading, north offset} for one tick
    pub fn snapshot(&self) -> GeoResult<AnchorSnapshot> {
        let origin = self.origin().ok_or(GeoError::AnchorNotReady)?;
        Ok(AnchorSnapshot {
            origin,
            heading: self.current_heading(),
            north_offset: self.north_offset,
        })
    }
}
