//! Tracked nodes: content pinned to a geodetic location
//!
//! A node keeps its geodetic state and, on every tick, recomputes where it
//! sits in the anchor's local frame. With motion interpolation enabled the
//! node is advanced along its last known course at its last known speed for
//! the time since its last fix. This smooths motion between sparse GPS
//! updates but overshoots when the tracked entity stops or turns; nothing
//! filters that out.

use log::{debug, trace};

use crate::algorithms::geo_math;
use crate::core::{Bearing, Fix, GeoPoint, LocalTransform, DEFAULT_DEVICE_HEIGHT_M};
use crate::validation::GeoResult;
use crate::world::anchor::{AnchorSnapshot, WorldAnchor};

/// A positionable entity placed at a real-world location
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedNode {
    /// Real-world location of the node
    location: GeoPoint,
    /// Direction the node faces, relative to true north
    bearing: Bearing,
    /// Height of the device above the ground, used to put content at floor level
    device_height: f64,
    /// Extrapolate position between fixes using course and speed
    interpolate_motion: bool,
    /// Direction of travel from the latest fix that reported one
    course: Bearing,
    /// Speed (m/s) from the latest fix that reported one
    speed_mps: f64,
    last_fix_ms: Option<u64>,
    /// Upper bound on the extrapolation window
    max_extrapolation_ms: Option<u64>,
    local_transform: Option<LocalTransform>,
}

impl TrackedNode {
    /// Node facing true north
    pub fn new(location: GeoPoint) -> Self {
        Self::with_bearing(location, Bearing::NORTH)
    }

    pub fn with_bearing(location: GeoPoint, bearing: Bearing) -> Self {
        Self {
            location,
            bearing,
            device_height: DEFAULT_DEVICE_HEIGHT_M,
            interpolate_motion: false,
            course: Bearing::NORTH,
            speed_mps: 0.0,
            last_fix_ms: None,
            max_extrapolation_ms: None,
            local_transform: None,
        }
    }

    pub fn with_device_height(mut self, height_m: f64) -> Self {
        self.device_height = height_m;
        self
    }

    pub fn with_interpolation(mut self, enabled: bool) -> Self {
        self.interpolate_motion = enabled;
        self
    }

    pub fn with_max_extrapolation(mut self, window_ms: Option<u64>) -> Self {
        self.max_extrapolation_ms = window_ms;
        self
    }

    pub fn location(&self) -> GeoPoint {
        self.location
    }

    pub fn bearing(&self) -> Bearing {
        self.bearing
    }

    pub fn set_bearing(&mut self, bearing: Bearing) {
        self.bearing = bearing;
    }

    pub fn device_height(&self) -> f64 {
        self.device_height
    }

    pub fn set_device_height(&mut self, height_m: f64) {
        self.device_height = height_m;
    }

    pub fn interpolates_motion(&self) -> bool {
        self.interpolate_motion
    }

    pub fn set_interpolate_motion(&mut self, enabled: bool) {
        self.interpolate_motion = enabled;
    }

    pub fn course(&self) -> Bearing {
        self.course
    }

    pub fn speed(&self) -> f64 {
        self.speed_mps
    }

    pub fn last_fix_ms(&self) -> Option<u64> {
        self.last_fix_ms
    }

    /// Placement from the most recent successful update
    pub fn local_transform(&self) -> Option<&LocalTransform> {
        self.local_transform.as_ref()
    }

    /// Take a new fix for this entity.
    ///
    /// Returns `false` for a fix that is not newer than the last one; such
    /// fixes change nothing. Course and speed are only replaced when the fix
    /// reports them.
    pub fn apply_fix(&mut self, fix: &Fix) -> bool {
        if let Some(last) = self.last_fix_ms {
            if fix.timestamp_ms <= last {
                debug!("Ignoring stale fix at {}ms (last {}ms)", fix.timestamp_ms, last);
                return false;
            }
        }

        self.location = fix.point;
        if let Some(course) = fix.course {
            self.course = course;
        }
        match fix.speed_mps {
            Some(speed) if speed.is_finite() => self.speed_mps = speed.max(0.0),
            Some(speed) => debug!("Ignoring non-finite speed {} at {}ms", speed, fix.timestamp_ms),
            None => {}
        }
        self.last_fix_ms = Some(fix.timestamp_ms);
        true
    }

    /// Geodetic point placement uses at `now_ms`
    pub fn predicted_location(&self, now_ms: u64) -> GeoPoint {
        match self.last_fix_ms {
            Some(last) if self.interpolate_motion => {
                let mut elapsed_ms = now_ms.saturating_sub(last);
                if let Some(cap) = self.max_extrapolation_ms {
                    elapsed_ms = elapsed_ms.min(cap);
                }
                let travelled = self.speed_mps * elapsed_ms as f64 / 1000.0;
                geo_math::destination(&self.location, self.course, travelled)
            }
            _ => self.location,
        }
    }

    /// Recompute the local placement against the anchor.
    ///
    /// When the anchor has no origin the previous transform is kept and
    /// `AnchorNotReady` is returned; the caller retries on a later tick.
    pub fn update_placement(&mut self, anchor: &WorldAnchor, now_ms: u64) -> GeoResult<&LocalTransform> {
        let snapshot = anchor.snapshot()?;
        Ok(self.update_placement_with(&snapshot, now_ms))
    }

    /// Recompute the local placement from an anchor snapshot
    pub fn update_placement_with(&mut self, snapshot: &AnchorSnapshot, now_ms: u64) -> &LocalTransform {
        let target = self.predicted_location(now_ms);
        let mut position = snapshot.project(&target);
        position.y -= self.device_height;

        let yaw = Bearing::new(self.bearing.degrees() - snapshot.heading_reference().degrees());
        trace!(
            "Placed node at ({:.2}, {:.2}, {:.2}) yaw {}",
            position.x,
            position.y,
            position.z,
            yaw
        );

        self.local_transform.insert(LocalTransform::new(position, yaw, now_ms))
    }

    /// Signed turn in (-180, 180] from the device heading to the node's bearing
    pub fn relative_heading(&self, device_heading: Bearing) -> f64 {
        device_heading.delta_to(self.bearing)
    }
}
