//! Session: owns the world anchor, the tracked nodes and the feed subscription
//!
//! All work happens on the caller's loop. Feed events are drained with
//! [`GeoSession::pump_feed`] (or pushed one by one through
//! [`GeoSession::handle_event`]) and placements are recomputed by
//! [`GeoSession::tick`], which takes one anchor snapshot per call so every
//! node in a tick sees the same origin and heading.

use std::collections::BTreeMap;
use std::fmt;

use log::{debug, info, warn};

use crate::algorithms::geo_math;
use crate::core::{Bearing, Fix, GeoPoint, LocalVector};
use crate::feed::{FeedEvent, FeedRecovery, FeedResult, LocationFeed};
use crate::utils::SessionConfig;
use crate::validation::{GeoError, GeoResult};
use crate::world::{TrackedNode, WorldAnchor};

/// Handle for a node registered with a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

impl NodeId {
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Outcome of one placement tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    /// Nodes whose transform was recomputed
    pub placed: usize,
    /// Nodes left at their previous transform because the anchor had no origin
    pub skipped: usize,
}

/// Geodetic placement session driven by a location feed
pub struct GeoSession<F: LocationFeed> {
    config: SessionConfig,
    anchor: WorldAnchor,
    feed: F,
    nodes: BTreeMap<NodeId, TrackedNode>,
    next_node_id: u64,
    current_location: Option<Fix>,
    last_heading_ms: Option<u64>,
    initialized: bool,
    running: bool,
}

impl<F: LocationFeed> GeoSession<F> {
    pub fn new(feed: F) -> Self {
        Self::with_config(feed, SessionConfig::default())
    }

    pub fn with_config(feed: F, config: SessionConfig) -> Self {
        Self {
            anchor: WorldAnchor::new(Bearing::new(config.north_offset_deg)),
            config,
            feed,
            nodes: BTreeMap::new(),
            next_node_id: 1,
            current_location: None,
            last_heading_ms: None,
            initialized: false,
            running: false,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn anchor(&self) -> &WorldAnchor {
        &self.anchor
    }

    pub fn feed(&self) -> &F {
        &self.feed
    }

    pub fn feed_mut(&mut self) -> &mut F {
        &mut self.feed
    }

    // Lifecycle

    /// Prepare a fresh world. The anchor stays unset until the first fix.
    pub fn initialize(&mut self) {
        self.anchor = WorldAnchor::new(Bearing::new(self.config.north_offset_deg));
        self.current_location = None;
        self.last_heading_ms = None;
        self.initialized = true;
        info!("Session initialized, waiting for first fix");
    }

    /// Stop, drop the anchor and forget the device location
    pub fn deinitialize(&mut self) {
        self.stop();
        self.anchor.reset();
        self.current_location = None;
        self.last_heading_ms = None;
        self.initialized = false;
        info!("Session deinitialized");
    }

    /// Subscribe to the feed and enable placement, initializing first if needed
    pub fn start(&mut self) -> FeedResult<()> {
        if self.running {
            return Ok(());
        }
        if !self.initialized {
            self.initialize();
        }

        self.feed.subscribe()?;
        self.running = true;
        info!("Session started with {} tracked nodes", self.nodes.len());
        Ok(())
    }

    /// Unsubscribe from the feed and pause placement
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.feed.unsubscribe();
        self.running = false;
        info!("Session stopped");
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Explicitly drop the anchor; the next device fix anchors again
    pub fn reset_anchor(&mut self) {
        self.anchor.reset();
    }

    // Feed handling

    /// Apply one feed event. Returns `false` when the event was ignored.
    pub fn handle_event(&mut self, event: FeedEvent) -> bool {
        if !self.initialized {
            debug!("Ignoring feed event before initialization");
            return false;
        }

        match event {
            FeedEvent::Fix(fix) => self.handle_fix(fix),
            FeedEvent::Heading { bearing, timestamp_ms } => self.handle_heading(bearing, timestamp_ms),
        }
    }

    fn handle_heading(&mut self, bearing: Bearing, timestamp_ms: u64) -> bool {
        if let Some(last) = self.last_heading_ms {
            if timestamp_ms <= last {
                debug!("Ignoring out-of-order heading at {}ms (current {}ms)", timestamp_ms, last);
                return false;
            }
        }
        self.last_heading_ms = Some(timestamp_ms);
        self.anchor.update_heading(bearing);
        true
    }

    fn handle_fix(&mut self, fix: Fix) -> bool {
        if let Some(current) = &self.current_location {
            if fix.timestamp_ms <= current.timestamp_ms {
                debug!(
                    "Ignoring out-of-order device fix at {}ms (current {}ms)",
                    fix.timestamp_ms, current.timestamp_ms
                );
                return false;
            }
        }
        self.current_location = Some(fix);

        match self.anchor.origin() {
            None => {
                self.anchor.initialize(&fix);
            }
            Some(origin) => {
                if let Some(limit) = self.config.reanchor_distance_m {
                    let drift = geo_math::distance(&origin, &fix.point);
                    if drift > limit {
                        warn!("Device is {:.1}m from the anchor (limit {:.1}m), re-anchoring", drift, limit);
                        self.anchor.reinitialize(&fix);
                    }
                }
            }
        }
        true
    }

    /// Drain every pending feed event. Does nothing while stopped.
    ///
    /// Bad samples are skipped and a lost subscription is renewed once per
    /// call; a disconnected source stops the drain and is returned.
    pub fn pump_feed(&mut self) -> FeedResult<usize> {
        if !self.running {
            return Ok(0);
        }

        let mut processed = 0;
        let mut resubscribed = false;
        loop {
            match self.feed.next_event() {
                Ok(Some(event)) => {
                    self.handle_event(event);
                    processed += 1;
                }
                Ok(None) => return Ok(processed),
                Err(e) => match e.recovery_strategy() {
                    FeedRecovery::Skip => warn!("Skipping bad location sample: {}", e),
                    FeedRecovery::Resubscribe if !resubscribed => {
                        warn!("Location feed dropped the subscription, resubscribing");
                        self.feed.subscribe()?;
                        resubscribed = true;
                    }
                    FeedRecovery::Resubscribe | FeedRecovery::Wait => {
                        warn!("Location feed error after {} events: {}", processed, e);
                        return Err(e);
                    }
                },
            }
        }
    }

    /// Latest accepted device fix
    pub fn current_location(&self) -> Option<&Fix> {
        self.current_location.as_ref()
    }

    /// Device position in the local frame, for placing the scene camera
    pub fn device_position(&self) -> GeoResult<LocalVector> {
        let fix = self.current_location.as_ref().ok_or(GeoError::AnchorNotReady)?;
        self.anchor.project(&fix.point)
    }

    // Nodes

    /// Register a node as built by the caller
    pub fn add_node(&mut self, node: TrackedNode) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        debug!("Tracking {} at {}", id, node.location());
        self.nodes.insert(id, node);
        id
    }

    /// Create and register a node using the session's placement defaults
    pub fn create_node(&mut self, location: GeoPoint, bearing: Bearing) -> NodeId {
        let node = TrackedNode::with_bearing(location, bearing)
            .with_device_height(self.config.default_device_height_m)
            .with_interpolation(self.config.interpolate_motion)
            .with_max_extrapolation(self.config.max_extrapolation_ms);
        self.add_node(node)
    }

    pub fn remove_node(&mut self, id: NodeId) -> Option<TrackedNode> {
        self.nodes.remove(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&TrackedNode> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut TrackedNode> {
        self.nodes.get_mut(&id)
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Feed a new fix for a tracked entity
    pub fn update_node_fix(&mut self, id: NodeId, fix: &Fix) -> GeoResult<bool> {
        let node = self.nodes.get_mut(&id).ok_or(GeoError::NodeNotFound { id: id.0 })?;
        Ok(node.apply_fix(fix))
    }

    /// Recompute every node's placement for time `now_ms`
    pub fn tick(&mut self, now_ms: u64) -> TickReport {
        let mut report = TickReport::default();
        if !self.running {
            return report;
        }

        let snapshot = match self.anchor.snapshot() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                report.skipped = self.nodes.len();
                debug!("Skipping placement of {} nodes: {}", report.skipped, e);
                return report;
            }
        };

        for node in self.nodes.values_mut() {
            node.update_placement_with(&snapshot, now_ms);
            report.placed += 1;
        }
        report
    }
}
