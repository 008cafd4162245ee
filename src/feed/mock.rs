//! Scripted location feed for testing and demos

use std::collections::VecDeque;

use crate::algorithms::geo_math;
use crate::core::{Bearing, Fix, GeoPoint};
use crate::feed::{FeedError, FeedEvent, FeedResult, LocationFeed};

/// Feed that replays queued events (and scripted sample errors) in order
pub struct MockFeed {
    id: u8,
    queue: VecDeque<FeedResult<FeedEvent>>,
    subscribed: bool,
    connected: bool,
    delivered: u32,
}

impl MockFeed {
    pub fn new(id: u8) -> Self {
        Self {
            id,
            queue: VecDeque::new(),
            subscribed: false,
            connected: true,
            delivered: 0,
        }
    }

    pub fn push_event(&mut self, event: FeedEvent) {
        self.queue.push_back(Ok(event));
    }

    /// Queue a sample the source failed to decode
    pub fn push_invalid(&mut self, details: impl Into<String>) {
        self.queue.push_back(Err(FeedError::InvalidSample { details: details.into() }));
    }

    pub fn push_fix(&mut self, fix: Fix) {
        self.push_event(FeedEvent::Fix(fix));
    }

    pub fn push_heading(&mut self, bearing: Bearing, timestamp_ms: u64) {
        self.push_event(FeedEvent::Heading { bearing, timestamp_ms });
    }

    /// Queue `count` fixes of a straight walk starting at `start`, one every
    /// `step_ms`, each carrying the walk's course and speed
    pub fn walk(&mut self, start: GeoPoint, start_ms: u64, course: Bearing, speed_mps: f64, step_ms: u64, count: usize) {
        for i in 0..count {
            let elapsed_ms = step_ms * i as u64;
            let travelled = speed_mps * elapsed_ms as f64 / 1000.0;
            let point = geo_math::destination(&start, course, travelled);
            self.push_fix(Fix::new(point, start_ms + elapsed_ms).with_motion(course, speed_mps));
        }
    }

    /// Simulate the source going away
    pub fn disconnect(&mut self) {
        self.connected = false;
    }

    pub fn reconnect(&mut self) {
        self.connected = true;
    }

    pub fn queued_event_count(&self) -> usize {
        self.queue.len()
    }

    pub fn delivered_count(&self) -> u32 {
        self.delivered
    }
}

impl LocationFeed for MockFeed {
    fn subscribe(&mut self) -> FeedResult<()> {
        if !self.connected {
            return Err(FeedError::Disconnected { source_id: self.id });
        }
        self.subscribed = true;
        Ok(())
    }

    fn unsubscribe(&mut self) {
        self.subscribed = false;
    }

    fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    fn next_event(&mut self) -> FeedResult<Option<FeedEvent>> {
        if !self.connected {
            return Err(FeedError::Disconnected { source_id: self.id });
        }
        if !self.subscribed {
            return Err(FeedError::NotSubscribed);
        }

        match self.queue.pop_front() {
            Some(Ok(event)) => {
                self.delivered += 1;
                Ok(Some(event))
            }
            Some(Err(e)) => Err(e),
            None => Ok(None),
        }
    }
}
