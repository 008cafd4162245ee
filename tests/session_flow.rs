use approx::assert_abs_diff_eq;
use geo_anchor::{
    geo_math, Bearing, Fix, GeoError, GeoPoint, GeoSession, MockFeed, SessionConfig, TrackedNode,
};

fn point(lat: f64, lon: f64) -> GeoPoint {
    GeoPoint::new(lat, lon).unwrap()
}

#[test]
fn test_walk_keeps_content_pinned() {
    let start = point(51.5007, -0.1246);
    let mut feed = MockFeed::new(1);
    feed.push_heading(Bearing::new(80.0), 0);
    feed.walk(start, 0, Bearing::EAST, 1.5, 1_000, 10);

    let mut session = GeoSession::new(feed);
    let marker = session.create_node(point(51.5014, -0.1246), Bearing::SOUTH);
    session.start().unwrap();

    assert_eq!(session.pump_feed().unwrap(), 11);
    assert_eq!(session.feed().delivered_count(), 11);

    let report = session.tick(10_000);
    assert_eq!(report.placed, 1);

    // The anchor stayed at the first fix, so the marker is still ~78m north
    let transform = *session.node(marker).unwrap().local_transform().unwrap();
    assert_abs_diff_eq!(transform.position.x, 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(transform.position.z, 78.0, epsilon = 1.0);
    assert_abs_diff_eq!(transform.yaw.degrees(), 180.0);

    // While the device has walked 13.5m east
    let device = session.device_position().unwrap();
    assert_abs_diff_eq!(device.x, 13.5, epsilon = 0.01);
    assert_abs_diff_eq!(session.anchor().current_heading().degrees(), 80.0);

    // The device must turn 100 degrees clockwise to face the marker's direction
    let node = session.node(marker).unwrap();
    assert_abs_diff_eq!(node.relative_heading(session.anchor().current_heading()), 100.0);
}

#[test]
fn test_interpolated_node_between_sparse_fixes() {
    let config = SessionConfig {
        interpolate_motion: true,
        ..SessionConfig::default()
    };
    let mut session = GeoSession::with_config(MockFeed::new(1), config);
    session.start().unwrap();
    session.feed_mut().push_fix(Fix::new(point(0.0, 0.0), 0));
    session.pump_feed().unwrap();

    let car_start = point(0.0002, 0.0);
    let car = session.create_node(car_start, Bearing::EAST);
    session
        .update_node_fix(car, &Fix::new(car_start, 1_000).with_motion(Bearing::EAST, 2.0))
        .unwrap();

    session.tick(1_000);
    let at_fix = session.node(car).unwrap().local_transform().unwrap().position;
    session.tick(4_000);
    let predicted = session.node(car).unwrap().local_transform().unwrap().position;

    assert_abs_diff_eq!(predicted.x - at_fix.x, 6.0, epsilon = 0.05);

    // A genuinely new fix snaps the node back to the reported location
    let stopped = geo_math::destination(&car_start, Bearing::EAST, 4.0);
    session
        .update_node_fix(car, &Fix::new(stopped, 4_000).with_motion(Bearing::EAST, 0.0))
        .unwrap();
    session.tick(6_000);
    let settled = session.node(car).unwrap().local_transform().unwrap().position;
    assert_abs_diff_eq!(settled.x - at_fix.x, 4.0, epsilon = 0.05);
}

#[test]
fn test_reset_then_reanchor_on_next_fix() {
    let mut session = GeoSession::new(MockFeed::new(1));
    session.start().unwrap();
    let node = session.add_node(TrackedNode::new(point(10.001, 20.0)));

    session.feed_mut().push_fix(Fix::new(point(10.0, 20.0), 1));
    session.pump_feed().unwrap();
    session.tick(1);
    let before = *session.node(node).unwrap().local_transform().unwrap();

    session.reset_anchor();
    assert_eq!(session.device_position(), Err(GeoError::AnchorNotReady));
    let report = session.tick(2);
    assert_eq!(report.skipped, 1);
    assert_eq!(session.node(node).unwrap().local_transform(), Some(&before));

    session.feed_mut().push_fix(Fix::new(point(10.001, 20.0), 3));
    session.pump_feed().unwrap();
    session.tick(3);
    let after = session.node(node).unwrap().local_transform().unwrap();
    assert_abs_diff_eq!(after.position.z, 0.0, epsilon = 1e-6);
}

#[test]
fn test_invalid_latitude_rejected() {
    assert!(matches!(GeoPoint::new(91.0, 0.0), Err(GeoError::InvalidCoordinate { .. })));
}
