use geo_anchor::{Bearing, ConfigManager, Fix, GeoPoint, GeoSession, MockFeed, SessionConfig, TrackedNode};
use serde_json::json;

const USAGE: &str = "usage: geo-anchor [--config <session.json>] [--ticks <n>] [--interpolate]";

struct Options {
    config_path: Option<String>,
    ticks: usize,
    interpolate: bool,
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options {
        config_path: None,
        ticks: 10,
        interpolate: false,
    };

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().ok_or("--config needs a path")?;
                options.config_path = Some(path.clone());
            }
            "--ticks" => {
                let value = iter.next().ok_or("--ticks needs a number")?;
                options.ticks = value.parse().map_err(|_| format!("invalid tick count '{}'", value))?;
            }
            "--interpolate" => options.interpolate = true,
            "--help" | "-h" => return Err(USAGE.to_string()),
            other => return Err(format!("unknown argument '{}'\n{}", other, USAGE)),
        }
    }
    Ok(options)
}

/// Replays a walk east along Westminster Bridge with a few pinned markers
/// and a tracked walker, printing every placement as a JSON line.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{}", message);
            std::process::exit(2);
        }
    };

    let mut config = match &options.config_path {
        Some(path) => ConfigManager::from_file(path)?.config().clone(),
        None => SessionConfig::default(),
    };
    if options.interpolate {
        config.interpolate_motion = true;
    }

    let start = GeoPoint::new(51.5007, -0.1246)?;
    let mut feed = MockFeed::new(1);
    feed.push_heading(Bearing::EAST, 0);
    // Device fixes every 2s, slower than the 500ms render ticks below
    feed.walk(start, 0, Bearing::EAST, 1.4, 2_000, options.ticks / 4 + 1);

    let mut session = GeoSession::with_config(feed, config);
    let big_ben = session.create_node(GeoPoint::new(51.5007, -0.1246)?, Bearing::SOUTH);
    let eye = session.create_node(GeoPoint::new(51.5033, -0.1196)?, Bearing::WEST);
    let walker = session.add_node(
        TrackedNode::with_bearing(GeoPoint::new(51.5009, -0.1250)?, Bearing::EAST)
            .with_interpolation(session.config().interpolate_motion),
    );

    session.start()?;
    for tick in 0..options.ticks {
        let now_ms = tick as u64 * 500;

        if tick % 4 == 0 {
            session.pump_feed()?;
            let walker_fix = Fix::new(GeoPoint::new(51.5009, -0.1250 + 0.00002 * tick as f64)?, now_ms)
                .with_motion(Bearing::EAST, 1.4);
            session.update_node_fix(walker, &walker_fix)?;
        }

        let report = session.tick(now_ms);
        log::debug!("tick {} placed {} skipped {}", tick, report.placed, report.skipped);

        for (name, id) in [("big_ben", big_ben), ("london_eye", eye), ("walker", walker)] {
            if let Some(transform) = session.node(id).and_then(|node| node.local_transform()) {
                let line = json!({
                    "t_ms": now_ms,
                    "node": name,
                    "x": transform.position.x,
                    "y": transform.position.y,
                    "z": transform.position.z,
                    "yaw_deg": transform.yaw.degrees(),
                });
                println!("{}", line);
            }
        }
    }

    if let Ok(device) = session.device_position() {
        println!(
            "{}",
            json!({ "device": { "x": device.x, "y": device.y, "z": device.z } })
        );
    }
    session.stop();
    Ok(())
}
