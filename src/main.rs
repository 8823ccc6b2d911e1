//! Replays scripted gestures over a fixed map region and logs the resulting
//! shapes as GeoJSON.

use std::sync::Arc;

use mapsketch::viewport::{Region, RegionViewport};
use mapsketch::{DrawingMode, Emission, ScreenPoint, SketchConfig, SketchError, SketchHandle, spawn_sketch};
use tokio::sync::mpsc;

const DEMO_LATITUDE: f64 = 20.980_003_8;
const DEMO_LONGITUDE: f64 = 105.786_426_7;
const DEMO_DELTA: f64 = 0.009;
const DEMO_WIDTH_PX: f64 = 400.0;
const DEMO_HEIGHT_PX: f64 = 800.0;

#[tokio::main]
async fn main() -> Result<(), SketchError> {
    tracing_subscriber::fmt::init();

    let config = SketchConfig::from_env()?;
    let region = Region::new(DEMO_LATITUDE, DEMO_LONGITUDE, DEMO_DELTA, DEMO_DELTA);
    let map = Arc::new(RegionViewport::new(region, DEMO_WIDTH_PX, DEMO_HEIGHT_PX));

    let (tx, mut rx) = mpsc::unbounded_channel();
    let sink = move |emission: Emission| {
        if tx.send(emission).is_err() {
            tracing::warn!("demo receiver dropped; emission lost");
        }
    };
    let handle = spawn_sketch(map, sink, config);

    let circle = [(200.0, 400.0), (260.0, 400.0), (320.0, 400.0)];
    let rectangle = [(300.0, 600.0), (120.0, 450.0)];
    let freehand = [(50.0, 100.0), (150.0, 80.0), (240.0, 140.0), (200.0, 260.0), (90.0, 240.0), (60.0, 180.0)];
    let script: [(DrawingMode, &[(f64, f64)]); 3] =
        [(DrawingMode::Circle, &circle), (DrawingMode::Rectangle, &rectangle), (DrawingMode::FreehandLine, &freehand)];

    // Each shape lands before the next one starts, the way a user draws.
    for (mode, trace) in script {
        replay(&handle, mode, trace).await?;
        match rx.recv().await {
            Some(emission) => log_emission(emission, config.circle_segments)?,
            None => return Err(SketchError::ChannelClosed),
        }
    }

    handle.shutdown().await;
    Ok(())
}

/// Select `mode`, then drag along `trace`: first point down, last point up.
async fn replay(handle: &SketchHandle, mode: DrawingMode, trace: &[(f64, f64)]) -> Result<(), SketchError> {
    let points: Vec<ScreenPoint> = trace.iter().map(|&(x, y)| ScreenPoint::new(x, y)).collect();
    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return Ok(());
    };

    handle.select_mode(mode).await?;
    handle.pointer_down(first).await?;
    for &p in &points[1..] {
        handle.pointer_move(p).await?;
    }
    handle.pointer_up(last).await
}

fn log_emission(emission: Emission, circle_segments: usize) -> Result<(), SketchError> {
    match emission.result {
        Ok(shape) => {
            let geojson = serde_json::to_string(&shape.to_geojson(circle_segments))?;
            tracing::info!(mode = ?emission.mode, generation = emission.generation, %geojson, "drawn shape");
        }
        Err(e) => {
            tracing::warn!(mode = ?emission.mode, code = e.error_code(), error = %e, "gesture produced no shape");
        }
    }
    Ok(())
}
