//! Point maps of geocoded followers: static world and continental-US PNGs
//! plus interactive HTML equivalents. Only resolved coordinates are
//! plotted; unresolved rows never appear as (0, 0).

use crate::constants::{
    CONTINENTAL_US_LAT_MAX, CONTINENTAL_US_LAT_MIN, CONTINENTAL_US_LON_MAX,
    CONTINENTAL_US_LON_MIN,
};
use crate::error::{DatalensError, Result};
use crate::types::Follower;
use plotters::prelude::*;

const WIDTH: u32 = 1000;
const HEIGHT: u32 = 600;
const POINT_COLOR: RGBColor = RGBColor(231, 76, 60);
const BOX_COLOR: RGBColor = RGBColor(52, 152, 219);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapRegion {
    World,
    ContinentalUs,
}

impl MapRegion {
    fn title(self) -> &'static str {
        match self {
            MapRegion::World => "Follower locations (world)",
            MapRegion::ContinentalUs => "Follower locations (continental US)",
        }
    }

    /// Longitude/latitude extent of the plot area.
    fn extent(self) -> (f64, f64, f64, f64) {
        match self {
            MapRegion::World => (-180.0, 180.0, -90.0, 90.0),
            // Bounding box plus a small margin so edge points stay visible
            MapRegion::ContinentalUs => (
                CONTINENTAL_US_LON_MIN - 3.0,
                CONTINENTAL_US_LON_MAX + 3.0,
                CONTINENTAL_US_LAT_MIN - 3.0,
                CONTINENTAL_US_LAT_MAX + 3.0,
            ),
        }
    }
}

fn render_err<E: std::fmt::Display>(e: E) -> DatalensError {
    DatalensError::Render(e.to_string())
}

/// Resolved coordinates, filtered to the region being drawn. The US view
/// shows only rows that passed the continental-US test.
fn region_points(followers: &[Follower], region: MapRegion) -> Vec<(f64, f64)> {
    followers
        .iter()
        .filter(|f| region == MapRegion::World || f.in_continental_us)
        .filter_map(|f| f.coordinates())
        .map(|p| (p.longitude, p.latitude))
        .collect()
}

pub fn world_map(followers: &[Follower], path: &str) -> Result<()> {
    point_map(followers, MapRegion::World, path)
}

pub fn us_map(followers: &[Follower], path: &str) -> Result<()> {
    point_map(followers, MapRegion::ContinentalUs, path)
}

fn point_map(followers: &[Follower], region: MapRegion, path: &str) -> Result<()> {
    let (lon_min, lon_max, lat_min, lat_max) = region.extent();
    let points = region_points(followers, region);

    let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(region.title(), ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(lon_min..lon_max, lat_min..lat_max)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc("Longitude")
        .y_desc("Latitude")
        .light_line_style(BLACK.mix(0.08))
        .draw()
        .map_err(render_err)?;

    // Continental-US bounding box outline, on both views
    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![
                (CONTINENTAL_US_LON_MIN, CONTINENTAL_US_LAT_MIN),
                (CONTINENTAL_US_LON_MAX, CONTINENTAL_US_LAT_MIN),
                (CONTINENTAL_US_LON_MAX, CONTINENTAL_US_LAT_MAX),
                (CONTINENTAL_US_LON_MIN, CONTINENTAL_US_LAT_MAX),
                (CONTINENTAL_US_LON_MIN, CONTINENTAL_US_LAT_MIN),
            ],
            BOX_COLOR.stroke_width(2),
        )))
        .map_err(render_err)?;

    chart
        .draw_series(
            points
                .iter()
                .map(|&(lon, lat)| Circle::new((lon, lat), 3, POINT_COLOR.mix(0.7).filled())),
        )
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8" />
<title>__TITLE__</title>
<style>
  body { font-family: sans-serif; margin: 20px; }
  #tip { position: absolute; background: #333; color: #fff; padding: 3px 7px;
         border-radius: 3px; font-size: 12px; pointer-events: none; display: none; }
  canvas { border: 1px solid #ccc; background: #f4f8fb; }
</style>
</head>
<body>
<h2>__TITLE__</h2>
<canvas id="map" width="960" height="560"></canvas>
<div id="tip"></div>
<script>
const data = __DATA__;
const canvas = document.getElementById('map');
const ctx = canvas.getContext('2d');
const tip = document.getElementById('tip');
function project(lon, lat) {
  const x = (lon - data.extent[0]) / (data.extent[1] - data.extent[0]) * canvas.width;
  const y = canvas.height - (lat - data.extent[2]) / (data.extent[3] - data.extent[2]) * canvas.height;
  return [x, y];
}
function draw() {
  ctx.clearRect(0, 0, canvas.width, canvas.height);
  const [bx1, by1] = project(data.box[0], data.box[2]);
  const [bx2, by2] = project(data.box[1], data.box[3]);
  ctx.strokeStyle = '#3498db';
  ctx.strokeRect(Math.min(bx1, bx2), Math.min(by1, by2), Math.abs(bx2 - bx1), Math.abs(by2 - by1));
  ctx.fillStyle = 'rgba(231, 76, 60, 0.75)';
  for (const point of data.points) {
    const [x, y] = project(point.lon, point.lat);
    ctx.beginPath();
    ctx.arc(x, y, 4, 0, 2 * Math.PI);
    ctx.fill();
  }
}
canvas.addEventListener('mousemove', (event) => {
  const rect = canvas.getBoundingClientRect();
  const mx = event.clientX - rect.left;
  const my = event.clientY - rect.top;
  const hit = data.points.find((point) => {
    const [x, y] = project(point.lon, point.lat);
    return (mx - x) ** 2 + (my - y) ** 2 <= 25;
  });
  if (hit) {
    tip.style.display = 'block';
    tip.style.left = event.pageX + 10 + 'px';
    tip.style.top = event.pageY + 10 + 'px';
    tip.textContent = '@' + hit.screen_name + (hit.location ? ' — ' + hit.location : '');
  } else {
    tip.style.display = 'none';
  }
});
draw();
</script>
</body>
</html>
"#;

/// Interactive map page: embedded points, equirectangular canvas
/// projection, hover tooltips with handle and location. No external
/// assets.
pub fn map_page(followers: &[Follower], region: MapRegion) -> Result<String> {
    let (lon_min, lon_max, lat_min, lat_max) = region.extent();

    let points: Vec<serde_json::Value> = followers
        .iter()
        .filter(|f| region == MapRegion::World || f.in_continental_us)
        .filter_map(|f| {
            let point = f.coordinates()?;
            Some(serde_json::json!({
                "lon": point.longitude,
                "lat": point.latitude,
                "screen_name": f.screen_name,
                "location": f.location,
            }))
        })
        .collect();

    let payload = serde_json::json!({
        "extent": [lon_min, lon_max, lat_min, lat_max],
        "box": [
            CONTINENTAL_US_LON_MIN,
            CONTINENTAL_US_LON_MAX,
            CONTINENTAL_US_LAT_MIN,
            CONTINENTAL_US_LAT_MAX,
        ],
        "points": points,
    });

    Ok(PAGE_TEMPLATE
        .replace("__TITLE__", region.title())
        .replace("__DATA__", &serde_json::to_string(&payload)?))
}
