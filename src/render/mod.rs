//! Standalone HTML rendering of the pickup and drop-off heatmaps.
//!
//! The page pulls Leaflet, Leaflet.heat and Leaflet.awesome-markers from a
//! CDN; points are embedded as JSON arrays of `[lat, lon, intensity]`.

pub mod style;

use anyhow::Result;
use std::fmt::Write;

use crate::config::MapConfig;
use crate::types::{DisplayMode, GeoPoint, PointSets};
use style::{DROPOFF, LayerStyle, PICKUP};

pub const PAGE_TITLE: &str = "Ride Analysis by Time and Location";

const HEAD_ASSETS: &str = r#"<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css"/>
<link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/Leaflet.awesome-markers/2.0.2/leaflet.awesome-markers.css"/>
<link rel="stylesheet" href="https://netdna.bootstrapcdn.com/bootstrap/3.0.0/css/bootstrap-glyphicons.css"/>
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<script src="https://unpkg.com/leaflet.heat@0.2.0/dist/leaflet-heat.js"></script>
<script src="https://cdnjs.cloudflare.com/ajax/libs/Leaflet.awesome-markers/2.0.2/leaflet.awesome-markers.js"></script>"#;

const DESCRIPTION: &str = r#"<p>Heatmap showing:</p>
<ul>
<li>&#128309; Pickup locations (blue)</li>
<li>&#128308; Drop-off locations (red)</li>
</ul>
<p>Intensity of colors varies based on the ride time</p>"#;

const INSTRUCTIONS: &str = r#"<p><strong>Instructions:</strong></p>
<ul>
<li>Zoom: Mouse scroll or (+/-) buttons</li>
<li>Move: Drag the map</li>
<li>Layer control: Icon in the upper right corner</li>
<li>Darker colors indicate later times</li>
</ul>"#;

/// What to draw: the selected categories and whether markers are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub mode: DisplayMode,
    pub show_markers: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            mode: DisplayMode::Both,
            show_markers: true,
        }
    }
}

/// Builds the full HTML page for `points`.
pub fn render_html(points: &PointSets, options: &RenderOptions, config: &MapConfig) -> Result<String> {
    let (pickups, dropoffs) = points.visible(options.mode);

    let mut script = String::new();
    writeln!(
        script,
        "var map = L.map('map').setView({}, {});",
        serde_json::to_string(&config.center)?,
        config.zoom
    )?;
    script.push_str(
        "L.tileLayer('https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png', {\n\
         \x20 maxZoom: 19,\n\
         \x20 attribution: '&copy; OpenStreetMap contributors'\n\
         }).addTo(map);\n",
    );
    script.push_str("var overlays = {};\n");

    if options.mode.shows_pickups() {
        push_layer(&mut script, "pickup", pickups, &PICKUP, options.show_markers)?;
    }
    if options.mode.shows_dropoffs() {
        push_layer(&mut script, "dropoff", dropoffs, &DROPOFF, options.show_markers)?;
    }

    script.push_str("L.control.layers(null, overlays).addTo(map);\n");

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8"/>
<title>Ride Heatmap</title>
{HEAD_ASSETS}
</head>
<body>
<h1>{PAGE_TITLE}</h1>
{DESCRIPTION}
<div id="map" style="width: {width}px; height: {height}px;"></div>
{INSTRUCTIONS}
<script>
{script}</script>
</body>
</html>
"#,
        width = config.width,
        height = config.height,
    ))
}

fn push_layer(
    script: &mut String,
    id: &str,
    points: &[GeoPoint],
    style: &LayerStyle,
    show_markers: bool,
) -> Result<()> {
    // JSON has no NaN/inf; Leaflet rejects the nulls they would become
    let triples: Vec<[f64; 3]> = points
        .iter()
        .map(GeoPoint::as_triple)
        .filter(|triple| triple.iter().all(|v| v.is_finite()))
        .collect();

    writeln!(script, "var {id}Points = {};", serde_json::to_string(&triples)?)?;
    writeln!(
        script,
        "var {id}Heat = L.heatLayer({id}Points, {{radius: {}, blur: {}, gradient: {}}}).addTo(map);",
        style.radius,
        style.blur,
        style.gradient_json()
    )?;
    writeln!(script, "overlays[{:?}] = {id}Heat;", style.name)?;

    if show_markers {
        writeln!(script, "var {id}Markers = L.layerGroup();")?;
        writeln!(
            script,
            "{id}Points.forEach(function (p) {{\n\
             \x20 L.marker([p[0], p[1]], {{icon: L.AwesomeMarkers.icon({{icon: {:?}, markerColor: {:?}, prefix: 'glyphicon'}})}})\n\
             \x20   .bindTooltip({:?})\n\
             \x20   .addTo({id}Markers);\n\
             }});",
            style.marker_icon, style.marker_color, style.name
        )?;
        writeln!(script, "{id}Markers.addTo(map);")?;
        writeln!(script, "overlays[{:?}] = {id}Markers;", format!("{} markers", style.name))?;
    }

    Ok(())
}
