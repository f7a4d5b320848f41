//! Output formatting and persistence for filter results.
//!
//! Supports logging the filter report, CSV export of point lists, and
//! writing the rendered map page.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use crate::stats::FilterReport;
use crate::types::GeoPoint;
use csv::WriterBuilder;
use std::fs::File;
use std::path::Path;

/// Logs the filter report using Rust's debug pretty-print format.
pub fn print_pretty(report: &FilterReport) {
    debug!("{:#?}", report);
}

/// Logs the filter report as pretty-printed JSON.
pub fn print_json(report: &FilterReport) -> Result<()> {
    debug!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

#[derive(Serialize)]
struct PointRow<'a> {
    category: &'a str,
    latitude: f64,
    longitude: f64,
    intensity: f64,
}

/// Writes the given point lists to a CSV file, one row per point, replacing
/// any existing file.
///
/// Each `(category, points)` pair is written in order; the header is
/// `category,latitude,longitude,intensity`.
pub fn write_points(path: &str, categories: &[(&str, &[GeoPoint])]) -> Result<usize> {
    let file = File::create(path).with_context(|| format!("failed to create {path}"))?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    let mut written = 0;
    for &(category, points) in categories {
        for point in points {
            writer.serialize(PointRow {
                category,
                latitude: point.latitude,
                longitude: point.longitude,
                intensity: point.intensity,
            })?;
            written += 1;
        }
    }
    writer.flush()?;

    debug!(path, written, "Points exported");
    Ok(written)
}

/// Writes a rendered page to `path`, creating parent directories as needed.
pub fn write_html(path: &str, html: &str) -> Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    std::fs::write(path, html).with_context(|| format!("failed to write {path}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tracing::Level;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn point(latitude: f64, longitude: f64, intensity: f64) -> GeoPoint {
        GeoPoint {
            latitude,
            longitude,
            intensity,
        }
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&FilterReport::default());
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&FilterReport::default()).unwrap();
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn captured_json(max_level: Level) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(max_level)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            print_json(&FilterReport::default()).unwrap();
        });

        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_print_json_logs_at_debug_only() {
        assert!(captured_json(Level::INFO).is_empty());
        assert!(captured_json(Level::DEBUG).contains("\"time_unparsed\": 0"));
    }

    #[test]
    fn test_write_points_header_and_rows() {
        let path = temp_path("ride_heatmap_test_points.csv");
        let _ = fs::remove_file(&path);

        let pickups = vec![point(1.0, 2.0, 0.5)];
        let dropoffs = vec![point(3.0, 4.0, 0.25), point(5.0, 6.0, 0.75)];
        let written =
            write_points(&path, &[("pickup", pickups.as_slice()), ("dropoff", dropoffs.as_slice())])
                .unwrap();
        assert_eq!(written, 3);

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(
            lines,
            vec![
                "category,latitude,longitude,intensity",
                "pickup,1.0,2.0,0.5",
                "dropoff,3.0,4.0,0.25",
                "dropoff,5.0,6.0,0.75",
            ]
        );

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_points_replaces_existing_file() {
        let path = temp_path("ride_heatmap_test_points_replace.csv");
        let pickups = vec![point(1.0, 2.0, 0.5)];

        write_points(&path, &[("pickup", pickups.as_slice())]).unwrap();
        write_points(&path, &[("pickup", pickups.as_slice())]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_html_creates_parent_dir() {
        let dir = temp_path("ride_heatmap_test_html");
        let path = format!("{dir}/nested/map.html");
        let _ = fs::remove_dir_all(&dir);

        write_html(&path, "<html></html>").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "<html></html>");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_write_html_reports_blocked_parent() {
        let blocker = temp_path("ride_heatmap_test_html_blocker");
        let _ = fs::remove_dir_all(&blocker);
        fs::write(&blocker, "not a directory").unwrap();

        let err = write_html(&format!("{blocker}/map.html"), "<html></html>").unwrap_err();
        assert!(err.to_string().contains("failed to create"));

        fs::remove_file(&blocker).unwrap();
    }
}
