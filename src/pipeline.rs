//! Time-range filter over ride records.
//!
//! Turns [`RideRecord`]s into pickup and drop-off [`GeoPoint`]s weighted by
//! time of day. Malformed rows and cells are dropped, never reported as
//! errors; [`run_with_report`] counts what was dropped.

use chrono::{NaiveTime, Timelike};

use crate::parser::{parse_coordinates, parse_time};
use crate::stats::FilterReport;
use crate::types::{GeoPoint, PointSets, RideRecord, TimeRange};

/// Maps a time of day onto `[0, 1)`: midnight is 0.0, 23:59:59 just below 1.
pub fn intensity(time: NaiveTime) -> f64 {
    (time.hour() as f64 + time.minute() as f64 / 60.0 + time.second() as f64 / 3600.0) / 24.0
}

/// Filters `rows` to `range` and returns the pickup and drop-off points in
/// input order.
pub fn run(rows: &[RideRecord], range: &TimeRange) -> PointSets {
    run_with_report(rows, range).0
}

/// Same pass as [`run`], also returning per-row and per-field drop counts.
pub fn run_with_report(rows: &[RideRecord], range: &TimeRange) -> (PointSets, FilterReport) {
    let mut points = PointSets::default();
    let mut report = FilterReport {
        rows: rows.len(),
        ..Default::default()
    };

    for row in rows {
        let Some(time) = parse_time(&row.time_raw) else {
            report.time_unparsed += 1;
            continue;
        };

        if !range.contains(time) {
            report.out_of_range += 1;
            continue;
        }

        let weight = intensity(time);

        match Field::from_cell(row.pickup_raw.as_deref()) {
            Field::Point(lat, lon) => points.pickups.push(point(lat, lon, weight)),
            Field::Missing => report.pickup_missing += 1,
            Field::Invalid => report.pickup_invalid += 1,
        }

        match Field::from_cell(row.dropoff_raw.as_deref()) {
            Field::Point(lat, lon) => points.dropoffs.push(point(lat, lon, weight)),
            Field::Missing => report.dropoff_missing += 1,
            Field::Invalid => report.dropoff_invalid += 1,
        }
    }

    report.pickups = points.pickups.len();
    report.dropoffs = points.dropoffs.len();

    (points, report)
}

enum Field {
    Point(f64, f64),
    Missing,
    Invalid,
}

impl Field {
    fn from_cell(cell: Option<&str>) -> Self {
        match cell {
            None => Field::Missing,
            Some(raw) => match parse_coordinates(Some(raw)) {
                Some((lat, lon)) => Field::Point(lat, lon),
                None => Field::Invalid,
            },
        }
    }
}

fn point(latitude: f64, longitude: f64, intensity: f64) -> GeoPoint {
    GeoPoint {
        latitude,
        longitude,
        intensity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    fn range(start: NaiveTime, end: NaiveTime) -> TimeRange {
        TimeRange::new(start, end).unwrap()
    }

    fn sample_rows() -> Vec<RideRecord> {
        vec![
            RideRecord::new("08:00:00", Some("1,1"), Some("2,2")),
            RideRecord::new("20:00:00", Some("3,3"), None),
        ]
    }

    #[test]
    fn test_run_filters_by_range() {
        let points = run(&sample_rows(), &range(t(8, 0, 0), t(8, 0, 0)));

        assert_eq!(points.pickups.len(), 1);
        assert_eq!(points.dropoffs.len(), 1);

        let pickup = points.pickups[0];
        assert_eq!((pickup.latitude, pickup.longitude), (1.0, 1.0));
        assert!((pickup.intensity - 1.0 / 3.0).abs() < 1e-12);

        let dropoff = points.dropoffs[0];
        assert_eq!((dropoff.latitude, dropoff.longitude), (2.0, 2.0));
        assert!((dropoff.intensity - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_run_bounds_are_inclusive() {
        let rows = vec![
            RideRecord::new("07:59:59", Some("0,0"), None),
            RideRecord::new("08:00:00", Some("1,1"), None),
            RideRecord::new("09:00:00", Some("2,2"), None),
            RideRecord::new("09:00:01", Some("3,3"), None),
        ];

        let points = run(&rows, &range(t(8, 0, 0), t(9, 0, 0)));
        let lats: Vec<f64> = points.pickups.iter().map(|p| p.latitude).collect();
        assert_eq!(lats, vec![1.0, 2.0]);
    }

    #[test]
    fn test_run_skips_unparseable_time() {
        let rows = vec![
            RideRecord::new("", Some("1,1"), Some("1,1")),
            RideRecord::new("9:5:3", Some("2,2"), Some("2,2")),
            RideRecord::new("9:05:03 (UTC+1)", Some("3,3"), Some("3,3")),
        ];

        let (points, report) = run_with_report(&rows, &TimeRange::full_day());
        assert_eq!(points.pickups.len(), 1);
        assert_eq!(points.pickups[0].latitude, 3.0);
        assert_eq!(report.time_unparsed, 2);
    }

    #[test]
    fn test_run_fields_are_independent() {
        let rows = vec![
            RideRecord::new("10:00:00", Some("bad"), Some("5,6")),
            RideRecord::new("11:00:00", Some("7,8"), Some("1,2,3")),
            RideRecord::new("12:00:00", None, None),
        ];

        let (points, report) = run_with_report(&rows, &TimeRange::full_day());
        assert_eq!(points.pickups.len(), 1);
        assert_eq!(points.pickups[0].latitude, 7.0);
        assert_eq!(points.dropoffs.len(), 1);
        assert_eq!(points.dropoffs[0].latitude, 5.0);

        assert_eq!(report.pickup_invalid, 1);
        assert_eq!(report.dropoff_invalid, 1);
        assert_eq!(report.pickup_missing, 1);
        assert_eq!(report.dropoff_missing, 1);
        assert_eq!(report.in_range(), 3);
    }

    #[test]
    fn test_run_preserves_input_order() {
        let rows = vec![
            RideRecord::new("23:00:00", Some("3,0"), None),
            RideRecord::new("01:00:00", Some("1,0"), None),
            RideRecord::new("12:00:00", Some("2,0"), None),
        ];

        let points = run(&rows, &TimeRange::full_day());
        let lats: Vec<f64> = points.pickups.iter().map(|p| p.latitude).collect();
        assert_eq!(lats, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_run_is_idempotent() {
        let rows = sample_rows();
        let full = TimeRange::full_day();

        assert_eq!(run(&rows, &full), run(&rows, &full));
    }

    #[test]
    fn test_run_with_report_counts() {
        let (points, report) = run_with_report(&sample_rows(), &range(t(8, 0, 0), t(8, 0, 0)));

        assert_eq!(report.rows, 2);
        assert_eq!(report.out_of_range, 1);
        assert_eq!(report.pickups, points.pickups.len());
        assert_eq!(report.dropoffs, points.dropoffs.len());
    }

    #[test]
    fn test_intensity_bounds() {
        assert_eq!(intensity(t(0, 0, 0)), 0.0);
        assert!((intensity(t(12, 0, 0)) - 0.5).abs() < 1e-12);
        assert!((intensity(t(23, 59, 0)) - 0.99930).abs() < 1e-4);
        assert!(intensity(t(23, 59, 59)) < 1.0);
    }

    #[test]
    fn test_intensity_strictly_increasing() {
        let mut previous = -1.0;
        for h in 0..24 {
            for m in 0..60 {
                for s in [0, 1, 30, 59] {
                    let value = intensity(t(h, m, s));
                    assert!(value > previous, "{h}:{m}:{s} not increasing");
                    assert!((0.0..1.0).contains(&value));
                    previous = value;
                }
            }
        }
    }
}
