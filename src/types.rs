//! Data types shared by the loader, the filter pipeline and the renderer.

use anyhow::{Result, bail};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// A single ride as read from the source sheet, before any parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RideRecord {
    pub time_raw: String,
    pub pickup_raw: Option<String>,
    pub dropoff_raw: Option<String>,
}

impl RideRecord {
    pub fn new(time_raw: &str, pickup_raw: Option<&str>, dropoff_raw: Option<&str>) -> Self {
        RideRecord {
            time_raw: time_raw.to_string(),
            pickup_raw: pickup_raw.map(str::to_string),
            dropoff_raw: dropoff_raw.map(str::to_string),
        }
    }
}

/// A weighted point on the map. `intensity` lies in `[0, 1)` and grows with
/// the time of day of the ride it came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub intensity: f64,
}

impl GeoPoint {
    /// `[lat, lon, intensity]`, the triple layout Leaflet.heat expects.
    pub fn as_triple(&self) -> [f64; 3] {
        [self.latitude, self.longitude, self.intensity]
    }
}

/// Inclusive wall-clock window. Wrapping past midnight is not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeRange {
    /// # Errors
    ///
    /// Returns an error if `start` is later than `end`.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self> {
        if start > end {
            bail!("time range start {start} is after end {end}");
        }
        Ok(TimeRange { start, end })
    }

    /// `00:00:00..=23:59:59`.
    pub fn full_day() -> Self {
        TimeRange {
            start: NaiveTime::MIN,
            end: NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN),
        }
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        self.start <= time && time <= self.end
    }
}

/// Which point categories are drawn on the map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum DisplayMode {
    #[default]
    Both,
    OnlyPickup,
    OnlyDropoff,
}

impl DisplayMode {
    pub fn shows_pickups(self) -> bool {
        matches!(self, DisplayMode::Both | DisplayMode::OnlyPickup)
    }

    pub fn shows_dropoffs(self) -> bool {
        matches!(self, DisplayMode::Both | DisplayMode::OnlyDropoff)
    }
}

/// Output of one filter pass: pickup and drop-off points in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PointSets {
    pub pickups: Vec<GeoPoint>,
    pub dropoffs: Vec<GeoPoint>,
}

impl PointSets {
    /// Returns the `(pickups, dropoffs)` slices selected by `mode`; a hidden
    /// category comes back empty.
    pub fn visible(&self, mode: DisplayMode) -> (&[GeoPoint], &[GeoPoint]) {
        let pickups: &[GeoPoint] = if mode.shows_pickups() {
            &self.pickups
        } else {
            &[]
        };
        let dropoffs: &[GeoPoint] = if mode.shows_dropoffs() {
            &self.dropoffs
        } else {
            &[]
        };
        (pickups, dropoffs)
    }
}
