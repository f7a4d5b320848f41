use serde::Serialize;

/// Counters collected during one filter pass.
///
/// Rows dropped for malformed data are never surfaced on the map; this is
/// what gets logged instead.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct FilterReport {
    pub rows: usize,

    // row-level drops
    pub time_unparsed: usize,
    pub out_of_range: usize,

    // emitted points
    pub pickups: usize,
    pub dropoffs: usize,

    // field-level drops
    pub pickup_missing: usize,
    pub pickup_invalid: usize,
    pub dropoff_missing: usize,
    pub dropoff_invalid: usize,
}

impl FilterReport {
    pub fn pct(part: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            (part as f64 / total as f64) * 100.0
        }
    }

    /// Rows that passed both the time parse and the range check.
    pub fn in_range(&self) -> usize {
        self.rows.saturating_sub(self.skipped_rows())
    }

    /// Rows dropped entirely, neither list received a point from them.
    pub fn skipped_rows(&self) -> usize {
        self.time_unparsed + self.out_of_range
    }

    pub fn time_unparsed_pct(&self) -> f64 {
        Self::pct(self.time_unparsed, self.rows)
    }
}
