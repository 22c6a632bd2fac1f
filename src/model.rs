//! Typed records for each stage of the trip pipeline.

use serde::Serialize;

/// A single row as read from the input CSV: untyped, untrusted.
///
/// Only rows with at least four fields become a `RawRecord`; shorter rows
/// are rejected at the structural check before construction.
#[derive(Debug, Clone)]
pub struct RawRecord {
    pub device_id: String,
    pub lat: String,
    pub lon: String,
    pub timestamp: String,
    /// Fields past the first four, kept so rejects echo the full row.
    pub extra: Vec<String>,
}

impl RawRecord {
    /// The original fields comma-joined, as echoed to the reject log.
    pub fn raw_line(&self) -> String {
        let mut fields = vec![
            self.device_id.as_str(),
            self.lat.as_str(),
            self.lon.as_str(),
            self.timestamp.as_str(),
        ];
        fields.extend(self.extra.iter().map(String::as_str));
        fields.join(",")
    }
}

/// A validated GPS fix. Coordinates are range-checked and the timestamp is
/// resolved to epoch seconds; immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub device_id: String,
    pub lat: f64,
    pub lon: f64,
    /// Timestamp as it appeared in the input.
    pub timestamp: String,
    /// Epoch seconds, UTC.
    pub time: i64,
}

/// A non-empty run of chronologically contiguous points.
///
/// Invariant: every adjacent pair is within both the time and distance gap
/// thresholds (checked pairwise against the immediately preceding point,
/// not cumulatively from the trip start).
#[derive(Debug, Clone)]
pub struct Trip {
    /// Sequential name, `trip_1` onward, in creation order.
    pub name: String,
    pub points: Vec<Point>,
}

/// Summary statistics for one trip. Computed once after segmentation;
/// values are unrounded until feature-building time.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct TripMetrics {
    pub total_distance_km: f64,
    pub duration_min: f64,
    pub avg_speed_kmh: f64,
    pub max_speed_kmh: f64,
}
