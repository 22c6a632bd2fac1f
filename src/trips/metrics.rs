//! Per-trip summary statistics.

use crate::model::{Trip, TripMetrics};
use crate::trips::geo::haversine_km;

/// Computes distance, duration, and speed statistics for one trip.
///
/// Degenerate trips are valid: a single point or duplicate timestamps
/// produce zeros, never errors. The summed pairwise distance feeds both
/// `total_distance_km` and the average-speed numerator, so the two can
/// never drift apart. No rounding happens here; values stay exact until
/// feature-building time.
pub fn aggregate(trip: &Trip) -> TripMetrics {
    let points = &trip.points;

    let mut total_distance_km = 0.0;
    let mut max_speed_kmh: f64 = 0.0;

    for pair in points.windows(2) {
        let dist = haversine_km(pair[0].lat, pair[0].lon, pair[1].lat, pair[1].lon);
        total_distance_km += dist;

        let time_diff_h = (pair[1].time - pair[0].time) as f64 / 3600.0;
        if time_diff_h > 0.0 {
            max_speed_kmh = max_speed_kmh.max(dist / time_diff_h);
        }
    }

    let duration_min = match (points.first(), points.last()) {
        (Some(first), Some(last)) => (last.time - first.time) as f64 / 60.0,
        _ => 0.0,
    };

    let avg_speed_kmh = if duration_min > 0.0 {
        total_distance_km / (duration_min / 60.0)
    } else {
        0.0
    };

    TripMetrics {
        total_distance_km,
        duration_min,
        avg_speed_kmh,
        max_speed_kmh,
    }
}
