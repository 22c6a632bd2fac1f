//! Gap-based trip segmentation over a chronologically sorted point stream.

use tracing::debug;

use crate::model::{Point, Trip};
use crate::trips::geo::haversine_km;

/// A new trip starts when the time gap to the previous point exceeds this.
const MAX_GAP_MINUTES: f64 = 25.0;
/// A new trip starts when the distance to the previous point exceeds this.
const MAX_GAP_KM: f64 = 2.0;

/// Sorts points by time ascending, in place. The sort is stable, so points
/// sharing a timestamp keep their input order.
pub fn sort_chronologically(points: &mut [Point]) {
    points.sort_by_key(|p| p.time);
}

/// Partitions chronologically sorted points into trips.
///
/// A trip closes immediately before any point whose gap to the immediately
/// preceding point exceeds 25 minutes or 2 km. The gap test is local, never
/// cumulative from the trip start, so a slow drift of small moves can build
/// one arbitrarily long trip. Device ids play no role; all points form a
/// single stream.
///
/// Trips are named `trip_N` in creation order, starting at 1. Empty input
/// yields an empty list; a lone point yields a single one-point trip.
pub fn segment(points: Vec<Point>) -> Vec<Trip> {
    let mut trips = Vec::new();
    let mut current: Vec<Point> = Vec::new();

    for point in points {
        if let Some(prev) = current.last() {
            let time_diff_min = (point.time - prev.time) as f64 / 60.0;
            let dist_km = haversine_km(prev.lat, prev.lon, point.lat, point.lon);

            if time_diff_min > MAX_GAP_MINUTES || dist_km > MAX_GAP_KM {
                debug!(time_diff_min, dist_km, "gap exceeded, closing trip");
                close_trip(&mut trips, std::mem::take(&mut current));
            }
        }
        current.push(point);
    }

    if !current.is_empty() {
        close_trip(&mut trips, current);
    }

    trips
}

fn close_trip(trips: &mut Vec<Trip>, points: Vec<Point>) {
    let name = format!("trip_{}", trips.len() + 1);
    trips.push(Trip { name, points });
}
