//! GeoJSON feature construction for segmented trips.

use anyhow::Result;
use geo_types::LineString;
use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde_json::{Map, to_value};

use crate::model::{Trip, TripMetrics};
use crate::trips::metrics;

/// Display colors cycled across trips in output order.
const PALETTE: [&str; 5] = ["#FF0000", "#0000FF", "#00FF00", "#FFA500", "#800080"];

/// The display color for the trip at `index` in output order.
pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Rounds to `decimals` places.
fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Metric values as they appear in feature properties. Rounding happens at
/// this output edge only, so rounding error never accumulates across trips.
fn rounded(metrics: &TripMetrics) -> TripMetrics {
    TripMetrics {
        total_distance_km: round_to(metrics.total_distance_km, 3),
        duration_min: round_to(metrics.duration_min, 2),
        avg_speed_kmh: round_to(metrics.avg_speed_kmh, 2),
        max_speed_kmh: round_to(metrics.max_speed_kmh, 2),
    }
}

/// Builds the output feature for one trip: a `LineString` of `[lon, lat]`
/// pairs in trip order, plus named metrics and a cycled palette color.
///
/// Note the axis order: GeoJSON coordinates are longitude first, reversed
/// from the point's (lat, lon) storage.
pub fn build_feature(trip: &Trip, metrics: &TripMetrics, index: usize) -> Result<Feature> {
    let coords: Vec<(f64, f64)> = trip.points.iter().map(|p| (p.lon, p.lat)).collect();
    let line = LineString::from(coords);

    let mut properties = Map::new();
    properties.insert("trip_name".to_string(), trip.name.clone().into());
    if let serde_json::Value::Object(fields) = to_value(rounded(metrics))? {
        properties.extend(fields);
    }
    properties.insert("color".to_string(), palette_color(index).into());

    Ok(Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::from(&line))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    })
}

/// Computes metrics and builds one feature per trip, assigning palette
/// indices in trip creation (chronological) order.
pub fn build_collection(trips: &[Trip]) -> Result<FeatureCollection> {
    let features = trips
        .iter()
        .enumerate()
        .map(|(index, trip)| {
            let trip_metrics = metrics::aggregate(trip);
            build_feature(trip, &trip_metrics, index)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Point;

    fn pt(lat: f64, lon: f64, time: i64) -> Point {
        Point {
            device_id: "dev1".to_string(),
            lat,
            lon,
            timestamp: time.to_string(),
            time,
        }
    }

    fn one_point_trip(n: usize, time: i64) -> Trip {
        Trip {
            name: format!("trip_{n}"),
            points: vec![pt(10.0, 20.0, time)],
        }
    }

    #[test]
    fn test_palette_cycles_every_five_trips() {
        let trips: Vec<Trip> = (0..7)
            .map(|i| one_point_trip(i + 1, i as i64 * 26 * 60))
            .collect();

        let collection = build_collection(&trips).unwrap();

        let colors: Vec<&str> = collection
            .features
            .iter()
            .map(|f| f.properties.as_ref().unwrap()["color"].as_str().unwrap())
            .collect();

        assert_eq!(
            colors,
            vec![
                "#FF0000", "#0000FF", "#00FF00", "#FFA500", "#800080", "#FF0000", "#0000FF",
            ]
        );
    }

    #[test]
    fn test_coordinates_are_lon_lat() {
        let trip = Trip {
            name: "trip_1".to_string(),
            points: vec![pt(51.5, -0.12, 0), pt(51.6, -0.13, 60)],
        };
        let trip_metrics = metrics::aggregate(&trip);

        let feature = build_feature(&trip, &trip_metrics, 0).unwrap();

        let Some(Geometry {
            value: Value::LineString(coords),
            ..
        }) = feature.geometry
        else {
            panic!("expected LineString geometry");
        };

        assert_eq!(coords.len(), 2);
        assert_eq!(coords[0], vec![-0.12, 51.5]);
        assert_eq!(coords[1], vec![-0.13, 51.6]);
    }

    #[test]
    fn test_properties_hold_rounded_metrics() {
        let trip = Trip {
            name: "trip_1".to_string(),
            points: vec![pt(0.0, 0.0, 0), pt(0.0, 0.01, 600)],
        };
        let trip_metrics = metrics::aggregate(&trip);

        let feature = build_feature(&trip, &trip_metrics, 0).unwrap();
        let props = feature.properties.unwrap();

        assert_eq!(props["trip_name"], "trip_1");
        assert_eq!(props["total_distance_km"], 1.112);
        assert_eq!(props["duration_min"], 10.0);
        assert_eq!(props["avg_speed_kmh"], 6.67);
        assert_eq!(props["max_speed_kmh"], 6.67);
        assert_eq!(props["color"], "#FF0000");
        assert_eq!(props.len(), 6);
    }

    #[test]
    fn test_empty_trip_list_builds_empty_collection() {
        let collection = build_collection(&[]).unwrap();
        assert!(collection.features.is_empty());
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 3), 1.235);
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(0.0, 2), 0.0);
    }
}
