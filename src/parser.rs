//! CSV input parsing and validation.
//!
//! The single boundary where untrusted rows become typed [`Point`]s. Rows
//! failing the structural or semantic checks are captured verbatim for the
//! reject log and never abort the run.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info};

use crate::model::{Point, RawRecord};

/// Validated points plus the raw text of every rejected row, in input order.
#[derive(Debug, Default)]
pub struct ParseOutcome {
    pub points: Vec<Point>,
    pub rejects: Vec<String>,
}

/// Reads and validates the input CSV at `path`.
///
/// # Errors
///
/// A missing or unreadable input file is fatal for the whole run. Individual
/// malformed rows are diverted to [`ParseOutcome::rejects`] instead.
pub fn load_points(path: &Path) -> Result<ParseOutcome> {
    let file =
        File::open(path).with_context(|| format!("cannot open input file {}", path.display()))?;
    read_points(file)
}

/// Reads records from any CSV source. The first row is consumed as a header.
pub fn read_points<R: std::io::Read>(reader: R) -> Result<ParseOutcome> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);

    let mut outcome = ParseOutcome::default();

    for result in rdr.records() {
        let record = result.context("failed to read CSV record")?;

        if record.len() < 4 {
            debug!(fields = record.len(), "row rejected: fewer than 4 fields");
            outcome.rejects.push(join_fields(&record));
            continue;
        }

        let raw = raw_record(&record);
        match validate(&raw) {
            Some(point) => outcome.points.push(point),
            None => {
                debug!(device_id = %raw.device_id, "row rejected: invalid coordinates or timestamp");
                outcome.rejects.push(raw.raw_line());
            }
        }
    }

    info!(
        accepted = outcome.points.len(),
        rejected = outcome.rejects.len(),
        "input parsed"
    );

    Ok(outcome)
}

/// Checks coordinate ranges and timestamp parseability, converting the raw
/// row into a typed [`Point`] on success. All other fields pass through
/// unchanged.
pub fn validate(record: &RawRecord) -> Option<Point> {
    let lat: f64 = record.lat.trim().parse().ok()?;
    let lon: f64 = record.lon.trim().parse().ok()?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return None;
    }

    let time = parse_timestamp(&record.timestamp)?;

    Some(Point {
        device_id: record.device_id.clone(),
        lat,
        lon,
        timestamp: record.timestamp.clone(),
        time: time.timestamp(),
    })
}

/// Parses a free-form timestamp into UTC, trying a fixed set of common
/// formats. Naive date-times are interpreted as UTC; a bare integer is
/// taken as epoch seconds. Any failure to parse is a rejection, not an
/// error.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }

    if let Ok(secs) = text.parse::<i64>() {
        return DateTime::from_timestamp(secs, 0);
    }

    None
}

fn raw_record(record: &StringRecord) -> RawRecord {
    RawRecord {
        device_id: record[0].to_string(),
        lat: record[1].to_string(),
        lon: record[2].to_string(),
        timestamp: record[3].to_string(),
        extra: record.iter().skip(4).map(str::to_string).collect(),
    }
}

fn join_fields(record: &StringRecord) -> String {
    record.iter().collect::<Vec<_>>().join(",")
}
