//! Output writers for the reject log and the GeoJSON document.

use anyhow::{Context, Result};
use geojson::FeatureCollection;
use tracing::{debug, info};

use std::fs;
use std::path::Path;

/// Writes rejected rows to `path`, one raw comma-joined line per reject,
/// in input order. Nothing is written when there were no rejects.
pub fn write_rejects(path: &Path, rejects: &[String]) -> Result<()> {
    if rejects.is_empty() {
        debug!("no rejects, skipping reject log");
        return Ok(());
    }

    fs::write(path, rejects.join("\n"))
        .with_context(|| format!("failed to write reject log {}", path.display()))?;

    info!(count = rejects.len(), path = %path.display(), "reject log written");
    Ok(())
}

/// Writes the feature collection to `path` as pretty-printed GeoJSON.
/// An empty collection still produces a document with an empty `features`
/// list.
pub fn write_geojson(path: &Path, collection: &FeatureCollection) -> Result<()> {
    let json = serde_json::to_string_pretty(collection)
        .context("failed to serialize feature collection")?;

    fs::write(path, json)
        .with_context(|| format!("failed to write GeoJSON output {}", path.display()))?;

    info!(features = collection.features.len(), path = %path.display(), "GeoJSON written");
    Ok(())
}
