//! Command implementations for the SeqTrack CLI

pub mod config;
pub mod layout;
pub mod render;

use crate::error::{CliError, CliResult};
use crate::TrackArgs;
use seqtrack_core::attributes::parse_coordinate;
use seqtrack_core::{RawFeature, TrackAttributes};
use std::path::Path;

/// Read a JSON array of feature records
pub fn load_features(path: &Path) -> CliResult<Vec<RawFeature>> {
    if !path.exists() {
        return Err(CliError::file_not_found(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    let features: Vec<RawFeature> = serde_json::from_str(&content)
        .map_err(|e| CliError::parse(path.display().to_string(), e.to_string()))?;
    log::info!("Loaded {} feature records from {}", features.len(), path.display());
    Ok(features)
}

/// Parse `start-end` into integer bounds
pub fn parse_range(range: &str) -> CliResult<(i64, i64)> {
    let invalid = || CliError::validation(format!("Invalid range '{}', expected START-END", range));
    let trimmed = range.trim();
    // A leading '-' is a sign, not the separator
    let split = trimmed
        .char_indices()
        .skip(1)
        .find(|&(_, c)| c == '-')
        .map(|(i, _)| i)
        .ok_or_else(invalid)?;
    let start = parse_coordinate(&trimmed[..split]).ok_or_else(invalid)?;
    let end = parse_coordinate(&trimmed[split + 1..]).ok_or_else(invalid)?;
    if start < 1 || end < 1 {
        return Err(CliError::validation(format!(
            "Invalid range '{}', positions start at 1",
            range
        )));
    }
    Ok((start, end))
}

/// Layer command-line overrides over the configured attributes
pub fn resolve_attributes(base: &TrackAttributes, args: &TrackArgs) -> CliResult<TrackAttributes> {
    let mut attributes = base.clone();

    if let Some(layout) = args.layout {
        attributes.layout = layout.into();
    }

    if let Some(range) = &args.highlight {
        let (start, end) = parse_range(range)?;
        attributes.highlight_start = Some(start);
        attributes.highlight_end = Some(end);
    }

    for pair in &args.attributes {
        let (name, value) = pair
            .split_once('=')
            .ok_or_else(|| CliError::validation(format!("Expected NAME=VALUE, got '{}'", pair)))?;
        attributes.apply(name.trim(), Some(value))?;
    }

    Ok(attributes)
}
