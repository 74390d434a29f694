//! Layout command implementation - report lane assignments as JSON

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;

use super::{load_features, resolve_attributes};
use crate::config::Config;
use crate::TrackArgs;
use seqtrack_core::types::iter_fragments;
use seqtrack_core::{RawFeature, SeqPos, StyleTable, TrackAttributes, TrackRenderer};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneReport {
    pub layout: &'static str,
    pub lane_count: usize,
    pub fragments: Vec<LaneEntry>,
    pub errors: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneEntry {
    pub accession: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub feature_type: Option<String>,
    pub location: usize,
    pub fragment: usize,
    pub start: SeqPos,
    pub end: SeqPos,
    pub lane: usize,
    pub color: String,
    pub shape: &'static str,
}

/// Lay out `raw` and describe the result
pub fn build_report(raw: &[RawFeature], attributes: TrackAttributes, styles: StyleTable) -> LaneReport {
    let layout = attributes.layout.name();
    let mut track = TrackRenderer::new(attributes).with_styles(styles);
    let errors = track.set_data(raw).iter().map(|e| e.to_string()).collect();

    let fragments = iter_fragments(track.features())
        .map(|(key, feature, fragment)| LaneEntry {
            accession: feature.accession.clone(),
            feature_type: feature.feature_type.clone(),
            location: key.location,
            fragment: key.fragment,
            start: fragment.start,
            end: fragment.end,
            lane: track.lane_of(&key),
            color: track.resolve_color(feature).to_string(),
            shape: track.resolve_shape(feature).name(),
        })
        .collect();

    LaneReport {
        layout,
        lane_count: track.lane_count(),
        fragments,
        errors,
    }
}

pub fn execute(config: &Config, input: PathBuf, output: Option<PathBuf>, track_args: TrackArgs) -> Result<()> {
    let raw = load_features(&input)?;
    let attributes = resolve_attributes(&config.track, &track_args)?;
    let report = build_report(&raw, attributes, config.style_table());
    log::info!(
        "Assigned {} fragments to {} lanes ({} rejected)",
        report.fragments.len(),
        report.lane_count,
        report.errors.len()
    );

    let json = serde_json::to_string_pretty(&report).context("Failed to serialize lane report")?;
    match output {
        Some(path) => {
            std::fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Wrote lane report to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use seqtrack_core::LayoutStrategy;

    fn scenario() -> Vec<RawFeature> {
        vec![
            RawFeature::span("A", 5, Some(10)),
            RawFeature::span("B", 8, Some(12)),
            RawFeature::span("C", 20, Some(25)),
            RawFeature::span("D", 10, Some(5)),
        ]
    }

    #[test]
    fn test_non_overlapping_report() {
        let attributes = TrackAttributes {
            layout: LayoutStrategy::NonOverlapping,
            ..Default::default()
        };
        let report = build_report(&scenario(), attributes, StyleTable::builtin());
        let lanes: Vec<usize> = report.fragments.iter().map(|f| f.lane).collect();
        assert_eq!(lanes, vec![0, 1, 0]);
        assert_eq!(report.lane_count, 2);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.fragments[0].color, "black");
    }

    #[test]
    fn test_stacked_report_serializes() {
        let report = build_report(&scenario(), TrackAttributes::default(), StyleTable::builtin());
        assert!(report.fragments.iter().all(|f| f.lane == 0));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["layout"], "stacked");
        assert_eq!(json["laneCount"], 1);
        assert_eq!(json["fragments"][2]["accession"], "C");
    }
}
