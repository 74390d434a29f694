//! Render command implementation - export a feature track to SVG

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::{load_features, parse_range, resolve_attributes};
use crate::config::Config;
use crate::TrackArgs;
use seqtrack_core::{Feature, TrackRenderer, ZoomWindow};
use seqtrack_render::{ExportConfig, SvgExporter};

#[allow(clippy::too_many_arguments)]
pub fn execute(
    config: &Config,
    input: PathBuf,
    output: PathBuf,
    track_args: TrackArgs,
    width: Option<u32>,
    length: Option<u64>,
    display: Option<String>,
    title: Option<String>,
    no_ruler: bool,
    no_footer: bool,
) -> Result<()> {
    log::info!("Starting track rendering");
    log::info!("Input features: {}", input.display());
    log::info!("Output file: {}", output.display());

    let raw = load_features(&input)?;
    let attributes = resolve_attributes(&config.track, &track_args)?;
    log::info!("Layout: {}", attributes.layout.name());

    let mut track = TrackRenderer::new(attributes).with_styles(config.style_table());
    let rejected = track.set_data(&raw);
    if !rejected.is_empty() {
        log::warn!("{} of {} records were rejected", rejected.len(), raw.len());
    }

    let length = length.unwrap_or_else(|| sequence_extent(track.features()));
    let width = width.unwrap_or(config.render.width);
    let mut window = ZoomWindow::new(length, width as f64);
    if let Some(range) = display {
        let (start, end) = parse_range(&range)?;
        window.set_display(start as f64, end as f64);
    }
    log::info!(
        "Visible window {:.0}-{:.0} of {} residues",
        window.display_start,
        window.display_end,
        window.length
    );
    track.attach_mapper(window);

    let export_cfg = ExportConfig {
        width,
        show_ruler: config.render.show_ruler && !no_ruler,
        show_footer: config.render.show_footer && !no_footer,
        title,
        provenance_comment: Some(build_provenance_comment(&input, &track, &window)),
        ..config.render.export_config()
    };

    SvgExporter::new(export_cfg)
        .export_svg(&output, &track, Some(&window))
        .with_context(|| format!("Failed to render {}", output.display()))?;

    log::info!(
        "Rendered {} fragments in {} lanes",
        track.fragments().len(),
        track.lane_count()
    );
    Ok(())
}

/// Furthest fragment end, at least 1
fn sequence_extent(features: &[Feature]) -> u64 {
    features
        .iter()
        .flat_map(|f| f.locations.iter())
        .flat_map(|l| l.fragments.iter())
        .map(|f| f.end)
        .max()
        .unwrap_or(1)
        .max(1)
}

fn build_provenance_comment(input: &Path, track: &TrackRenderer, window: &ZoomWindow) -> String {
    let attributes = track.attributes();
    let mut lines = vec![
        format!("SeqTrack v{}", seqtrack_core::VERSION),
        format!("Input: {}", input.display()),
        format!(
            "Layout: {} ({} lanes, {} features)",
            attributes.layout.name(),
            track.lane_count(),
            track.features().len()
        ),
        format!(
            "Window: {:.0}-{:.0} of {}",
            window.display_start, window.display_end, window.length
        ),
    ];
    if let (Some(start), Some(end)) = (attributes.highlight_start, attributes.highlight_end) {
        lines.push(format!("Highlight: {}-{}", start, end));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LayoutArg;

    const FEATURES: &str = r#"[
        {"accession": "A", "type": "DOMAIN", "start": 5, "end": 10},
        {"accession": "B", "type": "ACT_SITE", "start": 8, "end": 12},
        {"accession": "C", "type": "HELIX", "start": 20, "end": 25},
        {"accession": "BAD", "start": 10, "end": 5}
    ]"#;

    #[test]
    fn test_render_writes_svg() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("features.json");
        let output = dir.path().join("track.svg");
        std::fs::write(&input, FEATURES)?;

        let args = TrackArgs {
            layout: Some(LayoutArg::NonOverlapping),
            highlight: Some("8-12".into()),
            ..Default::default()
        };
        execute(
            &Config::default(),
            input,
            output.clone(),
            args,
            Some(300),
            Some(30),
            None,
            Some("demo".into()),
            false,
            true,
        )?;

        let svg = std::fs::read_to_string(&output)?;
        assert_eq!(svg.matches("class=\"feature\"").count(), 3);
        assert!(svg.contains("Layout: non-overlapping (2 lanes, 3 features)"));
        assert!(svg.contains("Highlight: 8-12"));
        assert!(!svg.contains("Generated:"));
        Ok(())
    }

    #[test]
    fn test_sequence_extent_defaults_to_one() {
        assert_eq!(sequence_extent(&[]), 1);
    }
}
