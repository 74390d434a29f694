/*!
# Vector Export

Turns a laid-out [`TrackRenderer`] into an SVG document: background,
highlight band, one path per fragment, and optional title, ruler and
configuration footer.
*/

use crate::ruler;
use anyhow::{Context, Result};
use seqtrack_core::{FragmentGeometry, HighlightRect, TrackRenderer, ZoomWindow};
use std::path::Path;
use svg::node::element::{Group, Line, Path as SvgPath, Rectangle, Text, Title};
use svg::node::{Comment, Text as TextNode};
use svg::Document;

/// Export configuration
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub width: u32,
    pub show_ruler: bool,
    pub show_footer: bool,
    /// Attach a `<title>` tooltip to every fragment
    pub fragment_titles: bool,
    pub title: Option<String>,
    pub background_color: String,
    pub font_family: String,
    pub font_size: u32,
    pub stroke_width: f64,
    pub fill_opacity: f64,
    pub provenance_comment: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            width: 800,
            show_ruler: true,
            show_footer: true,
            fragment_titles: true,
            title: None,
            background_color: "#ffffff".to_string(),
            font_family: "Arial, sans-serif".to_string(),
            font_size: 12,
            stroke_width: 1.0,
            fill_opacity: 0.9,
            provenance_comment: None,
        }
    }
}

const TITLE_BAND: f64 = 24.0;
const RULER_BAND: f64 = 28.0;
const FOOTER_BAND: f64 = 18.0;

/// SVG exporter for a single track
pub struct SvgExporter {
    config: ExportConfig,
}

impl SvgExporter {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Build the document; `window` supplies the ruler's visible range
    pub fn render_document(&self, track: &TrackRenderer, window: Option<&ZoomWindow>) -> Result<Document> {
        let fragments = track.render().context("Track cannot be drawn yet")?;

        let mut svg = SvgBuilder::new(&self.config, track.height());

        if let Some(comment) = &self.config.provenance_comment {
            svg.add_comment(comment);
        }

        svg.add_background();

        if let Some(title) = &self.config.title {
            svg.add_title(title);
        }

        svg.add_track(track.highlight(), fragments);

        if self.config.show_ruler {
            if let Some(window) = window {
                svg.add_ruler(window);
            }
        }

        if self.config.show_footer {
            svg.add_footer(track, window);
        }

        log::debug!("Rendered {} fragments to SVG", fragments.len());
        Ok(svg.finish())
    }

    /// Serialize to an SVG string
    pub fn render_svg(&self, track: &TrackRenderer, window: Option<&ZoomWindow>) -> Result<String> {
        Ok(self.render_document(track, window)?.to_string())
    }

    /// Export to an SVG file
    pub fn export_svg<P: AsRef<Path>>(&self, path: P, track: &TrackRenderer, window: Option<&ZoomWindow>) -> Result<()> {
        let path = path.as_ref();
        let document = self.render_document(track, window)?;
        svg::save(path, &document).with_context(|| format!("Failed to write SVG to {}", path.display()))?;
        log::info!("Wrote {}", path.display());
        Ok(())
    }
}

/// Accumulates elements top to bottom
struct SvgBuilder {
    config: ExportConfig,
    width: f64,
    track_height: f64,
    track_top: f64,
    comments: Vec<String>,
    elements: Vec<Box<dyn svg::Node>>,
}

impl SvgBuilder {
    fn new(config: &ExportConfig, track_height: f64) -> Self {
        let track_top = if config.title.is_some() { TITLE_BAND } else { 0.0 };
        Self {
            config: config.clone(),
            width: config.width as f64,
            track_height,
            track_top,
            comments: Vec::new(),
            elements: Vec::new(),
        }
    }

    fn height(&self) -> f64 {
        let mut height = self.track_top + self.track_height;
        if self.config.show_ruler {
            height += RULER_BAND;
        }
        if self.config.show_footer {
            height += FOOTER_BAND;
        }
        height
    }

    fn add_comment(&mut self, text: &str) {
        self.comments.push(text.to_string());
    }

    fn add_background(&mut self) {
        self.elements.push(Box::new(
            Rectangle::new()
                .set("width", self.width)
                .set("height", self.height())
                .set("fill", self.config.background_color.as_str()),
        ));
    }

    fn add_title(&mut self, title: &str) {
        self.elements.push(Box::new(
            Text::new()
                .set("x", self.width / 2.0)
                .set("y", self.config.font_size as f64 + 6.0)
                .set("font-family", self.config.font_family.as_str())
                .set("font-size", format!("{}px", self.config.font_size + 2))
                .set("font-weight", "bold")
                .set("text-anchor", "middle")
                .add(TextNode::new(title)),
        ));
    }

    fn add_track(&mut self, highlight: &HighlightRect, fragments: &[FragmentGeometry]) {
        let mut group = Group::new()
            .set("class", "track")
            .set("transform", format!("translate(0,{})", self.track_top));

        group = group.add(
            Rectangle::new()
                .set("class", "highlight")
                .set("x", highlight.x)
                .set("y", 0)
                .set("width", highlight.width)
                .set("height", highlight.height)
                .set("fill", highlight.fill.as_str())
                .set("opacity", highlight.opacity),
        );

        for fragment in fragments {
            group = group.add(self.fragment_path(fragment));
        }
        self.elements.push(Box::new(group));
    }

    fn fragment_path(&self, fragment: &FragmentGeometry) -> SvgPath {
        let mut path = SvgPath::new()
            .set("class", "feature")
            .set("d", fragment.outline.to_path_data())
            .set("transform", format!("translate({},{})", fragment.x, fragment.y))
            .set("fill", fragment.fill.as_str())
            .set("fill-opacity", self.config.fill_opacity)
            .set("stroke", fragment.stroke.as_str())
            .set("stroke-width", self.config.stroke_width)
            .set("data-accession", fragment.accession.as_str())
            .set("data-shape", fragment.shape.name())
            .set("data-lane", fragment.lane);

        if self.config.fragment_titles {
            let label = match &fragment.feature_type {
                Some(ty) => format!("{} {} {}-{}", fragment.accession, ty, fragment.start, fragment.end),
                None => format!("{} {}-{}", fragment.accession, fragment.start, fragment.end),
            };
            path = path.add(Title::new().add(TextNode::new(label)));
        }
        path
    }

    fn add_ruler(&mut self, window: &ZoomWindow) {
        let top = self.track_top + self.track_height;
        let baseline = top + 4.0;

        let mut group = Group::new().set("class", "ruler");
        group = group.add(axis_line(0.0, baseline, self.width, baseline));

        let desired = ((self.width / 80.0).round() as usize).max(2);
        for tick in ruler::ticks(window, window.display_start, window.display_end, desired) {
            group = group
                .add(axis_line(tick.x, baseline, tick.x, baseline + 5.0))
                .add(
                    Text::new()
                        .set("x", tick.x)
                        .set("y", baseline + 6.0 + self.config.font_size as f64)
                        .set("font-family", self.config.font_family.as_str())
                        .set("font-size", format!("{}px", self.config.font_size.saturating_sub(2)))
                        .set("text-anchor", "middle")
                        .add(TextNode::new(tick.label)),
                );
        }
        self.elements.push(Box::new(group));
    }

    fn add_footer(&mut self, track: &TrackRenderer, window: Option<&ZoomWindow>) {
        let range = match window {
            Some(w) => format!("{:.0}-{:.0}", w.display_start, w.display_end),
            None => "n/a".to_string(),
        };
        let footer_text = format!(
            "SeqTrack v{} | Layout: {} | Lanes: {} | Window: {} | Generated: {}",
            seqtrack_core::VERSION,
            track.attributes().layout.name(),
            track.lane_count(),
            range,
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        );
        self.elements.push(Box::new(
            Text::new()
                .set("x", 4)
                .set("y", self.height() - 5.0)
                .set("font-family", self.config.font_family.as_str())
                .set("font-size", format!("{}px", self.config.font_size.saturating_sub(2)))
                .set("fill", "gray")
                .add(TextNode::new(footer_text)),
        ));
    }

    fn finish(self) -> Document {
        let height = self.height();
        let mut document = Document::new()
            .set("width", self.width)
            .set("height", height)
            .set("viewBox", (0.0, 0.0, self.width, height));
        for comment in &self.comments {
            for line in comment.lines() {
                document = document.add(Comment::new(line));
            }
        }
        for element in self.elements {
            document = document.add(element);
        }
        document
    }
}

fn axis_line(x1: f64, y1: f64, x2: f64, y2: f64) -> Line {
    Line::new()
        .set("x1", x1)
        .set("y1", y1)
        .set("x2", x2)
        .set("y2", y2)
        .set("stroke", "black")
        .set("stroke-width", 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use seqtrack_core::{LayoutStrategy, RawFeature, TrackAttributes};

    fn laid_out_track(window: ZoomWindow) -> TrackRenderer {
        let mut track = TrackRenderer::new(TrackAttributes {
            layout: LayoutStrategy::NonOverlapping,
            highlight_start: Some(8),
            highlight_end: Some(12),
            ..Default::default()
        });
        track.attach_mapper(window);
        track.set_data(&[
            RawFeature::span("A", 5, Some(10)).with_type("DOMAIN"),
            RawFeature::span("B", 8, Some(12)).with_type("BINDING"),
        ]);
        track
    }

    fn quiet() -> ExportConfig {
        ExportConfig {
            show_footer: false,
            ..Default::default()
        }
    }

    #[test]
    fn one_path_per_fragment() {
        let window = ZoomWindow::new(40, 400.0);
        let svg = SvgExporter::new(quiet()).render_svg(&laid_out_track(window), Some(&window)).unwrap();
        assert_eq!(svg.matches("class=\"feature\"").count(), 2);
        assert!(svg.contains("data-shape=\"diamond\""));
        assert!(svg.contains("A DOMAIN 5-10"));
        assert!(svg.contains("class=\"highlight\""));
        assert!(svg.contains("class=\"ruler\""));
    }

    #[test]
    fn missing_mapper_is_an_error() {
        let mut track = TrackRenderer::new(TrackAttributes::default());
        track.set_data(&[RawFeature::span("A", 1, None)]);
        let err = SvgExporter::new(quiet()).render_svg(&track, None).unwrap_err();
        assert!(err.to_string().contains("cannot be drawn"));
    }

    #[test]
    fn ruler_and_title_extend_the_canvas() {
        let window = ZoomWindow::new(40, 400.0);
        let track = laid_out_track(window);
        let config = ExportConfig {
            title: Some("P12345".into()),
            ..quiet()
        };
        let document = SvgBuilder::new(&config, track.height());
        assert_eq!(document.height(), TITLE_BAND + track.height() + RULER_BAND);

        let svg = SvgExporter::new(config).render_svg(&track, Some(&window)).unwrap();
        assert!(svg.contains("P12345"));
        assert!(svg.contains("translate(0,24)"));
    }

    #[test]
    fn footer_reports_layout() {
        let window = ZoomWindow::new(40, 400.0);
        let svg = SvgExporter::new(ExportConfig::default())
            .render_svg(&laid_out_track(window), Some(&window))
            .unwrap();
        assert!(svg.contains("Layout: non-overlapping"));
        assert!(svg.contains("Lanes: 2"));
    }
}
