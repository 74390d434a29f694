use seqtrack_core::{LayoutStrategy, RawFeature, TrackAttributes, TrackRenderer, ZoomWindow};
use seqtrack_render::{ExportConfig, SvgExporter};

fn demo_features() -> Vec<RawFeature> {
    vec![
        RawFeature::span("P1", 5, Some(10)).with_type("DOMAIN"),
        RawFeature::span("P2", 8, Some(12)).with_type("ACT_SITE"),
        RawFeature::span("P3", 20, Some(25)).with_type("STRAND"),
        RawFeature::span("P4", 22, None).with_type("VARIANT"),
    ]
}

fn demo_track(window: ZoomWindow) -> TrackRenderer {
    let mut track = TrackRenderer::new(TrackAttributes {
        layout: LayoutStrategy::NonOverlapping,
        highlight_start: Some(6),
        highlight_end: Some(9),
        ..Default::default()
    });
    track.attach_mapper(window);
    track.set_data(&demo_features());
    track
}

#[test]
fn svg_export_is_deterministic() {
    let window = ZoomWindow::new(30, 600.0);

    let cfg = ExportConfig {
        width: 600,
        show_ruler: true,
        show_footer: false, // disable dynamic timestamp
        title: Some("Determinism Test".into()),
        provenance_comment: Some("seqtrack render demo.json".into()),
        ..Default::default()
    };
    let exporter = SvgExporter::new(cfg);

    let dir = tempfile::tempdir().unwrap();
    let f1 = dir.path().join("a.svg");
    let f2 = dir.path().join("b.svg");

    exporter.export_svg(&f1, &demo_track(window), Some(&window)).unwrap();
    exporter.export_svg(&f2, &demo_track(window), Some(&window)).unwrap();

    let b1 = std::fs::read(&f1).unwrap();
    let b2 = std::fs::read(&f2).unwrap();
    assert_eq!(b1, b2, "SVG bytes differ between identical renders");
}

#[test]
fn input_order_does_not_change_output() {
    let window = ZoomWindow::new(30, 600.0);
    let exporter = SvgExporter::new(ExportConfig {
        show_footer: false,
        fragment_titles: false,
        ..Default::default()
    });

    let forward = exporter.render_svg(&demo_track(window), Some(&window)).unwrap();

    let mut reversed = demo_track(window);
    let mut data = demo_features();
    data.reverse();
    reversed.set_data(&data);
    let backward = exporter.render_svg(&reversed, Some(&window)).unwrap();

    let mut a: Vec<&str> = forward.lines().collect();
    let mut b: Vec<&str> = backward.lines().collect();
    a.sort_unstable();
    b.sort_unstable();
    assert_eq!(a, b);
}
