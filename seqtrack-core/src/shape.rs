//! Geometry generator
//!
//! Pure function from (pixels per coordinate unit, lane height, feature length,
//! shape kind) to an outline local to the shape's bounding box, origin at the
//! top-left. The caller positions the outline by translating it to
//! `(mapper(start), lane baseline)`.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::str::FromStr;

/// Bezier handle length for a quarter circle
const KAPPA: f64 = 0.552_284_749_8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
    Rectangle,
    Bridge,
    Diamond,
    ChevronLeft,
    ChevronRight,
    Triangle,
    Circle,
    Pin,
    Line,
    Hexagon,
    Pentagon,
    Arrow,
    DoubleBar,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 13] = [
        ShapeKind::Rectangle,
        ShapeKind::Bridge,
        ShapeKind::Diamond,
        ShapeKind::ChevronLeft,
        ShapeKind::ChevronRight,
        ShapeKind::Triangle,
        ShapeKind::Circle,
        ShapeKind::Pin,
        ShapeKind::Line,
        ShapeKind::Hexagon,
        ShapeKind::Pentagon,
        ShapeKind::Arrow,
        ShapeKind::DoubleBar,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Bridge => "bridge",
            ShapeKind::Diamond => "diamond",
            ShapeKind::ChevronLeft => "chevron-left",
            ShapeKind::ChevronRight => "chevron-right",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Circle => "circle",
            ShapeKind::Pin => "pin",
            ShapeKind::Line => "line",
            ShapeKind::Hexagon => "hexagon",
            ShapeKind::Pentagon => "pentagon",
            ShapeKind::Arrow => "arrow",
            ShapeKind::DoubleBar => "double-bar",
        }
    }

    /// Parse a shape name, falling back to [`ShapeKind::Rectangle`] for unknown names
    pub fn from_name_or_default(name: &str) -> Self {
        name.parse().unwrap_or(ShapeKind::Rectangle)
    }
}

impl Default for ShapeKind {
    fn default() -> Self {
        ShapeKind::Rectangle
    }
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownShape(pub String);

impl std::fmt::Display for UnknownShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown shape '{}'", self.0)
    }
}

impl std::error::Error for UnknownShape {}

impl FromStr for ShapeKind {
    type Err = UnknownShape;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_' && !c.is_whitespace())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let kind = match key.as_str() {
            "rectangle" | "rect" => ShapeKind::Rectangle,
            "bridge" => ShapeKind::Bridge,
            "diamond" => ShapeKind::Diamond,
            "chevron" | "chevronleft" => ShapeKind::ChevronLeft,
            "chevronright" => ShapeKind::ChevronRight,
            "triangle" => ShapeKind::Triangle,
            "circle" => ShapeKind::Circle,
            "pin" => ShapeKind::Pin,
            "line" => ShapeKind::Line,
            "hexagon" => ShapeKind::Hexagon,
            "pentagon" => ShapeKind::Pentagon,
            "arrow" => ShapeKind::Arrow,
            "doublebar" => ShapeKind::DoubleBar,
            _ => return Err(UnknownShape(s.to_string())),
        };
        Ok(kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    CubicTo {
        c1: (f64, f64),
        c2: (f64, f64),
        to: (f64, f64),
    },
    Close,
}

/// Resolution-independent outline in shape-local coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    pub width: f64,
    pub height: f64,
    commands: Vec<PathCommand>,
}

impl Outline {
    fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    fn polygon(mut self, points: &[(f64, f64)]) -> Self {
        for (i, &(x, y)) in points.iter().enumerate() {
            self.commands.push(if i == 0 {
                PathCommand::MoveTo(x, y)
            } else {
                PathCommand::LineTo(x, y)
            });
        }
        self.commands.push(PathCommand::Close);
        self
    }

    fn rect(self, x: f64, y: f64, w: f64, h: f64) -> Self {
        self.polygon(&[(x, y), (x + w, y), (x + w, y + h), (x, y + h)])
    }

    /// SVG path data, e.g. `M0,0L10,0L10,5L0,5Z`
    pub fn to_path_data(&self) -> String {
        let mut d = String::new();
        for cmd in &self.commands {
            // Writing into a String cannot fail
            let _ = match cmd {
                PathCommand::MoveTo(x, y) => write!(d, "M{},{}", num(*x), num(*y)),
                PathCommand::LineTo(x, y) => write!(d, "L{},{}", num(*x), num(*y)),
                PathCommand::CubicTo { c1, c2, to } => write!(
                    d,
                    "C{},{} {},{} {},{}",
                    num(c1.0),
                    num(c1.1),
                    num(c2.0),
                    num(c2.1),
                    num(to.0),
                    num(to.1)
                ),
                PathCommand::Close => write!(d, "Z"),
            };
        }
        d
    }
}

fn num(v: f64) -> String {
    let s = format!("{:.3}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" || s.is_empty() {
        "0".to_string()
    } else {
        s.to_string()
    }
}

fn sanitize(v: f64) -> f64 {
    if v.is_finite() {
        v.max(0.0)
    } else {
        0.0
    }
}

/// Outline for one fragment
///
/// `unit_width` is the pixel span of one coordinate unit at the current zoom
/// (callers derive it as `mapper(2) - mapper(1)`), `length` is the fragment
/// length in units (`end - start + 1`).
pub fn feature_shape(unit_width: f64, height: f64, length: u64, kind: ShapeKind) -> Outline {
    let w = sanitize(unit_width) * length.max(1) as f64;
    let h = sanitize(height);
    let outline = Outline::new(w, h);

    match kind {
        ShapeKind::Rectangle => outline.rect(0.0, 0.0, w, h),
        ShapeKind::Bridge => {
            let t = (h / 4.0).min(2.0);
            if w <= 2.0 * t || length <= 1 {
                outline.rect(0.0, 0.0, w, h)
            } else {
                outline.polygon(&[
                    (0.0, h),
                    (0.0, 0.0),
                    (w, 0.0),
                    (w, h),
                    (w - t, h),
                    (w - t, t),
                    (t, t),
                    (t, h),
                ])
            }
        }
        ShapeKind::Diamond => outline.polygon(&[(w / 2.0, 0.0), (w, h / 2.0), (w / 2.0, h), (0.0, h / 2.0)]),
        ShapeKind::ChevronLeft => {
            let d = (h / 2.0).min(w / 2.0);
            outline.polygon(&[(0.0, h / 2.0), (d, 0.0), (w, 0.0), (w - d, h / 2.0), (w, h), (d, h)])
        }
        ShapeKind::ChevronRight => {
            let d = (h / 2.0).min(w / 2.0);
            outline.polygon(&[(0.0, 0.0), (w - d, 0.0), (w, h / 2.0), (w - d, h), (0.0, h), (d, h / 2.0)])
        }
        ShapeKind::Triangle => outline.polygon(&[(w / 2.0, 0.0), (w, h), (0.0, h)]),
        ShapeKind::Circle => {
            let (rx, ry) = (w / 2.0, h / 2.0);
            let (cx, cy) = (rx, ry);
            let (kx, ky) = (rx * KAPPA, ry * KAPPA);
            let mut outline = outline;
            outline.commands.extend([
                PathCommand::MoveTo(cx + rx, cy),
                PathCommand::CubicTo { c1: (cx + rx, cy + ky), c2: (cx + kx, cy + ry), to: (cx, cy + ry) },
                PathCommand::CubicTo { c1: (cx - kx, cy + ry), c2: (cx - rx, cy + ky), to: (cx - rx, cy) },
                PathCommand::CubicTo { c1: (cx - rx, cy - ky), c2: (cx - kx, cy - ry), to: (cx, cy - ry) },
                PathCommand::CubicTo { c1: (cx + kx, cy - ry), c2: (cx + rx, cy - ky), to: (cx + rx, cy) },
                PathCommand::Close,
            ]);
            outline
        }
        ShapeKind::Pin => outline.polygon(&[(w / 2.0, h), (0.0, h / 2.0), (0.0, 0.0), (w, 0.0), (w, h / 2.0)]),
        ShapeKind::Line => {
            let t = (h / 4.0).max(1.0).min(h);
            outline.rect(0.0, (h - t) / 2.0, w, t)
        }
        ShapeKind::Hexagon => {
            let d = (w / 4.0).min(h / 2.0);
            outline.polygon(&[(d, 0.0), (w - d, 0.0), (w, h / 2.0), (w - d, h), (d, h), (0.0, h / 2.0)])
        }
        ShapeKind::Pentagon => outline.polygon(&[
            (w / 2.0, 0.0),
            (w, h * 0.38),
            (w * 0.81, h),
            (w * 0.19, h),
            (0.0, h * 0.38),
        ]),
        ShapeKind::Arrow => {
            let head = (w / 2.0).min(h / 2.0);
            outline.polygon(&[
                (0.0, h / 4.0),
                (w - head, h / 4.0),
                (w - head, 0.0),
                (w, h / 2.0),
                (w - head, h),
                (w - head, h * 0.75),
                (0.0, h * 0.75),
            ])
        }
        ShapeKind::DoubleBar => {
            let bar = (w / 4.0).min(2.0);
            let bridge = (h / 6.0).max(0.5).min(h);
            outline
                .rect(0.0, 0.0, bar, h)
                .rect(w - bar, 0.0, bar, h)
                .rect(bar, (h - bridge) / 2.0, (w - 2.0 * bar).max(0.0), bridge)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_spans_length_times_unit() {
        let outline = feature_shape(2.5, 10.0, 4, ShapeKind::Rectangle);
        assert_eq!(outline.width, 10.0);
        assert_eq!(outline.to_path_data(), "M0,0L10,0L10,10L0,10Z");
    }

    #[test]
    fn unknown_names_fall_back_to_rectangle() {
        assert_eq!(ShapeKind::from_name_or_default("catFace"), ShapeKind::Rectangle);
        assert_eq!(ShapeKind::from_name_or_default("Chevron"), ShapeKind::ChevronLeft);
        assert_eq!(ShapeKind::from_name_or_default("double_bar"), ShapeKind::DoubleBar);
        assert!("nonsense".parse::<ShapeKind>().is_err());
    }

    #[test]
    fn names_round_trip() {
        for kind in ShapeKind::ALL {
            assert_eq!(kind.name().parse::<ShapeKind>(), Ok(kind));
        }
    }

    #[test]
    fn shapes_are_deterministic_and_bounded() {
        for kind in ShapeKind::ALL {
            let a = feature_shape(3.0, 12.0, 5, kind);
            let b = feature_shape(3.0, 12.0, 5, kind);
            assert_eq!(a, b);
            for cmd in a.commands() {
                let points: Vec<(f64, f64)> = match *cmd {
                    PathCommand::MoveTo(x, y) | PathCommand::LineTo(x, y) => vec![(x, y)],
                    PathCommand::CubicTo { c1, c2, to } => vec![c1, c2, to],
                    PathCommand::Close => vec![],
                };
                for (x, y) in points {
                    assert!((-1e-9..=15.0 + 1e-9).contains(&x), "{kind}: x={x}");
                    assert!((-1e-9..=12.0 + 1e-9).contains(&y), "{kind}: y={y}");
                }
            }
        }
    }

    #[test]
    fn line_is_thinner_than_lane() {
        let outline = feature_shape(1.0, 20.0, 10, ShapeKind::Line);
        assert_eq!(outline.to_path_data(), "M0,7.5L10,7.5L10,12.5L0,12.5Z");
    }

    #[test]
    fn degenerate_scale_collapses_to_zero_width() {
        let outline = feature_shape(f64::NAN, 10.0, 3, ShapeKind::Diamond);
        assert_eq!(outline.width, 0.0);
        let outline = feature_shape(-2.0, 10.0, 3, ShapeKind::Rectangle);
        assert_eq!(outline.width, 0.0);
    }
}
