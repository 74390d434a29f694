//! Axis tick placement for the sequence ruler

use seqtrack_core::CoordinateMapper;
use serde::{Deserialize, Serialize};

/// One labelled tick in track pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub position: f64,
    pub x: f64,
    pub label: String,
}

/// Round a length up to a "nice" number: 1, 2, or 5 × 10^k
pub fn nice_step(x: f64) -> f64 {
    if !(x.is_finite() && x > 0.0) {
        return 1.0;
    }
    let exp = x.log10().floor();
    let base = 10f64.powf(exp);
    let mant = x / base;
    let nice = if mant <= 1.0 {
        1.0
    } else if mant <= 2.0 {
        2.0
    } else if mant <= 5.0 {
        5.0
    } else {
        10.0
    };
    (nice * base).max(1.0)
}

/// Residue positions for about `desired` ticks covering `[start, end]`
pub fn tick_positions(start: f64, end: f64, desired: usize) -> Vec<f64> {
    let span = (end - start).max(1.0);
    let step = nice_step(span / desired.max(1) as f64);
    let mut ticks = Vec::new();
    let mut v = (start / step).ceil() * step;
    while v <= end {
        ticks.push(v);
        v += step;
    }
    ticks
}

/// Human-friendly residue count
pub fn format_residues(pos: f64) -> String {
    if pos >= 1e6 {
        format!("{:.1}M", pos / 1e6)
    } else if pos >= 1e4 {
        format!("{:.0}k", pos / 1e3)
    } else {
        format!("{:.0}", pos)
    }
}

/// Ticks for the visible window, centred on each residue
pub fn ticks(mapper: &dyn CoordinateMapper, start: f64, end: f64, desired: usize) -> Vec<Tick> {
    let half_unit = mapper.unit_width() / 2.0;
    tick_positions(start, end, desired)
        .into_iter()
        .map(|position| Tick {
            position,
            x: mapper.map(position) + half_unit,
            label: format_residues(position),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use seqtrack_core::LinearMapper;

    #[test]
    fn steps_are_nice() {
        assert_eq!(nice_step(7.0), 10.0);
        assert_eq!(nice_step(18.0), 20.0);
        assert_eq!(nice_step(41.0), 50.0);
        assert_eq!(nice_step(0.3), 1.0);
        assert_eq!(nice_step(f64::NAN), 1.0);
    }

    #[test]
    fn ticks_cover_the_window() {
        assert_eq!(tick_positions(1.0, 100.0, 5), vec![20.0, 40.0, 60.0, 80.0, 100.0]);
        assert_eq!(tick_positions(3.0, 3.0, 5), vec![3.0]);
    }

    #[test]
    fn ticks_sit_mid_residue() {
        let ticks = ticks(&LinearMapper::new(2.0, 0.0), 1.0, 10.0, 2);
        assert_eq!(ticks[0].position, 5.0);
        assert_eq!(ticks[0].x, 11.0);
        assert_eq!(ticks[0].label, "5");
    }

    #[test]
    fn labels_shorten_large_positions() {
        assert_eq!(format_residues(950.0), "950");
        assert_eq!(format_residues(35_000.0), "35k");
        assert_eq!(format_residues(2_500_000.0), "2.5M");
    }
}
