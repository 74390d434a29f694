//! Highlight region tracker
//!
//! Keeps one optional highlighted interval and its pixel rectangle. A
//! malformed interval hides the rectangle (zero opacity) rather than
//! removing it.

use crate::mapper::CoordinateMapper;
use serde::{Deserialize, Serialize};

pub const HIGHLIGHT_FILL: &str = "rgba(255, 235, 59, 0.8)";
pub const HIGHLIGHT_OPACITY: f64 = 0.3;

/// Closed coordinate interval with `end >= start`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightInterval {
    start: i64,
    end: i64,
}

impl HighlightInterval {
    pub fn new(start: i64, end: i64) -> Option<Self> {
        (end >= start).then_some(Self { start, end })
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightRect {
    pub x: f64,
    pub width: f64,
    pub height: f64,
    pub opacity: f64,
    pub fill: String,
}

impl HighlightRect {
    fn hidden(height: f64) -> Self {
        Self {
            x: 0.0,
            width: 0.0,
            height,
            opacity: 0.0,
            fill: HIGHLIGHT_FILL.to_string(),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }
}

#[derive(Debug, Clone)]
pub struct HighlightTracker {
    interval: Option<HighlightInterval>,
    rect: HighlightRect,
}

impl HighlightTracker {
    pub fn new(height: f64) -> Self {
        Self {
            interval: None,
            rect: HighlightRect::hidden(height),
        }
    }

    /// Replace the interval; a missing bound or `end < start` clears it
    pub fn set_bounds(&mut self, start: Option<i64>, end: Option<i64>) {
        self.interval = match (start, end) {
            (Some(start), Some(end)) => HighlightInterval::new(start, end),
            _ => None,
        };
    }

    /// Hide the rectangle without forgetting the interval
    pub fn hide(&mut self) {
        self.rect = HighlightRect::hidden(self.rect.height);
    }

    pub fn set_height(&mut self, height: f64) {
        self.rect.height = height;
    }

    pub fn interval(&self) -> Option<HighlightInterval> {
        self.interval
    }

    pub fn rect(&self) -> &HighlightRect {
        &self.rect
    }

    /// Recompute the rectangle from the current mapper
    pub fn refresh(&mut self, mapper: &dyn CoordinateMapper) {
        let height = self.rect.height;
        self.rect = match self.interval {
            Some(interval) => {
                let x = mapper.map(interval.start as f64);
                let span = interval.end.saturating_sub(interval.start).saturating_add(1) as f64;
                let width = mapper.map(span) - mapper.map(0.0);
                if x.is_finite() && width.is_finite() && width >= 0.0 {
                    HighlightRect {
                        x,
                        width,
                        height,
                        opacity: HIGHLIGHT_OPACITY,
                        fill: HIGHLIGHT_FILL.to_string(),
                    }
                } else {
                    HighlightRect::hidden(height)
                }
            }
            None => HighlightRect::hidden(height),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::LinearMapper;

    #[test]
    fn well_formed_interval_is_visible() {
        let mut tracker = HighlightTracker::new(44.0);
        tracker.set_bounds(Some(10), Some(19));
        tracker.refresh(&LinearMapper::new(2.0, 5.0));
        let rect = tracker.rect();
        assert!(rect.is_visible());
        assert_eq!(rect.x, 25.0);
        assert_eq!(rect.width, 20.0);
        assert_eq!(rect.height, 44.0);
        assert_eq!(rect.opacity, HIGHLIGHT_OPACITY);
    }

    #[test]
    fn hide_keeps_the_interval() {
        let mut tracker = HighlightTracker::new(44.0);
        tracker.set_bounds(Some(2), Some(4));
        tracker.refresh(&LinearMapper::new(1.0, 0.0));
        tracker.hide();
        assert!(!tracker.rect().is_visible());
        assert_eq!(tracker.rect().height, 44.0);
        assert!(tracker.interval().is_some());
    }

    #[test]
    fn reversed_interval_is_hidden() {
        let mut tracker = HighlightTracker::new(44.0);
        tracker.set_bounds(Some(20), Some(10));
        tracker.refresh(&LinearMapper::new(2.0, 0.0));
        assert!(!tracker.rect().is_visible());
        assert_eq!(tracker.rect().width, 0.0);
        assert!(tracker.interval().is_none());
    }

    #[test]
    fn clearing_one_bound_hides() {
        let mut tracker = HighlightTracker::new(10.0);
        tracker.set_bounds(Some(1), Some(5));
        tracker.refresh(&LinearMapper::new(1.0, 0.0));
        assert!(tracker.rect().is_visible());
        tracker.set_bounds(None, Some(5));
        tracker.refresh(&LinearMapper::new(1.0, 0.0));
        assert!(!tracker.rect().is_visible());
    }

    #[test]
    fn rect_follows_the_mapper() {
        let mut tracker = HighlightTracker::new(10.0);
        tracker.set_bounds(Some(3), Some(3));
        tracker.refresh(&LinearMapper::new(1.0, 0.0));
        assert_eq!(tracker.rect().width, 1.0);
        tracker.refresh(&LinearMapper::new(8.0, 0.0));
        assert_eq!(tracker.rect().width, 8.0);
        assert_eq!(tracker.rect().x, 24.0);
    }
}
