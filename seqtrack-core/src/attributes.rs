//! Track-level configuration
//!
//! Attributes arrive either as a typed [`TrackAttributes`] value (for example
//! deserialized from a config file) or one at a time as strings through
//! [`TrackAttributes::apply`], which reports what has to be recomputed.

use crate::error::{TrackError, TrackResult};
use crate::layout::{LayoutConfig, LayoutStrategy};
use crate::tooltip::TooltipTrigger;
use serde::{Deserialize, Serialize};

/// Space above and below the lanes
pub const TRACK_MARGIN_TOP: f64 = 10.0;
pub const TRACK_MARGIN_BOTTOM: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackAttributes {
    /// Pixel height of the whole track
    #[serde(default = "default_track_height")]
    pub track_height: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight_start: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight_end: Option<i64>,

    /// Track-wide color, beats the type table but not a feature's own color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Track-wide shape, beats the type table but not a feature's own shape
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,

    #[serde(default = "default_color")]
    pub default_color: String,

    #[serde(default = "default_shape")]
    pub default_shape: String,

    #[serde(default)]
    pub layout: LayoutStrategy,

    #[serde(default)]
    pub tooltip_event: TooltipTrigger,

    #[serde(default = "default_min_lane_height")]
    pub min_lane_height: f64,

    #[serde(default = "default_lane_padding")]
    pub lane_padding: f64,
}

fn default_track_height() -> f64 { 44.0 }
fn default_color() -> String { "black".to_string() }
fn default_shape() -> String { "rectangle".to_string() }
fn default_min_lane_height() -> f64 { 4.0 }
fn default_lane_padding() -> f64 { 2.0 }

impl Default for TrackAttributes {
    fn default() -> Self {
        Self {
            track_height: default_track_height(),
            highlight_start: None,
            highlight_end: None,
            color: None,
            shape: None,
            default_color: default_color(),
            default_shape: default_shape(),
            layout: LayoutStrategy::default(),
            tooltip_event: TooltipTrigger::default(),
            min_lane_height: default_min_lane_height(),
            lane_padding: default_lane_padding(),
        }
    }
}

/// What an attribute change invalidates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeChange {
    /// Lanes must be recomputed (strategy or height changed)
    Layout,
    /// Colors or shapes changed; lanes stay
    Style,
    Highlight,
    Tooltip,
    /// Attribute belongs to another component
    Ignored,
}

/// Parse an integer attribute; anything but a plain integer yields `None`
pub fn parse_coordinate(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok()
}

impl TrackAttributes {
    /// Vertical band handed to the layout engine
    pub fn layout_config(&self) -> LayoutConfig {
        let band = self.track_height - TRACK_MARGIN_TOP - TRACK_MARGIN_BOTTOM;
        LayoutConfig {
            layout_height: band.max(self.min_lane_height),
            min_lane_height: self.min_lane_height,
            lane_padding: self.lane_padding,
        }
    }

    /// Apply one string attribute, `None` meaning the attribute was removed
    pub fn apply(&mut self, name: &str, value: Option<&str>) -> TrackResult<AttributeChange> {
        let value = value.map(str::trim).filter(|v| !v.is_empty());
        let invalid = |v: &str| TrackError::invalid_attribute(name, v);

        let change = match name.to_ascii_lowercase().as_str() {
            "height" => {
                self.track_height = match value {
                    Some(v) => v
                        .parse::<f64>()
                        .ok()
                        .filter(|h| h.is_finite() && *h > 0.0)
                        .ok_or_else(|| invalid(v))?,
                    None => default_track_height(),
                };
                AttributeChange::Layout
            }
            "highlightstart" => {
                self.highlight_start = value.and_then(parse_coordinate);
                AttributeChange::Highlight
            }
            "highlightend" => {
                self.highlight_end = value.and_then(parse_coordinate);
                AttributeChange::Highlight
            }
            "color" => {
                self.color = value.map(str::to_string);
                AttributeChange::Style
            }
            "shape" => {
                self.shape = value.map(str::to_string);
                AttributeChange::Style
            }
            "defaultcolor" | "default-color" => {
                self.default_color = value.map_or_else(default_color, str::to_string);
                AttributeChange::Style
            }
            "defaultshape" | "default-shape" => {
                self.default_shape = value.map_or_else(default_shape, str::to_string);
                AttributeChange::Style
            }
            "layout" => {
                self.layout = match value {
                    Some(v) => v.parse().map_err(|_| invalid(v))?,
                    None => LayoutStrategy::default(),
                };
                AttributeChange::Layout
            }
            "tooltip-event" | "tooltipevent" => {
                self.tooltip_event = match value {
                    Some(v) => v.parse().map_err(|_| invalid(v))?,
                    None => TooltipTrigger::default(),
                };
                AttributeChange::Tooltip
            }
            other => {
                log::debug!("Attribute '{}' is not handled by the track", other);
                AttributeChange::Ignored
            }
        };
        Ok(change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_track_conventions() {
        let attrs = TrackAttributes::default();
        assert_eq!(attrs.track_height, 44.0);
        assert_eq!(attrs.default_color, "black");
        assert_eq!(attrs.default_shape, "rectangle");
        assert_eq!(attrs.layout, LayoutStrategy::Stacked);
        assert_eq!(attrs.layout_config().layout_height, 24.0);
    }

    #[test]
    fn highlight_bounds_must_be_integers() {
        let mut attrs = TrackAttributes::default();
        assert_eq!(attrs.apply("highlightstart", Some("12")), Ok(AttributeChange::Highlight));
        assert_eq!(attrs.highlight_start, Some(12));
        attrs.apply("highlightend", Some("12.5")).unwrap();
        assert_eq!(attrs.highlight_end, None);
        attrs.apply("highlightstart", None).unwrap();
        assert_eq!(attrs.highlight_start, None);
    }

    #[test]
    fn layout_attribute_switches_strategy() {
        let mut attrs = TrackAttributes::default();
        assert_eq!(attrs.apply("layout", Some("non-overlapping")), Ok(AttributeChange::Layout));
        assert_eq!(attrs.layout, LayoutStrategy::NonOverlapping);
        assert!(attrs.apply("layout", Some("spiral")).is_err());
        attrs.apply("layout", None).unwrap();
        assert_eq!(attrs.layout, LayoutStrategy::Stacked);
    }

    #[test]
    fn rejects_bad_height_and_ignores_foreign_attributes() {
        let mut attrs = TrackAttributes::default();
        assert!(attrs.apply("height", Some("-3")).is_err());
        assert_eq!(attrs.track_height, 44.0);
        assert_eq!(attrs.apply("displaystart", Some("5")), Ok(AttributeChange::Ignored));
    }

    #[test]
    fn tiny_tracks_keep_a_minimum_band() {
        let attrs = TrackAttributes {
            track_height: 12.0,
            ..Default::default()
        };
        assert_eq!(attrs.layout_config().layout_height, attrs.min_lane_height);
    }
}
