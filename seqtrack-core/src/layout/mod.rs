//! Lane layout engine
//!
//! Two interchangeable strategies share the [`Layout`] contract: [`StackedLayout`]
//! puts every feature in lane 0, [`NonOverlappingLayout`] packs fragments into
//! lanes so that no two overlapping spans share a lane.

use crate::types::{Feature, FragmentKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

pub mod non_overlapping;
pub mod stacked;

pub use non_overlapping::{pack_lanes, NonOverlappingLayout};
pub use stacked::StackedLayout;

/// Vertical space available to a layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Height of the drawable band, margins excluded
    pub layout_height: f64,
    /// Lanes never shrink below this height, even on crowded tracks
    pub min_lane_height: f64,
    /// Gap left between neighbouring lanes
    pub lane_padding: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            layout_height: 24.0,
            min_lane_height: 4.0,
            lane_padding: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutStrategy {
    #[default]
    Stacked,
    NonOverlapping,
}

impl LayoutStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            LayoutStrategy::Stacked => "stacked",
            LayoutStrategy::NonOverlapping => "non-overlapping",
        }
    }
}

impl FromStr for LayoutStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stacked" | "default" | "" => Ok(LayoutStrategy::Stacked),
            "non-overlapping" | "nonoverlapping" | "non_overlapping" => Ok(LayoutStrategy::NonOverlapping),
            other => Err(format!("unknown layout '{}'", other)),
        }
    }
}

/// Lane index per fragment plus the number of lanes in use
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LaneAssignment {
    lanes: BTreeMap<FragmentKey, usize>,
    lane_count: usize,
}

impl LaneAssignment {
    pub fn new(lanes: BTreeMap<FragmentKey, usize>) -> Self {
        let lane_count = lanes.values().copied().max().map_or(1, |max| max + 1);
        Self { lanes, lane_count }
    }

    pub fn lane(&self, key: &FragmentKey) -> Option<usize> {
        self.lanes.get(key).copied()
    }

    /// Always at least 1, so an empty track still has a band to draw into
    pub fn lane_count(&self) -> usize {
        self.lane_count.max(1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FragmentKey, &usize)> {
        self.lanes.iter()
    }

    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }
}

/// Contract shared by the layout strategies
pub trait Layout {
    /// Compute lanes for a normalized collection, replacing any previous assignment
    fn init(&mut self, features: &[Feature]);

    /// Pixel offset of the fragment's lane baseline from the top of the band
    fn feature_y(&self, key: &FragmentKey) -> f64;

    /// Pixel height for the fragment's shape
    fn feature_height(&self, key: &FragmentKey) -> f64;

    fn lane_of(&self, key: &FragmentKey) -> usize;

    fn lane_count(&self) -> usize;

    fn config(&self) -> &LayoutConfig;

    fn strategy(&self) -> LayoutStrategy;
}

/// Factory for layout strategies
pub struct LayoutFactory;

impl LayoutFactory {
    pub fn create(strategy: LayoutStrategy, config: LayoutConfig) -> Box<dyn Layout> {
        match strategy {
            LayoutStrategy::Stacked => Box::new(StackedLayout::new(config)),
            LayoutStrategy::NonOverlapping => Box::new(NonOverlappingLayout::new(config)),
        }
    }

    pub fn available_strategies() -> Vec<&'static str> {
        vec!["stacked", "non-overlapping"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_parses_attribute_values() {
        assert_eq!("Non-Overlapping".parse::<LayoutStrategy>(), Ok(LayoutStrategy::NonOverlapping));
        assert_eq!("stacked".parse::<LayoutStrategy>(), Ok(LayoutStrategy::Stacked));
        assert!("zigzag".parse::<LayoutStrategy>().is_err());
    }

    #[test]
    fn empty_assignment_reports_one_lane() {
        let assignment = LaneAssignment::new(BTreeMap::new());
        assert_eq!(assignment.lane_count(), 1);
        assert!(assignment.is_empty());
    }

    #[test]
    fn factory_honours_strategy() {
        for strategy in [LayoutStrategy::Stacked, LayoutStrategy::NonOverlapping] {
            let layout = LayoutFactory::create(strategy, LayoutConfig::default());
            assert_eq!(layout.strategy(), strategy);
        }
    }
}
