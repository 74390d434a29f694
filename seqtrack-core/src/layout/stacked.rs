//! Default layout: every feature shares lane 0 and the full band height

use super::{Layout, LayoutConfig, LayoutStrategy};
use crate::types::{Feature, FragmentKey};

#[derive(Debug, Clone)]
pub struct StackedLayout {
    config: LayoutConfig,
}

impl StackedLayout {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }
}

impl Layout for StackedLayout {
    fn init(&mut self, features: &[Feature]) {
        log::debug!("Stacked layout over {} features", features.len());
    }

    fn feature_y(&self, _key: &FragmentKey) -> f64 {
        0.0
    }

    fn feature_height(&self, _key: &FragmentKey) -> f64 {
        self.config.layout_height.max(0.0)
    }

    fn lane_of(&self, _key: &FragmentKey) -> usize {
        0
    }

    fn lane_count(&self) -> usize {
        1
    }

    fn config(&self) -> &LayoutConfig {
        &self.config
    }

    fn strategy(&self) -> LayoutStrategy {
        LayoutStrategy::Stacked
    }
}
