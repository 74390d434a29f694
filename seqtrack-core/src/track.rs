//! Track renderer
//!
//! Owns the normalized features and their lane assignment, borrows a
//! [`CoordinateMapper`] from the zoom controller, and turns both into
//! positioned fragment geometry. Every redraw re-reads the mapper.
//!
//! ```text
//! set_data ──► normalize ──► layout.init ──► geometry ◄── on_zoom_changed
//!                  │                             │
//!                  └── DataError            highlight.refresh
//! ```

use crate::attributes::{AttributeChange, TrackAttributes, TRACK_MARGIN_TOP};
use crate::error::{TrackError, TrackResult};
use crate::events::{Dispatch, ListenerId, Notification, Notifier, TrackEvent};
use crate::highlight::{HighlightRect, HighlightTracker};
use crate::layout::{Layout, LayoutFactory};
use crate::mapper::CoordinateMapper;
use crate::normalize::normalize_features;
use crate::shape::{feature_shape, Outline, ShapeKind};
use crate::style::StyleTable;
use crate::tooltip::{TooltipAction, TooltipContent, TooltipScheduler, TooltipTrigger};
use crate::types::{iter_fragments, Feature, Fragment, FragmentKey, RawFeature, SeqPos};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackState {
    /// No data received yet
    Empty,
    /// Data is laid out but there is no mapper to draw with
    AwaitingMapper,
    LaidOut,
}

/// One fragment ready for a presenter
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentGeometry {
    pub key: FragmentKey,
    pub accession: String,
    pub feature_type: Option<String>,
    pub start: SeqPos,
    pub end: SeqPos,
    pub lane: usize,
    pub shape: ShapeKind,
    /// Outline local to the shape's bounding box
    pub outline: Outline,
    /// Translation of the outline's origin in track pixels
    pub x: f64,
    pub y: f64,
    pub fill: String,
    pub stroke: String,
}

impl FragmentGeometry {
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.outline.width && y >= self.y && y <= self.y + self.outline.height
    }
}

pub struct TrackRenderer {
    attributes: TrackAttributes,
    styles: StyleTable,
    features: Vec<Feature>,
    has_data: bool,
    layout: Box<dyn Layout>,
    mapper: Option<Box<dyn CoordinateMapper>>,
    geometry: Vec<FragmentGeometry>,
    highlight: HighlightTracker,
    notifier: Notifier,
    tooltips: TooltipScheduler,
    hovered: Option<FragmentKey>,
}

impl TrackRenderer {
    pub fn new(attributes: TrackAttributes) -> Self {
        let layout = LayoutFactory::create(attributes.layout, attributes.layout_config());
        let mut highlight = HighlightTracker::new(attributes.track_height);
        highlight.set_bounds(attributes.highlight_start, attributes.highlight_end);
        Self {
            attributes,
            styles: StyleTable::builtin(),
            features: Vec::new(),
            has_data: false,
            layout,
            mapper: None,
            geometry: Vec::new(),
            highlight,
            notifier: Notifier::new(),
            tooltips: TooltipScheduler::default(),
            hovered: None,
        }
    }

    /// Replace the type-keyed style table
    pub fn with_styles(mut self, styles: StyleTable) -> Self {
        self.styles = styles;
        self.redraw();
        self
    }

    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&mut Notification) + 'static,
    {
        self.notifier.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// Start drawing through `mapper`; geometry is computed right away
    pub fn attach_mapper<M>(&mut self, mapper: M)
    where
        M: CoordinateMapper + 'static,
    {
        self.mapper = Some(Box::new(mapper));
        self.redraw();
    }

    /// Drop the mapper; geometry is discarded until a new one arrives
    pub fn detach_mapper(&mut self) {
        self.mapper = None;
        self.redraw();
    }

    /// Replace the feature collection
    ///
    /// Rejected records are returned and announced as `DataError`; the rest
    /// are laid out from scratch.
    pub fn set_data(&mut self, raw: &[RawFeature]) -> Vec<TrackError> {
        let normalized = normalize_features(raw);
        for error in &normalized.errors {
            self.notifier.dispatch(TrackEvent::DataError {
                message: error.to_string(),
            });
        }

        self.clear_hover();
        self.features = normalized.features;
        self.has_data = true;
        self.layout.init(&self.features);
        log::debug!(
            "Track holds {} features in {} lanes ({} rejected)",
            self.features.len(),
            self.layout.lane_count(),
            normalized.errors.len()
        );
        self.redraw();
        normalized.errors
    }

    /// The mapper's window or scale changed; lanes are kept
    pub fn on_zoom_changed(&mut self) {
        self.redraw();
    }

    pub fn set_highlight(&mut self, start: Option<i64>, end: Option<i64>) {
        self.attributes.highlight_start = start;
        self.attributes.highlight_end = end;
        self.highlight.set_bounds(start, end);
        self.refresh_highlight();
    }

    /// Apply one string attribute and recompute whatever it affects
    pub fn apply_attribute(&mut self, name: &str, value: Option<&str>) -> TrackResult<AttributeChange> {
        let change = self.attributes.apply(name, value)?;
        match change {
            AttributeChange::Layout => self.relayout(),
            AttributeChange::Style => self.redraw(),
            AttributeChange::Highlight => {
                self.highlight
                    .set_bounds(self.attributes.highlight_start, self.attributes.highlight_end);
                self.refresh_highlight();
            }
            AttributeChange::Tooltip => {
                self.close_tooltip();
            }
            AttributeChange::Ignored => {}
        }
        Ok(change)
    }

    /// Replace every attribute at once
    pub fn set_attributes(&mut self, attributes: TrackAttributes) {
        if attributes.tooltip_event != self.attributes.tooltip_event {
            self.close_tooltip();
        }
        self.attributes = attributes;
        self.highlight
            .set_bounds(self.attributes.highlight_start, self.attributes.highlight_end);
        self.relayout();
    }

    fn relayout(&mut self) {
        self.layout = LayoutFactory::create(self.attributes.layout, self.attributes.layout_config());
        self.layout.init(&self.features);
        self.highlight.set_height(self.attributes.track_height);
        self.redraw();
    }

    fn redraw(&mut self) {
        let geometry = match self.mapper.as_deref() {
            Some(mapper) if self.has_data => self.build_geometry(mapper),
            _ => Vec::new(),
        };
        self.geometry = geometry;
        self.refresh_highlight();
    }

    fn refresh_highlight(&mut self) {
        match self.mapper.as_deref() {
            Some(mapper) => self.highlight.refresh(mapper),
            None => self.highlight.hide(),
        }
    }

    /// End the current hover immediately, closing any tooltip
    fn clear_hover(&mut self) {
        if self.hovered.take().is_some() {
            self.notifier.dispatch(TrackEvent::RangeHoverEnd);
        }
        self.close_tooltip();
    }

    fn build_geometry(&self, mapper: &dyn CoordinateMapper) -> Vec<FragmentGeometry> {
        let unit_width = mapper.unit_width();
        iter_fragments(&self.features)
            .map(|(key, feature, fragment)| {
                let shape = self.resolve_shape(feature);
                let height = self.layout.feature_height(&key);
                let color = self.resolve_color(feature).to_string();
                FragmentGeometry {
                    key,
                    accession: feature.accession.clone(),
                    feature_type: feature.feature_type.clone(),
                    start: fragment.start,
                    end: fragment.end,
                    lane: self.layout.lane_of(&key),
                    shape,
                    outline: feature_shape(unit_width, height, fragment.length(), shape),
                    x: mapper.map(fragment.start as f64),
                    y: TRACK_MARGIN_TOP + self.layout.feature_y(&key),
                    fill: color.clone(),
                    stroke: color,
                }
            })
            .collect()
    }

    /// Feature color, then track color, then type table, then the default
    pub fn resolve_color<'a>(&'a self, feature: &'a Feature) -> &'a str {
        feature
            .color
            .as_deref()
            .or(self.attributes.color.as_deref())
            .or_else(|| {
                feature
                    .feature_type
                    .as_deref()
                    .and_then(|ty| self.styles.color_for(ty))
            })
            .unwrap_or(&self.attributes.default_color)
    }

    /// Same priority as [`Self::resolve_color`]; unknown names draw as rectangles
    pub fn resolve_shape(&self, feature: &Feature) -> ShapeKind {
        let name = feature
            .shape
            .as_deref()
            .or(self.attributes.shape.as_deref())
            .or_else(|| {
                feature
                    .feature_type
                    .as_deref()
                    .and_then(|ty| self.styles.shape_for(ty))
            })
            .unwrap_or(&self.attributes.default_shape);
        ShapeKind::from_name_or_default(name)
    }

    /// Current geometry, or `MapperUnavailable` while there is nothing to draw with
    pub fn render(&self) -> TrackResult<&[FragmentGeometry]> {
        if self.mapper.is_none() {
            return Err(TrackError::MapperUnavailable);
        }
        Ok(&self.geometry)
    }

    /// Topmost fragment whose bounding box contains the point
    pub fn fragment_at(&self, x: f64, y: f64) -> Option<FragmentKey> {
        self.geometry
            .iter()
            .rev()
            .find(|g| g.contains_point(x, y))
            .map(|g| g.key)
    }

    fn lookup(&self, key: &FragmentKey) -> Option<(&Feature, &Fragment)> {
        let feature = self.features.get(key.feature)?;
        Some((feature, feature.fragment(key)?))
    }

    fn tooltip_for(&self, key: &FragmentKey) -> Option<TooltipContent> {
        let (feature, fragment) = self.lookup(key)?;
        let title = match &feature.feature_type {
            Some(ty) => format!("{} {}-{}", ty, fragment.start, fragment.end),
            None => format!("{}-{}", fragment.start, fragment.end),
        };
        Some(TooltipContent {
            accession: feature.accession.clone(),
            title,
            content: feature.tooltip_content.clone(),
            start: fragment.start,
            end: fragment.end,
            closeable: self.attributes.tooltip_event == TooltipTrigger::Click,
        })
    }

    /// Pointer entered a fragment's shape
    pub fn pointer_enter(&mut self, key: FragmentKey, now: Instant) -> Option<Dispatch> {
        if self.hovered == Some(key) {
            return None;
        }
        let (_, fragment) = self.lookup(&key)?;
        let (start, end) = (fragment.start, fragment.end);
        self.pointer_leave(now);
        let event = TrackEvent::RangeHoverStart { start, end };
        if self.attributes.tooltip_event == TooltipTrigger::Mouseover {
            if let Some(content) = self.tooltip_for(&key) {
                self.tooltips.schedule_show(now, content);
            }
        }
        self.hovered = Some(key);
        Some(self.notifier.dispatch(event))
    }

    /// Pointer left the hovered fragment
    pub fn pointer_leave(&mut self, now: Instant) -> Option<Dispatch> {
        self.hovered.take()?;
        if self.attributes.tooltip_event == TooltipTrigger::Mouseover {
            self.tooltips.schedule_hide(now);
        }
        Some(self.notifier.dispatch(TrackEvent::RangeHoverEnd))
    }

    /// Translate a raw pointer position into enter/leave notifications
    pub fn pointer_move(&mut self, x: f64, y: f64, now: Instant) -> Vec<Dispatch> {
        let target = self.fragment_at(x, y);
        if target == self.hovered {
            return Vec::new();
        }
        let mut dispatched = Vec::new();
        dispatched.extend(self.pointer_leave(now));
        if let Some(key) = target {
            dispatched.extend(self.pointer_enter(key, now));
        }
        dispatched
    }

    /// Click on a fragment; opens a closeable tooltip in click mode
    pub fn click(&mut self, key: FragmentKey) -> Option<Dispatch> {
        if self.attributes.tooltip_event != TooltipTrigger::Click {
            return None;
        }
        let content = self.tooltip_for(&key)?;
        match self.tooltips.show_now(content) {
            TooltipAction::Show(content) => Some(self.notifier.dispatch(TrackEvent::TooltipShow(content))),
            TooltipAction::Hide => None,
        }
    }

    pub fn close_tooltip(&mut self) -> Option<Dispatch> {
        self.tooltips.hide_now()?;
        Some(self.notifier.dispatch(TrackEvent::TooltipHide))
    }

    /// Fire a due tooltip action
    pub fn poll_tooltips(&mut self, now: Instant) -> Option<Dispatch> {
        let event = match self.tooltips.poll(now)? {
            TooltipAction::Show(content) => TrackEvent::TooltipShow(content),
            TooltipAction::Hide => TrackEvent::TooltipHide,
        };
        Some(self.notifier.dispatch(event))
    }

    pub fn state(&self) -> TrackState {
        match (self.has_data, self.mapper.is_some()) {
            (false, _) => TrackState::Empty,
            (true, false) => TrackState::AwaitingMapper,
            (true, true) => TrackState::LaidOut,
        }
    }

    pub fn fragments(&self) -> &[FragmentGeometry] {
        &self.geometry
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn highlight(&self) -> &HighlightRect {
        self.highlight.rect()
    }

    pub fn attributes(&self) -> &TrackAttributes {
        &self.attributes
    }

    pub fn styles(&self) -> &StyleTable {
        &self.styles
    }

    pub fn lane_count(&self) -> usize {
        self.layout.lane_count()
    }

    pub fn lane_of(&self, key: &FragmentKey) -> usize {
        self.layout.lane_of(key)
    }

    pub fn hovered(&self) -> Option<FragmentKey> {
        self.hovered
    }

    pub fn tooltip(&self) -> Option<&TooltipContent> {
        self.tooltips.visible()
    }

    pub fn height(&self) -> f64 {
        self.attributes.track_height
    }
}

impl std::fmt::Debug for TrackRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackRenderer")
            .field("state", &self.state())
            .field("features", &self.features.len())
            .field("layout", &self.layout.strategy())
            .field("lanes", &self.layout.lane_count())
            .field("fragments", &self.geometry.len())
            .finish()
    }
}
