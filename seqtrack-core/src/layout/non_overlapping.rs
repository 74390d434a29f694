//! Greedy interval packing
//!
//! Fragments are packed one Location at a time: all fragments of a Location
//! share a lane. Locations are visited in `(start, end)` order of their first
//! fragment, ties broken by accession, type and input position so that the
//! same data yields the same lanes whatever its input order. Each Location
//! goes into the first lane in which none of its fragments overlaps an
//! already placed span; a lane whose last end lies strictly before the
//! Location's start is free without further checks. For single-fragment
//! Locations this is the classic lane-end greedy, which never uses more
//! lanes than the deepest point of overlap.

use super::{LaneAssignment, Layout, LayoutConfig, LayoutStrategy};
use crate::types::{Feature, Fragment, FragmentKey, SeqPos};
use std::cmp::Ordering;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct NonOverlappingLayout {
    config: LayoutConfig,
    assignment: LaneAssignment,
}

impl NonOverlappingLayout {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            assignment: LaneAssignment::default(),
        }
    }

    pub fn assignment(&self) -> &LaneAssignment {
        &self.assignment
    }

    /// Height of one lane band, clipped to the configured minimum
    pub fn lane_height(&self) -> f64 {
        let band = self.config.layout_height.max(0.0) / self.assignment.lane_count() as f64;
        band.max(self.config.min_lane_height)
    }
}

impl Layout for NonOverlappingLayout {
    fn init(&mut self, features: &[Feature]) {
        self.assignment = pack_lanes(features);
        log::debug!(
            "Packed {} fragments into {} lanes",
            self.assignment.len(),
            self.assignment.lane_count()
        );
    }

    fn feature_y(&self, key: &FragmentKey) -> f64 {
        self.lane_of(key) as f64 * self.lane_height()
    }

    fn feature_height(&self, _key: &FragmentKey) -> f64 {
        let lane = self.lane_height();
        (lane - self.config.lane_padding).max(lane / 2.0)
    }

    fn lane_of(&self, key: &FragmentKey) -> usize {
        self.assignment.lane(key).unwrap_or(0)
    }

    fn lane_count(&self) -> usize {
        self.assignment.lane_count()
    }

    fn config(&self) -> &LayoutConfig {
        &self.config
    }

    fn strategy(&self) -> LayoutStrategy {
        LayoutStrategy::NonOverlapping
    }
}

/// All fragments of one Location, placed together
struct PlacementUnit<'a> {
    feature: usize,
    location: usize,
    accession: &'a str,
    feature_type: &'a str,
    /// `(fragment index, span)` sorted by span
    fragments: Vec<(usize, Fragment)>,
}

impl PlacementUnit<'_> {
    fn first(&self) -> Fragment {
        self.fragments[0].1
    }

    fn last_end(&self) -> SeqPos {
        self.fragments.iter().map(|(_, f)| f.end).max().unwrap_or(0)
    }

    fn order(&self, other: &Self) -> Ordering {
        self.first()
            .cmp(&other.first())
            .then_with(|| self.last_end().cmp(&other.last_end()))
            .then_with(|| self.accession.cmp(other.accession))
            .then_with(|| self.feature_type.cmp(other.feature_type))
            .then_with(|| {
                let mine = self.fragments.iter().map(|(_, f)| f);
                let theirs = other.fragments.iter().map(|(_, f)| f);
                mine.cmp(theirs)
            })
            .then_with(|| (self.feature, self.location).cmp(&(other.feature, other.location)))
    }
}

#[derive(Debug, Default)]
struct Lane {
    end: SeqPos,
    occupied: Vec<Fragment>,
}

impl Lane {
    fn accepts(&self, unit: &PlacementUnit<'_>) -> bool {
        if self.end < unit.first().start {
            return true;
        }
        unit.fragments
            .iter()
            .all(|(_, frag)| !self.occupied.iter().any(|placed| placed.overlaps(frag)))
    }

    fn place(&mut self, unit: &PlacementUnit<'_>) {
        self.occupied.extend(unit.fragments.iter().map(|(_, f)| *f));
        self.end = self.end.max(unit.last_end());
    }
}

/// Assign a lane to every fragment of a normalized collection
pub fn pack_lanes(features: &[Feature]) -> LaneAssignment {
    let mut units: Vec<PlacementUnit<'_>> = features
        .iter()
        .enumerate()
        .flat_map(|(fi, feature)| {
            feature
                .locations
                .iter()
                .enumerate()
                .filter(|(_, location)| !location.fragments.is_empty())
                .map(move |(li, location)| {
                    let mut fragments: Vec<(usize, Fragment)> =
                        location.fragments.iter().copied().enumerate().collect();
                    fragments.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)));
                    PlacementUnit {
                        feature: fi,
                        location: li,
                        accession: feature.accession.as_str(),
                        feature_type: feature.feature_type.as_deref().unwrap_or(""),
                        fragments,
                    }
                })
        })
        .collect();
    units.sort_by(|a, b| a.order(b));

    let mut lanes: Vec<Lane> = Vec::new();
    let mut assigned = BTreeMap::new();
    for unit in &units {
        let index = match lanes.iter().position(|lane| lane.accepts(unit)) {
            Some(index) => index,
            None => {
                lanes.push(Lane::default());
                lanes.len() - 1
            }
        };
        lanes[index].place(unit);
        for (gi, _) in &unit.fragments {
            assigned.insert(FragmentKey::new(unit.feature, unit.location, *gi), index);
        }
    }

    LaneAssignment::new(assigned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_features;
    use crate::types::{Location, RawFeature};

    fn spans(spans: &[(SeqPos, SeqPos)]) -> Vec<Feature> {
        let raw: Vec<RawFeature> = spans
            .iter()
            .enumerate()
            .map(|(i, (s, e))| RawFeature::span(&format!("F{}", i), *s, Some(*e)))
            .collect();
        normalize_features(&raw).features
    }

    fn lanes(features: &[Feature]) -> Vec<usize> {
        let assignment = pack_lanes(features);
        (0..features.len())
            .map(|i| assignment.lane(&FragmentKey::new(i, 0, 0)).unwrap())
            .collect()
    }

    #[test]
    fn third_feature_reuses_first_lane() {
        let features = spans(&[(5, 10), (8, 12), (20, 25)]);
        assert_eq!(lanes(&features), vec![0, 1, 0]);
        assert_eq!(pack_lanes(&features).lane_count(), 2);
    }

    #[test]
    fn adjacent_spans_share_a_lane_touching_spans_do_not() {
        assert_eq!(lanes(&spans(&[(1, 4), (5, 9)])), vec![0, 0]);
        assert_eq!(lanes(&spans(&[(1, 5), (5, 9)])), vec![0, 1]);
    }

    #[test]
    fn identical_ranges_get_distinct_lanes() {
        assert_eq!(lanes(&spans(&[(3, 8), (3, 8), (3, 8)])), vec![0, 1, 2]);
    }

    #[test]
    fn input_order_does_not_matter() {
        let forward = spans(&[(1, 10), (2, 3), (4, 12), (11, 15)]);
        let mut reversed = forward.clone();
        reversed.reverse();
        let by_accession = |features: &[Feature]| {
            let assignment = pack_lanes(features);
            let mut out: Vec<(String, usize)> = features
                .iter()
                .enumerate()
                .map(|(i, f)| (f.accession.clone(), assignment.lane(&FragmentKey::new(i, 0, 0)).unwrap()))
                .collect();
            out.sort();
            out
        };
        assert_eq!(by_accession(&forward), by_accession(&reversed));
    }

    #[test]
    fn location_fragments_stay_in_one_lane() {
        let mut features = spans(&[(1, 2), (3, 10)]);
        features[0].locations = vec![Location {
            fragments: vec![Fragment::new(20, 22), Fragment::new(1, 2)],
        }];
        let assignment = pack_lanes(&features);
        let a = assignment.lane(&FragmentKey::new(0, 0, 0)).unwrap();
        let b = assignment.lane(&FragmentKey::new(0, 0, 1)).unwrap();
        assert_eq!(a, b);
        // (3,10) fits between the split location's fragments
        assert_eq!(assignment.lane(&FragmentKey::new(1, 0, 0)), Some(0));
        assert_eq!(assignment.lane_count(), 1);
    }

    #[test]
    fn split_location_never_collides() {
        let mut features = spans(&[(1, 2), (3, 10)]);
        features[0].locations = vec![Location {
            fragments: vec![Fragment::new(1, 2), Fragment::new(5, 8)],
        }];
        let assignment = pack_lanes(&features);
        assert_ne!(
            assignment.lane(&FragmentKey::new(0, 0, 1)),
            assignment.lane(&FragmentKey::new(1, 0, 0))
        );
    }

    #[test]
    fn lane_height_is_clipped() {
        let features = spans(&[(1, 9), (1, 9), (1, 9), (1, 9)]);
        let mut layout = NonOverlappingLayout::new(LayoutConfig {
            layout_height: 8.0,
            min_lane_height: 4.0,
            lane_padding: 1.0,
        });
        layout.init(&features);
        assert_eq!(layout.lane_count(), 4);
        assert_eq!(layout.lane_height(), 4.0);
        assert_eq!(layout.feature_y(&FragmentKey::new(3, 0, 0)), 12.0);
        assert_eq!(layout.feature_height(&FragmentKey::new(0, 0, 0)), 3.0);
    }

    #[test]
    fn empty_collection_has_one_lane() {
        let mut layout = NonOverlappingLayout::new(LayoutConfig::default());
        layout.init(&[]);
        assert_eq!(layout.lane_count(), 1);
        assert_eq!(layout.lane_height(), LayoutConfig::default().layout_height);
    }
}
