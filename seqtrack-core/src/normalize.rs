//! Normalization of raw feature records
//!
//! Produces fresh [`Feature`] values from caller-owned [`RawFeature`]s. A flat
//! `{start, end}` record becomes one location with one fragment; a missing
//! `end` denotes a single point and normalizes to `end = start`. Malformed
//! records are reported per record and never abort the batch.

use crate::error::{TrackError, TrackResult};
use crate::types::{Feature, Fragment, Location, RawCoordinate, RawFeature, RawFragment, SeqPos};

/// Outcome of normalizing a batch: the valid features plus one error per rejected record
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub features: Vec<Feature>,
    pub errors: Vec<TrackError>,
}

impl Normalized {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

pub fn normalize_features(raw: &[RawFeature]) -> Normalized {
    let mut out = Normalized::default();
    for record in raw {
        match normalize_feature(record) {
            Ok(feature) => out.features.push(feature),
            Err(err) => {
                log::warn!("Rejecting feature '{}': {}", record.accession, err);
                out.errors.push(err);
            }
        }
    }
    log::debug!(
        "Normalized {} of {} feature records",
        out.features.len(),
        raw.len()
    );
    out
}

pub fn normalize_feature(raw: &RawFeature) -> TrackResult<Feature> {
    let locations = match &raw.locations {
        Some(locations) => locations
            .iter()
            .enumerate()
            .map(|(li, loc)| normalize_location(&raw.accession, li, &loc.fragments))
            .collect::<TrackResult<Vec<_>>>()?,
        None => {
            let flat = RawFragment {
                start: raw.start.clone(),
                end: raw.end.clone(),
            };
            vec![Location {
                fragments: vec![normalize_fragment(&raw.accession, 0, 0, &flat)?],
            }]
        }
    };

    if locations.is_empty() {
        return Err(TrackError::EmptyFeature {
            accession: raw.accession.clone(),
        });
    }

    Ok(Feature {
        accession: raw.accession.clone(),
        feature_type: raw.feature_type.clone(),
        color: raw.color.clone(),
        shape: raw.shape.clone(),
        tooltip_content: raw.tooltip_content.clone(),
        locations,
        attributes: raw.attributes.clone(),
    })
}

fn normalize_location(accession: &str, location: usize, fragments: &[RawFragment]) -> TrackResult<Location> {
    if fragments.is_empty() {
        return Err(TrackError::malformed(accession, location, 0, "location has no fragments"));
    }
    let fragments = fragments
        .iter()
        .enumerate()
        .map(|(gi, raw)| normalize_fragment(accession, location, gi, raw))
        .collect::<TrackResult<Vec<_>>>()?;
    Ok(Location { fragments })
}

fn normalize_fragment(accession: &str, location: usize, fragment: usize, raw: &RawFragment) -> TrackResult<Fragment> {
    let fail = |reason: String| TrackError::malformed(accession.to_string(), location, fragment, reason);

    let start = match &raw.start {
        Some(coord) => coordinate(coord).ok_or_else(|| fail(format!("start {} is not a valid position", coord)))?,
        None => return Err(fail("missing start".to_string())),
    };
    let end = match &raw.end {
        Some(coord) => coordinate(coord).ok_or_else(|| fail(format!("end {} is not a valid position", coord)))?,
        None => start,
    };
    if end < start {
        return Err(fail(format!("end {} is before start {}", end, start)));
    }
    Ok(Fragment::new(start, end))
}

/// Positions are 1-based
fn coordinate(raw: &RawCoordinate) -> Option<SeqPos> {
    raw.as_integer()
        .filter(|v| *v >= 1)
        .map(|v| v as SeqPos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawLocation;

    #[test]
    fn flat_record_becomes_single_location() {
        let raw = RawFeature::span("A", 5, Some(10));
        let feature = normalize_feature(&raw).unwrap();
        assert_eq!(feature.locations.len(), 1);
        assert_eq!(feature.locations[0].fragments, vec![Fragment::new(5, 10)]);
    }

    #[test]
    fn point_feature_gets_unit_span() {
        let raw = RawFeature::span("P", 7, None);
        let feature = normalize_feature(&raw).unwrap();
        assert_eq!(feature.locations[0].fragments[0], Fragment::new(7, 7));
        assert_eq!(feature.locations[0].fragments[0].length(), 1);
    }

    #[test]
    fn reversed_span_is_malformed() {
        let raw = RawFeature::span("BAD", 10, Some(5));
        let err = normalize_feature(&raw).unwrap_err();
        assert!(matches!(err, TrackError::MalformedFragment { .. }));
        assert!(err.to_string().contains("before start"));
    }

    #[test]
    fn missing_start_and_zero_start_are_malformed() {
        let raw = RawFeature {
            accession: "NOSTART".into(),
            end: Some(RawCoordinate::Integer(4)),
            ..Default::default()
        };
        assert!(normalize_feature(&raw).is_err());
        assert!(normalize_feature(&RawFeature::span("ZERO", 0, Some(3))).is_err());
    }

    #[test]
    fn empty_locations_are_rejected() {
        let raw = RawFeature {
            accession: "EMPTY".into(),
            locations: Some(vec![]),
            ..Default::default()
        };
        assert_eq!(
            normalize_feature(&raw).unwrap_err(),
            TrackError::EmptyFeature { accession: "EMPTY".into() }
        );

        let raw = RawFeature {
            accession: "HOLLOW".into(),
            locations: Some(vec![RawLocation::default()]),
            ..Default::default()
        };
        assert!(normalize_feature(&raw).is_err());
    }

    #[test]
    fn batch_isolates_bad_records() {
        let raw = vec![
            RawFeature::span("A", 1, Some(4)),
            RawFeature::span("B", 10, Some(5)),
            RawFeature::span("C", 20, None),
        ];
        let normalized = normalize_features(&raw);
        let accessions: Vec<_> = normalized.features.iter().map(|f| f.accession.as_str()).collect();
        assert_eq!(accessions, vec!["A", "C"]);
        assert_eq!(normalized.errors.len(), 1);
        assert!(!normalized.is_clean());
    }

    #[test]
    fn fragments_keep_source_order() {
        let raw = RawFeature {
            accession: "SPLIT".into(),
            locations: Some(vec![RawLocation {
                fragments: vec![
                    RawFragment { start: Some(RawCoordinate::Integer(30)), end: Some(RawCoordinate::Integer(40)) },
                    RawFragment { start: Some(RawCoordinate::Integer(1)), end: Some(RawCoordinate::Integer(5)) },
                ],
            }]),
            ..Default::default()
        };
        let feature = normalize_feature(&raw).unwrap();
        assert_eq!(
            feature.locations[0].fragments,
            vec![Fragment::new(30, 40), Fragment::new(1, 5)]
        );
    }
}
