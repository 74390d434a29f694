use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub type SeqPos = u64;

/// A coordinate as it arrives from an upstream adapter
///
/// Adapters emit plain integers, integral floats and numeric strings
/// interchangeably; anything else is rejected at normalization time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCoordinate {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl RawCoordinate {
    /// Integer value of this coordinate, if it denotes one
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            RawCoordinate::Integer(v) => Some(*v),
            RawCoordinate::Float(v) => {
                if v.is_finite() && v.fract() == 0.0 && v.abs() <= i64::MAX as f64 {
                    Some(*v as i64)
                } else {
                    None
                }
            }
            RawCoordinate::Text(s) => s.trim().parse::<i64>().ok(),
        }
    }
}

impl From<SeqPos> for RawCoordinate {
    fn from(pos: SeqPos) -> Self {
        RawCoordinate::Integer(pos as i64)
    }
}

impl std::fmt::Display for RawCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawCoordinate::Integer(v) => write!(f, "{}", v),
            RawCoordinate::Float(v) => write!(f, "{}", v),
            RawCoordinate::Text(s) => write!(f, "{:?}", s),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFragment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<RawCoordinate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<RawCoordinate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawLocation {
    #[serde(default)]
    pub fragments: Vec<RawFragment>,
}

/// A feature record before normalization
///
/// Either `locations` is present, or the flat `start`/`end` pair stands in
/// for a single location holding a single fragment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFeature {
    #[serde(default)]
    pub accession: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub feature_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<RawCoordinate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<RawCoordinate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<RawLocation>>,
    /// Fields this crate does not interpret, kept as-is
    #[serde(flatten)]
    pub attributes: BTreeMap<String, Value>,
}

impl RawFeature {
    /// Flat single-span record
    pub fn span(accession: &str, start: SeqPos, end: Option<SeqPos>) -> Self {
        Self {
            accession: accession.to_string(),
            start: Some(start.into()),
            end: end.map(RawCoordinate::from),
            ..Default::default()
        }
    }

    pub fn with_type(mut self, feature_type: &str) -> Self {
        self.feature_type = Some(feature_type.to_string());
        self
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    pub fn with_shape(mut self, shape: &str) -> Self {
        self.shape = Some(shape.to_string());
        self
    }
}

/// One contiguous, closed coordinate span `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fragment {
    pub start: SeqPos,
    pub end: SeqPos,
}

impl Fragment {
    pub fn new(start: SeqPos, end: SeqPos) -> Self {
        Self { start, end }
    }

    /// Number of coordinate units covered; a single point has length 1
    pub fn length(&self) -> u64 {
        self.end - self.start + 1
    }

    pub fn overlaps(&self, other: &Fragment) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    pub fn contains(&self, pos: SeqPos) -> bool {
        self.start <= pos && pos <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub fragments: Vec<Fragment>,
}

impl Location {
    /// Smallest span covering every fragment
    pub fn hull(&self) -> Option<Fragment> {
        let start = self.fragments.iter().map(|f| f.start).min()?;
        let end = self.fragments.iter().map(|f| f.end).max()?;
        Some(Fragment::new(start, end))
    }
}

/// A normalized feature: at least one location, each with at least one fragment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub accession: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub feature_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip_content: Option<String>,
    pub locations: Vec<Location>,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, Value>,
}

impl Feature {
    pub fn fragment(&self, key: &FragmentKey) -> Option<&Fragment> {
        self.locations
            .get(key.location)?
            .fragments
            .get(key.fragment)
    }

    pub fn fragment_count(&self) -> usize {
        self.locations.iter().map(|l| l.fragments.len()).sum()
    }
}

impl From<&Feature> for RawFeature {
    fn from(feature: &Feature) -> Self {
        RawFeature {
            accession: feature.accession.clone(),
            feature_type: feature.feature_type.clone(),
            color: feature.color.clone(),
            shape: feature.shape.clone(),
            tooltip_content: feature.tooltip_content.clone(),
            start: None,
            end: None,
            locations: Some(
                feature
                    .locations
                    .iter()
                    .map(|loc| RawLocation {
                        fragments: loc
                            .fragments
                            .iter()
                            .map(|f| RawFragment {
                                start: Some(f.start.into()),
                                end: Some(f.end.into()),
                            })
                            .collect(),
                    })
                    .collect(),
            ),
            attributes: feature.attributes.clone(),
        }
    }
}

/// Identity of one fragment inside a normalized feature collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FragmentKey {
    pub feature: usize,
    pub location: usize,
    pub fragment: usize,
}

impl FragmentKey {
    pub fn new(feature: usize, location: usize, fragment: usize) -> Self {
        Self { feature, location, fragment }
    }
}

/// Every fragment of a collection in feature, location, fragment order
pub fn iter_fragments(features: &[Feature]) -> impl Iterator<Item = (FragmentKey, &Feature, &Fragment)> {
    features.iter().enumerate().flat_map(|(fi, feature)| {
        feature.locations.iter().enumerate().flat_map(move |(li, location)| {
            location
                .fragments
                .iter()
                .enumerate()
                .map(move |(gi, fragment)| (FragmentKey::new(fi, li, gi), feature, fragment))
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_coordinate_accepts_integral_values_only() {
        assert_eq!(RawCoordinate::Integer(12).as_integer(), Some(12));
        assert_eq!(RawCoordinate::Float(12.0).as_integer(), Some(12));
        assert_eq!(RawCoordinate::Float(12.5).as_integer(), None);
        assert_eq!(RawCoordinate::Text(" 40 ".into()).as_integer(), Some(40));
        assert_eq!(RawCoordinate::Text("forty".into()).as_integer(), None);
    }

    #[test]
    fn raw_feature_keeps_unknown_fields() {
        let json = r#"{"accession":"P1","type":"DOMAIN","start":"3","end":9,"description":"Kinase"}"#;
        let raw: RawFeature = serde_json::from_str(json).unwrap();
        assert_eq!(raw.feature_type.as_deref(), Some("DOMAIN"));
        assert_eq!(raw.start, Some(RawCoordinate::Text("3".into())));
        assert_eq!(raw.end, Some(RawCoordinate::Integer(9)));
        assert_eq!(raw.attributes.get("description"), Some(&Value::from("Kinase")));
    }

    #[test]
    fn fragments_overlap_on_shared_coordinate() {
        let a = Fragment::new(5, 10);
        assert!(a.overlaps(&Fragment::new(10, 12)));
        assert!(!a.overlaps(&Fragment::new(11, 12)));
        assert_eq!(Fragment::new(7, 7).length(), 1);
    }
}
