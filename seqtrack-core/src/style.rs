//! Type-keyed default colors and shapes
//!
//! Feature types are matched case-insensitively. The built-in table covers the
//! common UniProt feature keys; hosts can extend or override it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
}

impl TypeStyle {
    pub fn new(color: &str, shape: &str) -> Self {
        Self {
            color: Some(color.to_string()),
            shape: Some(shape.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, TypeStyle>", into = "BTreeMap<String, TypeStyle>")]
pub struct StyleTable {
    entries: BTreeMap<String, TypeStyle>,
}

impl From<BTreeMap<String, TypeStyle>> for StyleTable {
    fn from(map: BTreeMap<String, TypeStyle>) -> Self {
        let mut table = StyleTable::default();
        for (ty, style) in map {
            table.insert(&ty, style);
        }
        table
    }
}

impl From<StyleTable> for BTreeMap<String, TypeStyle> {
    fn from(table: StyleTable) -> Self {
        table.entries
    }
}

const BUILTIN: &[(&str, &str, &str)] = &[
    ("CHAIN", "#CC9933", "rectangle"),
    ("INIT_MET", "#CC9933", "circle"),
    ("PEPTIDE", "#CC9933", "rectangle"),
    ("PROPEP", "#CC9933", "rectangle"),
    ("SIGNAL", "#FF0066", "rectangle"),
    ("TRANSIT", "#009966", "rectangle"),
    ("TOPO_DOM", "#FF9999", "rectangle"),
    ("TRANSMEM", "#CC00CC", "rectangle"),
    ("INTRAMEM", "#0000CC", "rectangle"),
    ("DOMAIN", "#9999FF", "rectangle"),
    ("REPEAT", "#FF7F00", "rectangle"),
    ("REGION", "#B33E00", "rectangle"),
    ("COILED", "#7F7F7F", "rectangle"),
    ("MOTIF", "#7F3F00", "rectangle"),
    ("COMPBIAS", "#FF3399", "rectangle"),
    ("ZN_FING", "#E9A3B4", "rectangle"),
    ("DNA_BIND", "#00B2B2", "rectangle"),
    ("ACT_SITE", "#FF6666", "circle"),
    ("BINDING", "#A06AB4", "diamond"),
    ("SITE", "#FF3333", "chevron-left"),
    ("METAL", "#009900", "diamond"),
    ("MOD_RES", "#61D0AD", "triangle"),
    ("LIPID", "#99FF66", "pentagon"),
    ("CARBOHYD", "#CC0099", "hexagon"),
    ("DISULFID", "#23B14D", "bridge"),
    ("CROSSLNK", "#FF6600", "bridge"),
    ("NON_STD", "#FFD700", "double-bar"),
    ("VARIANT", "#FF1493", "circle"),
    ("MUTAGEN", "#FF9900", "pin"),
    ("CONFLICT", "#6633CC", "line"),
    ("HELIX", "#FF0066", "rectangle"),
    ("STRAND", "#FFCC00", "arrow"),
    ("TURN", "#0571AF", "rectangle"),
];

fn key(feature_type: &str) -> String {
    feature_type.trim().to_ascii_uppercase()
}

impl StyleTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        let entries = BUILTIN
            .iter()
            .map(|(ty, color, shape)| (ty.to_string(), TypeStyle::new(color, shape)))
            .collect();
        Self { entries }
    }

    pub fn insert(&mut self, feature_type: &str, style: TypeStyle) {
        self.entries.insert(key(feature_type), style);
    }

    /// Overlay `other` on this table; set fields in `other` win
    pub fn merge(&mut self, other: &StyleTable) {
        for (ty, style) in &other.entries {
            let entry = self.entries.entry(key(ty)).or_default();
            if style.color.is_some() {
                entry.color = style.color.clone();
            }
            if style.shape.is_some() {
                entry.shape = style.shape.clone();
            }
        }
    }

    pub fn color_for(&self, feature_type: &str) -> Option<&str> {
        self.entries.get(&key(feature_type))?.color.as_deref()
    }

    pub fn shape_for(&self, feature_type: &str) -> Option<&str> {
        self.entries.get(&key(feature_type))?.shape.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
