//! Error types for the track core

use thiserror::Error;

/// Errors raised while normalizing data or configuring a track
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackError {
    #[error("Malformed fragment {fragment} in location {location} of feature '{accession}': {reason}")]
    MalformedFragment {
        accession: String,
        location: usize,
        fragment: usize,
        reason: String,
    },

    #[error("Feature '{accession}' has no fragments")]
    EmptyFeature { accession: String },

    #[error("Coordinate mapper is not available yet")]
    MapperUnavailable,

    #[error("Invalid value for attribute '{name}': {value}")]
    InvalidAttribute { name: String, value: String },

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),
}

impl TrackError {
    pub fn malformed<S: Into<String>>(accession: S, location: usize, fragment: usize, reason: S) -> Self {
        Self::MalformedFragment {
            accession: accession.into(),
            location,
            fragment,
            reason: reason.into(),
        }
    }

    pub fn invalid_attribute<S: Into<String>>(name: S, value: S) -> Self {
        Self::InvalidAttribute {
            name: name.into(),
            value: value.into(),
        }
    }

    /// True for per-record data errors that isolate one feature but never the batch
    pub fn is_data_error(&self) -> bool {
        matches!(self, Self::MalformedFragment { .. } | Self::EmptyFeature { .. })
    }
}

pub type TrackResult<T> = Result<T, TrackError>;
