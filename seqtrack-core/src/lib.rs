//! SeqTrack Core Library
//!
//! Lane layout, coordinate mapping, shape geometry and the track renderer
//! for sequence feature tracks.

pub mod attributes;
pub mod error;
pub mod events;
pub mod highlight;
pub mod layout;
pub mod mapper;
pub mod normalize;
pub mod shape;
pub mod style;
pub mod tooltip;
pub mod track;
pub mod types;

// Re-export commonly used types and functions
pub use attributes::{AttributeChange, TrackAttributes};
pub use error::{TrackError, TrackResult};
pub use events::{Dispatch, ListenerId, Notification, TrackEvent};
pub use highlight::{HighlightRect, HighlightTracker};
pub use layout::{LaneAssignment, Layout, LayoutConfig, LayoutFactory, LayoutStrategy};
pub use mapper::{CoordinateMapper, LinearMapper, ZoomHandle, ZoomWindow};
pub use normalize::{normalize_feature, normalize_features, Normalized};
pub use shape::{feature_shape, Outline, ShapeKind};
pub use style::{StyleTable, TypeStyle};
pub use tooltip::{TooltipContent, TooltipTrigger};
pub use track::{FragmentGeometry, TrackRenderer, TrackState};
pub use types::{Feature, Fragment, FragmentKey, Location, RawFeature, SeqPos};

/// Version information for the SeqTrack core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
