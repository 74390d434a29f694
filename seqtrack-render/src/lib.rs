/*!
# SeqTrack Presentation Layer

Headless rendering of laid-out feature tracks. The core produces positioned
fragment outlines; this crate turns them into vector documents.

Rendering is deterministic: the same track, window and configuration give
byte-identical output once the timestamped footer is disabled.
*/

pub mod ruler;
#[cfg(feature = "vector-export")]
pub mod vector_export;

pub use ruler::{tick_positions, Tick};
#[cfg(feature = "vector-export")]
pub use vector_export::{ExportConfig, SvgExporter};
