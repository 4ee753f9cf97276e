//! Shared data models and core algorithms for chapcut.
//!
//! This crate provides the pure, serde-serializable types for:
//! - Detected silence intervals and their grouping into boundary regions
//! - Chapter annotations and the sidecar record parser
//! - Output chapters assembled from per-file chapter lists
//!
//! No I/O happens here; process spawning and file handling live in
//! `chapcut-media` and the CLI.

pub mod annotation;
pub mod assembly;
pub mod chapter;
pub mod silence;
pub mod timestamp;

// Re-export common types
pub use annotation::{parse_chapters, AnnotationError};
pub use assembly::{assemble, OutputChapter, Segment, PREAMBLE_NAME};
pub use chapter::{Chapter, SPURIOUS_NAME};
pub use silence::{group_silences, Silence, SilenceGroup, MAX_CHAPTER_HEADER_SECS};
pub use timestamp::format_seconds;
