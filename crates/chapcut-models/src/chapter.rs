//! Chapter annotations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Sentinel name a reviewer enters to mark a detected boundary as a false
/// positive. Records carrying it parse cleanly but yield no chapter.
pub const SPURIOUS_NAME: &str = "*spurious*";

/// A named chapter heading within one source audio file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    /// Source audio file the heading was found in.
    pub source: PathBuf,
    /// Human-entered chapter name.
    pub name: String,
    /// Offset of the heading within `source`, in seconds.
    pub start: f64,
}

impl Chapter {
    pub fn new(source: impl Into<PathBuf>, name: impl Into<String>, start: f64) -> Self {
        Self {
            source: source.into(),
            name: name.into(),
            start,
        }
    }
}
