//! Line-oriented parser for `<source>-chapters.txt` sidecar records.
//!
//! Records are delimited by `CHAPTER` / `END` lines; inside a record each
//! line is `Key: value` with case-insensitive keys. Only `NAME` and `START`
//! are interpreted. Everything else — the `CMD:` playback preview, the raw
//! interval dump — is informational, ignored on parse and regenerated by
//! the next find pass.

use std::path::Path;

use thiserror::Error;

use crate::chapter::{Chapter, SPURIOUS_NAME};

/// Errors from annotation parsing. All fatal: a record that cannot be
/// placed on the timeline makes the whole file unusable for splitting.
#[derive(Debug, Error)]
pub enum AnnotationError {
    #[error("chapter record {index} for {path} has no START offset")]
    MissingStart { path: String, index: usize },

    #[error("chapter record {index} for {path} has unparsable START {value:?}")]
    InvalidStart {
        path: String,
        index: usize,
        value: String,
    },
}

/// Parse every record in `text`, in order.
///
/// Records with an empty or [`SPURIOUS_NAME`] name are dropped, but only
/// after their `START` has validated: a malformed record is an error even
/// when it would have been discarded.
pub fn parse_chapters(text: &str, source: &Path) -> Result<Vec<Chapter>, AnnotationError> {
    let mut chapters = Vec::new();
    let mut record: Option<Record> = None;
    let mut index = 0usize;

    for line in text.lines() {
        let line = line.trim();
        if line == "CHAPTER" {
            record = Some(Record::default());
        } else if line == "END" {
            if let Some(rec) = record.take() {
                if let Some(chapter) = rec.into_chapter(source, index)? {
                    chapters.push(chapter);
                }
                index += 1;
            }
        } else if let Some(rec) = record.as_mut() {
            rec.ingest(line);
        }
    }

    Ok(chapters)
}

/// Key/value lines accumulated for one `CHAPTER` .. `END` record.
#[derive(Default)]
struct Record {
    name: Option<String>,
    start: Option<String>,
}

impl Record {
    fn ingest(&mut self, line: &str) {
        let Some((key, value)) = line.split_once(':') else {
            // Interval dump lines ("2.25 ... 4.49") have no key.
            return;
        };
        match key.trim().to_ascii_lowercase().as_str() {
            "name" => self.name = Some(value.trim().to_string()),
            "start" => self.start = Some(value.trim().to_string()),
            _ => {}
        }
    }

    fn into_chapter(
        self,
        source: &Path,
        index: usize,
    ) -> Result<Option<Chapter>, AnnotationError> {
        let raw = self.start.ok_or_else(|| AnnotationError::MissingStart {
            path: source.display().to_string(),
            index,
        })?;
        let start: f64 = raw.parse().map_err(|_| AnnotationError::InvalidStart {
            path: source.display().to_string(),
            index,
            value: raw.clone(),
        })?;

        let name = self.name.unwrap_or_default();
        if name.is_empty() || name == SPURIOUS_NAME {
            return Ok(None);
        }

        Ok(Some(Chapter::new(source, name, start)))
    }
}
