//! Assembly of per-file chapter lists into output chapters.
//!
//! Source files are processed in playback order. A chapter that begins near
//! the end of one file continues into the next, so the chapter currently
//! being built is threaded through the fold as an explicit accumulator: a
//! file without chapters contributes its whole span to the open chapter,
//! while a file with chapters closes it and opens a new one at the last
//! heading.

use std::mem;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::chapter::Chapter;

/// Name of the accumulator opened before any heading has been seen. The
/// preamble chapter is emitted first and discarded from numbered output.
pub const PREAMBLE_NAME: &str = "preamble";

/// A contiguous span of one source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub source: PathBuf,
    /// Offset into `source`; `None` means from the beginning of the file.
    pub start: Option<f64>,
    /// Span length; `None` means to the end of the file.
    pub duration: Option<f64>,
}

impl Segment {
    /// The entire file.
    pub fn whole(source: impl AsRef<Path>) -> Self {
        Self {
            source: source.as_ref().to_path_buf(),
            start: None,
            duration: None,
        }
    }
}

/// One chapter of the final audiobook, spanning one or more segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputChapter {
    pub name: String,
    pub segments: Vec<Segment>,
}

/// Fold per-file chapter lists into an ordered list of output chapters.
///
/// The first element of the result is always the preamble (everything
/// before the first heading); callers drop it when numbering output files.
pub fn assemble(files: &[(PathBuf, Vec<Chapter>)]) -> Vec<OutputChapter> {
    let mut emitted = Vec::new();
    let mut open = OutputChapter {
        name: PREAMBLE_NAME.to_string(),
        segments: Vec::new(),
    };

    for (source, chapters) in files {
        let Some((last, _)) = chapters.split_last() else {
            // No headings: the whole file belongs to the open chapter.
            open.segments.push(Segment::whole(source));
            continue;
        };
        let first = &chapters[0];

        // Close the open chapter with everything before the first heading,
        // then reopen at the last heading; it runs to end-of-file and may
        // continue into the next source.
        open.segments.push(Segment {
            source: source.clone(),
            start: None,
            duration: Some(first.start),
        });
        let reopened = OutputChapter {
            name: last.name.clone(),
            segments: vec![Segment {
                source: last.source.clone(),
                start: Some(last.start),
                duration: None,
            }],
        };
        emitted.push(mem::replace(&mut open, reopened));

        // Chapters fully contained in this file.
        for pair in chapters.windows(2) {
            emitted.push(OutputChapter {
                name: pair[0].name.clone(),
                segments: vec![Segment {
                    source: pair[0].source.clone(),
                    start: Some(pair[0].start),
                    duration: Some(pair[1].start - pair[0].start),
                }],
            });
        }
    }

    emitted.push(open);
    emitted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(source: &str, start: Option<f64>, duration: Option<f64>) -> Segment {
        Segment {
            source: PathBuf::from(source),
            start,
            duration,
        }
    }

    #[test]
    fn test_single_file_two_chapters() {
        let files = vec![(
            PathBuf::from("a.mp3"),
            vec![
                Chapter::new("a.mp3", "intro", 10.0),
                Chapter::new("a.mp3", "body", 40.0),
            ],
        )];

        let outputs = assemble(&files);
        assert_eq!(outputs.len(), 3);

        // Preamble covers [0, 10) and is dropped from numbered output.
        assert_eq!(outputs[0].name, PREAMBLE_NAME);
        assert_eq!(outputs[0].segments, vec![seg("a.mp3", None, Some(10.0))]);

        assert_eq!(outputs[1].name, "intro");
        assert_eq!(
            outputs[1].segments,
            vec![seg("a.mp3", Some(10.0), Some(30.0))]
        );

        assert_eq!(outputs[2].name, "body");
        assert_eq!(outputs[2].segments, vec![seg("a.mp3", Some(40.0), None)]);
    }

    #[test]
    fn test_chapter_spans_file_boundary() {
        let files = vec![
            (
                PathBuf::from("a.mp3"),
                vec![Chapter::new("a.mp3", "one", 5.0)],
            ),
            (PathBuf::from("b.mp3"), vec![]),
        ];

        let outputs = assemble(&files);
        assert_eq!(outputs.len(), 2);

        assert_eq!(outputs[0].name, PREAMBLE_NAME);
        assert_eq!(outputs[0].segments, vec![seg("a.mp3", None, Some(5.0))]);

        // "one" runs to the end of a.mp3 and swallows b.mp3 whole.
        assert_eq!(outputs[1].name, "one");
        assert_eq!(
            outputs[1].segments,
            vec![seg("a.mp3", Some(5.0), None), seg("b.mp3", None, None)]
        );
    }

    #[test]
    fn test_chapterless_file_then_chaptered_file() {
        let files = vec![
            (PathBuf::from("a.mp3"), vec![]),
            (
                PathBuf::from("b.mp3"),
                vec![Chapter::new("b.mp3", "two", 7.5)],
            ),
        ];

        let outputs = assemble(&files);
        assert_eq!(outputs.len(), 2);

        // The preamble absorbs all of a.mp3 plus the head of b.mp3.
        assert_eq!(outputs[0].name, PREAMBLE_NAME);
        assert_eq!(
            outputs[0].segments,
            vec![seg("a.mp3", None, None), seg("b.mp3", None, Some(7.5))]
        );

        assert_eq!(outputs[1].name, "two");
        assert_eq!(outputs[1].segments, vec![seg("b.mp3", Some(7.5), None)]);
    }

    #[test]
    fn test_no_chapters_anywhere_yields_only_preamble() {
        let files = vec![
            (PathBuf::from("a.mp3"), vec![]),
            (PathBuf::from("b.mp3"), vec![]),
        ];

        let outputs = assemble(&files);
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].name, PREAMBLE_NAME);
        assert_eq!(outputs[0].segments.len(), 2);
    }

    #[test]
    fn test_no_files_yields_empty_preamble() {
        let outputs = assemble(&[]);
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].name, PREAMBLE_NAME);
        assert!(outputs[0].segments.is_empty());
    }

    #[test]
    fn test_consecutive_chapter_durations() {
        let files = vec![(
            PathBuf::from("a.mp3"),
            vec![
                Chapter::new("a.mp3", "x", 100.0),
                Chapter::new("a.mp3", "y", 250.5),
                Chapter::new("a.mp3", "z", 300.0),
            ],
        )];

        let outputs = assemble(&files);
        assert_eq!(outputs.len(), 4);
        assert_eq!(
            outputs[1].segments,
            vec![seg("a.mp3", Some(100.0), Some(150.5))]
        );
        assert_eq!(
            outputs[2].segments,
            vec![seg("a.mp3", Some(250.5), Some(49.5))]
        );
        assert_eq!(outputs[3].segments, vec![seg("a.mp3", Some(300.0), None)]);
    }
}
