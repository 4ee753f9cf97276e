//! Sidecar annotation file I/O.
//!
//! One annotation file per source audio file, named `<source>-chapters.txt`
//! and kept next to it. The find pass regenerates the file wholesale; names
//! the human entered survive a re-run only when the boundary's start offset
//! is unchanged, which is why starts are written in their shortest exact
//! form and matched bit-for-bit on reload.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use chapcut_models::{parse_chapters, Chapter, SilenceGroup};

/// Annotation file path for a source audio file: `<source>-chapters.txt`.
pub fn annotation_path(source: &Path) -> PathBuf {
    let mut name = source.as_os_str().to_os_string();
    name.push("-chapters.txt");
    PathBuf::from(name)
}

/// Load the chapters recorded for `source`. A missing file is fatal: the
/// split pass must not silently treat an unannotated book as chapterless.
pub fn load_chapters(source: &Path) -> Result<Vec<Chapter>> {
    let path = annotation_path(source);
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("no chapter annotations at {}", path.display()))?;
    let chapters = parse_chapters(&text, source)
        .with_context(|| format!("malformed annotations at {}", path.display()))?;
    Ok(chapters)
}

/// Like [`load_chapters`], but a missing file is `None`. The find pass uses
/// this to carry names over from a previous run, if there was one.
pub fn load_chapters_if_present(source: &Path) -> Result<Option<Vec<Chapter>>> {
    if !annotation_path(source).exists() {
        return Ok(None);
    }
    load_chapters(source).map(Some)
}

/// Previously entered chapter names, keyed by exact start offset.
#[derive(Debug, Default)]
pub struct NameIndex(HashMap<u64, String>);

impl NameIndex {
    pub fn from_chapters(chapters: &[Chapter]) -> Self {
        Self(
            chapters
                .iter()
                .map(|c| (c.start.to_bits(), c.name.clone()))
                .collect(),
        )
    }

    pub fn get(&self, start: f64) -> Option<&str> {
        self.0.get(&start.to_bits()).map(String::as_str)
    }
}

/// Render one annotation record per boundary group, in order.
///
/// Each record carries, besides the `NAME`/`START` pair the parser reads
/// back, an `ffplay` preview command bracketing the boundary region and the
/// raw intervals of the group, both purely for human review.
pub fn render_annotations(source: &Path, groups: &[SilenceGroup], names: &NameIndex) -> String {
    let mut out = String::new();
    for group in groups {
        let name = names.get(group.start()).unwrap_or("");
        out.push_str("CHAPTER\n");
        let _ = writeln!(
            out,
            "CMD: ffplay -i \"{}\" -ss {:.2} -t {:.2} -autoexit -loglevel quiet",
            source.display(),
            group.start() - 0.1,
            group.duration() + 0.2,
        );
        let _ = writeln!(out, "NAME: {name}");
        let _ = writeln!(out, "START: {}", group.start());
        for silence in &group.silences {
            let _ = writeln!(out, "{} ... {}", silence.start, silence.end);
        }
        out.push_str("END\n\n");
    }
    out
}
