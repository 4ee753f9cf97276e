//! The `find` pass: detect boundary candidates and (re)write annotations.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use chapcut_media::{detect_silences, DetectConfig};
use chapcut_models::{format_seconds, group_silences};

use crate::annotations::{
    annotation_path, load_chapters_if_present, render_annotations, NameIndex,
};

/// Detect chapter boundaries in `input` and overwrite its annotation file,
/// carrying over names from a previous run where start offsets still match.
pub async fn run(input: &Path, config: DetectConfig) -> Result<()> {
    let silences = detect_silences(input, &config).await?;
    let groups = group_silences(&silences);
    let boundaries: Vec<_> = groups
        .into_iter()
        .filter(|g| g.is_chapter_boundary())
        .collect();

    info!(
        silences = silences.len(),
        boundaries = boundaries.len(),
        "silence scan of {} complete",
        input.display()
    );
    for group in &boundaries {
        debug!(
            "chapter heading candidate at {} ({} silences)",
            format_seconds(group.start()),
            group.silences.len()
        );
    }

    let names = match load_chapters_if_present(input)? {
        Some(previous) => NameIndex::from_chapters(&previous),
        None => NameIndex::default(),
    };

    let path = annotation_path(input);
    let text = render_annotations(input, &boundaries, &names);
    std::fs::write(&path, text)
        .with_context(|| format!("cannot write annotations to {}", path.display()))?;

    info!("annotations written to {}", path.display());
    Ok(())
}
