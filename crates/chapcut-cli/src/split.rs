//! The `split` pass: assemble annotated chapters and extract them.

use std::path::PathBuf;

use anyhow::Result;
use tracing::{info, warn};

use chapcut_media::Extractor;
use chapcut_models::{assemble, OutputChapter};

use crate::annotations::load_chapters;

pub struct SplitOptions {
    /// Directory chapter files (and any intermediates) are written to.
    pub output_dir: PathBuf,
    /// When set, record commands under this prefix instead of running them.
    pub commands: Option<String>,
    /// Book title used in per-chapter metadata.
    pub title: String,
}

/// Split `audios` (in book order) into per-chapter files.
pub async fn run(audios: &[PathBuf], opts: &SplitOptions) -> Result<()> {
    let mut inputs = Vec::with_capacity(audios.len());
    for audio in audios {
        inputs.push((audio.clone(), load_chapters(audio)?));
    }

    let outputs = assemble(&inputs);
    // The leading preamble (audio before the first heading) is not part of
    // the numbered book.
    let chapters = &outputs[1..];
    if chapters.is_empty() {
        warn!("no named chapters found; nothing to write");
    }

    let mut extractor = match &opts.commands {
        Some(prefix) => Extractor::record(prefix.clone()),
        None => Extractor::execute(),
    };

    for (num, chapter) in chapters.iter().enumerate() {
        write_chapter(num, chapter, opts, &mut extractor).await?;
    }

    extractor.finish()?;
    Ok(())
}

async fn write_chapter(
    num: usize,
    chapter: &OutputChapter,
    opts: &SplitOptions,
    extractor: &mut Extractor,
) -> Result<()> {
    let stem = chapter_stem(num, &chapter.name);
    let ext = output_extension(chapter);
    let out_path = opts.output_dir.join(format!("{stem}.{ext}"));
    let metadata = chapter_metadata(&opts.title, num, &chapter.name);

    match chapter.segments.as_slice() {
        [segment] => {
            info!("writing {stem}.{ext}");
            extractor.cut(segment, &out_path, &metadata).await?;
        }
        segments => {
            // Spanning chapter: cut every part bare, join with metadata,
            // then drop the intermediates.
            let mut parts = Vec::with_capacity(segments.len());
            for (i, segment) in segments.iter().enumerate() {
                let part = opts.output_dir.join(format!("{stem}-tmp{i}.{ext}"));
                extractor.cut(segment, &part, &[]).await?;
                parts.push(part);
            }
            info!("joining {stem}.{ext}");
            extractor.concat(&parts, &out_path, &metadata).await?;
            for part in &parts {
                extractor.remove_temp(part).await?;
            }
        }
    }

    Ok(())
}

fn chapter_stem(num: usize, name: &str) -> String {
    format!("ch{num:02}-{name}")
}

fn chapter_metadata(title: &str, num: usize, name: &str) -> Vec<(String, String)> {
    vec![
        (
            "title".to_string(),
            format!("{} ch{} - {}", title, num, capitalize(name)),
        ),
        ("track".to_string(), (num + 1).to_string()),
    ]
}

/// Uppercase the first character, lowercase the rest.
fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Chapter files keep the source container; the concat join requires the
/// parts to share it anyway.
fn output_extension(chapter: &OutputChapter) -> String {
    chapter
        .segments
        .first()
        .and_then(|s| s.source.extension())
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mp3".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chapcut_models::Segment;

    #[test]
    fn test_chapter_stem_zero_pads() {
        assert_eq!(chapter_stem(0, "intro"), "ch00-intro");
        assert_eq!(chapter_stem(12, "the wall"), "ch12-the wall");
    }

    #[test]
    fn test_first_chapter_metadata_numbering() {
        let metadata = chapter_metadata("A Storm of Swords", 0, "intro");
        assert_eq!(
            metadata,
            vec![
                (
                    "title".to_string(),
                    "A Storm of Swords ch0 - Intro".to_string()
                ),
                ("track".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_capitalize_lowercases_tail() {
        assert_eq!(capitalize("the KINGSROAD"), "The kingsroad");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_output_extension_follows_source() {
        let chapter = OutputChapter {
            name: "one".to_string(),
            segments: vec![Segment::whole("book-1.m4b")],
        };
        assert_eq!(output_extension(&chapter), "m4b");

        let bare = OutputChapter {
            name: "two".to_string(),
            segments: vec![Segment::whole("noext")],
        };
        assert_eq!(output_extension(&bare), "mp3");
    }

    #[tokio::test]
    async fn test_spanning_chapter_recorded_as_cuts_then_join() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("cmds").to_string_lossy().into_owned();
        let mut extractor = Extractor::record(prefix.clone());

        let chapter = OutputChapter {
            name: "one".to_string(),
            segments: vec![
                Segment {
                    source: PathBuf::from("a.mp3"),
                    start: Some(5.0),
                    duration: None,
                },
                Segment::whole("b.mp3"),
            ],
        };
        let opts = SplitOptions {
            output_dir: dir.path().to_path_buf(),
            commands: Some(prefix.clone()),
            title: "Book".to_string(),
        };

        write_chapter(0, &chapter, &opts, &mut extractor)
            .await
            .unwrap();
        extractor.finish().unwrap();

        let cut = std::fs::read_to_string(format!("{prefix}-1-cut")).unwrap();
        let concat = std::fs::read_to_string(format!("{prefix}-2-concat")).unwrap();

        // Two cuts, bare of metadata, into deterministic temporaries.
        assert_eq!(cut.lines().count(), 2);
        assert!(cut.contains("ch00-one-tmp0.mp3"));
        assert!(cut.contains("ch00-one-tmp1.mp3"));
        assert!(!cut.contains("-metadata"));

        // One join carrying the final metadata.
        assert_eq!(concat.lines().count(), 1);
        assert!(concat.contains("concat:"));
        assert!(concat.contains("title=Book ch0 - One"));
        assert!(concat.contains("track=1"));
    }
}
