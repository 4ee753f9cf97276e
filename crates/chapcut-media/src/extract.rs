//! Stream-copy extraction and lossless join of chapter segments.
//!
//! The execution target is chosen once per run: `Execute` spawns FFmpeg
//! for every cut and join, `Record` appends the equivalent shell commands
//! to two ordered scripts (cut phase, then join phase) and touches no
//! audio files.

use std::path::{Path, PathBuf};

use tracing::debug;

use chapcut_models::Segment;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;
use crate::script::CommandScript;

/// Ordered `-metadata` key/value pairs stamped on a final output file.
pub type Metadata = [(String, String)];

/// Carries out (or records) the FFmpeg invocations of a split run.
pub enum Extractor {
    /// Spawn ffmpeg and wait for each command.
    Execute(FfmpegRunner),
    /// Record each command instead of running it.
    Record(ScriptRecorder),
}

/// Accumulates dry-run commands, split by phase so the cut script can be
/// reviewed and executed in full before any join runs.
pub struct ScriptRecorder {
    prefix: String,
    cut: CommandScript,
    concat: CommandScript,
}

impl Extractor {
    /// Execute every invocation in-process.
    pub fn execute() -> Self {
        Self::Execute(FfmpegRunner::new())
    }

    /// Record invocations, to be written as `<prefix>-1-cut` and
    /// `<prefix>-2-concat` by [`Extractor::finish`].
    pub fn record(prefix: impl Into<String>) -> Self {
        Self::Record(ScriptRecorder {
            prefix: prefix.into(),
            cut: CommandScript::new(),
            concat: CommandScript::new(),
        })
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Record(_))
    }

    /// Stream-copy one segment of a source file to `output`.
    pub async fn cut(
        &mut self,
        segment: &Segment,
        output: &Path,
        metadata: &Metadata,
    ) -> MediaResult<()> {
        let cmd = cut_command(segment, output, metadata);
        match self {
            Self::Execute(runner) => runner.run(&cmd).await,
            Self::Record(recorder) => {
                recorder.cut.push("ffmpeg", &cmd.build_args());
                Ok(())
            }
        }
    }

    /// Losslessly join same-format parts, in order, into `output`.
    pub async fn concat(
        &mut self,
        parts: &[PathBuf],
        output: &Path,
        metadata: &Metadata,
    ) -> MediaResult<()> {
        let cmd = concat_command(parts, output, metadata);
        match self {
            Self::Execute(runner) => runner.run(&cmd).await,
            Self::Record(recorder) => {
                recorder.concat.push("ffmpeg", &cmd.build_args());
                Ok(())
            }
        }
    }

    /// Remove an intermediate file. A no-op while recording, where the
    /// temporaries were never created.
    pub async fn remove_temp(&self, path: &Path) -> MediaResult<()> {
        if let Self::Execute(_) = self {
            debug!(path = %path.display(), "removing intermediate file");
            tokio::fs::remove_file(path).await?;
        }
        Ok(())
    }

    /// Write the recorded scripts, if any, and consume the extractor.
    pub fn finish(self) -> MediaResult<()> {
        if let Self::Record(recorder) = self {
            recorder.cut.write_to(format!("{}-1-cut", recorder.prefix))?;
            recorder
                .concat
                .write_to(format!("{}-2-concat", recorder.prefix))?;
        }
        Ok(())
    }
}

fn cut_command(segment: &Segment, output: &Path, metadata: &Metadata) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new(&segment.source, output).codec_copy();
    for (key, value) in metadata {
        cmd = cmd.metadata(key, value);
    }
    if let Some(start) = segment.start {
        cmd = cmd.seek(start);
    }
    if let Some(duration) = segment.duration {
        cmd = cmd.duration(duration);
    }
    cmd
}

fn concat_command(parts: &[PathBuf], output: &Path, metadata: &Metadata) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::concat(parts, output).codec_copy();
    for (key, value) in metadata {
        cmd = cmd.metadata(key, value);
    }
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> Vec<(String, String)> {
        vec![
            ("title".to_string(), "Book ch0 - Intro".to_string()),
            ("track".to_string(), "1".to_string()),
        ]
    }

    #[test]
    fn test_cut_command_whole_file_has_no_seek() {
        let segment = Segment::whole("a.mp3");
        let args = cut_command(&segment, Path::new("out.mp3"), &[]).build_args();
        assert!(!args.contains(&"-ss".to_string()));
        assert!(!args.contains(&"-t".to_string()));
        assert!(args.contains(&"copy".to_string()));
    }

    #[test]
    fn test_cut_command_bounded_segment() {
        let segment = Segment {
            source: PathBuf::from("a.mp3"),
            start: Some(10.0),
            duration: Some(30.0),
        };
        let args = cut_command(&segment, Path::new("out.mp3"), &meta()).build_args();
        assert!(args.contains(&"-ss".to_string()));
        assert!(args.contains(&"10.000".to_string()));
        assert!(args.contains(&"-t".to_string()));
        assert!(args.contains(&"30.000".to_string()));
        assert!(args.contains(&"title=Book ch0 - Intro".to_string()));
        assert!(args.contains(&"track=1".to_string()));
    }

    #[tokio::test]
    async fn test_recording_writes_phase_scripts() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("cmds").to_string_lossy().into_owned();

        let mut extractor = Extractor::record(prefix.clone());
        assert!(extractor.is_recording());

        let segment = Segment {
            source: PathBuf::from("a.mp3"),
            start: Some(5.0),
            duration: None,
        };
        extractor
            .cut(&segment, Path::new("ch00-one-tmp0.mp3"), &[])
            .await
            .unwrap();
        extractor
            .concat(
                &[PathBuf::from("ch00-one-tmp0.mp3")],
                Path::new("ch00-one.mp3"),
                &meta(),
            )
            .await
            .unwrap();
        extractor
            .remove_temp(Path::new("ch00-one-tmp0.mp3"))
            .await
            .unwrap();
        extractor.finish().unwrap();

        let cut = std::fs::read_to_string(format!("{prefix}-1-cut")).unwrap();
        let concat = std::fs::read_to_string(format!("{prefix}-2-concat")).unwrap();
        assert!(cut.contains("'-ss' '5.000'"));
        assert!(cut.contains("'ch00-one-tmp0.mp3'"));
        assert!(concat.contains("'concat:ch00-one-tmp0.mp3'"));
        assert!(concat.contains("'track=1'"));

        // Recording never created (or deleted) any audio file.
        assert!(!Path::new("ch00-one-tmp0.mp3").exists());
    }

    #[tokio::test]
    async fn test_execute_mode_writes_no_scripts() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = Extractor::execute();
        assert!(!extractor.is_recording());
        extractor.finish().unwrap();
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }
}
