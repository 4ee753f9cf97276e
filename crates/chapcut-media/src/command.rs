//! FFmpeg command builder and runner.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::error::{MediaError, MediaResult};

/// Builder for FFmpeg commands.
///
/// Arguments are collected in the order FFmpeg expects them: global flags,
/// input arguments, `-i <input>`, output arguments, output path.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    /// Input specifier: a file path, or a `concat:` protocol string.
    input: String,
    /// Output file path (`-` for the null muxer).
    output: String,
    /// Arguments placed before `-i`.
    input_args: Vec<String>,
    /// Arguments placed after `-i`.
    output_args: Vec<String>,
    /// Log level passed via `-v`.
    log_level: String,
}

impl FfmpegCommand {
    /// Create a new FFmpeg command for a single input file.
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            input: input.as_ref().to_string_lossy().into_owned(),
            output: output.as_ref().to_string_lossy().into_owned(),
            input_args: Vec::new(),
            output_args: Vec::new(),
            log_level: "error".to_string(),
        }
    }

    /// Join same-format inputs losslessly via the `concat:` protocol.
    pub fn concat<I, P>(inputs: I, output: impl AsRef<Path>) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let joined = inputs
            .into_iter()
            .map(|p| p.as_ref().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("|");
        Self {
            input: format!("concat:{joined}"),
            output: output.as_ref().to_string_lossy().into_owned(),
            input_args: Vec::new(),
            output_args: Vec::new(),
            log_level: "error".to_string(),
        }
    }

    /// Add an input argument (before `-i`).
    pub fn input_arg(mut self, arg: impl Into<String>) -> Self {
        self.input_args.push(arg.into());
        self
    }

    /// Add an output argument (after `-i`).
    pub fn output_arg(mut self, arg: impl Into<String>) -> Self {
        self.output_args.push(arg.into());
        self
    }

    /// Seek to a position before copying. Placed on the output side so the
    /// cut point is honored exactly rather than snapped early.
    pub fn seek(self, seconds: f64) -> Self {
        self.output_arg("-ss").output_arg(format!("{seconds:.3}"))
    }

    /// Limit the copied span.
    pub fn duration(self, seconds: f64) -> Self {
        self.output_arg("-t").output_arg(format!("{seconds:.3}"))
    }

    /// Copy all streams without re-encoding.
    pub fn codec_copy(self) -> Self {
        self.output_arg("-c").output_arg("copy")
    }

    /// Set an audio filter.
    pub fn audio_filter(self, filter: impl Into<String>) -> Self {
        self.output_arg("-af").output_arg(filter)
    }

    /// Force the output container format (e.g. `null` for analysis runs).
    pub fn output_format(self, format: impl Into<String>) -> Self {
        self.output_arg("-f").output_arg(format)
    }

    /// Stamp a metadata key/value pair on the output.
    pub fn metadata(self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.output_arg("-metadata")
            .output_arg(format!("{}={}", key.as_ref(), value.as_ref()))
    }

    /// Set the log level (`error` by default; `info` makes filters report).
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Build the full argument list.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = vec![
            "-y".to_string(),
            "-hide_banner".to_string(),
            "-v".to_string(),
            self.log_level.clone(),
        ];
        args.extend(self.input_args.iter().cloned());
        args.push("-i".to_string());
        args.push(self.input.clone());
        args.extend(self.output_args.iter().cloned());
        args.push(self.output.clone());
        args
    }
}

/// Runner for FFmpeg commands.
#[derive(Debug, Default)]
pub struct FfmpegRunner;

impl FfmpegRunner {
    pub fn new() -> Self {
        Self
    }

    /// Run an FFmpeg command to completion.
    pub async fn run(&self, cmd: &FfmpegCommand) -> MediaResult<()> {
        self.output(cmd).await.map(|_| ())
    }

    /// Run an FFmpeg command and return its captured stderr. Analysis
    /// filters such as `silencedetect` report their findings there.
    pub async fn run_capturing_stderr(&self, cmd: &FfmpegCommand) -> MediaResult<String> {
        let output = self.output(cmd).await?;
        Ok(String::from_utf8_lossy(&output.stderr).into_owned())
    }

    async fn output(&self, cmd: &FfmpegCommand) -> MediaResult<std::process::Output> {
        check_ffmpeg()?;

        let args = cmd.build_args();
        debug!("running ffmpeg {}", args.join(" "));

        let output = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            return Err(MediaError::ffmpeg_failed(
                "ffmpeg exited with non-zero status",
                String::from_utf8_lossy(&output.stderr).into_owned(),
                output.status.code(),
            ));
        }

        Ok(output)
    }
}

/// Check if FFmpeg is available.
pub fn check_ffmpeg() -> MediaResult<PathBuf> {
    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)
}
