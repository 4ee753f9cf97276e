//! Silence detection via FFmpeg's `silencedetect` filter.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use chapcut_models::Silence;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;

/// Tuning for the `silencedetect` audio filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectConfig {
    /// Minimum silence length before the detector reports an interval,
    /// seconds. Shorter pauses (breaths, sentence gaps) are not reported.
    pub min_silence_secs: f64,

    /// Amplitude threshold below which audio counts as silence, as a
    /// linear ratio of full scale.
    pub noise: f64,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            min_silence_secs: 1.5,
            noise: 0.001,
        }
    }
}

impl DetectConfig {
    /// Builder-style setter for the minimum silence duration.
    pub fn with_min_silence(mut self, secs: f64) -> Self {
        self.min_silence_secs = secs;
        self
    }

    /// Builder-style setter for the noise threshold.
    pub fn with_noise(mut self, noise: f64) -> Self {
        self.noise = noise;
        self
    }

    fn filter(&self) -> String {
        format!("silencedetect=d={}:noise={}", self.min_silence_secs, self.noise)
    }
}

/// Run silence detection over a whole audio file.
///
/// Decodes to the null muxer with `silencedetect` attached and parses the
/// `silence_start:` / `silence_end:` pairs the filter logs to stderr. A
/// nonzero FFmpeg exit (decode error) fails the whole pass.
pub async fn detect_silences(input: &Path, config: &DetectConfig) -> MediaResult<Vec<Silence>> {
    let cmd = FfmpegCommand::new(input, "-")
        .audio_filter(config.filter())
        .output_format("null")
        .log_level("info");

    let stderr = FfmpegRunner::new().run_capturing_stderr(&cmd).await?;
    let silences = parse_silencedetect(&stderr);

    debug!(
        input = %input.display(),
        silences = silences.len(),
        "silence detection complete"
    );

    Ok(silences)
}

/// Parse `silencedetect` report lines.
///
/// The filter logs, interleaved with whatever else FFmpeg prints:
///
/// ```text
/// [silencedetect @ 0x55d] silence_start: 2.25
/// [silencedetect @ 0x55d] silence_end: 4.485 | silence_duration: 2.235
/// ```
fn parse_silencedetect(stderr: &str) -> Vec<Silence> {
    let mut silences = Vec::new();
    let mut pending_start: Option<f64> = None;

    for line in stderr.lines() {
        if !line.contains("[silencedetect") {
            continue;
        }
        if let Some(value) = field_value(line, "silence_start:") {
            pending_start = value.parse().ok();
        } else if let Some(value) = field_value(line, "silence_end:") {
            if let (Some(start), Ok(end)) = (pending_start.take(), value.parse()) {
                silences.push(Silence::new(start, end));
            }
        }
    }

    silences
}

fn field_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    line.split_once(key)?.1.split_whitespace().next()
}
