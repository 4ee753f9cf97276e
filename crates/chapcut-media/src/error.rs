//! Error types for media operations.

use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur while driving FFmpeg.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("ffmpeg not found in PATH")]
    FfmpegNotFound,

    /// The external tool's stderr is carried verbatim so the operator sees
    /// the underlying diagnostic, not a summary of it.
    #[error("ffmpeg failed ({message}, exit code {exit_code:?}):\n{stderr}")]
    FfmpegFailed {
        message: String,
        stderr: String,
        exit_code: Option<i32>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaError {
    /// Create an FFmpeg failure error.
    pub fn ffmpeg_failed(
        message: impl Into<String>,
        stderr: impl Into<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::FfmpegFailed {
            message: message.into(),
            stderr: stderr.into(),
            exit_code,
        }
    }
}
