//! Command-line interface for chapcut.
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Split audiobook recordings into chapter files at silence boundaries
#[derive(Parser, Debug)]
#[command(name = "chapcut", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find chapter headings and write the annotation file
    Find {
        /// Audio file to scan
        input: PathBuf,

        /// Minimum silence duration the detector reports, in seconds
        #[arg(long, value_name = "SECONDS", default_value_t = 1.5)]
        min_silence: f64,

        /// Amplitude threshold below which audio counts as silence
        #[arg(long, value_name = "LEVEL", default_value_t = 0.001)]
        noise: f64,
    },

    /// Split audio files into chapter files using their annotations
    Split {
        /// Output directory for chapter audio
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output_dir: PathBuf,

        /// Record the ffmpeg invocations to <PREFIX>-1-cut and
        /// <PREFIX>-2-concat instead of running them
        #[arg(short, long, value_name = "PREFIX")]
        commands: Option<String>,

        /// Book title used in per-chapter metadata
        #[arg(short, long, default_value = "Audiobook")]
        title: String,

        /// Audio files with <file>-chapters.txt annotations, in book order
        #[arg(required = true)]
        audios: Vec<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_defaults() {
        let cli = Cli::try_parse_from(["chapcut", "find", "book-1.mp3"]).unwrap();
        match cli.command {
            Commands::Find {
                input,
                min_silence,
                noise,
            } => {
                assert_eq!(input, PathBuf::from("book-1.mp3"));
                assert_eq!(min_silence, 1.5);
                assert_eq!(noise, 0.001);
            }
            _ => panic!("expected find"),
        }
    }

    #[test]
    fn test_split_args() {
        let cli = Cli::try_parse_from([
            "chapcut", "split", "-o", "out", "-c", "cmds", "-t", "My Book", "a.mp3", "b.mp3",
        ])
        .unwrap();
        match cli.command {
            Commands::Split {
                output_dir,
                commands,
                title,
                audios,
            } => {
                assert_eq!(output_dir, PathBuf::from("out"));
                assert_eq!(commands.as_deref(), Some("cmds"));
                assert_eq!(title, "My Book");
                assert_eq!(audios.len(), 2);
            }
            _ => panic!("expected split"),
        }
    }

    #[test]
    fn test_split_requires_audio_files() {
        assert!(Cli::try_parse_from(["chapcut", "split"]).is_err());
    }
}
