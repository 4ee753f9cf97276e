//! chapcut binary entry point.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use chapcut_cli::cli::{Cli, Commands};
use chapcut_cli::split::SplitOptions;
use chapcut_media::DetectConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::from_default_env()
        .add_directive("chapcut_cli=info".parse().unwrap())
        .add_directive("chapcut_media=info".parse().unwrap());

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_ansi(true)
                .with_target(false)
                .without_time(),
        )
        .with(env_filter)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Find {
            input,
            min_silence,
            noise,
        } => {
            let config = DetectConfig::default()
                .with_min_silence(min_silence)
                .with_noise(noise);
            chapcut_cli::find::run(&input, config).await
        }
        Commands::Split {
            output_dir,
            commands,
            title,
            audios,
        } => {
            let opts = SplitOptions {
                output_dir,
                commands,
                title,
            };
            chapcut_cli::split::run(&audios, &opts).await
        }
    }
}
