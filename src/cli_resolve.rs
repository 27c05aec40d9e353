//! One-shot artwork resolution from the command line.
//!
//! Prints the resolved URL and how it was obtained, exits with status 1
//! when nothing could be resolved.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use airwaves_artwork::config::{AppConfig, CliConfig, FileConfig};
use airwaves_artwork::{create_resolver, ArtworkQuery};

#[derive(Parser, Debug)]
#[command(name = "cli-resolve", about = "Resolve artwork for a single track")]
struct CliArgs {
    /// Track title.
    #[clap(long)]
    pub title: String,

    /// Track artist.
    #[clap(long)]
    pub artist: String,

    /// Artwork reference reported by the player, if any.
    #[clap(long)]
    pub reference: Option<String>,

    /// Path to TOML configuration file.
    #[clap(long)]
    pub config: Option<PathBuf>,

    #[clap(long, env = "SPOTIFY_CLIENT_ID")]
    pub spotify_client_id: Option<String>,

    #[clap(long, env = "SPOTIFY_CLIENT_SECRET", hide_env_values = true)]
    pub spotify_client_secret: Option<String>,

    #[clap(long, env = "LASTFM_API_KEY", hide_env_values = true)]
    pub lastfm_api_key: Option<String>,
}

async fn run(args: CliArgs) -> Result<bool> {
    let file_config = args.config.as_deref().map(FileConfig::load).transpose()?;
    let cli_config = CliConfig {
        spotify_client_id: args.spotify_client_id,
        spotify_client_secret: args.spotify_client_secret,
        lastfm_api_key: args.lastfm_api_key,
        ..Default::default()
    };
    let app_config = AppConfig::resolve(&cli_config, file_config)?;
    let (resolver, _cache) = create_resolver(&app_config.artwork)?;

    let mut query = ArtworkQuery::new(args.title, args.artist);
    if let Some(reference) = args.reference {
        query = query.with_reference(reference);
    }

    let resolution = resolver
        .resolve_detailed(
            query.supplied_reference.as_deref(),
            &query.title,
            &query.artist,
        )
        .await;

    match resolution {
        Some(resolution) => {
            println!("{}", resolution.url);
            println!("outcome: {}", resolution.outcome.label());
            Ok(true)
        }
        None => {
            eprintln!("No artwork found for {} - {}", query.artist, query.title);
            Ok(false)
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    if run(args).await? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
