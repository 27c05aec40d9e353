mod file_config;

pub use file_config::{
    FileConfig, ITunesFileConfig, LastFmFileConfig, PlaceholderFileConfig, SpotifyFileConfig,
};

use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::time::Duration;

pub const DEFAULT_LOOKUP_TIMEOUT_SEC: u64 = 5;
pub const DEFAULT_LIVENESS_TIMEOUT_SEC: u64 = 3;
const MAX_ARTWORK_SIZE: u32 = 3000;

const SPOTIFY_API_BASE: &str = "https://api.spotify.com";
const SPOTIFY_ACCOUNTS_BASE: &str = "https://accounts.spotify.com";
const ITUNES_API_BASE: &str = "https://itunes.apple.com";
const LASTFM_API_BASE: &str = "https://ws.audioscrobbler.com/2.0";
const PLACEHOLDER_BASE_URL: &str = "https://placehold.co";

fn default_user_agent() -> String {
    format!("airwaves-artwork/{}", env!("CARGO_PKG_VERSION"))
}

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub lookup_timeout_sec: u64,
    pub liveness_timeout_sec: u64,
    pub user_agent: Option<String>,
    pub spotify_client_id: Option<String>,
    pub spotify_client_secret: Option<String>,
    pub lastfm_api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub artwork: ArtworkSettings,
}

#[derive(Debug, Clone)]
pub struct ArtworkSettings {
    /// Upper bound for a single adapter lookup.
    pub lookup_timeout: Duration,
    pub liveness_timeout: Duration,
    pub user_agent: String,
    /// `None` when no client credentials are configured.
    pub spotify: Option<SpotifySettings>,
    pub itunes: ITunesSettings,
    /// `None` when no API key is configured.
    pub lastfm: Option<LastFmSettings>,
    pub placeholder: PlaceholderSettings,
}

impl Default for ArtworkSettings {
    fn default() -> Self {
        Self {
            lookup_timeout: Duration::from_secs(DEFAULT_LOOKUP_TIMEOUT_SEC),
            liveness_timeout: Duration::from_secs(DEFAULT_LIVENESS_TIMEOUT_SEC),
            user_agent: default_user_agent(),
            spotify: None,
            itunes: ITunesSettings::default(),
            lastfm: None,
            placeholder: PlaceholderSettings::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpotifySettings {
    pub client_id: String,
    pub client_secret: String,
    pub api_base: String,
    pub accounts_base: String,
}

impl Default for SpotifySettings {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            api_base: SPOTIFY_API_BASE.to_string(),
            accounts_base: SPOTIFY_ACCOUNTS_BASE.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ITunesSettings {
    pub api_base: String,
    pub artwork_size: u32,
    pub country: Option<String>,
}

impl Default for ITunesSettings {
    fn default() -> Self {
        Self {
            api_base: ITUNES_API_BASE.to_string(),
            artwork_size: 600,
            country: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LastFmSettings {
    pub api_key: String,
    pub api_base: String,
}

impl Default for LastFmSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: LASTFM_API_BASE.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlaceholderSettings {
    pub base_url: String,
    pub size: u32,
}

impl Default for PlaceholderSettings {
    fn default() -> Self {
        Self {
            base_url: PLACEHOLDER_BASE_URL.to_string(),
            size: 600,
        }
    }
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let port = file.port.unwrap_or(cli.port);
        let metrics_port = file.metrics_port.unwrap_or(cli.metrics_port);
        if port != 0 && port == metrics_port {
            bail!("port and metrics_port must differ (both set to {})", port);
        }

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let artwork = resolve_artwork_settings(
            cli,
            FileArtworkParts {
                lookup_timeout_sec: file.lookup_timeout_sec,
                liveness_timeout_sec: file.liveness_timeout_sec,
                user_agent: file.user_agent,
                spotify: file.spotify.unwrap_or_default(),
                itunes: file.itunes.unwrap_or_default(),
                lastfm: file.lastfm.unwrap_or_default(),
                placeholder: file.placeholder.unwrap_or_default(),
            },
        )?;

        Ok(Self {
            port,
            metrics_port,
            logging_level,
            artwork,
        })
    }
}

/// The artwork-related subset of [`FileConfig`].
struct FileArtworkParts {
    lookup_timeout_sec: Option<u64>,
    liveness_timeout_sec: Option<u64>,
    user_agent: Option<String>,
    spotify: SpotifyFileConfig,
    itunes: ITunesFileConfig,
    lastfm: LastFmFileConfig,
    placeholder: PlaceholderFileConfig,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn resolve_artwork_settings(cli: &CliConfig, file: FileArtworkParts) -> Result<ArtworkSettings> {
    let lookup_timeout_sec = file
        .lookup_timeout_sec
        .unwrap_or(if cli.lookup_timeout_sec > 0 {
            cli.lookup_timeout_sec
        } else {
            DEFAULT_LOOKUP_TIMEOUT_SEC
        });
    let liveness_timeout_sec = file
        .liveness_timeout_sec
        .unwrap_or(if cli.liveness_timeout_sec > 0 {
            cli.liveness_timeout_sec
        } else {
            DEFAULT_LIVENESS_TIMEOUT_SEC
        });
    if lookup_timeout_sec == 0 {
        bail!("lookup_timeout_sec must be greater than 0");
    }
    if liveness_timeout_sec == 0 {
        bail!("liveness_timeout_sec must be greater than 0");
    }

    let user_agent = non_empty(file.user_agent)
        .or_else(|| non_empty(cli.user_agent.clone()))
        .unwrap_or_else(default_user_agent);

    // Spotify is enabled only with a complete credential pair
    let client_id =
        non_empty(file.spotify.client_id).or_else(|| non_empty(cli.spotify_client_id.clone()));
    let client_secret = non_empty(file.spotify.client_secret)
        .or_else(|| non_empty(cli.spotify_client_secret.clone()));
    let spotify = match (client_id, client_secret) {
        (Some(client_id), Some(client_secret)) => {
            let defaults = SpotifySettings::default();
            Some(SpotifySettings {
                client_id,
                client_secret,
                api_base: non_empty(file.spotify.api_base).unwrap_or(defaults.api_base),
                accounts_base: non_empty(file.spotify.accounts_base)
                    .unwrap_or(defaults.accounts_base),
            })
        }
        (None, None) => None,
        _ => bail!("Spotify client_id and client_secret must be provided together"),
    };

    let itunes_defaults = ITunesSettings::default();
    let artwork_size = file.itunes.artwork_size.unwrap_or(itunes_defaults.artwork_size);
    if artwork_size == 0 || artwork_size > MAX_ARTWORK_SIZE {
        bail!(
            "itunes.artwork_size must be between 1 and {}, got {}",
            MAX_ARTWORK_SIZE,
            artwork_size
        );
    }
    let itunes = ITunesSettings {
        api_base: non_empty(file.itunes.api_base).unwrap_or(itunes_defaults.api_base),
        artwork_size,
        country: non_empty(file.itunes.country),
    };

    let lastfm = non_empty(file.lastfm.api_key)
        .or_else(|| non_empty(cli.lastfm_api_key.clone()))
        .map(|api_key| LastFmSettings {
            api_key,
            api_base: non_empty(file.lastfm.api_base.clone())
                .unwrap_or_else(|| LASTFM_API_BASE.to_string()),
        });

    let placeholder_defaults = PlaceholderSettings::default();
    let placeholder_size = file.placeholder.size.unwrap_or(placeholder_defaults.size);
    if placeholder_size == 0 || placeholder_size > MAX_ARTWORK_SIZE {
        bail!(
            "placeholder.size must be between 1 and {}, got {}",
            MAX_ARTWORK_SIZE,
            placeholder_size
        );
    }
    let placeholder = PlaceholderSettings {
        base_url: non_empty(file.placeholder.base_url).unwrap_or(placeholder_defaults.base_url),
        size: placeholder_size,
    };

    Ok(ArtworkSettings {
        lookup_timeout: Duration::from_secs(lookup_timeout_sec),
        liveness_timeout: Duration::from_secs(liveness_timeout_sec),
        user_agent,
        spotify,
        itunes,
        lastfm,
        placeholder,
    })
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
