use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub port: Option<u16>,
    pub metrics_port: Option<u16>,
    pub logging_level: Option<String>,
    pub lookup_timeout_sec: Option<u64>,
    pub liveness_timeout_sec: Option<u64>,
    pub user_agent: Option<String>,

    // Artwork sources
    pub spotify: Option<SpotifyFileConfig>,
    pub itunes: Option<ITunesFileConfig>,
    pub lastfm: Option<LastFmFileConfig>,
    pub placeholder: Option<PlaceholderFileConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct SpotifyFileConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub api_base: Option<String>,
    pub accounts_base: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct ITunesFileConfig {
    pub api_base: Option<String>,
    /// Edge length in pixels requested from the artwork CDN.
    pub artwork_size: Option<u32>,
    /// Two-letter store country code, e.g. "US".
    pub country: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct LastFmFileConfig {
    pub api_key: Option<String>,
    pub api_base: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct PlaceholderFileConfig {
    pub base_url: Option<String>,
    pub size: Option<u32>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
