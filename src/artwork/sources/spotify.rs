//! Spotify Web API adapter.
//!
//! Authenticates with the client-credentials flow and keeps the access
//! token until shortly before it expires.

use super::{trim_base_url, ArtworkAdapter, LookupError};
use crate::artwork::models::{ArtworkCandidate, ArtworkSourceKind, QualityTier};
use crate::config::SpotifySettings;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

/// Images at least this wide are considered high quality.
const HIGH_QUALITY_MIN_WIDTH: u32 = 640;

/// Tokens are refreshed this long before Spotify says they expire.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(30);

struct AccessToken {
    value: String,
    expires_at: Instant,
}

pub struct SpotifyAdapter {
    client: Client,
    api_base: String,
    accounts_base: String,
    client_id: String,
    client_secret: String,
    token: Mutex<Option<AccessToken>>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Deserialize)]
struct SearchResponse {
    tracks: Option<TrackPage>,
}

#[derive(Deserialize)]
struct TrackPage {
    #[serde(default)]
    items: Vec<SpotifyTrack>,
}

#[derive(Deserialize)]
struct SpotifyTrack {
    album: Option<SpotifyAlbum>,
}

#[derive(Deserialize)]
struct SpotifyAlbum {
    #[serde(default)]
    images: Vec<SpotifyImage>,
}

#[derive(Deserialize)]
struct SpotifyImage {
    url: String,
    width: Option<u32>,
}

impl SpotifyAdapter {
    pub fn new(client: Client, settings: &SpotifySettings) -> Self {
        Self {
            client,
            api_base: trim_base_url(&settings.api_base),
            accounts_base: trim_base_url(&settings.accounts_base),
            client_id: settings.client_id.clone(),
            client_secret: settings.client_secret.clone(),
            token: Mutex::new(None),
        }
    }

    async fn access_token(&self) -> Result<String, LookupError> {
        let mut token = self.token.lock().await;
        if let Some(current) = token.as_ref() {
            if Instant::now() < current.expires_at {
                return Ok(current.value.clone());
            }
        }

        debug!("Requesting Spotify access token");
        let url = format!("{}/api/token", self.accounts_base);
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LookupError::Auth(format!(
                "token request failed with status {}",
                response.status()
            )));
        }

        let body: TokenResponse = response.json().await?;
        let lifetime = Duration::from_secs(body.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        *token = Some(AccessToken {
            value: body.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });
        Ok(body.access_token)
    }

    async fn invalidate_token(&self) {
        *self.token.lock().await = None;
    }
}

/// Picks the widest image and grades it by width.
fn best_image(images: Vec<SpotifyImage>) -> Option<(String, QualityTier)> {
    let image = images
        .into_iter()
        .filter(|image| !image.url.is_empty())
        .max_by_key(|image| image.width.unwrap_or(0))?;
    let quality = if image.width.unwrap_or(0) >= HIGH_QUALITY_MIN_WIDTH {
        QualityTier::High
    } else {
        QualityTier::Medium
    };
    Some((image.url, quality))
}

#[async_trait]
impl ArtworkAdapter for SpotifyAdapter {
    fn source(&self) -> ArtworkSourceKind {
        ArtworkSourceKind::Spotify
    }

    async fn lookup(
        &self,
        title: &str,
        artist: &str,
    ) -> Result<Option<ArtworkCandidate>, LookupError> {
        let token = self.access_token().await?;
        let query = format!("{} {}", title, artist);
        let url = format!("{}/v1/search", self.api_base);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&token)
            .query(&[("q", query.as_str()), ("type", "track"), ("limit", "1")])
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 401 {
            self.invalidate_token().await;
            return Err(LookupError::Auth("access token rejected".to_string()));
        }
        if !status.is_success() {
            return Err(LookupError::Status {
                status: status.as_u16(),
            });
        }

        let body: SearchResponse = response.json().await?;
        let images = body
            .tracks
            .and_then(|page| page.items.into_iter().next())
            .and_then(|track| track.album)
            .map(|album| album.images)
            .unwrap_or_default();

        Ok(best_image(images).map(|(url, quality)| {
            ArtworkCandidate::new(url, ArtworkSourceKind::Spotify, quality)
        }))
    }
}
