//! Last.fm `track.getInfo` adapter.

use super::{trim_base_url, ArtworkAdapter, LookupError};
use crate::artwork::models::{ArtworkCandidate, ArtworkSourceKind, QualityTier};
use crate::config::LastFmSettings;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// Last.fm lists images small → extralarge; index 2 is "large" (174px).
const IMAGE_VARIANT_INDEX: usize = 2;

/// Error code Last.fm uses for "Track not found".
const ERROR_INVALID_PARAMETERS: u32 = 6;

pub struct LastFmAdapter {
    client: Client,
    api_base: String,
    api_key: String,
}

#[derive(Deserialize)]
struct TrackInfoResponse {
    track: Option<LastFmTrack>,
    error: Option<u32>,
    message: Option<String>,
}

#[derive(Deserialize)]
struct LastFmTrack {
    album: Option<LastFmAlbum>,
}

#[derive(Deserialize)]
struct LastFmAlbum {
    #[serde(default)]
    image: Vec<LastFmImage>,
}

#[derive(Deserialize)]
struct LastFmImage {
    #[serde(rename = "#text")]
    url: String,
}

impl LastFmAdapter {
    pub fn new(client: Client, settings: &LastFmSettings) -> Self {
        Self {
            client,
            api_base: trim_base_url(&settings.api_base),
            api_key: settings.api_key.clone(),
        }
    }
}

fn extract_image(body: TrackInfoResponse) -> Result<Option<String>, LookupError> {
    if let Some(code) = body.error {
        if code == ERROR_INVALID_PARAMETERS {
            return Ok(None);
        }
        return Err(LookupError::InvalidResponse(format!(
            "Last.fm error {}: {}",
            code,
            body.message.unwrap_or_default()
        )));
    }

    Ok(body
        .track
        .and_then(|track| track.album)
        .and_then(|album| album.image.into_iter().nth(IMAGE_VARIANT_INDEX))
        .map(|image| image.url)
        .filter(|url| !url.is_empty()))
}

#[async_trait]
impl ArtworkAdapter for LastFmAdapter {
    fn source(&self) -> ArtworkSourceKind {
        ArtworkSourceKind::LastFm
    }

    async fn lookup(
        &self,
        title: &str,
        artist: &str,
    ) -> Result<Option<ArtworkCandidate>, LookupError> {
        let url = format!("{}/", self.api_base);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("method", "track.getInfo"),
                ("api_key", self.api_key.as_str()),
                ("artist", artist),
                ("track", title),
                ("format", "json"),
            ])
            .send()
            .await?;

        if response.status().as_u16() == 429 {
            return Err(LookupError::Status { status: 429 });
        }

        // Last.fm reports most failures as JSON bodies, sometimes with 4xx.
        let body: TrackInfoResponse = response.json().await?;
        Ok(extract_image(body)?.map(|url| {
            ArtworkCandidate::new(url, ArtworkSourceKind::LastFm, QualityTier::Medium)
        }))
    }
}
