//! iTunes Search API adapter.
//!
//! The API only hands out small thumbnails (`.../100x100bb.jpg`), but the
//! CDN serves any size when the dimension token in the URL is rewritten.

use super::{trim_base_url, ArtworkAdapter, LookupError};
use crate::artwork::models::{ArtworkCandidate, ArtworkSourceKind, QualityTier};
use crate::config::ITunesSettings;
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;

lazy_static! {
    static ref SIZE_TOKEN: Regex = Regex::new(r"\d{2,4}x\d{2,4}").unwrap();
}

pub struct ITunesAdapter {
    client: Client,
    api_base: String,
    artwork_size: u32,
    country: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    results: Vec<ITunesResult>,
}

#[derive(Deserialize)]
struct ITunesResult {
    #[serde(rename = "artworkUrl100")]
    artwork_url_100: Option<String>,
    #[serde(rename = "artworkUrl60")]
    artwork_url_60: Option<String>,
}

impl ITunesAdapter {
    pub fn new(client: Client, settings: &ITunesSettings) -> Self {
        Self {
            client,
            api_base: trim_base_url(&settings.api_base),
            artwork_size: settings.artwork_size,
            country: settings.country.clone(),
        }
    }
}

/// Rewrites the last `NNNxNNN` token of an artwork URL to `size`x`size`.
fn upscale_artwork_url(url: &str, size: u32) -> String {
    match SIZE_TOKEN.find_iter(url).last() {
        Some(token) => format!(
            "{}{}x{}{}",
            &url[..token.start()],
            size,
            size,
            &url[token.end()..]
        ),
        None => url.to_string(),
    }
}

#[async_trait]
impl ArtworkAdapter for ITunesAdapter {
    fn source(&self) -> ArtworkSourceKind {
        ArtworkSourceKind::ITunes
    }

    async fn lookup(
        &self,
        title: &str,
        artist: &str,
    ) -> Result<Option<ArtworkCandidate>, LookupError> {
        let term = format!("{} {}", title, artist);
        let url = format!("{}/search", self.api_base);

        let mut params = vec![
            ("term", term.as_str()),
            ("entity", "song"),
            ("limit", "1"),
        ];
        if let Some(country) = self.country.as_deref() {
            params.push(("country", country));
        }

        let response = self.client.get(&url).query(&params).send().await?;
        if !response.status().is_success() {
            return Err(LookupError::Status {
                status: response.status().as_u16(),
            });
        }

        let body: SearchResponse = response.json().await?;
        let artwork_url = body
            .results
            .into_iter()
            .next()
            .and_then(|result| result.artwork_url_100.or(result.artwork_url_60))
            .filter(|url| !url.is_empty());

        Ok(artwork_url.map(|url| {
            ArtworkCandidate::new(
                upscale_artwork_url(&url, self.artwork_size),
                ArtworkSourceKind::ITunes,
                QualityTier::High,
            )
        }))
    }
}
