//! Artwork source adapters.
//!
//! Every external catalog sits behind [`ArtworkAdapter`]. Adapters report
//! failures as [`LookupError`]; the resolver only ever sees the output of
//! [`lookup_or_absent`], which turns errors and timeouts into `None`.

mod itunes;
mod lastfm;
mod placeholder;
mod spotify;

pub use itunes::ITunesAdapter;
pub use lastfm::LastFmAdapter;
pub use placeholder::PlaceholderAdapter;
pub use spotify::SpotifyAdapter;

use super::models::{ArtworkCandidate, ArtworkSourceKind};
use crate::server::metrics::record_adapter_lookup;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors an adapter can hit while talking to its catalog.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Catalog returned status {status}")]
    Status { status: u16 },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Request timeout")]
    Timeout,
}

impl From<reqwest::Error> for LookupError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LookupError::Timeout
        } else if e.is_decode() {
            LookupError::InvalidResponse(e.to_string())
        } else if let Some(status) = e.status() {
            LookupError::Status {
                status: status.as_u16(),
            }
        } else {
            LookupError::Connection(e.to_string())
        }
    }
}

/// A catalog that can be searched for track artwork.
#[async_trait]
pub trait ArtworkAdapter: Send + Sync {
    fn source(&self) -> ArtworkSourceKind;

    /// Search the catalog for a track.
    ///
    /// `Ok(None)` means the catalog answered but had nothing usable.
    async fn lookup(
        &self,
        title: &str,
        artist: &str,
    ) -> Result<Option<ArtworkCandidate>, LookupError>;
}

/// Runs one adapter lookup bounded by `timeout`, folding every failure
/// into `None`.
pub async fn lookup_or_absent(
    adapter: &dyn ArtworkAdapter,
    title: &str,
    artist: &str,
    timeout: Duration,
) -> Option<ArtworkCandidate> {
    let source = adapter.source();
    let result = match tokio::time::timeout(timeout, adapter.lookup(title, artist)).await {
        Ok(result) => result,
        Err(_) => Err(LookupError::Timeout),
    };

    match result {
        Ok(Some(candidate)) => {
            record_adapter_lookup(source, "hit");
            Some(candidate)
        }
        Ok(None) => {
            debug!(%source, title, artist, "No artwork found");
            record_adapter_lookup(source, "miss");
            None
        }
        Err(e) => {
            warn!(%source, title, artist, "Artwork lookup failed: {}", e);
            record_adapter_lookup(source, "error");
            None
        }
    }
}

/// Ensures a configured base URL has no trailing slash.
pub(crate) fn trim_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}
