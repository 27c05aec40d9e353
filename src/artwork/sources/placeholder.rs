//! Generated placeholder artwork.
//!
//! Builds an image-service URL that renders the title and artist as text.
//! It performs no I/O and never fails, so it always ends the adapter chain.

use super::{trim_base_url, ArtworkAdapter, LookupError};
use crate::artwork::models::{ArtworkCandidate, ArtworkSourceKind, QualityTier};
use crate::config::PlaceholderSettings;
use async_trait::async_trait;

pub struct PlaceholderAdapter {
    base_url: String,
    size: u32,
}

impl PlaceholderAdapter {
    pub fn new(settings: &PlaceholderSettings) -> Self {
        Self {
            base_url: trim_base_url(&settings.base_url),
            size: settings.size,
        }
    }

    pub fn placeholder_url(&self, title: &str, artist: &str) -> String {
        let text = format!("{}\n{}", title, artist);
        format!(
            "{}/{}x{}?text={}",
            self.base_url,
            self.size,
            self.size,
            urlencoding::encode(&text)
        )
    }
}

#[async_trait]
impl ArtworkAdapter for PlaceholderAdapter {
    fn source(&self) -> ArtworkSourceKind {
        ArtworkSourceKind::Generated
    }

    async fn lookup(
        &self,
        title: &str,
        artist: &str,
    ) -> Result<Option<ArtworkCandidate>, LookupError> {
        Ok(Some(ArtworkCandidate::new(
            self.placeholder_url(title, artist),
            ArtworkSourceKind::Generated,
            QualityTier::Medium,
        )))
    }
}
