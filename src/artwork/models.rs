//! Data types shared by the artwork resolution pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where an [`ArtworkCandidate`] came from.
///
/// The declaration order is also the priority order in which adapters are
/// consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtworkSourceKind {
    Spotify,
    #[serde(rename = "itunes")]
    ITunes,
    #[serde(rename = "lastfm")]
    LastFm,
    Generated,
}

impl ArtworkSourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtworkSourceKind::Spotify => "spotify",
            ArtworkSourceKind::ITunes => "itunes",
            ArtworkSourceKind::LastFm => "lastfm",
            ArtworkSourceKind::Generated => "generated",
        }
    }
}

impl fmt::Display for ArtworkSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    High,
    Medium,
    Low,
}

/// A successfully looked-up artwork reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtworkCandidate {
    pub reference_url: String,
    pub source: ArtworkSourceKind,
    pub quality: QualityTier,
}

impl ArtworkCandidate {
    pub fn new(
        reference_url: impl Into<String>,
        source: ArtworkSourceKind,
        quality: QualityTier,
    ) -> Self {
        Self {
            reference_url: reference_url.into(),
            source,
            quality,
        }
    }
}

/// Input of a single resolution, also the query string of the resolve
/// route. Missing title or artist deserialize as empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ArtworkQuery {
    pub title: String,
    pub artist: String,
    #[serde(rename = "reference")]
    pub supplied_reference: Option<String>,
}

impl ArtworkQuery {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            supplied_reference: None,
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.supplied_reference = Some(reference.into());
        self
    }

    pub fn cache_key(&self) -> String {
        cache_key(&self.title, &self.artist)
    }
}

/// Case-normalized cache key for a title/artist pair.
pub fn cache_key(title: &str, artist: &str) -> String {
    format!("{}-{}", title.to_lowercase(), artist.to_lowercase())
}

/// How a resolved URL was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionOutcome {
    /// The supplied reference was kept as is.
    Supplied,
    /// Served from the result cache.
    Cached,
    /// Looked up from one of the adapters.
    Fetched(ArtworkSourceKind),
    /// Searching produced nothing, the flagged or unreachable supplied
    /// reference is returned instead.
    FallbackToSupplied,
}

impl ResolutionOutcome {
    /// Label used for metrics and logs.
    pub fn label(&self) -> &'static str {
        match self {
            ResolutionOutcome::Supplied => "supplied",
            ResolutionOutcome::Cached => "cached",
            ResolutionOutcome::Fetched(_) => "fetched",
            ResolutionOutcome::FallbackToSupplied => "fallback_to_supplied",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub url: String,
    pub outcome: ResolutionOutcome,
}
