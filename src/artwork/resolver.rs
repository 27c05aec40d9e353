//! Artwork resolution.
//!
//! ## Decision flow
//!
//! ```text
//! supplied absent / "advertisement" ─────────────────────────┐
//! supplied flagged by classifier ──────── (keep as fallback) ─┤
//! supplied fails liveness probe ───────── (keep as fallback) ─┤
//! supplied alive ──► return supplied                          ▼
//!                                          cache hit ──► return cached
//!                                          adapters in order ──► cache + return first hit
//!                                          nothing ──► fallback or None
//! ```

use super::cache::ResultCache;
use super::classifier;
use super::liveness::LivenessProbe;
use super::models::{cache_key, ArtworkQuery, Resolution, ResolutionOutcome};
use super::sources::{lookup_or_absent, ArtworkAdapter};
use crate::server::metrics::{record_artwork_resolution, set_artwork_cache_entries};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Supplied reference value the player emits while an ad is airing.
pub const ADVERTISEMENT_SENTINEL: &str = "advertisement";

pub struct ArtworkResolver {
    adapters: Vec<Arc<dyn ArtworkAdapter>>,
    cache: Arc<ResultCache>,
    probe: Arc<dyn LivenessProbe>,
    lookup_timeout: Duration,
}

impl ArtworkResolver {
    /// `adapters` are consulted in the given order.
    pub fn new(
        adapters: Vec<Arc<dyn ArtworkAdapter>>,
        cache: Arc<ResultCache>,
        probe: Arc<dyn LivenessProbe>,
        lookup_timeout: Duration,
    ) -> Self {
        Self {
            adapters,
            cache,
            probe,
            lookup_timeout,
        }
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    pub fn adapter_sources(&self) -> Vec<&'static str> {
        self.adapters.iter().map(|a| a.source().as_str()).collect()
    }

    /// Resolve the artwork URL to display for a track.
    ///
    /// Never fails; `None` means nothing better than the caller's own
    /// default visual is available.
    pub async fn resolve(&self, supplied: Option<&str>, title: &str, artist: &str) -> Option<String> {
        self.resolve_detailed(supplied, title, artist)
            .await
            .map(|resolution| resolution.url)
    }

    pub async fn resolve_query(&self, query: &ArtworkQuery) -> Option<String> {
        self.resolve(
            query.supplied_reference.as_deref(),
            &query.title,
            &query.artist,
        )
        .await
    }

    /// Like [`resolve`](Self::resolve), also reporting how the URL was
    /// obtained.
    pub async fn resolve_detailed(
        &self,
        supplied: Option<&str>,
        title: &str,
        artist: &str,
    ) -> Option<Resolution> {
        let supplied = supplied.filter(|s| !s.is_empty() && *s != ADVERTISEMENT_SENTINEL);

        let fallback = match supplied {
            None => None,
            Some(reference) if classifier::needs_replacement(reference) => {
                debug!(reference, "Supplied artwork looks generic, searching");
                Some(reference)
            }
            Some(reference) => {
                if self.probe.is_alive(reference).await {
                    record_artwork_resolution(ResolutionOutcome::Supplied.label());
                    return Some(Resolution {
                        url: reference.to_string(),
                        outcome: ResolutionOutcome::Supplied,
                    });
                }
                debug!(reference, "Supplied artwork is unreachable, searching");
                Some(reference)
            }
        };

        let resolution = match self.search(title, artist).await {
            Some(found) => Some(found),
            None => fallback.map(|reference| Resolution {
                url: reference.to_string(),
                outcome: ResolutionOutcome::FallbackToSupplied,
            }),
        };

        record_artwork_resolution(
            resolution
                .as_ref()
                .map(|r| r.outcome.label())
                .unwrap_or("unresolved"),
        );
        resolution
    }

    async fn search(&self, title: &str, artist: &str) -> Option<Resolution> {
        let key = cache_key(title, artist);
        if let Some(cached) = self.cache.get(&key) {
            debug!(key = %key, "Artwork cache hit");
            return Some(Resolution {
                url: cached.reference_url,
                outcome: ResolutionOutcome::Cached,
            });
        }

        for adapter in &self.adapters {
            let found =
                lookup_or_absent(adapter.as_ref(), title, artist, self.lookup_timeout).await;
            if let Some(candidate) = found {
                info!(
                    source = %candidate.source,
                    quality = ?candidate.quality,
                    title,
                    artist,
                    "Resolved artwork"
                );
                let resolution = Resolution {
                    url: candidate.reference_url.clone(),
                    outcome: ResolutionOutcome::Fetched(candidate.source),
                };
                self.cache.set(key, candidate);
                set_artwork_cache_entries(self.cache.len());
                return Some(resolution);
            }
        }

        debug!(title, artist, "No adapter produced artwork");
        None
    }
}
