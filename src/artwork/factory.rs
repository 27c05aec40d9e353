//! Factory functions wiring a resolver from configuration.

use super::cache::ResultCache;
use super::liveness::HttpLivenessProbe;
use super::resolver::ArtworkResolver;
use super::sources::{
    ArtworkAdapter, ITunesAdapter, LastFmAdapter, PlaceholderAdapter, SpotifyAdapter,
};
use crate::config::ArtworkSettings;
use anyhow::{Context, Result};
use reqwest::Client;
use std::sync::Arc;
use tracing::info;

/// Build the adapter chain in priority order.
///
/// Catalogs needing credentials are left out when none are configured; the
/// generated placeholder is always last.
pub fn create_adapters(settings: &ArtworkSettings, client: &Client) -> Vec<Arc<dyn ArtworkAdapter>> {
    let mut adapters: Vec<Arc<dyn ArtworkAdapter>> = Vec::new();

    match &settings.spotify {
        Some(spotify) => adapters.push(Arc::new(SpotifyAdapter::new(client.clone(), spotify))),
        None => info!("Spotify credentials not configured, skipping Spotify artwork"),
    }

    adapters.push(Arc::new(ITunesAdapter::new(client.clone(), &settings.itunes)));

    match &settings.lastfm {
        Some(lastfm) => adapters.push(Arc::new(LastFmAdapter::new(client.clone(), lastfm))),
        None => info!("Last.fm API key not configured, skipping Last.fm artwork"),
    }

    adapters.push(Arc::new(PlaceholderAdapter::new(&settings.placeholder)));
    adapters
}

/// Create a resolver with a fresh, empty cache.
///
/// The returned cache is the one the resolver writes to, handed back so
/// the caller can expose stats or clear it.
pub fn create_resolver(settings: &ArtworkSettings) -> Result<(ArtworkResolver, Arc<ResultCache>)> {
    let client = Client::builder()
        .user_agent(settings.user_agent.as_str())
        .timeout(settings.lookup_timeout)
        .build()
        .context("Failed to create HTTP client")?;

    let adapters = create_adapters(settings, &client);
    let probe = Arc::new(HttpLivenessProbe::new(client, settings.liveness_timeout));
    let cache = Arc::new(ResultCache::new());

    let resolver = ArtworkResolver::new(adapters, cache.clone(), probe, settings.lookup_timeout);
    info!(
        "Artwork resolver ready with sources: {}",
        resolver.adapter_sources().join(", ")
    );
    Ok((resolver, cache))
}
