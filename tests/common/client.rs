//! HTTP client for end-to-end tests
//!
//! This module wraps reqwest and provides methods for all artwork-server
//! endpoints. When API routes change, update only this file.

use super::constants::*;
use reqwest::Response;
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    pub async fn health(&self) -> Response {
        self.client
            .get(format!("{}/v1/health", self.base_url))
            .send()
            .await
            .expect("Health request failed")
    }

    /// GET /v1/artwork/resolve
    pub async fn resolve(&self, title: &str, artist: &str, reference: Option<&str>) -> Response {
        let mut params = vec![("title", title), ("artist", artist)];
        if let Some(reference) = reference {
            params.push(("reference", reference));
        }
        self.client
            .get(format!("{}/v1/artwork/resolve", self.base_url))
            .query(&params)
            .send()
            .await
            .expect("Resolve request failed")
    }

    /// Resolves and returns the parsed JSON body, asserting a 200
    pub async fn resolve_json(
        &self,
        title: &str,
        artist: &str,
        reference: Option<&str>,
    ) -> serde_json::Value {
        let response = self.resolve(title, artist, reference).await;
        assert_eq!(
            response.status(),
            reqwest::StatusCode::OK,
            "Resolve failed for {} - {}",
            artist,
            title
        );
        response.json().await.expect("Invalid resolve body")
    }

    /// GET /v1/artwork/cache
    pub async fn cache_stats(&self) -> serde_json::Value {
        self.client
            .get(format!("{}/v1/artwork/cache", self.base_url))
            .send()
            .await
            .expect("Cache stats request failed")
            .json()
            .await
            .expect("Invalid cache stats body")
    }

    /// DELETE /v1/artwork/cache
    pub async fn clear_cache(&self) -> Response {
        self.client
            .delete(format!("{}/v1/artwork/cache", self.base_url))
            .send()
            .await
            .expect("Cache clear request failed")
    }
}
