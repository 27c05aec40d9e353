//! Existence checks for supplied artwork references.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

#[async_trait]
pub trait LivenessProbe: Send + Sync {
    /// Whether `reference` currently points at something displayable.
    async fn is_alive(&self, reference: &str) -> bool;
}

/// Probes references with a `HEAD` request, retrying with a one-byte `GET`
/// when the host does not allow `HEAD`.
///
/// Only absolute http(s) URLs are probed. Inline `data:image/` URIs and
/// root-relative paths are served by the site itself and assumed alive.
/// Every other reference (blank, `null`, other schemes) is dead.
pub struct HttpLivenessProbe {
    client: Client,
    timeout: Duration,
}

impl HttpLivenessProbe {
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum ReferenceKind {
    Remote,
    Local,
    Unusable,
}

fn classify_reference(reference: &str) -> ReferenceKind {
    let lowered = reference.trim().to_ascii_lowercase();
    if lowered.starts_with("http://") || lowered.starts_with("https://") {
        ReferenceKind::Remote
    } else if lowered.starts_with("data:image/")
        || (lowered.starts_with('/') && !lowered.starts_with("//"))
    {
        ReferenceKind::Local
    } else {
        ReferenceKind::Unusable
    }
}

#[async_trait]
impl LivenessProbe for HttpLivenessProbe {
    async fn is_alive(&self, reference: &str) -> bool {
        match classify_reference(reference) {
            ReferenceKind::Remote => {}
            ReferenceKind::Local => return true,
            ReferenceKind::Unusable => {
                debug!(reference, "Supplied artwork is not a usable reference");
                return false;
            }
        }
        let reference = reference.trim();

        let response = match self
            .client
            .head(reference)
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                debug!(reference, "Liveness probe failed: {}", e);
                return false;
            }
        };

        if response.status() != StatusCode::METHOD_NOT_ALLOWED {
            return response.status().is_success();
        }

        match self
            .client
            .get(reference)
            .header(reqwest::header::RANGE, "bytes=0-0")
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!(reference, "Liveness probe failed: {}", e);
                false
            }
        }
    }
}
