//! Test server lifecycle management
//!
//! This module manages spawning and shutting down artwork servers wired to
//! a [`FakeCatalogs`] instance. Each test gets its own server and cache.

use super::constants::*;
use super::fake_catalogs::FakeCatalogs;
use airwaves_artwork::config::{ArtworkSettings, ITunesSettings, LastFmSettings, SpotifySettings};
use airwaves_artwork::{create_resolver, make_app, RequestsLoggingLevel, ServerConfig, ServerState};
use std::time::Duration;
use tokio::net::TcpListener;

/// Artwork server instance listening on a random port
///
/// When dropped, the server gracefully shuts down.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

/// Settings pointing every keyless catalog at the fakes.
pub fn fake_settings(catalogs: &FakeCatalogs) -> ArtworkSettings {
    let mut settings = ArtworkSettings {
        lookup_timeout: Duration::from_secs(2),
        liveness_timeout: Duration::from_secs(1),
        itunes: ITunesSettings {
            api_base: catalogs.url("/itunes"),
            ..Default::default()
        },
        ..Default::default()
    };
    settings.placeholder.base_url = catalogs.url("/generated");
    settings
}

impl TestServer {
    /// Spawns a server using iTunes and the generated placeholder only
    pub async fn spawn(catalogs: &FakeCatalogs) -> Self {
        Self::spawn_with_settings(fake_settings(catalogs)).await
    }

    /// Spawns a server with every catalog configured
    pub async fn spawn_all_sources(catalogs: &FakeCatalogs) -> Self {
        let mut settings = fake_settings(catalogs);
        settings.spotify = Some(SpotifySettings {
            client_id: SPOTIFY_CLIENT_ID.to_string(),
            client_secret: SPOTIFY_CLIENT_SECRET.to_string(),
            api_base: catalogs.url("/spotify"),
            accounts_base: catalogs.url("/spotify-accounts"),
        });
        settings.lastfm = Some(LastFmSettings {
            api_key: LASTFM_API_KEY.to_string(),
            api_base: catalogs.url("/lastfm"),
        });
        Self::spawn_with_settings(settings).await
    }

    /// Spawns a server with Last.fm but no Spotify credentials
    pub async fn spawn_with_lastfm(catalogs: &FakeCatalogs) -> Self {
        let mut settings = fake_settings(catalogs);
        settings.lastfm = Some(LastFmSettings {
            api_key: LASTFM_API_KEY.to_string(),
            api_base: catalogs.url("/lastfm"),
        });
        Self::spawn_with_settings(settings).await
    }

    pub async fn spawn_with_settings(settings: ArtworkSettings) -> Self {
        let (resolver, _cache) = create_resolver(&settings).expect("Failed to build resolver");

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let config = ServerConfig {
            port,
            metrics_port: 0,
            requests_logging_level: RequestsLoggingLevel::None,
        };
        let app = make_app(ServerState::new(config, resolver));

        // Create shutdown channel
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        // Spawn server in background task with graceful shutdown
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling the /v1/health endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server failed to become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            if let Ok(response) = client
                .get(format!("{}/v1/health", self.base_url))
                .send()
                .await
            {
                if response.status().is_success() {
                    return;
                }
            }

            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        // Trigger graceful shutdown
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
