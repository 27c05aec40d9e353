//! In-process stand-ins for the remote artwork catalogs
//!
//! A single axum server on a random port plays the iTunes search API, the
//! Last.fm API, the Spotify accounts and Web APIs, and an image host.
//! Every catalog counts the requests it receives.

use super::constants::*;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Default)]
struct Counters {
    itunes: AtomicUsize,
    lastfm: AtomicUsize,
    spotify_token: AtomicUsize,
    spotify_search: AtomicUsize,
    images: AtomicUsize,
    ranged_gets: AtomicUsize,
}

struct Behaviour {
    spotify_token_lifetime_sec: AtomicU64,
    reject_next_spotify_search: AtomicBool,
}

impl Default for Behaviour {
    fn default() -> Self {
        Self {
            spotify_token_lifetime_sec: AtomicU64::new(3600),
            reject_next_spotify_search: AtomicBool::new(false),
        }
    }
}

#[derive(Clone)]
struct FakeState {
    base_url: String,
    counters: Arc<Counters>,
    behaviour: Arc<Behaviour>,
}

pub struct FakeCatalogs {
    pub base_url: String,
    counters: Arc<Counters>,
    behaviour: Arc<Behaviour>,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

fn slug(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect()
}

async fn itunes_search(
    State(state): State<FakeState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<serde_json::Value> {
    state.counters.itunes.fetch_add(1, Ordering::SeqCst);
    let term = params.get("term").cloned().unwrap_or_default();
    if term.contains(OBSCURE_MARKER) {
        return Json(json!({ "resultCount": 0, "results": [] }));
    }
    Json(json!({
        "resultCount": 1,
        "results": [{
            "trackName": term,
            "artworkUrl100": format!("{}/art/{}/100x100bb.jpg", state.base_url, slug(&term)),
        }]
    }))
}

async fn lastfm_api(
    State(state): State<FakeState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<serde_json::Value> {
    state.counters.lastfm.fetch_add(1, Ordering::SeqCst);
    if params.get("api_key").map(String::as_str) != Some(LASTFM_API_KEY) {
        return Json(json!({ "error": 10, "message": "Invalid API key" }));
    }
    let track = params.get("track").cloned().unwrap_or_default();
    let image = |size: &str| {
        json!({
            "#text": format!("{}/lastfm-art/{}/{}.png", state.base_url, size, slug(&track)),
            "size": size,
        })
    };
    Json(json!({
        "track": {
            "name": track,
            "album": { "image": [image("small"), image("medium"), image("large")] }
        }
    }))
}

async fn spotify_token(State(state): State<FakeState>, headers: HeaderMap) -> Response {
    state.counters.spotify_token.fetch_add(1, Ordering::SeqCst);
    let has_basic_auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Basic "));
    if !has_basic_auth {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({
        "access_token": SPOTIFY_TOKEN,
        "token_type": "Bearer",
        "expires_in": state.behaviour.spotify_token_lifetime_sec.load(Ordering::SeqCst),
    }))
    .into_response()
}

async fn spotify_search(
    State(state): State<FakeState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.counters.spotify_search.fetch_add(1, Ordering::SeqCst);
    let expected = format!("Bearer {}", SPOTIFY_TOKEN);
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected);
    if !authorized
        || state
            .behaviour
            .reject_next_spotify_search
            .swap(false, Ordering::SeqCst)
    {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let q = slug(params.get("q").map(String::as_str).unwrap_or_default());
    Json(json!({
        "tracks": {
            "items": [{
                "name": q,
                "album": {
                    "images": [
                        { "url": format!("{}/spotify-art/{}/300.jpg", state.base_url, q), "width": 300, "height": 300 },
                        { "url": format!("{}/spotify-art/{}/640.jpg", state.base_url, q), "width": 640, "height": 640 },
                    ]
                }
            }]
        }
    }))
    .into_response()
}

async fn reachable_cover(State(state): State<FakeState>) -> &'static [u8] {
    state.counters.images.fetch_add(1, Ordering::SeqCst);
    b"\xff\xd8\xff"
}

async fn generic_cover(State(state): State<FakeState>) -> &'static [u8] {
    state.counters.images.fetch_add(1, Ordering::SeqCst);
    b"\xff\xd8\xff"
}

async fn head_not_allowed(State(state): State<FakeState>) -> StatusCode {
    state.counters.images.fetch_add(1, Ordering::SeqCst);
    StatusCode::METHOD_NOT_ALLOWED
}

async fn ranged_cover(State(state): State<FakeState>, headers: HeaderMap) -> Response {
    state.counters.images.fetch_add(1, Ordering::SeqCst);
    let ranged = headers
        .get("range")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "bytes=0-0");
    if ranged {
        state.counters.ranged_gets.fetch_add(1, Ordering::SeqCst);
        (StatusCode::PARTIAL_CONTENT, &b"\xff"[..]).into_response()
    } else {
        (StatusCode::OK, &b"\xff\xd8\xff"[..]).into_response()
    }
}

async fn missing_cover(State(state): State<FakeState>) -> StatusCode {
    state.counters.images.fetch_add(1, Ordering::SeqCst);
    StatusCode::NOT_FOUND
}

impl FakeCatalogs {
    /// Spawns the fake catalogs on a random port
    pub async fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let counters = Arc::new(Counters::default());
        let behaviour = Arc::new(Behaviour::default());
        let state = FakeState {
            base_url: base_url.clone(),
            counters: counters.clone(),
            behaviour: behaviour.clone(),
        };

        // GET routes also answer HEAD
        let app = Router::new()
            .route("/itunes/search", get(itunes_search))
            .route("/lastfm/", get(lastfm_api))
            .route("/spotify-accounts/api/token", post(spotify_token))
            .route("/spotify/v1/search", get(spotify_search))
            .route(REACHABLE_COVER_PATH, get(reachable_cover))
            .route(GENERIC_COVER_PATH, get(generic_cover))
            .route(MISSING_COVER_PATH, get(missing_cover))
            .route(
                HEAD_REJECTING_COVER_PATH,
                get(ranged_cover).head(head_not_allowed),
            )
            .with_state(state);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Fake catalogs failed");
        });

        Self {
            base_url,
            counters,
            behaviour,
            _shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Lifetime reported for newly issued Spotify tokens
    pub fn set_spotify_token_lifetime(&self, seconds: u64) {
        self.behaviour
            .spotify_token_lifetime_sec
            .store(seconds, Ordering::SeqCst);
    }

    /// Makes the next Spotify search answer 401 regardless of its token
    pub fn reject_next_spotify_search(&self) {
        self.behaviour
            .reject_next_spotify_search
            .store(true, Ordering::SeqCst);
    }

    pub fn itunes_requests(&self) -> usize {
        self.counters.itunes.load(Ordering::SeqCst)
    }

    pub fn lastfm_requests(&self) -> usize {
        self.counters.lastfm.load(Ordering::SeqCst)
    }

    pub fn spotify_token_requests(&self) -> usize {
        self.counters.spotify_token.load(Ordering::SeqCst)
    }

    pub fn spotify_search_requests(&self) -> usize {
        self.counters.spotify_search.load(Ordering::SeqCst)
    }

    pub fn image_requests(&self) -> usize {
        self.counters.images.load(Ordering::SeqCst)
    }

    pub fn ranged_get_requests(&self) -> usize {
        self.counters.ranged_gets.load(Ordering::SeqCst)
    }

    pub fn catalog_requests(&self) -> usize {
        self.itunes_requests() + self.lastfm_requests() + self.spotify_search_requests()
    }
}
