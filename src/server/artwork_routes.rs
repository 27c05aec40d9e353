//! Artwork API routes

use crate::artwork::{ArtworkQuery, CacheStats};
use crate::server::metrics::set_artwork_cache_entries;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::info;

use super::state::{GuardedResolver, GuardedResultCache, ServerState};

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

async fn resolve_artwork(
    State(resolver): State<GuardedResolver>,
    Query(query): Query<ArtworkQuery>,
) -> Response {
    if query.title.trim().is_empty() || query.artist.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "title and artist are required");
    }

    let resolution = resolver
        .resolve_detailed(
            query.supplied_reference.as_deref(),
            &query.title,
            &query.artist,
        )
        .await;

    match resolution {
        Some(resolution) => Json(resolution).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "no artwork found"),
    }
}

async fn get_cache_stats(State(cache): State<GuardedResultCache>) -> Json<CacheStats> {
    Json(cache.stats())
}

async fn clear_cache(State(cache): State<GuardedResultCache>) -> StatusCode {
    let dropped = cache.len();
    cache.clear();
    set_artwork_cache_entries(0);
    info!("Artwork cache cleared ({} entries dropped)", dropped);
    StatusCode::NO_CONTENT
}

pub fn make_artwork_routes(state: ServerState) -> Router {
    Router::new()
        .route("/resolve", get(resolve_artwork))
        .route("/cache", get(get_cache_stats).delete(clear_cache))
        .with_state(state)
}
