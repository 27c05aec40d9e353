use anyhow::{Context, Result};
use std::time::Duration;

use axum::{extract::State, middleware, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tracing::{error, info};

use super::artwork_routes::make_artwork_routes;
use super::metrics::{init_metrics, metrics_handler};
use super::{log_requests, state::ServerState, ServerConfig};
use crate::artwork::ArtworkResolver;

#[derive(Serialize)]
struct HealthStatus {
    pub status: &'static str,
    pub uptime_sec: u64,
    pub uptime: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn health(State(state): State<ServerState>) -> impl IntoResponse {
    let uptime = state.start_time.elapsed();
    Json(HealthStatus {
        status: "ok",
        uptime_sec: uptime.as_secs(),
        uptime: format_uptime(uptime),
    })
}

pub fn make_app(state: ServerState) -> Router {
    let health_routes: Router = Router::new()
        .route("/v1/health", get(health))
        .with_state(state.clone());

    health_routes
        .nest("/v1/artwork", make_artwork_routes(state.clone()))
        .layer(middleware::from_fn_with_state(state, log_requests))
}

fn make_metrics_app() -> Router {
    Router::new().route("/metrics", get(metrics_handler))
}

async fn serve_metrics(port: u16) -> Result<()> {
    let listener = TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind metrics port {}", port))?;
    axum::serve(listener, make_metrics_app()).await?;
    Ok(())
}

pub async fn run_server(config: ServerConfig, resolver: ArtworkResolver) -> Result<()> {
    init_metrics();

    let port = config.port;
    let metrics_port = config.metrics_port;
    let app = make_app(ServerState::new(config, resolver));

    let listener = TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    info!("Ready to serve at port {}!", port);

    if metrics_port != 0 {
        info!("Metrics available at port {}!", metrics_port);
        tokio::spawn(async move {
            if let Err(e) = serve_metrics(metrics_port).await {
                error!("Metrics server stopped: {:#}", e);
            }
        });
    }

    Ok(axum::serve(listener, app).await?)
}
