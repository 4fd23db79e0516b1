//! HTTP/JSON API Layer
//!
//! ## Architecture
//! ```text
//! Game client
//!       ↓ HTTP, JSON body
//! Axum Router (port 8000)
//!       ↓
//! Generation handlers (validation, then dungeon_core)
//!       ↓
//! ProfileRepo (coins, progress)
//! ```
//!
//! The player is identified by the optional `x-player-id` header.

pub mod error;
pub mod generation;
pub mod validation;

use axum::{middleware, routing::get, Json, Router};
use dungeon_core::RoomGenerator;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::metrics::ServerMetrics;
use crate::rng::RngSource;
use crate::storage::ProfileRepo;

pub use error::ApiError;

/// Shared state available to all API handlers
#[derive(Clone)]
pub struct ApiState {
    pub profiles: Arc<dyn ProfileRepo>,
    pub generator: RoomGenerator,
    /// Hands each request its own RNG
    pub rng: Arc<RngSource>,
    pub metrics: Arc<ServerMetrics>,
}

impl ApiState {
    pub fn new(profiles: Arc<dyn ProfileRepo>, generator: RoomGenerator, rng: RngSource) -> Self {
        Self {
            profiles,
            generator,
            rng: Arc::new(rng),
            metrics: ServerMetrics::new(),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the full API router with all service endpoints
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(crate::metrics::prometheus_handler))
        .route("/metrics/json", get(crate::metrics::json_metrics_handler))
        .merge(generation::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::metrics::metrics_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until the process receives Ctrl-C
pub async fn start_api_server(
    config: &ServerConfig,
    profiles: Arc<dyn ProfileRepo>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let rng = RngSource::new(config.rng_seed);
    let generator = RoomGenerator::new(config.generation());
    let seed = rng.seed();
    let boss_promotion = generator.config().boss_promotion;
    let app = build_router(ApiState::new(profiles, generator, rng));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(
        ?seed,
        ?boss_promotion,
        "API server listening on {}",
        addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("shutdown signal received");
        })
        .await?;
    Ok(())
}
