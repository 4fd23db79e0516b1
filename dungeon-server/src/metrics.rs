//! Server Metrics - request and game counters with Prometheus + JSON export
//!
//! All counters are lock-free atomics.
//!
//! ## Endpoints
//! - `GET /metrics` - Prometheus text format
//! - `GET /metrics/json` - JSON format (read by the load test client)

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::api::{ApiError, ApiState};

#[derive(Debug)]
pub struct ServerMetrics {
    /// Total HTTP requests served
    pub total_requests: AtomicU64,
    /// Total request errors (4xx + 5xx)
    pub total_errors: AtomicU64,
    /// Cumulative request duration in microseconds
    pub total_duration_us: AtomicU64,
    pub rooms_generated: AtomicU64,
    pub rooms_cleared: AtomicU64,
    pub enemies_killed: AtomicU64,
    pub coins_awarded: AtomicU64,
    pub game_overs: AtomicU64,
    pub start_time: Instant,
}

impl Default for ServerMetrics {
    fn default() -> Self {
        Self {
            total_requests: AtomicU64::new(0),
            total_errors: AtomicU64::new(0),
            total_duration_us: AtomicU64::new(0),
            rooms_generated: AtomicU64::new(0),
            rooms_cleared: AtomicU64::new(0),
            enemies_killed: AtomicU64::new(0),
            coins_awarded: AtomicU64::new(0),
            game_overs: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }
}

impl ServerMetrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn record_request(&self, duration_us: u64, is_error: bool) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.total_duration_us.fetch_add(duration_us, Ordering::Relaxed);
        if is_error {
            self.total_errors.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn uptime_secs(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    pub fn requests_per_second(&self) -> f64 {
        let total = self.total_requests.load(Ordering::Relaxed) as f64;
        let uptime = self.uptime_secs();
        if uptime > 0.0 { total / uptime } else { 0.0 }
    }

    pub fn avg_duration_ms(&self) -> f64 {
        let total = self.total_requests.load(Ordering::Relaxed);
        let dur_us = self.total_duration_us.load(Ordering::Relaxed);
        if total > 0 {
            (dur_us as f64 / total as f64) / 1000.0
        } else {
            0.0
        }
    }

    pub fn snapshot(&self) -> JsonMetrics {
        JsonMetrics {
            uptime_secs: self.uptime_secs(),
            total_requests: self.total_requests.load(Ordering::Relaxed),
            total_errors: self.total_errors.load(Ordering::Relaxed),
            rps: self.requests_per_second(),
            avg_request_duration_ms: self.avg_duration_ms(),
            rooms_generated: self.rooms_generated.load(Ordering::Relaxed),
            rooms_cleared: self.rooms_cleared.load(Ordering::Relaxed),
            enemies_killed: self.enemies_killed.load(Ordering::Relaxed),
            coins_awarded: self.coins_awarded.load(Ordering::Relaxed),
            game_overs: self.game_overs.load(Ordering::Relaxed),
        }
    }
}

// ============================================================================
// Axum Middleware - Automatic request tracking
// ============================================================================

pub async fn metrics_middleware(
    State(state): State<ApiState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let resp = next.run(req).await;
    let duration_us = start.elapsed().as_micros() as u64;
    let is_error = resp.status().is_client_error() || resp.status().is_server_error();

    state.metrics.record_request(duration_us, is_error);
    resp
}

// ============================================================================
// GET /metrics - Prometheus text exposition format
// ============================================================================

pub fn render_prometheus(m: &ServerMetrics) -> String {
    let s = m.snapshot();
    let avg_req_duration_s = s.avg_request_duration_ms / 1000.0;

    format!(
        "# HELP dungeon_requests_total Total HTTP requests served\n\
         # TYPE dungeon_requests_total counter\n\
         dungeon_requests_total {total_requests}\n\
         \n\
         # HELP dungeon_request_errors_total Total HTTP request errors (4xx/5xx)\n\
         # TYPE dungeon_request_errors_total counter\n\
         dungeon_request_errors_total {total_errors}\n\
         \n\
         # HELP dungeon_request_duration_seconds Average request duration\n\
         # TYPE dungeon_request_duration_seconds gauge\n\
         dungeon_request_duration_seconds {avg_req_duration_s:.6}\n\
         \n\
         # HELP dungeon_requests_per_second Current request throughput\n\
         # TYPE dungeon_requests_per_second gauge\n\
         dungeon_requests_per_second {rps:.2}\n\
         \n\
         # HELP dungeon_rooms_generated_total Rooms generated\n\
         # TYPE dungeon_rooms_generated_total counter\n\
         dungeon_rooms_generated_total {rooms_generated}\n\
         \n\
         # HELP dungeon_rooms_cleared_total Rooms cleared and left\n\
         # TYPE dungeon_rooms_cleared_total counter\n\
         dungeon_rooms_cleared_total {rooms_cleared}\n\
         \n\
         # HELP dungeon_enemies_killed_total Enemy kills reported\n\
         # TYPE dungeon_enemies_killed_total counter\n\
         dungeon_enemies_killed_total {enemies_killed}\n\
         \n\
         # HELP dungeon_coins_awarded_total Coins awarded for kills\n\
         # TYPE dungeon_coins_awarded_total counter\n\
         dungeon_coins_awarded_total {coins_awarded}\n\
         \n\
         # HELP dungeon_game_overs_total Runs that ended in death\n\
         # TYPE dungeon_game_overs_total counter\n\
         dungeon_game_overs_total {game_overs}\n\
         \n\
         # HELP dungeon_uptime_seconds Server uptime\n\
         # TYPE dungeon_uptime_seconds gauge\n\
         dungeon_uptime_seconds {uptime:.2}\n",
        total_requests = s.total_requests,
        total_errors = s.total_errors,
        rps = s.rps,
        rooms_generated = s.rooms_generated,
        rooms_cleared = s.rooms_cleared,
        enemies_killed = s.enemies_killed,
        coins_awarded = s.coins_awarded,
        game_overs = s.game_overs,
        uptime = s.uptime_secs,
    )
}

pub async fn prometheus_handler(State(state): State<ApiState>) -> impl IntoResponse {
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        render_prometheus(&state.metrics),
    )
}

// ============================================================================
// GET /metrics/json
// ============================================================================

#[derive(Debug, Serialize)]
pub struct JsonMetrics {
    pub uptime_secs: f64,
    pub total_requests: u64,
    pub total_errors: u64,
    pub rps: f64,
    pub avg_request_duration_ms: f64,
    pub rooms_generated: u64,
    pub rooms_cleared: u64,
    pub enemies_killed: u64,
    pub coins_awarded: u64,
    pub game_overs: u64,
}

/// Counter snapshot plus state read from the store and RNG source
#[derive(Debug, Serialize)]
pub struct ServerStatus {
    #[serde(flatten)]
    pub metrics: JsonMetrics,
    pub profiles: usize,
    pub rng_forks: u64,
}

pub async fn json_metrics_handler(
    State(state): State<ApiState>,
) -> Result<Json<ServerStatus>, ApiError> {
    let profiles = state.profiles.count().await.map_err(ApiError::storage)?;
    Ok(Json(ServerStatus {
        metrics: state.metrics.snapshot(),
        profiles,
        rng_forks: state.rng.forks(),
    }))
}

// ============================================================================
// Tests
// ============================================================================
