//! Dungeon Crawler Server Library
//!
//! HTTP adapter around `dungeon_core`:
//! - JSON endpoints for room generation and the room-to-room loop
//! - Player profile storage behind a repository trait
//! - Layered configuration (defaults, RON file, environment)
//! - Request and game metrics (Prometheus + JSON export)

pub mod api; // HTTP/JSON API endpoints
pub mod config; // ServerConfig loading
pub mod metrics; // Server metrics (Prometheus + JSON export)
pub mod rng; // Per-request RNG forking
pub mod storage; // Player profiles

// Re-export commonly used types
pub use api::{build_router, start_api_server, ApiError, ApiState};
pub use config::{ConfigError, ServerConfig};
pub use metrics::ServerMetrics;
pub use rng::RngSource;
pub use storage::{InMemoryProfileStore, PlayerProfile, ProfileRepo, StorageError};
