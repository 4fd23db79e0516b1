//! Repository traits - abstraction layer for player data access
//!
//! Handlers talk to player progress only through [`ProfileRepo`], so the
//! in-memory store can be swapped for a database-backed one.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;

/// Generic result type for repository operations
pub type RepoResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

/// Persistent per-player progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub player_id: String,
    pub coins: u64,
    pub health: i64,
    pub rooms_cleared: u32,
    /// Best `rooms_cleared` ever recorded
    pub high_score: u32,
    pub updated_at: DateTime<Utc>,
}

impl PlayerProfile {
    pub fn new(player_id: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            coins: 0,
            health: dungeon_core::run::DEFAULT_MAX_HEALTH,
            rooms_cleared: 0,
            high_score: 0,
            updated_at: Utc::now(),
        }
    }
}

/// What the client reported when leaving a room
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomExitRecord {
    pub health: i64,
    pub coins_earned: u64,
    pub rooms_cleared: u32,
}

/// Repository for player profiles
#[async_trait]
pub trait ProfileRepo: Send + Sync {
    async fn get(&self, player_id: &str) -> RepoResult<Option<PlayerProfile>>;

    /// Add `amount` coins, creating the profile if needed; returns the new total
    async fn award_coins(&self, player_id: &str, amount: u64) -> RepoResult<u64>;

    /// Save health, coins and progress after a room exit
    async fn record_room_exit(
        &self,
        player_id: &str,
        record: RoomExitRecord,
    ) -> RepoResult<PlayerProfile>;

    async fn count(&self) -> RepoResult<usize>;
}
