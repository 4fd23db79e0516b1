//! In-memory profile store
//!
//! Profiles live in a `parking_lot::RwLock<HashMap>` and are lost on
//! restart. Profiles are created on first write.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

use super::repository::{PlayerProfile, ProfileRepo, RepoResult, RoomExitRecord};
use super::StorageError;

#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<String, PlayerProfile>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a profile, replacing any existing one
    pub fn insert(&self, profile: PlayerProfile) {
        self.profiles
            .write()
            .insert(profile.player_id.clone(), profile);
    }

    fn add_coins(profile: &mut PlayerProfile, amount: u64) -> Result<u64, StorageError> {
        profile.coins = profile
            .coins
            .checked_add(amount)
            .ok_or_else(|| StorageError::CoinOverflow {
                player_id: profile.player_id.clone(),
                have: profile.coins,
                adding: amount,
            })?;
        profile.updated_at = Utc::now();
        Ok(profile.coins)
    }
}

#[async_trait]
impl ProfileRepo for InMemoryProfileStore {
    async fn get(&self, player_id: &str) -> RepoResult<Option<PlayerProfile>> {
        Ok(self.profiles.read().get(player_id).cloned())
    }

    async fn award_coins(&self, player_id: &str, amount: u64) -> RepoResult<u64> {
        let mut profiles = self.profiles.write();
        let profile = profiles
            .entry(player_id.to_string())
            .or_insert_with(|| PlayerProfile::new(player_id));
        let total = Self::add_coins(profile, amount)?;
        debug!(player_id, amount, total, "coins awarded");
        Ok(total)
    }

    async fn record_room_exit(
        &self,
        player_id: &str,
        record: RoomExitRecord,
    ) -> RepoResult<PlayerProfile> {
        let mut profiles = self.profiles.write();
        let profile = profiles
            .entry(player_id.to_string())
            .or_insert_with(|| PlayerProfile::new(player_id));

        Self::add_coins(profile, record.coins_earned)?;
        profile.health = record.health;
        profile.rooms_cleared = record.rooms_cleared;
        profile.high_score = profile.high_score.max(record.rooms_cleared);

        debug!(
            player_id,
            rooms_cleared = profile.rooms_cleared,
            coins = profile.coins,
            "room exit recorded"
        );
        Ok(profile.clone())
    }

    async fn count(&self) -> RepoResult<usize> {
        Ok(self.profiles.read().len())
    }
}
