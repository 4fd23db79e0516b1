//! Storage Layer - player progress behind the repository pattern
//!
//! ```text
//! [API handlers]
//!       ↓
//! [ProfileRepo trait]
//!       ↓
//! InMemoryProfileStore (parking_lot RwLock)
//! ```

pub mod memory;
pub mod repository;

pub use memory::InMemoryProfileStore;
pub use repository::{PlayerProfile, ProfileRepo, RepoResult, RoomExitRecord};

/// Error type for profile storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Coin overflow for player {player_id}: have {have}, adding {adding}")]
    CoinOverflow {
        player_id: String,
        have: u64,
        adding: u64,
    },
}
