//! Dungeon Crawler - Procedural Core Library
//!
//! Deterministic, I/O-free game logic for the dungeon crawler:
//! - Difficulty progression (rooms cleared -> difficulty -> parameters)
//! - Room layouts (walled grid, spawn point, two exits)
//! - Enemy rosters (grunt / brute / boss, formula stats)
//! - Room generation with the boss-room guarantee
//! - Room lifecycle (generated -> cleared)
//! - Run advancement (exit room -> next room or game over)
//!
//! Every generator takes its random source as an explicit `&mut impl Rng`,
//! so a seeded RNG reproduces output exactly.

pub mod constants;
pub mod difficulty;
pub mod enemy;
pub mod error;
pub mod layout;
pub mod lifecycle;
pub mod logging;
pub mod room;
pub mod run;

// Re-export commonly used types
pub use difficulty::{difficulty_level, next_increase_in, DifficultyParameters, InclusiveRange};
pub use enemy::{generate_enemies, pick_enemy, CombatStats, Enemy, EnemyKind};
pub use error::GenerationError;
pub use layout::{generate_layout, Point, RoomLayout, Tile, TileGrid};
pub use lifecycle::{clear_room, ensure_leavable, LifecycleError, RoomState};
pub use room::{generate_room, BossPromotion, GenerationConfig, Room, RoomGenerator, RoomType};
pub use run::{advance_run, GameOverSummary, RoomAdvance, RoomExit, RunOutcome};
