//! Centralized tuning constants for the dungeon core.
//!
//! Difficulty curve, layout geometry and enemy stat formulas all read from
//! here. Per-type stat multipliers stay next to `EnemyKind` in the enemy
//! module.

// =====================================================
// Progression
// =====================================================

/// Rooms that must be cleared before difficulty rises by one
pub const ROOMS_PER_DIFFICULTY: u32 = 3;

/// Difficulty of a fresh run
pub const BASE_DIFFICULTY: u32 = 1;

// =====================================================
// Room Size
// =====================================================

/// Room edge length at difficulty 1
pub const BASE_ROOM_SIZE: u32 = 8;

/// Edge length added per difficulty level
pub const ROOM_SIZE_STEP: u32 = 2;

/// Largest room edge length
pub const MAX_ROOM_SIZE: u32 = 32;

/// Smallest edge length for which spawn and exits stay off the corners
pub const MIN_LAYOUT_SIZE: u32 = 3;

// =====================================================
// Enemy Count & Level
// =====================================================

/// Minimum roster size at difficulty 1
pub const BASE_ENEMY_COUNT: u32 = 1;

/// Cap on the lower bound of the roster size
pub const MAX_ENEMY_COUNT_MIN: u32 = 8;

/// Width of the roster size range (max = min + spread)
pub const ENEMY_COUNT_SPREAD: u32 = 2;

/// Cap on the upper bound of the roster size
pub const MAX_ENEMY_COUNT: u32 = 12;

/// Width of the enemy level range (max = difficulty + spread)
pub const ENEMY_LEVEL_SPREAD: u32 = 2;

// =====================================================
// Room Chances
// =====================================================

/// Boss room chance gained every two difficulty levels
pub const BOSS_CHANCE_STEP: f64 = 0.05;

/// Boss room chance ceiling
pub const MAX_BOSS_CHANCE: f64 = 0.60;

/// Locked room chance at difficulty 1
pub const BASE_LOCKED_CHANCE: f64 = 0.10;

/// Locked room chance gained per difficulty level
pub const LOCKED_CHANCE_STEP: f64 = 0.05;

/// Locked room chance ceiling
pub const MAX_LOCKED_CHANCE: f64 = 0.80;

// =====================================================
// Enemy Stat Formulas
// =====================================================
// stat = BASE + level * PER_LEVEL + difficulty * PER_DIFFICULTY

pub const HEALTH_BASE: u64 = 30;
pub const HEALTH_PER_LEVEL: u64 = 15;
pub const HEALTH_PER_DIFFICULTY: u64 = 5;

pub const ATTACK_BASE: u64 = 5;
pub const ATTACK_PER_LEVEL: u64 = 3;
pub const ATTACK_PER_DIFFICULTY: u64 = 2;

pub const DEFENSE_BASE: u64 = 2;
pub const DEFENSE_PER_LEVEL: u64 = 2;
pub const DEFENSE_PER_DIFFICULTY: u64 = 1;

pub const COINS_PER_LEVEL: u64 = 10;
pub const COINS_PER_DIFFICULTY: u64 = 5;

/// Inclusive enemy speed range
pub const MIN_ENEMY_SPEED: u32 = 3;
pub const MAX_ENEMY_SPEED: u32 = 10;

// =====================================================
// Pool Thresholds
// =====================================================

/// Highest difficulty that only spawns grunts
pub const GRUNT_ONLY_MAX_DIFFICULTY: u32 = 2;

/// Highest difficulty before bosses join the pool
pub const NO_BOSS_MAX_DIFFICULTY: u32 = 5;
