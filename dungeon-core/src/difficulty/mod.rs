//! Difficulty progression.
//!
//! Difficulty is a plain number starting at 1 that rises by one every
//! [`ROOMS_PER_DIFFICULTY`] cleared rooms, with no ceiling. Every other
//! generation knob is derived from it by [`DifficultyParameters::for_difficulty`].
//!
//! ```text
//! rooms_cleared 0-2 -> difficulty 1
//! rooms_cleared 3-5 -> difficulty 2
//! rooms_cleared 6-8 -> difficulty 3
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Difficulty reached after `rooms_cleared` rooms.
pub fn difficulty_level(rooms_cleared: u32) -> u32 {
    rooms_cleared / ROOMS_PER_DIFFICULTY + BASE_DIFFICULTY
}

/// Rooms left to clear before the next difficulty increase (1..=3).
pub fn next_increase_in(rooms_cleared: u32) -> u32 {
    ROOMS_PER_DIFFICULTY - (rooms_cleared % ROOMS_PER_DIFFICULTY)
}

/// Inclusive integer range used for roster size and enemy levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InclusiveRange {
    pub min: u32,
    pub max: u32,
}

impl InclusiveRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Generation parameters derived from a difficulty level.
///
/// Recomputed on every call, never stored. Every field is monotonic
/// non-decreasing in `difficulty` and clamps at its cap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyParameters {
    pub difficulty: u32,
    /// Room edge length in tiles, 8 at d1, +2 per level, max 32
    pub room_size: u32,
    /// (1,3) at d1, grows every 2 levels, max (8,12)
    pub enemy_count_range: InclusiveRange,
    /// min = d, max = d + 2
    pub enemy_level_range: InclusiveRange,
    /// 0% at d1, +5% every 2 levels, max 60%
    pub boss_chance: f64,
    /// 10% at d1, +5% per level, max 80%
    pub locked_chance: f64,
}

impl DifficultyParameters {
    /// Derive parameters for a difficulty level. A difficulty of 0 is treated as 1.
    pub fn for_difficulty(difficulty: u32) -> Self {
        let d = difficulty.max(BASE_DIFFICULTY);
        let steps = d - BASE_DIFFICULTY;
        let half_steps = steps / 2;

        let room_size = steps
            .saturating_mul(ROOM_SIZE_STEP)
            .saturating_add(BASE_ROOM_SIZE)
            .min(MAX_ROOM_SIZE);

        let count_min = half_steps
            .saturating_add(BASE_ENEMY_COUNT)
            .min(MAX_ENEMY_COUNT_MIN);
        let count_max = (count_min + ENEMY_COUNT_SPREAD).min(MAX_ENEMY_COUNT);

        let level_min = d.max(1);
        let level_max = d.saturating_add(ENEMY_LEVEL_SPREAD).max(1);

        let boss_chance = (half_steps as f64 * BOSS_CHANCE_STEP).min(MAX_BOSS_CHANCE);
        let locked_chance =
            (BASE_LOCKED_CHANCE + steps as f64 * LOCKED_CHANCE_STEP).min(MAX_LOCKED_CHANCE);

        Self {
            difficulty: d,
            room_size,
            enemy_count_range: InclusiveRange::new(count_min, count_max),
            enemy_level_range: InclusiveRange::new(level_min, level_max),
            boss_chance,
            locked_chance,
        }
    }

    /// Parameters for the room that follows `rooms_cleared` cleared rooms
    pub fn for_rooms_cleared(rooms_cleared: u32) -> Self {
        Self::for_difficulty(difficulty_level(rooms_cleared))
    }
}
