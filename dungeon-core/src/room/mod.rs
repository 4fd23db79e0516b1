//! Room generation.
//!
//! Composes the difficulty model, the enemy roster and the layout into one
//! room value. The only content rule layered on top is the boss guarantee:
//! a `boss_room` always holds at least one boss.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::difficulty::{difficulty_level, next_increase_in, DifficultyParameters};
use crate::enemy::{generate_enemies, CombatStats, Enemy, EnemyKind};
use crate::error::GenerationError;
use crate::layout::{carve_layout, RoomLayout};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    #[default]
    Entrance,
    Corridor,
    Chamber,
    BossRoom,
}

impl RoomType {
    pub const ALL: [RoomType; 4] = [
        RoomType::Entrance,
        RoomType::Corridor,
        RoomType::Chamber,
        RoomType::BossRoom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RoomType::Entrance => "entrance",
            RoomType::Corridor => "corridor",
            RoomType::Chamber => "chamber",
            RoomType::BossRoom => "boss_room",
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomType {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoomType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| GenerationError::UnknownRoomType(s.to_string()))
    }
}

/// One generated dungeon room, ready to hand to a client
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Room {
    /// Rooms cleared before this one was generated
    pub room_number: u32,
    #[serde(rename = "type")]
    pub room_type: RoomType,
    pub difficulty: u32,
    /// Rooms left until difficulty rises (1..=3)
    pub next_increase_in: u32,
    pub width: u32,
    pub height: u32,
    pub is_locked: bool,
    pub is_cleared: bool,
    pub layout: RoomLayout,
    pub enemies: Vec<Enemy>,
    pub enemy_count: usize,
    pub enemies_alive: usize,
    pub has_boss: bool,
    pub total_coins_available: u64,
}

/// How the boss guarantee rescales the enemy it converts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BossPromotion {
    /// Multiply the enemy's current, already kind-scaled stats by the boss
    /// multiplier. Matches the output of existing clients and saved rooms.
    #[default]
    Compound,
    /// Recompute from base stats with the boss multiplier applied once
    Rebase,
}

/// Tunables for room generation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub boss_promotion: BossPromotion,
}

/// Stateless room generator; holds configuration only
#[derive(Debug, Clone, Copy, Default)]
pub struct RoomGenerator {
    config: GenerationConfig,
}

impl RoomGenerator {
    pub fn new(config: GenerationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Generate the room that follows `rooms_cleared` cleared rooms.
    ///
    /// When `room_type` is `None` the type is rolled: the first room is
    /// always the entrance, later rooms become boss rooms with the
    /// difficulty's boss chance and otherwise a corridor or chamber.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        rooms_cleared: u32,
        room_type: Option<RoomType>,
        rng: &mut R,
    ) -> Room {
        let difficulty = difficulty_level(rooms_cleared);
        let params = DifficultyParameters::for_difficulty(difficulty);

        let room_type = room_type.unwrap_or_else(|| roll_room_type(rooms_cleared, &params, rng));

        let mut enemies = generate_enemies(&params, rooms_cleared, rng);
        if room_type == RoomType::BossRoom {
            self.enforce_boss_guarantee(&mut enemies, &params);
        }

        let layout = carve_layout(params.room_size);
        let locked_roll = rng.gen::<f64>() < params.locked_chance;
        let is_locked = locked_roll && rooms_cleared > 0;

        let has_boss = enemies.iter().any(|e| e.is_boss);
        let total_coins_available = enemies.iter().map(|e| e.coin_reward).sum();

        debug!(
            room_number = rooms_cleared,
            room_type = %room_type,
            difficulty,
            enemies = enemies.len(),
            has_boss,
            is_locked,
            "room generated"
        );

        Room {
            room_number: rooms_cleared,
            room_type,
            difficulty,
            next_increase_in: next_increase_in(rooms_cleared),
            width: params.room_size,
            height: params.room_size,
            is_locked,
            is_cleared: false,
            layout,
            enemy_count: enemies.len(),
            enemies_alive: enemies.len(),
            enemies,
            has_boss,
            total_coins_available,
        }
    }

    /// Repair a boss room roster that rolled no boss by promoting the first
    /// enemy. Rosters that already hold a boss are left untouched.
    pub fn enforce_boss_guarantee(&self, enemies: &mut [Enemy], params: &DifficultyParameters) {
        if enemies.iter().any(|e| e.is_boss) {
            return;
        }
        let Some(first) = enemies.first_mut() else {
            return;
        };

        let boss = EnemyKind::Boss.multipliers();
        let stats = match self.config.boss_promotion {
            BossPromotion::Compound => first.stats().scaled(boss),
            BossPromotion::Rebase => CombatStats::base(first.level, params.difficulty).scaled(boss),
        };
        trace!(enemy = %first.id, from = first.kind.as_str(), "promoting enemy to boss");
        first.set_kind(EnemyKind::Boss);
        first.set_stats(stats);
    }
}

fn roll_room_type<R: Rng + ?Sized>(
    rooms_cleared: u32,
    params: &DifficultyParameters,
    rng: &mut R,
) -> RoomType {
    if rooms_cleared == 0 {
        RoomType::Entrance
    } else if rng.gen::<f64>() < params.boss_chance {
        RoomType::BossRoom
    } else if rng.gen_bool(0.5) {
        RoomType::Corridor
    } else {
        RoomType::Chamber
    }
}

/// Generate a room with the default [`GenerationConfig`]
pub fn generate_room<R: Rng + ?Sized>(
    rooms_cleared: u32,
    room_type: Option<RoomType>,
    rng: &mut R,
) -> Room {
    RoomGenerator::default().generate(rooms_cleared, room_type, rng)
}
