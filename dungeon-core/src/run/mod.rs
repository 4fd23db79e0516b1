//! Run advancement: what happens when the player walks through an exit.
//!
//! A dead player ends the run with a summary. A living player gets the
//! exited room back in its cleared form plus the next generated room.
//! Coin totals are owned by the profile store, so the caller passes the
//! up-to-date total in.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::difficulty::{difficulty_level, next_increase_in};
use crate::lifecycle::clear_room;
use crate::logging::TimingSpan;
use crate::room::{Room, RoomGenerator, RoomType};

/// Player maximum health when the client does not report one
pub const DEFAULT_MAX_HEALTH: i64 = 100;

/// Client-reported state at the moment of exiting a room
#[derive(Debug, Clone, PartialEq)]
pub struct RoomExit {
    pub player_health: i64,
    pub player_max_health: i64,
    /// Rooms cleared before the one being exited
    pub rooms_cleared: u32,
    pub current_room: Option<Room>,
    pub room_type: Option<RoomType>,
}

impl RoomExit {
    pub fn is_dead(&self) -> bool {
        self.player_health <= 0
    }

    /// Progress value stored for the player after this exit
    pub fn recorded_rooms_cleared(&self) -> u32 {
        if self.is_dead() {
            self.rooms_cleared
        } else {
            self.rooms_cleared.saturating_add(1)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameOverSummary {
    pub rooms_cleared: u32,
    pub difficulty_reached: u32,
    pub total_coins: u64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomAdvance {
    pub rooms_cleared: u32,
    pub difficulty: u32,
    pub next_increase_in: u32,
    pub player_health: i64,
    pub player_max_health: i64,
    pub total_coins: u64,
    pub cleared_room: Option<Room>,
    pub next_room: Room,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    GameOver(GameOverSummary),
    Advanced(Box<RoomAdvance>),
}

impl RunOutcome {
    pub fn is_game_over(&self) -> bool {
        matches!(self, RunOutcome::GameOver(_))
    }
}

pub fn game_over_message(difficulty: u32, rooms_cleared: u32, total_coins: u64) -> String {
    format!(
        "You died on difficulty {difficulty} after clearing {rooms_cleared} rooms with {total_coins} coins."
    )
}

/// Resolve a room exit into either a game over or the next room.
pub fn advance_run<R: Rng + ?Sized>(
    generator: &RoomGenerator,
    exit: RoomExit,
    total_coins: u64,
    rng: &mut R,
) -> RunOutcome {
    let _timing = TimingSpan::new("advance_run");
    if exit.is_dead() {
        let difficulty_reached = difficulty_level(exit.rooms_cleared);
        info!(
            rooms_cleared = exit.rooms_cleared,
            difficulty_reached, total_coins, "run ended"
        );
        return RunOutcome::GameOver(GameOverSummary {
            rooms_cleared: exit.rooms_cleared,
            difficulty_reached,
            total_coins,
            message: game_over_message(difficulty_reached, exit.rooms_cleared, total_coins),
        });
    }

    let rooms_cleared = exit.rooms_cleared.saturating_add(1);
    let cleared_room = exit.current_room.map(clear_room);
    let next_room = generator.generate(rooms_cleared, exit.room_type, rng);

    info!(
        rooms_cleared,
        next_room_type = %next_room.room_type,
        difficulty = next_room.difficulty,
        "run advanced"
    );

    RunOutcome::Advanced(Box::new(RoomAdvance {
        rooms_cleared,
        difficulty: difficulty_level(rooms_cleared),
        next_increase_in: next_increase_in(rooms_cleared),
        player_health: exit.player_health,
        player_max_health: exit.player_max_health,
        total_coins,
        cleared_room,
        next_room,
    }))
}
