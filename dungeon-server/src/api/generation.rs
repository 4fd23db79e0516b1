//! Generation endpoints: rooms, enemies and the room-to-room game loop
//!
//! Endpoints:
//! - GET  /generate/room/        Generate a room (preview / testing)
//! - POST /generate/next-room/   Exit the current room, get the next one
//! - POST /generate/kill-enemy/  Award the coins for a kill
//! - POST /generate/leave-room/  Clear a room without generating the next
//! - GET  /generate/enemy/       Generate a single enemy (preview / testing)

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    routing::{get, post},
    Json, Router,
};
use dungeon_core::run::DEFAULT_MAX_HEALTH;
use dungeon_core::{
    advance_run, clear_room, ensure_leavable, pick_enemy, DifficultyParameters, Enemy,
    GameOverSummary, Room, RoomAdvance, RoomExit, RoomType, RunOutcome,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::atomic::Ordering;
use tracing::debug;

use super::error::ApiError;
use super::validation::{
    as_int, as_non_negative, as_rooms_cleared, field, json_object, query_params,
    rooms_cleared_param, PlayerId,
};
use super::ApiState;
use crate::storage::RoomExitRecord;

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/generate/room/", get(generate_room))
        .route("/generate/next-room/", post(next_room))
        .route("/generate/kill-enemy/", post(kill_enemy))
        .route("/generate/leave-room/", post(leave_room))
        .route("/generate/enemy/", get(generate_enemy))
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct RoomQuery {
    pub rooms_cleared: Option<String>,
    pub room_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EnemyQuery {
    pub rooms_cleared: Option<String>,
}

#[derive(Serialize)]
pub struct GameOverResponse {
    pub game_over: bool,
    #[serde(flatten)]
    pub summary: GameOverSummary,
}

#[derive(Serialize)]
pub struct NextRoomResponse {
    pub game_over: bool,
    #[serde(flatten)]
    pub advance: RoomAdvance,
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum RunResponse {
    GameOver(GameOverResponse),
    NextRoom(Box<NextRoomResponse>),
}

impl From<RunOutcome> for RunResponse {
    fn from(outcome: RunOutcome) -> Self {
        match outcome {
            RunOutcome::GameOver(summary) => RunResponse::GameOver(GameOverResponse {
                game_over: true,
                summary,
            }),
            RunOutcome::Advanced(advance) => RunResponse::NextRoom(Box::new(NextRoomResponse {
                game_over: false,
                advance: *advance,
            })),
        }
    }
}

#[derive(Serialize)]
pub struct KillEnemyResponse {
    pub enemy_id: Value,
    pub coins_earned: u64,
    pub total_coins: u64,
}

#[derive(Serialize)]
pub struct LeaveRoomResponse {
    pub cleared_room: Room,
}

#[derive(Serialize)]
pub struct EnemyResponse {
    pub difficulty: u32,
    pub enemy: Option<Enemy>,
}

// ============================================================================
// Parsing helpers
// ============================================================================

/// Optional room type; absent, null or empty means "roll one"
fn parse_room_type(raw: Option<&str>) -> Result<Option<RoomType>, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(name) => Ok(Some(name.parse()?)),
    }
}

fn room_type_field(body: &Map<String, Value>) -> Result<Option<RoomType>, ApiError> {
    match field(body, "room_type") {
        None => Ok(None),
        Some(Value::String(s)) => parse_room_type(Some(s.as_str())),
        Some(_) => Err(ApiError::validation("room_type must be a string.")),
    }
}

/// A room sent back by the client. Empty objects count as "no room".
fn room_field(body: &Map<String, Value>, key: &str) -> Result<Option<Room>, ApiError> {
    let invalid = || ApiError::validation(format!("{key} must be a valid room object."));
    match field(body, key) {
        None => Ok(None),
        Some(Value::Object(map)) if map.is_empty() => Ok(None),
        Some(value @ Value::Object(_)) => Room::deserialize(value)
            .map(Some)
            .map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}

/// Enemies in a raw client room not marked `is_dead: true`
fn raw_living_enemies(body: &Map<String, Value>, key: &str) -> usize {
    field(body, key)
        .and_then(|room| room.get("enemies"))
        .and_then(Value::as_array)
        .map_or(0, |enemies| {
            enemies
                .iter()
                .filter(|e| e.get("is_dead") != Some(&Value::Bool(true)))
                .count()
        })
}

fn parse_room_exit(body: &Map<String, Value>) -> Result<(RoomExit, u64), ApiError> {
    let (Some(health), Some(rooms_cleared)) =
        (field(body, "player_health"), field(body, "rooms_cleared"))
    else {
        return Err(ApiError::validation(
            "player_health and rooms_cleared are required.",
        ));
    };

    let numeric = || ApiError::validation("All numeric fields must be valid integers.");
    let player_health = as_int(health).ok_or_else(numeric)?;
    let rooms_cleared = as_rooms_cleared(rooms_cleared).ok_or_else(numeric)?;
    let player_max_health = match field(body, "player_max_health") {
        Some(v) => as_int(v).ok_or_else(numeric)?,
        None => DEFAULT_MAX_HEALTH,
    };
    let coins_earned = match field(body, "coins_earned") {
        Some(v) => as_non_negative(v).ok_or_else(numeric)?,
        None => 0,
    };

    let exit = RoomExit {
        player_health,
        player_max_health,
        rooms_cleared,
        current_room: room_field(body, "current_room")?,
        room_type: room_type_field(body)?,
    };
    Ok((exit, coins_earned))
}

// ============================================================================
// Handlers
// ============================================================================

async fn generate_room(
    State(state): State<ApiState>,
    query: Result<Query<RoomQuery>, QueryRejection>,
) -> Result<Json<Room>, ApiError> {
    let query = query_params(query)?;
    let rooms_cleared = rooms_cleared_param(query.rooms_cleared.as_deref())?;
    let room_type = parse_room_type(query.room_type.as_deref())?;

    let mut rng = state.rng.fork();
    let room = state.generator.generate(rooms_cleared, room_type, &mut rng);
    state.metrics.rooms_generated.fetch_add(1, Ordering::Relaxed);

    Ok(Json(room))
}

async fn next_room(
    State(state): State<ApiState>,
    PlayerId(player_id): PlayerId,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<RunResponse>, ApiError> {
    let body = json_object(body)?;
    let (exit, coins_earned) = parse_room_exit(&body)?;

    let record = RoomExitRecord {
        health: exit.player_health,
        coins_earned,
        rooms_cleared: exit.recorded_rooms_cleared(),
    };
    let profile = state
        .profiles
        .record_room_exit(&player_id, record)
        .await
        .map_err(ApiError::storage)?;

    let mut rng = state.rng.fork();
    let outcome = advance_run(&state.generator, exit, profile.coins, &mut rng);

    if outcome.is_game_over() {
        state.metrics.game_overs.fetch_add(1, Ordering::Relaxed);
    } else {
        state.metrics.rooms_cleared.fetch_add(1, Ordering::Relaxed);
        state.metrics.rooms_generated.fetch_add(1, Ordering::Relaxed);
    }

    Ok(Json(outcome.into()))
}

async fn kill_enemy(
    State(state): State<ApiState>,
    PlayerId(player_id): PlayerId,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<KillEnemyResponse>, ApiError> {
    let body = json_object(body)?;
    let (Some(enemy_id), Some(coin_reward)) = (field(&body, "enemy_id"), field(&body, "coin_reward"))
    else {
        return Err(ApiError::validation("enemy_id and coin_reward are required."));
    };
    let coin_reward = as_non_negative(coin_reward)
        .ok_or_else(|| ApiError::validation("coin_reward must be a non-negative integer."))?;

    let total_coins = state
        .profiles
        .award_coins(&player_id, coin_reward)
        .await
        .map_err(ApiError::storage)?;
    state.metrics.enemies_killed.fetch_add(1, Ordering::Relaxed);
    state
        .metrics
        .coins_awarded
        .fetch_add(coin_reward, Ordering::Relaxed);

    debug!(%player_id, %enemy_id, coin_reward, total_coins, "enemy killed");
    Ok(Json(KillEnemyResponse {
        enemy_id: enemy_id.clone(),
        coins_earned: coin_reward,
        total_coins,
    }))
}

async fn leave_room(
    State(state): State<ApiState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<LeaveRoomResponse>, ApiError> {
    let body = json_object(body)?;
    // Counted on the raw value: rooms that fail the typed parse still report living enemies
    match raw_living_enemies(&body, "room") {
        0 => {}
        enemies_alive => return Err(ApiError::EnemiesAlive { enemies_alive }),
    }
    let room = room_field(&body, "room")?
        .ok_or_else(|| ApiError::validation("room must be a valid room object."))?;

    ensure_leavable(&room)?;
    state.metrics.rooms_cleared.fetch_add(1, Ordering::Relaxed);

    Ok(Json(LeaveRoomResponse {
        cleared_room: clear_room(room),
    }))
}

async fn generate_enemy(
    State(state): State<ApiState>,
    query: Result<Query<EnemyQuery>, QueryRejection>,
) -> Result<Json<EnemyResponse>, ApiError> {
    let query = query_params(query)?;
    let rooms_cleared = rooms_cleared_param(query.rooms_cleared.as_deref())?;
    let params = DifficultyParameters::for_rooms_cleared(rooms_cleared);

    let mut rng = state.rng.fork();
    let enemy = pick_enemy(&params, rooms_cleared, &mut rng);

    Ok(Json(EnemyResponse {
        difficulty: params.difficulty,
        enemy,
    }))
}
