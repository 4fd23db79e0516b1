//! API Smoke Tests
//!
//! Drives the full router with `tower::ServiceExt::oneshot`, backed by the
//! in-memory profile store and a seeded RNG. No network or database needed.

use axum::body::Body;
use axum::Router;
use dungeon_core::RoomGenerator;
use dungeon_server::api::{self, ApiState};
use dungeon_server::{InMemoryProfileStore, ProfileRepo, RngSource};
use http::Request;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Helper: router plus a handle on its profile store
fn create_test_router(seed: u64) -> (Router, Arc<InMemoryProfileStore>) {
    let store = Arc::new(InMemoryProfileStore::new());
    let state = ApiState::new(
        store.clone(),
        RoomGenerator::default(),
        RngSource::seeded(seed),
    );
    (api::build_router(state), store)
}

async fn send(router: &Router, req: Request<Body>) -> (u16, Value) {
    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status().as_u16();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

async fn get(router: &Router, uri: &str) -> (u16, Value) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(router, req).await
}

async fn post(router: &Router, uri: &str, body: Value) -> (u16, Value) {
    post_as(router, uri, None, body).await
}

async fn post_as(router: &Router, uri: &str, player: Option<&str>, body: Value) -> (u16, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(player) = player {
        builder = builder.header("x-player-id", player);
    }
    let req = builder.body(Body::from(body.to_string())).unwrap();
    send(router, req).await
}

// ============================================================================
// Health & Metrics
// ============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (router, _store) = create_test_router(1);
    let (status, json) = get(&router, "/health").await;
    assert_eq!(status, 200);
    assert_eq!(json["status"], "ok");
    assert!(!json["version"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_metrics_count_requests_and_kills() {
    let (router, _store) = create_test_router(1);
    get(&router, "/generate/room/").await;
    post(
        &router,
        "/generate/kill-enemy/",
        json!({"enemy_id": "r0_e0", "coin_reward": 40}),
    )
    .await;
    get(&router, "/generate/room/?rooms_cleared=-1").await;

    let (status, json) = get(&router, "/metrics/json").await;
    assert_eq!(status, 200);
    assert_eq!(json["total_requests"], 3);
    assert_eq!(json["total_errors"], 1);
    assert_eq!(json["rooms_generated"], 1);
    assert_eq!(json["enemies_killed"], 1);
    assert_eq!(json["coins_awarded"], 40);
    assert_eq!(json["profiles"], 1);
    assert_eq!(json["rng_forks"], 1);

    let req = Request::builder()
        .uri("/metrics")
        .body(Body::empty())
        .unwrap();
    let resp = router.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), 200);
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("dungeon_enemies_killed_total 1"));
}

// ============================================================================
// GET /generate/room/
// ============================================================================

#[tokio::test]
async fn test_first_room_is_entrance() {
    let (router, _store) = create_test_router(7);
    let (status, room) = get(&router, "/generate/room/").await;
    assert_eq!(status, 200);

    assert_eq!(room["room_number"], 0);
    assert_eq!(room["type"], "entrance");
    assert_eq!(room["difficulty"], 1);
    assert_eq!(room["next_increase_in"], 3);
    assert_eq!(room["is_locked"], false);
    assert_eq!(room["is_cleared"], false);
    assert_eq!(room["width"], 8);
    assert_eq!(room["height"], 8);

    let tiles = room["layout"]["tiles"].as_array().unwrap();
    assert_eq!(tiles.len(), 8);
    assert!(tiles.iter().all(|row| row.as_array().unwrap().len() == 8));
    assert_eq!(room["layout"]["exits_open"], false);
    assert_eq!(room["layout"]["exit_points"].as_array().unwrap().len(), 2);

    let enemies = room["enemies"].as_array().unwrap();
    assert_eq!(room["enemy_count"], enemies.len());
    assert_eq!(room["enemies_alive"], enemies.len());
    let coins: u64 = enemies
        .iter()
        .map(|e| e["coin_reward"].as_u64().unwrap())
        .sum();
    assert_eq!(room["total_coins_available"], coins);
}

#[tokio::test]
async fn test_requested_boss_room_has_boss() {
    let (router, _store) = create_test_router(7);
    for rooms in [0, 4, 6, 30] {
        let uri = format!("/generate/room/?rooms_cleared={rooms}&room_type=boss_room");
        let (status, room) = get(&router, &uri).await;
        assert_eq!(status, 200);
        assert_eq!(room["type"], "boss_room");
        assert_eq!(room["has_boss"], true);
        assert!(room["enemies"]
            .as_array()
            .unwrap()
            .iter()
            .any(|e| e["is_boss"] == true && e["type"] == "boss"));
    }
}

#[tokio::test]
async fn test_room_difficulty_follows_progress() {
    let (router, _store) = create_test_router(7);
    let (_, room) = get(&router, "/generate/room/?rooms_cleared=6").await;
    assert_eq!(room["difficulty"], 3);
    assert_eq!(room["width"], 12);
    assert_eq!(room["room_number"], 6);
}

#[tokio::test]
async fn test_empty_room_type_is_ignored() {
    let (router, _store) = create_test_router(7);
    let (status, room) = get(&router, "/generate/room/?room_type=").await;
    assert_eq!(status, 200);
    assert_eq!(room["type"], "entrance");
}

#[tokio::test]
async fn test_room_rejects_bad_progress() {
    let (router, _store) = create_test_router(7);
    for uri in [
        "/generate/room/?rooms_cleared=-1",
        "/generate/room/?rooms_cleared=abc",
        "/generate/room/?rooms_cleared=2.5",
    ] {
        let (status, json) = get(&router, uri).await;
        assert_eq!(status, 400, "{uri}");
        assert_eq!(json["error"], "rooms_cleared must be a non-negative integer.");
    }
}

#[tokio::test]
async fn test_rejected_query_strings_are_json_errors() {
    let (router, _store) = create_test_router(7);
    for uri in [
        "/generate/room/?rooms_cleared=1&rooms_cleared=2",
        "/generate/room/?room_type=boss_room&room_type=enemy_room",
        "/generate/enemy/?rooms_cleared=1&rooms_cleared=2",
    ] {
        let (status, json) = get(&router, uri).await;
        assert_eq!(status, 400, "{uri}");
        let error = json["error"].as_str().unwrap();
        assert!(error.starts_with("Invalid query string"), "{uri}: {error}");
    }
}

#[tokio::test]
async fn test_room_rejects_unknown_type() {
    let (router, _store) = create_test_router(7);
    let (status, json) = get(&router, "/generate/room/?room_type=vault").await;
    assert_eq!(status, 400);
    assert!(json["error"].as_str().unwrap().contains("vault"));
}

#[tokio::test]
async fn test_seeded_servers_are_deterministic() {
    let (router1, _s1) = create_test_router(42);
    let (router2, _s2) = create_test_router(42);

    for _ in 0..3 {
        let (_, a) = get(&router1, "/generate/room/?rooms_cleared=20").await;
        let (_, b) = get(&router2, "/generate/room/?rooms_cleared=20").await;
        assert_eq!(a, b);
    }
}

// ============================================================================
// GET /generate/enemy/
// ============================================================================

#[tokio::test]
async fn test_single_enemy() {
    let (router, _store) = create_test_router(3);
    let (status, json) = get(&router, "/generate/enemy/?rooms_cleared=9").await;
    assert_eq!(status, 200);
    assert_eq!(json["difficulty"], 4);

    let enemy = &json["enemy"];
    assert!(["grunt", "brute"].contains(&enemy["type"].as_str().unwrap()));
    assert_eq!(enemy["health"], enemy["max_health"]);
    assert_eq!(enemy["is_dead"], false);
    assert!(enemy["id"].as_str().unwrap().starts_with("r9_e"));
}

#[tokio::test]
async fn test_single_enemy_rejects_negative_progress() {
    let (router, _store) = create_test_router(3);
    let (status, json) = get(&router, "/generate/enemy/?rooms_cleared=-4").await;
    assert_eq!(status, 400);
    assert_eq!(json["error"], "rooms_cleared must be a non-negative integer.");
}

// ============================================================================
// POST /generate/leave-room/
// ============================================================================

#[tokio::test]
async fn test_leave_room_blocked_by_living_enemy() {
    let (router, _store) = create_test_router(1);
    let (status, json) = post(
        &router,
        "/generate/leave-room/",
        json!({"room": {"enemies": [{"is_dead": false}]}}),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(json["enemies_alive"], 1);
    assert!(json["error"].as_str().unwrap().contains("still alive"));
}

#[tokio::test]
async fn test_leave_room_counts_living_enemies_in_odd_rooms() {
    let (router, _store) = create_test_router(1);
    let (status, json) = post(
        &router,
        "/generate/leave-room/",
        json!({"room": {"enemies": [
            {"is_dead": false, "type": "enemy"},
            {"is_dead": true, "type": "enemy"},
            {"level": "high"},
        ]}}),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(json["enemies_alive"], 2);
    assert!(json["error"].as_str().unwrap().contains("still alive"));
}

#[tokio::test]
async fn test_leave_room_with_all_enemies_dead() {
    let (router, _store) = create_test_router(1);
    let (status, json) = post(
        &router,
        "/generate/leave-room/",
        json!({"room": {"room_number": 3, "enemies": [{"is_dead": true}, {"is_dead": true}]}}),
    )
    .await;
    assert_eq!(status, 200);

    let cleared = &json["cleared_room"];
    assert_eq!(cleared["enemies_alive"], 0);
    assert_eq!(cleared["enemy_count"], 0);
    assert_eq!(cleared["is_cleared"], true);
    assert_eq!(cleared["has_boss"], false);
    assert_eq!(cleared["room_number"], 3);
    assert_eq!(cleared["layout"]["exits_open"], true);
    assert!(cleared["enemies"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_leave_generated_room_after_kills() {
    let (router, _store) = create_test_router(5);
    let (_, mut room) = get(&router, "/generate/room/?rooms_cleared=12").await;
    let alive = room["enemies"].as_array().unwrap().len();

    let (status, json) = post(&router, "/generate/leave-room/", json!({"room": room.clone()})).await;
    assert_eq!(status, 400);
    assert_eq!(json["enemies_alive"], alive);

    for enemy in room["enemies"].as_array_mut().unwrap() {
        enemy["is_dead"] = json!(true);
    }
    let (status, json) = post(&router, "/generate/leave-room/", json!({"room": room.clone()})).await;
    assert_eq!(status, 200);
    assert_eq!(json["cleared_room"]["layout"]["tiles"], room["layout"]["tiles"]);
}

#[tokio::test]
async fn test_leave_room_requires_room_object() {
    let (router, _store) = create_test_router(1);
    for body in [json!({}), json!({"room": "kitchen"}), json!({"room": {}})] {
        let (status, json) = post(&router, "/generate/leave-room/", body).await;
        assert_eq!(status, 400);
        assert_eq!(json["error"], "room must be a valid room object.");
    }
}

// ============================================================================
// POST /generate/kill-enemy/
// ============================================================================

#[tokio::test]
async fn test_kill_enemy_accumulates_per_player() {
    let (router, store) = create_test_router(1);

    let (status, json) = post_as(
        &router,
        "/generate/kill-enemy/",
        Some("alice"),
        json!({"enemy_id": "r3_e1", "coin_reward": 45}),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(json["enemy_id"], "r3_e1");
    assert_eq!(json["coins_earned"], 45);
    assert_eq!(json["total_coins"], 45);

    let (_, json) = post_as(
        &router,
        "/generate/kill-enemy/",
        Some("alice"),
        json!({"enemy_id": "r3_e2", "coin_reward": "55"}),
    )
    .await;
    assert_eq!(json["coins_earned"], 55);
    assert_eq!(json["total_coins"], 100);

    let (_, json) = post(
        &router,
        "/generate/kill-enemy/",
        json!({"enemy_id": "r0_e0", "coin_reward": 10}),
    )
    .await;
    assert_eq!(json["total_coins"], 10);

    assert_eq!(store.get("alice").await.unwrap().unwrap().coins, 100);
    assert_eq!(store.get("guest").await.unwrap().unwrap().coins, 10);
}

#[tokio::test]
async fn test_kill_enemy_validation() {
    let (router, _store) = create_test_router(1);

    let (status, json) = post(&router, "/generate/kill-enemy/", json!({"enemy_id": "r0_e0"})).await;
    assert_eq!(status, 400);
    assert_eq!(json["error"], "enemy_id and coin_reward are required.");

    for reward in [json!(-5), json!("many"), json!(1.5)] {
        let (status, json) = post(
            &router,
            "/generate/kill-enemy/",
            json!({"enemy_id": "r0_e0", "coin_reward": reward}),
        )
        .await;
        assert_eq!(status, 400);
        assert_eq!(json["error"], "coin_reward must be a non-negative integer.");
    }
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let (router, _store) = create_test_router(1);
    let req = Request::builder()
        .method("POST")
        .uri("/generate/kill-enemy/")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, json) = send(&router, req).await;
    assert_eq!(status, 400);
    assert!(json["error"].is_string());

    let req = Request::builder()
        .method("POST")
        .uri("/generate/next-room/")
        .body(Body::from(r#"{"player_health": 1, "rooms_cleared": 0}"#))
        .unwrap();
    let (status, json) = send(&router, req).await;
    assert_eq!(status, 400);
    assert!(json["error"].is_string());
}

// ============================================================================
// POST /generate/next-room/
// ============================================================================

#[tokio::test]
async fn test_next_room_advances_living_player() {
    let (router, store) = create_test_router(11);
    let (_, current) = get(&router, "/generate/room/?rooms_cleared=5").await;

    let (status, json) = post_as(
        &router,
        "/generate/next-room/",
        Some("runner"),
        json!({
            "player_health": 75,
            "rooms_cleared": 5,
            "coins_earned": 120,
            "current_room": current,
        }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(json["game_over"], false);
    assert_eq!(json["rooms_cleared"], 6);
    assert_eq!(json["difficulty"], 3);
    assert_eq!(json["next_increase_in"], 3);
    assert_eq!(json["player_health"], 75);
    assert_eq!(json["player_max_health"], 100);
    assert_eq!(json["total_coins"], 120);

    assert_eq!(json["cleared_room"]["is_cleared"], true);
    assert_eq!(json["cleared_room"]["enemies_alive"], 0);
    assert_eq!(json["cleared_room"]["room_number"], 5);

    let next = &json["next_room"];
    assert_eq!(next["room_number"], 6);
    assert_eq!(next["difficulty"], 3);
    assert_eq!(next["is_cleared"], false);
    assert_eq!(next["layout"]["exits_open"], false);

    let profile = store.get("runner").await.unwrap().unwrap();
    assert_eq!(profile.rooms_cleared, 6);
    assert_eq!(profile.health, 75);
    assert_eq!(profile.high_score, 6);
}

#[tokio::test]
async fn test_next_room_without_current_room() {
    let (router, _store) = create_test_router(11);
    let (status, json) = post(
        &router,
        "/generate/next-room/",
        json!({"player_health": "40", "player_max_health": "120", "rooms_cleared": "0", "room_type": "boss_room"}),
    )
    .await;
    assert_eq!(status, 200);
    assert!(json["cleared_room"].is_null());
    assert_eq!(json["player_max_health"], 120);
    assert_eq!(json["next_room"]["type"], "boss_room");
    assert_eq!(json["next_room"]["has_boss"], true);
}

#[tokio::test]
async fn test_next_room_game_over() {
    let (router, store) = create_test_router(11);
    post_as(
        &router,
        "/generate/kill-enemy/",
        Some("doomed"),
        json!({"enemy_id": "r4_e0", "coin_reward": 300}),
    )
    .await;

    let (status, json) = post_as(
        &router,
        "/generate/next-room/",
        Some("doomed"),
        json!({"player_health": 0, "rooms_cleared": 5, "coins_earned": 50}),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(json["game_over"], true);
    assert_eq!(json["rooms_cleared"], 5);
    assert_eq!(json["difficulty_reached"], 2);
    assert_eq!(json["total_coins"], 350);
    assert_eq!(
        json["message"],
        "You died on difficulty 2 after clearing 5 rooms with 350 coins."
    );
    assert!(json.get("next_room").is_none());

    let profile = store.get("doomed").await.unwrap().unwrap();
    assert_eq!(profile.health, 0);
    assert_eq!(profile.rooms_cleared, 5);
}

#[tokio::test]
async fn test_next_room_validation() {
    let (router, _store) = create_test_router(11);

    let (status, json) = post(&router, "/generate/next-room/", json!({"player_health": 50})).await;
    assert_eq!(status, 400);
    assert_eq!(json["error"], "player_health and rooms_cleared are required.");

    for body in [
        json!({"player_health": "lots", "rooms_cleared": 2}),
        json!({"player_health": 50, "rooms_cleared": -2}),
        json!({"player_health": 50, "rooms_cleared": 2, "coins_earned": "x"}),
    ] {
        let (status, json) = post(&router, "/generate/next-room/", body).await;
        assert_eq!(status, 400);
        assert_eq!(json["error"], "All numeric fields must be valid integers.");
    }

    let (status, json) = post(
        &router,
        "/generate/next-room/",
        json!({"player_health": 50, "rooms_cleared": 2, "current_room": [1, 2]}),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(json["error"], "current_room must be a valid room object.");

    let (status, _) = post(
        &router,
        "/generate/next-room/",
        json!({"player_health": 50, "rooms_cleared": 2, "room_type": "vault"}),
    )
    .await;
    assert_eq!(status, 400);
}
