//! Scripted Run Simulator
//!
//! Plays complete runs against a live server the way the game client does:
//! load the entrance, kill every enemy, take damage, leave the room, ask for
//! the next room, and repeat until the player dies.
//!
//! Usage:
//!   cargo run --release --bin run_sim -- --url http://localhost:8000 --runs 20 --seed 7
//!
//! Damage is drawn from a seeded RNG, so the client side of a run is
//! reproducible. Room contents depend on the server's own seed.

use anyhow::{bail, Context};
use dungeon_core::run::DEFAULT_MAX_HEALTH;
use dungeon_core::{Enemy, Room};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use dungeon_test_client::{parse_num_arg, parse_str_arg, DEFAULT_URL};

/// Flat defense the simulated player subtracts from every hit
const PLAYER_DEFENSE: u64 = 8;

// ============================================================================
// Response shapes
// ============================================================================

#[derive(Debug, Deserialize)]
struct KillResponse {
    total_coins: u64,
}

#[derive(Debug, Deserialize)]
struct LeaveResponse {
    cleared_room: Room,
}

#[derive(Debug, Deserialize)]
struct NextRoomResponse {
    game_over: bool,
    rooms_cleared: u32,
    total_coins: u64,
    #[serde(default)]
    difficulty_reached: Option<u32>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    next_room: Option<Room>,
}

#[derive(Debug)]
struct RunResult {
    player_id: String,
    rooms_cleared: u32,
    difficulty_reached: u32,
    total_coins: u64,
    enemies_killed: u64,
    bosses_killed: u64,
    requests: u64,
    duration: Duration,
    message: String,
}

// ============================================================================
// Simulation
// ============================================================================

struct Simulator {
    client: Client,
    base_url: String,
    max_rooms: u32,
}

impl Simulator {
    async fn call<T: for<'de> Deserialize<'de>>(
        &self,
        player_id: &str,
        path: &str,
        body: Option<Value>,
    ) -> anyhow::Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let request = match body {
            Some(body) => self.client.post(&url).json(&body),
            None => self.client.get(&url),
        };
        let resp = request
            .header("x-player-id", player_id)
            .send()
            .await
            .with_context(|| format!("request to {path} failed"))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            bail!("{path} returned HTTP {status}: {text}");
        }
        resp.json()
            .await
            .with_context(|| format!("unexpected response body from {path}"))
    }

    /// Damage the player takes while fighting one enemy
    fn damage_from(enemy: &Enemy, rng: &mut impl Rng) -> i64 {
        let hits = rng.gen_range(0..=2u64);
        let per_hit = enemy.attack.saturating_sub(PLAYER_DEFENSE).max(1);
        i64::try_from(hits * per_hit).unwrap_or(i64::MAX)
    }

    async fn play_run(&self, run: u32, rng: &mut Xoshiro256PlusPlus) -> anyhow::Result<RunResult> {
        let player_id = format!("sim-{run}");
        let started = Instant::now();
        let mut requests = 0u64;
        let mut enemies_killed = 0u64;
        let mut bosses_killed = 0u64;

        let mut health = DEFAULT_MAX_HEALTH;
        let mut rooms_cleared = 0u32;
        let mut room: Room = self
            .call(&player_id, "/generate/room/?rooms_cleared=0", None)
            .await?;
        requests += 1;

        loop {
            for i in 0..room.enemies.len() {
                if health <= 0 {
                    break;
                }
                let enemy = &room.enemies[i];
                let kill: KillResponse = self
                    .call(
                        &player_id,
                        "/generate/kill-enemy/",
                        Some(json!({"enemy_id": enemy.id, "coin_reward": enemy.coin_reward})),
                    )
                    .await?;
                requests += 1;

                health -= Self::damage_from(enemy, rng);
                enemies_killed += 1;
                bosses_killed += u64::from(enemy.is_boss);
                debug!(%player_id, enemy = %enemy.id, health, total_coins = kill.total_coins, "enemy killed");
                room.enemies[i].is_dead = true;
            }

            let current_room = if health > 0 {
                let left: LeaveResponse = self
                    .call(
                        &player_id,
                        "/generate/leave-room/",
                        Some(json!({"room": room})),
                    )
                    .await?;
                requests += 1;
                Some(left.cleared_room)
            } else {
                None
            };

            // Kill rewards are already banked, so no coins_earned here
            let next: NextRoomResponse = self
                .call(
                    &player_id,
                    "/generate/next-room/",
                    Some(json!({
                        "player_health": health,
                        "player_max_health": DEFAULT_MAX_HEALTH,
                        "rooms_cleared": rooms_cleared,
                        "coins_earned": 0,
                        "current_room": current_room,
                    })),
                )
                .await?;
            requests += 1;

            if next.game_over {
                return Ok(RunResult {
                    player_id,
                    rooms_cleared: next.rooms_cleared,
                    difficulty_reached: next.difficulty_reached.unwrap_or_default(),
                    total_coins: next.total_coins,
                    enemies_killed,
                    bosses_killed,
                    requests,
                    duration: started.elapsed(),
                    message: next.message.unwrap_or_default(),
                });
            }

            rooms_cleared = next.rooms_cleared;
            let Some(next_room) = next.next_room else {
                bail!("next-room response without a next_room");
            };
            room = next_room;

            if rooms_cleared >= self.max_rooms {
                // Force the run to end so a tanky seed cannot loop forever
                health = 0;
            }
        }
    }
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dungeon_core::logging::init_tracing_default();

    let args: Vec<String> = std::env::args().collect();
    let base_url = parse_str_arg(&args, "--url").unwrap_or_else(|| DEFAULT_URL.into());
    let runs: u32 = parse_num_arg(&args, "--runs").unwrap_or(10);
    let seed: u64 = parse_num_arg(&args, "--seed").unwrap_or(42);
    let max_rooms: u32 = parse_num_arg(&args, "--max-rooms").unwrap_or(500);

    println!("=== Dungeon Run Simulator ===");
    println!("  Target:    {}", base_url);
    println!("  Runs:      {}", runs);
    println!("  Seed:      {}", seed);
    println!("  Max rooms: {}", max_rooms);
    println!();

    let client = Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .context("failed to create HTTP client")?;
    let sim = Simulator {
        client,
        base_url,
        max_rooms,
    };

    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut results = Vec::with_capacity(runs as usize);
    for run in 0..runs {
        let result = sim
            .play_run(run, &mut rng)
            .await
            .with_context(|| format!("run {run} failed"))?;
        info!(
            player = %result.player_id,
            rooms = result.rooms_cleared,
            coins = result.total_coins,
            "run finished"
        );
        results.push(result);
    }

    println!(
        "{:<10} {:>6} {:>6} {:>8} {:>6} {:>6} {:>6} {:>9}",
        "Player", "Rooms", "Diff", "Coins", "Kills", "Bosses", "Reqs", "Time(ms)"
    );
    println!("{}", "-".repeat(66));
    for r in &results {
        println!(
            "{:<10} {:>6} {:>6} {:>8} {:>6} {:>6} {:>6} {:>9.1}",
            r.player_id,
            r.rooms_cleared,
            r.difficulty_reached,
            r.total_coins,
            r.enemies_killed,
            r.bosses_killed,
            r.requests,
            r.duration.as_secs_f64() * 1000.0,
        );
    }
    println!("{}", "-".repeat(66));

    if results.is_empty() {
        return Ok(());
    }
    let n = results.len() as f64;
    let mean_rooms = results.iter().map(|r| r.rooms_cleared as f64).sum::<f64>() / n;
    let mean_coins = results.iter().map(|r| r.total_coins as f64).sum::<f64>() / n;
    let best = results.iter().max_by_key(|r| r.rooms_cleared);
    let total_requests: u64 = results.iter().map(|r| r.requests).sum();

    println!("\n=== Aggregate ===");
    println!("  Mean rooms cleared: {:.1}", mean_rooms);
    println!("  Mean coins:         {:.1}", mean_coins);
    println!("  Total requests:     {}", total_requests);
    if let Some(best) = best {
        println!("  Best run:           {} ({})", best.player_id, best.message);
    }
    Ok(())
}
