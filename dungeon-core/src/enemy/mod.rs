//! Enemy roster generation.
//!
//! Three enemy kinds, unlocked progressively by difficulty:
//! - grunt: standard enemy, low stats, low coins (d1+)
//! - brute: tougher, more coins (d3+)
//! - boss:  rare, very high stats, big coin reward (d6+)
//!
//! Stats come from a level/difficulty formula scaled by a per-kind
//! multiplier. The only reward for a kill is `coin_reward`.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::difficulty::DifficultyParameters;

/// Enemy kind, serialized under the `type` key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    #[default]
    Grunt,
    Brute,
    Boss,
}

/// Per-kind stat scaling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatMultipliers {
    pub health: f64,
    pub attack: f64,
    pub defense: f64,
    pub coins: f64,
}

impl EnemyKind {
    pub fn multipliers(self) -> StatMultipliers {
        match self {
            EnemyKind::Grunt => StatMultipliers {
                health: 1.0,
                attack: 1.0,
                defense: 1.0,
                coins: 1.0,
            },
            EnemyKind::Brute => StatMultipliers {
                health: 2.0,
                attack: 1.5,
                defense: 1.5,
                coins: 2.0,
            },
            EnemyKind::Boss => StatMultipliers {
                health: 3.0,
                attack: 2.0,
                defense: 1.5,
                coins: 3.0,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EnemyKind::Grunt => "grunt",
            EnemyKind::Brute => "brute",
            EnemyKind::Boss => "boss",
        }
    }
}

// Duplicate entries weight the draw.
const EARLY_POOL: &[EnemyKind] = &[EnemyKind::Grunt];
const MID_POOL: &[EnemyKind] = &[EnemyKind::Grunt, EnemyKind::Grunt, EnemyKind::Brute];
const LATE_POOL: &[EnemyKind] = &[
    EnemyKind::Grunt,
    EnemyKind::Brute,
    EnemyKind::Brute,
    EnemyKind::Boss,
];

/// Weighted kind pool available at a difficulty
pub fn kind_pool(difficulty: u32) -> &'static [EnemyKind] {
    if difficulty <= GRUNT_ONLY_MAX_DIFFICULTY {
        EARLY_POOL
    } else if difficulty <= NO_BOSS_MAX_DIFFICULTY {
        MID_POOL
    } else {
        LATE_POOL
    }
}

/// Health, attack, defense and coin reward of one enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombatStats {
    pub health: u64,
    pub attack: u64,
    pub defense: u64,
    pub coin_reward: u64,
}

impl CombatStats {
    /// Unscaled stats for an enemy of `level` at `difficulty`
    pub fn base(level: u32, difficulty: u32) -> Self {
        let level = u64::from(level);
        let d = u64::from(difficulty);
        Self {
            health: HEALTH_BASE + level * HEALTH_PER_LEVEL + d * HEALTH_PER_DIFFICULTY,
            attack: ATTACK_BASE + level * ATTACK_PER_LEVEL + d * ATTACK_PER_DIFFICULTY,
            defense: DEFENSE_BASE + level * DEFENSE_PER_LEVEL + d * DEFENSE_PER_DIFFICULTY,
            coin_reward: level * COINS_PER_LEVEL + d * COINS_PER_DIFFICULTY,
        }
    }

    /// Apply a multiplier set, truncating toward zero
    pub fn scaled(self, m: StatMultipliers) -> Self {
        Self {
            health: scale(self.health, m.health),
            attack: scale(self.attack, m.attack),
            defense: scale(self.defense, m.defense),
            coin_reward: scale(self.coin_reward, m.coins),
        }
    }
}

fn scale(value: u64, multiplier: f64) -> u64 {
    (value as f64 * multiplier) as u64
}

/// One combatant in a room roster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Enemy {
    /// `r{room}_e{index}`, unique within its room
    pub id: String,
    #[serde(rename = "type")]
    pub kind: EnemyKind,
    pub level: u32,
    pub is_boss: bool,
    /// Set by the client when the enemy is killed, never by the generator
    pub is_dead: bool,
    pub health: u64,
    pub max_health: u64,
    pub attack: u64,
    pub defense: u64,
    pub speed: u32,
    pub coin_reward: u64,
}

impl Enemy {
    pub fn enemy_id(room_number: u32, index: usize) -> String {
        format!("r{room_number}_e{index}")
    }

    pub fn stats(&self) -> CombatStats {
        CombatStats {
            health: self.health,
            attack: self.attack,
            defense: self.defense,
            coin_reward: self.coin_reward,
        }
    }

    /// Overwrite combat stats, resetting `max_health` to the new health
    pub fn set_stats(&mut self, stats: CombatStats) {
        self.health = stats.health;
        self.max_health = stats.health;
        self.attack = stats.attack;
        self.defense = stats.defense;
        self.coin_reward = stats.coin_reward;
    }

    /// Change kind, keeping `is_boss` in sync
    pub fn set_kind(&mut self, kind: EnemyKind) {
        self.kind = kind;
        self.is_boss = kind == EnemyKind::Boss;
    }
}

/// Roll a full roster for one room.
///
/// Roster size is drawn first, then level, kind and speed for each enemy in
/// order. An empty roster is valid when the count range allows zero.
pub fn generate_enemies<R: Rng + ?Sized>(
    params: &DifficultyParameters,
    room_number: u32,
    rng: &mut R,
) -> Vec<Enemy> {
    let d = params.difficulty;
    let count = rng.gen_range(params.enemy_count_range.min..=params.enemy_count_range.max);
    let pool = kind_pool(d);

    (0..count as usize)
        .map(|i| {
            let level =
                rng.gen_range(params.enemy_level_range.min..=params.enemy_level_range.max);
            let kind = pool.choose(rng).copied().unwrap_or_default();
            let stats = CombatStats::base(level, d).scaled(kind.multipliers());
            let speed = rng.gen_range(MIN_ENEMY_SPEED..=MAX_ENEMY_SPEED);

            let mut enemy = Enemy {
                id: Enemy::enemy_id(room_number, i),
                level,
                speed,
                ..Enemy::default()
            };
            enemy.set_kind(kind);
            enemy.set_stats(stats);
            enemy
        })
        .collect()
}

/// Roll a fresh roster and return one of its members at random
pub fn pick_enemy<R: Rng + ?Sized>(
    params: &DifficultyParameters,
    room_number: u32,
    rng: &mut R,
) -> Option<Enemy> {
    let mut roster = generate_enemies(params, room_number, rng);
    if roster.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..roster.len());
    Some(roster.swap_remove(index))
}
