//! Server configuration
//!
//! Layered in order: built-in defaults, then an optional RON file named by
//! `DUNGEON_CONFIG`, then individual environment overrides:
//!
//! | variable | field |
//! |----------|-------|
//! | `API_HOST` | `host` |
//! | `API_PORT` | `port` |
//! | `DUNGEON_RNG_SEED` | `rng_seed` |
//! | `DUNGEON_BOSS_PROMOTION` | `boss_promotion` (`compound` / `rebase`) |
//!
//! ```ron
//! (
//!     port: 9000,
//!     rng_seed: 42,
//!     boss_promotion: rebase,
//!     logging: (default_level: debug),
//! )
//! ```

use dungeon_core::logging::TracingConfig;
use dungeon_core::{BossPromotion, GenerationConfig};
use ron::Options;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_PATH_VAR: &str = "DUNGEON_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("invalid value '{value}' for {var}")]
    InvalidEnv { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Base seed for per-request RNGs; OS entropy when unset
    pub rng_seed: Option<u64>,
    pub boss_promotion: BossPromotion,
    pub logging: TracingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            rng_seed: None,
            boss_promotion: BossPromotion::Compound,
            logging: TracingConfig::default(),
        }
    }
}

fn ron_options() -> Options {
    Options::default().with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
}

impl ServerConfig {
    /// Load from the process environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|var| std::env::var(var).ok())
    }

    /// Load using `lookup` in place of the process environment
    pub fn load_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(CONFIG_PATH_VAR) {
            Some(path) if !path.trim().is_empty() => Self::from_file(path.trim())?,
            _ => Self::default(),
        };
        config.apply_env(lookup)?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        ron_options()
            .from_str(&contents)
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("API_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("API_PORT") {
            self.port = parse_env("API_PORT", &port)?;
        }
        if let Some(seed) = lookup("DUNGEON_RNG_SEED") {
            self.rng_seed = Some(parse_env("DUNGEON_RNG_SEED", &seed)?);
        }
        if let Some(policy) = lookup("DUNGEON_BOSS_PROMOTION") {
            self.boss_promotion = match policy.trim().to_ascii_lowercase().as_str() {
                "compound" => BossPromotion::Compound,
                "rebase" => BossPromotion::Rebase,
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        var: "DUNGEON_BOSS_PROMOTION",
                        value: policy,
                    })
                }
            };
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn generation(&self) -> GenerationConfig {
        GenerationConfig {
            boss_promotion: self.boss_promotion,
        }
    }
}

fn parse_env<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        var,
        value: value.to_string(),
    })
}
