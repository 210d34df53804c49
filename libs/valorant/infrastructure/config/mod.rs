//! Configuration
//!
//! Settings come from the environment (a `.env` file is honoured); the
//! account map comes from a YAML file listing each real player's accounts.

pub mod accounts;

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;

use crate::application::engine::EngineSettings;
use crate::domain::{IdentityMap, PerMatchStats};

pub use accounts::AccountsFile;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Environment variable not found: {0}")]
    EnvVarMissing(String),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

const VALID_LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Window of matches taken into account by the analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timeframe {
    #[default]
    All,
    LastDays(u32),
}

impl Timeframe {
    /// Earliest game start still inside the window
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Timeframe::All => None,
            Timeframe::LastDays(days) => Some(now - chrono::Duration::days(i64::from(*days))),
        }
    }

    pub fn includes(&self, stats: &PerMatchStats, now: DateTime<Utc>) -> bool {
        match self.cutoff(now) {
            None => true,
            Some(cutoff) => stats.played_at().is_some_and(|played| played >= cutoff),
        }
    }
}

impl FromStr for Timeframe {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self> {
        let value = value.trim().to_lowercase();
        if value == "all" {
            return Ok(Timeframe::All);
        }
        value
            .strip_suffix('d')
            .and_then(|days| days.parse::<u32>().ok())
            .filter(|days| *days > 0)
            .map(Timeframe::LastDays)
            .ok_or_else(|| {
                ConfigError::ValidationError(format!(
                    "timeframe must be 'all' or '<N>d', got '{}'",
                    value
                ))
            })
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Timeframe::All => write!(f, "all"),
            Timeframe::LastDays(days) => write!(f, "{}d", days),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub region: String,
    pub request_timeout: Duration,
    pub max_retries: u32,

    pub max_requests_per_minute: usize,
    pub batch_size: usize,
    pub workers: usize,

    pub main_player_name: String,
    pub main_player_tag: String,
    pub min_stack_players: usize,

    pub queue_mode: String,
    pub max_games: usize,
    pub trade_window_ms: u64,
    pub recent_matches_to_show: usize,
    pub timeframe: Timeframe,

    pub stats_output_file: PathBuf,
    pub match_data_file: PathBuf,
    pub accounts_file: PathBuf,
    pub log_level: String,

    /// Account map loaded from `accounts_file`
    pub identities: IdentityMap,
}

impl AppConfig {
    /// Load from the process environment, then the accounts file
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` for variable values
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::settings_from_lookup(&lookup)?;
        config.identities = AccountsFile::load(&config.accounts_file)?.into_identity_map()?;
        config.validate()?;
        Ok(config)
    }

    /// Read every variable without touching the filesystem
    pub fn settings_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| -> String {
            lookup(key)
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let api_key = var("VALO_API_KEY", "");
        if api_key.is_empty() {
            return Err(ConfigError::EnvVarMissing("VALO_API_KEY".to_string()));
        }

        Ok(Self {
            api_key,
            region: var("VALO_REGION", "na"),
            request_timeout: parse_duration(&var("VALO_REQUEST_TIMEOUT", "12s"))
                .unwrap_or(Duration::from_secs(12)),
            max_retries: var("VALO_MAX_RETRIES", "3").parse().unwrap_or(3),
            max_requests_per_minute: var("VALO_MAX_REQUESTS_PER_MINUTE", "30").parse().unwrap_or(30),
            batch_size: var("VALO_BATCH_SIZE", "5").parse().unwrap_or(5),
            workers: var("VALO_WORKERS", "3").parse().unwrap_or(3),
            main_player_name: var("VALO_MAIN_PLAYER_NAME", "Rosarino"),
            main_player_tag: var("VALO_MAIN_PLAYER_TAG", "CARC"),
            min_stack_players: var("VALO_MIN_STACK_PLAYERS", "4").parse().unwrap_or(4),
            queue_mode: var("VALO_QUEUE_MODE", "competitive"),
            max_games: var("VALO_MAX_GAMES", "35").parse().unwrap_or(35),
            trade_window_ms: var("VALO_TRADE_WINDOW_MS", "5000").parse().unwrap_or(5000),
            recent_matches_to_show: var("VALO_RECENT_MATCHES_TO_SHOW", "35").parse().unwrap_or(35),
            timeframe: var("VALO_TIMEFRAME", "all").parse()?,
            stats_output_file: PathBuf::from(var("VALO_STATS_OUTPUT_FILE", "stats.txt")),
            match_data_file: PathBuf::from(var("VALO_MATCH_DATA_FILE", "matches.json")),
            accounts_file: PathBuf::from(var("VALO_ACCOUNTS_FILE", "config/accounts.yaml")),
            log_level: var("VALO_LOG_LEVEL", "info").to_lowercase(),
            identities: IdentityMap::new(),
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.main_player_name.is_empty() || self.main_player_tag.is_empty() {
            return Err(ConfigError::ValidationError(
                "VALO_MAIN_PLAYER_NAME and VALO_MAIN_PLAYER_TAG must be set".to_string(),
            ));
        }

        if self.identities.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "no accounts listed in {}",
                self.accounts_file.display()
            )));
        }

        if !VALID_LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "log_level must be one of: {}",
                VALID_LOG_LEVELS.join(", ")
            )));
        }

        for (name, value) in [
            ("VALO_MAX_REQUESTS_PER_MINUTE", self.max_requests_per_minute),
            ("VALO_BATCH_SIZE", self.batch_size),
            ("VALO_WORKERS", self.workers),
            ("VALO_MAX_GAMES", self.max_games),
        ] {
            if value == 0 {
                return Err(ConfigError::ValidationError(format!(
                    "{} must be greater than 0",
                    name
                )));
            }
        }

        Ok(())
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            min_tracked_players: self.min_stack_players,
            trade_window_ms: self.trade_window_ms,
        }
    }

    /// Log configuration summary
    pub fn log(&self) {
        info!("Configuration loaded:");
        info!("  Region: {}", self.region);
        info!("  Main account: {}#{}", self.main_player_name, self.main_player_tag);
        info!("  Queue mode: {}", self.queue_mode);
        info!("  Max games: {}", self.max_games);
        info!("  Min stack players: {}", self.min_stack_players);
        info!("  Trade window: {}ms", self.trade_window_ms);
        info!("  Timeframe: {}", self.timeframe);
        info!(
            "  Rate limit: {}/min, batch size {}, {} workers",
            self.max_requests_per_minute, self.batch_size, self.workers
        );
        info!(
            "  Tracked players: {} ({} accounts)",
            self.identities.canonical_names().len(),
            self.identities.len()
        );
        info!("  Log level: {}", self.log_level);
    }
}

/// Parse `500ms`, `12s`, `2m` or `1h`
pub fn parse_duration(value: &str) -> Option<Duration> {
    let value = value.trim();
    let split = value.find(|c: char| !c.is_ascii_digit())?;
    let (amount, unit) = value.split_at(split);
    let amount: u64 = amount.parse().ok()?;

    match unit {
        "ms" => Some(Duration::from_millis(amount)),
        "s" => Some(Duration::from_secs(amount)),
        "m" => amount.checked_mul(60).map(Duration::from_secs),
        "h" => amount.checked_mul(3600).map(Duration::from_secs),
        _ => None,
    }
}
