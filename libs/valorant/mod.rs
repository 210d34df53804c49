//! Valorant stack analytics
//!
//! Turns raw match telemetry into per-player statistics for a fixed group
//! of players (the stack), possibly spread over several accounts each.

pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used items
pub use application::{
    aggregate, init_logging, init_logging_with_level, process_match, AnalysisApp, AnalysisError,
    AnalysisRequest, AnalysisResult, AnalysisService, EngineSettings, MatchOutcome,
    MatchProcessor, MatchSource,
};
pub use domain::{IdentityMap, PerMatchStats, PlayerMatchStats, PlayerStats, RawMatch};
pub use infrastructure::{AppConfig, ConfigError, FileStorage, HenrikClient, RateLimiter};
