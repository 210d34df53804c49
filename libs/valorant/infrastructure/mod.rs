//! Infrastructure Layer
//!
//! Implementations of external interfaces (provider API, files, logging).
//! This layer depends on the domain layer; configuration also reads the
//! engine settings type.

pub mod client;
pub mod config;
pub mod logging;
pub mod queue;
pub mod report;
pub mod storage;

// Re-export client types
pub use client::{ClientError, HenrikClient};

// Re-export config types
pub use config::{AccountsFile, AppConfig, ConfigError, Timeframe};

// Re-export infrastructure services
pub use logging::{init_tracing, init_tracing_with_level};
pub use queue::{QueueError, RateLimitStatus, RateLimiter, RequestQueue};
pub use report::{render_console_report, render_stats_file};
pub use storage::{FileStorage, StorageError};
