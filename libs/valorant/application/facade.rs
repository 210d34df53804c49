//! Application Facade
//!
//! Public API for binaries (presentation layer).
//! Wires configuration, HTTP client, rate limiter, request queue and
//! storage together.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::analysis::{canonical_target, AnalysisRequest, AnalysisResult, AnalysisService, MatchSource};
use super::engine::{aggregate, MatchProcessor};
use crate::domain::{PerMatchStats, PlayerStats};
use crate::infrastructure::{
    init_tracing, init_tracing_with_level, AppConfig, FileStorage, HenrikClient, RateLimitStatus,
    RateLimiter, RequestQueue,
};

/// Initialize logging for binaries
pub fn init_logging() {
    init_tracing();
}

/// Initialize logging at the given level
pub fn init_logging_with_level(level: &str) {
    init_tracing_with_level(level);
}

/// Result type handed back by queue workers
pub type AnalysisReply = super::analysis::Result<AnalysisResult>;

/// Queue capacity for pending analysis requests
const QUEUE_CAPACITY: usize = 100;

/// Saved-data analysis for one player
#[derive(Debug, Clone)]
pub struct SavedAnalysis {
    pub stats: PlayerStats,
    /// Matches inside the configured timeframe
    pub matches: Vec<PerMatchStats>,
}

/// Application facade for the update and analyze commands
pub struct AnalysisApp {
    pub config: AppConfig,
    pub storage: FileStorage,
    limiter: Arc<RateLimiter>,
    service: Arc<AnalysisService>,
    queue: RequestQueue<AnalysisRequest, AnalysisReply>,
}

impl AnalysisApp {
    /// Build the app against the provider API and start the queue workers
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let limiter = Arc::new(RateLimiter::new(config.max_requests_per_minute));
        let client = HenrikClient::new(
            config.api_key.clone(),
            config.region.clone(),
            config.request_timeout,
            config.max_retries,
        )?
        .with_rate_limiter(Arc::clone(&limiter));

        Ok(Self::with_source(config, Arc::new(client), limiter))
    }

    /// Build the app over any match source
    pub fn with_source(config: AppConfig, source: Arc<dyn MatchSource>, limiter: Arc<RateLimiter>) -> Self {
        let processor = MatchProcessor::new(Arc::new(config.identities.clone()), config.engine_settings());
        let service = Arc::new(AnalysisService::new(source, processor, config.batch_size));
        let storage = FileStorage::new(&config.match_data_file, &config.stats_output_file);

        let queue = RequestQueue::new(QUEUE_CAPACITY, Arc::clone(&limiter), config.batch_size);
        let worker_service = Arc::clone(&service);
        queue.start_workers(config.workers, move |request: AnalysisRequest| {
            let service = Arc::clone(&worker_service);
            async move { service.run(request).await }
        });

        Self {
            config,
            storage,
            limiter,
            service,
            queue,
        }
    }

    /// Request for the configured main account, or `name#tag`
    pub fn request_for(&self, account: Option<(&str, &str)>) -> AnalysisRequest {
        let (name, tag) = account.unwrap_or((
            self.config.main_player_name.as_str(),
            self.config.main_player_tag.as_str(),
        ));
        AnalysisRequest::new(name, tag)
            .with_queue_mode(self.config.queue_mode.clone())
            .with_max_games(self.config.max_games)
    }

    /// Fetch fresh matches through the queue and save them
    pub async fn update(&self, request: AnalysisRequest) -> anyhow::Result<AnalysisResult> {
        info!("Fetching matches for {}", request.account());
        let result = self.queue.submit(request).await??;
        self.storage.save_matches(&result.matches)?;
        Ok(result)
    }

    /// Aggregate saved matches for the account's player within the
    /// configured timeframe and write the stats file. `None` when nothing
    /// has been saved yet.
    pub fn analyze_saved(&self, name: &str, tag: &str) -> anyhow::Result<Option<SavedAnalysis>> {
        let saved = self.storage.load_matches()?;
        if saved.is_empty() {
            return Ok(None);
        }

        let now = Utc::now();
        let matches: Vec<PerMatchStats> = saved
            .into_iter()
            .filter(|played| self.config.timeframe.includes(played, now))
            .collect();

        let target = canonical_target(&self.config.identities, name, tag);
        let stats = aggregate(&matches, &[target]);
        if stats.total_games == 0 {
            warn!("No saved matches include {}", stats.name);
        }

        self.storage.save_stats(&stats)?;
        Ok(Some(SavedAnalysis { stats, matches }))
    }

    pub fn service(&self) -> &AnalysisService {
        &self.service
    }

    pub fn rate_limit_status(&self) -> RateLimitStatus {
        self.queue.status()
    }

    pub fn max_requests_per_minute(&self) -> usize {
        self.limiter.max_requests()
    }

    pub fn queue_size(&self) -> usize {
        self.queue.queue_size()
    }

    /// Stop the queue and wait for in-flight requests
    pub async fn shutdown(&self) {
        self.queue.stop().await;
    }
}
