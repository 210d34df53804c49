//! Analysis use case
//!
//! Lists an account's recent matches, fetches their details with a bounded
//! number of requests in flight, runs each through the match processor and
//! folds the accepted ones for the account's player.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::engine::{Aggregator, MatchOutcome, MatchProcessor, SharedAggregator};
use crate::domain::{account_key, IdentityMap, PerMatchStats, PlayerStats, RawMatch};
use crate::infrastructure::client::{ClientError, HenrikClient};
use crate::infrastructure::queue::QueueError;

/// Where match lists and match details come from
#[async_trait]
pub trait MatchSource: Send + Sync {
    /// Match IDs of an account, most recent first
    async fn fetch_match_ids(
        &self,
        name: &str,
        tag: &str,
        queue_mode: &str,
    ) -> std::result::Result<Vec<String>, ClientError>;

    async fn fetch_match(&self, match_id: &str) -> std::result::Result<RawMatch, ClientError>;
}

#[async_trait]
impl MatchSource for HenrikClient {
    async fn fetch_match_ids(
        &self,
        name: &str,
        tag: &str,
        queue_mode: &str,
    ) -> std::result::Result<Vec<String>, ClientError> {
        self.get_match_ids(name, tag, queue_mode).await
    }

    async fn fetch_match(&self, match_id: &str) -> std::result::Result<RawMatch, ClientError> {
        self.get_match(match_id).await
    }
}

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Failed to list matches for {account}: {source}")]
    MatchList {
        account: String,
        #[source]
        source: ClientError,
    },

    #[error("No matches found for {0}")]
    NoMatches(String),

    #[error(transparent)]
    Queue(#[from] QueueError),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

/// One account to analyze
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub player_name: String,
    pub player_tag: String,
    pub queue_mode: String,
    pub max_games: usize,
}

impl AnalysisRequest {
    pub fn new(player_name: impl Into<String>, player_tag: impl Into<String>) -> Self {
        Self {
            player_name: player_name.into(),
            player_tag: player_tag.into(),
            queue_mode: "competitive".to_string(),
            max_games: 35,
        }
    }

    pub fn with_queue_mode(mut self, queue_mode: impl Into<String>) -> Self {
        self.queue_mode = queue_mode.into();
        self
    }

    pub fn with_max_games(mut self, max_games: usize) -> Self {
        self.max_games = max_games;
        self
    }

    pub fn account(&self) -> String {
        account_key(&self.player_name, &self.player_tag)
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub player_name: String,
    pub player_tag: String,
    pub stats: PlayerStats,
    /// Accepted matches, most recent first
    pub matches: Vec<PerMatchStats>,
    pub rejected: usize,
    pub failed: usize,
    pub timestamp: DateTime<Utc>,
}

/// Canonical player behind an account; the account name when untracked
pub fn canonical_target(identities: &IdentityMap, name: &str, tag: &str) -> String {
    identities
        .resolve(name, tag)
        .map(str::to_string)
        .unwrap_or_else(|| name.to_string())
}

enum Fetched {
    Accepted(PerMatchStats),
    Rejected,
    Failed,
}

pub struct AnalysisService {
    source: Arc<dyn MatchSource>,
    processor: MatchProcessor,
    batch_size: usize,
}

impl AnalysisService {
    pub fn new(source: Arc<dyn MatchSource>, processor: MatchProcessor, batch_size: usize) -> Self {
        Self {
            source,
            processor,
            batch_size: batch_size.max(1),
        }
    }

    pub fn processor(&self) -> &MatchProcessor {
        &self.processor
    }

    pub fn target_for(&self, name: &str, tag: &str) -> String {
        canonical_target(self.processor.identities(), name, tag)
    }

    pub async fn run(&self, request: AnalysisRequest) -> Result<AnalysisResult> {
        let account = request.account();
        let mut ids = self
            .source
            .fetch_match_ids(&request.player_name, &request.player_tag, &request.queue_mode)
            .await
            .map_err(|source| AnalysisError::MatchList {
                account: account.clone(),
                source,
            })?;

        if ids.is_empty() {
            return Err(AnalysisError::NoMatches(account));
        }
        ids.truncate(request.max_games);

        let target = self.target_for(&request.player_name, &request.player_tag);
        info!("Processing {} matches for {} ({})", ids.len(), account, target);

        let total = ids.len();
        let aggregator = SharedAggregator::new(Aggregator::new(target.clone(), [target.clone()]));

        let fetched: Vec<Fetched> = stream::iter(ids.into_iter().enumerate())
            .map(|(index, match_id)| {
                let aggregator = aggregator.clone();
                async move {
                    if index % 10 == 0 {
                        info!("  Progress: {}/{}", index, total);
                    }
                    self.fetch_and_process(&match_id, &aggregator).await
                }
            })
            .buffered(self.batch_size)
            .collect()
            .await;

        let mut matches = Vec::with_capacity(fetched.len());
        let mut rejected = 0;
        let mut failed = 0;
        for outcome in fetched {
            match outcome {
                Fetched::Accepted(stats) => matches.push(stats),
                Fetched::Rejected => rejected += 1,
                Fetched::Failed => failed += 1,
            }
        }

        info!(
            "Analysis of {} done: {} accepted, {} rejected, {} failed",
            account,
            matches.len(),
            rejected,
            failed
        );

        Ok(AnalysisResult {
            player_name: request.player_name,
            player_tag: request.player_tag,
            stats: aggregator.snapshot(),
            matches,
            rejected,
            failed,
            timestamp: Utc::now(),
        })
    }

    async fn fetch_and_process(&self, match_id: &str, aggregator: &SharedAggregator) -> Fetched {
        let raw = match self.source.fetch_match(match_id).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Skipping match {}: {}", match_id, e);
                return Fetched::Failed;
            }
        };

        match self.processor.process(&raw) {
            MatchOutcome::Complete {
                stats,
                degradations,
            } => {
                for degradation in &degradations {
                    debug!(match_id, ?degradation, "Match processed with degradation");
                }
                aggregator.fold(&stats);
                Fetched::Accepted(stats)
            }
            MatchOutcome::Rejected(_) => Fetched::Rejected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = AnalysisRequest::new("Rosarino", "CARC")
            .with_queue_mode("unrated")
            .with_max_games(10);
        assert_eq!(request.account(), "Rosarino#CARC");
        assert_eq!(request.queue_mode, "unrated");
        assert_eq!(request.max_games, 10);
    }

    #[test]
    fn test_canonical_target() {
        let identities = IdentityMap::from_accounts([("matutEv#2003", "Dxy")]);
        assert_eq!(canonical_target(&identities, "matutEv", "2003"), "Dxy");
        assert_eq!(canonical_target(&identities, "matutEv", "9999"), "matutEv");
    }
}
