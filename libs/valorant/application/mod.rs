//! Application Layer
//!
//! Contains the match engine and the analysis use case.
//! This layer depends on domain and infrastructure layers.

pub mod analysis;
pub mod engine;
pub mod facade;

// Re-export application facade for binaries
pub use facade::{init_logging, init_logging_with_level, AnalysisApp, AnalysisReply, SavedAnalysis};

// Re-export the analysis use case
pub use analysis::{
    canonical_target, AnalysisError, AnalysisRequest, AnalysisResult, AnalysisService, MatchSource,
};

// Re-export the engine entry points
pub use engine::{
    aggregate, process_match, Aggregator, Degradation, EngineSettings, MatchOutcome,
    MatchProcessor, MatchStage, Rejection, SharedAggregator,
};
