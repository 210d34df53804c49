//! Match engine
//!
//! Pure transforms over one match: each stage reads the same immutable
//! `RoundTimeline` and the processor composes them into a `PerMatchStats`.
//! Nothing here blocks or keeps state between matches.

pub mod aggregator;
pub mod clutch;
pub mod kast;
pub mod multikill;
pub mod processor;
pub mod sides;
pub mod timeline;
pub mod trades;

pub use aggregator::{aggregate, Aggregator, SharedAggregator};
pub use clutch::detect_clutches;
pub use kast::{count_first_bloods, count_kast_rounds, OpeningDuels};
pub use multikill::count_multi_kills;
pub use processor::{
    process_match, Degradation, EngineSettings, MatchOutcome, MatchProcessor, MatchStage,
    Rejection, DEFAULT_MIN_TRACKED_PLAYERS, DEFAULT_TRADE_WINDOW_MS,
};
pub use sides::{
    attacking_team_by_round, attribute_sides, infer_first_attacking_team, match_team_ids,
    side_by_round_index, SideAttribution, SideSkip, SideSplit,
};
pub use timeline::{build_timeline, TimelineBuild};
pub use trades::{detect_trades, TradeFlags};
