//! Domain Layer
//!
//! Provider payloads, engine records and statistics.
//! This layer has no dependency on application or infrastructure code.

pub mod events;
pub mod identity;
pub mod raw;
pub mod stats;

pub use events::{AliveSets, KillEvent, RoundTimeline, TeamRoster};
pub use identity::{account_key, IdentityMap, StackResolver};
pub use raw::{
    ApiEnvelope, RawKillEvent, RawMatch, RawParticipant, RawPlant, RawPlayer, RawRound,
    RawRoundStat, RawTeam,
};
pub use stats::{MultiKillHistogram, PerMatchStats, PlayerMatchStats, PlayerStats, SideStats};
