//! Provider payload types (match details v4)
//!
//! Every field defaults when absent so that a partially populated payload
//! still deserializes; the engine decides per event whether the data is
//! usable.

use serde::{Deserialize, Serialize};

/// Full match payload as returned by the match-details endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMatch {
    #[serde(default, alias = "match_id")]
    pub id: String,
    #[serde(default)]
    pub metadata: RawMetadata,
    #[serde(default)]
    pub players: Vec<RawPlayer>,
    #[serde(default)]
    pub teams: Vec<RawTeam>,
    #[serde(default)]
    pub rounds: Vec<RawRound>,
    #[serde(default)]
    pub kills: Vec<RawKillEvent>,
}

impl RawMatch {
    pub fn map_name(&self) -> &str {
        &self.metadata.map.name
    }

    pub fn queue_id(&self) -> &str {
        &self.metadata.queue.id
    }

    /// Game start as provider epoch seconds
    pub fn game_start(&self) -> i64 {
        self.metadata.game_start
    }

    /// Looks up the provider's win flag for a team
    pub fn team_won(&self, team_id: &str) -> Option<bool> {
        self.teams
            .iter()
            .find(|team| team.team_id == team_id)
            .map(|team| team.won)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMetadata {
    #[serde(default)]
    pub map: NamedRef,
    #[serde(default)]
    pub queue: QueueRef,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub game_start: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamedRef {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueueRef {
    #[serde(default)]
    pub id: String,
}

/// One participant of the match with their match totals
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPlayer {
    #[serde(default)]
    pub puuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub team_id: String,
    #[serde(default)]
    pub agent: NamedRef,
    #[serde(default)]
    pub stats: RawPlayerStats,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPlayerStats {
    #[serde(default)]
    pub score: u64,
    #[serde(default)]
    pub kills: u32,
    #[serde(default)]
    pub deaths: u32,
    #[serde(default)]
    pub assists: u32,
    #[serde(default)]
    pub headshots: u32,
    #[serde(default)]
    pub bodyshots: u32,
    #[serde(default)]
    pub legshots: u32,
    #[serde(default)]
    pub damage: RawDamage,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDamage {
    #[serde(default)]
    pub dealt: u64,
    #[serde(default)]
    pub received: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTeam {
    #[serde(default)]
    pub team_id: String,
    #[serde(default)]
    pub rounds: RawTeamRounds,
    #[serde(default)]
    pub won: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTeamRounds {
    #[serde(default)]
    pub won: u32,
    #[serde(default)]
    pub lost: u32,
}

/// Player reference embedded in kills, plants and round stats
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawParticipant {
    #[serde(default)]
    pub puuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub team: String,
}

impl RawParticipant {
    pub fn new(puuid: impl Into<String>, team: impl Into<String>) -> Self {
        Self {
            puuid: puuid.into(),
            team: team.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRound {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub winning_team: String,
    #[serde(default)]
    pub plant: Option<RawPlant>,
    #[serde(default)]
    pub stats: Vec<RawRoundStat>,
}

impl RawRound {
    /// Team of the planter, when the round has a usable plant event
    pub fn planting_team(&self) -> Option<&str> {
        self.plant
            .as_ref()
            .map(|plant| plant.player.team.as_str())
            .filter(|team| !team.is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPlant {
    #[serde(default)]
    pub player: RawParticipant,
}

/// Per-round, per-player damage entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRoundStat {
    #[serde(default)]
    pub player: RawParticipant,
    #[serde(default)]
    pub stats: RawRoundStatValues,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRoundStatValues {
    #[serde(default)]
    pub damage: u64,
    #[serde(default)]
    pub kills: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawKillEvent {
    #[serde(default)]
    pub round: u32,
    #[serde(default)]
    pub time_in_round_in_ms: u64,
    #[serde(default)]
    pub killer: RawParticipant,
    #[serde(default)]
    pub victim: RawParticipant,
    #[serde(default)]
    pub assistants: Vec<RawParticipant>,
}

impl RawKillEvent {
    /// A kill needs a victim and both team ids to be attributable
    pub fn is_well_formed(&self) -> bool {
        !self.victim.puuid.is_empty() && !self.victim.team.is_empty() && !self.killer.team.is_empty()
    }
}

/// Envelope used by every provider endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub status: i64,
    pub data: Option<T>,
}
