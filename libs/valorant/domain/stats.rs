//! Statistics records produced by the engine
//!
//! `PerMatchStats` is created once per accepted match and never changed;
//! `PlayerStats` only ever grows through additive folding.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kills, deaths, damage and rounds played on one side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideStats {
    pub kills: u32,
    pub deaths: u32,
    pub damage: u64,
    pub rounds: u32,
}

impl SideStats {
    pub fn add(&mut self, other: &SideStats) {
        self.kills += other.kills;
        self.deaths += other.deaths;
        self.damage += other.damage;
        self.rounds += other.rounds;
    }

    pub fn is_zero(&self) -> bool {
        *self == SideStats::default()
    }
}

/// Rounds in which a player reached 2, 3, 4 or 5 kills.
///
/// Each round lands in exactly one bucket: the player's kill count that
/// round. Counts above five are kept in the five bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiKillHistogram {
    #[serde(rename = "2k")]
    pub two: u32,
    #[serde(rename = "3k")]
    pub three: u32,
    #[serde(rename = "4k")]
    pub four: u32,
    #[serde(rename = "5k")]
    pub five: u32,
}

impl MultiKillHistogram {
    /// Record one round with `kills` eliminations; below two is ignored
    pub fn record(&mut self, kills: u32) {
        match kills {
            0 | 1 => {}
            2 => self.two += 1,
            3 => self.three += 1,
            4 => self.four += 1,
            _ => self.five += 1,
        }
    }

    /// Occurrences for a bucket in `2..=5`
    pub fn get(&self, bucket: u32) -> u32 {
        match bucket {
            2 => self.two,
            3 => self.three,
            4 => self.four,
            5 => self.five,
            _ => 0,
        }
    }

    pub fn add(&mut self, other: &MultiKillHistogram) {
        self.two += other.two;
        self.three += other.three;
        self.four += other.four;
        self.five += other.five;
    }

    pub fn total(&self) -> u32 {
        self.two + self.three + self.four + self.five
    }
}

/// Fixed-schema record for one tracked player in one match.
///
/// Every tracked player in the roster gets one, zero-initialized, so the
/// per-stage figures always share the same key set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerMatchStats {
    pub team: String,
    pub agent: String,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub headshots: u32,
    pub bodyshots: u32,
    pub legshots: u32,
    pub score: u64,
    pub damage_made: u64,
    pub damage_received: u64,
    pub first_kills: u32,
    pub first_deaths: u32,
    pub kast_rounds: u32,
    pub attack: SideStats,
    pub defense: SideStats,
    pub multi_kills: MultiKillHistogram,
    pub clutches: u32,
}

/// Derived statistics for one accepted match
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerMatchStats {
    pub match_id: String,
    pub map: String,
    pub mode: String,
    /// Provider game start, epoch seconds
    pub game_start: i64,
    pub won: bool,
    pub rounds_played: u32,
    /// Canonical player name → figures
    pub players: BTreeMap<String, PlayerMatchStats>,
}

impl PerMatchStats {
    pub fn player(&self, name: &str) -> Option<&PlayerMatchStats> {
        self.players.get(name)
    }

    pub fn played_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.game_start, 0)
    }
}

/// Lifetime aggregate for one real player across their accounts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub name: String,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub headshots: u32,
    pub bodyshots: u32,
    pub legshots: u32,
    pub score: u64,
    pub wins: u32,
    pub losses: u32,
    pub total_games: u32,
    pub total_rounds: u32,
    /// Agent name → matches played on it
    pub agents: BTreeMap<String, u32>,
    pub damage_made: u64,
    pub damage_received: u64,
    pub first_kills: u32,
    pub first_deaths: u32,
    pub kast_rounds: u32,
    pub attack: SideStats,
    pub defense: SideStats,
    pub multi_kills: MultiKillHistogram,
    pub clutches: u32,
}

impl PlayerStats {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Agents ordered by matches played, most played first
    pub fn agents_by_usage(&self) -> Vec<(&str, u32)> {
        let mut agents: Vec<(&str, u32)> = self
            .agents
            .iter()
            .map(|(agent, count)| (agent.as_str(), *count))
            .collect();
        agents.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        agents
    }
}
