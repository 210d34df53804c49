//! Match processor
//!
//! Runs the engine stages over one raw match and produces its
//! `PerMatchStats`, or rejects the match when too few stack players took
//! part. Processing is pure: nothing is retained between calls, so one
//! processor can be shared by any number of concurrent workers.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use super::clutch::detect_clutches;
use super::kast::{count_first_bloods, count_kast_rounds};
use super::multikill::count_multi_kills;
use super::sides::{attribute_sides, SideSkip};
use super::timeline::build_timeline;
use super::trades::detect_trades;
use crate::domain::{
    IdentityMap, PerMatchStats, PlayerMatchStats, RawMatch, StackResolver, TeamRoster,
};

/// Default minimum number of stack players for a match to count
pub const DEFAULT_MIN_TRACKED_PLAYERS: usize = 4;

/// Default trade window in milliseconds
pub const DEFAULT_TRADE_WINDOW_MS: u64 = 5000;

/// Tunables for match processing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    pub min_tracked_players: usize,
    pub trade_window_ms: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            min_tracked_players: DEFAULT_MIN_TRACKED_PLAYERS,
            trade_window_ms: DEFAULT_TRADE_WINDOW_MS,
        }
    }
}

/// Lifecycle of a match inside the processor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStage {
    Fetched,
    Filtered,
    Resolved,
    Attributed,
    Complete,
    Rejected,
}

/// Why a match was dropped. Expected filtering, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    InsufficientTrackedPlayers { found: usize, required: usize },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::InsufficientTrackedPlayers { found, required } => write!(
                f,
                "only {} stack players present ({} required)",
                found, required
            ),
        }
    }
}

/// Non-fatal conditions met while processing an accepted match
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Degradation {
    /// Kill events with a killer or victim outside the stack
    UnresolvedIdentity { events: usize },
    /// Kill events dropped for missing victim or team ids
    MalformedEvent { events: usize },
    /// No round carried a plant; side figures stay at zero
    NoPlantEvidence,
    /// Roster did not resolve to two teams; side figures stay at zero
    AmbiguousTeams { teams: usize },
}

impl From<&SideSkip> for Degradation {
    fn from(skip: &SideSkip) -> Self {
        match skip {
            SideSkip::NoPlantEvidence => Degradation::NoPlantEvidence,
            SideSkip::AmbiguousTeams { teams } => Degradation::AmbiguousTeams { teams: *teams },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Complete {
        stats: PerMatchStats,
        degradations: Vec<Degradation>,
    },
    Rejected(Rejection),
}

impl MatchOutcome {
    pub fn stats(&self) -> Option<&PerMatchStats> {
        match self {
            MatchOutcome::Complete { stats, .. } => Some(stats),
            MatchOutcome::Rejected(_) => None,
        }
    }

    pub fn into_stats(self) -> Option<PerMatchStats> {
        match self {
            MatchOutcome::Complete { stats, .. } => Some(stats),
            MatchOutcome::Rejected(_) => None,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, MatchOutcome::Rejected(_))
    }
}

/// Shareable processor bound to one identity map and settings
#[derive(Debug, Clone)]
pub struct MatchProcessor {
    identities: Arc<IdentityMap>,
    settings: EngineSettings,
}

impl MatchProcessor {
    pub fn new(identities: Arc<IdentityMap>, settings: EngineSettings) -> Self {
        Self {
            identities,
            settings,
        }
    }

    pub fn settings(&self) -> EngineSettings {
        self.settings
    }

    pub fn identities(&self) -> &IdentityMap {
        &self.identities
    }

    pub fn process(&self, raw: &RawMatch) -> MatchOutcome {
        process_match(
            raw,
            &self.identities,
            self.settings.min_tracked_players,
            self.settings.trade_window_ms,
        )
    }
}

fn log_stage(match_id: &str, stage: MatchStage) {
    debug!(match_id, stage = ?stage, "Match stage");
}

/// Process one match end to end
pub fn process_match(
    raw: &RawMatch,
    identities: &IdentityMap,
    min_tracked_players: usize,
    trade_window_ms: u64,
) -> MatchOutcome {
    log_stage(&raw.id, MatchStage::Fetched);

    let resolver = StackResolver::for_players(identities, &raw.players);
    let found = resolver.tracked_names().len();
    if found < min_tracked_players {
        log_stage(&raw.id, MatchStage::Rejected);
        let rejection = Rejection::InsufficientTrackedPlayers {
            found,
            required: min_tracked_players,
        };
        info!("Rejecting match {}: {}", raw.id, rejection);
        return MatchOutcome::Rejected(rejection);
    }
    log_stage(&raw.id, MatchStage::Filtered);

    let mut players = seed_player_records(raw, &resolver);
    let roster = TeamRoster::from_players(&raw.players);
    let build = build_timeline(&raw.kills, &resolver);
    log_stage(&raw.id, MatchStage::Resolved);

    let mut degradations = Vec::new();
    if build.unresolved > 0 {
        degradations.push(Degradation::UnresolvedIdentity {
            events: build.unresolved,
        });
    }
    if build.malformed > 0 {
        degradations.push(Degradation::MalformedEvent {
            events: build.malformed,
        });
    }

    let timeline = &build.timeline;
    let trades = detect_trades(timeline, trade_window_ms);
    let multi_kills = count_multi_kills(timeline);
    let clutches = detect_clutches(timeline, &roster);
    let openings = count_first_bloods(timeline);

    let round_ids: BTreeSet<u32> = raw
        .rounds
        .iter()
        .map(|round| round.id)
        .chain(timeline.round_ids())
        .collect();
    if round_ids.len() != raw.rounds.len() {
        debug!(
            match_id = %raw.id,
            listed = raw.rounds.len(),
            played = round_ids.len(),
            "Kill events reference rounds missing from the round list"
        );
    }

    let tracked: Vec<String> = players.keys().cloned().collect();
    let kast = count_kast_rounds(
        timeline,
        &trades,
        tracked.iter().map(String::as_str),
        &round_ids,
    );

    let sides = attribute_sides(&raw.rounds, timeline, &roster, &resolver);
    if let Some(skip) = sides.skip_reason() {
        debug!(match_id = %raw.id, reason = ?skip, "Side attribution skipped");
        degradations.push(Degradation::from(skip));
    }
    log_stage(&raw.id, MatchStage::Attributed);

    for (name, record) in players.iter_mut() {
        record.first_kills = openings.first_kills.get(name).copied().unwrap_or(0);
        record.first_deaths = openings.first_deaths.get(name).copied().unwrap_or(0);
        record.kast_rounds = kast.get(name).copied().unwrap_or(0);
        record.multi_kills = multi_kills.get(name).copied().unwrap_or_default();
        record.clutches = clutches.get(name).copied().unwrap_or(0);
        let split = sides.split(name);
        record.attack = split.attack;
        record.defense = split.defense;
    }

    let stats = PerMatchStats {
        match_id: raw.id.clone(),
        map: raw.map_name().to_string(),
        mode: raw.queue_id().to_string(),
        game_start: raw.game_start(),
        won: stack_team_won(raw, &resolver),
        rounds_played: round_ids.len() as u32,
        players,
    };
    log_stage(&raw.id, MatchStage::Complete);

    MatchOutcome::Complete {
        stats,
        degradations,
    }
}

/// One zeroed record per tracked player, filled with the provider totals.
/// Two accounts of the same player add into one record.
fn seed_player_records(
    raw: &RawMatch,
    resolver: &StackResolver<'_>,
) -> BTreeMap<String, PlayerMatchStats> {
    let mut players: BTreeMap<String, PlayerMatchStats> = BTreeMap::new();

    for player in &raw.players {
        let Some(name) = resolver.resolve_player(player) else {
            continue;
        };
        let record = players.entry(name.to_string()).or_default();
        if record.team.is_empty() {
            record.team = player.team_id.clone();
        }
        if record.agent.is_empty() {
            record.agent = player.agent.name.clone();
        }

        let totals = &player.stats;
        record.kills += totals.kills;
        record.deaths += totals.deaths;
        record.assists += totals.assists;
        record.headshots += totals.headshots;
        record.bodyshots += totals.bodyshots;
        record.legshots += totals.legshots;
        record.score += totals.score;
        record.damage_made += totals.damage.dealt;
        record.damage_received += totals.damage.received;
    }

    players
}

/// Win flag of the team of the first stack player in the player list.
/// Falls back to comparing round wins when the payload has no team list.
fn stack_team_won(raw: &RawMatch, resolver: &StackResolver<'_>) -> bool {
    let Some(team) = raw
        .players
        .iter()
        .find(|player| resolver.resolve_player(player).is_some())
        .map(|player| player.team_id.as_str())
    else {
        return false;
    };

    raw.team_won(team).unwrap_or_else(|| {
        let won = raw
            .rounds
            .iter()
            .filter(|round| round.winning_team == team)
            .count();
        let decided = raw
            .rounds
            .iter()
            .filter(|round| !round.winning_team.is_empty())
            .count();
        won * 2 > decided
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RawKillEvent, RawParticipant, RawPlayer, RawRound, RawTeam};

    fn player(puuid: &str, name: &str, team: &str, kills: u32) -> RawPlayer {
        let mut player = RawPlayer {
            puuid: puuid.to_string(),
            name: name.to_string(),
            tag: "T".to_string(),
            team_id: team.to_string(),
            ..Default::default()
        };
        player.agent.name = "Jett".to_string();
        player.stats.kills = kills;
        player
    }

    fn identities() -> IdentityMap {
        IdentityMap::from_accounts([
            ("ana#T", "Ana"),
            ("ana2#T", "Ana"),
            ("bo#T", "Bo"),
        ])
    }

    fn raw_match() -> RawMatch {
        RawMatch {
            id: "m-1".to_string(),
            players: vec![
                player("a", "ana", "Red", 7),
                player("b", "bo", "Red", 3),
                player("x", "rnd", "Blue", 9),
            ],
            teams: vec![
                RawTeam {
                    team_id: "Red".to_string(),
                    won: true,
                    ..Default::default()
                },
                RawTeam {
                    team_id: "Blue".to_string(),
                    ..Default::default()
                },
            ],
            rounds: vec![RawRound {
                id: 0,
                ..Default::default()
            }],
            kills: vec![RawKillEvent {
                round: 0,
                time_in_round_in_ms: 1000,
                killer: RawParticipant::new("a", "Red"),
                victim: RawParticipant::new("x", "Blue"),
                assistants: vec![RawParticipant::new("b", "Red")],
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_rejects_below_minimum() {
        let outcome = process_match(&raw_match(), &identities(), 3, 5000);
        assert_eq!(
            outcome,
            MatchOutcome::Rejected(Rejection::InsufficientTrackedPlayers {
                found: 2,
                required: 3
            })
        );
        assert!(outcome.into_stats().is_none());
    }

    #[test]
    fn test_complete_match() {
        let processor = MatchProcessor::new(
            Arc::new(identities()),
            EngineSettings {
                min_tracked_players: 2,
                trade_window_ms: 5000,
            },
        );
        let outcome = processor.process(&raw_match());
        let MatchOutcome::Complete { stats, degradations } = outcome else {
            panic!("match should be accepted");
        };

        assert!(stats.won);
        assert_eq!(stats.rounds_played, 1);
        assert_eq!(stats.players.len(), 2);

        let ana = stats.player("Ana").unwrap();
        assert_eq!(ana.kills, 7);
        assert_eq!(ana.agent, "Jett");
        assert_eq!(ana.first_kills, 1);
        assert_eq!(ana.kast_rounds, 1);

        let bo = stats.player("Bo").unwrap();
        assert_eq!(bo.kast_rounds, 1);
        assert_eq!(bo.first_kills, 0);

        assert!(degradations.contains(&Degradation::NoPlantEvidence));
        assert!(degradations.contains(&Degradation::UnresolvedIdentity { events: 1 }));
    }

    #[test]
    fn test_two_accounts_merge_into_one_record() {
        let mut raw = raw_match();
        raw.players.push(player("a2", "ana2", "Red", 4));

        let outcome = process_match(&raw, &identities(), 2, 5000);
        let stats = outcome.into_stats().unwrap();
        assert_eq!(stats.players.len(), 2);
        assert_eq!(stats.player("Ana").unwrap().kills, 11);
    }

    #[test]
    fn test_rounds_played_covers_kill_rounds() {
        let mut raw = raw_match();
        raw.kills.push(RawKillEvent {
            round: 2,
            time_in_round_in_ms: 500,
            killer: RawParticipant::new("a", "Red"),
            victim: RawParticipant::new("x", "Blue"),
            assistants: Vec::new(),
        });

        let stats = process_match(&raw, &identities(), 2, 5000).into_stats().unwrap();
        assert_eq!(stats.rounds_played, 2);
        for record in stats.players.values() {
            assert!(record.kast_rounds <= stats.rounds_played);
        }
        assert_eq!(stats.player("Ana").unwrap().kast_rounds, 2);
    }

    #[test]
    fn test_win_falls_back_to_round_count() {
        let mut raw = raw_match();
        raw.teams.clear();
        raw.rounds = (0..3)
            .map(|id| RawRound {
                id,
                winning_team: if id == 1 { "Blue" } else { "Red" }.to_string(),
                ..Default::default()
            })
            .collect();

        let stats = process_match(&raw, &identities(), 1, 5000).into_stats().unwrap();
        assert!(stats.won);
        assert_eq!(stats.rounds_played, 3);
    }
}
