//! Engine-internal round structures derived from the raw payload

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::raw::RawPlayer;

/// One elimination, resolved against the stack.
///
/// `killer_name`/`victim_name` are `None` for players outside the stack;
/// such events still take part in round bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KillEvent {
    pub round: u32,
    pub time_ms: u64,
    pub killer_name: Option<String>,
    pub victim_name: Option<String>,
    pub killer_team: String,
    pub victim_team: String,
    pub killer_puuid: String,
    pub victim_puuid: String,
    /// Tracked assistants only, in payload order
    pub assistants: Vec<String>,
}

impl KillEvent {
    pub fn killer(&self) -> Option<&str> {
        self.killer_name.as_deref()
    }

    pub fn victim(&self) -> Option<&str> {
        self.victim_name.as_deref()
    }

    pub fn has_assistant(&self, name: &str) -> bool {
        self.assistants.iter().any(|assistant| assistant == name)
    }
}

/// Round id → kill events of that round ordered by in-round time.
///
/// Events with equal timestamps keep their payload order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundTimeline {
    rounds: BTreeMap<u32, Vec<KillEvent>>,
}

impl RoundTimeline {
    /// Group events by round and stable-sort each round by time
    pub fn from_events(events: impl IntoIterator<Item = KillEvent>) -> Self {
        let mut rounds: BTreeMap<u32, Vec<KillEvent>> = BTreeMap::new();
        for event in events {
            rounds.entry(event.round).or_default().push(event);
        }
        for events in rounds.values_mut() {
            // Vec::sort_by_key is stable
            events.sort_by_key(|event| event.time_ms);
        }
        Self { rounds }
    }

    pub fn events(&self, round: u32) -> &[KillEvent] {
        self.rounds.get(&round).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Rounds with at least one event, in round order
    pub fn rounds(&self) -> impl Iterator<Item = (u32, &[KillEvent])> {
        self.rounds
            .iter()
            .map(|(round, events)| (*round, events.as_slice()))
    }

    pub fn round_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.rounds.keys().copied()
    }

    pub fn event_count(&self) -> usize {
        self.rounds.values().map(Vec::len).sum()
    }
}

/// Team id → PUUIDs of its members, fixed for one match
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamRoster {
    teams: BTreeMap<String, BTreeSet<String>>,
}

/// Working liveness copy for a single round
pub type AliveSets = HashMap<String, BTreeSet<String>>;

impl TeamRoster {
    pub fn from_players(players: &[RawPlayer]) -> Self {
        let mut teams: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for player in players {
            if player.team_id.is_empty() || player.puuid.is_empty() {
                continue;
            }
            teams
                .entry(player.team_id.clone())
                .or_default()
                .insert(player.puuid.clone());
        }
        Self { teams }
    }

    /// Build from explicit `(team, puuids)` pairs
    pub fn from_teams<I, T, P>(teams: I) -> Self
    where
        I: IntoIterator<Item = (T, Vec<P>)>,
        T: Into<String>,
        P: Into<String>,
    {
        Self {
            teams: teams
                .into_iter()
                .map(|(team, members)| (team.into(), members.into_iter().map(Into::into).collect()))
                .collect(),
        }
    }

    /// Fresh liveness sets for one round; never shared between rounds
    pub fn alive_snapshot(&self) -> AliveSets {
        self.teams
            .iter()
            .map(|(team, members)| (team.clone(), members.clone()))
            .collect()
    }

    pub fn team_ids(&self) -> impl Iterator<Item = &str> {
        self.teams.keys().map(String::as_str)
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    pub fn members(&self, team: &str) -> Option<&BTreeSet<String>> {
        self.teams.get(team)
    }
}
