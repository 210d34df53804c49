//! Attack / defense side attribution
//!
//! The first plant of the match tells which team attacked first. Rounds
//! without their own plant fall back to the competitive side-swap layout:
//! rounds 0-11 first attackers, 12-23 the other team, then alternating
//! every round in overtime. A round with a plant always uses its planter.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::debug;

use crate::domain::{RawRound, RoundTimeline, SideStats, StackResolver, TeamRoster};

/// Number of rounds per half in regulation
pub const HALF_LENGTH: usize = 12;

/// Round index at which overtime starts
pub const OVERTIME_START: usize = 2 * HALF_LENGTH;

/// Attack and defense figures for one player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SideSplit {
    pub attack: SideStats,
    pub defense: SideStats,
}

/// Why side attribution was skipped for a match
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideSkip {
    /// No round carried a plant
    NoPlantEvidence,
    /// The match mentions other than two team ids across roster, plants
    /// and kills
    AmbiguousTeams { teams: usize },
}

/// Result of side attribution; a skip leaves every side figure at zero
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideAttribution {
    Attributed(BTreeMap<String, SideSplit>),
    Skipped(SideSkip),
}

impl SideAttribution {
    pub fn split(&self, player: &str) -> SideSplit {
        match self {
            SideAttribution::Attributed(splits) => splits.get(player).copied().unwrap_or_default(),
            SideAttribution::Skipped(_) => SideSplit::default(),
        }
    }

    pub fn skip_reason(&self) -> Option<&SideSkip> {
        match self {
            SideAttribution::Attributed(_) => None,
            SideAttribution::Skipped(reason) => Some(reason),
        }
    }
}

/// Team of the planter in the earliest round with a plant
pub fn infer_first_attacking_team(rounds: &[RawRound]) -> Option<&str> {
    rounds.iter().find_map(RawRound::planting_team)
}

/// Attacking team by position in the match, ignoring plant evidence
pub fn side_by_round_index<'a>(index: usize, first_attack: &'a str, second_team: &'a str) -> &'a str {
    if index < HALF_LENGTH {
        first_attack
    } else if index < OVERTIME_START {
        second_team
    } else if (index - OVERTIME_START) % 2 == 0 {
        first_attack
    } else {
        second_team
    }
}

/// Round id → attacking team for every round of the match
pub fn attacking_team_by_round(
    rounds: &[RawRound],
    first_attack: &str,
    second_team: &str,
) -> HashMap<u32, String> {
    rounds
        .iter()
        .enumerate()
        .map(|(index, round)| {
            let attacking = round
                .planting_team()
                .unwrap_or_else(|| side_by_round_index(index, first_attack, second_team));
            (round.id, attacking.to_string())
        })
        .collect()
}

/// Every team id the match mentions: roster, planters, killers and victims
pub fn match_team_ids<'a>(
    rounds: &'a [RawRound],
    timeline: &'a RoundTimeline,
    roster: &'a TeamRoster,
) -> BTreeSet<&'a str> {
    let mut teams: BTreeSet<&str> = roster.team_ids().collect();
    teams.extend(rounds.iter().filter_map(RawRound::planting_team));
    for (_, events) in timeline.rounds() {
        for event in events {
            teams.insert(event.killer_team.as_str());
            teams.insert(event.victim_team.as_str());
        }
    }
    teams.remove("");
    teams
}

/// The team that is not `first_attack`; requires exactly two teams
fn opposing_team<'a>(teams: &BTreeSet<&'a str>, first_attack: &str) -> Result<&'a str, SideSkip> {
    if teams.len() != 2 || !teams.contains(first_attack) {
        return Err(SideSkip::AmbiguousTeams { teams: teams.len() });
    }
    teams
        .iter()
        .copied()
        .find(|team| *team != first_attack)
        .ok_or(SideSkip::AmbiguousTeams { teams: 2 })
}

pub fn attribute_sides(
    rounds: &[RawRound],
    timeline: &RoundTimeline,
    roster: &TeamRoster,
    resolver: &StackResolver<'_>,
) -> SideAttribution {
    let Some(first_attack) = infer_first_attacking_team(rounds) else {
        return SideAttribution::Skipped(SideSkip::NoPlantEvidence);
    };
    let teams = match_team_ids(rounds, timeline, roster);
    let second_team = match opposing_team(&teams, first_attack) {
        Ok(team) => team,
        Err(skip) => return SideAttribution::Skipped(skip),
    };

    let attacking = attacking_team_by_round(rounds, first_attack, second_team);
    let mut splits: BTreeMap<String, SideSplit> = BTreeMap::new();

    for (round, events) in timeline.rounds() {
        let Some(attacking_team) = attacking.get(&round) else {
            debug!(round, "Kill events for a round missing from the round list");
            continue;
        };

        for event in events {
            let killer_attacking = event.killer_team == *attacking_team;
            if let Some(killer) = event.killer() {
                let split = splits.entry(killer.to_string()).or_default();
                if killer_attacking {
                    split.attack.kills += 1;
                } else {
                    split.defense.kills += 1;
                }
            }
            if let Some(victim) = event.victim() {
                let split = splits.entry(victim.to_string()).or_default();
                if killer_attacking {
                    split.defense.deaths += 1;
                } else {
                    split.attack.deaths += 1;
                }
            }
        }
    }

    for round in rounds {
        let Some(attacking_team) = attacking.get(&round.id) else {
            continue;
        };
        for entry in &round.stats {
            let Some(player) = resolver.resolve_participant(&entry.player) else {
                continue;
            };
            let side = splits.entry(player.to_string()).or_default();
            let side = if entry.player.team == *attacking_team {
                &mut side.attack
            } else {
                &mut side.defense
            };
            side.damage += entry.stats.damage;
            side.rounds += 1;
        }
    }

    SideAttribution::Attributed(splits)
}
