//! Clutch detection
//!
//! Replays each round's eliminations against a fresh copy of the team
//! roster. A kill is a clutch when the killer was the last one standing on
//! their team and it wipes out the last member of the opposing team.

use std::collections::BTreeMap;

use crate::domain::{RoundTimeline, TeamRoster};

pub fn detect_clutches(timeline: &RoundTimeline, roster: &TeamRoster) -> BTreeMap<String, u32> {
    let mut clutches: BTreeMap<String, u32> = BTreeMap::new();

    for (_, events) in timeline.rounds() {
        let mut alive = roster.alive_snapshot();

        for event in events {
            let killer_team_alive = alive.get(&event.killer_team).map_or(0, |team| team.len());
            let victim_team_alive = alive.get(&event.victim_team).map_or(0, |team| team.len());

            let removed = alive
                .get_mut(&event.victim_team)
                .is_some_and(|team| team.remove(&event.victim_puuid));
            if !removed {
                continue;
            }

            let Some(killer) = event.killer() else {
                continue;
            };
            if event.killer_team == event.victim_team {
                continue;
            }

            let victim_team_wiped = alive.get(&event.victim_team).is_some_and(|team| team.is_empty());
            if victim_team_alive > 0 && victim_team_wiped && killer_team_alive == 1 {
                *clutches.entry(killer.to_string()).or_insert(0) += 1;
                // A team can only be wiped once per round
                break;
            }
        }
    }

    clutches
}
