//! Kill timeline builder

use tracing::debug;

use crate::domain::{KillEvent, RawKillEvent, RoundTimeline, StackResolver};

/// Timeline plus the bookkeeping of what could not be attributed
#[derive(Debug, Clone, Default)]
pub struct TimelineBuild {
    pub timeline: RoundTimeline,
    /// Events dropped for missing victim or team ids
    pub malformed: usize,
    /// Kept events whose killer or victim is outside the stack
    pub unresolved: usize,
}

/// Resolve raw kills against the stack and order them per round
pub fn build_timeline(kills: &[RawKillEvent], resolver: &StackResolver<'_>) -> TimelineBuild {
    let mut malformed = 0;
    let mut unresolved = 0;
    let mut events = Vec::with_capacity(kills.len());

    for kill in kills {
        if !kill.is_well_formed() {
            debug!(
                round = kill.round,
                time_ms = kill.time_in_round_in_ms,
                "Skipping malformed kill event"
            );
            malformed += 1;
            continue;
        }

        let killer_name = resolver.resolve_participant(&kill.killer).map(str::to_string);
        let victim_name = resolver.resolve_participant(&kill.victim).map(str::to_string);
        if killer_name.is_none() || victim_name.is_none() {
            unresolved += 1;
        }

        let assistants = kill
            .assistants
            .iter()
            .filter_map(|assistant| resolver.resolve_participant(assistant))
            .map(str::to_string)
            .collect();

        events.push(KillEvent {
            round: kill.round,
            time_ms: kill.time_in_round_in_ms,
            killer_name,
            victim_name,
            killer_team: kill.killer.team.clone(),
            victim_team: kill.victim.team.clone(),
            killer_puuid: kill.killer.puuid.clone(),
            victim_puuid: kill.victim.puuid.clone(),
            assistants,
        });
    }

    TimelineBuild {
        timeline: RoundTimeline::from_events(events),
        malformed,
        unresolved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IdentityMap, RawParticipant, RawPlayer};

    fn player(puuid: &str, name: &str, team: &str) -> RawPlayer {
        RawPlayer {
            puuid: puuid.to_string(),
            name: name.to_string(),
            tag: "T".to_string(),
            team_id: team.to_string(),
            ..Default::default()
        }
    }

    fn kill(round: u32, time: u64, killer: (&str, &str), victim: (&str, &str)) -> RawKillEvent {
        RawKillEvent {
            round,
            time_in_round_in_ms: time,
            killer: RawParticipant::new(killer.0, killer.1),
            victim: RawParticipant::new(victim.0, victim.1),
            assistants: Vec::new(),
        }
    }

    #[test]
    fn test_untracked_events_are_kept() {
        let identities = IdentityMap::from_accounts([("ana#T", "Ana")]);
        let players = vec![player("a", "ana", "Red"), player("x", "rnd", "Blue")];
        let resolver = StackResolver::for_players(&identities, &players);

        let mut first = kill(0, 2000, ("x", "Blue"), ("a", "Red"));
        first.assistants.push(RawParticipant::new("a", "Red"));
        first.assistants.push(RawParticipant::new("x", "Blue"));
        let kills = vec![
            first,
            kill(0, 500, ("y", "Blue"), ("z", "Red")),
            kill(1, 100, ("a", "Red"), ("x", "Blue")),
        ];

        let build = build_timeline(&kills, &resolver);
        assert_eq!(build.timeline.event_count(), 3);
        assert_eq!(build.unresolved, 3);
        assert_eq!(build.malformed, 0);

        let round0 = build.timeline.events(0);
        assert_eq!(round0[0].time_ms, 500);
        assert_eq!(round0[0].killer(), None);
        assert_eq!(round0[1].victim(), Some("Ana"));
        assert_eq!(round0[1].assistants, vec!["Ana".to_string()]);
        assert_eq!(build.timeline.events(1)[0].killer(), Some("Ana"));
    }

    #[test]
    fn test_malformed_events_are_skipped() {
        let identities = IdentityMap::new();
        let resolver = StackResolver::for_players(&identities, &[]);
        let kills = vec![
            kill(0, 100, ("a", ""), ("b", "Blue")),
            kill(0, 200, ("a", "Red"), ("", "Blue")),
            kill(0, 300, ("a", "Red"), ("b", "Blue")),
        ];

        let build = build_timeline(&kills, &resolver);
        assert_eq!(build.malformed, 2);
        assert_eq!(build.timeline.event_count(), 1);
    }

    #[test]
    fn test_equal_timestamps_keep_payload_order() {
        let identities = IdentityMap::new();
        let resolver = StackResolver::for_players(&identities, &[]);
        let kills = vec![
            kill(0, 1000, ("k1", "Red"), ("v1", "Blue")),
            kill(0, 1000, ("k2", "Red"), ("v2", "Blue")),
            kill(0, 400, ("k3", "Blue"), ("v3", "Red")),
        ];

        let build = build_timeline(&kills, &resolver);
        let killers: Vec<&str> = build
            .timeline
            .events(0)
            .iter()
            .map(|event| event.killer_puuid.as_str())
            .collect();
        assert_eq!(killers, vec!["k3", "k1", "k2"]);
    }
}
