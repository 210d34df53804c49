//! First bloods and KAST rounds

use std::collections::{BTreeMap, BTreeSet};

use super::trades::TradeFlags;
use crate::domain::RoundTimeline;

/// First-kill / first-death tallies per tracked player
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpeningDuels {
    pub first_kills: BTreeMap<String, u32>,
    pub first_deaths: BTreeMap<String, u32>,
}

/// The chronologically first kill of each round opens it
pub fn count_first_bloods(timeline: &RoundTimeline) -> OpeningDuels {
    let mut duels = OpeningDuels::default();

    for (_, events) in timeline.rounds() {
        let Some(opening) = events.first() else {
            continue;
        };
        if let Some(killer) = opening.killer() {
            *duels.first_kills.entry(killer.to_string()).or_insert(0) += 1;
        }
        if let Some(victim) = opening.victim() {
            *duels.first_deaths.entry(victim.to_string()).or_insert(0) += 1;
        }
    }

    duels
}

/// Count, per tracked player, the rounds with a Kill, Assist, Survival or
/// Trade. Any one of the four is enough.
///
/// `rounds` must list every round of the match: a round without kill events
/// is a survived round for everyone.
pub fn count_kast_rounds<'a>(
    timeline: &RoundTimeline,
    trades: &TradeFlags,
    players: impl IntoIterator<Item = &'a str>,
    rounds: &BTreeSet<u32>,
) -> BTreeMap<String, u32> {
    let players: Vec<&str> = players.into_iter().collect();
    let mut kast: BTreeMap<String, u32> = players.iter().map(|name| (name.to_string(), 0)).collect();

    for &round in rounds {
        let events = timeline.events(round);

        for &player in &players {
            let killed = events.iter().any(|event| event.killer() == Some(player));
            let assisted = events.iter().any(|event| event.has_assistant(player));
            let survived = !events.iter().any(|event| event.victim() == Some(player));
            let traded = trades.is_traded(round, player);

            if killed || assisted || survived || traded {
                if let Some(count) = kast.get_mut(player) {
                    *count += 1;
                }
            }
        }
    }

    kast
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::KillEvent;

    fn kill(round: u32, time_ms: u64, killer: Option<&str>, victim: Option<&str>) -> KillEvent {
        KillEvent {
            round,
            time_ms,
            killer_name: killer.map(str::to_string),
            victim_name: victim.map(str::to_string),
            ..Default::default()
        }
    }

    fn rounds(ids: &[u32]) -> BTreeSet<u32> {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_first_blood_uses_earliest_event() {
        let timeline = RoundTimeline::from_events(vec![
            kill(0, 3000, Some("Bo"), None),
            kill(0, 1000, Some("Ana"), Some("Bo")),
            kill(1, 500, None, Some("Ana")),
        ]);
        let duels = count_first_bloods(&timeline);

        assert_eq!(duels.first_kills.get("Ana"), Some(&1));
        assert_eq!(duels.first_kills.get("Bo"), None);
        assert_eq!(duels.first_deaths.get("Bo"), Some(&1));
        assert_eq!(duels.first_deaths.get("Ana"), Some(&1));
    }

    #[test]
    fn test_kast_conditions() {
        let mut assisted_death = kill(1, 2000, None, Some("Bo"));
        assisted_death.assistants.push("Cy".to_string());
        let timeline = RoundTimeline::from_events(vec![
            // Round 0: Ana kills then dies, Bo dies and is traded, Cy dies
            kill(0, 1000, Some("Ana"), None),
            kill(0, 2000, None, Some("Ana")),
            kill(0, 2500, None, Some("Bo")),
            kill(0, 3000, None, Some("Cy")),
            // Round 1: Cy dies after assisting
            assisted_death,
            kill(1, 2500, None, Some("Cy")),
        ]);
        let mut trades = TradeFlags::default();
        trades.mark(0, "Bo");

        let kast = count_kast_rounds(&timeline, &trades, ["Ana", "Bo", "Cy"], &rounds(&[0, 1, 2]));

        // Ana: kill in 0, survived 1 and 2
        assert_eq!(kast["Ana"], 3);
        // Bo: traded in 0, died untraded in 1, survived 2
        assert_eq!(kast["Bo"], 2);
        // Cy: nothing in 0, assist in 1, survived 2
        assert_eq!(kast["Cy"], 2);
    }

    #[test]
    fn test_every_player_has_an_entry() {
        let timeline = RoundTimeline::default();
        let kast = count_kast_rounds(&timeline, &TradeFlags::default(), ["Ana"], &BTreeSet::new());
        assert_eq!(kast.get("Ana"), Some(&0));
    }
}
