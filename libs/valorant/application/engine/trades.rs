//! Trade detection
//!
//! A death is traded when a teammate of the victim kills the original
//! killer within the trade window. The window bound is inclusive.

use std::collections::HashSet;

use crate::domain::RoundTimeline;

/// `(round, victim)` pairs whose death was traded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TradeFlags {
    traded: HashSet<(u32, String)>,
}

impl TradeFlags {
    pub fn is_traded(&self, round: u32, player: &str) -> bool {
        self.traded.contains(&(round, player.to_string()))
    }

    pub fn mark(&mut self, round: u32, player: impl Into<String>) {
        self.traded.insert((round, player.into()));
    }
}

pub fn detect_trades(timeline: &RoundTimeline, window_ms: u64) -> TradeFlags {
    let mut flags = TradeFlags::default();

    for (round, events) in timeline.rounds() {
        for (i, death) in events.iter().enumerate() {
            let Some(victim) = death.victim() else {
                continue;
            };
            if death.killer_puuid.is_empty() {
                continue;
            }

            let deadline = death.time_ms.saturating_add(window_ms);
            let avenged = events[i + 1..]
                .iter()
                .take_while(|next| next.time_ms <= deadline)
                .any(|next| {
                    next.victim_puuid == death.killer_puuid && next.killer_team == death.victim_team
                });

            if avenged {
                flags.mark(round, victim);
            }
        }
    }

    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::KillEvent;

    fn kill(time_ms: u64, killer: (&str, &str), victim: (&str, &str, Option<&str>)) -> KillEvent {
        KillEvent {
            round: 0,
            time_ms,
            killer_name: None,
            victim_name: victim.2.map(str::to_string),
            killer_team: killer.1.to_string(),
            victim_team: victim.1.to_string(),
            killer_puuid: killer.0.to_string(),
            victim_puuid: victim.0.to_string(),
            assistants: Vec::new(),
        }
    }

    #[test]
    fn test_trade_window_is_inclusive() {
        let timeline = RoundTimeline::from_events(vec![
            kill(1000, ("e1", "Blue"), ("a", "Red", Some("Ana"))),
            kill(6000, ("b", "Red"), ("e1", "Blue", None)),
        ]);
        assert!(detect_trades(&timeline, 5000).is_traded(0, "Ana"));
        assert!(!detect_trades(&timeline, 4999).is_traded(0, "Ana"));
    }

    #[test]
    fn test_requires_teammate_of_victim() {
        // e1 is killed by its own teammate, not avenged by Red
        let timeline = RoundTimeline::from_events(vec![
            kill(1000, ("e1", "Blue"), ("a", "Red", Some("Ana"))),
            kill(2000, ("e2", "Blue"), ("e1", "Blue", None)),
        ]);
        assert!(!detect_trades(&timeline, 5000).is_traded(0, "Ana"));
    }

    #[test]
    fn test_untracked_victims_are_not_flagged() {
        let timeline = RoundTimeline::from_events(vec![
            kill(1000, ("e1", "Blue"), ("r", "Red", None)),
            kill(1500, ("b", "Red"), ("e1", "Blue", None)),
        ]);
        assert_eq!(detect_trades(&timeline, 5000), TradeFlags::default());
    }

    #[test]
    fn test_trades_do_not_cross_rounds() {
        let mut revenge = kill(1500, ("b", "Red"), ("e1", "Blue", None));
        revenge.round = 1;
        let timeline = RoundTimeline::from_events(vec![
            kill(1000, ("e1", "Blue"), ("a", "Red", Some("Ana"))),
            revenge,
        ]);
        assert!(!detect_trades(&timeline, 5000).is_traded(0, "Ana"));
    }
}
