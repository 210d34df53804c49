//! Multi-kill counting (2K/3K/4K/5K rounds)

use std::collections::BTreeMap;

use crate::domain::{MultiKillHistogram, RoundTimeline};

/// Per tracked killer, how many rounds ended with each kill count
pub fn count_multi_kills(timeline: &RoundTimeline) -> BTreeMap<String, MultiKillHistogram> {
    let mut histograms: BTreeMap<String, MultiKillHistogram> = BTreeMap::new();

    for (_, events) in timeline.rounds() {
        let mut kills_this_round: BTreeMap<&str, u32> = BTreeMap::new();
        for killer in events.iter().filter_map(|event| event.killer()) {
            *kills_this_round.entry(killer).or_insert(0) += 1;
        }

        for (killer, count) in kills_this_round {
            if count < 2 {
                continue;
            }
            histograms.entry(killer.to_string()).or_default().record(count);
        }
    }

    histograms
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::KillEvent;

    fn kill(round: u32, time_ms: u64, killer: Option<&str>) -> KillEvent {
        KillEvent {
            round,
            time_ms,
            killer_name: killer.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_highest_count_only() {
        let mut events: Vec<KillEvent> = (0..5).map(|i| kill(0, i * 100, Some("Ana"))).collect();
        events.push(kill(1, 100, Some("Ana")));
        events.push(kill(1, 200, Some("Ana")));
        events.push(kill(1, 300, Some("Bo")));

        let histograms = count_multi_kills(&RoundTimeline::from_events(events));
        let ana = histograms["Ana"];
        assert_eq!(ana.get(5), 1);
        assert_eq!(ana.get(2), 1);
        assert_eq!(ana.get(3), 0);
        assert_eq!(ana.get(4), 0);
        assert!(!histograms.contains_key("Bo"));
    }

    #[test]
    fn test_untracked_killers_ignored() {
        let events = vec![kill(0, 100, None), kill(0, 200, None), kill(0, 300, None)];
        assert!(count_multi_kills(&RoundTimeline::from_events(events)).is_empty());
    }
}
