//! Aggregator
//!
//! Folds per-match records into one lifetime `PlayerStats`. Every update is
//! an addition, so the result does not depend on fold order.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::domain::{PerMatchStats, PlayerMatchStats, PlayerStats};

/// Running totals for one analysis target
#[derive(Debug, Clone)]
pub struct Aggregator {
    targets: Vec<String>,
    stats: PlayerStats,
}

impl Aggregator {
    /// `targets` are the canonical identities standing for the player; the
    /// first one present in a match is the one counted for it.
    pub fn new(name: impl Into<String>, targets: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            targets: targets.into_iter().map(Into::into).collect(),
            stats: PlayerStats::new(name),
        }
    }

    pub fn fold(&mut self, stats: &PerMatchStats) -> bool {
        let Some(record) = self
            .targets
            .iter()
            .find_map(|target| stats.player(target))
        else {
            return false;
        };

        add_match(&mut self.stats, record);
        self.stats.total_games += 1;
        self.stats.total_rounds += stats.rounds_played;
        if stats.won {
            self.stats.wins += 1;
        } else {
            self.stats.losses += 1;
        }
        true
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    pub fn finish(self) -> PlayerStats {
        self.stats
    }
}

fn add_match(total: &mut PlayerStats, record: &PlayerMatchStats) {
    total.kills += record.kills;
    total.deaths += record.deaths;
    total.assists += record.assists;
    total.headshots += record.headshots;
    total.bodyshots += record.bodyshots;
    total.legshots += record.legshots;
    total.score += record.score;
    total.damage_made += record.damage_made;
    total.damage_received += record.damage_received;
    total.first_kills += record.first_kills;
    total.first_deaths += record.first_deaths;
    total.kast_rounds += record.kast_rounds;
    total.clutches += record.clutches;
    total.attack.add(&record.attack);
    total.defense.add(&record.defense);
    total.multi_kills.add(&record.multi_kills);
    if !record.agent.is_empty() {
        *total.agents.entry(record.agent.clone()).or_insert(0) += 1;
    }
}

/// Fold every match where one of `targets` appears. The reported name is
/// the first target.
pub fn aggregate<'a, S: AsRef<str>>(
    matches: impl IntoIterator<Item = &'a PerMatchStats>,
    targets: &[S],
) -> PlayerStats {
    let name = targets.first().map(|t| t.as_ref().to_string()).unwrap_or_default();
    let mut aggregator = Aggregator::new(name, targets.iter().map(|t| t.as_ref().to_string()));
    for stats in matches {
        aggregator.fold(stats);
    }
    aggregator.finish()
}

/// Aggregator folded from several workers as results arrive
#[derive(Debug, Clone)]
pub struct SharedAggregator {
    inner: Arc<Mutex<Aggregator>>,
}

impl SharedAggregator {
    pub fn new(aggregator: Aggregator) -> Self {
        Self {
            inner: Arc::new(Mutex::new(aggregator)),
        }
    }

    pub fn fold(&self, stats: &PerMatchStats) -> bool {
        self.inner.lock().fold(stats)
    }

    pub fn snapshot(&self) -> PlayerStats {
        self.inner.lock().stats().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SideStats;

    fn record(kills: u32, agent: &str) -> PlayerMatchStats {
        PlayerMatchStats {
            kills,
            deaths: 2,
            agent: agent.to_string(),
            attack: SideStats {
                kills,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn played(id: &str, won: bool, players: &[(&str, PlayerMatchStats)]) -> PerMatchStats {
        PerMatchStats {
            match_id: id.to_string(),
            won,
            rounds_played: 20,
            players: players
                .iter()
                .map(|(name, stats)| (name.to_string(), stats.clone()))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_aggregate_skips_absent_player() {
        let matches = vec![
            played("1", true, &[("Ana", record(10, "Jett"))]),
            played("2", false, &[("Ana", record(5, "Sova"))]),
            played("3", true, &[("Bo", record(30, "Jett"))]),
        ];
        let stats = aggregate(&matches, &["Ana"]);

        assert_eq!(stats.name, "Ana");
        assert_eq!(stats.total_games, 2);
        assert_eq!(stats.wins, 1);
        assert_eq!(stats.losses, 1);
        assert_eq!(stats.kills, 15);
        assert_eq!(stats.attack.kills, 15);
        assert_eq!(stats.total_rounds, 40);
        assert_eq!(stats.agents.get("Jett"), Some(&1));
        assert_eq!(stats.agents.get("Sova"), Some(&1));
    }

    #[test]
    fn test_fold_order_does_not_matter() {
        let matches = vec![
            played("1", true, &[("Ana", record(10, "Jett"))]),
            played("2", false, &[("Ana", record(5, "Sova"))]),
        ];
        let forward = aggregate(&matches, &["Ana"]);
        let backward = aggregate(matches.iter().rev(), &["Ana"]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_first_present_target_counts_once() {
        let matches = vec![played(
            "1",
            true,
            &[("Ana", record(10, "Jett")), ("Alt", record(99, "Omen"))],
        )];
        let stats = aggregate(&matches, &["Ana", "Alt"]);
        assert_eq!(stats.total_games, 1);
        assert_eq!(stats.kills, 10);
    }

    #[test]
    fn test_shared_aggregator_across_threads() {
        let shared = SharedAggregator::new(Aggregator::new("Ana", ["Ana"]));
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let shared = shared.clone();
                std::thread::spawn(move || {
                    shared.fold(&played(&i.to_string(), i % 2 == 0, &[("Ana", record(1, "Jett"))]));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stats = shared.snapshot();
        assert_eq!(stats.total_games, 4);
        assert_eq!(stats.wins + stats.losses, 4);
        assert_eq!(stats.agents["Jett"], 4);
    }
}
