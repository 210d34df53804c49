//! Common test utilities for valorant integration tests
//!
//! Builders for raw match payloads and identity maps.

#![allow(dead_code)]

use valorant::domain::{
    IdentityMap, RawKillEvent, RawMatch, RawParticipant, RawPlant, RawPlayer, RawRound,
    RawRoundStat, RawTeam,
};

pub const RED: &str = "Red";
pub const BLUE: &str = "Blue";

/// Identity map where every account is `<puuid>#T`
pub fn identities(accounts: &[(&str, &str)]) -> IdentityMap {
    IdentityMap::from_accounts(
        accounts
            .iter()
            .map(|(account, canonical)| (format!("{}#T", account), canonical.to_string())),
    )
}

/// Builder for synthetic `RawMatch` payloads. Players use their PUUID as
/// account name and `T` as tag.
#[derive(Debug, Clone, Default)]
pub struct MatchBuilder {
    raw: RawMatch,
}

impl MatchBuilder {
    pub fn new(id: &str) -> Self {
        let mut raw = RawMatch {
            id: id.to_string(),
            ..Default::default()
        };
        raw.metadata.map.name = "Ascent".to_string();
        raw.metadata.queue.id = "competitive".to_string();
        raw.metadata.game_start = 1_700_000_000;
        Self { raw }
    }

    /// Red: r1..r5, Blue: b1..b5
    pub fn five_v_five(id: &str) -> Self {
        let mut builder = Self::new(id);
        for i in 1..=5 {
            builder = builder
                .player(&format!("r{}", i), RED)
                .player(&format!("b{}", i), BLUE);
        }
        builder
    }

    pub fn player(mut self, puuid: &str, team: &str) -> Self {
        let mut player = RawPlayer {
            puuid: puuid.to_string(),
            name: puuid.to_string(),
            tag: "T".to_string(),
            team_id: team.to_string(),
            ..Default::default()
        };
        player.agent.name = "Jett".to_string();
        self.raw.players.push(player);
        self
    }

    pub fn player_totals(mut self, puuid: &str, kills: u32, deaths: u32, assists: u32) -> Self {
        if let Some(player) = self.raw.players.iter_mut().find(|p| p.puuid == puuid) {
            player.stats.kills = kills;
            player.stats.deaths = deaths;
            player.stats.assists = assists;
        }
        self
    }

    pub fn winner(mut self, team: &str) -> Self {
        let teams: Vec<String> = self
            .raw
            .players
            .iter()
            .map(|p| p.team_id.clone())
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect();
        self.raw.teams = teams
            .into_iter()
            .map(|team_id| RawTeam {
                won: team_id == team,
                team_id,
                ..Default::default()
            })
            .collect();
        self
    }

    pub fn game_start(mut self, epoch_secs: i64) -> Self {
        self.raw.metadata.game_start = epoch_secs;
        self
    }

    /// Round with an optional plant by `plant_team`
    pub fn round(mut self, id: u32, plant_team: Option<&str>) -> Self {
        self.raw.rounds.push(RawRound {
            id,
            plant: plant_team.map(|team| RawPlant {
                player: RawParticipant::new("", team),
            }),
            ..Default::default()
        });
        self
    }

    /// `count` rounds numbered from 0, none with a plant
    pub fn rounds(mut self, count: u32) -> Self {
        for id in 0..count {
            self = self.round(id, None);
        }
        self
    }

    pub fn plant(mut self, round: u32, team: &str) -> Self {
        if let Some(r) = self.raw.rounds.iter_mut().find(|r| r.id == round) {
            r.plant = Some(RawPlant {
                player: RawParticipant::new("", team),
            });
        }
        self
    }

    pub fn damage(mut self, round: u32, puuid: &str, team: &str, damage: u64) -> Self {
        if let Some(r) = self.raw.rounds.iter_mut().find(|r| r.id == round) {
            let mut entry = RawRoundStat {
                player: RawParticipant::new(puuid, team),
                ..Default::default()
            };
            entry.stats.damage = damage;
            r.stats.push(entry);
        }
        self
    }

    /// Kill by `killer` of `victim`; teams come from the player list
    pub fn kill(mut self, round: u32, time_ms: u64, killer: &str, victim: &str) -> Self {
        let team_of = |puuid: &str| {
            self.raw
                .players
                .iter()
                .find(|p| p.puuid == puuid)
                .map(|p| p.team_id.clone())
                .unwrap_or_default()
        };
        let event = RawKillEvent {
            round,
            time_in_round_in_ms: time_ms,
            killer: RawParticipant::new(killer, team_of(killer)),
            victim: RawParticipant::new(victim, team_of(victim)),
            assistants: Vec::new(),
        };
        self.raw.kills.push(event);
        self
    }

    /// Add an assistant to the last kill
    pub fn assisted_by(mut self, puuid: &str) -> Self {
        let team = self
            .raw
            .players
            .iter()
            .find(|p| p.puuid == puuid)
            .map(|p| p.team_id.clone())
            .unwrap_or_default();
        if let Some(kill) = self.raw.kills.last_mut() {
            kill.assistants.push(RawParticipant::new(puuid, team));
        }
        self
    }

    pub fn build(self) -> RawMatch {
        self.raw
    }
}
