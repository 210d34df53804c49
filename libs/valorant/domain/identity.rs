//! Stack identities
//!
//! The identity map ties provider accounts (`name#tag`) to the canonical
//! name of the real player behind them. One player may own several accounts.

use std::collections::{BTreeSet, HashMap};

use super::raw::{RawParticipant, RawPlayer};

/// Fixed `"account#tag"` → canonical player name mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityMap {
    accounts: HashMap<String, String>,
}

impl IdentityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(account_key, canonical_name)` pairs
    pub fn from_accounts<I, K, V>(accounts: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            accounts: accounts
                .into_iter()
                .map(|(key, name)| (key.into(), name.into()))
                .collect(),
        }
    }

    pub fn insert(&mut self, account_key: impl Into<String>, canonical: impl Into<String>) {
        self.accounts.insert(account_key.into(), canonical.into());
    }

    /// Resolve an account to its canonical player, `None` when not tracked
    pub fn resolve(&self, name: &str, tag: &str) -> Option<&str> {
        self.accounts
            .get(&account_key(name, tag))
            .map(String::as_str)
    }

    /// Distinct canonical names, sorted
    pub fn canonical_names(&self) -> BTreeSet<&str> {
        self.accounts.values().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

/// Lookup key used by the identity map
pub fn account_key(name: &str, tag: &str) -> String {
    format!("{}#{}", name, tag)
}

/// Resolves the participants of one match against the identity map.
///
/// PUUIDs seen in the player list are resolved once; participants that are
/// not in the player list fall back to their embedded `name#tag`.
#[derive(Debug, Clone)]
pub struct StackResolver<'a> {
    identities: &'a IdentityMap,
    by_puuid: HashMap<String, String>,
}

impl<'a> StackResolver<'a> {
    pub fn for_players(identities: &'a IdentityMap, players: &[RawPlayer]) -> Self {
        let by_puuid = players
            .iter()
            .filter(|player| !player.puuid.is_empty())
            .filter_map(|player| {
                identities
                    .resolve(&player.name, &player.tag)
                    .map(|name| (player.puuid.clone(), name.to_string()))
            })
            .collect();

        Self {
            identities,
            by_puuid,
        }
    }

    pub fn resolve_player(&self, player: &RawPlayer) -> Option<&str> {
        self.identities.resolve(&player.name, &player.tag)
    }

    pub fn resolve_puuid(&self, puuid: &str) -> Option<&str> {
        self.by_puuid.get(puuid).map(String::as_str)
    }

    pub fn resolve_participant(&self, participant: &RawParticipant) -> Option<&str> {
        self.resolve_puuid(&participant.puuid).or_else(|| {
            if participant.name.is_empty() {
                None
            } else {
                self.identities.resolve(&participant.name, &participant.tag)
            }
        })
    }

    /// Distinct canonical names present in the match
    pub fn tracked_names(&self) -> BTreeSet<&str> {
        self.by_puuid.values().map(String::as_str).collect()
    }
}
