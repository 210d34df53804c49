//! Response payloads not covered by the match domain types

use serde::{Deserialize, Serialize};

/// Account lookup result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountData {
    pub puuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub region: String,
}
