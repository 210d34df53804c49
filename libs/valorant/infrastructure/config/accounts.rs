//! Account map file
//!
//! ```yaml
//! players:
//!   Santi: ["Lessツ#2222", "Cuuurlyta#cutie"]
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ConfigError, Result};
use crate::domain::IdentityMap;

/// Canonical player name → `name#tag` accounts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountsFile {
    #[serde(default)]
    pub players: BTreeMap<String, Vec<String>>,
}

impl AccountsFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading accounts from {}", path.display());
        let yaml_content = std::fs::read_to_string(path)?;
        Self::parse(&yaml_content)
    }

    pub fn parse(yaml_content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml_content)?)
    }

    /// Invert into the account → canonical map. An account may belong to
    /// only one player.
    pub fn into_identity_map(self) -> Result<IdentityMap> {
        let mut owners: BTreeMap<String, String> = BTreeMap::new();

        for (canonical, accounts) in self.players {
            for account in accounts {
                if !account.contains('#') {
                    return Err(ConfigError::ValidationError(format!(
                        "account '{}' of {} is not in name#tag form",
                        account, canonical
                    )));
                }
                match owners.get(&account) {
                    Some(owner) if *owner != canonical => {
                        return Err(ConfigError::ValidationError(format!(
                            "account '{}' is listed under both {} and {}",
                            account, owner, canonical
                        )));
                    }
                    _ => {
                        owners.insert(account, canonical.clone());
                    }
                }
            }
        }

        Ok(IdentityMap::from_accounts(owners))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const ACCOUNTS: &str = r#"
players:
  Santi: ["Lessツ#2222", "Cuuurlyta#cutie"]
  Rosarino:
    - "Rosarino#CARC"
"#;

    #[test]
    fn test_parse_and_invert() {
        let identities = AccountsFile::parse(ACCOUNTS).unwrap().into_identity_map().unwrap();
        assert_eq!(identities.len(), 3);
        assert_eq!(identities.resolve("Lessツ", "2222"), Some("Santi"));
        assert_eq!(identities.resolve("Rosarino", "CARC"), Some("Rosarino"));
        assert_eq!(identities.resolve("Rosarino", "XXXX"), None);
    }

    #[test]
    fn test_account_under_two_players_is_rejected() {
        let yaml = "players:\n  A: [\"x#1\"]\n  B: [\"x#1\"]\n";
        let err = AccountsFile::parse(yaml).unwrap().into_identity_map().unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_account_without_tag_is_rejected() {
        let yaml = "players:\n  A: [\"nobody\"]\n";
        assert!(AccountsFile::parse(yaml).unwrap().into_identity_map().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(ACCOUNTS.as_bytes()).unwrap();

        let accounts = AccountsFile::load(file.path()).unwrap();
        assert_eq!(accounts.players["Santi"].len(), 2);
    }

    #[test]
    fn test_missing_file() {
        let err = AccountsFile::load("/nonexistent/accounts.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileError(_)));
    }
}
