//! Flat-file persistence
//!
//! Per-match records live in a pretty-printed JSON array; the stats report
//! is plain text.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use super::report::render_stats_file;
use crate::domain::{PerMatchStats, PlayerStats};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("File error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid match data in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Debug, Clone)]
pub struct FileStorage {
    match_data_file: PathBuf,
    stats_file: PathBuf,
}

impl FileStorage {
    pub fn new(match_data_file: impl Into<PathBuf>, stats_file: impl Into<PathBuf>) -> Self {
        Self {
            match_data_file: match_data_file.into(),
            stats_file: stats_file.into(),
        }
    }

    pub fn match_data_file(&self) -> &Path {
        &self.match_data_file
    }

    pub fn stats_file(&self) -> &Path {
        &self.stats_file
    }

    /// Saved match records; none yet is an empty list
    pub fn load_matches(&self) -> Result<Vec<PerMatchStats>> {
        let path = &self.match_data_file;
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No match data at {}", path.display());
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StorageError::Io {
                    path: path.clone(),
                    source,
                })
            }
        };

        let matches: Vec<PerMatchStats> =
            serde_json::from_str(&content).map_err(|source| StorageError::Json {
                path: path.clone(),
                source,
            })?;
        debug!("Loaded {} matches from {}", matches.len(), path.display());
        Ok(matches)
    }

    pub fn save_matches(&self, matches: &[PerMatchStats]) -> Result<()> {
        let path = &self.match_data_file;
        let json = serde_json::to_string_pretty(matches).map_err(|source| StorageError::Json {
            path: path.clone(),
            source,
        })?;
        write_file(path, &json)?;
        info!("Saved {} matches to {}", matches.len(), path.display());
        Ok(())
    }

    pub fn save_stats(&self, stats: &PlayerStats) -> Result<()> {
        write_file(&self.stats_file, &render_stats_file(stats))?;
        info!("Saved stats for {} to {}", stats.name, self.stats_file.display());
        Ok(())
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| StorageError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, content).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PlayerMatchStats;

    fn storage(dir: &tempfile::TempDir) -> FileStorage {
        FileStorage::new(dir.path().join("data/matches.json"), dir.path().join("stats.txt"))
    }

    #[test]
    fn test_missing_match_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(storage(&dir).load_matches().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_load_matches() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);

        let mut played = PerMatchStats {
            match_id: "m-1".to_string(),
            map: "Ascent".to_string(),
            won: true,
            rounds_played: 24,
            ..Default::default()
        };
        let mut record = PlayerMatchStats {
            kills: 21,
            ..Default::default()
        };
        record.multi_kills.record(3);
        played.players.insert("Ana".to_string(), record);

        storage.save_matches(std::slice::from_ref(&played)).unwrap();
        let content = std::fs::read_to_string(storage.match_data_file()).unwrap();
        assert!(content.contains("\"3k\": 1"));

        assert_eq!(storage.load_matches().unwrap(), vec![played]);
    }

    #[test]
    fn test_corrupt_match_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);
        std::fs::create_dir_all(dir.path().join("data")).unwrap();
        std::fs::write(storage.match_data_file(), "{not json").unwrap();

        assert!(matches!(storage.load_matches(), Err(StorageError::Json { .. })));
    }

    #[test]
    fn test_save_stats_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);
        let stats = PlayerStats::new("Ana");

        storage.save_stats(&stats).unwrap();
        let content = std::fs::read_to_string(storage.stats_file()).unwrap();
        assert!(content.starts_with("[Ana]"));
    }
}
