mod config;
pub mod database;
pub mod memory;
pub mod migrations;

pub use config::{Config, LogConfig, UserConfig};
pub use database::Database;
pub use memory::MemoryStore;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;
use crate::streak::{ActivityKind, StreakRecord};

/// Returns the data directory.
///
/// `ALGOSTREAK_DATA_DIR` wins when set; otherwise `~/.config/algostreak/`,
/// or `~/.config/algostreak-dev/` with `ALGOSTREAK_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("ALGOSTREAK_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("ALGOSTREAK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("algostreak-dev")
            } else {
                base_dir.join("algostreak")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Storage key for a user's streak record.
pub fn streak_key(user_id: &str) -> String {
    format!("streak-{user_id}")
}

/// One row of a user's activity history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub user_id: String,
    pub date: NaiveDate,
    pub kind: ActivityKind,
    /// Streak length after the activity was applied.
    pub streak: u32,
    pub recorded_at: DateTime<Utc>,
}

/// Key-value persistence for streak records.
///
/// Implementations only need `get` and `set`; history is optional.
pub trait StreakStore: Send + Sync {
    fn get(&self, user_id: &str) -> Result<Option<StreakRecord>>;

    fn set(&self, user_id: &str, record: &StreakRecord) -> Result<()>;

    fn append_activity(&self, _entry: &ActivityEntry) -> Result<()> {
        Ok(())
    }

    /// Most recent entries first.
    fn history(&self, _user_id: &str, _limit: usize) -> Result<Vec<ActivityEntry>> {
        Ok(Vec::new())
    }
}
