//! In-process store, for tests and for hosts that persist elsewhere.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{ActivityEntry, StreakStore};
use crate::error::{Result, StorageError};
use crate::streak::StreakRecord;

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, StreakRecord>>,
    log: Mutex<Vec<ActivityEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StreakStore for MemoryStore {
    fn get(&self, user_id: &str) -> Result<Option<StreakRecord>> {
        let records = self.records.lock().map_err(StorageError::from)?;
        Ok(records.get(user_id).cloned())
    }

    fn set(&self, user_id: &str, record: &StreakRecord) -> Result<()> {
        let mut records = self.records.lock().map_err(StorageError::from)?;
        records.insert(user_id.to_string(), record.clone());
        Ok(())
    }

    fn append_activity(&self, entry: &ActivityEntry) -> Result<()> {
        let mut log = self.log.lock().map_err(StorageError::from)?;
        log.push(entry.clone());
        Ok(())
    }

    fn history(&self, user_id: &str, limit: usize) -> Result<Vec<ActivityEntry>> {
        let log = self.log.lock().map_err(StorageError::from)?;
        Ok(log
            .iter()
            .rev()
            .filter(|e| e.user_id == user_id)
            .take(limit)
            .cloned()
            .collect())
    }
}
