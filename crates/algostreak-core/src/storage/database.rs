//! SQLite-backed streak storage.
//!
//! Provides persistent storage for:
//! - Per-user streak records (JSON in a key-value table)
//! - An append-only activity log used for history views

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use super::{data_dir, migrations, streak_key, ActivityEntry, StreakStore};
use crate::error::{Result, StorageError};
use crate::streak::{ActivityKind, StreakRecord};

/// SQLite database for streak storage.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open the database at `<data dir>/algostreak.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("algostreak.db");
        Self::open_at(&path)
    }

    /// Open (or create) a database file at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        migrations::migrate(&conn).map_err(|e| StorageError::MigrationFailed(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        Ok(self.conn.lock()?)
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn()?.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// User ids that have a stored streak record.
    pub fn users(&self) -> Result<Vec<String>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT key FROM kv WHERE key LIKE 'streak-%' ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys
            .into_iter()
            .filter_map(|k| k.strip_prefix("streak-").map(str::to_string))
            .collect())
    }
}

impl StreakStore for Database {
    fn get(&self, user_id: &str) -> Result<Option<StreakRecord>> {
        Ok(self
            .kv_get(&streak_key(user_id))?
            .and_then(|text| StreakRecord::from_json(&text)))
    }

    fn set(&self, user_id: &str, record: &StreakRecord) -> Result<()> {
        self.kv_set(&streak_key(user_id), &record.to_json()?)?;
        Ok(())
    }

    fn append_activity(&self, entry: &ActivityEntry) -> Result<()> {
        self.conn()?.execute(
            "INSERT INTO activity_log (user_id, activity_date, kind, streak, recorded_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.user_id,
                entry.date.format("%Y-%m-%d").to_string(),
                entry.kind.as_str(),
                entry.streak,
                entry.recorded_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn history(&self, user_id: &str, limit: usize) -> Result<Vec<ActivityEntry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT activity_date, kind, streak, recorded_at
             FROM activity_log
             WHERE user_id = ?1
             ORDER BY id DESC
             LIMIT ?2",
        )?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt
            .query_map(params![user_id, limit], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, u32>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut entries = Vec::with_capacity(rows.len());
        for (date, kind, streak, recorded_at) in rows {
            let parsed = (
                NaiveDate::parse_from_str(&date, "%Y-%m-%d").ok(),
                ActivityKind::parse(&kind),
                DateTime::parse_from_rfc3339(&recorded_at).ok(),
            );
            match parsed {
                (Some(date), Some(kind), Some(recorded_at)) => entries.push(ActivityEntry {
                    user_id: user_id.to_string(),
                    date,
                    kind,
                    streak,
                    recorded_at: recorded_at.with_timezone(&Utc),
                }),
                _ => tracing::warn!(user_id, %date, %kind, "skipping malformed activity row"),
            }
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
        db.kv_set("test", "again").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "again");
    }

    #[test]
    fn record_round_trip() {
        let db = Database::open_memory().unwrap();
        assert!(db.get("ada").unwrap().is_none());

        let record = StreakRecord::first_activity(date(3));
        db.set("ada", &record).unwrap();
        assert_eq!(db.get("ada").unwrap(), Some(record));
        assert!(db.get("bob").unwrap().is_none());
    }

    #[test]
    fn unreadable_record_reads_as_absent() {
        let db = Database::open_memory().unwrap();
        db.kv_set(&streak_key("ada"), "{broken").unwrap();
        assert!(db.get("ada").unwrap().is_none());
    }

    #[test]
    fn legacy_record_is_repaired_on_read() {
        let db = Database::open_memory().unwrap();
        db.kv_set(
            &streak_key("ada"),
            r#"{"currentStreak":3,"longestStreak":3,"lastLoginDate":"6/2/2024","weeklyProgress":[1,1,1]}"#,
        )
        .unwrap();
        let record = db.get("ada").unwrap().unwrap();
        assert_eq!(record.last_activity_date, date(2));
        assert_eq!(record.weekly_progress.active_days(), 3);
    }

    #[test]
    fn history_is_newest_first_and_limited() {
        let db = Database::open_memory().unwrap();
        for (d, kind, streak) in [
            (1, ActivityKind::Started, 1),
            (2, ActivityKind::Extended, 2),
            (5, ActivityKind::Reset, 1),
        ] {
            db.append_activity(&ActivityEntry {
                user_id: "ada".into(),
                date: date(d),
                kind,
                streak,
                recorded_at: Utc::now(),
            })
            .unwrap();
        }

        let history = db.history("ada", 2).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].date, date(5));
        assert_eq!(history[0].kind, ActivityKind::Reset);
        assert_eq!(history[1].streak, 2);
        assert!(db.history("bob", 10).unwrap().is_empty());
    }

    #[test]
    fn users_lists_streak_keys_only() {
        let db = Database::open_memory().unwrap();
        db.kv_set("other", "x").unwrap();
        db.set("zed", &StreakRecord::first_activity(date(1))).unwrap();
        db.set("amy", &StreakRecord::first_activity(date(1))).unwrap();
        assert_eq!(db.users().unwrap(), vec!["amy", "zed"]);
    }
}
