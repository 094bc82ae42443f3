//! Load / compute / store around the streak tracker.
//!
//! The tracker is pure; this is the piece that owns persistence. Calls for
//! the same user are serialized with a per-user lock so two threads sharing
//! one service cannot interleave their read-modify-write and drop an
//! update. Separate processes writing the same database file are not
//! coordinated.
//!
//! The saved record is the source of truth. The activity log is
//! best-effort: once the record is written, a failed log append is only
//! logged, so the caller still gets the outcome and its events.

use chrono::{Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{CoreError, Result, StorageError, ValidationError};
use crate::events::{Notification, Notifier, StreakEvent};
use crate::storage::{ActivityEntry, StreakStore};
use crate::streak::{self, ActivityKind, RewardStatus, StreakRecord};

/// What a single `record_activity` call produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityOutcome {
    pub user_id: String,
    pub kind: ActivityKind,
    pub record: StreakRecord,
    pub events: Vec<StreakEvent>,
    pub notifications: Vec<Notification>,
}

pub struct StreakService<S> {
    store: S,
    notifier: Option<Box<dyn Notifier>>,
    user_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<S: StreakStore> StreakService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            notifier: None,
            user_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Some(Box::new(notifier));
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn user_lock(&self, user_id: &str) -> Result<Arc<Mutex<()>>> {
        let mut locks = self.user_locks.lock().map_err(StorageError::from)?;
        Ok(locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone())
    }

    /// Drop the registry entry once no other caller holds the lock.
    fn release_user_lock(&self, user_id: &str, lock: Arc<Mutex<()>>) {
        let Ok(mut locks) = self.user_locks.lock() else {
            return;
        };
        // one reference in the map, one in `lock`
        if Arc::strong_count(&lock) == 2 {
            locks.remove(user_id);
        }
    }

    /// Run `f` while holding the per-user lock.
    fn with_user_lock<T>(&self, user_id: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let lock = self.user_lock(user_id)?;
        let result = match lock.lock() {
            Ok(_guard) => f(),
            Err(e) => Err(StorageError::from(e).into()),
        };
        self.release_user_lock(user_id, lock);
        result
    }

    #[cfg(test)]
    fn tracked_users(&self) -> usize {
        self.user_locks.lock().map(|l| l.len()).unwrap_or(0)
    }

    /// Record activity for `user_id` on `today` and persist the result.
    ///
    /// Same-day repeats are still logged as `held` but leave the record
    /// untouched.
    pub fn record_activity(&self, user_id: &str, today: NaiveDate) -> Result<ActivityOutcome> {
        validate_user(user_id)?;
        let transition = self.with_user_lock(user_id, || {
            let existing = self.store.get(user_id)?;
            let transition = streak::record_activity(user_id, today, existing);

            if transition.kind != ActivityKind::Held {
                self.store.set(user_id, &transition.record)?;
            }
            let entry = ActivityEntry {
                user_id: user_id.to_string(),
                date: today,
                kind: transition.kind,
                streak: transition.record.current_streak,
                recorded_at: Utc::now(),
            };
            if let Err(e) = self.store.append_activity(&entry) {
                tracing::warn!(user_id, %today, error = %e, "failed to append activity log entry");
            }
            Ok(transition)
        })?;

        if let Some(notifier) = &self.notifier {
            for event in &transition.events {
                notifier.notify(user_id, event);
            }
        }

        Ok(ActivityOutcome {
            user_id: user_id.to_string(),
            kind: transition.kind,
            notifications: transition.events.iter().map(|e| e.notification()).collect(),
            events: transition.events,
            record: transition.record,
        })
    }

    /// Record activity dated by the local wall clock.
    pub fn record_activity_now(&self, user_id: &str) -> Result<ActivityOutcome> {
        self.record_activity(user_id, Local::now().date_naive())
    }

    /// Current streak card for a user, `None` if they were never active.
    pub fn status(&self, user_id: &str) -> Result<Option<RewardStatus>> {
        validate_user(user_id)?;
        Ok(self
            .store
            .get(user_id)?
            .map(|record| RewardStatus::from_record(&record)))
    }

    /// Acknowledge the latest milestone reward.
    pub fn claim_reward(&self, user_id: &str) -> Result<StreakRecord> {
        validate_user(user_id)?;
        self.with_user_lock(user_id, || {
            let record = self
                .store
                .get(user_id)?
                .ok_or_else(|| CoreError::NoRecord {
                    user_id: user_id.to_string(),
                })?;
            let claimed = streak::claim_reward(record);
            self.store.set(user_id, &claimed)?;
            tracing::debug!(user_id, streak = claimed.current_streak, "reward claimed");
            Ok(claimed)
        })
    }

    pub fn history(&self, user_id: &str, limit: usize) -> Result<Vec<ActivityEntry>> {
        validate_user(user_id)?;
        self.store.history(user_id, limit)
    }
}

fn validate_user(user_id: &str) -> Result<(), ValidationError> {
    if user_id.trim().is_empty() {
        return Err(ValidationError::EmptyUserId);
    }
    Ok(())
}
