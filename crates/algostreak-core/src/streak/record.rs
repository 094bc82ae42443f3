//! Persisted streak state and its repair from loosely-typed storage.
//!
//! Records are written as camelCase JSON (the same layout the web client
//! kept in local storage). Reading is deliberately forgiving: counters of
//! the wrong type fall back to zero and the weekly window is padded or
//! truncated to seven slots. Only a record that cannot be placed on the
//! calendar (no usable `lastActivityDate`) is rejected.

use chrono::NaiveDate;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::error::ValidationError;

/// Number of days tracked by the rolling activity window.
pub const WINDOW_DAYS: usize = 7;

/// Rolling activity window, most recent day first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WeeklyProgress([bool; WINDOW_DAYS]);

impl WeeklyProgress {
    /// Window with no active days.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Window for a user whose first activity is today.
    pub fn first_day() -> Self {
        Self::empty().shifted()
    }

    /// Build from an arbitrary-length slice, truncating or zero-padding.
    pub fn from_flags(flags: &[bool]) -> Self {
        let mut window = [false; WINDOW_DAYS];
        for (slot, flag) in window.iter_mut().zip(flags) {
            *slot = *flag;
        }
        Self(window)
    }

    /// Drop the oldest slot and mark today as active.
    pub fn shifted(self) -> Self {
        let mut next = [false; WINDOW_DAYS];
        next[0] = true;
        next[1..].copy_from_slice(&self.0[..WINDOW_DAYS - 1]);
        Self(next)
    }

    pub fn flags(&self) -> [bool; WINDOW_DAYS] {
        self.0
    }

    pub fn active_days(&self) -> usize {
        self.0.iter().filter(|f| **f).count()
    }

    /// Repair a stored window. Returns the window and whether it had to be
    /// reshaped.
    pub fn from_loose(value: &Value) -> (Self, bool) {
        match value {
            Value::Array(items) => {
                let flags: Vec<bool> = items.iter().map(loose_flag).collect();
                (Self::from_flags(&flags), items.len() != WINDOW_DAYS)
            }
            _ => (Self::empty(), true),
        }
    }
}

impl Serialize for WeeklyProgress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(WINDOW_DAYS))?;
        for flag in &self.0 {
            seq.serialize_element(&u8::from(*flag))?;
        }
        seq.end()
    }
}

/// One user's streak state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawStreakRecord")]
pub struct StreakRecord {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_activity_date: NaiveDate,
    pub weekly_progress: WeeklyProgress,
    pub reward_claimed: bool,
}

impl StreakRecord {
    /// Record created by a user's very first activity.
    pub fn first_activity(today: NaiveDate) -> Self {
        Self {
            current_streak: 1,
            longest_streak: 1,
            last_activity_date: today,
            weekly_progress: WeeklyProgress::first_day(),
            reward_claimed: false,
        }
    }

    /// Parse stored JSON, treating anything unusable as "no record".
    pub fn from_json(text: &str) -> Option<Self> {
        match serde_json::from_str::<StreakRecord>(text) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable streak record");
                None
            }
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Shape-tolerant mirror of [`StreakRecord`] used for reading.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStreakRecord {
    #[serde(default)]
    current_streak: Value,
    #[serde(default)]
    longest_streak: Value,
    #[serde(default, alias = "lastLoginDate")]
    last_activity_date: Value,
    #[serde(default)]
    weekly_progress: Value,
    #[serde(default)]
    reward_claimed: Value,
}

impl TryFrom<RawStreakRecord> for StreakRecord {
    type Error = ValidationError;

    fn try_from(raw: RawStreakRecord) -> Result<Self, Self::Error> {
        let date_text = raw.last_activity_date.as_str().unwrap_or_default();
        let last_activity_date = parse_activity_date(date_text)?;

        let current_streak = loose_count(&raw.current_streak);
        let mut longest_streak = loose_count(&raw.longest_streak);
        if longest_streak < current_streak {
            tracing::warn!(
                current_streak,
                longest_streak,
                "longest streak below current streak, lifting"
            );
            longest_streak = current_streak;
        }

        let (weekly_progress, repaired) = WeeklyProgress::from_loose(&raw.weekly_progress);
        if repaired {
            tracing::warn!(stored = %raw.weekly_progress, "repaired weekly progress window");
        }

        Ok(Self {
            current_streak,
            longest_streak,
            last_activity_date,
            weekly_progress,
            reward_claimed: raw.reward_claimed.as_bool().unwrap_or(false),
        })
    }
}

/// Parse a calendar date as written by the CLI (`YYYY-MM-DD`) or by the
/// legacy web client (`M/D/YYYY`).
pub fn parse_activity_date(text: &str) -> Result<NaiveDate, ValidationError> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(text, "%m/%d/%Y"))
        .map_err(|_| ValidationError::InvalidDate(text.to_string()))
}

fn loose_count(value: &Value) -> u32 {
    let n = match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    };
    u32::try_from(n).unwrap_or(u32::MAX)
}

fn loose_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !matches!(s.trim(), "" | "0" | "false"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn serializes_camel_case_with_integer_flags() {
        let record = StreakRecord::first_activity(date(2024, 3, 1));
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "currentStreak": 1,
                "longestStreak": 1,
                "lastActivityDate": "2024-03-01",
                "weeklyProgress": [1, 0, 0, 0, 0, 0, 0],
                "rewardClaimed": false
            })
        );
    }

    #[test]
    fn reads_back_what_it_writes() {
        let mut record = StreakRecord::first_activity(date(2024, 3, 1));
        record.current_streak = 9;
        record.longest_streak = 12;
        record.reward_claimed = true;
        let text = record.to_json().unwrap();
        assert_eq!(StreakRecord::from_json(&text), Some(record));
    }

    #[test]
    fn short_window_is_padded() {
        let text = r#"{"currentStreak":2,"longestStreak":2,"lastActivityDate":"2024-03-01","weeklyProgress":[1,1]}"#;
        let record = StreakRecord::from_json(text).unwrap();
        assert_eq!(
            record.weekly_progress.flags(),
            [true, true, false, false, false, false, false]
        );
        assert!(!record.reward_claimed);
    }

    #[test]
    fn long_window_is_truncated() {
        let text = r#"{"currentStreak":1,"longestStreak":1,"lastActivityDate":"2024-03-01","weeklyProgress":[0,0,0,0,0,0,1,1,1]}"#;
        let record = StreakRecord::from_json(text).unwrap();
        assert_eq!(record.weekly_progress.active_days(), 1);
        assert!(record.weekly_progress.flags()[6]);
    }

    #[test]
    fn missing_window_becomes_empty() {
        let text = r#"{"currentStreak":3,"longestStreak":4,"lastActivityDate":"2024-03-01"}"#;
        let record = StreakRecord::from_json(text).unwrap();
        assert_eq!(record.weekly_progress, WeeklyProgress::empty());
    }

    #[test]
    fn accepts_legacy_login_date_key_and_locale_format() {
        let text = r#"{"currentStreak":3,"longestStreak":5,"lastLoginDate":"3/1/2024","weeklyProgress":[1,1,1,0,0,0,0]}"#;
        let record = StreakRecord::from_json(text).unwrap();
        assert_eq!(record.last_activity_date, date(2024, 3, 1));
        assert_eq!(record.current_streak, 3);
    }

    #[test]
    fn longest_is_lifted_to_current() {
        let text = r#"{"currentStreak":6,"longestStreak":2,"lastActivityDate":"2024-03-01"}"#;
        let record = StreakRecord::from_json(text).unwrap();
        assert_eq!(record.longest_streak, 6);
    }

    #[test]
    fn odd_counter_types_fall_back() {
        let text = r#"{"currentStreak":"4","longestStreak":-3,"lastActivityDate":"2024-03-01","weeklyProgress":[true,"1",null,0,2,false,"0"]}"#;
        let record = StreakRecord::from_json(text).unwrap();
        assert_eq!(record.current_streak, 4);
        assert_eq!(record.longest_streak, 4);
        assert_eq!(
            record.weekly_progress.flags(),
            [true, true, false, false, true, false, false]
        );
    }

    #[test]
    fn record_without_date_is_absent() {
        assert_eq!(StreakRecord::from_json(r#"{"currentStreak":4}"#), None);
        assert_eq!(
            StreakRecord::from_json(r#"{"lastActivityDate":"yesterday"}"#),
            None
        );
        assert_eq!(StreakRecord::from_json("not json"), None);
        assert_eq!(StreakRecord::from_json("[1,2,3]"), None);
    }

    #[test]
    fn shifting_drops_oldest_slot() {
        let window = WeeklyProgress::from_flags(&[false, true, false, false, false, false, true]);
        assert_eq!(
            window.shifted().flags(),
            [true, false, true, false, false, false, false]
        );
    }

    #[test]
    fn parse_activity_date_rejects_garbage() {
        assert_eq!(
            parse_activity_date("2024-13-01"),
            Err(ValidationError::InvalidDate("2024-13-01".into()))
        );
        assert_eq!(parse_activity_date(" 2024-02-29 ").unwrap(), date(2024, 2, 29));
    }
}
