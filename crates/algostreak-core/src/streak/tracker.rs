//! Daily streak state machine.
//!
//! A streak is driven only by the calendar distance between successive
//! activity days: the same day holds, the next day extends, anything else
//! (a longer gap or a date earlier than the last one) resets to one.
//! Everything here is pure; loading and storing belong to the caller.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::record::StreakRecord;
use crate::events::StreakEvent;

/// A streak of this many days (or any multiple) unlocks a reward.
pub const MILESTONE_INTERVAL: u32 = 7;

/// Signed number of calendar days from `from` to `to`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Calendar relation between the last recorded day and today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayDelta {
    Same,
    Consecutive,
    /// Two or more days forward, or any day backwards.
    Gap,
}

impl DayDelta {
    pub fn between(last: NaiveDate, today: NaiveDate) -> Self {
        match days_between(last, today) {
            0 => DayDelta::Same,
            1 => DayDelta::Consecutive,
            _ => DayDelta::Gap,
        }
    }
}

/// What an activity event did to the streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Started,
    Held,
    Extended,
    Reset,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Started => "started",
            ActivityKind::Held => "held",
            ActivityKind::Extended => "extended",
            ActivityKind::Reset => "reset",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "started" => Some(ActivityKind::Started),
            "held" => Some(ActivityKind::Held),
            "extended" => Some(ActivityKind::Extended),
            "reset" => Some(ActivityKind::Reset),
            _ => None,
        }
    }
}

/// Result of folding one activity event into a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub record: StreakRecord,
    pub events: Vec<StreakEvent>,
    pub kind: ActivityKind,
}

impl Transition {
    pub fn into_parts(self) -> (StreakRecord, Vec<StreakEvent>) {
        (self.record, self.events)
    }
}

/// Fold an activity on `today` into the user's record.
///
/// `user_id` is only used for log context.
pub fn record_activity(
    user_id: &str,
    today: NaiveDate,
    existing: Option<StreakRecord>,
) -> Transition {
    let Some(prev) = existing else {
        tracing::debug!(user_id, %today, "first recorded activity");
        return Transition {
            record: StreakRecord::first_activity(today),
            events: Vec::new(),
            kind: ActivityKind::Started,
        };
    };

    let delta = DayDelta::between(prev.last_activity_date, today);
    let mut events = Vec::new();

    let (record, kind) = match delta {
        DayDelta::Same => {
            return Transition {
                record: prev,
                events,
                kind: ActivityKind::Held,
            };
        }
        DayDelta::Consecutive => {
            let current_streak = prev.current_streak.saturating_add(1);
            let mut reward_claimed = prev.reward_claimed;
            if current_streak % MILESTONE_INTERVAL == 0 {
                tracing::info!(user_id, streak = current_streak, "streak milestone reached");
                events.push(StreakEvent::MilestoneReached {
                    streak: current_streak,
                });
                reward_claimed = false;
            }
            let record = StreakRecord {
                current_streak,
                longest_streak: current_streak.max(prev.longest_streak),
                last_activity_date: today,
                weekly_progress: prev.weekly_progress.shifted(),
                reward_claimed,
            };
            (record, ActivityKind::Extended)
        }
        DayDelta::Gap => {
            if today < prev.last_activity_date {
                tracing::warn!(
                    user_id,
                    %today,
                    last = %prev.last_activity_date,
                    "activity dated before the last recorded day, resetting streak"
                );
            }
            if prev.current_streak > 1 {
                tracing::info!(user_id, previous = prev.current_streak, "streak reset");
                events.push(StreakEvent::StreakReset {
                    previous: prev.current_streak,
                });
            }
            // max(1) only matters for repaired records that arrived with zero counters
            let record = StreakRecord {
                current_streak: 1,
                longest_streak: prev.longest_streak.max(1),
                last_activity_date: today,
                weekly_progress: prev.weekly_progress.shifted(),
                reward_claimed: prev.reward_claimed,
            };
            (record, ActivityKind::Reset)
        }
    };

    tracing::debug!(
        user_id,
        %today,
        ?delta,
        current = record.current_streak,
        longest = record.longest_streak,
        "streak updated"
    );

    Transition {
        record,
        events,
        kind,
    }
}

/// Position within the current week of the streak, in `1..=7`.
///
/// A completed week reads as 7 rather than 0.
pub fn week_progress(record: &StreakRecord) -> u32 {
    match record.current_streak % MILESTONE_INTERVAL {
        0 => MILESTONE_INTERVAL,
        rem => rem,
    }
}

/// Mark the latest milestone's reward as acknowledged.
pub fn claim_reward(record: StreakRecord) -> StreakRecord {
    StreakRecord {
        reward_claimed: true,
        ..record
    }
}
