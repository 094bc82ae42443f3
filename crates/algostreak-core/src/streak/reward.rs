use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::record::StreakRecord;
use super::tracker::{week_progress, MILESTONE_INTERVAL};

/// Days left before the next weekly reward unlocks; zero on a milestone day.
pub fn days_until_reward(record: &StreakRecord) -> u32 {
    MILESTONE_INTERVAL - week_progress(record)
}

/// An unlocked reward is waiting to be claimed.
pub fn reward_available(record: &StreakRecord) -> bool {
    record.current_streak > 0
        && record.current_streak % MILESTONE_INTERVAL == 0
        && !record.reward_claimed
}

/// Everything a dashboard needs to draw the streak card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardStatus {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub week_progress: u32,
    pub days_until_reward: u32,
    pub reward_available: bool,
    pub last_activity_date: NaiveDate,
    pub active_days_this_week: usize,
}

impl RewardStatus {
    pub fn from_record(record: &StreakRecord) -> Self {
        Self {
            current_streak: record.current_streak,
            longest_streak: record.longest_streak,
            week_progress: week_progress(record),
            days_until_reward: days_until_reward(record),
            reward_available: reward_available(record),
            last_activity_date: record.last_activity_date,
            active_days_this_week: record.weekly_progress.active_days(),
        }
    }
}
