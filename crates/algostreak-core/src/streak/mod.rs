//! Daily activity streaks.
//!
//! - [`record`]: the persisted [`StreakRecord`] and its repair on load
//! - [`tracker`]: the pure day-by-day state machine
//! - [`reward`]: weekly milestone reward view

pub mod record;
pub mod reward;
pub mod tracker;

pub use record::{parse_activity_date, StreakRecord, WeeklyProgress, WINDOW_DAYS};
pub use reward::{days_until_reward, reward_available, RewardStatus};
pub use tracker::{
    claim_reward, days_between, record_activity, week_progress, ActivityKind, DayDelta,
    Transition, MILESTONE_INTERVAL,
};
