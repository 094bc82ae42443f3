//! # algostreak Core Library
//!
//! Daily practice streaks for a DSA learning app. Every operation is
//! available through the `algostreak-cli` binary, which is a thin host over
//! this library.
//!
//! ## Architecture
//!
//! - **Streak tracker**: a pure state machine folding one activity day into a
//!   user's [`StreakRecord`]; the caller supplies `today`
//! - **Storage**: SQLite key-value store for records plus an activity log,
//!   and TOML-based configuration
//! - **Service**: load / compute / store with per-user serialization
//! - **Reminders**: weekday and time selection for practice nudges
//!
//! ## Key Components
//!
//! - [`record_activity`]: core transition function
//! - [`StreakService`]: persistence-aware entry point
//! - [`Database`]: SQLite [`StreakStore`]
//! - [`Config`]: application configuration management

pub mod error;
pub mod events;
pub mod reminder;
pub mod service;
pub mod storage;
pub mod streak;

pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::{Notification, Notifier, Severity, StreakEvent, TracingNotifier};
pub use reminder::{Channel, DaySelection, ReminderSettings};
pub use service::{ActivityOutcome, StreakService};
pub use storage::{ActivityEntry, Config, Database, MemoryStore, StreakStore};
pub use streak::{
    claim_reward, record_activity, week_progress, ActivityKind, DayDelta, RewardStatus,
    StreakRecord, Transition, WeeklyProgress,
};
