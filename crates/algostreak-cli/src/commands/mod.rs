pub mod activity;
pub mod config;
pub mod reminder;
pub mod streak;

use algostreak_core::streak::parse_activity_date;
use algostreak_core::{Config, Database, StreakService, TracingNotifier};
use chrono::{Local, NaiveDate};

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

pub fn open_service() -> Result<StreakService<Database>, Box<dyn std::error::Error>> {
    Ok(StreakService::new(Database::open()?).with_notifier(TracingNotifier))
}

/// `--user` if given, else the configured default.
pub fn resolve_user(user: Option<String>, config: &Config) -> String {
    user.unwrap_or_else(|| config.user.default_user.clone())
}

/// `--date` if given, else today's local date.
pub fn resolve_date(date: Option<&str>) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    match date {
        Some(text) => Ok(parse_activity_date(text)?),
        None => Ok(Local::now().date_naive()),
    }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
