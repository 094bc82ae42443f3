//! Practice reminder settings.
//!
//! A reminder fires at a fixed local time on a set of weekdays. The day
//! selection is either "everyday" or an explicit list; picking every
//! individual weekday collapses back to "everyday".

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

const ALL_WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Which days a reminder fires on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DaySelection {
    #[default]
    Everyday,
    /// Kept sorted Monday-first, never all seven, may be empty.
    Days(Vec<Weekday>),
}

impl DaySelection {
    /// Flip one weekday in or out of the selection.
    pub fn toggle(&mut self, day: Weekday) {
        let next = match self {
            // switching away from everyday starts a fresh explicit list
            DaySelection::Everyday => vec![day],
            DaySelection::Days(days) => {
                let mut days = std::mem::take(days);
                if let Some(pos) = days.iter().position(|d| *d == day) {
                    days.remove(pos);
                } else {
                    days.push(day);
                }
                days
            }
        };
        *self = Self::from_days(next);
    }

    fn from_days(mut days: Vec<Weekday>) -> Self {
        days.sort_by_key(|d| d.num_days_from_monday());
        days.dedup();
        if days.len() == ALL_WEEKDAYS.len() {
            DaySelection::Everyday
        } else {
            DaySelection::Days(days)
        }
    }

    pub fn contains(&self, day: Weekday) -> bool {
        match self {
            DaySelection::Everyday => true,
            DaySelection::Days(days) => days.contains(&day),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, DaySelection::Days(days) if days.is_empty())
    }
}

impl From<DaySelection> for Vec<String> {
    fn from(selection: DaySelection) -> Self {
        match selection {
            DaySelection::Everyday => vec!["everyday".to_string()],
            DaySelection::Days(days) => days.iter().map(|d| weekday_key(*d).to_string()).collect(),
        }
    }
}

impl TryFrom<Vec<String>> for DaySelection {
    type Error = ValidationError;

    fn try_from(items: Vec<String>) -> Result<Self, Self::Error> {
        if items.iter().any(|s| s.eq_ignore_ascii_case("everyday")) {
            return Ok(DaySelection::Everyday);
        }
        let days = items
            .iter()
            .map(|s| parse_weekday(s))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_days(days))
    }
}

impl Serialize for DaySelection {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Vec::<String>::from(self.clone()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DaySelection {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Vec::<String>::deserialize(deserializer)?;
        DaySelection::try_from(items).map_err(serde::de::Error::custom)
    }
}

/// How the reminder is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    #[default]
    Browser,
    Email,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_time", with = "hhmm")]
    pub time: NaiveTime,
    #[serde(default)]
    pub days: DaySelection,
    #[serde(default)]
    pub channel: Channel,
}

fn default_time() -> NaiveTime {
    NaiveTime::from_hms_opt(18, 0, 0).unwrap_or_default()
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            time: default_time(),
            days: DaySelection::default(),
            channel: Channel::default(),
        }
    }
}

impl ReminderSettings {
    pub fn is_due_on(&self, date: NaiveDate) -> bool {
        self.enabled && self.days.contains(date.weekday())
    }

    /// e.g. "everyday at 18:00" or "Mon, Wed at 09:30".
    pub fn summary(&self) -> String {
        let days = match &self.days {
            DaySelection::Everyday => "everyday".to_string(),
            DaySelection::Days(days) if days.is_empty() => "no days".to_string(),
            DaySelection::Days(days) => days
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        };
        format!("{days} at {}", self.time.format("%H:%M"))
    }
}

/// Parse "mon", "Monday", "TUE" etc.
pub fn parse_weekday(text: &str) -> Result<Weekday, ValidationError> {
    text.trim()
        .parse::<Weekday>()
        .map_err(|_| ValidationError::InvalidWeekday(text.to_string()))
}

/// Parse "HH:MM" (seconds optional).
pub fn parse_time(text: &str) -> Result<NaiveTime, ValidationError> {
    let text = text.trim();
    NaiveTime::parse_from_str(text, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M:%S"))
        .map_err(|_| ValidationError::InvalidTime(text.to_string()))
}

fn weekday_key(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "mon",
        Weekday::Tue => "tue",
        Weekday::Wed => "wed",
        Weekday::Thu => "thu",
        Weekday::Fri => "fri",
        Weekday::Sat => "sat",
        Weekday::Sun => "sun",
    }
}

mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let text = String::deserialize(deserializer)?;
        super::parse_time(&text).map_err(serde::de::Error::custom)
    }
}
