//! Practice reminder settings, stored in the `[reminder]` config section.

use algostreak_core::reminder::{parse_time, parse_weekday};
use algostreak_core::{Channel, Config, DaySelection, ReminderSettings};
use clap::{Subcommand, ValueEnum};
use serde::Serialize;

use super::{print_json, resolve_date, CmdResult};

#[derive(Clone, Copy, ValueEnum)]
pub enum ChannelArg {
    Browser,
    Email,
}

impl From<ChannelArg> for Channel {
    fn from(arg: ChannelArg) -> Self {
        match arg {
            ChannelArg::Browser => Channel::Browser,
            ChannelArg::Email => Channel::Email,
        }
    }
}

#[derive(Subcommand)]
pub enum ReminderAction {
    /// Show reminder settings
    Show,
    /// Update reminder time, channel or state
    Set {
        /// Reminder time as HH:MM
        #[arg(long)]
        time: Option<String>,
        #[arg(long, value_enum)]
        channel: Option<ChannelArg>,
        /// Turn reminders on
        #[arg(long, conflicts_with = "disable")]
        enable: bool,
        /// Turn reminders off
        #[arg(long)]
        disable: bool,
    },
    /// Add or remove one weekday (e.g. "mon")
    Toggle { day: String },
    /// Remind every day
    Everyday,
    /// Whether a reminder fires on a date (defaults to today)
    Due {
        #[arg(long)]
        date: Option<String>,
    },
}

#[derive(Serialize)]
struct ReminderView<'a> {
    #[serde(flatten)]
    settings: &'a ReminderSettings,
    summary: String,
}

fn show(settings: &ReminderSettings) -> CmdResult {
    print_json(&ReminderView {
        settings,
        summary: settings.summary(),
    })
}

pub fn run(action: ReminderAction, mut config: Config) -> CmdResult {
    match action {
        ReminderAction::Show => return show(&config.reminder),
        ReminderAction::Set {
            time,
            channel,
            enable,
            disable,
        } => {
            if let Some(time) = time {
                config.reminder.time = parse_time(&time)?;
            }
            if let Some(channel) = channel {
                config.reminder.channel = channel.into();
            }
            if enable {
                config.reminder.enabled = true;
            }
            if disable {
                config.reminder.enabled = false;
            }
        }
        ReminderAction::Toggle { day } => {
            config.reminder.days.toggle(parse_weekday(&day)?);
            if config.reminder.days.is_empty() {
                tracing::warn!("no reminder days selected");
            }
        }
        ReminderAction::Everyday => config.reminder.days = DaySelection::Everyday,
        ReminderAction::Due { date } => {
            let date = resolve_date(date.as_deref())?;
            return print_json(&config.reminder.is_due_on(date));
        }
    }

    config.save()?;
    show(&config.reminder)
}
