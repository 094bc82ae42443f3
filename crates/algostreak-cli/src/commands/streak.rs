use algostreak_core::{Config, CoreError, StreakStore};
use clap::Subcommand;

use super::{open_service, print_json, resolve_user, CmdResult};

#[derive(Subcommand)]
pub enum StreakAction {
    /// Show the streak card
    Show {
        #[arg(long)]
        user: Option<String>,
    },
    /// Claim the weekly reward
    Claim {
        #[arg(long)]
        user: Option<String>,
    },
    /// Show recent activity, newest first
    History {
        #[arg(long)]
        user: Option<String>,
        /// Maximum entries to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Show the raw stored record
    Raw {
        #[arg(long)]
        user: Option<String>,
    },
    /// List users with a stored streak
    Users,
}

pub fn run(action: StreakAction, config: &Config) -> CmdResult {
    let service = open_service()?;

    match action {
        StreakAction::Show { user } => {
            let user = resolve_user(user, config);
            match service.status(&user)? {
                Some(status) => print_json(&status),
                None => Err(CoreError::NoRecord { user_id: user }.into()),
            }
        }
        StreakAction::Claim { user } => {
            let user = resolve_user(user, config);
            let record = service.claim_reward(&user)?;
            print_json(&record)
        }
        StreakAction::History { user, limit } => {
            let user = resolve_user(user, config);
            print_json(&service.history(&user, limit)?)
        }
        StreakAction::Raw { user } => {
            let user = resolve_user(user, config);
            match service.store().get(&user)? {
                Some(record) => print_json(&record),
                None => Err(CoreError::NoRecord { user_id: user }.into()),
            }
        }
        StreakAction::Users => print_json(&service.store().users()?),
    }
}
