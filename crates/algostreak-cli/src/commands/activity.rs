use algostreak_core::Config;
use clap::Subcommand;

use super::{open_service, print_json, resolve_date, resolve_user, CmdResult};

#[derive(Subcommand)]
pub enum ActivityAction {
    /// Record activity for today
    Record {
        /// User id (defaults to config user.default_user)
        #[arg(long)]
        user: Option<String>,
        /// Activity date as YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
}

pub fn run(action: ActivityAction, config: &Config) -> CmdResult {
    match action {
        ActivityAction::Record { user, date } => {
            let user = resolve_user(user, config);
            let today = resolve_date(date.as_deref())?;
            let outcome = open_service()?.record_activity(&user, today)?;
            print_json(&outcome)
        }
    }
}
