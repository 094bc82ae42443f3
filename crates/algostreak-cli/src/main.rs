use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "algostreak-cli", version, about = "Daily practice streak tracker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record practice activity
    Activity {
        #[command(subcommand)]
        action: commands::activity::ActivityAction,
    },
    /// Streak status and rewards
    Streak {
        #[command(subcommand)]
        action: commands::streak::StreakAction,
    },
    /// Practice reminder settings
    Reminder {
        #[command(subcommand)]
        action: commands::reminder::ReminderAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

/// Log to stderr so stdout stays machine-readable.
fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_env("ALGOSTREAK_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    let (config, load_error) = match algostreak_core::Config::load() {
        Ok(config) => (config, None),
        Err(e) => (algostreak_core::Config::default(), Some(e)),
    };
    init_tracing(&config.log.filter);
    if let Some(e) = load_error {
        tracing::warn!(error = %e, "falling back to default config");
    }

    let result = match cli.command {
        Commands::Activity { action } => commands::activity::run(action, &config),
        Commands::Streak { action } => commands::streak::run(action, &config),
        Commands::Reminder { action } => commands::reminder::run(action, config),
        Commands::Config { action } => commands::config::run(action, config),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "algostreak-cli", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "command failed");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
