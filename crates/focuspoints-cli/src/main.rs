use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "focuspoints", version, about = "focuspoints CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Focus session control
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Reward codes
    Rewards {
        #[command(subcommand)]
        action: commands::rewards::RewardsAction,
    },
    /// Thresholds and time windows
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Engine policy (config.toml)
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Trial and subscription
    Trial {
        #[command(subcommand)]
        action: commands::trial::TrialAction,
    },
    /// Points, streak and today's clean minutes
    Status,
    /// Erase all stored state and restore default settings
    Reset,
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("FOCUSPOINTS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Session { action } => commands::session::run(action),
        Commands::Rewards { action } => commands::rewards::run(action),
        Commands::Settings { action } => commands::settings::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Trial { action } => commands::trial::run(action),
        Commands::Status => commands::status::run(),
        Commands::Reset => commands::status::reset(),
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "focuspoints",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
