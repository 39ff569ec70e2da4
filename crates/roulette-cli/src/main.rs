use clap::{Parser, Subcommand};
use roulette_core::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "roulette", version, about = "Daily Roulette CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the profile card and today's screen
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Interactive session: spin, confirm, redo and manage items
    Play {
        /// Skip the spin animation
        #[arg(long)]
        no_animation: bool,
    },
    /// Discard today's completed decision
    Redo,
    /// Item list management
    Items {
        #[command(subcommand)]
        action: commands::items::ItemsAction,
    },
    /// Erase points, streak and today's decision (items are kept)
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
    /// Show the level for a point total
    Level {
        points: u32,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_env("ROULETTE_LOG")
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() {
    let cli = Cli::parse();
    let config = Config::load_or_default();
    init_tracing(&config);

    let result = match cli.command {
        Commands::Status { json } => commands::status::run(&config, json),
        Commands::Play { no_animation } => commands::play::run(&config, no_animation),
        Commands::Redo => commands::status::redo(&config),
        Commands::Items { action } => commands::items::run(&config, action),
        Commands::Reset { yes } => commands::reset::run(&config, yes),
        Commands::Level { points } => commands::level::run(points),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
