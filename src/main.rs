//! Main entry point for the kart-rating tool
//!
//! Loads configuration, sets up logging, and runs one command against the
//! CSV rating store.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use kart_rating::config::AppConfig;
use kart_rating::prompt::prompt_match_results;
use kart_rating::rating::{add_players, CsvRatingStore, RatingCalculator, RatingStore};
use kart_rating::types::SessionSummary;
use kart_rating::utils::round_to;
use std::io;
use std::path::PathBuf;
use tracing::{debug, error, info};

/// Kart Rating - Elo-derived ratings for multiplayer kart races
#[derive(Parser)]
#[command(
    name = "kart-rating",
    version,
    about = "Track Elo-style ratings for multiplayer kart races",
    long_about = "Kart Rating keeps one rating per player in a CSV file and updates it after \
                 each race from placement and points scored, treating empty seats of the \
                 12-kart field as bots with a flat rating."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Rating store override
    #[arg(short, long, value_name = "FILE", help = "Override rating store CSV path")]
    store: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Enter results for a race and update ratings
    Rate {
        /// Players in the race, in the order to be prompted
        #[arg(required = true)]
        players: Vec<String>,

        /// Compute and print new ratings without saving them
        #[arg(long)]
        dry_run: bool,
    },
    /// Add new players at the initial rating
    AddPlayers {
        #[arg(required = true)]
        players: Vec<String>,
    },
    /// Print every stored rating
    Show,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    // Apply CLI overrides
    if let Some(store) = &args.store {
        config.store.path = store.clone();
    }

    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    kart_rating::config::validate_config(&config)?;
    Ok(config)
}

fn print_summary(summary: &SessionSummary) {
    println!(
        "{:<16} {:>10} {:>5} {:>8} {:>9} {:>10} {:>9}",
        "Player", "Old", "Rank", "Points", "Expected", "New", "Change"
    );
    for change in &summary.changes {
        println!(
            "{:<16} {:>10.2} {:>5} {:>8.2} {:>8.2}% {:>10.2} {:>+9.2}",
            change.name,
            change.old_rating,
            change.rank,
            change.points,
            change.expected_outcome,
            round_to(change.new_rating, 2),
            change.rating_delta()
        );
    }
}

fn run_rate(config: &AppConfig, store: &dyn RatingStore, players: &[String], dry_run: bool) -> Result<()> {
    let mut calculator = RatingCalculator::from_store(players, store, config.rating.clone())?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    let skipped = prompt_match_results(&mut calculator, &mut input, &mut output)?;
    if !skipped.is_empty() {
        bail!("No valid result entered for: {}", skipped.join(", "));
    }

    let summary = calculator.new_elo()?;
    print_summary(&summary);

    if dry_run {
        info!("Dry run, rating store left unchanged");
        return Ok(());
    }

    calculator.update_store(store)?;
    Ok(())
}

fn run_add_players(config: &AppConfig, store: &dyn RatingStore, players: &[String]) -> Result<()> {
    let table = add_players(store, players, config.rating.initial_rating)?;
    for (name, rating) in table.ratings() {
        match rating {
            Ok(rating) => println!("{:<16} {:>10}", name, rating),
            Err(_) => println!("{:<16} {:>10}", name, "?"),
        }
    }
    Ok(())
}

fn run_show(store: &dyn RatingStore) -> Result<()> {
    let table = store.load()?;
    if table.is_empty() {
        println!("No players in rating store");
        return Ok(());
    }
    for (name, rating) in table.ratings() {
        println!("{:<16} {:>10}", name, rating?);
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    debug!(
        "{} v{} using store {}",
        config.service.name,
        kart_rating::VERSION,
        config.store.path.display()
    );

    let store = CsvRatingStore::new(&config.store.path);
    let result = match &args.command {
        Command::Rate { players, dry_run } => run_rate(&config, &store, players, *dry_run),
        Command::AddPlayers { players } => run_add_players(&config, &store, players),
        Command::Show => run_show(&store),
    };

    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
