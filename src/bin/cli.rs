//! UlSTU schedule CLI
//!
//! Prints day and week schedules of groups, teachers and rooms.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use ulstu_schedule::{
    error::{AppError, Result},
    format,
    models::{Config, EntityKind},
    services::{DayQuery, ScheduleService},
    utils::http::HttpSource,
};

/// UlSTU timetable scraper
#[derive(Parser, Debug)]
#[command(
    name = "ulstu-schedule",
    version,
    about = "Scrapes UlSTU timetable pages into day and week schedules"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show one day (today by default)
    Day {
        /// group, teacher or room
        kind: EntityKind,
        name: String,

        /// Days after today
        #[arg(long, allow_hyphen_values = true)]
        offset: Option<i64>,

        /// Date as dd.mm
        #[arg(long, conflicts_with = "offset")]
        date: Option<String>,

        /// Weekday of the current week, e.g. "среда"
        #[arg(long, conflicts_with_all = ["offset", "date"])]
        weekday: Option<String>,
    },

    /// Show the current (or next) teaching week
    Week {
        kind: EntityKind,
        name: String,

        #[arg(long)]
        next: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print the full two-week schedule as JSON
    Full { kind: EntityKind, name: String },

    /// List group or teacher names from the directory pages
    List { kind: EntityKind },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging: verbose wins, then the configured level.
fn init_logging(verbose: bool, configured: &str) {
    let level = if verbose { "debug" } else { configured };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = Config::load(&cli.config);
    let level = loaded
        .as_ref()
        .map(|c| c.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());
    init_logging(cli.verbose, &level);

    let config = loaded.unwrap_or_else(|e| {
        log::warn!(
            "Config load failed from {}: {}. Using defaults.",
            cli.config.display(),
            e
        );
        Config::default()
    });

    if let Command::Validate = cli.command {
        log::info!("Validating configuration...");
        if let Err(e) = config.validate() {
            log::error!("Config validation failed: {}", e);
            return Err(e);
        }
        log::info!("✓ Config OK");
        return Ok(());
    }

    let source = HttpSource::from_config(&config.http)?;
    let service = ScheduleService::new(&source, &config);
    let today: NaiveDate = Local::now().date_naive();

    match cli.command {
        Command::Day {
            kind,
            name,
            offset,
            date,
            weekday,
        } => {
            let query = match (offset, date, weekday) {
                (_, Some(date), _) => DayQuery::Date(date),
                (_, _, Some(weekday)) => DayQuery::Weekday(weekday),
                (offset, _, _) => DayQuery::Offset(offset.unwrap_or(0)),
            };
            let report = service.day(kind, &name, &query, today).await?;
            println!(
                "{}",
                format::day_text(kind, &name, &report.day, report.date, today)
            );
        }

        Command::Week {
            kind,
            name,
            next,
            json,
        } => {
            let (slot, week) = service.week(kind, &name, next, today).await?;
            log::debug!("Week slot {} for {}", slot, name);
            if json {
                println!("{}", serde_json::to_string_pretty(&week)?);
            } else {
                println!("{}", format::week_text(kind, &name, &week));
            }
        }

        Command::Full { kind, name } => {
            let schedule = service.full(kind, &name, today).await?;
            println!("{}", serde_json::to_string_pretty(&schedule)?);
        }

        Command::List { kind } => {
            if kind == EntityKind::Room {
                return Err(AppError::config("rooms have no directory page"));
            }
            for name in service.resolver().list(kind).await? {
                println!("{name}");
            }
        }

        Command::Validate => {}
    }

    Ok(())
}
