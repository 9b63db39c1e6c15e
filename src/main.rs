// Planman - month calendar for the terminal
// Main entry point for the command-line front end

use clap::{Parser, Subcommand};
use log::{error, info};
use planman::utils::logging;
use planman::{
    source_from_config, AppResult, CalendarController, CalendarDate, CalendarViewState,
    DisplayCache, Message, MonthEventIndex, MonthIndexBuilder, MonthKey, PlannerConfig, NO_EVENTS,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "planman", version, about = "Show the events of a calendar month")]
struct Cli {
    /// Config file (defaults to <config dir>/planman/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print each day of a month that has events
    Agenda {
        /// Year, defaults to the current one
        #[arg(long)]
        year: Option<String>,
        /// Month number 1-12, defaults to the current one
        #[arg(long)]
        month: Option<String>,
        /// Print the month index as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the events of one day
    Day {
        /// Date as YYYY-MM-DD, defaults to today
        #[arg(long)]
        date: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = logging::init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        error!("{}", e);
        eprintln!("{}", e.to_safe_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let config = PlannerConfig::load(cli.config.as_deref())?;
    let builder = MonthIndexBuilder::new(source_from_config(&config)?);
    info!("Starting planman with source {}", builder.source_name());

    match cli.command {
        Commands::Agenda { year, month, json } => {
            let key = requested_month(year, month)?;
            let mut cache = DisplayCache::new(builder);
            let index = cache.ensure(key).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(index)?);
            } else {
                print_agenda(index);
            }
        }
        Commands::Day { date } => {
            let date = match date {
                Some(value) => CalendarDate::parse(&value)?,
                None => CalendarDate::today(),
            };
            let mut controller =
                CalendarController::new(DisplayCache::new(builder), CalendarViewState::new(date)?);
            let view = controller.handle(Message::SelectDate(date)).await;
            if let Some(notice) = view.notice {
                eprintln!("{}", notice);
                std::process::exit(1);
            }
            println!("{}", view.date);
            for line in view.display_lines() {
                println!("  {}", line);
            }
        }
    }

    Ok(())
}

fn requested_month(year: Option<String>, month: Option<String>) -> AppResult<MonthKey> {
    let current = MonthKey::current()?;
    match (year, month) {
        (None, None) => Ok(current),
        (year, month) => MonthKey::parse(
            &year.unwrap_or_else(|| current.year().to_string()),
            &month.unwrap_or_else(|| current.month().to_string()),
        ),
    }
}

fn print_agenda(index: &MonthEventIndex) {
    println!("{}", index.month());
    if index.is_empty() {
        println!("  {}", NO_EVENTS);
        return;
    }
    for (date, events) in index.iter() {
        println!("{}", date);
        for event in events {
            println!("  {}", event);
        }
    }
}
