//! Operator tool for tournament session generation.
//!
//! Connects to the tournament database and runs one command against one
//! tournament: generate (or preview) its sessions, reset them, move it through
//! the lifecycle, or print its status history.

mod config;
mod logging;

use std::sync::Arc;

use anyhow::{Context, Error, bail};
use chrono::SecondsFormat;
use log::info;
use pico_args::Arguments;
use tournament_sessions::{
    GenerationOutcome, LifecycleManager, SessionGenerationCoordinator, TournamentStatus,
    db::Database,
    tournament::{TournamentId, VenueId},
};

use config::GeneratorConfig;

const HELP: &str = "\
Generate tournament sessions and manage the tournament lifecycle

USAGE:
  ts_generator <COMMAND> <TOURNAMENT_ID> [ARGS] [OPTIONS]

COMMANDS:
  generate    <ID>            Generate and store all sessions
  preview     <ID>            Generate without storing anything
  reset       <ID>            Delete generated sessions so they can be regenerated
  transition  <ID> <STATUS>   Move the tournament to STATUS (e.g. IN_PROGRESS)
  history     <ID>            Print the status history

OPTIONS:
  --db-url     URL            Database connection string  [default: env DATABASE_URL]
  --fields     N              Parallel fields             [default: env TS_PARALLEL_FIELDS or 1]
  --duration   MINUTES        Session length              [default: env TS_SESSION_DURATION or 90]
  --break      MINUTES        Break between sessions      [default: env TS_BREAK_MINUTES or 15]
  --rounds     N              Rounds per ranking session  [default: env TS_NUMBER_OF_ROUNDS or 1]
  --venue      ID             Venue for the group stage (repeat for several venues)
  --reason     TEXT           Note stored with a status change

FLAGS:
  --dry-run                   Same as the preview command
  --json                      Print the outcome as JSON
  -h, --help                  Print help information

ENVIRONMENT:
  DATABASE_URL                PostgreSQL connection string
  DB_MAX_CONNECTIONS          Pool size and other DB_* pool settings
  RUST_LOG                    Log filter (default: info,sqlx=warn)
  Variables are also read from a .env file in the working directory.
";

enum Command {
    Generate { dry_run: bool },
    Reset,
    Transition(TournamentStatus),
    History,
}

struct Args {
    command: Command,
    tournament_id: TournamentId,
    database_url: Option<String>,
    fields: Option<u32>,
    duration: Option<u32>,
    break_minutes: Option<u32>,
    rounds: Option<u32>,
    venues: Vec<VenueId>,
    reason: Option<String>,
    json: bool,
}

fn parse_args() -> Result<Args, Error> {
    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let command = pargs.subcommand()?.context("missing command, see --help")?;
    let dry_run = pargs.contains("--dry-run");
    let json = pargs.contains("--json");
    let database_url = pargs.opt_value_from_str("--db-url")?;
    let fields = pargs.opt_value_from_str("--fields")?;
    let duration = pargs.opt_value_from_str("--duration")?;
    let break_minutes = pargs.opt_value_from_str("--break")?;
    let rounds = pargs.opt_value_from_str("--rounds")?;
    let venues = pargs.values_from_str("--venue")?;
    let reason = pargs.opt_value_from_str("--reason")?;

    let tournament_id: TournamentId = pargs
        .free_from_str()
        .context("missing or invalid tournament id")?;

    let command = match command.as_str() {
        "generate" => Command::Generate { dry_run },
        "preview" => Command::Generate { dry_run: true },
        "reset" => Command::Reset,
        "transition" => Command::Transition(
            pargs
                .free_from_str()
                .context("missing or invalid target status")?,
        ),
        "history" => Command::History,
        other => bail!("unknown command '{other}', see --help"),
    };

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        bail!("unexpected arguments: {remaining:?}");
    }

    Ok(Args {
        command,
        tournament_id,
        database_url,
        fields,
        duration,
        break_minutes,
        rounds,
        venues,
        reason,
        json,
    })
}

fn print_generation(outcome: &GenerationOutcome, json: bool) -> Result<(), Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }

    println!("{}", outcome.message);
    if !outcome.success {
        return Ok(());
    }
    for session in &outcome.sessions {
        println!(
            "  {} {} - {}  field {:<2} {:<12} {}{}",
            session.start_time.format("%Y-%m-%d %H:%M"),
            session.end_time.format("%H:%M"),
            session.location.as_deref().unwrap_or("-"),
            session.metadata.field_number.unwrap_or_default(),
            session.phase,
            session.title,
            session
                .metadata
                .seeding
                .as_deref()
                .map(|s| format!(" ({s})"))
                .unwrap_or_default()
        );
    }
    if !outcome.sessions.is_empty() {
        println!("{}", outcome.summary());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let args = parse_args()?;

    logging::init();

    let mut config = GeneratorConfig::from_env(args.database_url.clone())?;
    if let Some(fields) = args.fields {
        config.schedule.parallel_fields = fields;
    }
    if let Some(duration) = args.duration {
        config.schedule.session_duration_minutes = duration;
    }
    if let Some(break_minutes) = args.break_minutes {
        config.schedule.break_minutes = break_minutes;
    }
    if let Some(rounds) = args.rounds {
        config.schedule.number_of_rounds = rounds;
    }
    config.validate()?;

    let db = Database::new(&config.database)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;
    db.health_check()
        .await
        .map_err(|e| anyhow::anyhow!("Database health check failed: {}", e))?;
    info!("Database connected successfully");

    let store = Arc::new(db.store());
    let id = args.tournament_id;

    let success = match args.command {
        Command::Generate { dry_run } => {
            let coordinator = SessionGenerationCoordinator::new(store);
            let request = config.request(args.venues);
            let outcome = if dry_run {
                coordinator.preview(id, &request).await
            } else {
                coordinator.generate(id, &request).await
            }
            .map_err(|e| anyhow::anyhow!("Generation failed: {}", e))?;
            print_generation(&outcome, args.json)?;
            outcome.success
        }
        Command::Reset => {
            let outcome = SessionGenerationCoordinator::new(store)
                .reset(id)
                .await
                .map_err(|e| anyhow::anyhow!("Reset failed: {}", e))?;
            print_generation(&outcome, args.json)?;
            outcome.success
        }
        Command::Transition(to) => {
            let outcome = LifecycleManager::new(store)
                .transition(id, to, args.reason)
                .await
                .map_err(|e| anyhow::anyhow!("Transition failed: {}", e))?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                println!("{}", outcome.message);
            }
            outcome.success
        }
        Command::History => {
            let history = LifecycleManager::new(store)
                .history(id)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to load history: {}", e))?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&history)?);
            } else {
                for entry in &history {
                    println!(
                        "{}  {} -> {}{}",
                        entry.changed_at.to_rfc3339_opts(SecondsFormat::Secs, true),
                        entry.from.map_or("NEW", |s| s.as_str()),
                        entry.to,
                        entry
                            .reason
                            .as_deref()
                            .map(|r| format!("  ({r})"))
                            .unwrap_or_default()
                    );
                }
            }
            true
        }
    };

    db.close().await;

    if !success {
        std::process::exit(1);
    }
    Ok(())
}
