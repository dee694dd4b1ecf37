use crate::core::assignment::{AssignmentManager, SeatSeed};
use crate::core::error::SeatAllocError;
use crate::core::model::SeatStatus;
use crate::core::output;
use crate::plugins::{OutputFormat, finish};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[clap(name = "seats", about = "Inspect seats and seed the seat inventory.")]
pub struct SeatsCli {
    /// Output format for this command group.
    #[clap(long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,
    #[clap(subcommand)]
    pub command: SeatsCommand,
}

#[derive(Subcommand, Debug)]
pub enum SeatsCommand {
    /// List seats.
    List {
        #[clap(long, value_enum)]
        status: Option<SeatStatus>,
    },
    /// List vacant seats.
    Vacant,
    /// Show a seat and, when occupied, who sits there.
    Detail {
        #[clap(long)]
        seat: String,
    },
    /// Add seats from a TOML seed file. Existing seats are left alone.
    Seed {
        #[clap(long)]
        file: PathBuf,
    },
}

/// Seed file layout:
///
/// ```toml
/// [[seat]]
/// id = "A1"
///
/// [[seat]]
/// id = "R1"
/// status = "reserved"
/// ```
#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    seat: Vec<SeedEntry>,
}

#[derive(Debug, Deserialize)]
struct SeedEntry {
    id: String,
    #[serde(default)]
    status: Option<String>,
}

pub fn parse_seed(content: &str) -> Result<Vec<SeatSeed>, SeatAllocError> {
    let file: SeedFile = toml::from_str(content)
        .map_err(|e| SeatAllocError::ValidationFailed(format!("Invalid seat seed file: {}", e)))?;
    file.seat
        .into_iter()
        .map(|entry| -> Result<SeatSeed, SeatAllocError> {
            let status = match entry.status.as_deref() {
                Some(s) => s.parse::<SeatStatus>()?,
                None => SeatStatus::Vacant,
            };
            Ok(SeatSeed {
                id: entry.id.trim().to_string(),
                status,
            })
        })
        .collect()
}

pub fn load_seed_file(path: &Path) -> Result<Vec<SeatSeed>, SeatAllocError> {
    let content = fs::read_to_string(path)?;
    parse_seed(&content)
}

fn cmd_name(command: &SeatsCommand) -> &'static str {
    match command {
        SeatsCommand::List { .. } => "seats.list",
        SeatsCommand::Vacant => "seats.vacant",
        SeatsCommand::Detail { .. } => "seats.detail",
        SeatsCommand::Seed { .. } => "seats.seed",
    }
}

fn execute(
    mgr: &AssignmentManager,
    command: &SeatsCommand,
) -> Result<(JsonValue, String), SeatAllocError> {
    match command {
        SeatsCommand::List { status } => {
            let seats = match status {
                Some(s) => mgr.list_seats_by_status(*s)?,
                None => mgr.list_seats()?,
            };
            let text = output::render_seats(&seats);
            Ok((serde_json::json!({ "count": seats.len(), "seats": seats }), text))
        }
        SeatsCommand::Vacant => {
            let seats = mgr.list_vacant_seats()?;
            let text = output::render_seats(&seats);
            Ok((serde_json::json!({ "count": seats.len(), "seats": seats }), text))
        }
        SeatsCommand::Detail { seat } => {
            let detail = mgr.seat_detail(seat)?;
            let text = output::render_seat_detail(&detail);
            Ok((serde_json::json!({ "seat": detail }), text))
        }
        SeatsCommand::Seed { file } => {
            let seeds = load_seed_file(file)?;
            let inserted = mgr.seed_seats(&seeds)?;
            let text = format!(
                "Seeded {} new seat(s); {} already present",
                inserted,
                seeds.len() - inserted
            );
            Ok((
                serde_json::json!({ "requested": seeds.len(), "inserted": inserted }),
                text,
            ))
        }
    }
}

pub fn run_seats_cli(mgr: &AssignmentManager, cli: SeatsCli) -> Result<(), SeatAllocError> {
    let cmd = cmd_name(&cli.command);
    finish(cli.format, cmd, execute(mgr, &cli.command))
}

pub fn schema() -> JsonValue {
    serde_json::json!({
        "name": "seats",
        "version": "0.1.0",
        "description": "Seat inventory and occupancy",
        "commands": [
            { "name": "list", "parameters": ["status"] },
            { "name": "vacant" },
            { "name": "detail", "parameters": ["seat"] },
            { "name": "seed", "parameters": ["file"] }
        ],
        "statuses": ["VACANT", "RESERVED", "OCCUPIED"],
        "storage": [crate::core::schemas::SEATS_DB_NAME]
    })
}
