//! Seatalloc: office seat allotment.
//!
//! Every seat is VACANT, RESERVED or OCCUPIED, and every employee points at
//! exactly one seat or at a sentinel ("Unassigned", "Work From Home"). The
//! [`core::assignment::AssignmentManager`] is the only code that mutates
//! either side, and it does so inside one SQLite transaction per operation so
//! the two records never disagree.
//!
//! # Layout
//!
//! - `core`: store, broker, models, validation and the assignment manager
//! - `plugins`: the `employees`, `seats` and `doctor` command groups
//!
//! The `seatalloc` binary is a thin wrapper over [`run`].

pub mod core;
pub mod plugins;

mod cli;

use crate::cli::{Cli, Command};
use crate::core::assignment::AssignmentManager;
use crate::core::error::SeatAllocError;
use crate::core::store::PROJECT_DIR_NAME;
use crate::core::{config, db, logging};
use crate::plugins::{doctor, employees, seats};

use clap::Parser;
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Nearest ancestor holding a `.seatalloc` directory, else `start_dir`.
fn find_project_dir(start_dir: &Path) -> PathBuf {
    let mut current_dir = PathBuf::from(start_dir);
    loop {
        if current_dir.join(PROJECT_DIR_NAME).is_dir() {
            return current_dir;
        }
        if !current_dir.pop() {
            return start_dir.to_path_buf();
        }
    }
}

pub fn run() -> Result<(), SeatAllocError> {
    let cli = Cli::parse();
    let current_dir = std::env::current_dir()?;
    let project_dir = find_project_dir(&current_dir);
    let config = config::load_config(&project_dir)?;
    logging::init(&config.log.filter);

    let store = config.resolve_store(&project_dir, cli.root.as_deref());
    let busy_timeout = config.store.busy_timeout_secs;
    tracing::debug!(root = %store.root.display(), "store resolved");

    match cli.command {
        Command::Version => {
            println!("v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Command::Schema => {
            println!("{:#}", plugins::schema());
            Ok(())
        }
        Command::Init { seats: seed_file } => {
            db::initialize_seats_db(&store, busy_timeout)?;
            println!(
                "{} {}",
                "Initialized".green().bold(),
                store.db_path().display()
            );
            if let Some(path) = seed_file {
                let mgr = AssignmentManager::open(&store, busy_timeout)?;
                let seeds = seats::load_seed_file(&path)?;
                let inserted = mgr.seed_seats(&seeds)?;
                println!("Seeded {} of {} seat(s)", inserted, seeds.len());
            }
            Ok(())
        }
        Command::Employees(group) => {
            let mgr = AssignmentManager::open(&store, busy_timeout)?;
            employees::run_employees_cli(&mgr, group)
        }
        Command::Seats(group) => {
            let mgr = AssignmentManager::open(&store, busy_timeout)?;
            seats::run_seats_cli(&mgr, group)
        }
        Command::Doctor(group) => {
            let mgr = AssignmentManager::open(&store, busy_timeout)?;
            doctor::run_doctor_cli(&mgr, group)
        }
    }
}
