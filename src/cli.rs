//! CLI struct definitions for the `seatalloc` binary.
//!
//! Command groups own their argument types; this file only wires them together.

use crate::plugins::{doctor, employees, seats};

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "seatalloc",
    version = env!("CARGO_PKG_VERSION"),
    about = "Office seat allotment. Keeps seat occupancy and employee seat assignments in agreement.",
    disable_version_flag = true
)]
pub(crate) struct Cli {
    /// Store directory. Overrides SEATALLOC_HOME and the config file.
    #[clap(long, global = true)]
    pub root: Option<PathBuf>,
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Create the store and, optionally, seed seats from a TOML file.
    Init {
        #[clap(long)]
        seats: Option<PathBuf>,
    },
    /// Employee records and seat assignments.
    #[clap(name = "employees", visible_alias = "emp")]
    Employees(employees::EmployeesCli),
    /// Seat inventory and occupancy.
    Seats(seats::SeatsCli),
    /// Check that seats and employees agree.
    Doctor(doctor::DoctorCli),
    /// Print the command schema as JSON.
    Schema,
    /// Print the version.
    Version,
}
