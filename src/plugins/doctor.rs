//! Consistency check across the seat and employee tables.

use crate::core::assignment::{AssignmentManager, ConsistencyReport, Violation};
use crate::core::error::SeatAllocError;
use crate::plugins::{OutputFormat, emit_ok};
use clap::Parser;
use colored::Colorize;
use serde_json::Value as JsonValue;

#[derive(Parser, Debug)]
#[clap(name = "doctor", about = "Verify that seats and employees agree.")]
pub struct DoctorCli {
    #[clap(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

fn describe(v: &Violation) -> String {
    match v {
        Violation::SeatStateInvalid { seat } => {
            format!("seat {} has a status that disagrees with its occupant", seat)
        }
        Violation::OccupantMissing { seat, employee_id } => {
            format!("seat {} is occupied by missing employee {}", seat, employee_id)
        }
        Violation::OccupantPointsElsewhere {
            seat,
            employee_id,
            employee_seat,
        } => format!(
            "seat {} is occupied by employee {} whose seat is {}",
            seat, employee_id, employee_seat
        ),
        Violation::SeatMissing { employee_id, seat } => {
            format!("employee {} references unknown seat {}", employee_id, seat)
        }
        Violation::SeatNotHeld {
            employee_id,
            seat,
            status,
            occupant,
        } => format!(
            "employee {} references seat {} which is {} (occupant: {})",
            employee_id,
            seat,
            status,
            occupant.map(|o| o.to_string()).unwrap_or_else(|| "none".to_string())
        ),
    }
}

pub fn render(report: &ConsistencyReport) -> String {
    let mut out = format!(
        "Checked {} seats and {} employees: ",
        report.seats_checked, report.employees_checked
    );
    if report.consistent {
        out.push_str(&"consistent".green().to_string());
        return out;
    }
    out.push_str(&format!("{} violation(s)", report.violations.len()).red().to_string());
    for v in &report.violations {
        out.push_str(&format!("\n  - {}", describe(v)));
    }
    out
}

/// Prints the report. Inconsistent data is reported as an internal failure
/// so the process exits non-zero.
pub fn run_doctor_cli(mgr: &AssignmentManager, cli: DoctorCli) -> Result<(), SeatAllocError> {
    let report = mgr.check_consistency()?;
    let payload = serde_json::to_value(&report)?;
    emit_ok(cli.format, "doctor.check", payload, &render(&report));
    if report.consistent {
        Ok(())
    } else {
        Err(SeatAllocError::Inconsistent(report.violations.len()))
    }
}

pub fn schema() -> JsonValue {
    serde_json::json!({
        "name": "doctor",
        "version": "0.1.0",
        "description": "Seat/employee consistency check",
        "commands": [{ "name": "doctor" }],
        "checks": [
            "seat_state_invalid",
            "occupant_missing",
            "occupant_points_elsewhere",
            "seat_missing",
            "seat_not_held"
        ]
    })
}
