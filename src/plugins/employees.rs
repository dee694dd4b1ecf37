use crate::core::assignment::AssignmentManager;
use crate::core::error::SeatAllocError;
use crate::core::model::Placement;
use crate::core::output;
use crate::core::request::{EmployeeRequest, EmployeeUpdateRequest, IdField};
use crate::plugins::{OutputFormat, finish};
use clap::{Parser, Subcommand};
use serde_json::Value as JsonValue;

#[derive(Parser, Debug)]
#[clap(name = "employees", about = "Manage employees and their seat assignments.")]
pub struct EmployeesCli {
    /// Output format for this command group.
    #[clap(long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,
    #[clap(subcommand)]
    pub command: EmployeesCommand,
}

#[derive(Subcommand, Debug)]
pub enum EmployeesCommand {
    /// List employees.
    List {
        /// Only employees with this kind of placement.
        #[clap(long, value_enum)]
        placement: Option<Placement>,
    },
    /// Get an employee by ID.
    Get {
        #[clap(long)]
        id: i64,
    },
    /// Get the employee whose seat reference names a seat.
    BySeat {
        #[clap(long)]
        seat: String,
    },
    /// Search by id, name, role, department or seat.
    Search {
        #[clap(long)]
        query: String,
    },
    /// Add an employee, optionally assigning a seat.
    Create {
        #[clap(long)]
        id: Option<String>,
        #[clap(long)]
        name: Option<String>,
        #[clap(long)]
        role: Option<String>,
        #[clap(long)]
        department: Option<String>,
        /// Seat id, "Unassigned" or "Work From Home". Defaults to Unassigned.
        #[clap(long)]
        seat: Option<String>,
        /// Full request body as JSON; replaces the individual flags.
        #[clap(long, conflicts_with_all = ["id", "name", "role", "department", "seat"])]
        json: Option<String>,
    },
    /// Update an employee's details and/or move their seat.
    Update {
        #[clap(long)]
        id: i64,
        #[clap(long)]
        name: Option<String>,
        #[clap(long)]
        role: Option<String>,
        #[clap(long)]
        department: Option<String>,
        /// New seat reference. Omit to keep the current seat.
        #[clap(long)]
        seat: Option<String>,
        /// Request body as JSON; replaces the individual flags.
        #[clap(long, conflicts_with_all = ["name", "role", "department", "seat"])]
        json: Option<String>,
    },
    /// Delete an employee, releasing their seat.
    Delete {
        #[clap(long)]
        id: i64,
    },
    /// Release the seat an employee occupies. Safe to repeat.
    Release {
        #[clap(long)]
        id: i64,
    },
    /// Seating allocation report.
    Report,
}

fn create_request(command: &EmployeesCommand) -> Result<EmployeeRequest, SeatAllocError> {
    match command {
        EmployeesCommand::Create {
            json: Some(body), ..
        } => EmployeeRequest::from_json(body),
        EmployeesCommand::Create {
            id,
            name,
            role,
            department,
            seat,
            json: None,
        } => Ok(EmployeeRequest {
            employeeid: id.clone().map(IdField::Text),
            name: name.clone(),
            role: role.clone(),
            department: department.clone(),
            seat_id: seat.clone(),
        }),
        _ => Err(SeatAllocError::ValidationFailed(
            "not a create command".to_string(),
        )),
    }
}

fn update_request(command: &EmployeesCommand) -> Result<EmployeeUpdateRequest, SeatAllocError> {
    match command {
        EmployeesCommand::Update {
            json: Some(body), ..
        } => EmployeeUpdateRequest::from_json(body),
        EmployeesCommand::Update {
            name,
            role,
            department,
            seat,
            json: None,
            ..
        } => Ok(EmployeeUpdateRequest {
            name: name.clone(),
            role: role.clone(),
            department: department.clone(),
            seat_id: seat.clone(),
        }),
        _ => Err(SeatAllocError::ValidationFailed(
            "not an update command".to_string(),
        )),
    }
}

fn cmd_name(command: &EmployeesCommand) -> &'static str {
    match command {
        EmployeesCommand::List { .. } => "employees.list",
        EmployeesCommand::Get { .. } => "employees.get",
        EmployeesCommand::BySeat { .. } => "employees.by_seat",
        EmployeesCommand::Search { .. } => "employees.search",
        EmployeesCommand::Create { .. } => "employees.create",
        EmployeesCommand::Update { .. } => "employees.update",
        EmployeesCommand::Delete { .. } => "employees.delete",
        EmployeesCommand::Release { .. } => "employees.release",
        EmployeesCommand::Report => "employees.report",
    }
}

fn execute(
    mgr: &AssignmentManager,
    command: &EmployeesCommand,
) -> Result<(JsonValue, String), SeatAllocError> {
    match command {
        EmployeesCommand::List { placement } => {
            let items = match placement {
                Some(p) => mgr.list_employees_by_placement(*p)?,
                None => mgr.list_employees()?,
            };
            let text = output::render_employees(&items);
            Ok((serde_json::json!({ "count": items.len(), "items": items }), text))
        }
        EmployeesCommand::Get { id } => {
            let employee = mgr
                .get_employee(*id)?
                .ok_or(SeatAllocError::EmployeeNotFound(*id))?;
            let text = output::render_employee(&employee);
            Ok((serde_json::json!({ "item": employee }), text))
        }
        EmployeesCommand::BySeat { seat } => {
            let employee = mgr.get_employee_by_seat(seat)?;
            let text = match &employee {
                Some(e) => output::render_employee(e),
                None => format!("No employee assigned to seat {}", seat.trim()),
            };
            Ok((
                serde_json::json!({ "found": employee.is_some(), "item": employee }),
                text,
            ))
        }
        EmployeesCommand::Search { query } => {
            let items = mgr.search_employees(query)?;
            let text = output::render_employees(&items);
            Ok((
                serde_json::json!({ "query": query, "count": items.len(), "items": items }),
                text,
            ))
        }
        EmployeesCommand::Create { .. } => {
            let new = create_request(command)?.validate()?;
            let out = mgr.create_employee(new)?;
            let text = format!("{}\n{}", out.message, output::render_employee(&out.employee));
            Ok((serde_json::to_value(&out)?, text))
        }
        EmployeesCommand::Update { id, .. } => {
            let update = update_request(command)?.validate()?;
            let out = mgr.update_employee(*id, update)?;
            let text = format!("{}\n{}", out.message, output::render_employee(&out.employee));
            Ok((serde_json::to_value(&out)?, text))
        }
        EmployeesCommand::Delete { id } => {
            let message = mgr.delete_employee(*id)?;
            Ok((serde_json::json!({ "message": message }), message))
        }
        EmployeesCommand::Release { id } => {
            let released = mgr.release_seat_by_employee(*id)?;
            let message = match &released {
                Some(seat) => format!("Seat {} released", seat.id),
                None => format!("Employee {} holds no seat", id),
            };
            Ok((
                serde_json::json!({ "message": message, "released": released }),
                message,
            ))
        }
        EmployeesCommand::Report => {
            let rows = mgr.seating_report()?;
            let text = output::render_report(&rows);
            Ok((serde_json::json!({ "count": rows.len(), "rows": rows }), text))
        }
    }
}

pub fn run_employees_cli(mgr: &AssignmentManager, cli: EmployeesCli) -> Result<(), SeatAllocError> {
    let cmd = cmd_name(&cli.command);
    finish(cli.format, cmd, execute(mgr, &cli.command))
}

pub fn schema() -> JsonValue {
    serde_json::json!({
        "name": "employees",
        "version": "0.1.0",
        "description": "Employee records and their seat assignments",
        "commands": [
            { "name": "list", "parameters": ["placement"] },
            { "name": "get", "parameters": ["id"] },
            { "name": "by-seat", "parameters": ["seat"] },
            { "name": "search", "parameters": ["query"] },
            { "name": "create", "parameters": ["id", "name", "role", "department", "seat", "json"] },
            { "name": "update", "parameters": ["id", "name", "role", "department", "seat", "json"] },
            { "name": "delete", "parameters": ["id"] },
            { "name": "release", "parameters": ["id"] },
            { "name": "report" }
        ],
        "sentinels": [crate::core::model::UNASSIGNED, crate::core::model::WORK_FROM_HOME],
        "storage": [crate::core::schemas::SEATS_DB_NAME]
    })
}
