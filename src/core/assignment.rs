//! Assignment Manager: the only component that mutates seats and employees.
//!
//! Every mutating operation runs as one `DbBroker::with_write` transaction.
//! Transitions are decided on the rows read inside that transaction, and seat
//! writes are compare-and-set on the status that was read, so two requests
//! racing for one vacant seat yield exactly one occupant.
//!
//! A seat reference that points at a seat the employee does not actually hold
//! is treated as stale: seats are released by occupant, the stale reference
//! is logged, and the operation proceeds.

use crate::core::broker::DbBroker;
use crate::core::db;
use crate::core::error::SeatAllocError;
use crate::core::model::{
    Employee, EmployeeUpdate, NewEmployee, Placement, Seat, SeatRef, SeatStatus,
};
use crate::core::repo::{EmployeeStore, SeatStore, SqliteRepo, UnitOfWork};
use crate::core::request;
use crate::core::store::Store;
use serde::Serialize;
use tracing::{info, warn};

/// Result of a successful employee mutation.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub message: String,
    pub employee: Employee,
}

/// Seat view for seat-detail queries. Employee fields are present only when
/// the seat is OCCUPIED by an employee that points back at it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatDetail {
    #[serde(rename = "seatId")]
    pub seat_id: String,
    pub status: SeatStatus,
    #[serde(rename = "employeeId", skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<i64>,
    #[serde(rename = "employeeName", skip_serializing_if = "Option::is_none")]
    pub employee_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    #[serde(rename = "employeeid")]
    pub employee_id: i64,
    pub name: String,
    pub department: String,
    pub role: String,
    pub seat: String,
}

/// Seat definition accepted by `seed_seats`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatSeed {
    pub id: String,
    pub status: SeatStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// Seat row whose status and occupant disagree.
    SeatStateInvalid { seat: String },
    /// OCCUPIED seat whose occupant does not exist.
    OccupantMissing { seat: String, employee_id: i64 },
    /// OCCUPIED seat whose occupant references a different seat.
    OccupantPointsElsewhere {
        seat: String,
        employee_id: i64,
        employee_seat: String,
    },
    /// Employee referencing a seat id that does not exist.
    SeatMissing { employee_id: i64, seat: String },
    /// Employee referencing a seat it does not occupy.
    SeatNotHeld {
        employee_id: i64,
        seat: String,
        status: SeatStatus,
        occupant: Option<i64>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct ConsistencyReport {
    pub seats_checked: usize,
    pub employees_checked: usize,
    pub consistent: bool,
    pub violations: Vec<Violation>,
}

pub struct AssignmentManager {
    store: Store,
    broker: DbBroker,
}

impl AssignmentManager {
    /// Open (and create if needed) the seat database under `store`.
    pub fn open(store: &Store, busy_timeout_secs: u32) -> Result<Self, SeatAllocError> {
        db::initialize_seats_db(store, busy_timeout_secs)?;
        Ok(Self {
            store: store.clone(),
            broker: DbBroker::new(store, busy_timeout_secs),
        })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    // --- Mutations ---

    pub fn create_employee(&self, new: NewEmployee) -> Result<Outcome, SeatAllocError> {
        let id = new.id;
        let res = self
            .broker
            .with_write("employees.create", |conn| create_in(&SqliteRepo::new(conn), new));
        match &res {
            Ok(out) => info!(employee = id, seat = %out.employee.seat, "employee created"),
            Err(e) => warn!(employee = id, error = %e, kind = %e.kind(), "create rejected"),
        }
        res
    }

    pub fn update_employee(
        &self,
        id: i64,
        update: EmployeeUpdate,
    ) -> Result<Outcome, SeatAllocError> {
        let res = self
            .broker
            .with_write("employees.update", |conn| update_in(&SqliteRepo::new(conn), id, update));
        match &res {
            Ok(out) => info!(employee = id, seat = %out.employee.seat, "employee updated"),
            Err(e) => warn!(employee = id, error = %e, kind = %e.kind(), "update rejected"),
        }
        res
    }

    /// Delete an employee, releasing any seat they occupy in the same
    /// transaction. Returns the confirmation message.
    pub fn delete_employee(&self, id: i64) -> Result<String, SeatAllocError> {
        let res = self
            .broker
            .with_write("employees.delete", |conn| delete_in(&SqliteRepo::new(conn), id));
        match &res {
            Ok(_) => info!(employee = id, "employee deleted"),
            Err(e) => warn!(employee = id, error = %e, kind = %e.kind(), "delete rejected"),
        }
        res
    }

    /// Release whatever seat is occupied by `employee_id`. Idempotent: a second
    /// call finds nothing and returns `None`. If the employee exists and
    /// referenced a physical seat, the reference becomes "Unassigned".
    pub fn release_seat_by_employee(&self, employee_id: i64) -> Result<Option<Seat>, SeatAllocError> {
        let released = self.broker.with_write("employees.release", |conn| {
            let repo = SqliteRepo::new(conn);
            let employee = repo.find_employee(employee_id)?;
            let held = employee.as_ref().map(|e| e.seat.clone()).unwrap_or(SeatRef::Unassigned);
            let released = release_held_seat(&repo, employee_id, &held)?;
            if let Some(mut employee) = employee
                && !employee.seat.is_sentinel()
            {
                employee.seat = SeatRef::Unassigned;
                repo.save_employee(&employee)?;
            }
            Ok(released)
        })?;
        if let Some(seat) = &released {
            info!(employee = employee_id, seat = %seat.id, "seat released");
        }
        Ok(released)
    }

    /// Insert seats that do not exist yet. Existing seats are never touched.
    pub fn seed_seats(&self, seeds: &[SeatSeed]) -> Result<usize, SeatAllocError> {
        for seed in seeds {
            request::validate_seat_id(&seed.id)?;
            if seed.status == SeatStatus::Occupied {
                return Err(SeatAllocError::ValidationFailed(format!(
                    "Seat {} cannot be seeded as OCCUPIED",
                    seed.id
                )));
            }
        }
        let inserted = self.broker.with_write("seats.seed", |conn| {
            let repo = SqliteRepo::new(conn);
            let mut inserted = 0;
            for seed in seeds {
                let seat = Seat {
                    id: seed.id.clone(),
                    status: seed.status,
                    employee_id: None,
                };
                if repo.insert_seat(&seat)? {
                    inserted += 1;
                }
            }
            Ok(inserted)
        })?;
        info!(requested = seeds.len(), inserted, "seats seeded");
        Ok(inserted)
    }

    // --- Lookups ---

    pub fn list_employees(&self) -> Result<Vec<Employee>, SeatAllocError> {
        self.broker
            .with_read("employees.list", |conn| SqliteRepo::new(conn).find_employees())
    }

    pub fn get_employee(&self, id: i64) -> Result<Option<Employee>, SeatAllocError> {
        self.broker
            .with_read("employees.get", |conn| SqliteRepo::new(conn).find_employee(id))
    }

    /// Employee whose seat reference names `seat_id`. Placeholder values are
    /// not physical seats and never match.
    pub fn get_employee_by_seat(&self, seat_id: &str) -> Result<Option<Employee>, SeatAllocError> {
        let seat = SeatRef::parse(seat_id);
        let Some(id) = seat.seat_id() else {
            return Ok(None);
        };
        self.broker.with_read("employees.by_seat", |conn| {
            SqliteRepo::new(conn).find_employee_by_seat(id)
        })
    }

    /// Case-insensitive substring match on id, name, role, department or seat.
    pub fn search_employees(&self, query: &str) -> Result<Vec<Employee>, SeatAllocError> {
        let needle = query.trim().to_lowercase();
        let all = self.list_employees()?;
        if needle.is_empty() {
            return Ok(all);
        }
        Ok(all
            .into_iter()
            .filter(|e| {
                e.id.to_string().contains(&needle)
                    || e.name.to_lowercase().contains(&needle)
                    || e.role.to_lowercase().contains(&needle)
                    || e.department.to_lowercase().contains(&needle)
                    || e.seat.as_str().to_lowercase().contains(&needle)
            })
            .collect())
    }

    pub fn list_employees_by_placement(
        &self,
        placement: Placement,
    ) -> Result<Vec<Employee>, SeatAllocError> {
        Ok(self
            .list_employees()?
            .into_iter()
            .filter(|e| placement.matches(&e.seat))
            .collect())
    }

    pub fn list_seats(&self) -> Result<Vec<Seat>, SeatAllocError> {
        self.broker
            .with_read("seats.list", |conn| SqliteRepo::new(conn).find_seats())
    }

    pub fn list_seats_by_status(&self, status: SeatStatus) -> Result<Vec<Seat>, SeatAllocError> {
        self.broker.with_read("seats.by_status", |conn| {
            SqliteRepo::new(conn).find_seats_by_status(status)
        })
    }

    pub fn list_vacant_seats(&self) -> Result<Vec<Seat>, SeatAllocError> {
        self.list_seats_by_status(SeatStatus::Vacant)
    }

    pub fn seat_detail(&self, seat_id: &str) -> Result<SeatDetail, SeatAllocError> {
        self.broker
            .with_read("seats.detail", |conn| seat_detail_in(&SqliteRepo::new(conn), seat_id.trim()))
    }

    pub fn seating_report(&self) -> Result<Vec<ReportRow>, SeatAllocError> {
        Ok(self
            .list_employees()?
            .into_iter()
            .map(|e| ReportRow {
                employee_id: e.id,
                name: e.name,
                department: e.department,
                role: e.role,
                seat: e.seat.to_string(),
            })
            .collect())
    }

    /// Scan both tables for breaks in the seat/employee back-references.
    pub fn check_consistency(&self) -> Result<ConsistencyReport, SeatAllocError> {
        let report = self
            .broker
            .with_read("doctor.check", |conn| check_in(&SqliteRepo::new(conn)))?;
        if !report.consistent {
            warn!(violations = report.violations.len(), "seat assignments inconsistent");
        }
        Ok(report)
    }
}

// --- Transaction bodies ---
//
// Each runs against one unit of work. Any `Err` aborts the surrounding
// transaction, so earlier writes in the same body are rolled back.

fn create_in<U: UnitOfWork>(uow: &U, new: NewEmployee) -> Result<Outcome, SeatAllocError> {
    if uow.find_employee(new.id)?.is_some() {
        return Err(SeatAllocError::Conflict(format!(
            "Employee with ID {} already exists",
            new.id
        )));
    }

    // A seat still pointing at this id belongs to a previous incarnation.
    release_held_seat(uow, new.id, &SeatRef::Unassigned)?;

    let (seat, message) = match new.seat {
        SeatRef::Seat(requested) => {
            let seat = occupy(uow, &requested, new.id)?;
            let message = format!("Employee assigned to seat {}", seat.id);
            (SeatRef::Seat(seat.id), message)
        }
        sentinel => {
            let message = format!("Employee assigned to {}", sentinel);
            (sentinel, message)
        }
    };

    let employee = Employee {
        id: new.id,
        name: new.name,
        role: new.role,
        department: new.department,
        seat,
    };
    uow.insert_employee(&employee)?;
    Ok(Outcome { message, employee })
}

fn update_in<U: UnitOfWork>(
    uow: &U,
    id: i64,
    update: EmployeeUpdate,
) -> Result<Outcome, SeatAllocError> {
    let mut employee = uow
        .find_employee(id)?
        .ok_or(SeatAllocError::EmployeeNotFound(id))?;

    // No seat in the update means "keep the current one", which still goes
    // through the checks below so a stale reference gets repaired.
    let target = update.seat.unwrap_or_else(|| employee.seat.clone());
    let keeping = target.same_as(&employee.seat);
    match target {
        SeatRef::Seat(requested) => match uow.find_seat(&requested)? {
            None if keeping => {
                warn!(employee = id, seat = %requested, "referenced seat no longer exists, resetting to Unassigned");
                release_held_seat(uow, id, &SeatRef::Unassigned)?;
                employee.seat = SeatRef::Unassigned;
            }
            None => return Err(SeatAllocError::SeatNotFound(requested)),
            Some(seat) if seat.employee_id == Some(id) => {
                if !keeping {
                    // Already the occupant; only the reference was stale.
                    warn!(employee = id, seat = %seat.id, "healed stale seat reference");
                }
                employee.seat = SeatRef::Seat(seat.id);
            }
            Some(mut seat) => {
                let before = seat.status;
                match seat.occupy(id) {
                    Ok(()) => {
                        if keeping {
                            warn!(employee = id, seat = %seat.id, "re-occupied seat behind stale reference");
                        }
                        release_held_seat(uow, id, &employee.seat)?;
                        uow.save_seat(&seat, before)?;
                        employee.seat = SeatRef::Seat(seat.id);
                    }
                    Err(_) if keeping => {
                        warn!(employee = id, seat = %seat.id, status = %before, "stale seat reference is held elsewhere, resetting to Unassigned");
                        release_held_seat(uow, id, &SeatRef::Unassigned)?;
                        employee.seat = SeatRef::Unassigned;
                    }
                    Err(e) => return Err(e),
                }
            }
        },
        sentinel => {
            release_held_seat(uow, id, &employee.seat)?;
            employee.seat = sentinel;
        }
    }

    employee.name = update.name;
    employee.role = update.role;
    employee.department = update.department;
    uow.save_employee(&employee)?;

    Ok(Outcome {
        message: "Employee updated successfully".to_string(),
        employee,
    })
}

fn delete_in<U: UnitOfWork>(uow: &U, id: i64) -> Result<String, SeatAllocError> {
    let employee = uow
        .find_employee(id)?
        .ok_or(SeatAllocError::EmployeeNotFound(id))?;

    release_held_seat(uow, id, &employee.seat)?;

    if !uow.delete_employee(id)? {
        return Err(SeatAllocError::EmployeeNotFound(id));
    }
    Ok(format!(
        "Employee '{}' (ID: {}) deleted successfully.",
        employee.name, id
    ))
}

/// VACANT -> OCCUPIED for `seat_id`, persisted with a compare-and-set.
fn occupy<U: UnitOfWork>(uow: &U, seat_id: &str, employee_id: i64) -> Result<Seat, SeatAllocError> {
    let mut seat = uow
        .find_seat(seat_id)?
        .ok_or_else(|| SeatAllocError::SeatNotFound(seat_id.to_string()))?;
    let before = seat.status;
    seat.occupy(employee_id)?;
    uow.save_seat(&seat, before)?;
    Ok(seat)
}

/// OCCUPIED -> VACANT for the seat whose occupant is `employee_id`. No-op when
/// the employee occupies nothing. `held` is the employee's own reference and is
/// only used to report staleness.
fn release_held_seat<U: UnitOfWork>(
    uow: &U,
    employee_id: i64,
    held: &SeatRef,
) -> Result<Option<Seat>, SeatAllocError> {
    match uow.find_seat_by_employee(employee_id)? {
        Some(mut seat) => {
            if let Some(referenced) = held.seat_id()
                && !referenced.eq_ignore_ascii_case(&seat.id)
            {
                warn!(employee = employee_id, referenced, occupied = %seat.id, "seat reference disagrees with occupant");
            }
            let before = seat.status;
            if seat.vacate() {
                uow.save_seat(&seat, before)?;
            }
            Ok(Some(seat))
        }
        None => {
            if let Some(referenced) = held.seat_id() {
                warn!(employee = employee_id, referenced, "stale seat reference, nothing to release");
            }
            Ok(None)
        }
    }
}

fn seat_detail_in<U: UnitOfWork>(uow: &U, seat_id: &str) -> Result<SeatDetail, SeatAllocError> {
    let seat = uow
        .find_seat(seat_id)?
        .ok_or_else(|| SeatAllocError::SeatNotFound(seat_id.to_string()))?;

    let occupant = match (seat.status, seat.employee_id) {
        (SeatStatus::Occupied, Some(eid)) => uow
            .find_employee(eid)?
            .filter(|e| e.seat.seat_id().is_some_and(|s| s.eq_ignore_ascii_case(&seat.id))),
        _ => None,
    };

    let mut detail = SeatDetail {
        seat_id: seat.id.clone(),
        status: seat.status,
        employee_id: None,
        employee_name: None,
        role: None,
        department: None,
        message: None,
    };
    match occupant {
        Some(employee) => {
            detail.employee_id = Some(employee.id);
            detail.employee_name = Some(employee.name);
            detail.role = Some(employee.role);
            detail.department = Some(employee.department);
        }
        None => {
            let message = match seat.status {
                SeatStatus::Reserved => "Seat is reserved",
                SeatStatus::Vacant => "Seat is vacant",
                SeatStatus::Occupied => {
                    warn!(seat = %seat.id, "occupied seat has no matching employee");
                    "Seat is occupied"
                }
            };
            detail.message = Some(message.to_string());
        }
    }
    Ok(detail)
}

fn check_in<U: UnitOfWork>(uow: &U) -> Result<ConsistencyReport, SeatAllocError> {
    let seats = uow.find_seats()?;
    let employees = uow.find_employees()?;
    let mut violations = Vec::new();

    for seat in &seats {
        if !seat.is_consistent() {
            violations.push(Violation::SeatStateInvalid {
                seat: seat.id.clone(),
            });
            continue;
        }
        let Some(eid) = seat.employee_id else {
            continue;
        };
        match employees.iter().find(|e| e.id == eid) {
            None => violations.push(Violation::OccupantMissing {
                seat: seat.id.clone(),
                employee_id: eid,
            }),
            Some(e) if !e.seat.seat_id().is_some_and(|s| s.eq_ignore_ascii_case(&seat.id)) => {
                violations.push(Violation::OccupantPointsElsewhere {
                    seat: seat.id.clone(),
                    employee_id: eid,
                    employee_seat: e.seat.to_string(),
                })
            }
            Some(_) => {}
        }
    }

    for employee in &employees {
        let Some(referenced) = employee.seat.seat_id() else {
            continue;
        };
        match seats.iter().find(|s| s.id.eq_ignore_ascii_case(referenced)) {
            None => violations.push(Violation::SeatMissing {
                employee_id: employee.id,
                seat: referenced.to_string(),
            }),
            Some(seat) if seat.employee_id != Some(employee.id) => {
                violations.push(Violation::SeatNotHeld {
                    employee_id: employee.id,
                    seat: seat.id.clone(),
                    status: seat.status,
                    occupant: seat.employee_id,
                })
            }
            Some(_) => {}
        }
    }

    Ok(ConsistencyReport {
        seats_checked: seats.len(),
        employees_checked: employees.len(),
        consistent: violations.is_empty(),
        violations,
    })
}
