//! Seat and employee stores.
//!
//! The assignment manager talks to persistence only through `SeatStore` and
//! `EmployeeStore`. `SqliteRepo` implements both over a borrowed connection;
//! inside `DbBroker::with_write` that connection is an open transaction, so
//! every write made through one repo commits or rolls back together.

use crate::core::db;
use crate::core::error::SeatAllocError;
use crate::core::model::{Employee, Seat, SeatRef, SeatStatus};
use rusqlite::{Connection, OptionalExtension, Row, params};

pub const FAULT_SEAT_WRITE: &str = "seat_write";
pub const FAULT_EMPLOYEE_WRITE: &str = "employee_write";
pub const FAULT_EMPLOYEE_DELETE: &str = "employee_delete";

pub trait SeatStore {
    fn find_seat(&self, id: &str) -> Result<Option<Seat>, SeatAllocError>;
    fn find_seats(&self) -> Result<Vec<Seat>, SeatAllocError>;
    fn find_seats_by_status(&self, status: SeatStatus) -> Result<Vec<Seat>, SeatAllocError>;
    fn find_seat_by_employee(&self, employee_id: i64) -> Result<Option<Seat>, SeatAllocError>;
    /// Persist `seat` only if its stored status still equals `expected`.
    /// A lost race surfaces as `SeatUnavailable`.
    fn save_seat(&self, seat: &Seat, expected: SeatStatus) -> Result<(), SeatAllocError>;
    /// Insert a seat if absent. Returns false when the id already exists.
    fn insert_seat(&self, seat: &Seat) -> Result<bool, SeatAllocError>;
}

pub trait EmployeeStore {
    fn find_employee(&self, id: i64) -> Result<Option<Employee>, SeatAllocError>;
    fn find_employee_by_seat(&self, seat_id: &str) -> Result<Option<Employee>, SeatAllocError>;
    fn find_employees(&self) -> Result<Vec<Employee>, SeatAllocError>;
    /// Fails with `Conflict` when the id is taken.
    fn insert_employee(&self, employee: &Employee) -> Result<(), SeatAllocError>;
    fn save_employee(&self, employee: &Employee) -> Result<(), SeatAllocError>;
    /// Returns false if no row was deleted.
    fn delete_employee(&self, id: i64) -> Result<bool, SeatAllocError>;
}

/// Both stores behind one transactional scope.
pub trait UnitOfWork: SeatStore + EmployeeStore {}

impl<T: SeatStore + EmployeeStore> UnitOfWork for T {}

pub struct SqliteRepo<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteRepo<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

fn seat_from_row(row: &Row<'_>) -> rusqlite::Result<Seat> {
    let status: String = row.get(1)?;
    let status = status.parse::<SeatStatus>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Seat {
        id: row.get(0)?,
        status,
        employee_id: row.get(2)?,
    })
}

fn employee_from_row(row: &Row<'_>) -> rusqlite::Result<Employee> {
    let seat: String = row.get(4)?;
    Ok(Employee {
        id: row.get(0)?,
        name: row.get(1)?,
        role: row.get(2)?,
        department: row.get(3)?,
        seat: SeatRef::parse(&seat),
    })
}

const SEAT_COLUMNS: &str = "id, status, employee_id";
const EMPLOYEE_COLUMNS: &str = "employeeid, name, role, department, seat_id";

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(code, _)
            if code.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

impl SeatStore for SqliteRepo<'_> {
    fn find_seat(&self, id: &str) -> Result<Option<Seat>, SeatAllocError> {
        let sql = format!("SELECT {SEAT_COLUMNS} FROM seats WHERE id = ?1");
        Ok(self.conn.query_row(&sql, [id], seat_from_row).optional()?)
    }

    fn find_seats(&self) -> Result<Vec<Seat>, SeatAllocError> {
        let sql = format!("SELECT {SEAT_COLUMNS} FROM seats ORDER BY id");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], seat_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn find_seats_by_status(&self, status: SeatStatus) -> Result<Vec<Seat>, SeatAllocError> {
        let sql = format!("SELECT {SEAT_COLUMNS} FROM seats WHERE status = ?1 ORDER BY id");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([status.as_str()], seat_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn find_seat_by_employee(&self, employee_id: i64) -> Result<Option<Seat>, SeatAllocError> {
        let sql = format!("SELECT {SEAT_COLUMNS} FROM seats WHERE employee_id = ?1");
        Ok(self
            .conn
            .query_row(&sql, [employee_id], seat_from_row)
            .optional()?)
    }

    fn save_seat(&self, seat: &Seat, expected: SeatStatus) -> Result<(), SeatAllocError> {
        db::check_fault(FAULT_SEAT_WRITE)?;
        let changed = self.conn.execute(
            "UPDATE seats SET status = ?1, employee_id = ?2 WHERE id = ?3 AND status = ?4",
            params![seat.status.as_str(), seat.employee_id, seat.id, expected.as_str()],
        )?;
        if changed == 0 {
            let current = self.find_seat(&seat.id)?;
            return match current {
                None => Err(SeatAllocError::SeatNotFound(seat.id.clone())),
                Some(found) => Err(SeatAllocError::SeatUnavailable {
                    seat: found.id,
                    state: found.status.describe().to_string(),
                }),
            };
        }
        Ok(())
    }

    fn insert_seat(&self, seat: &Seat) -> Result<bool, SeatAllocError> {
        db::check_fault(FAULT_SEAT_WRITE)?;
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO seats(id, status, employee_id) VALUES(?1, ?2, ?3)",
            params![seat.id, seat.status.as_str(), seat.employee_id],
        )?;
        Ok(changed == 1)
    }
}

impl EmployeeStore for SqliteRepo<'_> {
    fn find_employee(&self, id: i64) -> Result<Option<Employee>, SeatAllocError> {
        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE employeeid = ?1");
        Ok(self.conn.query_row(&sql, [id], employee_from_row).optional()?)
    }

    fn find_employee_by_seat(&self, seat_id: &str) -> Result<Option<Employee>, SeatAllocError> {
        let sql = format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE seat_id = ?1 ORDER BY employeeid LIMIT 1"
        );
        Ok(self
            .conn
            .query_row(&sql, [seat_id], employee_from_row)
            .optional()?)
    }

    fn find_employees(&self) -> Result<Vec<Employee>, SeatAllocError> {
        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees ORDER BY employeeid");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], employee_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn insert_employee(&self, employee: &Employee) -> Result<(), SeatAllocError> {
        db::check_fault(FAULT_EMPLOYEE_WRITE)?;
        self.conn
            .execute(
                "INSERT INTO employees(employeeid, name, role, department, seat_id)
                 VALUES(?1, ?2, ?3, ?4, ?5)",
                params![
                    employee.id,
                    employee.name,
                    employee.role,
                    employee.department,
                    employee.seat.as_str()
                ],
            )
            .map_err(|e| {
                if is_constraint_violation(&e) {
                    SeatAllocError::Conflict(format!(
                        "Employee with ID {} already exists",
                        employee.id
                    ))
                } else {
                    SeatAllocError::RusqliteError(e)
                }
            })?;
        Ok(())
    }

    fn save_employee(&self, employee: &Employee) -> Result<(), SeatAllocError> {
        db::check_fault(FAULT_EMPLOYEE_WRITE)?;
        let changed = self.conn.execute(
            "UPDATE employees SET name = ?1, role = ?2, department = ?3, seat_id = ?4
             WHERE employeeid = ?5",
            params![
                employee.name,
                employee.role,
                employee.department,
                employee.seat.as_str(),
                employee.id
            ],
        )?;
        if changed == 0 {
            return Err(SeatAllocError::EmployeeNotFound(employee.id));
        }
        Ok(())
    }

    fn delete_employee(&self, id: i64) -> Result<bool, SeatAllocError> {
        db::check_fault(FAULT_EMPLOYEE_DELETE)?;
        let changed = self
            .conn
            .execute("DELETE FROM employees WHERE employeeid = ?1", [id])?;
        Ok(changed == 1)
    }
}
