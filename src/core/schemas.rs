//! Database schema definitions for the seat allotment store.
//!
//! A single SQLite file holds both sides of the assignment relationship so
//! that every mutation can commit seat and employee rows together.

pub const SEATS_DB_NAME: &str = "seats.db";

// The CHECK keeps `employee_id` present exactly when the seat is OCCUPIED.
// UNIQUE(employee_id) keeps an employee from holding two seats.
pub const SEATS_DB_SCHEMA_SEATS: &str = "
    CREATE TABLE IF NOT EXISTS seats (
        id TEXT PRIMARY KEY COLLATE NOCASE,
        status TEXT NOT NULL CHECK (status IN ('VACANT', 'RESERVED', 'OCCUPIED')),
        employee_id INTEGER UNIQUE,
        CHECK ((status = 'OCCUPIED') = (employee_id IS NOT NULL))
    )
";
pub const SEATS_DB_SCHEMA_SEATS_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_seats_status ON seats(status)";

pub const SEATS_DB_SCHEMA_EMPLOYEES: &str = "
    CREATE TABLE IF NOT EXISTS employees (
        employeeid INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        role TEXT NOT NULL,
        department TEXT NOT NULL,
        seat_id TEXT NOT NULL COLLATE NOCASE
    )
";
pub const SEATS_DB_SCHEMA_EMPLOYEES_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_employees_seat ON employees(seat_id)";

pub const SEATS_DB_SCHEMA_META: &str = "
    CREATE TABLE IF NOT EXISTS meta (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    )
";

pub const SEATS_DB_SCHEMA_VERSION: &str = "1";

pub fn seats_db_schema() -> [&'static str; 5] {
    [
        SEATS_DB_SCHEMA_META,
        SEATS_DB_SCHEMA_SEATS,
        SEATS_DB_SCHEMA_SEATS_INDEX,
        SEATS_DB_SCHEMA_EMPLOYEES,
        SEATS_DB_SCHEMA_EMPLOYEES_INDEX,
    ]
}
