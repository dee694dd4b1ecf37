//! Typed request schema for employee mutations.
//!
//! Raw input (JSON bodies or CLI flags) is checked here once; the assignment
//! manager only ever sees trimmed, typed values.

use crate::core::error::SeatAllocError;
use crate::core::model::{EmployeeUpdate, NewEmployee, SeatRef};
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_ROLE_LEN: usize = 50;
pub const MAX_DEPARTMENT_LEN: usize = 50;

fn seat_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]{0,19}$").expect("seat id pattern is valid")
    })
}

/// Employee ids arrive either as JSON numbers or as numeric strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IdField {
    Number(i64),
    Text(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeRequest {
    pub employeeid: Option<IdField>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub department: Option<String>,
    #[serde(rename = "seatId", alias = "seat_id")]
    pub seat_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeUpdateRequest {
    pub name: Option<String>,
    pub role: Option<String>,
    pub department: Option<String>,
    #[serde(rename = "seatId", alias = "seat_id")]
    pub seat_id: Option<String>,
}

fn validation(msg: impl Into<String>) -> SeatAllocError {
    SeatAllocError::ValidationFailed(msg.into())
}

pub fn parse_employee_id(raw: &IdField) -> Result<i64, SeatAllocError> {
    let id = match raw {
        IdField::Number(n) => *n,
        IdField::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| validation("Invalid Employee ID format. It must be a number."))?,
    };
    if id <= 0 {
        return Err(validation("Employee ID must be a positive number"));
    }
    Ok(id)
}

fn required_text(value: Option<&str>, field: &str, max_len: usize) -> Result<String, SeatAllocError> {
    let trimmed = value.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(validation(format!("Employee {} is required", field)));
    }
    if trimmed.chars().count() > max_len {
        return Err(validation(format!(
            "Employee {} must be at most {} characters",
            field, max_len
        )));
    }
    Ok(trimmed.to_string())
}

/// Parse a seat reference and reject malformed physical seat ids.
pub fn parse_seat_ref(raw: &str) -> Result<SeatRef, SeatAllocError> {
    let seat = SeatRef::parse(raw);
    if let Some(id) = seat.seat_id() {
        validate_seat_id(id)?;
    }
    Ok(seat)
}

pub fn validate_seat_id(id: &str) -> Result<(), SeatAllocError> {
    if seat_id_pattern().is_match(id) {
        Ok(())
    } else {
        Err(validation(format!("Invalid seat id '{}'", id)))
    }
}

impl EmployeeRequest {
    pub fn from_json(body: &str) -> Result<Self, SeatAllocError> {
        serde_json::from_str(body).map_err(|e| validation(format!("Invalid request body: {}", e)))
    }

    pub fn validate(&self) -> Result<NewEmployee, SeatAllocError> {
        let id = match &self.employeeid {
            Some(raw) => parse_employee_id(raw)?,
            None => return Err(validation("Employee ID is required")),
        };
        let name = required_text(self.name.as_deref(), "name", MAX_NAME_LEN)?;
        let department = required_text(self.department.as_deref(), "department", MAX_DEPARTMENT_LEN)?;
        let role = required_text(self.role.as_deref(), "role", MAX_ROLE_LEN)?;
        let seat = parse_seat_ref(self.seat_id.as_deref().unwrap_or_default())?;
        Ok(NewEmployee {
            id,
            name,
            role,
            department,
            seat,
        })
    }
}

impl EmployeeUpdateRequest {
    pub fn from_json(body: &str) -> Result<Self, SeatAllocError> {
        serde_json::from_str(body).map_err(|e| validation(format!("Invalid request body: {}", e)))
    }

    pub fn validate(&self) -> Result<EmployeeUpdate, SeatAllocError> {
        let name = required_text(self.name.as_deref(), "name", MAX_NAME_LEN)?;
        let department = required_text(self.department.as_deref(), "department", MAX_DEPARTMENT_LEN)?;
        let role = required_text(self.role.as_deref(), "role", MAX_ROLE_LEN)?;
        let seat = self.seat_id.as_deref().map(parse_seat_ref).transpose()?;
        Ok(EmployeeUpdate {
            name,
            role,
            department,
            seat,
        })
    }
}
