//! Seat and employee entities.
//!
//! `Seat::occupy` and `Seat::vacate` are the only transitions that write seat
//! state; RESERVED is read-only and blocks assignment exactly like OCCUPIED.

use crate::core::error::SeatAllocError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const UNASSIGNED: &str = "Unassigned";
pub const WORK_FROM_HOME: &str = "Work From Home";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum SeatStatus {
    Vacant,
    Reserved,
    Occupied,
}

impl SeatStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SeatStatus::Vacant => "VACANT",
            SeatStatus::Reserved => "RESERVED",
            SeatStatus::Occupied => "OCCUPIED",
        }
    }

    /// Word used in user-facing messages ("Seat A1 is already occupied").
    pub fn describe(self) -> &'static str {
        match self {
            SeatStatus::Vacant => "vacant",
            SeatStatus::Reserved => "reserved",
            SeatStatus::Occupied => "occupied",
        }
    }
}

impl fmt::Display for SeatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeatStatus {
    type Err = SeatAllocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "VACANT" => Ok(SeatStatus::Vacant),
            "RESERVED" => Ok(SeatStatus::Reserved),
            "OCCUPIED" => Ok(SeatStatus::Occupied),
            other => Err(SeatAllocError::ValidationFailed(format!(
                "Unknown seat status '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub id: String,
    pub status: SeatStatus,
    #[serde(rename = "employeeId")]
    pub employee_id: Option<i64>,
}

impl Seat {
    pub fn vacant(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: SeatStatus::Vacant,
            employee_id: None,
        }
    }

    /// VACANT -> OCCUPIED. Any other starting state is rejected untouched.
    pub fn occupy(&mut self, employee_id: i64) -> Result<(), SeatAllocError> {
        if self.status != SeatStatus::Vacant {
            return Err(SeatAllocError::SeatUnavailable {
                seat: self.id.clone(),
                state: self.status.describe().to_string(),
            });
        }
        self.status = SeatStatus::Occupied;
        self.employee_id = Some(employee_id);
        Ok(())
    }

    /// OCCUPIED -> VACANT. Returns false if there was nothing to release.
    pub fn vacate(&mut self) -> bool {
        if self.status != SeatStatus::Occupied {
            return false;
        }
        self.status = SeatStatus::Vacant;
        self.employee_id = None;
        true
    }

    pub fn is_consistent(&self) -> bool {
        self.employee_id.is_some() == (self.status == SeatStatus::Occupied)
    }
}

/// Where an employee sits: a physical seat or one of the two placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SeatRef {
    Unassigned,
    WorkFromHome,
    Seat(String),
}

impl SeatRef {
    /// Case-insensitive on the placeholders; blank input means unassigned.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(UNASSIGNED) {
            SeatRef::Unassigned
        } else if trimmed.eq_ignore_ascii_case(WORK_FROM_HOME) {
            SeatRef::WorkFromHome
        } else {
            SeatRef::Seat(trimmed.to_string())
        }
    }

    pub fn is_sentinel(&self) -> bool {
        !matches!(self, SeatRef::Seat(_))
    }

    pub fn seat_id(&self) -> Option<&str> {
        match self {
            SeatRef::Seat(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SeatRef::Unassigned => UNASSIGNED,
            SeatRef::WorkFromHome => WORK_FROM_HOME,
            SeatRef::Seat(id) => id,
        }
    }

    pub fn same_as(&self, other: &SeatRef) -> bool {
        self.as_str().eq_ignore_ascii_case(other.as_str())
    }
}

impl fmt::Display for SeatRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for SeatRef {
    fn from(raw: String) -> Self {
        SeatRef::parse(&raw)
    }
}

impl From<SeatRef> for String {
    fn from(seat: SeatRef) -> Self {
        seat.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(rename = "employeeid")]
    pub id: i64,
    pub name: String,
    pub role: String,
    pub department: String,
    #[serde(rename = "seatId")]
    pub seat: SeatRef,
}

/// Validated, trimmed input for creating an employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    pub id: i64,
    pub name: String,
    pub role: String,
    pub department: String,
    pub seat: SeatRef,
}

/// Validated input for updating an employee. `seat: None` keeps the current seat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeUpdate {
    pub name: String,
    pub role: String,
    pub department: String,
    pub seat: Option<SeatRef>,
}

/// Employee grouping used by the seating directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Placement {
    Unassigned,
    WorkFromHome,
    Seated,
}

impl Placement {
    pub fn matches(self, seat: &SeatRef) -> bool {
        matches!(
            (self, seat),
            (Placement::Unassigned, SeatRef::Unassigned)
                | (Placement::WorkFromHome, SeatRef::WorkFromHome)
                | (Placement::Seated, SeatRef::Seat(_))
        )
    }
}
