use std::fmt;
use std::io;
use thiserror::Error;

/// Message returned to callers for any fault that is not a domain rejection.
pub const GENERIC_FAILURE_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

#[derive(Error, Debug)]
pub enum SeatAllocError {
    #[error("Employee with ID {0} not found")]
    EmployeeNotFound(i64),
    #[error("Seat {0} not found")]
    SeatNotFound(String),
    #[error("Seat {seat} is already {state}! Please select a different seat.")]
    SeatUnavailable { seat: String, state: String },
    #[error("{0}")]
    ValidationFailed(String),
    #[error("{0}")]
    Conflict(String),
    #[error("SQLite error: {0}")]
    RusqliteError(#[from] rusqlite::Error),
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Injected fault at stage {0}")]
    FaultInjected(String),
    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),
    #[error("{0} seat assignment violation(s) found")]
    Inconsistent(usize),
}

/// Failure classes callers branch on. Infrastructure faults collapse into
/// `InternalFailure`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    EmployeeNotFound,
    SeatNotFound,
    SeatUnavailable,
    ValidationFailed,
    Conflict,
    InternalFailure,
}

impl ErrorKind {
    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::EmployeeNotFound => "Employee Not Found",
            ErrorKind::SeatNotFound => "Seat Not Found",
            ErrorKind::SeatUnavailable => "Seat Unavailable",
            ErrorKind::ValidationFailed => "Validation Failed",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::InternalFailure => "Internal Server Error",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::EmployeeNotFound => "employee_not_found",
            ErrorKind::SeatNotFound => "seat_not_found",
            ErrorKind::SeatUnavailable => "seat_unavailable",
            ErrorKind::ValidationFailed => "validation_failed",
            ErrorKind::Conflict => "conflict",
            ErrorKind::InternalFailure => "internal_failure",
        }
    }

    /// Process exit status used by the binary.
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::InternalFailure => 1,
            ErrorKind::ValidationFailed => 2,
            ErrorKind::EmployeeNotFound | ErrorKind::SeatNotFound => 3,
            ErrorKind::SeatUnavailable | ErrorKind::Conflict => 4,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SeatAllocError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SeatAllocError::EmployeeNotFound(_) => ErrorKind::EmployeeNotFound,
            SeatAllocError::SeatNotFound(_) => ErrorKind::SeatNotFound,
            SeatAllocError::SeatUnavailable { .. } => ErrorKind::SeatUnavailable,
            SeatAllocError::ValidationFailed(_) => ErrorKind::ValidationFailed,
            SeatAllocError::Conflict(_) => ErrorKind::Conflict,
            SeatAllocError::RusqliteError(_)
            | SeatAllocError::IoError(_)
            | SeatAllocError::SerializationError(_)
            | SeatAllocError::ConfigError(_)
            | SeatAllocError::FaultInjected(_)
            | SeatAllocError::LockPoisoned(_)
            | SeatAllocError::Inconsistent(_) => ErrorKind::InternalFailure,
        }
    }

    /// Text safe to hand to an external caller. Raw fault details stay in logs.
    pub fn public_message(&self) -> String {
        match self.kind() {
            ErrorKind::InternalFailure => GENERIC_FAILURE_MESSAGE.to_string(),
            _ => self.to_string(),
        }
    }

    pub fn is_internal(&self) -> bool {
        self.kind() == ErrorKind::InternalFailure
    }
}
