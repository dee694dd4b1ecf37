//! Command groups exposed by the `seatalloc` binary.
//!
//! Each group parses its own arguments, calls the assignment manager and
//! renders the result as text or as a JSON command envelope.

pub mod doctor;
pub mod employees;
pub mod seats;

use crate::core::envelope::Envelope;
use crate::core::error::SeatAllocError;
use clap::ValueEnum;
use serde_json::Value as JsonValue;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Print a successful command result.
pub(crate) fn emit_ok(format: OutputFormat, cmd: &str, payload: JsonValue, text: &str) {
    match format {
        OutputFormat::Json => println!("{}", Envelope::ok(cmd, payload).to_json_line()),
        OutputFormat::Text => println!("{}", text),
    }
}

/// Print a failed command result and hand the error back to the caller.
pub(crate) fn emit_err(format: OutputFormat, cmd: &str, err: SeatAllocError) -> SeatAllocError {
    if format == OutputFormat::Json {
        println!("{}", Envelope::error(cmd, &err).to_json_line());
    }
    err
}

/// Route a command result through `emit_ok` / `emit_err`.
pub(crate) fn finish(
    format: OutputFormat,
    cmd: &str,
    result: Result<(JsonValue, String), SeatAllocError>,
) -> Result<(), SeatAllocError> {
    match result {
        Ok((payload, text)) => {
            emit_ok(format, cmd, payload, &text);
            Ok(())
        }
        Err(err) => Err(emit_err(format, cmd, err)),
    }
}

pub fn schema() -> JsonValue {
    serde_json::json!({
        "name": "seatalloc",
        "version": env!("CARGO_PKG_VERSION"),
        "subsystems": [employees::schema(), seats::schema(), doctor::schema()],
    })
}
