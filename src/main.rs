use seatalloc::core::error::{GENERIC_FAILURE_MESSAGE, SeatAllocError};
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    match seatalloc::run() {
        Ok(()) => Ok(ExitCode::SUCCESS),
        // doctor already printed the violations
        Err(err @ SeatAllocError::Inconsistent(_)) => {
            eprintln!("{}", err);
            Ok(ExitCode::FAILURE)
        }
        Err(err) if err.is_internal() => {
            tracing::error!(error = %err, "command failed");
            Err(anyhow::anyhow!(GENERIC_FAILURE_MESSAGE))
        }
        Err(err) => {
            eprintln!("{}: {}", err.kind().label(), err.public_message());
            Ok(ExitCode::from(err.kind().exit_code()))
        }
    }
}
