use crate::core::broker::DbBroker;
use crate::core::error::SeatAllocError;
use crate::core::schemas;
use crate::core::store::Store;
use rusqlite::{Connection, OptionalExtension};
use std::fs;
use std::time::Duration;

/// Env var naming a store write stage that should fail. Test-only hook.
pub const FAULT_STAGE_ENV: &str = "SEATALLOC_FAULT_STAGE";

pub const DEFAULT_BUSY_TIMEOUT_SECS: u32 = 5;

pub fn db_connect(db_path: &str, busy_timeout_secs: u32) -> Result<Connection, SeatAllocError> {
    let conn = Connection::open(db_path)?;
    conn.busy_timeout(Duration::from_secs(u64::from(busy_timeout_secs)))?;
    conn.query_row("PRAGMA journal_mode=WAL;", [], |_| Ok(()))?;
    conn.execute("PRAGMA foreign_keys=ON;", [])?;
    Ok(conn)
}

/// Fails with `FaultInjected` when `SEATALLOC_FAULT_STAGE` names `stage`.
pub fn check_fault(stage: &str) -> Result<(), SeatAllocError> {
    match std::env::var(FAULT_STAGE_ENV) {
        Ok(configured) if configured.trim() == stage => {
            Err(SeatAllocError::FaultInjected(stage.to_string()))
        }
        _ => Ok(()),
    }
}

fn ensure_schema(conn: &Connection) -> Result<(), SeatAllocError> {
    for stmt in schemas::seats_db_schema() {
        conn.execute_batch(stmt)?;
    }

    let current: Option<String> = conn
        .query_row(
            "SELECT value FROM meta WHERE key = 'schema_version'",
            [],
            |row| row.get(0),
        )
        .optional()?;

    match current.as_deref() {
        None => {
            conn.execute(
                "INSERT INTO meta(key, value) VALUES('schema_version', ?1)",
                [schemas::SEATS_DB_SCHEMA_VERSION],
            )?;
        }
        Some(v) if v == schemas::SEATS_DB_SCHEMA_VERSION => {}
        Some(v) => {
            return Err(SeatAllocError::ConfigError(format!(
                "seat database schema version {} is not supported (expected {})",
                v,
                schemas::SEATS_DB_SCHEMA_VERSION
            )));
        }
    }
    Ok(())
}

/// Create the store directory and the seat database schema. Idempotent.
pub fn initialize_seats_db(store: &Store, busy_timeout_secs: u32) -> Result<(), SeatAllocError> {
    fs::create_dir_all(&store.root)?;

    let broker = DbBroker::new(store, busy_timeout_secs);
    broker.with_write("store.init", ensure_schema)?;

    tracing::debug!(db = %store.db_path().display(), "seat database ready");
    Ok(())
}
