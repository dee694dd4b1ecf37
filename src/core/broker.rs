//! The DB Broker is the "thin waist" for state access.
//!
//! Writes are serialized per database through an in-process mutex and run in
//! an `IMMEDIATE` transaction, which takes SQLite's reserved lock up front. The
//! read-check-write sequence of an assignment therefore cannot interleave with
//! another writer, in this process or any other. The closure's `Err` rolls the
//! whole transaction back.

use crate::core::db;
use crate::core::error::SeatAllocError;
use crate::core::store::Store;
use rusqlite::{Connection, TransactionBehavior};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

pub struct DbBroker {
    db_path: PathBuf,
    busy_timeout_secs: u32,
}

fn write_lock_for(db_path: &Path) -> Result<&'static Mutex<()>, SeatAllocError> {
    static LOCKS: OnceLock<Mutex<HashMap<PathBuf, &'static Mutex<()>>>> = OnceLock::new();
    let mut locks = LOCKS
        .get_or_init(|| Mutex::new(HashMap::new()))
        .lock()
        .map_err(|_| SeatAllocError::LockPoisoned("broker lock table".to_string()))?;
    if let Some(lock) = locks.get(db_path) {
        return Ok(*lock);
    }
    let lock: &'static Mutex<()> = Box::leak(Box::new(Mutex::new(())));
    locks.insert(db_path.to_path_buf(), lock);
    Ok(lock)
}

impl DbBroker {
    pub fn new(store: &Store, busy_timeout_secs: u32) -> Self {
        Self {
            db_path: store.db_path(),
            busy_timeout_secs,
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Run `f` inside one write transaction. `Ok` commits, `Err` rolls back.
    pub fn with_write<F, R>(&self, op: &str, f: F) -> Result<R, SeatAllocError>
    where
        F: FnOnce(&Connection) -> Result<R, SeatAllocError>,
    {
        let span = tracing::debug_span!("store.write", op);
        let _enter = span.enter();

        let lock = write_lock_for(&self.db_path)?;
        let _guard = lock
            .lock()
            .map_err(|_| SeatAllocError::LockPoisoned(format!("write lock for {op}")))?;

        let mut conn = db::db_connect(&self.db_path.to_string_lossy(), self.busy_timeout_secs)?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        match f(&*tx) {
            Ok(value) => {
                tx.commit()?;
                tracing::debug!(op, "committed");
                Ok(value)
            }
            Err(err) => {
                if let Err(rb) = tx.rollback() {
                    tracing::error!(op, error = %rb, "rollback failed");
                }
                if err.is_internal() {
                    tracing::error!(op, error = %err, "transaction rolled back");
                } else {
                    tracing::debug!(op, error = %err, "transaction rolled back");
                }
                Err(err)
            }
        }
    }

    /// Run `f` on a fresh read connection inside a deferred transaction, so
    /// every query in `f` sees the same WAL snapshot. Readers never wait on the
    /// write mutex.
    pub fn with_read<F, R>(&self, op: &str, f: F) -> Result<R, SeatAllocError>
    where
        F: FnOnce(&Connection) -> Result<R, SeatAllocError>,
    {
        let span = tracing::trace_span!("store.read", op);
        let _enter = span.enter();

        let mut conn = db::db_connect(&self.db_path.to_string_lossy(), self.busy_timeout_secs)?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Deferred)?;
        let value = f(&*tx)?;
        tx.commit()?;
        Ok(value)
    }
}
