//! SQLite connection setup for a collection database.
//!
//! Every mutation in the crate goes through [`write_tx`], which takes the
//! database write lock before the first statement runs. Readers on other
//! connections only ever see committed state.

mod schema;

use std::path::Path;
use std::time::Duration;

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::error::{Result, StoreError};

pub use schema::SCHEMA_VERSION;

/// Default time a writer waits on a locked database before giving up
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_millis(5_000);

/// Open (or create) a collection database at `path`.
pub fn open(path: &Path, busy_timeout: Duration) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let conn = Connection::open(path)?;
    conn.busy_timeout(busy_timeout)?;
    bootstrap(&conn)?;
    log::debug!("Opened collection database at {:?}", path);
    Ok(conn)
}

/// Open a private in-memory collection
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    bootstrap(&conn)?;
    Ok(conn)
}

fn bootstrap(conn: &Connection) -> Result<()> {
    // Foreign keys are off by default and must be enabled per connection;
    // deletion cascades depend on them.
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if version > SCHEMA_VERSION {
        return Err(StoreError::constraint(format!(
            "database schema version {} is newer than supported version {}",
            version, SCHEMA_VERSION
        )));
    }

    conn.execute_batch(schema::SCHEMA)?;
    if version < SCHEMA_VERSION {
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        log::info!("Initialized collection schema version {}", SCHEMA_VERSION);
    }
    Ok(())
}

/// Begin a write transaction holding the database write lock.
///
/// Dropping the transaction without committing rolls every statement back.
pub fn write_tx(conn: &mut Connection) -> Result<Transaction<'_>> {
    Ok(conn.transaction_with_behavior(TransactionBehavior::Immediate)?)
}
