//! Connection bootstrap.
//!
//! # Invariants
//! - Every returned connection enforces foreign keys and is migrated.
//! - File stores run in WAL mode; in-memory stores keep SQLite defaults.

use super::migrations::apply_migrations;
use super::DbResult;
use log::{error, info};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Where the store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    File(PathBuf),
    /// Private to the returned connection; gone when it drops.
    Memory,
}

impl StoreLocation {
    fn mode(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Memory => "memory",
        }
    }
}

pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_store(&StoreLocation::File(path.as_ref().to_path_buf()))
}

pub fn open_db_in_memory() -> DbResult<Connection> {
    open_store(&StoreLocation::Memory)
}

/// Opens `location`, configures the connection and applies pending
/// migrations. Logs one `db_open` event with the outcome and duration.
pub fn open_store(location: &StoreLocation) -> DbResult<Connection> {
    let started_at = Instant::now();
    let mode = location.mode();

    let result = connect(location).and_then(|mut conn| {
        configure(&mut conn, location)?;
        Ok(conn)
    });
    let duration_ms = started_at.elapsed().as_millis();
    match &result {
        Ok(_) => info!("event=db_open module=db status=ok mode={mode} duration_ms={duration_ms}"),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} duration_ms={duration_ms} error={err}"
        ),
    }
    result
}

fn connect(location: &StoreLocation) -> DbResult<Connection> {
    let conn = match location {
        StoreLocation::File(path) => Connection::open(path)?,
        StoreLocation::Memory => Connection::open_in_memory()?,
    };
    Ok(conn)
}

fn configure(conn: &mut Connection, location: &StoreLocation) -> DbResult<()> {
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    if let StoreLocation::File(_) = location {
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
            row.get::<_, String>(0)
        })?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
    }
    apply_migrations(conn)?;
    Ok(())
}
