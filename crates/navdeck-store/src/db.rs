//! Database connection management
//!
//! Provides utilities for opening, configuring, and transacting on SQLite
//! connections.

#![allow(clippy::result_large_err)]

use std::path::Path;
use std::time::Duration;

use rusqlite::{Connection, Transaction, TransactionBehavior};
use serde::{Deserialize, Serialize};

use crate::errors::{from_rusqlite, io_error, Result};
use crate::migrations::apply_migrations;

/// Connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// How long a writer waits for the database lock before failing
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            busy_timeout_ms: 5_000,
        }
    }
}

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(from_rusqlite)
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(from_rusqlite)
}

/// Apply connection settings
pub fn configure(conn: &Connection, config: &StoreConfig) -> Result<()> {
    conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))
        .map_err(from_rusqlite)?;

    conn.pragma_update(None, "foreign_keys", "ON")
        .map_err(from_rusqlite)?;

    // journal_mode answers with the resulting mode; in-memory databases
    // stay on "memory"
    let mode: String = conn
        .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
        .map_err(from_rusqlite)?;
    tracing::debug!(journal_mode = %mode, "configured sqlite connection");

    Ok(())
}

/// Open, configure, and migrate a database file
///
/// Missing parent directories are created.
pub fn open_store<P: AsRef<Path>>(path: P, config: &StoreConfig) -> Result<Connection> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| io_error("open_store", e))?;
    }
    let mut conn = open(path)?;
    configure(&conn, config)?;
    apply_migrations(&mut conn)?;
    Ok(conn)
}

/// Open, configure, and migrate an in-memory database
pub fn open_store_in_memory(config: &StoreConfig) -> Result<Connection> {
    let mut conn = open_in_memory()?;
    configure(&conn, config)?;
    apply_migrations(&mut conn)?;
    Ok(conn)
}

/// Begin a write transaction that takes the database lock up front
///
/// Concurrent writers queue on the lock (bounded by the busy timeout)
/// instead of failing when a deferred transaction tries to upgrade.
pub fn immediate(conn: &mut Connection) -> Result<Transaction<'_>> {
    conn.transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(from_rusqlite)
}
