//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Validate the store path and open file or in-memory connections.
//! - Configure connection pragmas required by core behavior.
//! - Trigger schema migrations before returning a usable connection.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - Returned connections have migrations fully applied.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info, warn};
use rusqlite::Connection;
use std::ffi::OsStr;
use std::path::Path;
use std::time::{Duration, Instant};

/// Opens a SQLite store file and applies all pending migrations.
///
/// The path must carry a `.db` extension; anything else is rejected before
/// the filesystem is touched. A file that exists but is not SQLite-formatted
/// fails during bootstrap when the first pragma runs.
///
/// # Side effects
/// - Creates the file when it does not exist yet (SQLite semantics).
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    if path.extension().and_then(OsStr::to_str) != Some("db") {
        warn!(
            "event=db_open module=db status=rejected reason=bad_extension path={}",
            path.display()
        );
        return Err(DbError::NotDatabaseFile(path.to_path_buf()));
    }

    finish_open("file", Connection::open(path))
}

/// Opens an in-memory SQLite store and applies all pending migrations.
///
/// Used by tests and callers that need a throwaway store with the full
/// schema in place.
pub fn open_db_in_memory() -> DbResult<Connection> {
    finish_open("memory", Connection::open_in_memory())
}

fn finish_open(
    mode: &str,
    opened: Result<Connection, rusqlite::Error>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let mut conn = opened.map_err(|err| {
        error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error={err}",
            started_at.elapsed().as_millis()
        );
        DbError::from(err)
    })?;

    match bootstrap_connection(&mut conn) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_secs(5))?;
    apply_migrations(conn)?;
    Ok(())
}
