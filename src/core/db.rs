use crate::core::error;
use crate::core::schemas;
use rusqlite::{Connection, OpenFlags};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default SQLite busy timeout applied to every connection.
pub const DEFAULT_BUSY_TIMEOUT_SECS: u64 = 5;

pub fn db_connect(db_path: &Path, busy_timeout_secs: u64) -> Result<Connection, error::GurumeError> {
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(error::GurumeError::IoError)?;
    }
    let conn = Connection::open(db_path)?;
    configure(&conn, busy_timeout_secs)?;
    conn.query_row("PRAGMA journal_mode=WAL;", [], |_| Ok(()))
        .map_err(error::GurumeError::RusqliteError)?;
    Ok(conn)
}

/// Opens a catalog that must already exist. Neither the file nor its parent
/// directories are created.
pub fn db_connect_existing(db_path: &Path, busy_timeout_secs: u64) -> Result<Connection, error::GurumeError> {
    if !db_path.is_file() {
        return Err(error::GurumeError::NotFound(format!(
            "catalog {}",
            db_path.display()
        )));
    }
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX | OpenFlags::SQLITE_OPEN_URI;
    let conn = Connection::open_with_flags(db_path, flags)?;
    configure(&conn, busy_timeout_secs)?;
    Ok(conn)
}

pub fn db_connect_in_memory() -> Result<Connection, error::GurumeError> {
    let conn = Connection::open_in_memory()?;
    configure(&conn, DEFAULT_BUSY_TIMEOUT_SECS)?;
    Ok(conn)
}

fn configure(conn: &Connection, busy_timeout_secs: u64) -> Result<(), error::GurumeError> {
    conn.busy_timeout(Duration::from_secs(busy_timeout_secs))
        .map_err(error::GurumeError::RusqliteError)?;
    conn.execute("PRAGMA foreign_keys=ON;", [])
        .map_err(error::GurumeError::RusqliteError)?;
    Ok(())
}

/// Creates the catalog tables if they do not exist yet.
pub fn initialize_catalog(conn: &Connection) -> Result<(), error::GurumeError> {
    conn.execute_batch(schemas::RESTAURANTS_DB_SCHEMA)?;
    Ok(())
}
