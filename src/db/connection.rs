//! Owned handle around the active SQLite database. The application keeps
//! exactly one of these alive; importing a new file goes through
//! [`Database::replace`], which closes the old connection before opening the
//! new one so connections cannot leak across imports.

use std::path::{Path, PathBuf};

use rusqlite::types::ValueRef;
use rusqlite::{Connection, Params};
use tracing::debug;

use crate::error::{AppError, Result};

/// Column names plus fully materialized rows from one query. Values are
/// already rendered to display strings; nothing is streamed.
#[derive(Debug)]
pub struct QueryRows {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// The single active database: a file path plus an optional live connection.
/// `conn` is `None` only after [`Database::close`] or a failed
/// [`Database::replace`].
#[derive(Debug)]
pub struct Database {
    path: PathBuf,
    conn: Option<Connection>,
}

impl Database {
    /// Open a database file. Fails when the path cannot be opened as a
    /// SQLite database.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let conn = open_connection(&path)?;
        debug!("opened database {}", path.display());
        Ok(Self {
            path,
            conn: Some(conn),
        })
    }

    /// Path of the active database file. Stays meaningful even while the
    /// connection is closed.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Close the connection. Safe to call when nothing is open.
    pub fn close(&mut self) {
        if self.conn.take().is_some() {
            debug!("closed database {}", self.path.display());
        }
    }

    /// Swap the active database for a new file. The old connection is closed
    /// first; on open failure the handle stays closed but the active path
    /// has already moved, matching the non-transactional import flow.
    pub fn replace(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        self.close();
        self.path = path.into();
        let conn = open_connection(&self.path)?;
        debug!("replaced active database with {}", self.path.display());
        self.conn = Some(conn);
        Ok(())
    }

    /// Run a statement that returns no rows. Returns the affected row count.
    pub fn execute<P: Params>(&self, sql: &str, params: P) -> Result<usize> {
        self.conn()?
            .execute(sql, params)
            .map_err(|err| AppError::Query(err.to_string()))
    }

    /// Run a query and materialize the entire result set as strings.
    pub fn query<P: Params>(&self, sql: &str, params: P) -> Result<QueryRows> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(sql)
            .map_err(|err| AppError::Query(err.to_string()))?;

        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let column_count = stmt.column_count();

        let rows = stmt
            .query_map(params, |row| {
                let mut values = Vec::with_capacity(column_count);
                for index in 0..column_count {
                    values.push(format_value(row.get_ref(index)?));
                }
                Ok(values)
            })
            .map_err(|err| AppError::Query(err.to_string()))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|err| AppError::Query(err.to_string()))?;

        Ok(QueryRows { columns, rows })
    }

    fn conn(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or_else(|| {
            AppError::Connection(format!(
                "database handle for {} is closed",
                self.path.display()
            ))
        })
    }
}

/// Open a connection with the pragmas every handle uses. Foreign keys stay
/// on so the demo schema behaves the same in tests and production runs.
fn open_connection(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)
        .map_err(|err| AppError::Connection(format!("{}: {err}", path.display())))?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|err| AppError::Connection(format!("{}: {err}", path.display())))?;
    Ok(conn)
}

/// Render a SQLite value for display and CSV output.
fn format_value(value: ValueRef) -> String {
    match value {
        ValueRef::Null => "NULL".to_string(),
        ValueRef::Integer(int) => int.to_string(),
        ValueRef::Real(real) => real.to_string(),
        ValueRef::Text(text) => String::from_utf8_lossy(text).to_string(),
        ValueRef::Blob(blob) => format!("<BLOB: {} bytes>", blob.len()),
    }
}
