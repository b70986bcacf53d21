//! Table discovery and full-table reads. Discovery only consults the schema
//! table; whether the file is a well-formed database is decided by letting
//! the query fail.

use crate::db::connection::Database;
use crate::error::Result;

/// One table materialized in full: column names plus every row as strings.
#[derive(Debug)]
pub struct TableData {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableData {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// List user table names in schema-table order. SQLite's internal
/// `sqlite_%` tables are excluded so autoincrement bookkeeping does not show
/// up in the grid.
pub fn list_tables(db: &Database) -> Result<Vec<String>> {
    let result = db.query(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
        [],
    )?;

    Ok(result
        .rows
        .into_iter()
        .filter_map(|row| row.into_iter().next())
        .collect())
}

/// Read an entire table into memory. The whole result set is materialized
/// before the caller sees it; fine for the small local files this tool
/// targets.
pub fn fetch_table(db: &Database, name: &str) -> Result<TableData> {
    let result = db.query(&format!("SELECT * FROM {}", quote_identifier(name)), [])?;
    Ok(TableData {
        name: name.to_string(),
        columns: result.columns,
        rows: result.rows,
    })
}

/// Quote a table name so names with spaces or quotes survive interpolation.
fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
