//! Table-to-CSV export. Each export opens a fresh connection, materializes
//! the whole table, writes one CSV file, and closes again; nothing is
//! streamed and an existing file of the same name is overwritten without
//! warning.

use std::path::{Path, PathBuf};

use csv::Writer;
use tracing::info;

use crate::db::{fetch_table, Database};
use crate::error::Result;

/// Export one table from the database at `db_path` into
/// `<export_dir>/<table_name>.csv`: a header row of column names followed by
/// one record per row. Returns the written file's path.
pub fn export_table(db_path: &Path, table_name: &str, export_dir: &Path) -> Result<PathBuf> {
    let mut db = Database::open(db_path)?;
    let table = fetch_table(&db, table_name)?;
    db.close();

    let csv_path = export_dir.join(format!("{table_name}.csv"));
    let mut writer = Writer::from_path(&csv_path)?;
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    info!(
        "exported table {table_name} ({} rows) to {}",
        table.row_count(),
        csv_path.display()
    );
    Ok(csv_path)
}
