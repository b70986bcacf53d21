//! Demo database seeding. Runs on every startup so a fresh install has
//! something to export immediately. Schema creation uses `IF NOT EXISTS` and
//! the sample rows are only inserted into an empty database, so repeated
//! runs never accumulate duplicates.

use std::path::{Path, PathBuf};

use rusqlite::params;
use tracing::info;

use crate::db::connection::Database;
use crate::error::Result;

/// Create the demo database inside `databases_dir` if it does not already
/// have data, and return its path. Two related tables: `users` and `orders`
/// referencing users by foreign key.
pub fn ensure_demo_database(databases_dir: &Path, file_name: &str) -> Result<PathBuf> {
    let db_path = databases_dir.join(file_name);
    let mut db = Database::open(&db_path)?;

    db.execute(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL
        )",
        [],
    )?;

    db.execute(
        "CREATE TABLE IF NOT EXISTS orders (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER,
            product TEXT NOT NULL,
            quantity INTEGER NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id)
        )",
        [],
    )?;

    let users = db.query("SELECT COUNT(*) FROM users", [])?;
    let already_seeded = users
        .rows
        .first()
        .and_then(|row| row.first())
        .is_some_and(|count| count != "0");

    if !already_seeded {
        db.execute(
            "INSERT INTO users (name, email) VALUES (?1, ?2)",
            params!["Saul Hudson", "a#minor4ever@songingernogre.com.uk.eu"],
        )?;
        db.execute(
            "INSERT INTO users (name, email) VALUES (?1, ?2)",
            params!["Example 2", "e2@citromail.hu"],
        )?;
        db.execute(
            "INSERT INTO orders (user_id, product, quantity) VALUES (?1, ?2, ?3)",
            params![1, "Product A Type Les Paul Rec Reiusse 59", 3],
        )?;
        db.execute(
            "INSERT INTO orders (user_id, product, quantity) VALUES (?1, ?2, ?3)",
            params![2, "Product B Type Marshall Rec JCM800 86", 2],
        )?;
        info!("seeded demo database at {}", db_path.display());
    }

    db.close();
    Ok(db_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tables::list_tables;

    fn count(db: &Database, table: &str) -> String {
        let result = db
            .query(&format!("SELECT COUNT(*) FROM {table}"), [])
            .expect("count query");
        result.rows[0][0].clone()
    }

    #[test]
    fn seeds_two_parents_and_two_children() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = ensure_demo_database(dir.path(), "example.db").expect("seed");
        assert!(path.is_file());

        let db = Database::open(&path).expect("open seeded db");
        assert_eq!(list_tables(&db).expect("tables"), vec!["users", "orders"]);
        assert_eq!(count(&db, "users"), "2");
        assert_eq!(count(&db, "orders"), "2");

        let users = db
            .query("SELECT name FROM users ORDER BY id", [])
            .expect("names");
        assert_eq!(users.rows[0][0], "Saul Hudson");
        assert_eq!(users.rows[1][0], "Example 2");

        let orders = db
            .query("SELECT user_id FROM orders ORDER BY id", [])
            .expect("order links");
        assert_eq!(orders.rows[0][0], "1");
        assert_eq!(orders.rows[1][0], "2");
    }

    #[test]
    fn reseeding_does_not_duplicate_rows() {
        let dir = tempfile::tempdir().expect("tempdir");
        ensure_demo_database(dir.path(), "example.db").expect("first seed");
        let path = ensure_demo_database(dir.path(), "example.db").expect("second seed");

        let db = Database::open(&path).expect("open seeded db");
        assert_eq!(count(&db, "users"), "2");
        assert_eq!(count(&db, "orders"), "2");
    }
}
