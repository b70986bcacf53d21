//! Core library surface for the Table Exporter TUI application.
//!
//! The public modules exposed here provide an intentionally small API so the
//! `bin` target as well as potential external tooling can reuse the same
//! pieces: open a SQLite file, list its tables, export them to CSV, and swap
//! the active database for an imported copy.

pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod import;
pub mod logging;
pub mod models;
pub mod ui;

/// Convenience re-exports for the persistence layer, typically used by
/// `main.rs` to bootstrap the demo database and the active handle.
pub use db::{ensure_demo_database, fetch_table, list_tables, Database};

/// Error type and result alias shared by the helper layers.
pub use error::{AppError, Result};

/// The CSV export entry point.
pub use export::export_table;

/// The primary domain type other layers manipulate.
pub use models::TableEntry;

/// Startup configuration and resolved on-disk layout.
pub use config::{load_settings, Settings, Workspace};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
