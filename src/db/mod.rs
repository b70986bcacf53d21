//! Persistence module split across logical submodules.

mod connection;
mod seed;
mod tables;

pub use connection::{Database, QueryRows};
pub use seed::ensure_demo_database;
pub use tables::{fetch_table, list_tables, TableData};
