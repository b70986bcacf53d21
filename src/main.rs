//! Binary entry point that glues the SQLite helpers to the TUI. The
//! bootstrapping pipeline: resolve configuration and workspace directories,
//! install logging, seed the demo database, open it, and drive the Ratatui
//! event loop until the user exits.

use anyhow::Context;
use table_exporter::{config, logging, ensure_demo_database, run_app, App, Database, Workspace};

/// Initialize configuration, logging, and the demo database, then launch the
/// event loop. Returning a `Result` bubbles fatal initialization problems
/// (an unwritable data directory, a malformed config file) to the terminal
/// instead of crashing silently.
fn main() -> anyhow::Result<()> {
    let data_dir = config::default_data_dir().context("failed to resolve data directory")?;
    let settings = config::load_settings(&config::config_path(&data_dir))?;
    let workspace = Workspace::rooted_at(data_dir, &settings)?;
    logging::init(&workspace.log_dir, &workspace.log_file);

    let demo_path = ensure_demo_database(&workspace.databases_dir, &settings.database.demo_file)
        .context("failed to seed demo database")?;
    let db = Database::open(&demo_path).context("failed to open demo database")?;

    let mut app = App::new(db, workspace);
    run_app(&mut app)
}
