use std::mem;
use std::path::{Path, PathBuf};

use anyhow::Result;
use crossterm::event::KeyCode;
use directories::BaseDirs;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use tracing::{error, info};

use crate::config::Workspace;
use crate::db::{list_tables, Database};
use crate::export::export_table;
use crate::import::copy_into_databases;
use crate::models::TableEntry;

use super::forms::ImportForm;
use super::helpers::{centered_rect, surface_error};
use super::screens::TableGrid;

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Header space showing the active database file.
const HEADER_HEIGHT: u16 = 3;

/// Fine-grained modes layered over the single table-grid screen.
enum Mode {
    Normal,
    Importing(ImportForm),
    ExportReport(Vec<ExportOutcome>),
}

/// Result of exporting one checked table, kept for the report dialog.
pub(crate) struct ExportOutcome {
    pub(crate) table: String,
    pub(crate) result: std::result::Result<PathBuf, String>,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state: the owned database handle, the resolved
/// workspace directories, and the table grid the user interacts with.
pub struct App {
    db: Database,
    workspace: Workspace,
    grid: TableGrid,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    /// Build the app around an already-open database and immediately load
    /// its table list. A failed load is logged and surfaced in the footer;
    /// the grid simply starts empty.
    pub fn new(db: Database, workspace: Workspace) -> Self {
        let mut app = Self {
            db,
            workspace,
            grid: TableGrid::new(Vec::new()),
            mode: Mode::Normal,
            status: None,
        };

        if let Err(err) = app.load_tables() {
            error!("failed to load tables: {err:#}");
            app.set_status(
                format!("Failed to load tables: {}", surface_error(&err)),
                StatusKind::Error,
            );
        }
        app
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::Importing(form) => self.handle_import(code, form),
            Mode::ExportReport(report) => Self::handle_export_report(code, report),
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                *exit = true;
            }
            KeyCode::Up => self.grid.move_selection(-1),
            KeyCode::Down => self.grid.move_selection(1),
            KeyCode::PageUp => self.grid.move_selection(-5),
            KeyCode::PageDown => self.grid.move_selection(5),
            KeyCode::Char(' ') => {
                let name = self.grid.current().map(|entry| entry.name.clone());
                if let (Some(checked), Some(name)) = (self.grid.toggle_current(), name) {
                    if checked {
                        self.set_status(format!("{name} marked for export."), StatusKind::Info);
                    } else {
                        self.set_status(format!("{name} unchecked."), StatusKind::Info);
                    }
                } else {
                    self.set_status("No table selected.", StatusKind::Error);
                }
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                return self.on_save();
            }
            KeyCode::Char('i') | KeyCode::Char('I') => {
                self.clear_status();
                return Mode::Importing(ImportForm::with_prefix(home_prefix()));
            }
            _ => {}
        }
        Mode::Normal
    }

    /// Export every checked table, continuing past per-table failures, and
    /// collect the outcomes for the report dialog.
    fn on_save(&mut self) -> Mode {
        let checked = self.grid.checked_names();
        if checked.is_empty() {
            self.set_status("No tables are checked for export.", StatusKind::Error);
            return Mode::Normal;
        }

        let total = checked.len();
        let mut outcomes = Vec::with_capacity(total);
        for name in checked {
            match export_table(self.db.path(), &name, &self.workspace.export_dir) {
                Ok(path) => {
                    outcomes.push(ExportOutcome {
                        table: name,
                        result: Ok(path),
                    });
                }
                Err(err) => {
                    error!("failed to export {name}: {err}");
                    outcomes.push(ExportOutcome {
                        table: name,
                        result: Err(err.to_string()),
                    });
                }
            }
        }

        let succeeded = outcomes
            .iter()
            .filter(|outcome| outcome.result.is_ok())
            .count();
        let kind = if succeeded == total {
            StatusKind::Info
        } else {
            StatusKind::Error
        };
        self.set_status(
            format!("Exported {succeeded} of {total} checked tables."),
            kind,
        );
        Mode::ExportReport(outcomes)
    }

    fn handle_import(&mut self, code: KeyCode, mut form: ImportForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Import cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Backspace => {
                form.backspace();
                Mode::Importing(form)
            }
            KeyCode::Enter => match form.parse_input() {
                Ok(path) => match self.import_database(&path) {
                    Ok(()) => {
                        self.set_status("Database imported successfully.", StatusKind::Info);
                        Mode::Normal
                    }
                    Err(err) => {
                        error!("failed to import {}: {err:#}", path.display());
                        let message = surface_error(&err);
                        form.error = Some(message.clone());
                        self.set_status(message, StatusKind::Error);
                        Mode::Importing(form)
                    }
                },
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    Mode::Importing(form)
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
                Mode::Importing(form)
            }
            _ => Mode::Importing(form),
        }
    }

    fn handle_export_report(code: KeyCode, report: Vec<ExportOutcome>) -> Mode {
        match code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') => Mode::Normal,
            _ => Mode::ExportReport(report),
        }
    }

    /// Rebuild the grid from the active database. The grid is cleared up
    /// front, so a failed query leaves it empty rather than stale.
    pub(crate) fn load_tables(&mut self) -> Result<()> {
        self.grid.clear();
        let names = list_tables(&self.db)?;
        self.grid
            .set_entries(names.into_iter().map(TableEntry::new).collect());
        Ok(())
    }

    /// Bring a new database file in: copy it into the databases directory,
    /// swap the active handle to the copy, and reload the grid. Not
    /// transactional; once the copy lands, the grid has been cleared and
    /// the active path moves even when the reload fails.
    pub(crate) fn import_database(&mut self, source: &Path) -> Result<()> {
        let destination = copy_into_databases(source, &self.workspace.databases_dir)?;
        self.grid.clear();
        self.db.replace(&destination)?;
        self.load_tables()?;
        info!("imported database file {}", source.display());
        Ok(())
    }

    fn set_status(&mut self, text: impl Into<String>, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        self.draw_table_grid(frame, content_area);

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::Importing(form) => self.draw_import_form(frame, area, form),
            Mode::ExportReport(report) => self.draw_export_report(frame, area, report),
            Mode::Normal => {}
        }
    }

    fn draw_table_grid(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(HEADER_HEIGHT), Constraint::Min(1)])
            .split(area);

        let header = Paragraph::new(vec![
            Line::from(vec![
                Span::styled(
                    "Database: ",
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(self.db.path().display().to_string()),
            ]),
            Line::from(Span::raw(format!("{} tables", self.grid.len()))),
        ])
        .alignment(Alignment::Left)
        .block(Block::default().borders(Borders::ALL).title("Table Exporter"));
        frame.render_widget(header, chunks[0]);

        if self.grid.is_empty() {
            let message = Paragraph::new("No tables loaded. Press 'i' to import a database.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("Tables"));
            frame.render_widget(message, chunks[1]);
            return;
        }

        let lines: Vec<Line> = self
            .grid
            .entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| {
                let pointer = if idx == self.grid.selected { "▶ " } else { "  " };
                let checkbox = if entry.export { "[x]" } else { "[ ]" };
                let text = format!("{pointer}{checkbox} {}", entry.name);
                if idx == self.grid.selected {
                    Line::from(Span::styled(
                        text,
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    ))
                } else {
                    Line::from(text)
                }
            })
            .collect();

        let block = Block::default().borders(Borders::ALL).title("Tables");
        let inner_height = block.inner(chunks[1]).height as usize;
        let scroll = if inner_height > 0 && self.grid.selected >= inner_height {
            (self.grid.selected + 1 - inner_height) as u16
        } else {
            0
        };

        let paragraph = Paragraph::new(lines).block(block).scroll((scroll, 0));
        frame.render_widget(paragraph, chunks[1]);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph =
            Paragraph::new(vec![status_line, self.footer_instructions()]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match &self.mode {
            Mode::Importing(_) => Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Import   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            Mode::ExportReport(_) => Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Close"),
            ]),
            Mode::Normal => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Select   "),
                Span::styled("[Space]", key_style),
                Span::raw(" Toggle   "),
                Span::styled("[s]", key_style),
                Span::raw(" Save   "),
                Span::styled("[i]", key_style),
                Span::raw(" Import   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
        }
    }

    fn draw_import_form(&self, frame: &mut Frame, area: Rect, form: &ImportForm) {
        let popup_area = centered_rect(70, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Import Database")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![form.build_line(), Line::from("")];

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to import • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let prefix = "File: ".len() as u16;
        let cursor_x = inner.x + prefix + form.value_len() as u16;
        frame.set_cursor_position((cursor_x, inner.y));
    }

    fn draw_export_report(&self, frame: &mut Frame, area: Rect, report: &[ExportOutcome]) {
        let popup_area = centered_rect(70, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Export Report").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = report
            .iter()
            .map(|outcome| match &outcome.result {
                Ok(path) => Line::from(Span::styled(
                    format!("{} exported to {}", outcome.table, path.display()),
                    Style::default().fg(Color::Green),
                )),
                Err(message) => Line::from(Span::styled(
                    format!("{} failed: {message}", outcome.table),
                    Style::default().fg(Color::Red),
                )),
            })
            .collect();

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press Enter to close.",
            Style::default().fg(Color::Gray),
        )));

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}

/// Starting text for the import form: the user's home directory plus a
/// trailing separator, mirroring a file picker that opens at home.
fn home_prefix() -> String {
    BaseDirs::new()
        .map(|dirs| {
            format!(
                "{}{}",
                dirs.home_dir().display(),
                std::path::MAIN_SEPARATOR
            )
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Settings, Workspace};
    use crate::db::ensure_demo_database;
    use crate::error::AppError;
    use std::fs;

    fn demo_app(dir: &Path) -> App {
        let workspace =
            Workspace::rooted_at(dir.join("data"), &Settings::default()).expect("workspace");
        let db_path =
            ensure_demo_database(&workspace.databases_dir, "example.db").expect("seed demo");
        let db = Database::open(&db_path).expect("open demo");
        App::new(db, workspace)
    }

    fn table_names(app: &App) -> Vec<&str> {
        app.grid
            .entries
            .iter()
            .map(|entry| entry.name.as_str())
            .collect()
    }

    #[test]
    fn startup_populates_grid_from_demo_database() {
        let dir = tempfile::tempdir().expect("tempdir");
        let app = demo_app(dir.path());

        assert_eq!(table_names(&app), vec!["users", "orders"]);
        assert!(app.grid.entries.iter().all(|entry| !entry.export));
    }

    #[test]
    fn save_exports_only_checked_tables() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = demo_app(dir.path());

        // Check "users" (the first row) and save.
        app.handle_key(KeyCode::Char(' ')).expect("toggle");
        app.handle_key(KeyCode::Char('s')).expect("save");

        assert!(matches!(app.mode, Mode::ExportReport(_)));
        let users_csv = app.workspace.export_dir.join("users.csv");
        assert!(users_csv.is_file());
        assert!(!app.workspace.export_dir.join("orders.csv").exists());

        let content = fs::read_to_string(users_csv).expect("read csv");
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "id,name,email");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn save_with_nothing_checked_sets_an_error_status() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = demo_app(dir.path());

        app.handle_key(KeyCode::Char('s')).expect("save");
        assert!(matches!(app.mode, Mode::Normal));
        assert!(matches!(
            app.status,
            Some(StatusMessage {
                kind: StatusKind::Error,
                ..
            })
        ));
    }

    #[test]
    fn importing_a_database_reloads_the_grid() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = demo_app(dir.path());

        // Build a second database with a different schema to import.
        let incoming = dir.path().join("incoming.db");
        let other = Database::open(&incoming).expect("open incoming");
        other
            .execute("CREATE TABLE inventory (id INTEGER PRIMARY KEY)", [])
            .expect("create");
        drop(other);

        app.import_database(&incoming).expect("import");
        assert_eq!(table_names(&app), vec!["inventory"]);
        assert!(app
            .db
            .path()
            .starts_with(&app.workspace.databases_dir));
        assert!(app.workspace.databases_dir.join("incoming.db").is_file());
    }

    #[test]
    fn importing_a_missing_file_keeps_the_grid() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = demo_app(dir.path());
        let previous_path = app.db.path().to_path_buf();

        let err = app
            .import_database(Path::new("/nonexistent/incoming.db"))
            .expect_err("import must fail");
        assert!(matches!(
            err.downcast_ref::<AppError>(),
            Some(AppError::FileCopy { .. })
        ));

        // The copy failed before anything was touched.
        assert_eq!(table_names(&app), vec!["users", "orders"]);
        assert_eq!(app.db.path(), previous_path.as_path());
    }

    #[test]
    fn failed_reload_after_copy_leaves_an_empty_grid() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = demo_app(dir.path());

        // Not a database: the copy succeeds but the reload cannot.
        let bogus = dir.path().join("bogus.db");
        fs::write(&bogus, "this is not a sqlite file, not even close").expect("write bogus");

        app.import_database(&bogus).expect_err("import must fail");

        // Documented non-transactional behavior: the active pointer moved
        // and the grid was cleared before the reload was confirmed.
        assert!(table_names(&app).is_empty());
        assert_eq!(
            app.db.path(),
            app.workspace.databases_dir.join("bogus.db").as_path()
        );
    }

    #[test]
    fn toggling_twice_returns_to_unchecked() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = demo_app(dir.path());

        app.handle_key(KeyCode::Char(' ')).expect("check");
        assert_eq!(app.grid.checked_names(), vec!["users"]);
        app.handle_key(KeyCode::Char(' ')).expect("uncheck");
        assert!(app.grid.checked_names().is_empty());
    }

    #[test]
    fn quit_keys_request_exit() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = demo_app(dir.path());

        assert!(app.handle_key(KeyCode::Char('q')).expect("quit"));
        assert!(app.handle_key(KeyCode::Esc).expect("quit"));
    }
}
