use std::path::PathBuf;

use anyhow::{anyhow, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

/// Text-input state for the import dialog: the stand-in for a native file
/// picker. The user types (or pastes) the path of the database file to bring
/// in.
#[derive(Default, Clone)]
pub(crate) struct ImportForm {
    pub(crate) path: String,
    pub(crate) error: Option<String>,
}

impl ImportForm {
    /// Seed the form with a starting directory (usually the user's home) so
    /// typing an absolute path is not required from scratch.
    pub(crate) fn with_prefix(prefix: String) -> Self {
        Self {
            path: prefix,
            error: None,
        }
    }

    /// Append a character to the path, rejecting control characters.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.path.push(ch);
        true
    }

    /// Remove the last character from the path.
    pub(crate) fn backspace(&mut self) {
        self.path.pop();
    }

    /// Validate the input and return the chosen path.
    pub(crate) fn parse_input(&self) -> Result<PathBuf> {
        let trimmed = self.path.trim();
        if trimmed.is_empty() {
            return Err(anyhow!("A database file path is required."));
        }
        Ok(PathBuf::from(trimmed))
    }

    /// Render the input line for the dialog widget.
    pub(crate) fn build_line(&self) -> Line<'static> {
        let display = if self.path.is_empty() {
            "<required>".to_string()
        } else {
            self.path.clone()
        };

        let style = if self.path.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Yellow)
        };

        Line::from(vec![
            Span::raw("File: ".to_string()),
            Span::styled(display, style),
        ])
    }

    /// Character count of the current input, for cursor placement.
    pub(crate) fn value_len(&self) -> usize {
        self.path.chars().count()
    }
}
