//! Domain models passed between the persistence layer and the TUI. These
//! types stay light-weight data holders so the other layers can focus on
//! presentation and query logic.

/// In-memory record of one table in the active database: its name plus
/// whether the user has marked it for export. Rebuilt from scratch on every
/// load, so the flag never outlives the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableEntry {
    /// Table name exactly as reported by the schema table.
    pub name: String,
    /// Export checkbox state. Always starts unchecked.
    pub export: bool,
}

impl TableEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            export: false,
        }
    }
}
