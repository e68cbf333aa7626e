pub use crate::config::*;

/// A builder for assembling a table cell by cell, for callers that do not
/// start from the text of an export.
///
/// ```
/// use schedule_match::builder::TableBuilder;
/// use schedule_match::{Symbol, TableError};
///
/// let mut builder = TableBuilder::new("日程", &["Anna".to_string(), "Bob".to_string()])?;
/// builder.add_row("4/1", &["◎", "○"]);
/// builder.add_row("4/2", &["×"]);
/// let table = builder.build()?;
///
/// assert_eq!(*table.cell("4/1", "Bob"), Symbol::Circle);
/// assert_eq!(*table.cell("4/2", "Bob"), Symbol::Blank);
/// # Ok::<(), TableError>(())
/// ```
pub struct TableBuilder {
    _header: Vec<String>,
    _rows: Vec<Vec<String>>,
}

impl TableBuilder {
    pub fn new(label_header: &str, participants: &[String]) -> Result<TableBuilder, TableError> {
        let mut header = vec![label_header.to_string()];
        header.extend(participants.iter().cloned());
        // Validates the participant names early.
        crate::load_grid(vec![header.clone()])?;
        Ok(TableBuilder {
            _header: header,
            _rows: Vec::new(),
        })
    }

    /// Adds a row. The cells are read in the order of the participants; the
    /// missing ones are blank.
    pub fn add_row(&mut self, label: &str, cells: &[&str]) {
        let mut row = vec![label.to_string()];
        row.extend(cells.iter().map(|c| c.to_string()));
        self._rows.push(row);
    }

    pub fn build(self) -> Result<Table, TableError> {
        let mut grid = vec![self._header];
        grid.extend(self._rows);
        crate::load_grid(grid)
    }
}
