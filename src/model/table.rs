//! Table node types.

use serde::{Deserialize, Serialize};

/// A recovered table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableNode {
    /// Rows in the table
    pub rows: Vec<TableRow>,

    /// Number of header rows (0 = no header)
    pub header_rows: u8,
}

impl TableNode {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            header_rows: 0,
        }
    }

    /// Create a table from a grid of cell texts, first row as header.
    pub fn from_grid<S: Into<String>>(grid: Vec<Vec<S>>) -> Self {
        let header_rows = if grid.len() > 1 { 1 } else { 0 };
        let rows = grid
            .into_iter()
            .enumerate()
            .map(|(i, cells)| TableRow {
                cells: cells.into_iter().map(TableCell::text).collect(),
                is_header: i == 0 && header_rows > 0,
            })
            .collect();
        Self { rows, header_rows }
    }

    /// Add a row to the table.
    pub fn add_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns (based on the widest row).
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0)
    }

    /// Check if the table has no rows or only blank cells.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
            || self
                .rows
                .iter()
                .all(|r| r.cells.iter().all(|c| c.text.trim().is_empty()))
    }

    /// Get plain text representation, rows joined by newlines.
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for TableNode {
    fn default() -> Self {
        Self::new()
    }
}

/// A table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// Cells in the row
    pub cells: Vec<TableCell>,

    /// Whether this is a header row
    pub is_header: bool,
}

impl TableRow {
    /// Create a new row with cells.
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self {
            cells,
            is_header: false,
        }
    }

    /// Create a header row.
    pub fn header(cells: Vec<TableCell>) -> Self {
        Self {
            cells,
            is_header: true,
        }
    }

    /// Get plain text representation, cells joined by tabs.
    pub fn plain_text(&self) -> String {
        self.cells
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\t")
    }
}

/// A table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    /// Cell text content
    pub text: String,
}

impl TableCell {
    /// Create a cell with text content.
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Create an empty cell.
    pub fn empty() -> Self {
        Self {
            text: String::new(),
        }
    }

    /// Check if the cell is blank.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}
