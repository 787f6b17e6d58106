//! In-memory tabular data shared by the CSV and Excel readers/writers
//!
//! A `Table` is a header row plus data rows. Rows may be ragged (shorter than
//! the header); missing trailing cells read as `Cell::Empty`.

pub mod csv;
pub mod excel;

use std::path::Path;

use anyhow::Result;

use crate::error::ReconError;

pub use self::csv::{TextEncoding, read_csv_table, write_csv_table};
pub use excel::{
    read_excel_table, read_excel_table_from_bytes, write_excel_table, write_excel_table_to_bytes,
};

/// A single cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Spreadsheet date-time serial number
    DateTime(f64),
}

impl Cell {
    /// Text used when comparing this cell against device names.
    /// Empty cells have no comparison text.
    pub fn match_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) if s.is_empty() => None,
            Cell::Text(s) => Some(s.clone()),
            Cell::Int(i) => Some(i.to_string()),
            Cell::Float(f) => Some(format_float(*f)),
            Cell::Bool(b) => Some(format_bool(*b).to_string()),
            Cell::DateTime(serial) => Some(format_float(*serial)),
        }
    }

    /// Rendering used when the cell is written to a text format
    pub fn to_field(&self) -> String {
        self.match_text().unwrap_or_default()
    }
}

/// Booleans are rendered the way spreadsheet exports usually spell them
fn format_bool(b: bool) -> &'static str {
    if b { "True" } else { "False" }
}

fn format_float(f: f64) -> String {
    // Whole numbers drop the fractional part ("42" rather than "42.0")
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        (f as i64).to_string()
    } else {
        f.to_string()
    }
}

/// Header row plus data rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    /// Worksheet row holding the header; 0 for tables not read from a workbook
    pub header_row: u32,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
            header_row: 0,
        }
    }

    /// Index of the column with exactly this header
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Index of the named column, or a missing-column error
    pub fn require_column(&self, name: &str) -> Result<usize, ReconError> {
        self.column_index(name)
            .ok_or_else(|| ReconError::MissingColumn(name.to_string()))
    }

    /// Cell at (row, col); ragged rows read as empty
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&Cell::Empty)
    }

    /// Iterate over one column's cells, one per data row
    pub fn column(&self, col: usize) -> impl Iterator<Item = &Cell> + '_ {
        (0..self.rows.len()).map(move |row| self.cell(row, col))
    }

    /// Overwrite a column in place, or append it when the header is new.
    /// `values` must hold one cell per data row.
    pub fn set_column(&mut self, name: &str, values: Vec<Cell>) {
        let col = match self.column_index(name) {
            Some(col) => col,
            None => {
                self.headers.push(name.to_string());
                self.headers.len() - 1
            }
        };

        for (row, value) in self.rows.iter_mut().zip(values) {
            if row.len() <= col {
                row.resize(col + 1, Cell::Empty);
            }
            row[col] = value;
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// On-disk representation picked from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Excel,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("xlsx") | Some("xlsm") => TableFormat::Excel,
            _ => TableFormat::Csv,
        }
    }
}

/// Options controlling how a local table is loaded and saved
#[derive(Debug, Clone)]
pub struct TableOptions {
    /// Worksheet name for workbooks
    pub sheet: String,
    /// Text encoding for CSV files
    pub encoding: TextEncoding,
}

/// Load a local table, dispatching on the file extension
pub fn load_table(path: &Path, options: &TableOptions) -> Result<Table> {
    if !path.exists() {
        return Err(ReconError::MissingFile(path.to_path_buf()).into());
    }

    match TableFormat::from_path(path) {
        TableFormat::Csv => read_csv_table(path, options.encoding),
        TableFormat::Excel => read_excel_table(path, &options.sheet),
    }
}

/// Save a local table, dispatching on the file extension
pub fn save_table(table: &Table, path: &Path, options: &TableOptions) -> Result<()> {
    match TableFormat::from_path(path) {
        TableFormat::Csv => write_csv_table(table, path, options.encoding),
        TableFormat::Excel => write_excel_table(table, path, &options.sheet),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn test_match_text() {
        assert_eq!(Cell::Empty.match_text(), None);
        assert_eq!(text("").match_text(), None);
        assert_eq!(text("Laptop9").match_text(), Some("Laptop9".to_string()));
        assert_eq!(Cell::Int(42).match_text(), Some("42".to_string()));
        assert_eq!(Cell::Float(42.0).match_text(), Some("42".to_string()));
        assert_eq!(Cell::Float(1.5).match_text(), Some("1.5".to_string()));
        assert_eq!(Cell::Bool(true).match_text(), Some("True".to_string()));
    }

    #[test]
    fn test_set_column_appends_new_header() {
        let mut table = Table::new(vec!["Device Name".to_string()]);
        table.rows.push(vec![text("a")]);
        table.rows.push(vec![text("b")]);

        table.set_column("Flag", vec![Cell::Bool(true), Cell::Bool(false)]);

        assert_eq!(table.headers, vec!["Device Name", "Flag"]);
        assert_eq!(table.cell(0, 1), &Cell::Bool(true));
        assert_eq!(table.cell(1, 1), &Cell::Bool(false));
    }

    #[test]
    fn test_set_column_overwrites_in_place() {
        let mut table = Table::new(vec!["Flag".to_string(), "Device Name".to_string()]);
        table.rows.push(vec![text("stale"), text("a")]);

        table.set_column("Flag", vec![Cell::Bool(false)]);

        assert_eq!(table.headers, vec!["Flag", "Device Name"]);
        assert_eq!(table.rows[0], vec![Cell::Bool(false), text("a")]);
    }

    #[test]
    fn test_set_column_pads_ragged_rows() {
        let mut table = Table::new(vec!["A".to_string(), "B".to_string()]);
        table.rows.push(vec![text("only a")]);

        table.set_column("C", vec![Cell::Bool(true)]);

        assert_eq!(
            table.rows[0],
            vec![text("only a"), Cell::Empty, Cell::Bool(true)]
        );
    }

    #[test]
    fn test_require_column_missing() {
        let table = Table::new(vec!["Name".to_string()]);
        let err = table.require_column("Device Name").unwrap_err();
        assert!(matches!(err, ReconError::MissingColumn(ref c) if c == "Device Name"));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(TableFormat::from_path(Path::new("Testing.xlsx")), TableFormat::Excel);
        assert_eq!(TableFormat::from_path(Path::new("Book.XLSX")), TableFormat::Excel);
        assert_eq!(TableFormat::from_path(Path::new("Current.csv")), TableFormat::Csv);
        assert_eq!(TableFormat::from_path(Path::new("devices")), TableFormat::Csv);
    }

    #[test]
    fn test_load_table_missing_file() {
        let options = TableOptions {
            sheet: "devices".to_string(),
            encoding: TextEncoding::Utf8,
        };
        let err = load_table(Path::new("/nonexistent/Current.csv"), &options).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ReconError>(),
            Some(ReconError::MissingFile(_))
        ));
    }
}
