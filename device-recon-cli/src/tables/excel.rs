//! Excel workbook import/export for device tables
//!
//! Only one named worksheet is read. Written workbooks contain that single
//! worksheet. Leading empty columns are kept as unnamed columns and the header
//! row is written back where it was read, so the sheet layout survives a
//! round trip.

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use anyhow::{Context, Result};
use calamine::{Data, Reader, Xlsx, open_workbook};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use super::{Cell, Table};
use crate::error::ReconError;

const DATE_TIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Convert a calamine cell into a table cell
fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) if s.is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::DateTime(dt.as_f64()),
        Data::DateTimeIso(s) => Cell::Text(s.clone()),
        Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(_) => Cell::Empty,
    }
}

fn read_sheet<RS: Read + Seek>(workbook: &mut Xlsx<RS>, sheet: &str) -> Result<Table> {
    if !workbook.sheet_names().iter().any(|name| name == sheet) {
        return Err(ReconError::MissingSheet(sheet.to_string()).into());
    }

    let range = workbook
        .worksheet_range(sheet)
        .with_context(|| format!("Failed to read sheet: {}", sheet))?;

    // The range only spans used cells; its start is where the data sits in the sheet
    let (first_row, first_col) = match range.start() {
        Some(start) => start,
        None => return Ok(Table::default()),
    };
    let leading = first_col as usize;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header) => std::iter::repeat_n(String::new(), leading)
            .chain(header.iter().map(|c| data_to_cell(c).to_field()))
            .collect(),
        None => return Ok(Table::default()),
    };

    let mut table = Table::new(headers);
    table.header_row = first_row;
    for row in rows {
        table.rows.push(
            std::iter::repeat_n(Cell::Empty, leading)
                .chain(row.iter().map(data_to_cell))
                .collect(),
        );
    }

    log::debug!(
        "Read sheet '{}' with {} columns and {} rows",
        sheet,
        table.headers.len(),
        table.rows.len()
    );
    Ok(table)
}

/// Read one worksheet of an Excel file on disk
pub fn read_excel_table(path: &Path, sheet: &str) -> Result<Table> {
    let mut workbook: Xlsx<_> = open_workbook(path)
        .with_context(|| format!("Failed to open Excel file: {}", path.display()))?;

    read_sheet(&mut workbook, sheet)
}

/// Read one worksheet of an Excel file held in memory
pub fn read_excel_table_from_bytes(bytes: &[u8], sheet: &str) -> Result<Table> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(bytes)).context("Failed to open Excel workbook from memory")?;

    read_sheet(&mut workbook, sheet)
}

fn write_cell(
    ws: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &Cell,
    date_format: &Format,
) -> Result<()> {
    match cell {
        Cell::Empty => { /* Leave cell empty */ }
        Cell::Text(s) => {
            ws.write_string(row, col, s)?;
        }
        Cell::Int(i) => {
            ws.write_number(row, col, *i as f64)?;
        }
        Cell::Float(f) => {
            ws.write_number(row, col, *f)?;
        }
        Cell::Bool(b) => {
            ws.write_boolean(row, col, *b)?;
        }
        Cell::DateTime(serial) => {
            ws.write_number_with_format(row, col, *serial, date_format)?;
        }
    }
    Ok(())
}

fn build_workbook(table: &Table, sheet: &str) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(sheet)
        .with_context(|| format!("Invalid worksheet name: {}", sheet))?;

    let date_format = Format::new().set_num_format(DATE_TIME_FORMAT);

    let header_row = table.header_row;
    for (col, name) in table.headers.iter().enumerate() {
        // Unnamed leading columns stay blank
        if !name.is_empty() {
            worksheet.write_string(header_row, col as u16, name)?;
        }
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let row_num = header_row + 1 + row_idx as u32;
        for (col, cell) in row.iter().enumerate() {
            write_cell(worksheet, row_num, col as u16, cell, &date_format)?;
        }
    }

    Ok(workbook)
}

/// Write a table as a single-sheet Excel file on disk
pub fn write_excel_table(table: &Table, path: &Path, sheet: &str) -> Result<()> {
    let mut workbook = build_workbook(table, sheet)?;
    workbook
        .save(path)
        .with_context(|| format!("Failed to save Excel file: {}", path.display()))?;

    log::info!("Excel file written to: {}", path.display());
    Ok(())
}

/// Serialize a table as a single-sheet Excel workbook in memory
pub fn write_excel_table_to_bytes(table: &Table, sheet: &str) -> Result<Vec<u8>> {
    let mut workbook = build_workbook(table, sheet)?;
    workbook
        .save_to_buffer()
        .context("Failed to serialize Excel workbook")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Table {
        let mut table = Table::new(vec![
            "Device Name".to_string(),
            "Seats".to_string(),
            "Match w/ Current?".to_string(),
        ]);
        table.rows.push(vec![
            Cell::Text("Laptop9".to_string()),
            Cell::Float(3.0),
            Cell::Bool(true),
        ]);
        table.rows.push(vec![
            Cell::Text("Printer1".to_string()),
            Cell::Empty,
            Cell::Bool(false),
        ]);
        table
    }

    #[test]
    fn test_bytes_round_trip_preserves_types() {
        let table = sample_table();
        let bytes = write_excel_table_to_bytes(&table, "devices").unwrap();

        let read_back = read_excel_table_from_bytes(&bytes, "devices").unwrap();
        assert_eq!(read_back.headers, table.headers);
        assert_eq!(read_back.row_count(), 2);
        assert_eq!(read_back.cell(0, 0), &Cell::Text("Laptop9".to_string()));
        assert_eq!(read_back.cell(0, 1).match_text(), Some("3".to_string()));
        assert_eq!(read_back.cell(0, 2), &Cell::Bool(true));
        assert_eq!(read_back.cell(1, 1), &Cell::Empty);
        assert_eq!(read_back.cell(1, 2), &Cell::Bool(false));
    }

    #[test]
    fn test_missing_sheet() {
        let bytes = write_excel_table_to_bytes(&sample_table(), "devices").unwrap();

        let err = read_excel_table_from_bytes(&bytes, "Sheet1").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ReconError>(),
            Some(ReconError::MissingSheet(s)) if s == "Sheet1"
        ));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Testing.xlsx");

        write_excel_table(&sample_table(), &path, "devices").unwrap();
        let read_back = read_excel_table(&path, "devices").unwrap();

        assert_eq!(read_back.headers[0], "Device Name");
        assert_eq!(read_back.cell(1, 0), &Cell::Text("Printer1".to_string()));
    }

    /// Used-cell origin of a worksheet plus the value found there
    fn sheet_origin(bytes: &[u8], sheet: &str) -> (Option<(u32, u32)>, Option<Data>) {
        let mut workbook = Xlsx::new(Cursor::new(bytes)).unwrap();
        let range = workbook.worksheet_range(sheet).unwrap();
        let start = range.start();
        let value = start.and_then(|pos| range.get_value(pos).cloned());
        (start, value)
    }

    #[test]
    fn test_offset_sheet_keeps_layout() {
        // Header at C3: two blank columns and two blank rows before the data
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("devices").unwrap();
        worksheet.write_string(2, 2, "Device Name").unwrap();
        worksheet.write_string(2, 3, "Owner").unwrap();
        worksheet.write_string(3, 2, "Laptop9").unwrap();
        worksheet.write_string(3, 3, "ann").unwrap();
        let original = workbook.save_to_buffer().unwrap();

        let table = read_excel_table_from_bytes(&original, "devices").unwrap();
        assert_eq!(table.header_row, 2);
        assert_eq!(table.headers, vec!["", "", "Device Name", "Owner"]);
        assert_eq!(table.column_index("Device Name"), Some(2));
        assert_eq!(table.cell(0, 2), &Cell::Text("Laptop9".to_string()));
        assert_eq!(table.cell(0, 0), &Cell::Empty);

        let written = write_excel_table_to_bytes(&table, "devices").unwrap();
        assert_eq!(
            sheet_origin(&written, "devices"),
            (Some((2, 2)), Some(Data::String("Device Name".to_string())))
        );

        let read_back = read_excel_table_from_bytes(&written, "devices").unwrap();
        assert_eq!(read_back, table);
    }

    #[test]
    fn test_sheet_anchored_at_b1() {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("devices").unwrap();
        worksheet.write_string(0, 1, "Device Name").unwrap();
        worksheet.write_string(1, 1, "Laptop9").unwrap();
        let original = workbook.save_to_buffer().unwrap();

        let mut table = read_excel_table_from_bytes(&original, "devices").unwrap();
        table.set_column("Match w/ Current?", vec![Cell::Bool(true)]);

        let written = write_excel_table_to_bytes(&table, "devices").unwrap();
        assert_eq!(
            sheet_origin(&written, "devices"),
            (Some((0, 1)), Some(Data::String("Device Name".to_string())))
        );

        let read_back = read_excel_table_from_bytes(&written, "devices").unwrap();
        assert_eq!(read_back.headers, vec!["", "Device Name", "Match w/ Current?"]);
        assert_eq!(read_back.cell(0, 1), &Cell::Text("Laptop9".to_string()));
        assert_eq!(read_back.cell(0, 2), &Cell::Bool(true));
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        assert!(read_excel_table_from_bytes(b"not a workbook", "devices").is_err());
    }
}
