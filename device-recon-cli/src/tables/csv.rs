//! CSV import/export for device tables
//!
//! Cells are kept as text so values round-trip unchanged. Files are decoded
//! from the configured encoding before parsing and encoded back on save.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use csv::{ReaderBuilder, WriterBuilder};

use super::{Cell, Table};

/// Character encoding of a CSV file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    #[default]
    Utf8,
    /// ISO-8859-1: every byte is the code point of the same value
    Latin1,
    /// Windows-1252, which assigns printable characters to 0x80-0x9F
    Windows1252,
}

impl TextEncoding {
    /// Decode raw file bytes into a string
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            TextEncoding::Utf8 => {
                let (decoded, _) = encoding_rs::UTF_8.decode_with_bom_removal(bytes);
                decoded.into_owned()
            }
            TextEncoding::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
            TextEncoding::Windows1252 => {
                let (decoded, _, had_errors) = encoding_rs::WINDOWS_1252.decode(bytes);
                if had_errors {
                    log::warn!("Some bytes could not be decoded as windows-1252");
                }
                decoded.into_owned()
            }
        }
    }

    /// Encode a string into file bytes
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            TextEncoding::Utf8 => text.as_bytes().to_vec(),
            TextEncoding::Latin1 => {
                let mut unmappable = 0usize;
                let encoded = text
                    .chars()
                    .map(|c| {
                        u8::try_from(u32::from(c)).unwrap_or_else(|_| {
                            unmappable += 1;
                            b'?'
                        })
                    })
                    .collect();
                if unmappable > 0 {
                    log::warn!("{} characters have no latin1 representation", unmappable);
                }
                encoded
            }
            TextEncoding::Windows1252 => {
                let (encoded, _, had_unmappable) = encoding_rs::WINDOWS_1252.encode(text);
                if had_unmappable {
                    log::warn!("Some characters have no windows-1252 representation");
                }
                encoded.into_owned()
            }
        }
    }
}

impl FromStr for TextEncoding {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "utf-8" | "utf8" => Ok(TextEncoding::Utf8),
            "latin1" | "latin-1" | "iso-8859-1" => Ok(TextEncoding::Latin1),
            "cp1252" | "windows-1252" => Ok(TextEncoding::Windows1252),
            other => bail!(
                "Unsupported encoding '{}' (expected utf-8, latin1 or windows-1252)",
                other
            ),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextEncoding::Utf8 => write!(f, "utf-8"),
            TextEncoding::Latin1 => write!(f, "latin1"),
            TextEncoding::Windows1252 => write!(f, "windows-1252"),
        }
    }
}

/// Read a CSV file whose first record is the header row
pub fn read_csv_table(path: &Path, encoding: TextEncoding) -> Result<Table> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read CSV file: {}", path.display()))?;
    let content = encoding.decode(&bytes);

    parse_csv(&content).with_context(|| format!("Failed to parse CSV file: {}", path.display()))
}

/// Parse CSV text into a table
pub fn parse_csv(content: &str) -> Result<Table> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .context("Failed to read CSV header")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut table = Table::new(headers);
    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Malformed CSV record {}", idx + 1))?;
        let row = record
            .iter()
            .map(|field| {
                if field.is_empty() {
                    Cell::Empty
                } else {
                    Cell::Text(field.to_string())
                }
            })
            .collect();
        table.rows.push(row);
    }

    log::debug!(
        "Parsed CSV with {} columns and {} rows",
        table.headers.len(),
        table.rows.len()
    );
    Ok(table)
}

/// Render a table as CSV text
pub fn render_csv(table: &Table) -> Result<String> {
    let mut writer = WriterBuilder::new().flexible(true).from_writer(Vec::new());

    writer
        .write_record(&table.headers)
        .context("Failed to write CSV header")?;

    for (idx, row) in table.rows.iter().enumerate() {
        let fields: Vec<String> = row.iter().map(Cell::to_field).collect();
        writer
            .write_record(&fields)
            .with_context(|| format!("Failed to write CSV row {}", idx + 1))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV writer: {}", e))?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

/// Write a table to a CSV file in the given encoding, replacing the file
pub fn write_csv_table(table: &Table, path: &Path, encoding: TextEncoding) -> Result<()> {
    let content = render_csv(table)?;
    std::fs::write(path, encoding.encode(&content))
        .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;

    log::info!("CSV file written to: {}", path.display());
    Ok(())
}
