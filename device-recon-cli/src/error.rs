//! Domain errors surfaced to the user
//!
//! Plumbing errors travel as `anyhow::Error`; these variants are the ones the
//! top level recognizes by downcasting to pick a message.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconError {
    /// A required environment setting is absent or empty
    #[error("{0} missing from environment (.env file)")]
    MissingConfig(String),

    /// Microsoft Graph answered with a non-success status
    #[error("{message} (HTTP {status})")]
    Graph { status: u16, message: String },

    /// Token acquisition failed
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("File not found: {}", .0.display())]
    MissingFile(PathBuf),

    /// The expected column header is not present in a table
    #[error("Missing required column '{0}'")]
    MissingColumn(String),

    #[error("Worksheet '{0}' not found in workbook")]
    MissingSheet(String),
}
