//! `device-recon remote`: reconcile a workbook stored in OneDrive

mod handler;

pub use handler::handle_remote_command;

use std::path::PathBuf;

use clap::Args;

use crate::config::{
    DEFAULT_CSV_ENCODING, DEFAULT_REFERENCE_FILE, DEFAULT_REMOTE_FILE, DEFAULT_SHEET,
};
use crate::services::reconcile::NamePolicy;
use crate::tables::TextEncoding;

#[derive(Args, Debug, Clone, PartialEq)]
pub struct RemoteArgs {
    /// Workbook path relative to the OneDrive root
    #[arg(long, default_value = DEFAULT_REMOTE_FILE)]
    pub file: String,

    /// Worksheet holding the device list
    #[arg(long, default_value = DEFAULT_SHEET)]
    pub sheet: String,

    /// Local reference list of current devices (.csv or .xlsx)
    #[arg(long, default_value = DEFAULT_REFERENCE_FILE)]
    pub reference: PathBuf,

    /// Text encoding of the reference CSV (utf-8, latin1 or windows-1252)
    #[arg(long, default_value = DEFAULT_CSV_ENCODING)]
    pub encoding: TextEncoding,

    /// Device name normalization before lookup (exact or first-token)
    #[arg(long, default_value = "exact")]
    pub normalize: NamePolicy,

    /// Compute and report matches without uploading
    #[arg(long)]
    pub dry_run: bool,
}

impl Default for RemoteArgs {
    fn default() -> Self {
        Self {
            file: DEFAULT_REMOTE_FILE.to_string(),
            sheet: DEFAULT_SHEET.to_string(),
            reference: PathBuf::from(DEFAULT_REFERENCE_FILE),
            encoding: TextEncoding::Latin1,
            normalize: NamePolicy::Exact,
            dry_run: false,
        }
    }
}
