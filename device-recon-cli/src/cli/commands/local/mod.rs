//! `device-recon local`: reconcile a device list file on disk

mod handler;

pub use handler::handle_local_command;

use std::path::PathBuf;

use clap::Args;

use crate::config::{
    DEFAULT_CSV_ENCODING, DEFAULT_LOCAL_PRIMARY_FILE, DEFAULT_REFERENCE_FILE, DEFAULT_SHEET,
};
use crate::services::reconcile::NamePolicy;
use crate::tables::TextEncoding;

#[derive(Args, Debug, Clone, PartialEq)]
pub struct LocalArgs {
    /// Device list to update in place (.csv or .xlsx)
    #[arg(long, default_value = DEFAULT_LOCAL_PRIMARY_FILE)]
    pub primary: PathBuf,

    /// Reference list of current devices (.csv or .xlsx)
    #[arg(long, default_value = DEFAULT_REFERENCE_FILE)]
    pub reference: PathBuf,

    /// Worksheet name used for .xlsx files
    #[arg(long, default_value = DEFAULT_SHEET)]
    pub sheet: String,

    /// Text encoding of CSV files (utf-8, latin1 or windows-1252)
    #[arg(long, default_value = DEFAULT_CSV_ENCODING)]
    pub encoding: TextEncoding,

    /// Device name normalization before lookup (exact or first-token)
    #[arg(long, default_value = "first-token")]
    pub normalize: NamePolicy,

    /// Compute and report matches without writing the file
    #[arg(long)]
    pub dry_run: bool,
}

impl Default for LocalArgs {
    fn default() -> Self {
        Self {
            primary: PathBuf::from(DEFAULT_LOCAL_PRIMARY_FILE),
            reference: PathBuf::from(DEFAULT_REFERENCE_FILE),
            sheet: DEFAULT_SHEET.to_string(),
            encoding: TextEncoding::Latin1,
            normalize: NamePolicy::FirstToken,
            dry_run: false,
        }
    }
}
