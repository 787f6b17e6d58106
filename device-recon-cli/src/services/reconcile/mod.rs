//! Device reconciliation service
//!
//! Marks every row of a primary device table with whether its (normalized)
//! device name appears in a reference table. The flag column is recomputed
//! from scratch on every call, so running twice yields the same table.

pub mod core;
pub mod models;

pub use models::{NamePolicy, ReconcileSummary, ReferenceSet};

use crate::error::ReconError;
use crate::tables::{Cell, Table};

/// Column holding the device name in both tables
pub const DEVICE_NAME_COLUMN: &str = "Device Name";

/// Column receiving the match flag
pub const MATCH_FLAG_COLUMN: &str = "Match w/ Current?";

/// Settings for one reconciliation pass
#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    pub name_column: String,
    pub flag_column: String,
    pub policy: NamePolicy,
}

impl ReconcileOptions {
    pub fn with_policy(policy: NamePolicy) -> Self {
        Self {
            name_column: DEVICE_NAME_COLUMN.to_string(),
            flag_column: MATCH_FLAG_COLUMN.to_string(),
            policy,
        }
    }
}

/// Reconcile `primary` against `reference` in place.
///
/// Both name columns are validated before the primary table is touched, so a
/// missing column leaves `primary` unchanged.
pub fn reconcile(
    primary: &mut Table,
    reference: &Table,
    options: &ReconcileOptions,
) -> Result<ReconcileSummary, ReconError> {
    let reference_set = core::build_reference_set(reference, &options.name_column)?;
    if reference_set.is_empty() {
        log::warn!("Reference list has no device names; every row will be unmatched");
    }
    let flags = core::compute_match_flags(
        primary,
        &options.name_column,
        &reference_set,
        options.policy,
    )?;

    let matched = flags.iter().filter(|f| **f).count();
    let summary = ReconcileSummary {
        rows: flags.len(),
        matched,
        unmatched: flags.len() - matched,
        reference_names: reference_set.len(),
    };

    primary.set_column(&options.flag_column, flags.into_iter().map(Cell::Bool).collect());

    log::info!(
        "Reconciled {} rows against {} reference names ({} matched, policy {})",
        summary.rows,
        summary.reference_names,
        summary.matched,
        options.policy
    );
    Ok(summary)
}
