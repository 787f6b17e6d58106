//! Core reconciliation functions: reference extraction and match flags

use super::models::{NamePolicy, ReferenceSet};
use crate::error::ReconError;
use crate::tables::{Cell, Table};

/// Collect the distinct non-empty names of `column` in the reference table
pub fn build_reference_set(reference: &Table, column: &str) -> Result<ReferenceSet, ReconError> {
    let col = reference.require_column(column)?;
    Ok(reference
        .column(col)
        .filter_map(Cell::match_text)
        .collect())
}

/// Whether a single primary cell matches the reference set under `policy`
pub fn is_match(cell: &Cell, reference: &ReferenceSet, policy: NamePolicy) -> bool {
    match cell.match_text() {
        Some(name) => reference.contains(policy.normalize(&name)),
        None => false,
    }
}

/// One flag per primary row, in row order. Duplicate names are evaluated independently.
pub fn compute_match_flags(
    primary: &Table,
    column: &str,
    reference: &ReferenceSet,
    policy: NamePolicy,
) -> Result<Vec<bool>, ReconError> {
    let col = primary.require_column(column)?;
    Ok(primary
        .column(col)
        .map(|cell| is_match(cell, reference, policy))
        .collect())
}
