//! Subcommand arguments and handlers

pub mod local;
pub mod logout;
pub mod remote;

use colored::*;

use crate::services::reconcile::ReconcileSummary;

/// Print the per-run match counts
fn print_summary(summary: &ReconcileSummary) {
    println!(
        "{} rows checked against {} current devices: {} matched, {} unmatched",
        summary.rows,
        summary.reference_names,
        summary.matched.to_string().green(),
        summary.unmatched.to_string().yellow()
    );
}
