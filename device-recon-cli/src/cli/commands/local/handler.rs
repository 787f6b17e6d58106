//! Local reconcile command handler

use anyhow::Result;
use colored::*;

use super::LocalArgs;
use crate::cli::commands::print_summary;
use crate::services::reconcile::{MATCH_FLAG_COLUMN, ReconcileOptions, reconcile};
use crate::tables::{TableOptions, load_table, save_table};

pub fn handle_local_command(args: LocalArgs) -> Result<()> {
    let options = TableOptions {
        sheet: args.sheet.clone(),
        encoding: args.encoding,
    };

    log::info!(
        "Local reconcile of {} against {} ({}, policy {})",
        args.primary.display(),
        args.reference.display(),
        args.encoding,
        args.normalize
    );

    let mut primary = load_table(&args.primary, &options)?;
    let reference = load_table(&args.reference, &options)?;
    println!(
        "{} {} rows from '{}' and {} rows from '{}'.",
        "Loaded".green(),
        primary.row_count(),
        args.primary.display(),
        reference.row_count(),
        args.reference.display()
    );

    let summary = reconcile(
        &mut primary,
        &reference,
        &ReconcileOptions::with_policy(args.normalize),
    )?;
    print_summary(&summary);

    if args.dry_run {
        println!("{}", "Dry run: file left unchanged.".dimmed());
        return Ok(());
    }

    save_table(&primary, &args.primary, &options)?;
    println!(
        "{} '{}' column updated in '{}'.",
        "Done:".green().bold(),
        MATCH_FLAG_COLUMN,
        args.primary.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReconError;
    use crate::tables::TextEncoding;
    use std::path::Path;

    fn args(dir: &Path, primary: &str) -> LocalArgs {
        LocalArgs {
            primary: dir.join(primary),
            reference: dir.join("Current.csv"),
            encoding: TextEncoding::Utf8,
            ..LocalArgs::default()
        }
    }

    #[test]
    fn test_updates_csv_in_place() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("Devices.csv"),
            "Device Name,Owner\nLaptop9 (Office),ann\nPrinter1,bob\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("Current.csv"), "Device Name\nLaptop9\n").unwrap();

        handle_local_command(args(dir.path(), "Devices.csv")).unwrap();

        let written = std::fs::read_to_string(dir.path().join("Devices.csv")).unwrap();
        assert_eq!(
            written,
            "Device Name,Owner,Match w/ Current?\nLaptop9 (Office),ann,True\nPrinter1,bob,False\n"
        );

        // Second run over its own output is a no-op
        handle_local_command(args(dir.path(), "Devices.csv")).unwrap();
        let rewritten = std::fs::read_to_string(dir.path().join("Devices.csv")).unwrap();
        assert_eq!(rewritten, written);
    }

    #[test]
    fn test_dry_run_leaves_file() {
        let dir = tempfile::tempdir().unwrap();
        let content = "Device Name\nLaptop9\n";
        std::fs::write(dir.path().join("Devices.csv"), content).unwrap();
        std::fs::write(dir.path().join("Current.csv"), "Device Name\nLaptop9\n").unwrap();

        let mut local = args(dir.path(), "Devices.csv");
        local.dry_run = true;
        handle_local_command(local).unwrap();

        assert_eq!(
            std::fs::read_to_string(dir.path().join("Devices.csv")).unwrap(),
            content
        );
    }

    #[test]
    fn test_missing_column_does_not_write() {
        let dir = tempfile::tempdir().unwrap();
        let content = "Device Name\nLaptop9\n";
        std::fs::write(dir.path().join("Devices.csv"), content).unwrap();
        std::fs::write(dir.path().join("Current.csv"), "Hostname\nLaptop9\n").unwrap();

        let err = handle_local_command(args(dir.path(), "Devices.csv")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ReconError>(),
            Some(ReconError::MissingColumn(_))
        ));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("Devices.csv")).unwrap(),
            content
        );
    }

    #[test]
    fn test_missing_reference_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Devices.csv"), "Device Name\nLaptop9\n").unwrap();

        let err = handle_local_command(args(dir.path(), "Devices.csv")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ReconError>(),
            Some(ReconError::MissingFile(_))
        ));
    }

    #[test]
    fn test_updates_workbook_in_place() {
        use crate::tables::{Cell, Table, read_excel_table, write_excel_table};

        let dir = tempfile::tempdir().unwrap();
        let mut devices = Table::new(vec!["Device Name".to_string()]);
        devices.rows.push(vec![Cell::Text("Router2 spare".to_string())]);
        devices.rows.push(vec![Cell::Text("Printer1".to_string())]);
        write_excel_table(&devices, &dir.path().join("Devices.xlsx"), "devices").unwrap();
        std::fs::write(dir.path().join("Current.csv"), "Device Name\nRouter2\n").unwrap();

        handle_local_command(args(dir.path(), "Devices.xlsx")).unwrap();

        let updated = read_excel_table(&dir.path().join("Devices.xlsx"), "devices").unwrap();
        assert_eq!(updated.headers, vec!["Device Name", "Match w/ Current?"]);
        assert_eq!(updated.cell(0, 1), &Cell::Bool(true));
        assert_eq!(updated.cell(1, 1), &Cell::Bool(false));
    }
}
