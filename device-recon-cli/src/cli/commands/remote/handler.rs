//! Remote reconcile command handler

use anyhow::Result;
use colored::*;

use super::RemoteArgs;
use crate::api::{AuthManager, GraphClient, TokenCache};
use crate::cli::commands::print_summary;
use crate::config::AzureConfig;
use crate::services::reconcile::{
    MATCH_FLAG_COLUMN, ReconcileOptions, ReconcileSummary, reconcile,
};
use crate::tables::{
    Table, TableOptions, load_table, read_excel_table_from_bytes, write_excel_table_to_bytes,
};

/// Sign in, then run the download/reconcile/upload cycle
pub async fn handle_remote_command(args: RemoteArgs) -> Result<()> {
    let config = AzureConfig::from_env()?;

    // Read the local list before sign-in so a missing file never prompts a login
    let options = TableOptions {
        sheet: args.sheet.clone(),
        encoding: args.encoding,
    };
    let reference = load_table(&args.reference, &options)?;

    let auth = AuthManager::new(config, TokenCache::open_default()?);
    let access_token = auth.acquire_token().await?;

    let client = GraphClient::new(access_token);
    sync_workbook(&client, &args, &reference).await
}

/// Download, reconcile and (unless dry-run) upload the workbook
async fn sync_workbook(client: &GraphClient, args: &RemoteArgs, reference: &Table) -> Result<()> {
    println!("Downloading '{}' from OneDrive...", args.file.cyan());
    let bytes = client.download(&args.file).await?;

    let (sheet, summary) = reconcile_workbook(&bytes, args, reference)?;
    println!("'{}' column updated.", MATCH_FLAG_COLUMN);
    print_summary(&summary);

    if args.dry_run {
        println!("{}", "Dry run: workbook not uploaded.".dimmed());
        return Ok(());
    }

    let updated = write_excel_table_to_bytes(&sheet, &args.sheet)?;

    println!("Uploading changes to '{}'...", args.file.cyan());
    client.upload(&args.file, updated).await?;
    println!("{}", "Successfully uploaded changes to OneDrive!".green().bold());

    Ok(())
}

/// Read the device worksheet from downloaded bytes and apply the match flags
fn reconcile_workbook(
    bytes: &[u8],
    args: &RemoteArgs,
    reference: &Table,
) -> Result<(Table, ReconcileSummary)> {
    let mut sheet = read_excel_table_from_bytes(bytes, &args.sheet)?;
    println!("{}", "Data loaded from online Excel and local file.".green());

    let summary = reconcile(
        &mut sheet,
        reference,
        &ReconcileOptions::with_policy(args.normalize),
    )?;
    Ok((sheet, summary))
}
