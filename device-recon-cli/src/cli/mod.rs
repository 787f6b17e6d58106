//! Command-line interface
//!
//! Running without a subcommand behaves like `device-recon remote` with all
//! defaults.

pub mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::local::{LocalArgs, handle_local_command};
use commands::logout::handle_logout_command;
use commands::remote::{RemoteArgs, handle_remote_command};

#[derive(Parser)]
#[command(name = "device-recon")]
#[command(about = "Mark devices in a device list as matched against the current-devices list")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reconcile a local device list file in place
    Local(LocalArgs),
    /// Download a workbook from OneDrive, reconcile it and upload it again
    Remote(RemoteArgs),
    /// Forget the cached sign-in
    Logout,
}

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command.unwrap_or_else(|| Commands::Remote(RemoteArgs::default())) {
        Commands::Local(args) => handle_local_command(args),
        Commands::Remote(args) => handle_remote_command(args).await,
        Commands::Logout => handle_logout_command(),
    }
}
