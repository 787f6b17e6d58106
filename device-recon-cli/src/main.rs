mod api;
mod cli;
mod config;
mod error;
mod services;
mod tables;

use clap::Parser;
use colored::*;

use cli::Cli;
use error::ReconError;

/// Human-readable message for any failure reaching the top level
fn describe_error(err: &anyhow::Error) -> String {
    match err.downcast_ref::<ReconError>() {
        Some(ReconError::Graph { message, .. }) => {
            format!("A Microsoft Graph API error occurred: {}", message)
        }
        Some(ReconError::MissingConfig(_)) => {
            format!("Error: {}. Set CLIENT_ID and TENANT_ID.", err)
        }
        Some(_) => format!("Error: {}", err),
        None => format!("An unexpected error occurred: {:#}", err),
    }
}

// Errors are reported, never propagated: the process always exits normally.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if let Err(err) = cli::run(cli).await {
        log::error!("{:#}", err);
        println!("{}", describe_error(&err).red());
    }
}
