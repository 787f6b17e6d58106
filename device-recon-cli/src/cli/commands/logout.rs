//! Logout command handler

use anyhow::Result;
use colored::*;

use crate::api::TokenCache;

pub fn handle_logout_command() -> Result<()> {
    let cache = TokenCache::open_default()?;
    if cache.clear()? {
        println!("{} {}", "Removed cached sign-in:".green(), cache.path().display());
    } else {
        println!("No cached sign-in found.");
    }
    Ok(())
}
