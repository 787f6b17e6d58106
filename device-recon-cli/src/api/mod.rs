//! Microsoft identity platform and Microsoft Graph plumbing
//!
//! Token acquisition (cached, refreshed or via the device-authorization grant)
//! and raw file transfer against the signed-in user's OneDrive.

pub mod auth;
pub mod client;
pub mod constants;
pub mod models;
pub mod token_cache;

pub use auth::AuthManager;
pub use client::GraphClient;
pub use token_cache::TokenCache;
