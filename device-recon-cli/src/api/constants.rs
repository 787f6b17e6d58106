//! Fixed endpoints and OAuth parameters

/// Identity provider host; the tenant id is appended as the first path segment
pub const AUTHORITY_HOST: &str = "https://login.microsoftonline.com";

/// Microsoft Graph API root
pub const GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

/// Delegated scopes requested for the signed-in user.
/// `offline_access` makes the provider return a refresh token.
pub const SCOPES: &[&str] = &["Files.ReadWrite", "User.Read", "offline_access"];

pub const DEVICE_CODE_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:device_code";
pub const REFRESH_TOKEN_GRANT_TYPE: &str = "refresh_token";

/// Seconds added to the polling interval when the provider answers `slow_down`
pub const SLOW_DOWN_INCREMENT_SECS: u64 = 5;

/// A cached token is only reused while it stays valid for at least this long
pub const TOKEN_EXPIRY_SKEW_SECS: i64 = 60;

/// Upper bounds on provider-supplied lifetimes and intervals
pub const MAX_TOKEN_LIFETIME_SECS: u64 = 24 * 60 * 60;
pub const MAX_DEVICE_CODE_LIFETIME_SECS: u64 = 60 * 60;
pub const MAX_POLL_INTERVAL_SECS: u64 = 60;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Space-separated scope string for OAuth requests
pub fn scope_string() -> String {
    SCOPES.join(" ")
}
