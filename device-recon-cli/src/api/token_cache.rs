//! File-backed token cache
//!
//! A JSON object mapping `tenant_id/client_id` to the last acquired token.

use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::models::TokenInfo;

const CACHE_DIR_NAME: &str = "device-recon";
const CACHE_FILE_NAME: &str = "token_cache.json";

#[derive(Debug, Clone)]
pub struct TokenCache {
    path: PathBuf,
}

impl TokenCache {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Cache in the per-user cache directory
    pub fn open_default() -> Result<Self> {
        let dir = dirs::cache_dir().context("Could not determine the user cache directory")?;
        Ok(Self::new(dir.join(CACHE_DIR_NAME).join(CACHE_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cache key for an application registration in a tenant
    pub fn key(tenant_id: &str, client_id: &str) -> String {
        format!("{}/{}", tenant_id, client_id)
    }

    fn read_all(&self) -> Result<BTreeMap<String, TokenInfo>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read token cache: {}", self.path.display()))?;

        match serde_json::from_str(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                // A corrupt cache only costs a fresh login
                log::warn!("Ignoring unreadable token cache {}: {}", self.path.display(), e);
                Ok(BTreeMap::new())
            }
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, TokenInfo>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create cache directory: {}", parent.display())
            })?;
        }

        let json =
            serde_json::to_string_pretty(entries).context("Failed to serialize token cache")?;

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        // New files are created owner-only
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options
            .open(&self.path)
            .with_context(|| format!("Failed to open token cache: {}", self.path.display()))?;

        // `mode` only applies on creation; tighten a file left over with wider permissions
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))
                .with_context(|| {
                    format!("Failed to restrict token cache permissions: {}", self.path.display())
                })?;
        }

        file.write_all(json.as_bytes())
            .with_context(|| format!("Failed to write token cache: {}", self.path.display()))?;

        Ok(())
    }

    pub fn load(&self, key: &str) -> Result<Option<TokenInfo>> {
        Ok(self.read_all()?.remove(key))
    }

    pub fn store(&self, key: &str, token: &TokenInfo) -> Result<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), token.clone());
        self.write_all(&entries)?;
        log::debug!("Stored token for {} in {}", key, self.path.display());
        Ok(())
    }

    /// Delete the cache file. Returns whether anything was removed.
    pub fn clear(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&self.path)
            .with_context(|| format!("Failed to remove token cache: {}", self.path.display()))?;
        Ok(true)
    }
}
