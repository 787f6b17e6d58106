//! Runtime configuration
//!
//! The application registration is identified by two environment values,
//! `CLIENT_ID` and `TENANT_ID`, usually supplied through a `.env` file.
//! File locations default to the constants below and can be overridden per run.

use crate::error::ReconError;

pub const CLIENT_ID_VAR: &str = "CLIENT_ID";
pub const TENANT_ID_VAR: &str = "TENANT_ID";

/// Workbook path inside the user's OneDrive
pub const DEFAULT_REMOTE_FILE: &str = "Testing.xlsx";
/// Worksheet holding the device list
pub const DEFAULT_SHEET: &str = "devices";
/// Local reference list of current devices
pub const DEFAULT_REFERENCE_FILE: &str = "Current.csv";
/// Local device list reconciled by the `local` command
pub const DEFAULT_LOCAL_PRIMARY_FILE: &str = "Devices.csv";
/// Encoding of local CSV files
pub const DEFAULT_CSV_ENCODING: &str = "latin1";

/// Application registration used for Microsoft identity platform sign-in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AzureConfig {
    pub client_id: String,
    pub tenant_id: String,
}

impl AzureConfig {
    /// Read from the process environment
    pub fn from_env() -> Result<Self, ReconError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read through an arbitrary lookup; blank values count as missing
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ReconError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ReconError::MissingConfig(key.to_string()))
        };

        Ok(Self {
            client_id: read(CLIENT_ID_VAR)?,
            tenant_id: read(TENANT_ID_VAR)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_from_lookup() {
        let config =
            AzureConfig::from_lookup(lookup(&[("CLIENT_ID", "app"), ("TENANT_ID", " contoso ")]))
                .unwrap();
        assert_eq!(config.client_id, "app");
        assert_eq!(config.tenant_id, "contoso");
    }

    #[test]
    fn test_missing_values() {
        let err = AzureConfig::from_lookup(lookup(&[("TENANT_ID", "contoso")])).unwrap_err();
        assert!(matches!(err, ReconError::MissingConfig(ref k) if k == "CLIENT_ID"));

        let err = AzureConfig::from_lookup(lookup(&[("CLIENT_ID", "app"), ("TENANT_ID", "  ")]))
            .unwrap_err();
        assert!(matches!(err, ReconError::MissingConfig(ref k) if k == "TENANT_ID"));
    }
}
