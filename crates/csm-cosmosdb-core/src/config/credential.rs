//! Master key resolution with optional keyring support
//!
//! A key in the config file is either the literal base64 master key or a
//! `keyring:<entry>` reference looked up in the OS keyring. Keyring lookups
//! need the `secure-storage` feature.

use super::error::{ConfigError, Result};

/// Prefix that indicates a value should be retrieved from the keyring
const KEYRING_PREFIX: &str = "keyring:";

/// Service name for keyring entries
#[cfg(feature = "secure-storage")]
const SERVICE_NAME: &str = "csm-cosmosdb";

/// Check if a value is a keyring reference
pub fn is_keyring_reference(value: &str) -> bool {
    value.starts_with(KEYRING_PREFIX)
}

/// Resolve a credential value: a `keyring:` reference is looked up, anything
/// else is returned as-is.
pub fn resolve_credential(value: &str) -> Result<String> {
    let Some(entry_name) = value.strip_prefix(KEYRING_PREFIX) else {
        return Ok(value.to_string());
    };

    #[cfg(feature = "secure-storage")]
    {
        let entry = keyring::Entry::new(SERVICE_NAME, entry_name)
            .map_err(|e| ConfigError::CredentialError(e.to_string()))?;
        entry.get_password().map_err(|e| {
            ConfigError::CredentialError(format!(
                "keyring entry '{}' could not be read: {}",
                entry_name, e
            ))
        })
    }
    #[cfg(not(feature = "secure-storage"))]
    {
        Err(ConfigError::CredentialError(format!(
            "Credential references keyring entry '{}' but secure-storage feature is not enabled",
            entry_name
        )))
    }
}
