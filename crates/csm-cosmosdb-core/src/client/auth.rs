//! Master-key request signing
//!
//! Every REST call carries an `authorization` header derived from an
//! HMAC-SHA256 of the verb, resource type, resource link and request date.

use base64::{Engine as _, engine::general_purpose};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::error::CosmosError;

type HmacSha256 = Hmac<Sha256>;

/// Decoded account master key
#[derive(Clone)]
pub(crate) struct MasterKey(Vec<u8>);

impl MasterKey {
    pub(crate) fn from_base64(encoded: &str) -> Result<Self, CosmosError> {
        let trimmed = encoded.trim();
        if trimmed.is_empty() {
            return Err(CosmosError::InvalidKey("master key is empty".to_string()));
        }
        general_purpose::STANDARD
            .decode(trimmed)
            .map(MasterKey)
            .map_err(|e| CosmosError::InvalidKey(format!("master key is not valid base64: {}", e)))
    }

    /// Build the url-encoded `authorization` header value.
    ///
    /// `resource_link` is case sensitive and signed as given; verb, resource
    /// type and date are lowercased.
    pub(crate) fn authorization(
        &self,
        verb: &str,
        resource_type: &str,
        resource_link: &str,
        date: &str,
    ) -> Result<String, CosmosError> {
        let payload = format!(
            "{}\n{}\n{}\n{}\n\n",
            verb.to_lowercase(),
            resource_type.to_lowercase(),
            resource_link,
            date.to_lowercase()
        );

        let mut mac = HmacSha256::new_from_slice(&self.0)
            .map_err(|e| CosmosError::InvalidKey(format!("HMAC error: {}", e)))?;
        mac.update(payload.as_bytes());
        let signature = general_purpose::STANDARD.encode(mac.finalize().into_bytes());

        let token = format!("type=master&ver=1.0&sig={}", signature);
        Ok(urlencoding::encode(&token).into_owned())
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MasterKey(****)")
    }
}

/// RFC 1123 date as expected by the `x-ms-date` header
pub(crate) fn rfc1123_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    const TEST_KEY: &str = "cGhvZW5peC10ZXN0LW1hc3Rlci1rZXk=";

    #[test]
    fn test_rfc1123_date() {
        let at = Utc.with_ymd_and_hms(2017, 4, 27, 0, 51, 12).unwrap();
        assert_eq!(rfc1123_date(at), "Thu, 27 Apr 2017 00:51:12 GMT");
    }

    #[test]
    fn test_authorization_matches_known_signature() {
        let key = MasterKey::from_base64(TEST_KEY).unwrap();
        let token = key
            .authorization("GET", "dbs", "dbs/phoenix-core", "Thu, 27 Apr 2017 00:51:12 GMT")
            .unwrap();

        assert_eq!(
            token,
            "type%3Dmaster%26ver%3D1.0%26sig%3DBZYODlSm6cdZ2AnbP7dx8sekwj8Agjjd9%2B%2FCdAg%2FUJU%3D"
        );
    }

    #[test]
    fn test_resource_link_is_case_sensitive() {
        let key = MasterKey::from_base64(TEST_KEY).unwrap();
        let date = "Thu, 27 Apr 2017 00:51:12 GMT";
        let lower = key.authorization("GET", "dbs", "dbs/core", date).unwrap();
        let upper = key.authorization("GET", "dbs", "dbs/Core", date).unwrap();
        assert_ne!(lower, upper);

        // Verb and resource type are normalized
        let verb = key.authorization("get", "DBS", "dbs/core", date).unwrap();
        assert_eq!(lower, verb);
    }

    #[test]
    fn test_invalid_keys() {
        assert!(matches!(
            MasterKey::from_base64(""),
            Err(CosmosError::InvalidKey(_))
        ));
        assert!(matches!(
            MasterKey::from_base64("not base64 !!"),
            Err(CosmosError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_debug_hides_key() {
        let key = MasterKey::from_base64(TEST_KEY).unwrap();
        assert_eq!(format!("{:?}", key), "MasterKey(****)");
    }
}
