//! Webhook signature verification
//!
//! The payment provider signs each notification with
//! `x-signature: ts=<unix-seconds>,v1=<hex hmac>` and sends a separate
//! `x-request-id`. The signed manifest is the concatenation
//! `resource_id + request_id + ts`, where the resource id is taken from
//! `data.id`, then `id`, then the empty string.

use crate::constants::webhooks::{HASH_FIELD, TIMESTAMP_FIELD};
use crate::errors::SignatureError;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;
use std::time::Duration;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

type HmacSha256 = Hmac<Sha256>;

/// Fields parsed out of the signature header, used for a single verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureMaterial {
    pub timestamp: String,
    pub hash: String,
}

impl SignatureMaterial {
    pub fn parse(header: &str) -> Result<Self, SignatureError> {
        let mut timestamp = None;
        let mut hash = None;

        for part in header.split(',') {
            if let Some((key, value)) = part.split_once('=') {
                match key.trim() {
                    TIMESTAMP_FIELD => timestamp = Some(value.trim().to_string()),
                    HASH_FIELD => hash = Some(value.trim().to_string()),
                    _ => {}
                }
            }
        }

        let timestamp = timestamp
            .filter(|t| !t.is_empty())
            .ok_or(SignatureError::MissingField {
                field: TIMESTAMP_FIELD,
            })?;
        let hash = hash
            .filter(|h| !h.is_empty())
            .ok_or(SignatureError::MissingField { field: HASH_FIELD })?;

        Ok(Self { timestamp, hash })
    }
}

/// Resource id of a notification: `data.id`, else `id`, else empty
pub fn resource_id(payload: &Value) -> String {
    payload
        .get("data")
        .and_then(|data| data.get("id"))
        .and_then(id_to_string)
        .or_else(|| payload.get("id").and_then(id_to_string))
        .unwrap_or_default()
}

fn id_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Hex HMAC-SHA256 of `resource_id + request_id + timestamp`
pub fn sign(secret: &str, resource_id: &str, request_id: &str, timestamp: &str) -> Option<String> {
    compute_digest(secret, resource_id, request_id, timestamp).map(hex::encode)
}

fn compute_digest(
    secret: &str,
    resource_id: &str,
    request_id: &str,
    timestamp: &str,
) -> Option<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(resource_id.as_bytes());
    mac.update(request_id.as_bytes());
    mac.update(timestamp.as_bytes());
    Some(mac.finalize().into_bytes().to_vec())
}

/// Verifies provider webhooks against the shared secret. Without a secret
/// every request is rejected.
pub struct SignatureVerifier {
    secret: Option<String>,
    max_timestamp_age: Option<Duration>,
}

impl SignatureVerifier {
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
            max_timestamp_age: None,
        }
    }

    /// Also reject signatures whose `ts` is further than `age` from now
    pub fn with_max_timestamp_age(mut self, age: Duration) -> Self {
        self.max_timestamp_age = Some(age);
        self
    }

    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    /// Single deterministic pass; never panics, never retries.
    pub fn verify(&self, payload: &Value, signature_header: &str, request_id: &str) -> bool {
        match self.check(payload, signature_header, request_id) {
            Ok(()) => {
                debug!(request_id = %request_id, "Webhook signature verified");
                true
            }
            Err(e) => {
                warn!(request_id = %request_id, "Webhook signature rejected: {}", e);
                false
            }
        }
    }

    /// Same as [`verify`](Self::verify) but reports why a signature was refused
    pub fn check(
        &self,
        payload: &Value,
        signature_header: &str,
        request_id: &str,
    ) -> Result<(), SignatureError> {
        let secret = self.secret.as_deref().ok_or(SignatureError::SecretMissing)?;
        let material = SignatureMaterial::parse(signature_header)?;

        if let Some(max_age) = self.max_timestamp_age {
            check_freshness(&material.timestamp, max_age, Utc::now().timestamp())?;
        }

        let supplied = hex::decode(&material.hash).map_err(|_| SignatureError::MalformedHash)?;
        let computed = compute_digest(
            secret,
            &resource_id(payload),
            request_id,
            &material.timestamp,
        )
        .ok_or(SignatureError::Mismatch)?;

        // Slices of different length compare unequal without panicking
        if bool::from(computed.as_slice().ct_eq(supplied.as_slice())) {
            Ok(())
        } else {
            Err(SignatureError::Mismatch)
        }
    }
}

fn check_freshness(timestamp: &str, max_age: Duration, now: i64) -> Result<(), SignatureError> {
    let expired = || SignatureError::Expired {
        timestamp: timestamp.to_string(),
    };
    let signed_at = timestamp.parse::<i64>().map_err(|_| expired())?;

    if now.abs_diff(signed_at) > max_age.as_secs() {
        return Err(expired());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_header() {
        let material = SignatureMaterial::parse("ts=1700000000,v1=abcdef").unwrap();
        assert_eq!(material.timestamp, "1700000000");
        assert_eq!(material.hash, "abcdef");

        let spaced = SignatureMaterial::parse(" v1 = abcdef , ts = 1700000000 ").unwrap();
        assert_eq!(spaced, material);
    }

    #[test]
    fn test_parse_header_missing_fields() {
        assert!(matches!(
            SignatureMaterial::parse("ts=1700000000"),
            Err(SignatureError::MissingField { field: "v1" })
        ));
        assert!(matches!(
            SignatureMaterial::parse("v1=abcdef"),
            Err(SignatureError::MissingField { field: "ts" })
        ));
        assert!(SignatureMaterial::parse("").is_err());
        assert!(SignatureMaterial::parse("garbage").is_err());
        assert!(SignatureMaterial::parse("ts=,v1=abc").is_err());
    }

    #[test]
    fn test_resource_id_fallbacks() {
        assert_eq!(resource_id(&json!({"data": {"id": "123"}, "id": "999"})), "123");
        assert_eq!(resource_id(&json!({"data": {"id": 123}})), "123");
        assert_eq!(resource_id(&json!({"data": {}, "id": "999"})), "999");
        assert_eq!(resource_id(&json!({"id": 42})), "42");
        assert_eq!(resource_id(&json!({"type": "payment"})), "");
        assert_eq!(resource_id(&json!([1, 2, 3])), "");
    }

    #[test]
    fn test_freshness_window() {
        let max_age = Duration::from_secs(300);
        assert!(check_freshness("1700000000", max_age, 1_700_000_100).is_ok());
        assert!(check_freshness("1700000000", max_age, 1_699_999_800).is_ok());
        assert!(check_freshness("1700000000", max_age, 1_700_000_301).is_err());
        assert!(check_freshness("not-a-number", max_age, 1_700_000_000).is_err());
    }

    #[test]
    fn test_missing_secret_fails_closed() {
        let verifier = SignatureVerifier::new(None);
        let signature = format!(
            "ts=1700000000,v1={}",
            sign("s3cr3t", "123", "abc", "1700000000").unwrap()
        );

        assert!(!verifier.is_configured());
        assert!(matches!(
            verifier.check(&json!({"data": {"id": "123"}}), &signature, "abc"),
            Err(SignatureError::SecretMissing)
        ));
        assert!(!SignatureVerifier::new(Some(String::new())).is_configured());
    }
}
