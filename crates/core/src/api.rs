//! JSON response envelope used by the remote service.
//!
//! Every response body is an object with a `data` field on success and a
//! `message` field on failure. Non-2xx status is always a failure
//! regardless of body shape; the clients in the storefront and admin
//! crates enforce that and use `message` only to enrich the error.

use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

/// Wire envelope for every remote service response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiEnvelope<T> {
    /// A success envelope carrying a payload.
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            message: None,
        }
    }
}

impl<T> ApiEnvelope<T> {
    /// A failure envelope carrying a human-readable message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            data: None,
            message: Some(message.into()),
        }
    }
}

impl<T: DeserializeOwned> ApiEnvelope<T> {
    /// Parse an envelope from a raw response body.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error if the body is not a
    /// well-formed envelope.
    pub fn from_body(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_roundtrip() {
        let envelope = ApiEnvelope::success(vec![1, 2, 3]);
        let json = serde_json::to_string(&envelope).unwrap();
        assert_eq!(json, r#"{"data":[1,2,3]}"#);
        let back: ApiEnvelope<Vec<i32>> = ApiEnvelope::from_body(&json).unwrap();
        assert_eq!(back.data, Some(vec![1, 2, 3]));
        assert_eq!(back.message, None);
    }

    #[test]
    fn test_failure_envelope() {
        let body = r#"{"message":"Product not found"}"#;
        let envelope: ApiEnvelope<()> = ApiEnvelope::from_body(body).unwrap();
        assert!(envelope.data.is_none());
        assert_eq!(envelope.message.as_deref(), Some("Product not found"));
    }

    #[test]
    fn test_malformed_body_is_an_error() {
        assert!(ApiEnvelope::<()>::from_body("not json").is_err());
    }
}
