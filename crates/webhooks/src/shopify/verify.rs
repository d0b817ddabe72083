//! Webhook signature verification.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Reasons a delivery fails signature verification.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerifyError {
    #[error("missing X-Shopify-Hmac-Sha256 header")]
    MissingSignature,

    #[error("signature header is not valid base64")]
    MalformedSignature,

    #[error("signature mismatch")]
    Mismatch,

    #[error("invalid signing key: {0}")]
    InvalidKey(String),
}

/// Checks `X-Shopify-Hmac-Sha256` against the shared webhook secret.
#[derive(Clone)]
pub struct WebhookVerifier {
    secret: SecretString,
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl WebhookVerifier {
    #[must_use]
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    fn mac(&self) -> Result<HmacSha256, VerifyError> {
        HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|e| VerifyError::InvalidKey(e.to_string()))
    }

    /// Verify a delivery.
    ///
    /// `signature` is the raw header value, if present. The comparison is
    /// constant-time.
    ///
    /// # Errors
    ///
    /// Returns a [`VerifyError`] describing why the signature was rejected.
    pub fn verify(&self, body: &[u8], signature: Option<&str>) -> Result<(), VerifyError> {
        let signature = signature
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(VerifyError::MissingSignature)?;

        let expected = BASE64
            .decode(signature)
            .map_err(|_| VerifyError::MalformedSignature)?;

        let mut mac = self.mac()?;
        mac.update(body);
        mac.verify_slice(&expected)
            .map_err(|_| VerifyError::Mismatch)
    }

    /// Compute the header value Shopify would send for `body`.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::InvalidKey`] if the secret cannot key the MAC.
    pub fn sign(&self, body: &[u8]) -> Result<String, VerifyError> {
        let mut mac = self.mac()?;
        mac.update(body);
        Ok(BASE64.encode(mac.finalize().into_bytes()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn verifier() -> WebhookVerifier {
        WebhookVerifier::new(SecretString::from("hush-this-is-the-webhook-key".to_owned()))
    }

    #[test]
    fn test_sign_then_verify() {
        let v = verifier();
        let body = br#"{"id":553412611}"#;
        let sig = v.sign(body).unwrap();
        assert!(v.verify(body, Some(&sig)).is_ok());
    }

    #[test]
    fn test_known_digest() {
        // echo -n 'hello' | openssl dgst -sha256 -hmac key -binary | base64
        let v = WebhookVerifier::new(SecretString::from("key".to_owned()));
        assert_eq!(
            v.sign(b"hello").unwrap(),
            "kwezuRXvtRcf8U2MtV+8x5jGwO8UVtZt7RpqpyOli3s="
        );
    }

    #[test]
    fn test_missing_signature() {
        assert_eq!(
            verifier().verify(b"{}", None),
            Err(VerifyError::MissingSignature)
        );
        assert_eq!(
            verifier().verify(b"{}", Some("  ")),
            Err(VerifyError::MissingSignature)
        );
    }

    #[test]
    fn test_malformed_signature() {
        assert_eq!(
            verifier().verify(b"{}", Some("not base64!")),
            Err(VerifyError::MalformedSignature)
        );
    }

    #[test]
    fn test_tampered_body() {
        let v = verifier();
        let sig = v.sign(br#"{"id":1}"#).unwrap();
        assert_eq!(
            v.verify(br#"{"id":2}"#, Some(&sig)),
            Err(VerifyError::Mismatch)
        );
    }

    #[test]
    fn test_wrong_secret() {
        let sig = WebhookVerifier::new(SecretString::from("another-secret".to_owned()))
            .sign(b"{}")
            .unwrap();
        assert_eq!(verifier().verify(b"{}", Some(&sig)), Err(VerifyError::Mismatch));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let debug = format!("{:?}", verifier());
        assert!(!debug.contains("hush"));
    }
}
