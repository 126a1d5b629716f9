//! GitHub webhook signature verification
//!
//! GitHub signs each delivery with HMAC-SHA256 over the raw body, keyed by
//! the shared webhook secret, and sends the digest in the
//! `x-hub-signature-256` header as `sha256=<hex>`.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::RelayError;

type HmacSha256 = Hmac<Sha256>;

/// Compute the hex-encoded HMAC-SHA256 digest of `body` keyed by `secret`.
pub fn hmac_hex(secret: &str, body: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

/// Verify an `x-hub-signature-256` header value against the raw request body.
///
/// Returns `false` on a malformed header, undecodable hex, or digest
/// mismatch. Callers must treat all three identically; a forged and a
/// malformed signature both yield the same unauthorized response.
pub fn verify(secret: &str, signature_header: &str, body: &[u8]) -> bool {
    let Some(digest_hex) = signature_header.strip_prefix("sha256=") else {
        return false;
    };
    let Ok(provided) = hex::decode(digest_hex.trim()) else {
        return false;
    };

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(body);
    let expected = mac.finalize().into_bytes();

    // ct_eq rejects length mismatches without early exit
    expected.as_slice().ct_eq(provided.as_slice()).into()
}

/// [`verify`] for handlers that map errors to responses: every failure
/// mode collapses into the detail-free [`RelayError::Signature`].
pub fn require_valid(
    secret: &str,
    signature_header: &str,
    body: &[u8],
) -> Result<(), RelayError> {
    if verify(secret, signature_header, body) {
        Ok(())
    } else {
        Err(RelayError::Signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "webhook-secret";

    fn sign(body: &[u8]) -> String {
        format!("sha256={}", hmac_hex(SECRET, body))
    }

    #[test]
    fn test_valid_signature() {
        let body = br#"{"action":"created"}"#;
        assert!(verify(SECRET, &sign(body), body));
    }

    #[test]
    fn test_mutated_body_rejected() {
        let body = br#"{"action":"created"}"#;
        let header = sign(body);
        assert!(!verify(SECRET, &header, br#"{"action":"creates"}"#));
    }

    #[test]
    fn test_mutated_digest_rejected() {
        let body = b"payload";
        let mut header = sign(body);
        // Flip the last hex character
        let last = header.pop().unwrap();
        header.push(if last == '0' { '1' } else { '0' });
        assert!(!verify(SECRET, &header, body));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let body = b"payload";
        let header = format!("sha256={}", hmac_hex("other-secret", body));
        assert!(!verify(SECRET, &header, body));
    }

    #[test]
    fn test_missing_prefix_rejected() {
        let body = b"payload";
        let bare = hmac_hex(SECRET, body);
        assert!(!verify(SECRET, &bare, body));
    }

    #[test]
    fn test_malformed_header_rejected() {
        assert!(!verify(SECRET, "", b"payload"));
        assert!(!verify(SECRET, "sha256=", b"payload"));
        assert!(!verify(SECRET, "sha256=not-hex", b"payload"));
        assert!(!verify(SECRET, "sha1=deadbeef", b"payload"));
    }

    #[test]
    fn test_require_valid_yields_signature_error() {
        let body = b"payload";
        assert!(require_valid(SECRET, &sign(body), body).is_ok());

        // Forged and malformed headers map to the same variant
        let forged = require_valid(SECRET, "sha256=deadbeef", body).unwrap_err();
        assert!(matches!(forged, RelayError::Signature));
        let malformed = require_valid(SECRET, "not-a-header", body).unwrap_err();
        assert!(matches!(malformed, RelayError::Signature));
    }

    #[test]
    fn test_truncated_digest_rejected() {
        let body = b"payload";
        let header = sign(body);
        assert!(!verify(SECRET, &header[..header.len() - 2], body));
    }
}
