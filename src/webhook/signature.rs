//! HMAC-SHA256 webhook signatures.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::SignatureError;

type HmacSha256 = Hmac<Sha256>;

/// Parsed `x-signature` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Unix timestamp, kept as sent so the manifest is reproduced exactly
    pub ts: String,
    /// Hex digest to compare against
    pub v1: String,
}

impl SignatureHeader {
    /// Parses `ts=<integer>,v1=<hex>`.
    ///
    /// Pairs are split on `,` then on the first `=`; their order does not
    /// matter and surrounding whitespace is ignored. Unknown keys are
    /// ignored; a repeated key keeps its last value.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::MalformedHeader`] if `ts` or `v1` is
    /// missing or empty, or `ts` is not made of ASCII digits.
    pub fn parse(header: &str) -> Result<Self, SignatureError> {
        let mut ts = None;
        let mut v1 = None;

        for (key, value) in header.split(',').filter_map(|part| part.split_once('=')) {
            match key.trim() {
                "ts" => ts = Some(value.trim()),
                "v1" => v1 = Some(value.trim()),
                _ => {}
            }
        }

        let ts = ts
            .filter(|v| !v.is_empty())
            .ok_or(SignatureError::MalformedHeader("missing 'ts'"))?;
        let v1 = v1
            .filter(|v| !v.is_empty())
            .ok_or(SignatureError::MalformedHeader("missing 'v1'"))?;

        if !ts.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SignatureError::MalformedHeader("'ts' is not an integer"));
        }

        Ok(Self {
            ts: ts.to_string(),
            v1: v1.to_string(),
        })
    }
}

/// The exact byte string that is signed.
///
/// `id:<request-id>;request-id:<request-id>;ts:<ts>;<raw body>`. The body
/// segment is the bytes received on the wire, never a re-serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureManifest(Vec<u8>);

impl SignatureManifest {
    /// Builds the manifest for a delivery.
    #[must_use]
    pub fn new(request_id: &str, ts: &str, raw_body: &[u8]) -> Self {
        let prefix = format!("id:{request_id};request-id:{request_id};ts:{ts};");
        let mut bytes = Vec::with_capacity(prefix.len() + raw_body.len());
        bytes.extend_from_slice(prefix.as_bytes());
        bytes.extend_from_slice(raw_body);
        Self(bytes)
    }

    /// Returns the manifest bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Computes the lowercase hex HMAC-SHA256 of the manifest.
    #[must_use]
    pub fn digest(&self, secret: &str) -> String {
        let mut mac =
            HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
        mac.update(&self.0);
        hex::encode(mac.finalize().into_bytes())
    }
}

/// Produces an `x-signature` header value for a delivery.
///
/// Used to build test deliveries and local fixtures.
#[must_use]
pub fn sign(raw_body: &[u8], request_id: &str, ts: u64, secret: &str) -> String {
    let ts = ts.to_string();
    let digest = SignatureManifest::new(request_id, &ts, raw_body).digest(secret);
    format!("ts={ts},v1={digest}")
}

/// Verifies a delivery's signature.
///
/// The header is parsed before any hashing, so a malformed header fails
/// without touching the secret. Digests are compared in constant time.
///
/// # Errors
///
/// - [`SignatureError::MalformedHeader`] if the header is malformed
/// - [`SignatureError::Mismatch`] if the digest does not match
pub fn verify(
    raw_body: &[u8],
    signature_header: &str,
    request_id: &str,
    secret: &str,
) -> Result<(), SignatureError> {
    let header = SignatureHeader::parse(signature_header)?;
    let expected = SignatureManifest::new(request_id, &header.ts, raw_body).digest(secret);

    if bool::from(expected.as_bytes().ct_eq(header.v1.as_bytes())) {
        Ok(())
    } else {
        Err(SignatureError::Mismatch)
    }
}
