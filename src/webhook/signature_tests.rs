//! Tests for signature header parsing, manifest building and verification.

use super::{SignatureError, SignatureHeader, SignatureManifest, sign, verify};
use hmac::{Hmac, Mac};
use sha2::Sha256;

const SECRET: &str = "whsec_abc";
const REQUEST_ID: &str = "req-42";
const TS: &str = "1700000000";
const BODY: &[u8] = br#"{"id":"55","type":"payment","data":{"id":"77"}}"#;

/// Reference HMAC computed without going through the crate's helpers.
fn reference_digest(manifest: &str, secret: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(manifest.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

fn valid_header() -> String {
    let manifest = format!(
        "id:{REQUEST_ID};request-id:{REQUEST_ID};ts:{TS};{}",
        std::str::from_utf8(BODY).unwrap()
    );
    format!("ts={TS},v1={}", reference_digest(&manifest, SECRET))
}

mod header_parsing {
    use super::*;

    #[test]
    fn parses_ts_and_v1() {
        let header = SignatureHeader::parse("ts=1700000000,v1=abcdef").unwrap();

        assert_eq!(header.ts, "1700000000");
        assert_eq!(header.v1, "abcdef");
    }

    #[test]
    fn order_is_not_significant() {
        let header = SignatureHeader::parse("v1=abcdef,ts=1700000000").unwrap();

        assert_eq!(header.ts, "1700000000");
        assert_eq!(header.v1, "abcdef");
    }

    #[test]
    fn ignores_whitespace_and_unknown_keys() {
        let header = SignatureHeader::parse(" ts=1700000000 , v0=zz, v1=abcdef ").unwrap();

        assert_eq!(header.ts, "1700000000");
        assert_eq!(header.v1, "abcdef");
    }

    #[test]
    fn missing_v1_is_malformed() {
        assert_eq!(
            SignatureHeader::parse("ts=1700000000"),
            Err(SignatureError::MalformedHeader("missing 'v1'"))
        );
    }

    #[test]
    fn missing_ts_is_malformed() {
        assert_eq!(
            SignatureHeader::parse("v1=abcdef"),
            Err(SignatureError::MalformedHeader("missing 'ts'"))
        );
    }

    #[test]
    fn empty_values_count_as_missing() {
        assert!(matches!(
            SignatureHeader::parse("ts=,v1=abcdef"),
            Err(SignatureError::MalformedHeader(_))
        ));
        assert!(matches!(
            SignatureHeader::parse("ts=1,v1="),
            Err(SignatureError::MalformedHeader(_))
        ));
    }

    #[test]
    fn non_numeric_ts_is_malformed() {
        assert!(matches!(
            SignatureHeader::parse("ts=17000x,v1=abcdef"),
            Err(SignatureError::MalformedHeader(_))
        ));
    }

    #[test]
    fn garbage_is_malformed() {
        for header in ["", ",,,", "ts1700000000v1abc", "signature"] {
            assert!(
                matches!(
                    SignatureHeader::parse(header),
                    Err(SignatureError::MalformedHeader(_))
                ),
                "{header:?}"
            );
        }
    }
}

mod manifest {
    use super::*;

    #[test]
    fn uses_request_id_for_both_id_fields_and_raw_body() {
        let manifest = SignatureManifest::new(REQUEST_ID, TS, BODY);

        assert_eq!(
            std::str::from_utf8(manifest.as_bytes()).unwrap(),
            r#"id:req-42;request-id:req-42;ts:1700000000;{"id":"55","type":"payment","data":{"id":"77"}}"#
        );
    }

    #[test]
    fn keeps_body_formatting_exactly() {
        let spaced = b"{ \"id\" : \"55\" }\n";
        let manifest = SignatureManifest::new("r", "1", spaced);

        assert!(manifest.as_bytes().ends_with(spaced));
    }

    #[test]
    fn digest_is_lowercase_hex_hmac_sha256() {
        let manifest = SignatureManifest::new(REQUEST_ID, TS, BODY);
        let expected = reference_digest(
            std::str::from_utf8(manifest.as_bytes()).unwrap(),
            SECRET,
        );

        let digest = manifest.digest(SECRET);

        assert_eq!(digest, expected);
        assert_eq!(digest.len(), 64);
        assert!(digest.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)));
    }

    #[test]
    fn digest_accepts_secrets_of_any_length() {
        let manifest = SignatureManifest::new(REQUEST_ID, TS, BODY);
        let long_secret = "k".repeat(512);

        for secret in ["", "x", long_secret.as_str()] {
            let digest = manifest.digest(secret);
            assert_eq!(digest.len(), 64);
            assert_eq!(
                digest,
                reference_digest(std::str::from_utf8(manifest.as_bytes()).unwrap(), secret)
            );
        }
    }
}

mod verification {
    use super::*;

    #[test]
    fn accepts_valid_signature() {
        assert_eq!(verify(BODY, &valid_header(), REQUEST_ID, SECRET), Ok(()));
    }

    #[test]
    fn sign_produces_verifiable_header() {
        let header = sign(BODY, REQUEST_ID, 1_700_000_000, SECRET);

        assert_eq!(header, valid_header());
        assert!(verify(BODY, &header, REQUEST_ID, SECRET).is_ok());
    }

    #[test]
    fn rejects_any_single_byte_body_mutation() {
        let header = valid_header();
        for i in 0..BODY.len() {
            let mut body = BODY.to_vec();
            body[i] ^= 0x01;
            assert_eq!(
                verify(&body, &header, REQUEST_ID, SECRET),
                Err(SignatureError::Mismatch),
                "mutation at byte {i} was accepted"
            );
        }
    }

    #[test]
    fn rejects_reserialized_body() {
        let reserialized = br#"{"data":{"id":"77"},"id":"55","type":"payment"}"#;

        assert_eq!(
            verify(reserialized, &valid_header(), REQUEST_ID, SECRET),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn rejects_mutated_ts() {
        let header = valid_header().replace("ts=1700000000", "ts=1700000001");

        assert_eq!(
            verify(BODY, &header, REQUEST_ID, SECRET),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn rejects_any_single_char_digest_mutation() {
        let header = valid_header();
        let (prefix, digest) = header.split_once("v1=").unwrap();
        for i in 0..digest.len() {
            let mut mutated: Vec<u8> = digest.bytes().collect();
            mutated[i] = if mutated[i] == b'0' { b'1' } else { b'0' };
            let mutated = format!("{prefix}v1={}", String::from_utf8(mutated).unwrap());
            assert_eq!(
                verify(BODY, &mutated, REQUEST_ID, SECRET),
                Err(SignatureError::Mismatch),
                "mutation at digest char {i} was accepted"
            );
        }
    }

    #[test]
    fn rejects_wrong_request_id_and_secret() {
        let header = valid_header();

        assert!(verify(BODY, &header, "req-43", SECRET).is_err());
        assert!(verify(BODY, &header, REQUEST_ID, "whsec_abd").is_err());
    }

    #[test]
    fn rejects_truncated_and_extended_digest() {
        let header = valid_header();

        assert_eq!(
            verify(BODY, &header[..header.len() - 1], REQUEST_ID, SECRET),
            Err(SignatureError::Mismatch)
        );
        assert_eq!(
            verify(BODY, &format!("{header}0"), REQUEST_ID, SECRET),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn rejects_uppercase_digest() {
        let header = valid_header();
        let (prefix, digest) = header.split_once("v1=").unwrap();
        let upper = format!("{prefix}v1={}", digest.to_uppercase());

        assert_eq!(
            verify(BODY, &upper, REQUEST_ID, SECRET),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn malformed_header_fails_before_mismatch() {
        for header in ["ts=1700000000", "v1=abc", ""] {
            assert!(matches!(
                verify(BODY, header, REQUEST_ID, SECRET),
                Err(SignatureError::MalformedHeader(_))
            ));
        }
    }
}
