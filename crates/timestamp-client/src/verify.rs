//! Signature verification (RSA PKCS#1 v1.5 with SHA-256).
//!
//! Operational failures (bad base64, missing or malformed key) are errors.
//! A signature that does not verify is a [`Verdict::Failed`], never an error.

use std::fs;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rsa::pkcs1::der::pem;
use rsa::pkcs8::SubjectPublicKeyInfoRef;
use rsa::pkcs1v15::{Signature, VerifyingKey};
use rsa::sha2::Sha256;
use rsa::signature::Verifier;
use rsa::{BigUint, RsaPublicKey};
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};

/// Outcome of the trust check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Signature checked and valid.
    Verified,
    /// Signature checked and rejected.
    Failed,
    /// No key supplied, nothing was checked.
    Unverified,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verified => "verified",
            Self::Failed => "failed",
            Self::Unverified => "unverified",
        }
    }
}

/// Largest accepted modulus, in bits.
pub const MAX_KEY_BITS: usize = 16384;

/// Decode the base64 signature field into raw signature bytes.
///
/// ASCII whitespace anywhere in the field is ignored, so line-wrapped
/// signatures decode.
pub fn decode_signature(signature_b64: &str) -> ClientResult<Vec<u8>> {
    let compact: String = signature_b64
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    BASE64
        .decode(compact)
        .map_err(|e| ClientError::MalformedSignature {
            reason: format!("invalid base64 signature: {}", e),
        })
}

/// Load an RSA public key from a file.
///
/// Accepts SubjectPublicKeyInfo (`BEGIN PUBLIC KEY`) and PKCS#1
/// (`BEGIN RSA PUBLIC KEY`), PEM or DER. Moduli up to [`MAX_KEY_BITS`].
pub fn load_public_key(path: &Path) -> ClientResult<RsaPublicKey> {
    let key_error = |message: String| ClientError::Key {
        path: path.to_path_buf(),
        message,
    };

    let raw = fs::read(path).map_err(|e| key_error(e.to_string()))?;

    let pem_der;
    let der: &[u8] = match std::str::from_utf8(&raw) {
        Ok(text) if text.contains("-----BEGIN") => {
            let (label, decoded) = pem::decode_vec(text.trim().as_bytes())
                .map_err(|e| key_error(format!("invalid PEM: {e}")))?;
            if label != "PUBLIC KEY" && label != "RSA PUBLIC KEY" {
                return Err(key_error(format!("unexpected PEM label {label:?}")));
            }
            pem_der = decoded;
            &pem_der
        }
        _ => &raw,
    };

    let key = rsa_key_from_der(der).map_err(key_error)?;
    debug!(path = %path.display(), bits = key_bits(&key), "loaded public key");
    Ok(key)
}

/// Parse an SPKI or PKCS#1 DER document.
fn rsa_key_from_der(der: &[u8]) -> Result<RsaPublicKey, String> {
    let pkcs1_der = match SubjectPublicKeyInfoRef::try_from(der) {
        Ok(spki) => {
            if spki.algorithm.oid != rsa::pkcs1::ALGORITHM_OID {
                return Err(format!("not an RSA key (algorithm {})", spki.algorithm.oid));
            }
            spki.subject_public_key
                .as_bytes()
                .ok_or_else(|| "SPKI key bits are not byte aligned".to_string())?
        }
        Err(_) => der,
    };

    let key = rsa::pkcs1::RsaPublicKey::try_from(pkcs1_der)
        .map_err(|e| format!("not an RSA public key ({e})"))?;
    RsaPublicKey::new_with_max_size(
        BigUint::from_bytes_be(key.modulus.as_bytes()),
        BigUint::from_bytes_be(key.public_exponent.as_bytes()),
        MAX_KEY_BITS,
    )
    .map_err(|e| format!("unusable RSA key: {e}"))
}

fn key_bits(key: &RsaPublicKey) -> usize {
    use rsa::traits::PublicKeyParts;
    key.n().bits()
}

/// Verify raw signature bytes over `message`.
pub fn verify_signature(key: &RsaPublicKey, signature: &[u8], message: &[u8]) -> Verdict {
    let verifying_key = VerifyingKey::<Sha256>::new(key.clone());

    let signature = match Signature::try_from(signature) {
        Ok(sig) => sig,
        Err(e) => {
            warn!(error = %e, "signature bytes rejected");
            return Verdict::Failed;
        }
    };

    match verifying_key.verify(message, &signature) {
        Ok(()) => Verdict::Verified,
        Err(e) => {
            warn!(error = %e, "rsa verification failed");
            Verdict::Failed
        }
    }
}

/// Decode the signature field, load the key and verify the canonical bytes.
pub fn verify(
    public_key_file: &Path,
    signature_b64: &str,
    canonical_bytes: &[u8],
) -> ClientResult<Verdict> {
    let signature = decode_signature(signature_b64)?;
    let key = load_public_key(public_key_file)?;
    Ok(verify_signature(&key, &signature, canonical_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsa::pkcs1v15::SigningKey;
    use rsa::pkcs8::DecodePrivateKey;
    use rsa::signature::{SignatureEncoding, Signer};
    use rsa::RsaPrivateKey;
    use std::path::PathBuf;

    const PRODUCER_KEY_PEM: &str = include_str!("../tests/fixtures/producer_key.pem");
    const MESSAGE: &[u8] = br#"{"swVersion":"1.0","dateIsoUtc":"2024-01-01","time24Utc":"00:00:00","dateTimeEpocUtc":1704067200}"#;

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join(name)
    }

    fn sign(message: &[u8]) -> Vec<u8> {
        let private_key = RsaPrivateKey::from_pkcs8_pem(PRODUCER_KEY_PEM).unwrap();
        SigningKey::<Sha256>::new(private_key).sign(message).to_vec()
    }

    fn golden_signature() -> String {
        let envelope: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(fixture("envelope_signed.json")).unwrap(),
        )
        .unwrap();
        envelope["signature"].as_str().unwrap().to_string()
    }

    #[test]
    fn test_golden_openssl_signature_verifies() {
        let verdict = verify(&fixture("producer_key.pub"), &golden_signature(), MESSAGE).unwrap();
        assert_eq!(verdict, Verdict::Verified);
    }

    #[test]
    fn test_pkcs1_public_key_accepted() {
        let verdict = verify(
            &fixture("producer_key_pkcs1.pub"),
            &golden_signature(),
            MESSAGE,
        )
        .unwrap();
        assert_eq!(verdict, Verdict::Verified);
    }

    #[test]
    fn test_der_public_key_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let der_path = dir.path().join("key.der");
        let pkcs1_path = dir.path().join("key.pkcs1.der");
        let key = load_public_key(&fixture("producer_key.pub")).unwrap();
        let der = rsa::pkcs8::EncodePublicKey::to_public_key_der(&key).unwrap();
        fs::write(&der_path, der.as_bytes()).unwrap();
        let pkcs1 = rsa::pkcs1::EncodeRsaPublicKey::to_pkcs1_der(&key).unwrap();
        fs::write(&pkcs1_path, pkcs1.as_bytes()).unwrap();

        assert_eq!(load_public_key(&der_path).unwrap(), key);
        assert_eq!(load_public_key(&pkcs1_path).unwrap(), key);
    }

    #[test]
    fn test_flipped_message_byte_fails() {
        let key = load_public_key(&fixture("producer_key.pub")).unwrap();
        let signature = sign(MESSAGE);
        assert_eq!(verify_signature(&key, &signature, MESSAGE), Verdict::Verified);

        for index in [0, MESSAGE.len() / 2, MESSAGE.len() - 1] {
            let mut tampered = MESSAGE.to_vec();
            tampered[index] ^= 0x01;
            assert_eq!(
                verify_signature(&key, &signature, &tampered),
                Verdict::Failed,
                "flip at {index} must fail"
            );
        }
    }

    #[test]
    fn test_flipped_signature_byte_fails() {
        let key = load_public_key(&fixture("producer_key.pub")).unwrap();
        let signature = sign(MESSAGE);

        for index in [0, signature.len() / 2, signature.len() - 1] {
            let mut tampered = signature.clone();
            tampered[index] ^= 0x80;
            assert_eq!(
                verify_signature(&key, &tampered, MESSAGE),
                Verdict::Failed,
                "flip at {index} must fail"
            );
        }
    }

    #[test]
    fn test_wrong_key_fails() {
        let verdict = verify(&fixture("other_key.pub"), &golden_signature(), MESSAGE).unwrap();
        assert_eq!(verdict, Verdict::Failed);
    }

    #[test]
    fn test_truncated_signature_is_rejection_not_error() {
        let key = load_public_key(&fixture("producer_key.pub")).unwrap();
        let signature = sign(MESSAGE);
        assert_eq!(
            verify_signature(&key, &signature[..signature.len() - 1], MESSAGE),
            Verdict::Failed
        );
        assert_eq!(verify_signature(&key, &[], MESSAGE), Verdict::Failed);
    }

    #[test]
    fn test_malformed_base64_is_error() {
        let result = verify(&fixture("producer_key.pub"), "not*base64!", MESSAGE);
        assert!(matches!(result, Err(ClientError::MalformedSignature { .. })));
    }

    #[test]
    fn test_malformed_base64_reported_before_key_load() {
        let result = verify(Path::new("/nonexistent/key.pub"), "%%%", MESSAGE);
        assert!(matches!(result, Err(ClientError::MalformedSignature { .. })));
    }

    #[test]
    fn test_missing_key_file_is_error() {
        let result = verify(
            Path::new("/nonexistent/key.pub"),
            &golden_signature(),
            MESSAGE,
        );
        match result {
            Err(ClientError::Key { path, .. }) => {
                assert_eq!(path, PathBuf::from("/nonexistent/key.pub"))
            }
            other => panic!("expected Key error, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_key_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let bad_pem = dir.path().join("bad.pub");
        fs::write(
            &bad_pem,
            "-----BEGIN PUBLIC KEY-----\nAAAA\n-----END PUBLIC KEY-----\n",
        )
        .unwrap();
        let garbage = dir.path().join("garbage.pub");
        fs::write(&garbage, [0_u8, 1, 2, 3]).unwrap();

        assert!(matches!(
            load_public_key(&bad_pem),
            Err(ClientError::Key { .. })
        ));
        assert!(matches!(
            load_public_key(&garbage),
            Err(ClientError::Key { .. })
        ));
    }

    #[test]
    fn test_decode_signature_trims_whitespace() {
        assert_eq!(decode_signature(" c2ln\n").unwrap(), b"sig".to_vec());
    }

    #[test]
    fn test_line_wrapped_signature_decodes() {
        let flat = golden_signature();
        let wrapped = flat
            .as_bytes()
            .chunks(76)
            .map(|line| std::str::from_utf8(line).unwrap())
            .collect::<Vec<_>>()
            .join("\r\n");
        assert!(wrapped.contains("\r\n"));

        assert_eq!(
            decode_signature(&wrapped).unwrap(),
            decode_signature(&flat).unwrap()
        );
        let verdict = verify(&fixture("producer_key.pub"), &wrapped, MESSAGE).unwrap();
        assert_eq!(verdict, Verdict::Verified);
    }

    #[test]
    fn test_large_key_verifies() {
        let key = load_public_key(&fixture("large_key.pub")).unwrap();
        assert_eq!(key_bits(&key), 8192);

        let signature = fs::read_to_string(fixture("large_key_signature.b64")).unwrap();
        let verdict = verify(&fixture("large_key.pub"), &signature, MESSAGE).unwrap();
        assert_eq!(verdict, Verdict::Verified);

        let mut tampered = MESSAGE.to_vec();
        tampered[2] ^= 0x01;
        let raw = decode_signature(&signature).unwrap();
        assert_eq!(verify_signature(&key, &raw, &tampered), Verdict::Failed);
    }

    #[test]
    fn test_non_rsa_pem_label_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cert.pem");
        fs::write(&path, "-----BEGIN CERTIFICATE-----\nAAAA\n-----END CERTIFICATE-----\n").unwrap();
        match load_public_key(&path) {
            Err(ClientError::Key { message, .. }) => assert!(message.contains("CERTIFICATE")),
            other => panic!("expected Key error, got {other:?}"),
        }
    }
}
