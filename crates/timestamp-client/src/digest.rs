//! SHA-256 over canonical bytes, and comparison against the producer digest.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use sha2::{Digest, Sha256};

/// A SHA-256 digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sha256Digest([u8; 32]);

impl Sha256Digest {
    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex, no prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// `sha256:{hex}`.
    pub fn to_prefixed(&self) -> String {
        format!("sha256:{}", self.to_hex())
    }
}

impl std::fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Compute SHA-256 over `bytes`.
pub fn sha256(bytes: &[u8]) -> Sha256Digest {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let mut out = [0_u8; 32];
    out.copy_from_slice(&hasher.finalize());
    Sha256Digest(out)
}

/// Agreement between the producer's `digest` field and the local digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestCheck {
    /// Producer digest equals the local SHA-256.
    Match,
    /// Producer digest present but different (or in an unknown encoding).
    Mismatch,
    /// Producer sent no digest.
    Absent,
}

impl DigestCheck {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Match => "match",
            Self::Mismatch => "mismatch",
            Self::Absent => "absent",
        }
    }
}

/// Compare a producer-supplied digest string with the local digest.
///
/// Accepted encodings: hex (any case, optional `sha256:` prefix) and
/// standard base64.
pub fn check_producer_digest(producer: &str, local: &Sha256Digest) -> DigestCheck {
    let claimed = producer.trim();
    if claimed.is_empty() {
        return DigestCheck::Absent;
    }

    let hex_part = claimed.strip_prefix("sha256:").unwrap_or(claimed);
    if hex_part.eq_ignore_ascii_case(&local.to_hex()) {
        return DigestCheck::Match;
    }

    match BASE64.decode(claimed) {
        Ok(bytes) if bytes.as_slice() == local.as_bytes() => DigestCheck::Match,
        _ => DigestCheck::Mismatch,
    }
}
