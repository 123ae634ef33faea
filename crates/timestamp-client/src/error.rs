//! Error types for the timestamp client.

use std::path::PathBuf;

/// Client errors.
///
/// A rejected signature is not an error; see [`crate::Verdict::Failed`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// No target URL was supplied.
    #[error("no remote URL specified")]
    MissingTarget,

    /// Network or transport failure (including deadline expiry).
    #[error("fetch failed: {message}")]
    Fetch { message: String },

    /// Response body is not a well-formed envelope.
    #[error("failed to decode envelope: {message}")]
    Decode { message: String },

    /// Payload could not be canonicalized.
    #[error("failed to encode payload: {message}")]
    Encode { message: String },

    /// Data artifact could not be written.
    #[error("error writing data artifact {}: {message}", .path.display())]
    DataWrite { path: PathBuf, message: String },

    /// Signature artifact could not be written.
    #[error("error writing signature artifact {}: {message}", .path.display())]
    SignatureWrite { path: PathBuf, message: String },

    /// Public key file missing, unreadable or malformed.
    #[error("failed to load public key {}: {message}", .path.display())]
    Key { path: PathBuf, message: String },

    /// Signature field is not valid base64.
    #[error("malformed signature: {reason}")]
    MalformedSignature { reason: String },

    /// Producer digest disagrees with the locally computed one.
    #[error("digest mismatch: producer sent {expected:?}, computed {actual}")]
    DigestMismatch { expected: String, actual: String },
}

impl ClientError {
    /// Exit code for CLI. One stable code per failure class.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MissingTarget => 10,
            Self::Fetch { .. } => 100,
            Self::Decode { .. } => 110,
            Self::Encode { .. } => 111,
            Self::DataWrite { .. } => 115,
            Self::SignatureWrite { .. } => 116,
            Self::Key { .. } => 120,
            Self::MalformedSignature { .. } => 121,
            Self::DigestMismatch { .. } => 122,
        }
    }

    /// Short machine-readable class name, used in log events.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingTarget => "config",
            Self::Fetch { .. } => "fetch",
            Self::Decode { .. } => "decode",
            Self::Encode { .. } => "encode",
            Self::DataWrite { .. } | Self::SignatureWrite { .. } => "io",
            Self::Key { .. } => "key",
            Self::MalformedSignature { .. } => "signature",
            Self::DigestMismatch { .. } => "digest",
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("deadline expired: {}", err)
        } else {
            err.to_string()
        };
        Self::Fetch { message }
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
