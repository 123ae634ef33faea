//! Wire types and client configuration.

use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};

/// The signed timestamp assertion.
///
/// Field order and wire names match the producer; the canonical encoding in
/// [`crate::canonicalize`] depends on both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampPayload {
    /// Producer's version tag.
    #[serde(
        rename = "swVersion",
        alias = "softwareVersion",
        default,
        deserialize_with = "null_as_default"
    )]
    pub software_version: String,

    /// Calendar date, `YYYY-MM-DD`.
    #[serde(
        rename = "dateIsoUtc",
        alias = "dateUtc",
        default,
        deserialize_with = "null_as_default"
    )]
    pub date_utc: String,

    /// Wall time, `hh:mm:ss`.
    #[serde(
        rename = "time24Utc",
        alias = "timeUtc",
        default,
        deserialize_with = "null_as_default"
    )]
    pub time_utc: String,

    /// Seconds since the Unix epoch.
    #[serde(
        rename = "dateTimeEpocUtc",
        alias = "epochUtc",
        default,
        deserialize_with = "null_as_default"
    )]
    pub epoch_utc: i64,
}

/// Response body returned by the timestamp endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// The signed assertion.
    #[serde(
        rename = "data",
        alias = "payload",
        default,
        deserialize_with = "null_as_default"
    )]
    pub payload: TimestampPayload,

    /// Producer-computed checksum of the payload (informational).
    #[serde(default, deserialize_with = "null_as_default")]
    pub digest: String,

    /// Base64 signature over the canonical payload encoding.
    #[serde(default, deserialize_with = "null_as_default")]
    pub signature: String,
}

/// `null` decodes to the zero value, like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Configuration for a single client run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Timestamp endpoint.
    #[serde(default)]
    pub url: String,

    /// Public key used for verification. Verification is skipped when unset.
    #[serde(default)]
    pub public_key_file: Option<PathBuf>,

    /// Request deadline in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Directory receiving `data.txt` and `data.sig`.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Fail the run when the producer digest does not match.
    #[serde(default)]
    pub require_digest_match: bool,
}

fn default_timeout() -> u64 {
    30
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            public_key_file: None,
            timeout_secs: default_timeout(),
            output_dir: default_output_dir(),
            require_digest_match: false,
        }
    }
}

impl ClientConfig {
    /// Set the target URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set the public key file.
    pub fn with_public_key_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.public_key_file = Some(path.into());
        self
    }

    /// Set the request deadline.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the artifact directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Enforce producer digest agreement.
    pub fn with_require_digest_match(mut self, require: bool) -> Self {
        self.require_digest_match = require;
        self
    }
}
