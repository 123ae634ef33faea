//! Fetch → decode → canonicalize → digest → persist → verify.
//!
//! Single pass, no retries. Every error is returned to the caller; a
//! rejected signature is reported through [`RunReport::verdict`].

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::canonicalize;
use crate::digest::{check_producer_digest, sha256, DigestCheck, Sha256Digest};
use crate::envelope;
use crate::error::{ClientError, ClientResult};
use crate::fetch::Fetcher;
use crate::persist::{ArtifactWriter, PersistedArtifacts};
use crate::types::{ClientConfig, Envelope, TimestampPayload};
use crate::verify::{self, Verdict};

/// Everything a run established.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// HTTP status of the fetch.
    pub status: u16,
    /// Decoded payload.
    pub payload: TimestampPayload,
    /// Canonical bytes (what was signed, and what `data.txt` holds).
    pub canonical_bytes: Vec<u8>,
    /// SHA-256 of the canonical bytes.
    pub digest: Sha256Digest,
    /// Digest string the producer sent.
    pub producer_digest: String,
    /// Agreement between the two digests.
    pub digest_check: DigestCheck,
    /// Length of the decoded signature.
    pub signature_len: usize,
    /// Where the artifacts were written.
    pub artifacts: PersistedArtifacts,
    /// Key used for verification, if any.
    pub public_key_file: Option<PathBuf>,
    /// Trust outcome.
    pub verdict: Verdict,
}

/// Client for one timestamp endpoint.
#[derive(Debug, Clone)]
pub struct TimestampClient {
    config: ClientConfig,
    fetcher: Fetcher,
    writer: ArtifactWriter,
}

impl TimestampClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let fetcher = Fetcher::new(Duration::from_secs(config.timeout_secs))?;
        let writer = ArtifactWriter::new(config.output_dir.clone());
        Ok(Self {
            config,
            fetcher,
            writer,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Run the whole pipeline once.
    pub async fn run(&self) -> ClientResult<RunReport> {
        let url = self.config.url.trim();
        if url.is_empty() {
            return Err(ClientError::MissingTarget);
        }
        debug!(url, len = url.len(), "target");

        let fetched = self.fetcher.fetch(url).await?;
        let envelope = envelope::decode(&fetched.body)?;
        self.process(fetched.status, envelope).await
    }

    /// Run everything after the fetch on an already decoded envelope.
    pub async fn process(&self, status: u16, envelope: Envelope) -> ClientResult<RunReport> {
        let canonical_bytes = canonicalize::encode(&envelope.payload)?;
        let digest = sha256(&canonical_bytes);
        let digest_check = check_producer_digest(&envelope.digest, &digest);
        debug!(digest = %digest, producer = %envelope.digest, check = digest_check.as_str(), "digest computed");

        if digest_check != DigestCheck::Match {
            if self.config.require_digest_match {
                return Err(ClientError::DigestMismatch {
                    expected: envelope.digest.clone(),
                    actual: digest.to_hex(),
                });
            }
            if digest_check == DigestCheck::Mismatch {
                warn!(producer = %envelope.digest, computed = %digest, "producer digest differs from computed digest");
            }
        }

        let signature = verify::decode_signature(&envelope.signature)?;
        let artifacts = self.writer.persist(&canonical_bytes, &signature).await?;

        let verdict = match &self.config.public_key_file {
            Some(path) => {
                let key = verify::load_public_key(path)?;
                verify::verify_signature(&key, &signature, &canonical_bytes)
            }
            None => Verdict::Unverified,
        };

        match verdict {
            Verdict::Verified => info!(digest = %digest, "verification successful"),
            Verdict::Failed => warn!(digest = %digest, "verification FAILED"),
            Verdict::Unverified => info!(digest = %digest, "no public key supplied, timestamp unverified"),
        }

        Ok(RunReport {
            status,
            payload: envelope.payload,
            canonical_bytes,
            digest,
            producer_digest: envelope.digest,
            digest_check,
            signature_len: signature.len(),
            artifacts,
            public_key_file: self.config.public_key_file.clone(),
            verdict,
        })
    }
}

/// Build a client from `config` and run it once.
pub async fn run(config: ClientConfig) -> ClientResult<RunReport> {
    TimestampClient::new(config)?.run().await
}
