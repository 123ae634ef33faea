//! Client for signed timestamp endpoints.
//!
//! A run fetches one envelope, re-encodes its payload into the exact bytes
//! the producer signed, digests them, writes `data.txt` / `data.sig`, and
//! checks the RSA PKCS#1 v1.5 (SHA-256) signature when a public key is
//! configured.
//!
//! # Quick Start
//!
//! ```no_run
//! use timestamp_client::{ClientConfig, TimestampClient, Verdict};
//!
//! # async fn example() -> Result<(), timestamp_client::ClientError> {
//! let config = ClientConfig::default()
//!     .with_url("https://time.example.com/v1/now")
//!     .with_public_key_file("key1.pub");
//!
//! let report = TimestampClient::new(config)?.run().await?;
//! if report.verdict == Verdict::Verified {
//!     println!("trusted timestamp: {}", report.payload.epoch_utc);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Artifacts
//!
//! | File | Content |
//! |------|---------|
//! | `data.txt` | canonical payload bytes |
//! | `data.sig` | raw signature bytes (base64-decoded) |
//!
//! Both can be re-checked offline with
//! `openssl dgst -sha256 -verify key1.pub -signature data.sig data.txt`.

pub mod canonicalize;
pub mod digest;
pub mod envelope;
pub mod error;
pub mod fetch;
pub mod persist;
pub mod pipeline;
pub mod types;
pub mod verify;

pub use digest::{check_producer_digest, sha256, DigestCheck, Sha256Digest};
pub use error::{ClientError, ClientResult};
pub use fetch::{FetchedBody, Fetcher, CLIENT_USER_AGENT};
pub use persist::{ArtifactWriter, PersistedArtifacts, DATA_FILE_NAME, SIGNATURE_FILE_NAME};
pub use pipeline::{run, RunReport, TimestampClient};
pub use types::{ClientConfig, Envelope, TimestampPayload};
pub use verify::{decode_signature, load_public_key, verify_signature, Verdict};
