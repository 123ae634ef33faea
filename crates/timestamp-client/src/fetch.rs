//! HTTP fetch of the timestamp envelope.
//!
//! One GET per run, bounded by the configured deadline, no retries. The
//! status code is not interpreted here: a non-2xx body still goes to the
//! decoder, which rejects anything that is not an envelope.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use tracing::{debug, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};

/// User-Agent sent with every request.
pub const CLIENT_USER_AGENT: &str = concat!("timestamp-client/", env!("CARGO_PKG_VERSION"));

/// Raw response of a fetch.
#[derive(Debug, Clone)]
pub struct FetchedBody {
    pub status: u16,
    pub body: Vec<u8>,
}

/// HTTP fetcher (holds the reqwest client).
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new(timeout: Duration) -> ClientResult<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(default_headers)
            .build()
            .map_err(|e| ClientError::Fetch {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self { client })
    }

    /// Issue a single GET and return the full body.
    pub async fn fetch(&self, url: &str) -> ClientResult<FetchedBody> {
        let url = Url::parse(url).map_err(|e| ClientError::Fetch {
            message: format!("invalid URL {:?}: {}", url, e),
        })?;
        debug!(url = %url, "fetching timestamp");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "endpoint returned non-success status");
        }

        let body = response.bytes().await.map_err(|e| ClientError::Fetch {
            message: format!("failed to read response body: {}", e),
        })?;
        debug!(status = status.as_u16(), len = body.len(), "response received");

        Ok(FetchedBody {
            status: status.as_u16(),
            body: body.to_vec(),
        })
    }
}
