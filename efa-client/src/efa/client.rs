//! Fetching raw EFA responses over HTTP.

use std::future::Future;
use std::io::Read;

use flate2::read::GzDecoder;
use reqwest::Url;
use tracing::debug;

use super::config::EfaConfig;
use super::error::FetchError;

/// First two bytes of a GZIP stream.
const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Something that turns a request URL into response bytes.
///
/// Implemented by [`HttpFetcher`] for live servers and by
/// [`MockFetcher`](super::MockFetcher) for tests.
pub trait Fetcher: Send + Sync {
    /// Fetch the body behind `url`, already decompressed.
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send;
}

/// Live EFA fetcher backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher using the configured timeout.
    pub fn new(config: &EfaConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        debug!(%url, "fetching");
        let response = self.http.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        debug!(bytes = body.len(), "response received");
        inflate_if_gzip(body.to_vec())
    }
}

/// Decompress `data` if it starts with the GZIP magic bytes.
///
/// Some EFA deployments gzip the body without saying so in the headers.
pub fn inflate_if_gzip(data: Vec<u8>) -> Result<Vec<u8>, FetchError> {
    if !data.starts_with(&GZIP_MAGIC) {
        return Ok(data);
    }

    let mut inflated = Vec::new();
    GzDecoder::new(data.as_slice())
        .read_to_end(&mut inflated)
        .map_err(FetchError::Decompress)?;
    debug!(
        compressed = data.len(),
        inflated = inflated.len(),
        "inflated gzip body"
    );
    Ok(inflated)
}
