//! Mock fetcher for testing without an EFA server.
//!
//! Serves canned XML bodies keyed by endpoint name (the last path segment of
//! the request URL, e.g. `XML_TRIP_REQUEST2`) and records every URL asked
//! for.

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use reqwest::Url;

use super::client::{Fetcher, inflate_if_gzip};
use super::error::FetchError;

#[derive(Debug, Default)]
struct MockState {
    responses: HashMap<String, VecDeque<Vec<u8>>>,
    requests: Vec<Url>,
}

/// Mock fetcher serving responses from memory.
///
/// Responses queued for one endpoint are served in order; the last one is
/// repeated once the queue is down to it. Clones share state, so a test can
/// keep a handle after moving the fetcher into a session.
#[derive(Debug, Clone, Default)]
pub struct MockFetcher {
    state: Arc<Mutex<MockState>>,
}

impl MockFetcher {
    /// Create a mock with no responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for an endpoint (builder form).
    pub fn with_response(self, endpoint: &str, body: impl Into<Vec<u8>>) -> Self {
        self.push_response(endpoint, body);
        self
    }

    /// Queue a response for an endpoint.
    pub fn push_response(&self, endpoint: &str, body: impl Into<Vec<u8>>) {
        self.lock()
            .responses
            .entry(endpoint.to_string())
            .or_default()
            .push_back(body.into());
    }

    /// Load responses from a directory.
    ///
    /// Expects files named `{ENDPOINT}.xml` (e.g. `XML_DM_REQUEST.xml`).
    pub fn from_dir(data_dir: impl AsRef<Path>) -> Result<Self, FetchError> {
        let data_dir = data_dir.as_ref();
        let mock = Self::new();

        let entries = std::fs::read_dir(data_dir).map_err(|e| {
            FetchError::Mock(format!("failed to read mock data directory: {e}"))
        })?;

        for entry in entries {
            let path = entry
                .map_err(|e| FetchError::Mock(format!("failed to read directory entry: {e}")))?
                .path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("xml") {
                continue;
            }

            let endpoint = path
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| FetchError::Mock(format!("invalid filename: {path:?}")))?;
            let body = std::fs::read(&path)
                .map_err(|e| FetchError::Mock(format!("failed to read {path:?}: {e}")))?;

            mock.push_response(endpoint, body);
        }

        if mock.lock().responses.is_empty() {
            return Err(FetchError::Mock(format!(
                "no mock response files found in {data_dir:?}"
            )));
        }

        Ok(mock)
    }

    /// Every URL fetched so far, in order.
    pub fn requests(&self) -> Vec<Url> {
        self.lock().requests.clone()
    }

    /// Endpoints with at least one response available.
    pub fn endpoints(&self) -> Vec<String> {
        let mut endpoints: Vec<String> = self.lock().responses.keys().cloned().collect();
        endpoints.sort();
        endpoints
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_response(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let endpoint = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or("")
            .to_string();

        let mut state = self.lock();
        state.requests.push(url.clone());

        let queue = state.responses.get_mut(&endpoint).ok_or_else(|| {
            FetchError::Mock(format!("no mock response for endpoint {endpoint}"))
        })?;
        let body = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        body.ok_or_else(|| FetchError::Mock(format!("no mock response for endpoint {endpoint}")))
    }
}

impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        inflate_if_gzip(self.next_response(url)?)
    }
}
