//! Configuration for talking to an EFA server.

use std::time::Duration;

/// Default language for server messages and names.
const DEFAULT_LANGUAGE: &str = "en";

/// Default number of journey alternatives requested.
const DEFAULT_TRIP_COUNT: u8 = 5;

/// Configuration for an EFA endpoint.
#[derive(Debug, Clone)]
pub struct EfaConfig {
    /// Base URL the endpoint names are appended to (always ends in `/`)
    pub base_url: String,
    /// Language code sent with requests
    pub language: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Number of journey alternatives to ask for (`calcNumberOfTrips`)
    pub trip_count: u8,
    /// Search radius in metres for coordinate searches
    pub coordinate_radius: u32,
    /// Maximum stops returned by a coordinate search
    pub coordinate_max: u32,
}

impl EfaConfig {
    /// Create a config for the EFA deployment at `base_url`.
    ///
    /// A trailing slash is added when missing, so
    /// `http://jp.ptv.vic.gov.au/ptv` and `http://jp.ptv.vic.gov.au/ptv/`
    /// are equivalent.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            base_url,
            language: DEFAULT_LANGUAGE.to_string(),
            timeout: Duration::from_secs(30),
            trip_count: DEFAULT_TRIP_COUNT,
            coordinate_radius: 3000,
            coordinate_max: 10,
        }
    }

    /// Set the language code.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the number of journey alternatives to request.
    pub fn with_trip_count(mut self, n: u8) -> Self {
        self.trip_count = n;
        self
    }

    /// Set the coordinate search radius in metres.
    pub fn with_coordinate_radius(mut self, metres: u32) -> Self {
        self.coordinate_radius = metres;
        self
    }

    /// Set the maximum number of stops a coordinate search returns.
    pub fn with_coordinate_max(mut self, n: u32) -> Self {
        self.coordinate_max = n;
        self
    }
}
