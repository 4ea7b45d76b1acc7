//! EFA client error types.

/// Errors from fetching a response from the EFA server.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },

    /// Response looked gzip-compressed but did not inflate
    #[error("failed to decompress response: {0}")]
    Decompress(#[source] std::io::Error),

    /// Mock fetcher has nothing to serve
    #[error("mock: {0}")]
    Mock(String),
}

/// Errors building a request URL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// The configured base URL does not parse
    #[error("invalid base URL {url}: {message}")]
    InvalidBaseUrl { url: String, message: String },
}

/// An actionable error message embedded in an EFA response.
///
/// These never abort parsing. They travel alongside whatever result was
/// built from the rest of the document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("server error: {text}")]
pub struct ServerError {
    /// Numeric `itdMessage` code (always negative)
    pub code: i32,
    /// Message text, or the code when the server sent no text
    pub text: String,
}

/// A leg dropped while rebuilding a journey because the parallel lists of
/// stops, times and means of transport ran out.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "skipped malformed leg {pair} of journey {journey_id} \
     (departures {departures}, arrivals {arrivals}, stops {stops}, means {means}, means used {means_used})"
)]
pub struct SkippedLeg {
    /// Journey the leg belongs to
    pub journey_id: String,
    /// 0-based index of the stop pair
    pub pair: usize,
    /// Departure times collected for the journey
    pub departures: usize,
    /// Arrival times collected for the journey
    pub arrivals: usize,
    /// Stop names collected for the journey
    pub stops: usize,
    /// Means-of-transport descriptors collected for the journey
    pub means: usize,
    /// Descriptors already consumed by earlier legs
    pub means_used: usize,
}
