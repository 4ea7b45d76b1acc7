//! Session error types.

use std::time::Duration;

use crate::efa::{FetchError, RequestError};

use super::state::RequestState;

/// Errors from a session operation.
///
/// Server-reported errors are not among these; they are returned as
/// notifications next to the parsed result.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Another request is in flight
    #[error("session busy with {0}")]
    Busy(RequestState),

    /// The server did not answer in time
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Transport failure
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The request URL could not be built
    #[error(transparent)]
    InvalidUrl(#[from] RequestError),
}
