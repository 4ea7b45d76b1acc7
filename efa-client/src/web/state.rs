//! Application state for the web layer.

use std::sync::Arc;

use crate::efa::Fetcher;
use crate::session::EfaSession;

/// Shared application state.
///
/// Every handler talks to the same session, so concurrent requests see
/// each other as busy.
pub struct AppState<F> {
    /// The EFA session
    pub session: Arc<EfaSession<F>>,
}

impl<F: Fetcher> AppState<F> {
    /// Create a new app state.
    pub fn new(session: EfaSession<F>) -> Self {
        Self {
            session: Arc::new(session),
        }
    }
}

// Manual impl: deriving would require `F: Clone`.
impl<F> Clone for AppState<F> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
        }
    }
}
