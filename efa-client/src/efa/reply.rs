//! Parse results with their side-channel diagnostics.

use super::error::{ServerError, SkippedLeg};

/// A parsed result together with the server errors found in the same
/// document.
///
/// Parsing always yields a value; errors reported by the server travel next
/// to it rather than replacing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply<T> {
    /// The parsed result (possibly partial or empty)
    pub value: T,
    /// Actionable server errors found in the response
    pub notifications: Vec<ServerError>,
    /// Journey legs dropped as malformed
    pub skipped_legs: Vec<SkippedLeg>,
}

impl<T> Reply<T> {
    /// A reply with no diagnostics.
    pub fn new(value: T) -> Self {
        Self {
            value,
            notifications: Vec::new(),
            skipped_legs: Vec::new(),
        }
    }

    /// A reply carrying server notifications.
    pub fn with_notifications(value: T, notifications: Vec<ServerError>) -> Self {
        Self {
            value,
            notifications,
            skipped_legs: Vec::new(),
        }
    }

    /// Transform the value, keeping the diagnostics.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reply<U> {
        Reply {
            value: f(self.value),
            notifications: self.notifications,
            skipped_legs: self.skipped_legs,
        }
    }

    /// Put earlier notifications in front of this reply's own.
    ///
    /// Used when one request was chained after another.
    pub fn after(mut self, mut earlier: Vec<ServerError>) -> Self {
        earlier.append(&mut self.notifications);
        self.notifications = earlier;
        self
    }

    /// Returns true if the server reported an actionable error.
    pub fn has_errors(&self) -> bool {
        !self.notifications.is_empty()
    }
}
