//! The request gate.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::{JourneyParameters, TimetableParameters};
use crate::efa::JourneyBook;

/// Which request a session is currently serving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RequestState {
    #[default]
    Idle,
    StationSearch,
    TimetableSearch,
    JourneySearch,
    JourneyDetails,
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestState::Idle => "idle",
            RequestState::StationSearch => "station search",
            RequestState::TimetableSearch => "timetable search",
            RequestState::JourneySearch => "journey search",
            RequestState::JourneyDetails => "journey details",
        };
        f.write_str(name)
    }
}

/// A request waiting for a station name to be resolved.
///
/// Set before a stop-finder request is issued on behalf of a timetable or
/// journey search, and taken when that stop-finder response arrives.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingFollowUp {
    Timetable(TimetableParameters),
    Journey(JourneyParameters),
}

/// Mutable state of a session.
#[derive(Debug, Default)]
pub(super) struct SessionData {
    pub state: RequestState,
    pub pending: Option<PendingFollowUp>,
    pub journeys: JourneyBook,
    /// Parameters of the last trip request sent, for pagination
    pub last_search: Option<JourneyParameters>,
}

pub(super) fn lock(data: &Mutex<SessionData>) -> MutexGuard<'_, SessionData> {
    data.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Holds the gate for one operation.
///
/// Dropping it, whether the operation finished, failed, timed out or was
/// cancelled, returns the session to idle and discards any pending follow-up.
pub(super) struct InFlight<'a> {
    data: &'a Mutex<SessionData>,
}

impl<'a> InFlight<'a> {
    /// Take the gate if the session is idle.
    ///
    /// On rejection the session is left untouched and the state that blocked
    /// the request is returned.
    pub fn acquire(
        data: &'a Mutex<SessionData>,
        state: RequestState,
    ) -> Result<Self, RequestState> {
        let mut guard = lock(data);
        if guard.state != RequestState::Idle {
            return Err(guard.state);
        }
        guard.state = state;
        drop(guard);
        Ok(Self { data })
    }

    /// Move to another in-flight state within the same operation.
    pub fn advance(&self, state: RequestState) {
        lock(self.data).state = state;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut data = lock(self.data);
        data.state = RequestState::Idle;
        data.pending = None;
    }
}
