//! Domain types for EFA journey-planner results.
//!
//! These are the records the response parsers build from EFA XML documents
//! and hand back to callers, together with the parameter types callers use to
//! describe timetable and journey requests.

mod journey;
mod query;
mod station;
mod time;
mod timetable;

pub use journey::{
    JourneyDetail, JourneyLeg, JourneyResultList, JourneySummary, PaginationBounds,
};
pub use query::{JourneyParameters, TimetableParameters, TransportRestriction};
pub use station::Station;
pub use time::{Mode, time_info};
pub use timetable::{RealtimeStatus, TimetableEntry};
