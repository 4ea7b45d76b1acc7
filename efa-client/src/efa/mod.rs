//! EFA protocol support.
//!
//! Builds request URLs for the four EFA endpoints, fetches responses, and
//! turns response documents into domain types. Parsing never fails: every
//! parser returns a [`Reply`] holding whatever could be read, together with
//! the actionable errors the server embedded in the document.

mod client;
mod config;
mod datetime;
mod dialect;
mod error;
mod journeys;
mod messages;
mod mock;
mod reply;
pub mod request;
mod stations;
mod timetable;

pub use client::{Fetcher, HttpFetcher, inflate_if_gzip};
pub use config::EfaConfig;
pub use datetime::parse_itd_date_time;
pub use dialect::{Dialect, major_version};
pub use error::{FetchError, RequestError, ServerError, SkippedLeg};
pub use journeys::{JourneyBook, JourneyContext};
pub use messages::{SUPPRESSED_CODES, scan_messages};
pub use mock::MockFetcher;
pub use reply::Reply;
pub use request::{CAPABILITIES, Capabilities};
pub use stations::{parse_stations_by_coordinates, parse_stations_by_name};
pub use timetable::parse_timetable;
