//! Data transfer objects for web requests and responses.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::{
    JourneyDetail, JourneyLeg, JourneyResultList, JourneySummary, Station, TimetableEntry,
    TransportRestriction,
};
use crate::efa::{Capabilities, Reply};
use crate::session::Outcome;

/// Station search: by `name`, or by `lat` and `lon`.
#[derive(Debug, Default, Deserialize)]
pub struct StationsQuery {
    pub name: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// Departure monitor request.
#[derive(Debug, Default, Deserialize)]
pub struct TimetableQuery {
    /// Station id; when absent the name is looked up first
    pub station_id: Option<String>,

    /// Station name
    #[serde(default)]
    pub station: String,

    /// Date in YYYY-MM-DD format (defaults to today)
    pub date: Option<String>,

    /// Time in HH:MM format (defaults to now)
    pub time: Option<String>,

    /// `dep` or `arr` (defaults to `dep`)
    pub mode: Option<String>,
}

/// Journey search request.
///
/// Each station is given by name, with an optional id that skips the
/// name lookup.
#[derive(Debug, Default, Deserialize)]
pub struct JourneyQuery {
    #[serde(default)]
    pub from: String,
    pub from_id: Option<String>,
    pub via: Option<String>,
    pub via_id: Option<String>,
    #[serde(default)]
    pub to: String,
    pub to_id: Option<String>,

    /// Date in YYYY-MM-DD format (defaults to today)
    pub date: Option<String>,

    /// Time in HH:MM format (defaults to now)
    pub time: Option<String>,

    /// `dep` or `arr` (defaults to `dep`)
    pub mode: Option<String>,

    /// Transport restriction, e.g. `metro_train` (defaults to `all`)
    pub restriction: Option<String>,
}

/// A station in results.
#[derive(Debug, Serialize, PartialEq)]
pub struct StationResult {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub kind: Option<String>,
    pub misc_info: Option<String>,
}

/// Station search response.
#[derive(Debug, Serialize)]
pub struct StationsResponse {
    pub stations: Vec<StationResult>,
    pub notifications: Vec<String>,
}

/// A timetable row.
#[derive(Debug, Serialize, PartialEq)]
pub struct TimetableEntryResult {
    pub platform: String,
    pub destination: String,
    pub train_type: String,

    /// Scheduled time (HH:MM)
    pub time: Option<String>,

    /// `on time` or `N min late`, when real-time data exists
    pub status: Option<String>,
}

/// A journey alternative in a result list.
#[derive(Debug, Serialize, PartialEq)]
pub struct JourneySummaryResult {
    pub id: String,
    pub date: Option<String>,
    pub transfers: u32,
    pub duration: String,
    pub train_type: String,
    pub departure_time: Option<String>,
    pub arrival_time: Option<String>,
}

/// Journey search response.
#[derive(Debug, Serialize)]
pub struct JourneysResult {
    pub departure_station: String,
    pub via_station: String,
    pub arrival_station: String,
    pub time_info: String,
    pub journeys: Vec<JourneySummaryResult>,
}

/// One leg of a journey.
#[derive(Debug, Serialize, PartialEq)]
pub struct LegResult {
    pub departure_station: String,
    pub departure_info: String,
    pub departure: Option<String>,
    pub arrival_station: String,
    pub arrival_info: String,
    pub arrival: Option<String>,
    pub train: String,
    pub direction: String,
}

/// Journey detail response.
#[derive(Debug, Serialize)]
pub struct JourneyDetailResponse {
    pub id: String,
    pub departure_station: String,
    pub via_station: String,
    pub arrival_station: String,
    pub duration: String,
    pub departure: Option<String>,
    pub arrival: Option<String>,
    pub legs: Vec<LegResult>,
}

/// What a timetable or journey request produced.
///
/// `stations` appears when a station name had to be looked up and matched
/// nothing.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutcomeResult {
    Stations { stations: Vec<StationResult> },
    Timetable { entries: Vec<TimetableEntryResult> },
    Journeys(JourneysResult),
}

/// An outcome with the server's notifications and any dropped legs.
#[derive(Debug, Serialize)]
pub struct OutcomeResponse {
    #[serde(flatten)]
    pub result: OutcomeResult,
    pub notifications: Vec<String>,
    pub skipped_legs: Vec<String>,
}

/// A transport restriction option.
#[derive(Debug, Serialize)]
pub struct RestrictionResult {
    pub key: String,
    pub label: String,
}

/// What the server offers.
#[derive(Debug, Serialize)]
pub struct CapabilitiesResponse {
    pub gps: bool,
    pub via: bool,
    pub timetable: bool,
    pub timetable_direction: bool,
    pub restrictions: Vec<RestrictionResult>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// Conversion implementations

impl StationResult {
    /// Create from a domain Station.
    pub fn from_station(station: &Station) -> Self {
        Self {
            id: station.id.clone(),
            name: station.name.clone(),
            latitude: station.latitude,
            longitude: station.longitude,
            kind: station.kind.clone(),
            misc_info: station.misc_info.clone(),
        }
    }
}

impl StationsResponse {
    /// Create from a station search reply.
    pub fn from_reply(reply: &Reply<Vec<Station>>) -> Self {
        Self {
            stations: reply.value.iter().map(StationResult::from_station).collect(),
            notifications: notifications(reply),
        }
    }
}

impl TimetableEntryResult {
    /// Create from a domain TimetableEntry.
    pub fn from_entry(entry: &TimetableEntry) -> Self {
        Self {
            platform: entry.platform.clone(),
            destination: entry.destination.clone(),
            train_type: entry.train_type.clone(),
            time: entry.time.map(format_time),
            status: entry.status.map(|s| s.to_string()),
        }
    }
}

impl JourneySummaryResult {
    /// Create from a domain JourneySummary.
    pub fn from_summary(summary: &JourneySummary) -> Self {
        Self {
            id: summary.id.clone(),
            date: summary.date.map(format_date),
            transfers: summary.transfers,
            duration: summary.duration.clone(),
            train_type: summary.train_type.clone(),
            departure_time: summary.departure_time.map(format_time),
            arrival_time: summary.arrival_time.map(format_time),
        }
    }
}

impl JourneysResult {
    /// Create from a domain JourneyResultList.
    pub fn from_list(list: &JourneyResultList) -> Self {
        Self {
            departure_station: list.departure_station.clone(),
            via_station: list.via_station.clone(),
            arrival_station: list.arrival_station.clone(),
            time_info: list.time_info.clone(),
            journeys: list
                .journeys
                .iter()
                .map(JourneySummaryResult::from_summary)
                .collect(),
        }
    }
}

impl LegResult {
    /// Create from a domain JourneyLeg.
    pub fn from_leg(leg: &JourneyLeg) -> Self {
        Self {
            departure_station: leg.departure_station.clone(),
            departure_info: leg.departure_info.clone(),
            departure: leg.departure.map(format_date_time),
            arrival_station: leg.arrival_station.clone(),
            arrival_info: leg.arrival_info.clone(),
            arrival: leg.arrival.map(format_date_time),
            train: leg.train.clone(),
            direction: leg.direction.clone(),
        }
    }
}

impl JourneyDetailResponse {
    /// Create from a domain JourneyDetail.
    pub fn from_detail(detail: &JourneyDetail) -> Self {
        Self {
            id: detail.id.clone(),
            departure_station: detail.departure_station.clone(),
            via_station: detail.via_station.clone(),
            arrival_station: detail.arrival_station.clone(),
            duration: detail.duration.clone(),
            departure: detail.departure.map(format_date_time),
            arrival: detail.arrival.map(format_date_time),
            legs: detail.legs.iter().map(LegResult::from_leg).collect(),
        }
    }
}

impl OutcomeResponse {
    /// Create from a session outcome.
    pub fn from_reply(reply: &Reply<Outcome>) -> Self {
        let result = match &reply.value {
            Outcome::Stations(stations) => OutcomeResult::Stations {
                stations: stations.iter().map(StationResult::from_station).collect(),
            },
            Outcome::Timetable(entries) => OutcomeResult::Timetable {
                entries: entries.iter().map(TimetableEntryResult::from_entry).collect(),
            },
            Outcome::Journeys(list) => OutcomeResult::Journeys(JourneysResult::from_list(list)),
        };
        Self {
            result,
            notifications: notifications(reply),
            skipped_legs: reply.skipped_legs.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Create from a journey list reply.
    pub fn from_journeys(reply: Reply<JourneyResultList>) -> Self {
        Self::from_reply(&reply.map(Outcome::Journeys))
    }
}

impl CapabilitiesResponse {
    /// Describe the given capabilities and every transport restriction.
    pub fn new(capabilities: Capabilities) -> Self {
        Self {
            gps: capabilities.gps,
            via: capabilities.via,
            timetable: capabilities.timetable,
            timetable_direction: capabilities.timetable_direction,
            restrictions: TransportRestriction::ALL
                .iter()
                .map(|r| RestrictionResult {
                    key: r.key().to_string(),
                    label: r.label().to_string(),
                })
                .collect(),
        }
    }
}

fn notifications<T>(reply: &Reply<T>) -> Vec<String> {
    reply.notifications.iter().map(|n| n.text.clone()).collect()
}

fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn format_date_time(date_time: NaiveDateTime) -> String {
    date_time.format("%Y-%m-%dT%H:%M").to_string()
}
