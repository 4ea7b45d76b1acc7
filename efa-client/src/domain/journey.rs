//! Journey types.
//!
//! A trip request returns several alternative routes. Each is summarised by a
//! `JourneySummary` for the result list, and described hop by hop by a
//! `JourneyDetail` holding its `JourneyLeg`s. Both share the route's 1-based
//! position in the result set as identifier.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use super::time_info;

/// One alternative route in a journey result list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JourneySummary {
    /// 1-based position in the result set, as text
    pub id: String,
    /// Departure date
    pub date: Option<NaiveDate>,
    /// Number of changes
    pub transfers: u32,
    /// Duration as reported by the server (e.g. `00:45`)
    pub duration: String,
    /// Distinct means of transport, comma separated
    pub train_type: String,
    /// Departure time of day
    pub departure_time: Option<NaiveTime>,
    /// Arrival time of day
    pub arrival_time: Option<NaiveTime>,
}

/// A single hop of a journey, from one stop to the next.
///
/// Legs of a journey are route-adjacent: each leg starts where the previous
/// one ended. This is trusted from server ordering, not checked.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JourneyLeg {
    /// Boarding stop name
    pub departure_station: String,
    /// Boarding platform
    pub departure_info: String,
    /// Boarding time
    pub departure: Option<NaiveDateTime>,
    /// Alighting stop name
    pub arrival_station: String,
    /// Alighting platform
    pub arrival_info: String,
    /// Alighting time
    pub arrival: Option<NaiveDateTime>,
    /// Means of transport (`Walk` for footpaths)
    pub train: String,
    /// Direction or destination of the vehicle
    pub direction: String,
}

/// Full itinerary of one journey alternative.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JourneyDetail {
    /// Matches the summary's identifier
    pub id: String,
    /// Requested origin name
    pub departure_station: String,
    /// Requested via name (empty when none)
    pub via_station: String,
    /// Requested destination name
    pub arrival_station: String,
    /// Duration as reported by the server
    pub duration: String,
    /// Departure of the first leg
    pub departure: Option<NaiveDateTime>,
    /// Arrival of the last leg
    pub arrival: Option<NaiveDateTime>,
    /// Legs in travel order
    pub legs: Vec<JourneyLeg>,
}

/// Result of a journey search.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JourneyResultList {
    /// Requested origin name
    pub departure_station: String,
    /// Requested via name (empty when none)
    pub via_station: String,
    /// Requested destination name
    pub arrival_station: String,
    /// `"<date>, <time>"` label of the requested time
    pub time_info: String,
    /// Alternatives in server order
    pub journeys: Vec<JourneySummary>,
}

impl JourneyResultList {
    /// An empty result carrying the requested stations and time.
    pub fn empty(
        departure_station: impl Into<String>,
        via_station: impl Into<String>,
        arrival_station: impl Into<String>,
        requested: NaiveDateTime,
    ) -> Self {
        Self {
            departure_station: departure_station.into(),
            via_station: via_station.into(),
            arrival_station: arrival_station.into(),
            time_info: time_info(requested),
            journeys: Vec::new(),
        }
    }

    /// Number of alternatives.
    pub fn len(&self) -> usize {
        self.journeys.len()
    }

    /// Returns true if no alternatives were found.
    pub fn is_empty(&self) -> bool {
        self.journeys.is_empty()
    }
}

/// Anchors for "earlier" and "later" follow-up searches.
///
/// Tracks the earliest arrival and latest departure seen in one result set.
/// The anchors sit one minute outside those extremes so a follow-up search
/// does not return the same journeys again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaginationBounds {
    earliest_arrival: Option<NaiveDateTime>,
    latest_departure: Option<NaiveDateTime>,
}

impl PaginationBounds {
    /// Offset applied outside the observed extremes.
    pub fn margin() -> Duration {
        Duration::seconds(60)
    }

    /// Record one journey's departure and arrival.
    pub fn observe(&mut self, departure: Option<NaiveDateTime>, arrival: Option<NaiveDateTime>) {
        if let Some(arrival) = arrival {
            self.earliest_arrival = Some(match self.earliest_arrival {
                Some(current) => current.min(arrival),
                None => arrival,
            });
        }
        if let Some(departure) = departure {
            self.latest_departure = Some(match self.latest_departure {
                Some(current) => current.max(departure),
                None => departure,
            });
        }
    }

    /// Anchor for an "earlier" search: earliest arrival minus one minute.
    pub fn earliest_arrival(&self) -> Option<NaiveDateTime> {
        self.earliest_arrival.map(|t| t - Self::margin())
    }

    /// Anchor for a "later" search: latest departure plus one minute.
    pub fn latest_departure(&self) -> Option<NaiveDateTime> {
        self.latest_departure.map(|t| t + Self::margin())
    }

    /// Returns true if neither anchor is set.
    pub fn is_unset(&self) -> bool {
        self.earliest_arrival.is_none() && self.latest_departure.is_none()
    }
}
