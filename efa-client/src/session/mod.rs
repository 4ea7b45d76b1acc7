//! A single-request EFA session.
//!
//! An [`EfaSession`] serves one request at a time. Starting an operation
//! while another is in flight fails with [`SessionError::Busy`] and changes
//! nothing. The session owns the journey details of its most recent trip
//! response, which back [`EfaSession::journey_details`] and the
//! earlier/later follow-up searches.
//!
//! Timetable and journey searches accept stations known only by name. The
//! session then resolves each name with a stop-finder request first, using
//! the first station the server returns, and issues the real request once
//! everything is resolved.

mod error;
mod state;

use std::sync::Mutex;

use chrono::NaiveDateTime;
use reqwest::Url;
use tracing::{debug, warn};

use crate::domain::{
    JourneyDetail, JourneyParameters, JourneyResultList, Mode, Station, TimetableEntry,
    TimetableParameters, TransportRestriction,
};
use crate::efa::{
    EfaConfig, Fetcher, JourneyContext, Reply, parse_stations_by_coordinates,
    parse_stations_by_name, parse_timetable, request,
};

pub use error::SessionError;
pub use state::{PendingFollowUp, RequestState};

use state::{InFlight, SessionData, lock};

/// Result of an operation that may end early at station resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A station name matched nothing; the follow-up was dropped
    Stations(Vec<Station>),
    Timetable(Vec<TimetableEntry>),
    Journeys(JourneyResultList),
}

/// An EFA session over some [`Fetcher`].
pub struct EfaSession<F> {
    config: EfaConfig,
    fetcher: F,
    data: Mutex<SessionData>,
}

impl<F: Fetcher> EfaSession<F> {
    /// Create an idle session.
    pub fn new(config: EfaConfig, fetcher: F) -> Self {
        Self {
            config,
            fetcher,
            data: Mutex::new(SessionData::default()),
        }
    }

    /// Session configuration.
    pub fn config(&self) -> &EfaConfig {
        &self.config
    }

    /// The request currently in flight.
    pub fn state(&self) -> RequestState {
        lock(&self.data).state
    }

    /// Find stations matching a name.
    pub async fn find_stations_by_name(
        &self,
        name: &str,
    ) -> Result<Reply<Vec<Station>>, SessionError> {
        let flight = self.begin(RequestState::StationSearch)?;
        self.request_stations(&flight, name).await
    }

    /// Find stations around a point.
    pub async fn find_stations_by_coordinates(
        &self,
        longitude: f64,
        latitude: f64,
    ) -> Result<Reply<Vec<Station>>, SessionError> {
        let _flight = self.begin(RequestState::StationSearch)?;
        let url = request::coordinate_url(&self.config, longitude, latitude)?;
        let data = self.fetch(&url).await?;
        Ok(parse_stations_by_coordinates(&data))
    }

    /// Departures (or arrivals) at a station.
    ///
    /// An unresolved station is looked up by name first.
    pub async fn timetable(
        &self,
        params: TimetableParameters,
    ) -> Result<Reply<Outcome>, SessionError> {
        let flight = self.begin(RequestState::TimetableSearch)?;

        if params.station.is_resolved() {
            let reply = self.request_timetable(&flight, &params).await?;
            return Ok(reply.map(Outcome::Timetable));
        }

        let name = params.station.name.clone();
        self.set_pending(PendingFollowUp::Timetable(params));
        let stations = self.request_stations(&flight, &name).await?;
        self.complete_station_search(&flight, stations).await
    }

    /// Search journeys.
    ///
    /// Unresolved stations are looked up by name first, one at a time, in
    /// route order.
    pub async fn search_journey(
        &self,
        params: JourneyParameters,
    ) -> Result<Reply<Outcome>, SessionError> {
        let flight = self.begin(RequestState::JourneySearch)?;

        let Some(name) = params.first_unresolved().map(|s| s.name.clone()) else {
            let reply = self.request_journey(&flight, params).await?;
            return Ok(reply.map(Outcome::Journeys));
        };

        self.set_pending(PendingFollowUp::Journey(params));
        let stations = self.request_stations(&flight, &name).await?;
        self.complete_station_search(&flight, stations).await
    }

    /// Repeat the last journey search for departures after the latest one
    /// found.
    pub async fn search_journey_later(&self) -> Result<Reply<JourneyResultList>, SessionError> {
        let (last, bound) = {
            let data = lock(&self.data);
            (data.last_search.clone(), data.journeys.bounds().latest_departure())
        };
        self.paginate(last, bound, Mode::Departure).await
    }

    /// Repeat the last journey search for arrivals before the earliest one
    /// found.
    pub async fn search_journey_earlier(&self) -> Result<Reply<JourneyResultList>, SessionError> {
        let (last, bound) = {
            let data = lock(&self.data);
            (data.last_search.clone(), data.journeys.bounds().earliest_arrival())
        };
        self.paginate(last, bound, Mode::Arrival).await
    }

    /// Detail of a journey from the last search, by its id.
    ///
    /// Answered from memory. Returns `Ok(None)` for an unknown id.
    pub fn journey_details(&self, id: &str) -> Result<Option<JourneyDetail>, SessionError> {
        let _flight = self.begin(RequestState::JourneyDetails)?;
        let detail = lock(&self.data).journeys.detail(id).cloned();
        Ok(detail)
    }

    fn begin(&self, state: RequestState) -> Result<InFlight<'_>, SessionError> {
        InFlight::acquire(&self.data, state).map_err(|current| {
            debug!(%current, requested = %state, "request rejected");
            SessionError::Busy(current)
        })
    }

    fn set_pending(&self, pending: PendingFollowUp) {
        lock(&self.data).pending = Some(pending);
    }

    fn take_pending(&self) -> Option<PendingFollowUp> {
        lock(&self.data).pending.take()
    }

    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, SessionError> {
        let timeout = self.config.timeout;
        match tokio::time::timeout(timeout, self.fetcher.fetch(url)).await {
            Ok(body) => Ok(body?),
            Err(_) => {
                warn!(%url, ?timeout, "request timed out");
                Err(SessionError::Timeout(timeout))
            }
        }
    }

    async fn paginate(
        &self,
        last: Option<JourneyParameters>,
        bound: Option<NaiveDateTime>,
        mode: Mode,
    ) -> Result<Reply<JourneyResultList>, SessionError> {
        let Some(last) = last else {
            debug!("no previous journey search to page from");
            return Ok(Reply::new(JourneyResultList::default()));
        };

        let Some(date_time) = bound else {
            debug!(%mode, "no pagination bound, returning empty result");
            return Ok(Reply::new(JourneyResultList::empty(
                last.departure.name.as_str(),
                last.via_name(),
                last.arrival.name.as_str(),
                last.date_time,
            )));
        };

        let flight = self.begin(RequestState::JourneySearch)?;
        let params = JourneyParameters {
            date_time,
            mode,
            restriction: TransportRestriction::All,
            ..last
        };
        self.request_journey(&flight, params).await
    }

    async fn request_stations(
        &self,
        flight: &InFlight<'_>,
        name: &str,
    ) -> Result<Reply<Vec<Station>>, SessionError> {
        flight.advance(RequestState::StationSearch);
        let url = request::stop_finder_url(&self.config, name)?;
        let data = self.fetch(&url).await?;
        Ok(parse_stations_by_name(&data))
    }

    async fn request_timetable(
        &self,
        flight: &InFlight<'_>,
        params: &TimetableParameters,
    ) -> Result<Reply<Vec<TimetableEntry>>, SessionError> {
        flight.advance(RequestState::TimetableSearch);
        let url = request::departure_monitor_url(&self.config, params)?;
        let data = self.fetch(&url).await?;
        Ok(parse_timetable(&data))
    }

    async fn request_journey(
        &self,
        flight: &InFlight<'_>,
        params: JourneyParameters,
    ) -> Result<Reply<JourneyResultList>, SessionError> {
        flight.advance(RequestState::JourneySearch);
        let url = request::trip_url(&self.config, &params)?;
        let context = JourneyContext {
            departure_station: params.departure.name.clone(),
            via_station: params.via_name().to_string(),
            arrival_station: params.arrival.name.clone(),
            requested: params.date_time,
        };
        let data = self.fetch(&url).await?;

        // Pagination pairs these parameters with the bounds parsed below, so
        // both change together or not at all.
        let mut guard = lock(&self.data);
        guard.last_search = Some(params);
        Ok(guard.journeys.parse(&data, &context))
    }

    /// Handle a stop-finder response, running any pending follow-up.
    ///
    /// Without a pending follow-up, or when no returned station carries an
    /// id, the stations themselves are the outcome.
    async fn complete_station_search(
        &self,
        flight: &InFlight<'_>,
        mut stations: Reply<Vec<Station>>,
    ) -> Result<Reply<Outcome>, SessionError> {
        let mut notifications = Vec::new();

        loop {
            let Some(pending) = self.take_pending() else {
                return Ok(stations.map(Outcome::Stations).after(notifications));
            };
            let Some(first) = stations.value.iter().find(|s| s.is_resolved()).cloned() else {
                debug!("station name matched nothing, dropping follow-up");
                return Ok(stations.map(Outcome::Stations).after(notifications));
            };
            notifications.append(&mut stations.notifications);

            match pending {
                PendingFollowUp::Timetable(mut params) => {
                    params.station = first;
                    let reply = self.request_timetable(flight, &params).await?;
                    return Ok(reply.map(Outcome::Timetable).after(notifications));
                }
                PendingFollowUp::Journey(mut params) => {
                    params.resolve_next(first);
                    match params.first_unresolved().map(|s| s.name.clone()) {
                        Some(name) => {
                            self.set_pending(PendingFollowUp::Journey(params));
                            stations = self.request_stations(flight, &name).await?;
                        }
                        None => {
                            let reply = self.request_journey(flight, params).await?;
                            return Ok(reply.map(Outcome::Journeys).after(notifications));
                        }
                    }
                }
            }
        }
    }
}
