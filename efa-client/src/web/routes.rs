//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::domain::{JourneyParameters, Mode, Station, TimetableParameters, TransportRestriction};
use crate::efa::{CAPABILITIES, Fetcher};
use crate::session::SessionError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router<F: Fetcher + 'static>(state: AppState<F>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/capabilities", get(capabilities))
        .route("/stations", get(search_stations::<F>))
        .route("/timetable", get(timetable::<F>))
        .route("/journeys", get(search_journeys::<F>))
        .route("/journeys/later", get(journeys_later::<F>))
        .route("/journeys/earlier", get(journeys_earlier::<F>))
        .route("/journeys/:id", get(journey_details::<F>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// What the EFA backend supports.
async fn capabilities() -> Json<CapabilitiesResponse> {
    Json(CapabilitiesResponse::new(CAPABILITIES))
}

/// Search stations by name, or around a point.
async fn search_stations<F: Fetcher>(
    State(state): State<AppState<F>>,
    Query(req): Query<StationsQuery>,
) -> Result<Response, AppError> {
    let reply = match (req.name.as_deref(), req.lat, req.lon) {
        (Some(name), _, _) if !name.trim().is_empty() => {
            state.session.find_stations_by_name(name.trim()).await?
        }
        (_, Some(lat), Some(lon)) => state.session.find_stations_by_coordinates(lon, lat).await?,
        _ => {
            return Err(AppError::BadRequest {
                message: "Give either a station name or lat and lon".into(),
            });
        }
    };

    Ok(Json(StationsResponse::from_reply(&reply)).into_response())
}

/// Departures or arrivals at a station.
async fn timetable<F: Fetcher>(
    State(state): State<AppState<F>>,
    Query(req): Query<TimetableQuery>,
) -> Result<Response, AppError> {
    let station = station_param(&req.station, req.station_id.as_deref()).ok_or_else(|| {
        AppError::BadRequest {
            message: "Missing station".into(),
        }
    })?;
    let date_time = parse_date_time(req.date.as_deref(), req.time.as_deref())?;
    let mode = parse_mode(req.mode.as_deref())?;

    let reply = state
        .session
        .timetable(TimetableParameters::new(station, date_time, mode))
        .await?;

    Ok(Json(OutcomeResponse::from_reply(&reply)).into_response())
}

/// Search journeys between two stations.
async fn search_journeys<F: Fetcher>(
    State(state): State<AppState<F>>,
    Query(req): Query<JourneyQuery>,
) -> Result<Response, AppError> {
    let missing = |which: &str| AppError::BadRequest {
        message: format!("Missing {which} station"),
    };
    let from =
        station_param(&req.from, req.from_id.as_deref()).ok_or_else(|| missing("departure"))?;
    let to = station_param(&req.to, req.to_id.as_deref()).ok_or_else(|| missing("arrival"))?;
    let via = station_param(req.via.as_deref().unwrap_or(""), req.via_id.as_deref());

    let date_time = parse_date_time(req.date.as_deref(), req.time.as_deref())?;
    let mode = parse_mode(req.mode.as_deref())?;
    let restriction = match req.restriction.as_deref() {
        None | Some("") => TransportRestriction::All,
        Some(key) => TransportRestriction::parse(key).ok_or_else(|| AppError::BadRequest {
            message: format!("Unknown restriction: {key}"),
        })?,
    };

    let mut params = JourneyParameters::new(from, to, date_time, mode).with_restriction(restriction);
    if let Some(via) = via {
        params = params.with_via(via);
    }

    let reply = state.session.search_journey(params).await?;
    Ok(Json(OutcomeResponse::from_reply(&reply)).into_response())
}

/// Page forward from the last journey search.
async fn journeys_later<F: Fetcher>(
    State(state): State<AppState<F>>,
) -> Result<Response, AppError> {
    let reply = state.session.search_journey_later().await?;
    Ok(Json(OutcomeResponse::from_journeys(reply)).into_response())
}

/// Page backward from the last journey search.
async fn journeys_earlier<F: Fetcher>(
    State(state): State<AppState<F>>,
) -> Result<Response, AppError> {
    let reply = state.session.search_journey_earlier().await?;
    Ok(Json(OutcomeResponse::from_journeys(reply)).into_response())
}

/// Legs of one journey from the last search.
async fn journey_details<F: Fetcher>(
    State(state): State<AppState<F>>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let detail = state
        .session
        .journey_details(&id)?
        .ok_or_else(|| AppError::NotFound {
            message: format!("No journey {id} in the last search"),
        })?;

    Ok(Json(JourneyDetailResponse::from_detail(&detail)).into_response())
}

/// Build a station from a name and optional id.
///
/// `None` when neither is given. Ids are opaque and passed through as
/// given, colons included.
fn station_param(name: &str, id: Option<&str>) -> Option<Station> {
    let name = name.trim();
    match id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => Some(Station::new(id, name)),
        None if name.is_empty() => None,
        None => Some(Station::named(name)),
    }
}

/// Parse optional date and time, defaulting to now.
fn parse_date_time(date: Option<&str>, time: Option<&str>) -> Result<NaiveDateTime, AppError> {
    let now = Local::now().naive_local();

    let date = match date.filter(|d| !d.is_empty()) {
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d").map_err(|_| AppError::BadRequest {
            message: format!("Invalid date: {d}"),
        })?,
        None => now.date(),
    };
    let time = match time.filter(|t| !t.is_empty()) {
        Some(t) => NaiveTime::parse_from_str(t, "%H:%M").map_err(|_| AppError::BadRequest {
            message: format!("Invalid time: {t}"),
        })?,
        None => now.time(),
    };

    Ok(date.and_time(time))
}

fn parse_mode(mode: Option<&str>) -> Result<Mode, AppError> {
    match mode.filter(|m| !m.is_empty()) {
        None => Ok(Mode::Departure),
        Some(m) => Mode::parse(m).ok_or_else(|| AppError::BadRequest {
            message: format!("Invalid mode: {m}"),
        }),
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    /// Another request holds the session
    Busy { message: String },
    /// The EFA server failed or could not be reached
    Upstream { message: String },
    Timeout { message: String },
    Internal { message: String },
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        let message = e.to_string();
        match e {
            SessionError::Busy(_) => AppError::Busy { message },
            SessionError::Timeout(_) => AppError::Timeout { message },
            SessionError::Fetch(_) => AppError::Upstream { message },
            SessionError::InvalidUrl(_) => AppError::Internal { message },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Busy { message } => (StatusCode::CONFLICT, message),
            AppError::Upstream { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Timeout { message } => (StatusCode::GATEWAY_TIMEOUT, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            warn!(%status, %message, "request failed");
        } else {
            debug!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
