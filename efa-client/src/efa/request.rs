//! URLs for the four EFA endpoints.

use reqwest::Url;
use tracing::debug;

use crate::domain::{JourneyParameters, TimetableParameters};

use super::config::EfaConfig;
use super::error::RequestError;

/// Stop finder: stations by name.
pub const STOP_FINDER: &str = "XML_STOPFINDER_REQUEST";
/// Departure monitor: timetable of one station.
pub const DEPARTURE_MONITOR: &str = "XML_DM_REQUEST";
/// Trip request: journeys, and stops near a coordinate.
pub const TRIP: &str = "XML_TRIP_REQUEST2";

/// Features an EFA deployment offers through this client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub gps: bool,
    pub via: bool,
    pub timetable: bool,
    pub timetable_direction: bool,
}

/// What every EFA endpoint supports.
pub const CAPABILITIES: Capabilities = Capabilities {
    gps: true,
    via: true,
    timetable: true,
    timetable_direction: false,
};

fn endpoint(config: &EfaConfig, name: &str) -> Result<Url, RequestError> {
    let raw = format!("{}{}", config.base_url, name);
    Url::parse(&raw).map_err(|e| RequestError::InvalidBaseUrl {
        url: config.base_url.clone(),
        message: e.to_string(),
    })
}

fn finish(url: Url) -> Url {
    debug!(%url, "built request");
    url
}

/// Stop-finder URL for a station name.
pub fn stop_finder_url(config: &EfaConfig, name: &str) -> Result<Url, RequestError> {
    let mut url = endpoint(config, STOP_FINDER)?;
    url.query_pairs_mut()
        .append_pair("language", &config.language)
        .append_pair("locationServerActive", "1")
        .append_pair("outputFormat", "XML")
        .append_pair("type_sf", "stop")
        .append_pair("coordOutputFormat", "WGS84")
        .append_pair("name_sf", name);
    Ok(finish(url))
}

/// Departure-monitor URL. The station must be resolved.
pub fn departure_monitor_url(
    config: &EfaConfig,
    params: &TimetableParameters,
) -> Result<Url, RequestError> {
    let dt = params.date_time;
    let mut url = endpoint(config, DEPARTURE_MONITOR)?;
    url.query_pairs_mut()
        .append_pair("type_dm", "stopID")
        .append_pair("name_dm", &params.station.id)
        .append_pair("coordOutputFormat", "WGS84")
        .append_pair("itdDateDay", &dt.format("%d").to_string())
        .append_pair("itdDateYearMonth", &dt.format("%Y%m").to_string())
        .append_pair("itdTimeHour", &dt.format("%H").to_string())
        .append_pair("itdTimeMinute", &dt.format("%M").to_string())
        .append_pair("itdTripDateTimeDepArr", params.mode.as_efa())
        .append_pair("useRealtime", "1")
        .append_pair("depType", "STOPEVENTS")
        .append_pair("mode", "direct");
    Ok(finish(url))
}

/// Coordinate-search URL: stops around a point.
pub fn coordinate_url(
    config: &EfaConfig,
    longitude: f64,
    latitude: f64,
) -> Result<Url, RequestError> {
    let mut url = endpoint(config, TRIP)?;
    url.query_pairs_mut()
        .append_pair("type_origin", "coord")
        .append_pair(
            "name_origin",
            &format!("{longitude:.6}:{latitude:.6}:WGS84"),
        )
        .append_pair("coordListOutputFormat", "STRING")
        .append_pair("max", &config.coordinate_max.to_string())
        .append_pair("inclFilter", "1")
        .append_pair("radius_1", &config.coordinate_radius.to_string())
        .append_pair("type_1", "STOP")
        .append_pair("coordOutputFormat", "WGS84");
    Ok(finish(url))
}

/// Trip-request URL. All stations must be resolved.
pub fn trip_url(config: &EfaConfig, params: &JourneyParameters) -> Result<Url, RequestError> {
    let mut url = endpoint(config, TRIP)?;
    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("type_origin", "stop")
            .append_pair("name_origin", &params.departure.id)
            .append_pair("type_destination", "stop")
            .append_pair("name_destination", &params.arrival.id);
        if let Some(via) = &params.via {
            query
                .append_pair("type_via", "stop")
                .append_pair("name_via", &via.id);
        }
        let dt = params.date_time;
        query
            .append_pair("itdTripDateTimeDepArr", params.mode.as_efa())
            .append_pair("itdDateDay", &dt.format("%d").to_string())
            .append_pair("itdDateMonth", &dt.format("%m").to_string())
            .append_pair("itdDateYear", &dt.format("%Y").to_string())
            .append_pair("itdTimeMinute", &dt.format("%M").to_string())
            .append_pair("itdTimeHour", &dt.format("%H").to_string())
            .append_pair("calcNumberOfTrips", &config.trip_count.to_string())
            .append_pair("language", &config.language)
            .append_pair("coordOutputFormat", "WGS84")
            .append_pair("coordListOutputFormat", "STRING")
            .append_pair("coordOutputFormatTail", "0")
            .append_pair("useProxFootSearch", "1")
            .append_pair("itOptionsActive", "1")
            .append_pair("ptOptionsActive", "1");

        let means = params.restriction.means_of_transport();
        if !means.is_empty() {
            query.append_pair("includedMeans", "checkbox");
            for code in means {
                query.append_pair(&format!("inclMOT_{code}"), "on");
            }
        }
    }
    Ok(finish(url))
}
