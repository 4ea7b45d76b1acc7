//! Station results from stop-finder and coordinate-search responses.

use tracing::debug;

use crate::domain::Station;
use crate::xml::Document;

use super::dialect::Dialect;
use super::messages::scan_messages;
use super::reply::Reply;

/// Parse a stop-finder (`XML_STOPFINDER_REQUEST`) response.
pub fn parse_stations_by_name(data: &[u8]) -> Reply<Vec<Station>> {
    let doc = Document::parse(data);
    let stations = Dialect::detect(&doc).stations(&doc);
    debug!(count = stations.len(), "parsed stations by name");
    Reply::with_notifications(stations, scan_messages(&doc))
}

/// Parse the assigned stops of a coordinate (`type_origin=coord`) trip
/// request.
///
/// Each `itdOdvAssignedStop` carries an `id:name` composite `value`, its
/// position in `x`/`y` and its distance from the searched point in metres.
pub fn parse_stations_by_coordinates(data: &[u8]) -> Reply<Vec<Station>> {
    let doc = Document::parse(data);

    let stations: Vec<Station> = doc
        .elements_by_tag_name("itdOdvAssignedStop")
        .into_iter()
        .map(|stop| {
            let mut station = Station::from_composite(stop.attr_or_empty("value"))
                .with_position(stop.float_attr("x"), stop.float_attr("y"));
            station.kind = Some("STATION".to_string());
            station.misc_info = Some(format!("{}m", stop.attr_or_empty("distance")));
            station
        })
        .collect();

    debug!(count = stations.len(), "parsed stations by coordinates");
    Reply::with_notifications(stations, scan_messages(&doc))
}

/// v9 layout: `odvNameElem` attributes, with transport modes listed
/// separately in `itdStopModes` and joined on the station id.
pub(super) fn v9_stations(doc: &Document) -> Vec<Station> {
    let mut stations: Vec<Station> = doc
        .elements_by_tag_name("odvNameElem")
        .into_iter()
        .map(|elem| {
            Station::new(elem.attr_or_empty("id"), elem.attr_or_empty("objectName"))
                .with_position(elem.float_attr("x"), elem.float_attr("y"))
        })
        .collect();

    for modes in doc.elements_by_tag_name("itdStopModes") {
        let id = modes.attr_or_empty("id");
        if let Some(station) = stations.iter_mut().find(|s| s.id == id) {
            station.kind = Some(modes.attr_or_empty("mode").to_string());
        }
    }

    stations
}

/// v10 layout: name as element text, id in `stopID` or else `id`.
pub(super) fn v10_stations(doc: &Document) -> Vec<Station> {
    doc.elements_by_tag_name("odvNameElem")
        .into_iter()
        .map(|elem| {
            let id = elem
                .attr("stopID")
                .or_else(|| elem.attr("id"))
                .unwrap_or("");
            Station::new(id, elem.text()).with_position(elem.float_attr("x"), elem.float_attr("y"))
        })
        .collect()
}
