//! Trip request (`XML_TRIP_REQUEST2`) responses.
//!
//! Each `itdRoute` describes one alternative. Its stops, times and means of
//! transport arrive as three independent lists which are stitched back into
//! legs here: stops pair up as (boarding, alighting), the n-th pair takes the
//! n-th departure and arrival time, and means of transport are consumed one
//! per leg actually built.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::domain::{
    JourneyDetail, JourneyLeg, JourneyResultList, JourneySummary, PaginationBounds,
};
use crate::xml::{Document, Element};

use super::datetime::parse_itd_date_time;
use super::error::SkippedLeg;
use super::messages::scan_messages;
use super::reply::Reply;

/// `productName` the server uses for footpaths.
const FOOTPATH_PRODUCT: &str = "Fussweg";

/// Label shown for footpath legs.
const WALK: &str = "Walk";

/// What was asked for, echoed into the result list and every detail.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JourneyContext {
    pub departure_station: String,
    pub via_station: String,
    pub arrival_station: String,
    pub requested: NaiveDateTime,
}

/// Journey details of the most recent trip response, with its pagination
/// anchors.
///
/// Every parse replaces the previous contents entirely.
#[derive(Debug, Clone, Default)]
pub struct JourneyBook {
    details: HashMap<String, JourneyDetail>,
    bounds: PaginationBounds,
}

impl JourneyBook {
    /// Create an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a trip response, replacing all cached details and bounds.
    pub fn parse(&mut self, data: &[u8], context: &JourneyContext) -> Reply<JourneyResultList> {
        self.details.clear();
        self.bounds = PaginationBounds::default();

        let doc = Document::parse(data);
        let mut list = JourneyResultList::empty(
            &context.departure_station,
            &context.via_station,
            &context.arrival_station,
            context.requested,
        );
        let mut skipped_legs = Vec::new();

        for (index, route) in doc.elements_by_tag_name("itdRoute").into_iter().enumerate() {
            let id = (index + 1).to_string();
            let parsed = RouteLists::collect(route);
            let (legs, skipped) = parsed.legs(&id);
            skipped_legs.extend(skipped);

            let departure = parsed.departures.first().copied().flatten();
            let arrival = parsed.arrivals.last().copied().flatten();
            let duration = route.attr_or_empty("publicDuration").to_string();

            list.journeys.push(JourneySummary {
                id: id.clone(),
                date: departure.map(|dt| dt.date()),
                transfers: u32::try_from(route.int_attr("changes")).unwrap_or(0),
                duration: duration.clone(),
                train_type: parsed.train_types(),
                departure_time: departure.map(|dt| dt.time()),
                arrival_time: arrival.map(|dt| dt.time()),
            });

            self.details.insert(
                id.clone(),
                JourneyDetail {
                    id,
                    departure_station: context.departure_station.clone(),
                    via_station: context.via_station.clone(),
                    arrival_station: context.arrival_station.clone(),
                    duration,
                    departure,
                    arrival,
                    legs,
                },
            );
            self.bounds.observe(departure, arrival);
        }

        debug!(
            journeys = list.len(),
            skipped = skipped_legs.len(),
            "parsed journeys"
        );

        let mut reply = Reply::with_notifications(list, scan_messages(&doc));
        reply.skipped_legs = skipped_legs;
        reply
    }

    /// Detail of the journey with the given 1-based id.
    pub fn detail(&self, id: &str) -> Option<&JourneyDetail> {
        self.details.get(id)
    }

    /// Pagination anchors of the last parse.
    pub fn bounds(&self) -> PaginationBounds {
        self.bounds
    }

    /// Number of cached details.
    pub fn len(&self) -> usize {
        self.details.len()
    }

    /// Returns true if no details are cached.
    pub fn is_empty(&self) -> bool {
        self.details.is_empty()
    }
}

/// A means-of-transport descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Means {
    name: String,
    destination: String,
}

/// A stop as seen at one timestamp of an `itdPoint`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Stop {
    name: String,
    platform: String,
}

/// The parallel lists of one route.
#[derive(Debug, Default)]
struct RouteLists {
    departures: Vec<Option<NaiveDateTime>>,
    arrivals: Vec<Option<NaiveDateTime>>,
    stops: Vec<Stop>,
    means: Vec<Means>,
}

impl RouteLists {
    fn collect(route: &Element) -> Self {
        let mut lists = RouteLists::default();
        let Some(partial_routes) = route.first_child("itdPartialRouteList") else {
            return lists;
        };

        for means in partial_routes.descendants("itdMeansOfTransport") {
            let name = if means.attr_or_empty("productName") == FOOTPATH_PRODUCT {
                WALK.to_string()
            } else {
                means.attr_or_empty("name").to_string()
            };
            lists.means.push(Means {
                name,
                destination: means.attr_or_empty("destination").to_string(),
            });
        }

        for point in partial_routes.descendants("itdPoint") {
            let times = match point.attr_or_empty("usage") {
                "departure" => &mut lists.departures,
                "arrival" => &mut lists.arrivals,
                _ => continue,
            };
            for date_time in point.children().filter(|c| c.name() == "itdDateTime") {
                times.push(parse_itd_date_time(date_time));
                lists.stops.push(Stop {
                    name: point.attr_or_empty("name").to_string(),
                    platform: point.attr_or_empty("platformName").to_string(),
                });
            }
        }

        lists
    }

    /// Rebuild the legs, reporting pairs dropped because a list ran short.
    fn legs(&self, journey_id: &str) -> (Vec<JourneyLeg>, Vec<SkippedLeg>) {
        let mut legs = Vec::new();
        let mut skipped = Vec::new();
        let mut means_used = 0;

        for pair in 0..self.stops.len().div_ceil(2) {
            let departure = self.departures.get(pair);
            let arrival = self.arrivals.get(pair);

            if let (Some(None), Some(None)) = (departure, arrival) {
                continue;
            }

            let parts = (
                departure,
                arrival,
                self.stops.get(2 * pair),
                self.stops.get(2 * pair + 1),
                self.means.get(means_used),
            );
            let (Some(&departure), Some(&arrival), Some(from), Some(to), Some(means)) = parts
            else {
                let leg = SkippedLeg {
                    journey_id: journey_id.to_string(),
                    pair,
                    departures: self.departures.len(),
                    arrivals: self.arrivals.len(),
                    stops: self.stops.len(),
                    means: self.means.len(),
                    means_used,
                };
                warn!(%leg, "leg lists out of step");
                skipped.push(leg);
                continue;
            };

            legs.push(JourneyLeg {
                departure_station: from.name.clone(),
                departure_info: from.platform.clone(),
                departure,
                arrival_station: to.name.clone(),
                arrival_info: to.platform.clone(),
                arrival,
                train: means.name.clone(),
                direction: means.destination.clone(),
            });
            means_used += 1;
        }

        (legs, skipped)
    }

    /// Distinct means-of-transport names in first-seen order, comma joined.
    fn train_types(&self) -> String {
        let mut seen: Vec<&str> = Vec::new();
        for means in &self.means {
            if !seen.contains(&means.name.as_str()) {
                seen.push(&means.name);
            }
        }
        seen.join(", ").trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn context() -> JourneyContext {
        JourneyContext {
            departure_station: "Richmond".into(),
            via_station: String::new(),
            arrival_station: "Lilydale".into(),
            requested: at(8, 0),
        }
    }

    fn point(usage: &str, name: &str, platform: &str, times: &[(u32, u32)]) -> String {
        let times: String = times
            .iter()
            .map(|(h, m)| {
                format!(
                    r#"<itdDateTime><itdDate year="2024" month="3" day="15"/><itdTime hour="{h}" minute="{m}"/></itdDateTime>"#
                )
            })
            .collect();
        format!(
            r#"<itdPoint usage="{usage}" name="{name}" platformName="{platform}" stopID="1">{times}</itdPoint>"#
        )
    }

    fn partial_route(points: [String; 2], product: &str, name: &str, destination: &str) -> String {
        format!(
            r#"<itdPartialRoute type="IT">{}{}<itdMeansOfTransport productName="{product}" name="{name}" destination="{destination}" motType="0"/></itdPartialRoute>"#,
            points[0], points[1]
        )
    }

    fn route(changes: u32, duration: &str, partial_routes: &[String]) -> String {
        format!(
            r#"<itdRoute changes="{changes}" publicDuration="{duration}" vehicleTime="40"><itdPartialRouteList>{}</itdPartialRouteList></itdRoute>"#,
            partial_routes.concat()
        )
    }

    fn trip(routes: &[String]) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<itdRequest version="9.20.37.59"><itdTripRequest><itdItinerary><itdRouteList>{}</itdRouteList></itdItinerary></itdTripRequest></itdRequest>"#,
            routes.concat()
        )
    }

    fn two_leg_route() -> String {
        route(
            1,
            "00:50",
            &[
                partial_route(
                    [
                        point("departure", "Richmond", "1", &[(8, 5)]),
                        point("arrival", "Ringwood", "2", &[(8, 30)]),
                    ],
                    "Zug",
                    "Lilydale Line",
                    "Lilydale",
                ),
                partial_route(
                    [
                        point("departure", "Ringwood", "2", &[(8, 32)]),
                        point("arrival", "Ringwood Bus", "", &[(8, 36)]),
                    ],
                    FOOTPATH_PRODUCT,
                    "Footpath",
                    "",
                ),
            ],
        )
    }

    #[test]
    fn two_leg_journey() {
        let mut book = JourneyBook::new();
        let reply = book.parse(trip(&[two_leg_route()]).as_bytes(), &context());

        let list = &reply.value;
        assert_eq!(list.len(), 1);
        assert_eq!(list.departure_station, "Richmond");
        assert_eq!(list.arrival_station, "Lilydale");
        assert_eq!(list.time_info, "15.03.2024, 08:00");

        let summary = &list.journeys[0];
        assert_eq!(summary.id, "1");
        assert_eq!(summary.transfers, 1);
        assert_eq!(summary.duration, "00:50");
        assert_eq!(summary.train_type, "Lilydale Line, Walk");
        assert_eq!(summary.date, NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(summary.departure_time, NaiveTime::from_hms_opt(8, 5, 0));
        assert_eq!(summary.arrival_time, NaiveTime::from_hms_opt(8, 36, 0));

        let detail = book.detail("1").unwrap();
        assert_eq!(detail.duration, "00:50");
        assert_eq!(detail.departure, Some(at(8, 5)));
        assert_eq!(detail.arrival, Some(at(8, 36)));
        assert_eq!(detail.legs.len(), 2);

        let first = &detail.legs[0];
        assert_eq!(first.departure_station, "Richmond");
        assert_eq!(first.departure_info, "1");
        assert_eq!(first.arrival_station, "Ringwood");
        assert_eq!(first.arrival_info, "2");
        assert_eq!(first.departure, Some(at(8, 5)));
        assert_eq!(first.arrival, Some(at(8, 30)));
        assert_eq!(first.train, "Lilydale Line");
        assert_eq!(first.direction, "Lilydale");

        let walk = &detail.legs[1];
        assert_eq!(walk.train, WALK);
        assert_eq!(walk.departure_station, "Ringwood");
        assert_eq!(walk.arrival_station, "Ringwood Bus");
        assert!(reply.skipped_legs.is_empty());
    }

    #[test]
    fn route_without_legs_is_kept() {
        let empty = r#"<itdRoute changes="0" publicDuration="00:10"><itdPartialRouteList/></itdRoute>"#;
        let mut book = JourneyBook::new();
        let xml = trip(&[two_leg_route(), empty.to_string()]);
        let reply = book.parse(xml.as_bytes(), &context());

        assert_eq!(reply.value.len(), 2);
        assert_eq!(book.detail("1").unwrap().legs.len(), 2);

        let second = book.detail("2").unwrap();
        assert!(second.legs.is_empty());
        assert_eq!(second.departure, None);
        assert_eq!(reply.value.journeys[1].train_type, "");
        assert_eq!(reply.value.journeys[1].departure_time, None);
        assert!(reply.skipped_legs.is_empty());
    }

    #[test]
    fn summary_deduplicates_train_types() {
        let leg = |from: &str, to: &str, dep: (u32, u32), arr: (u32, u32), name: &str| {
            partial_route(
                [
                    point("departure", from, "", &[dep]),
                    point("arrival", to, "", &[arr]),
                ],
                "Bus",
                name,
                "",
            )
        };
        let xml = trip(&[route(
            2,
            "01:00",
            &[
                leg("A", "B", (9, 0), (9, 10), "Bus 901"),
                leg("B", "C", (9, 15), (9, 20), "Bus 902"),
                leg("C", "D", (9, 25), (9, 40), "Bus 901"),
            ],
        )]);
        let mut book = JourneyBook::new();
        let reply = book.parse(xml.as_bytes(), &context());
        assert_eq!(reply.value.journeys[0].train_type, "Bus 901, Bus 902");
        assert_eq!(book.detail("1").unwrap().legs.len(), 3);
    }

    #[test]
    fn missing_means_skips_leg_with_diagnostic() {
        let partial = format!(
            r#"<itdPartialRoute>{}{}</itdPartialRoute>"#,
            point("departure", "A", "1", &[(9, 0)]),
            point("arrival", "B", "2", &[(9, 10)])
        );
        let xml = trip(&[route(0, "00:10", &[partial])]);
        let mut book = JourneyBook::new();
        let reply = book.parse(xml.as_bytes(), &context());

        assert_eq!(reply.value.len(), 1);
        assert!(book.detail("1").unwrap().legs.is_empty());
        assert_eq!(
            reply.skipped_legs,
            vec![SkippedLeg {
                journey_id: "1".into(),
                pair: 0,
                departures: 1,
                arrivals: 1,
                stops: 2,
                means: 0,
                means_used: 0,
            }]
        );
        // overall times still come from the lists
        assert_eq!(
            reply.value.journeys[0].departure_time,
            NaiveTime::from_hms_opt(9, 0, 0)
        );
    }

    #[test]
    fn point_with_two_times_shifts_pairs() {
        // the boarding point carries two timestamps, so the stop list holds
        // three entries and the second pair has no arrival time
        let partial = partial_route(
            [
                point("departure", "A", "1", &[(9, 0), (9, 1)]),
                point("arrival", "B", "2", &[(9, 10)]),
            ],
            "Zug",
            "Line 1",
            "B",
        );
        let xml = trip(&[route(0, "00:10", &[partial])]);
        let mut book = JourneyBook::new();
        let reply = book.parse(xml.as_bytes(), &context());

        let detail = book.detail("1").unwrap();
        assert_eq!(detail.legs.len(), 1);
        assert_eq!(detail.legs[0].departure_station, "A");
        assert_eq!(detail.legs[0].arrival_station, "A");
        assert_eq!(reply.skipped_legs.len(), 1);
        assert_eq!(reply.skipped_legs[0].pair, 1);
    }

    #[test]
    fn pair_without_any_time_is_skipped_silently() {
        let blank = r#"<itdDateTime><itdDate year="-1" month="-1" day="-1"/><itdTime hour="-1" minute="-1"/></itdDateTime>"#;
        let partial = format!(
            r#"<itdPartialRoute><itdPoint usage="departure" name="A">{blank}</itdPoint><itdPoint usage="arrival" name="B">{blank}</itdPoint><itdMeansOfTransport name="Line 1"/></itdPartialRoute>"#
        );
        let xml = trip(&[route(0, "00:10", &[partial, two_leg_route_partial()])]);
        let mut book = JourneyBook::new();
        let reply = book.parse(xml.as_bytes(), &context());

        let detail = book.detail("1").unwrap();
        // the blank pair consumed no means, so the second pair gets "Line 1"
        assert_eq!(detail.legs.len(), 1);
        assert_eq!(detail.legs[0].train, "Line 1");
        assert_eq!(detail.legs[0].departure_station, "C");
        assert!(reply.skipped_legs.is_empty());
        // first departure is the blank one
        assert_eq!(detail.departure, None);
    }

    fn two_leg_route_partial() -> String {
        format!(
            r#"<itdPartialRoute>{}{}</itdPartialRoute>"#,
            point("departure", "C", "", &[(10, 0)]),
            point("arrival", "D", "", &[(10, 20)])
        )
    }

    #[test]
    fn points_outside_departure_and_arrival_are_ignored() {
        let partial = format!(
            r#"<itdPartialRoute>{}<itdPoint usage="via" name="X"><itdDateTime/></itdPoint>{}<itdMeansOfTransport name="Line 1"/></itdPartialRoute>"#,
            point("departure", "A", "", &[(9, 0)]),
            point("arrival", "B", "", &[(9, 10)])
        );
        let xml = trip(&[route(0, "00:10", &[partial])]);
        let mut book = JourneyBook::new();
        book.parse(xml.as_bytes(), &context());

        let legs = &book.detail("1").unwrap().legs;
        assert_eq!(legs.len(), 1);
        assert_eq!(legs[0].arrival_station, "B");
    }

    #[test]
    fn second_parse_evicts_first() {
        let mut book = JourneyBook::new();
        book.parse(
            trip(&[two_leg_route(), two_leg_route(), two_leg_route()]).as_bytes(),
            &context(),
        );
        assert_eq!(book.len(), 3);

        book.parse(trip(&[two_leg_route()]).as_bytes(), &context());
        assert_eq!(book.len(), 1);
        assert!(book.detail("1").is_some());
        assert!(book.detail("2").is_none());
        assert!(book.detail("3").is_none());
    }

    #[test]
    fn bounds_follow_result_set() {
        let later = route(
            0,
            "00:20",
            &[partial_route(
                [
                    point("departure", "Richmond", "1", &[(9, 0)]),
                    point("arrival", "Lilydale", "1", &[(9, 20)]),
                ],
                "Zug",
                "Lilydale Line",
                "Lilydale",
            )],
        );
        let mut book = JourneyBook::new();
        book.parse(trip(&[two_leg_route(), later]).as_bytes(), &context());

        let bounds = book.bounds();
        // earliest arrival 08:36, latest departure 09:00
        assert_eq!(bounds.earliest_arrival(), Some(at(8, 35)));
        assert_eq!(bounds.latest_departure(), Some(at(9, 1)));

        book.parse(trip(&[]).as_bytes(), &context());
        assert!(book.bounds().is_unset());
        assert!(book.is_empty());
    }

    #[test]
    fn via_and_errors_carried() {
        let xml = format!(
            r#"<itdRequest version="10.1">{}<itdMessage type="error" code="-9999">no route</itdMessage></itdRequest>"#,
            two_leg_route()
        );
        let context = JourneyContext {
            via_station: "Box Hill".into(),
            ..context()
        };
        let mut book = JourneyBook::new();
        let reply = book.parse(xml.as_bytes(), &context);

        assert_eq!(reply.value.via_station, "Box Hill");
        assert_eq!(book.detail("1").unwrap().via_station, "Box Hill");
        assert_eq!(reply.notifications.len(), 1);
        assert_eq!(reply.notifications[0].text, "no route");
    }

    #[test]
    fn garbage_gives_empty_list_with_context() {
        let mut book = JourneyBook::new();
        let reply = book.parse(b"\x00\x01 not xml", &context());
        assert!(reply.value.is_empty());
        assert_eq!(reply.value.departure_station, "Richmond");
        assert!(book.bounds().is_unset());
    }
}
