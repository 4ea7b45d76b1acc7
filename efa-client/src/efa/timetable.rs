//! Departure monitor (`XML_DM_REQUEST`) responses.

use chrono::NaiveDateTime;
use tracing::debug;

use crate::domain::{RealtimeStatus, TimetableEntry};
use crate::xml::{Document, Element};

use super::datetime::parse_itd_date_time;
use super::messages::scan_messages;
use super::reply::Reply;

/// Parse a departure monitor response into timetable entries.
///
/// Entries come from `itdDeparture` elements, or from bare `itdDateTime`
/// elements when the response holds no departures. An entry with a
/// `countdown` attribute gets a real-time status, measured against the
/// request time the server echoes back.
pub fn parse_timetable(data: &[u8]) -> Reply<Vec<TimetableEntry>> {
    let doc = Document::parse(data);
    let reference = reference_time(&doc);

    let mut nodes = doc.elements_by_tag_name("itdDeparture");
    if nodes.is_empty() {
        nodes = doc.elements_by_tag_name("itdDateTime");
    }

    let entries: Vec<TimetableEntry> = nodes
        .into_iter()
        .map(|node| entry(node, reference))
        .collect();

    debug!(count = entries.len(), ?reference, "parsed timetable");
    Reply::with_notifications(entries, scan_messages(&doc))
}

fn reference_time(doc: &Document) -> Option<NaiveDateTime> {
    doc.root()
        .filter(|root| root.name() == "itdRequest")
        .and_then(|root| root.first_child("itdDepartureMonitorRequest"))
        .and_then(|request| request.first_child("itdDateTime"))
        .and_then(parse_itd_date_time)
}

fn entry(node: &Element, reference: Option<NaiveDateTime>) -> TimetableEntry {
    let serving_line = node.first_child("itdServingLine");
    let line_attr = |key: &str| {
        serving_line
            .map(|line| line.attr_or_empty(key).to_string())
            .unwrap_or_default()
    };

    let scheduled = node
        .first_child("itdDateTime")
        .and_then(parse_itd_date_time);

    let status = node
        .attr("countdown")
        .filter(|c| !c.is_empty())
        .and_then(|countdown| {
            let countdown: i64 = countdown.trim().parse().unwrap_or(0);
            Some(realtime_status(countdown, scheduled?, reference?))
        });

    TimetableEntry {
        platform: node.attr_or_empty("platformName").to_string(),
        destination: line_attr("direction"),
        train_type: line_attr("motType"),
        time: scheduled.map(|dt| dt.time()),
        status,
    }
}

/// Status from a real-time countdown.
///
/// The countdown is the number of minutes from the request time until the
/// vehicle actually leaves; lateness is that minus the scheduled gap.
fn realtime_status(
    countdown: i64,
    scheduled: NaiveDateTime,
    reference: NaiveDateTime,
) -> RealtimeStatus {
    let seconds = (scheduled - reference).num_seconds();
    let scheduled_countdown = (seconds as f64 / 60.0).round() as i64;
    RealtimeStatus::from_lateness(countdown - scheduled_countdown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn departure(platform: &str, countdown: Option<i32>, hour: u32, minute: u32) -> String {
        let countdown = countdown
            .map(|c| format!(r#" countdown="{c}""#))
            .unwrap_or_default();
        format!(
            r#"<itdDeparture stopID="19842" platformName="{platform}"{countdown}>
                <itdDateTime><itdDate year="2024" month="3" day="15"/><itdTime hour="{hour}" minute="{minute}"/></itdDateTime>
                <itdServingLine direction="Flinders Street" motType="0" number="Lilydale"/>
            </itdDeparture>"#
        )
    }

    fn monitor(departures: &[String], messages: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<itdRequest version="9.20.37.59">
  <itdDepartureMonitorRequest requestID="1">
    <itdDateTime><itdDate year="2024" month="3" day="15"/><itdTime hour="8" minute="0"/></itdDateTime>
    <itdDepartureList>{}</itdDepartureList>
  </itdDepartureMonitorRequest>
  {messages}
</itdRequest>"#,
            departures.concat()
        )
    }

    #[test]
    fn early_running_is_on_time() {
        // scheduled 10 minutes after the reference, countdown 5
        let xml = monitor(&[departure("1", Some(5), 8, 10)], "");
        let entries = parse_timetable(xml.as_bytes()).value;
        assert_eq!(entries[0].status, Some(RealtimeStatus::OnTime));
        assert_eq!(entries[0].misc_info(), "on time");
    }

    #[test]
    fn ten_minutes_late() {
        let xml = monitor(&[departure("1", Some(20), 8, 10)], "");
        let entries = parse_timetable(xml.as_bytes()).value;
        assert_eq!(entries[0].status, Some(RealtimeStatus::Late { minutes: 10 }));
        assert_eq!(entries[0].misc_info(), "10 min late");
    }

    #[test]
    fn three_minutes_is_still_on_time() {
        let xml = monitor(&[departure("1", Some(13), 8, 10)], "");
        let entries = parse_timetable(xml.as_bytes()).value;
        assert_eq!(entries[0].status, Some(RealtimeStatus::OnTime));
    }

    #[test]
    fn entry_fields() {
        let xml = monitor(
            &[departure("2", None, 8, 5), departure("3", Some(12), 8, 7)],
            "",
        );
        let reply = parse_timetable(xml.as_bytes());
        assert!(!reply.has_errors());
        let entries = reply.value;

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].platform, "2");
        assert_eq!(entries[0].destination, "Flinders Street");
        assert_eq!(entries[0].train_type, "0");
        assert_eq!(entries[0].time, NaiveTime::from_hms_opt(8, 5, 0));
        assert_eq!(entries[0].status, None);
        assert_eq!(entries[0].misc_info(), "");
        // 12 - 7 = 5
        assert_eq!(entries[1].status, Some(RealtimeStatus::Late { minutes: 5 }));
    }

    #[test]
    fn falls_back_to_bare_date_times() {
        let xml = r#"<itdRequest version="10.1">
  <itdDepartureMonitorRequest>
    <itdDateTime><itdDate year="2024" month="3" day="15"/><itdTime hour="8" minute="0"/></itdDateTime>
  </itdDepartureMonitorRequest>
  <itdMessage type="error" module="BROKER" code="-4050">no serving lines found</itdMessage>
</itdRequest>"#;
        let reply = parse_timetable(xml.as_bytes());

        // the reference itdDateTime itself becomes an entry
        assert_eq!(reply.value.len(), 1);
        assert_eq!(reply.value[0].platform, "");
        assert_eq!(reply.value[0].time, None);
        assert_eq!(reply.notifications.len(), 1);
        assert_eq!(reply.notifications[0].text, "no serving lines found");
    }

    #[test]
    fn missing_reference_leaves_status_unset() {
        let xml = format!(
            r#"<itdRequest version="10.1"><itdDepartureList>{}</itdDepartureList></itdRequest>"#,
            departure("1", Some(20), 8, 10)
        );
        let entries = parse_timetable(xml.as_bytes()).value;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].status, None);
        assert_eq!(entries[0].time, NaiveTime::from_hms_opt(8, 10, 0));
    }

    #[test]
    fn scheduled_gap_rounds_to_nearest_minute() {
        let reference = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        let date = chrono::NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let reference = date.and_time(reference);
        let scheduled = reference + chrono::Duration::seconds(9 * 60 + 30);

        // 9.5 rounds to 10, so countdown 14 is 4 late
        assert_eq!(
            realtime_status(14, scheduled, reference),
            RealtimeStatus::Late { minutes: 4 }
        );
    }

    #[test]
    fn crosses_midnight() {
        let xml = r#"<itdRequest version="9.1">
  <itdDepartureMonitorRequest>
    <itdDateTime><itdDate year="2024" month="3" day="15"/><itdTime hour="23" minute="55"/></itdDateTime>
  </itdDepartureMonitorRequest>
  <itdDeparture platformName="1" countdown="15">
    <itdDateTime><itdDate year="2024" month="3" day="16"/><itdTime hour="0" minute="5"/></itdDateTime>
  </itdDeparture>
</itdRequest>"#;
        let entries = parse_timetable(xml.as_bytes()).value;
        assert_eq!(entries[0].status, Some(RealtimeStatus::Late { minutes: 5 }));
    }
}
