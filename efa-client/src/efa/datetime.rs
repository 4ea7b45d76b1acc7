//! `itdDateTime` extraction.
//!
//! EFA encodes timestamps as an element with `itdDate` (`year`, `month`,
//! `day`) and `itdTime` (`hour`, `minute`) children. Seconds are always zero.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::xml::Element;

/// Extract the timestamp from an `itdDateTime` element.
///
/// Absent or non-numeric fields read as zero, as the server omits them for
/// unknown times. Returns `None` when the fields do not form a real calendar
/// date and time, which is what such zeroes (and EFA's `-1` placeholders)
/// produce.
///
/// # Examples
///
/// ```
/// use efa_client::efa::parse_itd_date_time;
/// use efa_client::xml::Document;
///
/// let doc = Document::parse(
///     br#"<itdDateTime><itdDate year="2024" month="3" day="15"/><itdTime hour="9" minute="41"/></itdDateTime>"#,
/// );
/// let dt = parse_itd_date_time(doc.root().unwrap()).unwrap();
/// assert_eq!(dt.to_string(), "2024-03-15 09:41:00");
/// ```
pub fn parse_itd_date_time(element: &Element) -> Option<NaiveDateTime> {
    let field = |child: &str, key: &str| {
        element
            .first_child(child)
            .map(|c| c.int_attr(key))
            .unwrap_or(0)
    };

    let date = NaiveDate::from_ymd_opt(
        field("itdDate", "year"),
        u32::try_from(field("itdDate", "month")).ok()?,
        u32::try_from(field("itdDate", "day")).ok()?,
    )?;
    let time = NaiveTime::from_hms_opt(
        u32::try_from(field("itdTime", "hour")).ok()?,
        u32::try_from(field("itdTime", "minute")).ok()?,
        0,
    )?;
    Some(date.and_time(time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::Document;

    fn parse(xml: &str) -> Option<NaiveDateTime> {
        let doc = Document::parse(xml.as_bytes());
        parse_itd_date_time(doc.root().unwrap())
    }

    #[test]
    fn full_date_time() {
        let dt = parse(
            r#"<itdDateTime><itdDate year="2013" month="9" day="26" weekday="5"/><itdTime hour="23" minute="5"/></itdDateTime>"#,
        )
        .unwrap();
        assert_eq!(
            dt,
            NaiveDate::from_ymd_opt(2013, 9, 26)
                .unwrap()
                .and_hms_opt(23, 5, 0)
                .unwrap()
        );
    }

    #[test]
    fn missing_time_is_midnight() {
        let dt = parse(r#"<itdDateTime><itdDate year="2024" month="2" day="29"/></itdDateTime>"#)
            .unwrap();
        assert_eq!(dt.to_string(), "2024-02-29 00:00:00");
    }

    #[test]
    fn missing_date_is_none() {
        assert!(parse(r#"<itdDateTime><itdTime hour="9" minute="0"/></itdDateTime>"#).is_none());
    }

    #[test]
    fn placeholder_values_are_none() {
        assert!(
            parse(
                r#"<itdDateTime><itdDate year="-1" month="-1" day="-1"/><itdTime hour="-1" minute="-1"/></itdDateTime>"#
            )
            .is_none()
        );
    }

    #[test]
    fn non_numeric_fields_read_as_zero() {
        // minute "xx" becomes 0
        let dt = parse(
            r#"<itdDateTime><itdDate year="2024" month="1" day="1"/><itdTime hour="7" minute="xx"/></itdDateTime>"#,
        )
        .unwrap();
        assert_eq!(dt.to_string(), "2024-01-01 07:00:00");
    }

    #[test]
    fn impossible_date_is_none() {
        assert!(
            parse(r#"<itdDateTime><itdDate year="2023" month="2" day="30"/></itdDateTime>"#)
                .is_none()
        );
    }
}
