//! Request time handling.
//!
//! EFA queries are anchored on a local date and time that is either the
//! desired departure or the desired arrival.

use std::fmt;

use chrono::NaiveDateTime;

/// Whether a requested time is a departure or an arrival time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Leave at or after the requested time
    #[default]
    Departure,
    /// Arrive at or before the requested time
    Arrival,
}

impl Mode {
    /// The value EFA expects in `itdTripDateTimeDepArr`.
    pub fn as_efa(&self) -> &'static str {
        match self {
            Mode::Departure => "dep",
            Mode::Arrival => "arr",
        }
    }

    /// Parse `dep`/`arr` (and the long forms) case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dep" | "departure" => Some(Mode::Departure),
            "arr" | "arrival" => Some(Mode::Arrival),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_efa())
    }
}

/// Label shown with a journey result list: `"<date>, <time>"`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use efa_client::domain::time_info;
///
/// let dt = NaiveDate::from_ymd_opt(2024, 3, 15)
///     .unwrap()
///     .and_hms_opt(9, 5, 0)
///     .unwrap();
/// assert_eq!(time_info(dt), "15.03.2024, 09:05");
/// ```
pub fn time_info(date_time: NaiveDateTime) -> String {
    format!(
        "{}, {}",
        date_time.format("%d.%m.%Y"),
        date_time.format("%H:%M")
    )
}
