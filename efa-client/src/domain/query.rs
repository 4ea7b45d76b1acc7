//! Parameters of timetable and journey requests.

use std::fmt;

use chrono::NaiveDateTime;

use super::{Mode, Station};

/// Restriction of a journey search to one family of transport.
///
/// EFA numbers its means of transport (`MOT`); each restriction maps to the
/// codes it admits. `All` applies no filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransportRestriction {
    #[default]
    All,
    MetroTrain,
    MetroTram,
    MetroBus,
    RegionalTrain,
    RegionalCoach,
    Airport,
}

impl TransportRestriction {
    /// Every restriction, in display order.
    pub const ALL: [TransportRestriction; 7] = [
        TransportRestriction::All,
        TransportRestriction::MetroTrain,
        TransportRestriction::MetroTram,
        TransportRestriction::MetroBus,
        TransportRestriction::RegionalTrain,
        TransportRestriction::RegionalCoach,
        TransportRestriction::Airport,
    ];

    /// EFA means-of-transport codes admitted by this restriction.
    ///
    /// Empty for `All`, which sends no `inclMOT_*` flags at all.
    pub fn means_of_transport(&self) -> &'static [u8] {
        match self {
            TransportRestriction::All => &[],
            TransportRestriction::MetroTrain => &[1, 2],
            TransportRestriction::MetroTram => &[3, 4],
            TransportRestriction::MetroBus => &[5],
            TransportRestriction::RegionalTrain => &[0],
            TransportRestriction::RegionalCoach => &[6],
            TransportRestriction::Airport => &[7],
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            TransportRestriction::All => "All",
            TransportRestriction::MetroTrain => "Metro Train",
            TransportRestriction::MetroTram => "Metro Tram",
            TransportRestriction::MetroBus => "Metro Bus",
            TransportRestriction::RegionalTrain => "Regional Train",
            TransportRestriction::RegionalCoach => "Regional Coach",
            TransportRestriction::Airport => "Airport(SKYBUS)",
        }
    }

    /// Parse a restriction from its snake-case name (`metro_tram`, ...).
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.key() == s)
    }

    /// Snake-case name, as accepted by [`TransportRestriction::parse`].
    pub fn key(&self) -> &'static str {
        match self {
            TransportRestriction::All => "all",
            TransportRestriction::MetroTrain => "metro_train",
            TransportRestriction::MetroTram => "metro_tram",
            TransportRestriction::MetroBus => "metro_bus",
            TransportRestriction::RegionalTrain => "regional_train",
            TransportRestriction::RegionalCoach => "regional_coach",
            TransportRestriction::Airport => "airport",
        }
    }
}

impl fmt::Display for TransportRestriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parameters of a departure monitor request.
#[derive(Debug, Clone, PartialEq)]
pub struct TimetableParameters {
    /// Station to show departures for (may be unresolved)
    pub station: Station,
    /// Requested time
    pub date_time: NaiveDateTime,
    /// Whether `date_time` is a departure or arrival time
    pub mode: Mode,
}

impl TimetableParameters {
    /// Create timetable parameters.
    pub fn new(station: Station, date_time: NaiveDateTime, mode: Mode) -> Self {
        Self {
            station,
            date_time,
            mode,
        }
    }
}

/// Parameters of a trip request.
#[derive(Debug, Clone, PartialEq)]
pub struct JourneyParameters {
    /// Origin (may be unresolved)
    pub departure: Station,
    /// Optional via station (may be unresolved)
    pub via: Option<Station>,
    /// Destination (may be unresolved)
    pub arrival: Station,
    /// Requested time
    pub date_time: NaiveDateTime,
    /// Whether `date_time` is a departure or arrival time
    pub mode: Mode,
    /// Transport restriction
    pub restriction: TransportRestriction,
}

impl JourneyParameters {
    /// Create journey parameters without a via station or restriction.
    pub fn new(departure: Station, arrival: Station, date_time: NaiveDateTime, mode: Mode) -> Self {
        Self {
            departure,
            via: None,
            arrival,
            date_time,
            mode,
            restriction: TransportRestriction::All,
        }
    }

    /// Route via a station.
    pub fn with_via(mut self, via: Station) -> Self {
        self.via = Some(via);
        self
    }

    /// Restrict the means of transport.
    pub fn with_restriction(mut self, restriction: TransportRestriction) -> Self {
        self.restriction = restriction;
        self
    }

    /// Name of the via station, empty when there is none.
    pub fn via_name(&self) -> &str {
        self.via.as_ref().map(|s| s.name.as_str()).unwrap_or("")
    }

    /// The first station (origin, via, destination order) lacking an id.
    pub fn first_unresolved(&self) -> Option<&Station> {
        self.stations().find(|s| !s.is_resolved())
    }

    /// Replace the first unresolved station with `station`.
    ///
    /// Returns false if every station was already resolved.
    pub fn resolve_next(&mut self, station: Station) -> bool {
        let slot = if !self.departure.is_resolved() {
            &mut self.departure
        } else if let Some(via) = self.via.as_mut().filter(|v| !v.is_resolved()) {
            via
        } else if !self.arrival.is_resolved() {
            &mut self.arrival
        } else {
            return false;
        };
        *slot = station;
        true
    }

    fn stations(&self) -> impl Iterator<Item = &Station> {
        std::iter::once(&self.departure)
            .chain(self.via.as_ref())
            .chain(std::iter::once(&self.arrival))
    }
}
