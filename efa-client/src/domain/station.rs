//! Station types.

/// A stop or station as issued by the EFA server.
///
/// The identifier is an opaque token (often numeric, sometimes a global id
/// such as `de:09761:101`). Composite `"id:name"` values split on the first
/// colon, so a global id does not survive [`Station::from_composite`]; it
/// comes back as `de`. A station without an identifier is *unresolved*:
/// it carries only a name typed by the user, which must be looked up with a
/// stop-finder request before it can be used in a timetable or trip query.
///
/// # Examples
///
/// ```
/// use efa_client::domain::Station;
///
/// let station = Station::from_composite("1000001:Flinders Street");
/// assert_eq!(station.id, "1000001");
/// assert_eq!(station.name, "Flinders Street");
/// assert!(station.is_resolved());
///
/// assert!(!Station::named("Flinders").is_resolved());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Station {
    /// Server-issued identifier (empty when unresolved)
    pub id: String,
    /// Display name
    pub name: String,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Category tag, e.g. `STATION` or a stop-mode code
    pub kind: Option<String>,
    /// Free-text extra information, e.g. a distance
    pub misc_info: Option<String>,
}

impl Station {
    /// Create a station with an identifier and name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Create an unresolved station known only by name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Build a station from a composite `id:name` value.
    ///
    /// Everything before the first colon is the identifier; everything after
    /// it (further colons included) is the name. A value without a colon is
    /// all identifier.
    pub fn from_composite(value: &str) -> Self {
        match value.split_once(':') {
            Some((id, name)) => Self::new(id, name),
            None => Self::new(value, ""),
        }
    }

    /// Returns true if the station carries a server identifier.
    pub fn is_resolved(&self) -> bool {
        !self.id.is_empty()
    }

    /// Set the coordinates.
    pub fn with_position(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_splits_on_first_colon() {
        let station = Station::from_composite("10001:Central: Platform 1");
        assert_eq!(station.id, "10001");
        assert_eq!(station.name, "Central: Platform 1");
    }

    #[test]
    fn composite_truncates_global_id() {
        let station = Station::from_composite("de:09761:101:Augsburg Hbf");
        assert_eq!(station.id, "de");
        assert_eq!(station.name, "09761:101:Augsburg Hbf");
    }

    #[test]
    fn composite_without_colon_is_all_id() {
        let station = Station::from_composite("10001");
        assert_eq!(station.id, "10001");
        assert_eq!(station.name, "");
    }

    #[test]
    fn composite_with_leading_colon_has_empty_id() {
        let station = Station::from_composite(":Nowhere");
        assert_eq!(station.id, "");
        assert_eq!(station.name, "Nowhere");
        assert!(!station.is_resolved());
    }

    #[test]
    fn named_is_unresolved() {
        let station = Station::named("Southern Cross");
        assert!(!station.is_resolved());
        assert_eq!(station.name, "Southern Cross");
        assert!(station.kind.is_none());
    }

    #[test]
    fn with_position() {
        let station = Station::new("1", "A").with_position(-37.8, 144.9);
        assert_eq!(station.latitude, -37.8);
        assert_eq!(station.longitude, 144.9);
    }
}
