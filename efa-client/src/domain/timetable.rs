//! Departure monitor entries.

use std::fmt;

use chrono::NaiveTime;

/// Real-time running status of a departure.
///
/// Derived from the server's countdown: anything more than
/// [`RealtimeStatus::LATE_THRESHOLD_MINS`] minutes behind schedule is late.
/// Early running is reported as on time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RealtimeStatus {
    /// Within the lateness threshold (or early)
    OnTime,
    /// Running late by this many minutes
    Late { minutes: i64 },
}

impl RealtimeStatus {
    /// Lateness above this many minutes counts as late.
    pub const LATE_THRESHOLD_MINS: i64 = 3;

    /// Classify a lateness in minutes (negative means early).
    ///
    /// # Examples
    ///
    /// ```
    /// use efa_client::domain::RealtimeStatus;
    ///
    /// assert_eq!(RealtimeStatus::from_lateness(3), RealtimeStatus::OnTime);
    /// assert_eq!(RealtimeStatus::from_lateness(-5), RealtimeStatus::OnTime);
    /// assert_eq!(
    ///     RealtimeStatus::from_lateness(4),
    ///     RealtimeStatus::Late { minutes: 4 }
    /// );
    /// ```
    pub fn from_lateness(minutes: i64) -> Self {
        if minutes > Self::LATE_THRESHOLD_MINS {
            RealtimeStatus::Late { minutes }
        } else {
            RealtimeStatus::OnTime
        }
    }

    /// Returns true if running late.
    pub fn is_late(&self) -> bool {
        matches!(self, RealtimeStatus::Late { .. })
    }
}

impl fmt::Display for RealtimeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RealtimeStatus::OnTime => f.write_str("on time"),
            RealtimeStatus::Late { minutes } => write!(f, "{minutes} min late"),
        }
    }
}

/// One row of a departure monitor.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimetableEntry {
    /// Platform label
    pub platform: String,
    /// Destination shown on the vehicle
    pub destination: String,
    /// Means-of-transport type tag
    pub train_type: String,
    /// Scheduled time of day, if the server gave a valid one
    pub time: Option<NaiveTime>,
    /// Real-time status, present only when the server sent a countdown
    pub status: Option<RealtimeStatus>,
}

impl TimetableEntry {
    /// Status annotation text, empty when there is no real-time data.
    pub fn misc_info(&self) -> String {
        self.status.map(|s| s.to_string()).unwrap_or_default()
    }
}
