//! Recognises the target aircraft from its file path.

use crate::host::{HostError, SimHost};

/// Matches the user's aircraft path against configured fragments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AircraftDetector {
    markers: Vec<String>,
}

impl AircraftDetector {
    /// Builds a detector; empty markers are ignored.
    #[must_use]
    pub fn new(markers: Vec<String>) -> Self {
        Self {
            markers: markers
                .into_iter()
                .filter(|marker| !marker.is_empty())
                .collect(),
        }
    }

    /// Returns `true` when any marker occurs in `path` (case-sensitive).
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.markers.iter().any(|marker| path.contains(marker.as_str()))
    }

    /// Asks the host whether the target aircraft is the user's aircraft.
    ///
    /// An absent aircraft is simply "not loaded"; other host errors are
    /// logged first.
    pub fn detect<H>(&self, host: &H) -> bool
    where
        H: SimHost + ?Sized,
    {
        match host.user_aircraft_path() {
            Ok(path) => self.matches(&path),
            Err(HostError::NoAircraft) => false,
            Err(error) => {
                tracing::warn!(
                    target: "windshield::detector",
                    error = %error,
                    "failed to query user aircraft"
                );
                false
            }
        }
    }
}
