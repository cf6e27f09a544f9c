//! Configuration shared by the windshield plugin crates.
//!
//! The plugin runs inside the simulator process, so configuration comes from
//! a TOML file beside the plugin and a couple of environment variables rather
//! than from command-line flags. Every field has a default, which means an
//! absent or empty file reproduces the stock behaviour: poll every three
//! seconds, slow to every thirty once the Zibo 737 is loaded, and hold the
//! tuned rain profile.

mod defaults;
mod error;
mod loader;
mod logging;
mod profile;
mod schedule;

use serde::{Deserialize, Serialize};

pub use defaults::{
    CONFIG_FILE_NAME, CONFIG_PATH_ENV, DEFAULT_AIRCRAFT_MARKER, DEFAULT_FREEZING_THRESHOLD_C,
    DEFAULT_LOADED_INTERVAL_FACTOR, DEFAULT_LOG_FILTER, DEFAULT_MAX_WINDOW_ICE,
    DEFAULT_POLL_INTERVAL, DEFAULT_RAIN_TOLERANCE, LOG_FILTER_ENV, default_aircraft_markers,
    default_log_filter_string, default_log_format,
};
pub use error::ConfigError;
pub use loader::{ConfigLoader, FileConfigLoader, StaticConfigLoader};
pub use logging::LogFormat;
pub use profile::{IceSettings, RainProfile, RainSettings};
pub use schedule::Schedule;

/// Resolved plugin configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// `tracing` filter directive.
    pub log_filter: String,
    /// Output format of log lines.
    pub log_format: LogFormat,
    /// Raw flight-loop interval while the aircraft is absent.
    pub poll_interval: f32,
    /// Multiplier applied to the poll interval while the aircraft is loaded.
    pub loaded_interval_factor: f32,
    /// Substrings of the aircraft path that identify the target model.
    pub aircraft_markers: Vec<String>,
    /// Rain shader adjustment.
    pub rain: RainSettings,
    /// Windshield ice adjustment.
    pub ice: IceSettings,
    /// Write the simulator's stock rain values when the aircraft goes away.
    pub restore_on_unload: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            loaded_interval_factor: DEFAULT_LOADED_INTERVAL_FACTOR,
            aircraft_markers: default_aircraft_markers(),
            rain: RainSettings::default(),
            ice: IceSettings::default(),
            restore_on_unload: true,
        }
    }
}

impl Config {
    /// Interval used while the aircraft is absent.
    #[must_use]
    pub fn base_schedule(&self) -> Schedule {
        Schedule::from_raw(self.poll_interval)
    }

    /// Interval used while the aircraft is loaded.
    #[must_use]
    pub fn loaded_schedule(&self) -> Schedule {
        self.base_schedule().scaled(self.loaded_interval_factor)
    }

    /// Checks value ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.poll_interval.is_finite() {
            return Err(ConfigError::invalid("poll_interval", "must be finite"));
        }
        if !self.loaded_interval_factor.is_finite() || self.loaded_interval_factor <= 0.0 {
            return Err(ConfigError::invalid(
                "loaded_interval_factor",
                format!("must be positive, got {}", self.loaded_interval_factor),
            ));
        }
        let loaded = self.loaded_schedule();
        if !loaded.as_raw().is_finite() {
            return Err(ConfigError::invalid(
                "loaded_interval_factor",
                format!(
                    "scaling poll_interval {} by {} overflows",
                    self.poll_interval, self.loaded_interval_factor
                ),
            ));
        }
        if !(self.rain.tolerance > 0.0 && self.rain.tolerance < 1.0) {
            return Err(ConfigError::invalid(
                "rain.tolerance",
                format!("must lie in (0, 1), got {}", self.rain.tolerance),
            ));
        }
        if self.aircraft_markers.iter().all(|marker| marker.is_empty()) {
            return Err(ConfigError::invalid(
                "aircraft_markers",
                "at least one non-empty marker is required",
            ));
        }
        if !(0.0..=1.0).contains(&self.ice.max_window_ice) {
            return Err(ConfigError::invalid(
                "ice.max_window_ice",
                format!("must lie in [0, 1], got {}", self.ice.max_window_ice),
            ));
        }
        Ok(())
    }
}
