use crate::logging::LogFormat;

/// File name looked up beside the plugin binary.
pub const CONFIG_FILE_NAME: &str = "windshield.toml";

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "WINDSHIELD_CONFIG_PATH";

/// Environment variable overriding the configured log filter.
pub const LOG_FILTER_ENV: &str = "WINDSHIELD_LOG_FILTER";

/// Default log filter expression.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Flight-loop interval used while the target aircraft is not loaded.
///
/// Positive values are seconds, negative values are frames, zero disables
/// the loop.
pub const DEFAULT_POLL_INTERVAL: f32 = 3.0;

/// Multiplier applied to the poll interval once the aircraft is loaded.
pub const DEFAULT_LOADED_INTERVAL_FACTOR: f32 = 10.0;

/// Path fragment identifying the Zibo 737-800 model.
pub const DEFAULT_AIRCRAFT_MARKER: &str = "B737-800X";

/// Relative tolerance used when comparing the live rain force factor.
pub const DEFAULT_RAIN_TOLERANCE: f32 = 0.2;

/// Ambient temperature at or below which the ice regime applies.
pub const DEFAULT_FREEZING_THRESHOLD_C: f32 = 0.0;

/// Highest window ice ratio tolerated while window heat is on.
pub const DEFAULT_MAX_WINDOW_ICE: f32 = 0.0;

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Default aircraft markers.
#[must_use]
pub fn default_aircraft_markers() -> Vec<String> {
    vec![DEFAULT_AIRCRAFT_MARKER.to_owned()]
}
