//! Core logic for the Zibo 737 windshield plugin.
//!
//! The simulator calls back into the plugin on a flight loop. Each call
//! checks whether the Zibo B737-800X is the user aircraft and, when it is,
//! keeps the windshield effects in step with the weather:
//!
//! - In rain the simulator's stock rain shader values are replaced with a
//!   profile tuned for the Zibo glass. The simulator occasionally resets them
//!   (weather changes, situation loads), so each tick compares the live values
//!   against the profile and rewrites them when they have drifted.
//! - In freezing air with window heat on, accumulated windshield ice is held
//!   at or below a configured ceiling.
//!
//! Polling is frequent while the aircraft is absent and slows once it has
//! been found. Everything here talks to the simulator through the
//! [`SimHost`] and [`LoopScheduler`] traits, so the whole plugin runs
//! against in-memory doubles in tests; the FFI bindings live in a separate
//! crate.

pub mod datarefs;
pub mod detector;
pub mod flight_loop;
pub mod host;
pub mod lifecycle;
pub mod regime;
pub mod reporter;
pub mod telemetry;

pub use datarefs::{IceDatarefs, RainDatarefs, WriteReport};
pub use detector::AircraftDetector;
pub use flight_loop::{FlightLoop, TickOutcome};
pub use host::{Dataref, DatarefHandle, HostError, SimHost};
pub use lifecycle::{
    LoopScheduler, PLUGIN_DESCRIPTION, PLUGIN_NAME, PLUGIN_SIGNATURE, Plugin, PluginInfo,
    SchedulerError, StartError,
};
pub use regime::Regime;
pub use reporter::{LifecycleReporter, StructuredLifecycleReporter};
pub use telemetry::{LogSink, SinkLine, SinkWriter, TelemetryError, TelemetryHandle};

#[cfg(test)]
mod tests;
