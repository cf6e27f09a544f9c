//! Plugin lifecycle mirroring the host's start, enable, disable and stop hooks.
//!
//! The host calls the four hooks in order, possibly cycling enable and
//! disable several times in between. [`Plugin`] keeps the flight loop in step
//! with those calls through a [`LoopScheduler`], so the whole lifecycle can
//! be exercised without a running simulator.

use std::sync::Arc;

use thiserror::Error;
use tracing_subscriber::fmt::MakeWriter;
use windshield_config::{Config, ConfigError, ConfigLoader, Schedule};

use crate::flight_loop::FlightLoop;
use crate::host::SimHost;
use crate::reporter::LifecycleReporter;
use crate::telemetry::{self, TelemetryError};

/// Name reported to the host's plugin manager.
pub const PLUGIN_NAME: &str = "ZiboWindshield";

/// Unique plugin signature.
pub const PLUGIN_SIGNATURE: &str = "windshield.zibowindshield";

/// Description reported to the host's plugin manager.
pub const PLUGIN_DESCRIPTION: &str = "Adjusts rain and ice depiction on the Zibo 737 windshield";

/// Identification strings handed back from the start hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginInfo {
    /// Display name, including the version.
    pub name: String,
    /// Unique signature.
    pub signature: &'static str,
    /// One-line description.
    pub description: &'static str,
}

impl PluginInfo {
    /// Identification for this build.
    #[must_use]
    pub fn current() -> Self {
        Self {
            name: format!("{PLUGIN_NAME} - v{}", env!("CARGO_PKG_VERSION")),
            signature: PLUGIN_SIGNATURE,
            description: PLUGIN_DESCRIPTION,
        }
    }
}

/// Errors surfaced by the start hook.
#[derive(Debug, Error)]
pub enum StartError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Configuration {
        /// Underlying loader error.
        #[source]
        source: ConfigError,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
}

/// The host refused to create the flight loop.
#[derive(Debug, Error)]
#[error("failed to create flight loop: {message}")]
pub struct SchedulerError {
    /// Host-supplied description.
    pub message: String,
}

/// Trait abstracting the host's flight-loop registry for testability.
pub trait LoopScheduler {
    /// Registers the flight-loop callback without scheduling it.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError`] when the host refuses the registration.
    fn create(&mut self) -> Result<(), SchedulerError>;

    /// Arms the registered callback, relative to now.
    fn schedule(&mut self, interval: Schedule);

    /// Unregisters the callback.
    fn destroy(&mut self);
}

/// A started plugin instance.
pub struct Plugin {
    info: PluginInfo,
    config: Config,
    flight_loop: FlightLoop,
    reporter: Arc<dyn LifecycleReporter>,
    loop_created: bool,
    enabled: bool,
}

impl Plugin {
    /// Loads configuration, initialises telemetry, and builds the flight loop.
    ///
    /// # Errors
    ///
    /// Returns [`StartError`] when configuration or telemetry fail; the
    /// reporter is told before the error is returned.
    pub fn start<W>(
        loader: &dyn ConfigLoader,
        reporter: Arc<dyn LifecycleReporter>,
        writer: W,
    ) -> Result<Self, StartError>
    where
        W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
    {
        let config = match loader.load() {
            Ok(config) => config,
            Err(source) => {
                let error = StartError::Configuration { source };
                reporter.start_failed(&error);
                return Err(error);
            }
        };

        if let Err(source) = telemetry::initialise(&config, writer) {
            let error = StartError::Telemetry { source };
            reporter.start_failed(&error);
            return Err(error);
        }

        let info = PluginInfo::current();
        reporter.start_succeeded(&info, &config);

        Ok(Self {
            info,
            flight_loop: FlightLoop::new(&config),
            config,
            reporter,
            loop_created: false,
            enabled: false,
        })
    }

    /// Identification strings for the host.
    #[must_use]
    pub const fn info(&self) -> &PluginInfo {
        &self.info
    }

    /// Accessor for the resolved configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The polling state machine.
    #[must_use]
    pub const fn flight_loop(&self) -> &FlightLoop {
        &self.flight_loop
    }

    /// Returns `true` between enable and disable.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Creates the flight loop on first use and arms it at the base interval.
    ///
    /// Returns `false` when the host refuses to create the loop. A disabled
    /// base interval leaves the loop unarmed but still enables the plugin.
    pub fn enable<S>(&mut self, scheduler: &mut S) -> bool
    where
        S: LoopScheduler + ?Sized,
    {
        if self.enabled {
            return true;
        }
        if !self.loop_created {
            if let Err(error) = scheduler.create() {
                tracing::error!(
                    target: "windshield::lifecycle",
                    error = %error,
                    "flight loop registration refused"
                );
                return false;
            }
            self.loop_created = true;
        }

        let interval = self.flight_loop.base_schedule();
        if interval.is_disabled() {
            tracing::warn!(
                target: "windshield::lifecycle",
                "poll interval is zero, flight loop left unarmed"
            );
        } else {
            scheduler.schedule(interval);
        }
        self.enabled = true;
        self.reporter.enabled(interval);
        true
    }

    /// Flight-loop callback body; returns the host-encoded next interval.
    pub fn on_flight_loop<H>(&mut self, host: &H) -> f32
    where
        H: SimHost + ?Sized,
    {
        if !self.enabled {
            return Schedule::Disabled.as_raw();
        }
        self.flight_loop.tick_raw(host)
    }

    /// Brings the next poll forward after the user loads an aircraft.
    pub fn aircraft_loaded<S>(&mut self, scheduler: &mut S)
    where
        S: LoopScheduler + ?Sized,
    {
        if !self.enabled || self.flight_loop.base_schedule().is_disabled() {
            return;
        }
        tracing::debug!(
            target: "windshield::lifecycle",
            "user aircraft loaded, polling on next frame"
        );
        scheduler.schedule(Schedule::Cycles(1));
    }

    /// Pauses the flight loop and releases dataref bindings.
    pub fn disable<H, S>(&mut self, host: &H, scheduler: &mut S)
    where
        H: SimHost + ?Sized,
        S: LoopScheduler + ?Sized,
    {
        if !self.enabled {
            return;
        }
        scheduler.schedule(Schedule::Disabled);
        self.flight_loop.release(host);
        self.enabled = false;
        self.reporter.disabled();
    }

    /// Destroys the flight loop; disables first when still enabled.
    pub fn stop<H, S>(&mut self, host: &H, scheduler: &mut S)
    where
        H: SimHost + ?Sized,
        S: LoopScheduler + ?Sized,
    {
        self.disable(host, scheduler);
        if self.loop_created {
            scheduler.destroy();
            self.loop_created = false;
        }
        self.reporter.stopped();
    }
}
