//! The polling state machine driven by the host's flight-loop callback.
//!
//! Each tick detects the aircraft, keeps the dataref bindings in step with
//! the load state, selects a [`Regime`], performs that regime's adjustments,
//! and returns the interval after which the host should call again. The
//! tick never fails: host errors are logged and polling continues.

use windshield_config::{Config, IceSettings, RainSettings, Schedule};

use crate::datarefs::{IceDatarefs, RainDatarefs};
use crate::detector::AircraftDetector;
use crate::host::SimHost;
use crate::regime::Regime;

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    /// Regime in force during the tick.
    pub regime: Regime,
    /// Whether any dataref was written.
    pub adjusted: bool,
    /// When the host should call again.
    pub next: Schedule,
}

#[derive(Debug, Default)]
struct Bindings {
    rain: Option<RainDatarefs>,
    ice: Option<IceDatarefs>,
    attempts: u32,
}

/// Owns the bindings and regime between ticks.
#[derive(Debug)]
pub struct FlightLoop {
    detector: AircraftDetector,
    rain: RainSettings,
    ice: IceSettings,
    base: Schedule,
    loaded: Schedule,
    restore_on_unload: bool,
    bindings: Option<Bindings>,
    regime: Regime,
}

impl FlightLoop {
    /// Builds the loop from the resolved configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            detector: AircraftDetector::new(config.aircraft_markers.clone()),
            rain: config.rain.clone(),
            ice: config.ice.clone(),
            base: config.base_schedule(),
            loaded: config.loaded_schedule(),
            restore_on_unload: config.restore_on_unload,
            bindings: None,
            regime: Regime::Uninstrumented,
        }
    }

    /// Regime selected by the most recent tick.
    #[must_use]
    pub const fn regime(&self) -> Regime {
        self.regime
    }

    /// Interval used while the aircraft is absent.
    #[must_use]
    pub const fn base_schedule(&self) -> Schedule {
        self.base
    }

    /// Returns `true` while datarefs are bound to a loaded aircraft.
    #[must_use]
    pub const fn is_bound(&self) -> bool {
        self.bindings.is_some()
    }

    /// Runs one polling step.
    pub fn tick<H>(&mut self, host: &H) -> TickOutcome
    where
        H: SimHost + ?Sized,
    {
        let loaded = self.detector.detect(host);
        if loaded {
            self.ensure_bound(host);
        } else if self.bindings.is_some() {
            tracing::info!(
                target: "windshield::flight_loop",
                event = "aircraft_unloaded",
                "target aircraft no longer loaded"
            );
            self.release(host);
        }

        let temperature = if loaded {
            self.ambient_temperature(host)
        } else {
            None
        };
        let regime = Regime::select(loaded, temperature, self.ice.freezing_threshold_c);
        if regime != self.regime {
            tracing::info!(
                target: "windshield::flight_loop",
                event = "regime_changed",
                from = %self.regime,
                to = %regime,
                "regime changed"
            );
            self.regime = regime;
        }

        // The rain profile is held whenever the aircraft is loaded; freezing
        // air only adds the window-ice clamp on top.
        let adjusted = match regime {
            Regime::Uninstrumented => false,
            Regime::Rain => self.adjust_rain(host),
            Regime::Ice => {
                let rain = self.adjust_rain(host);
                let ice = self.adjust_ice(host);
                rain || ice
            }
        };

        TickOutcome {
            regime,
            adjusted,
            next: if loaded { self.loaded } else { self.base },
        }
    }

    /// Runs one polling step and encodes the next interval for the host.
    pub fn tick_raw<H>(&mut self, host: &H) -> f32
    where
        H: SimHost + ?Sized,
    {
        self.tick(host).next.as_raw()
    }

    /// Drops all bindings, restoring stock rain values when configured.
    pub fn release<H>(&mut self, host: &H)
    where
        H: SimHost + ?Sized,
    {
        let Some(bindings) = self.bindings.take() else {
            return;
        };
        if !self.restore_on_unload {
            return;
        }
        if let Some(rain) = bindings.rain {
            let report = rain.apply(host, &self.rain.defaults);
            tracing::info!(
                target: "windshield::flight_loop",
                event = "rain_restored",
                failed = report.failed,
                "restored stock rain values"
            );
        }
    }

    fn ensure_bound<H>(&mut self, host: &H)
    where
        H: SimHost + ?Sized,
    {
        let ice_enabled = self.ice.enabled;
        let bindings = self.bindings.get_or_insert_with(Bindings::default);
        let rain_missing = bindings.rain.is_none();
        let ice_missing = ice_enabled && bindings.ice.is_none();
        if !rain_missing && !ice_missing {
            return;
        }

        let first_attempt = bindings.attempts == 0;
        bindings.attempts = bindings.attempts.saturating_add(1);

        if rain_missing {
            match RainDatarefs::bind(host) {
                Ok(rain) => bindings.rain = Some(rain),
                Err(error) => report_bind_failure("rain", &error, first_attempt),
            }
        }
        if ice_missing {
            match IceDatarefs::bind(host) {
                Ok(ice) => bindings.ice = Some(ice),
                Err(error) => report_bind_failure("ice", &error, first_attempt),
            }
        }
    }

    fn ambient_temperature<H>(&self, host: &H) -> Option<f32>
    where
        H: SimHost + ?Sized,
    {
        let ice = self.bindings.as_ref()?.ice.as_ref()?;
        match ice.ambient_temperature(host) {
            Ok(temperature) => Some(temperature),
            Err(error) => {
                tracing::error!(
                    target: "windshield::flight_loop",
                    error = %error,
                    "failed to read ambient temperature"
                );
                None
            }
        }
    }

    fn adjust_rain<H>(&self, host: &H) -> bool
    where
        H: SimHost + ?Sized,
    {
        let Some(rain) = self.bindings.as_ref().and_then(|bindings| bindings.rain) else {
            return false;
        };
        if !rain.needs_adjustment(host, &self.rain.target, self.rain.tolerance) {
            return false;
        }
        tracing::info!(
            target: "windshield::flight_loop",
            event = "rain_adjustment",
            "rain needs adjustment"
        );
        let report = rain.apply(host, &self.rain.target);
        report.attempted > report.failed
    }

    fn adjust_ice<H>(&self, host: &H) -> bool
    where
        H: SimHost + ?Sized,
    {
        let Some(ice) = self.bindings.as_ref().and_then(|bindings| bindings.ice) else {
            return false;
        };
        let heat_on = match ice.window_heat_on(host) {
            Ok(heat_on) => heat_on,
            Err(error) => {
                tracing::error!(
                    target: "windshield::flight_loop",
                    error = %error,
                    "failed to read window heat"
                );
                return false;
            }
        };
        if !heat_on {
            return false;
        }
        match ice.clamp_window_ice(host, self.ice.max_window_ice) {
            Ok(clamped) => {
                if clamped {
                    tracing::info!(
                        target: "windshield::flight_loop",
                        event = "window_ice_clamped",
                        ceiling = self.ice.max_window_ice,
                        "window ice lowered under window heat"
                    );
                }
                clamped
            }
            Err(error) => {
                tracing::error!(
                    target: "windshield::flight_loop",
                    error = %error,
                    "failed to adjust window ice"
                );
                false
            }
        }
    }
}

fn report_bind_failure(group: &str, error: &crate::host::HostError, first_attempt: bool) {
    if first_attempt {
        tracing::warn!(
            target: "windshield::flight_loop",
            group,
            error = %error,
            "dataref binding failed, will retry"
        );
    } else {
        tracing::debug!(
            target: "windshield::flight_loop",
            group,
            error = %error,
            "dataref binding still failing"
        );
    }
}
