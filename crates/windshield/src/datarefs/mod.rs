//! Bindings for the rain shader and windshield ice datarefs.
//!
//! A binding resolves every name it needs up front, so a simulator version
//! that lacks one of the private rain controls is detected once instead of
//! on every write. Reads and writes after binding never abort the tick:
//! failures are logged and counted, and the remaining values still go out.

use windshield_config::RainProfile;

use crate::host::{Dataref, HostError, SimHost};

/// Rain droplet force factor.
pub const RAIN_FORCE_FACTOR: &str = "sim/private/controls/rain/force_factor";
/// Rain droplet dynamic friction.
pub const RAIN_FRICTION_DYNAMIC: &str = "sim/private/controls/rain/friction_dynamic";
/// Rain droplet force ceiling.
pub const RAIN_MAX_FORCE: &str = "sim/private/controls/rain/max_force";
/// Rain droplet scale.
pub const RAIN_SCALE: &str = "sim/private/controls/rain/scale";
/// Rain droplet spawn adjustment.
pub const RAIN_SPAWN_ADJUST: &str = "sim/private/controls/rain/spawn_adjust";

/// Outside air temperature at the aircraft, degrees Celsius.
pub const AMBIENT_TEMPERATURE: &str = "sim/weather/aircraft/temperature_ambient_deg_c";
/// Window heat switch state.
pub const WINDOW_HEAT_ON: &str = "sim/cockpit2/ice/ice_window_heat_on";
/// Windshield ice ratio, zero to one.
pub const WINDOW_ICE: &str = "sim/flightmodel/failures/window_ice";

/// Outcome of writing a group of datarefs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteReport {
    /// Writes attempted.
    pub attempted: usize,
    /// Writes the host rejected.
    pub failed: usize,
}

impl WriteReport {
    /// Returns `true` when every write succeeded.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// The five rain shader controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RainDatarefs {
    force_factor: Dataref,
    friction_dynamic: Dataref,
    max_force: Dataref,
    scale: Dataref,
    spawn_adjust: Dataref,
}

impl RainDatarefs {
    /// Resolves all five rain controls.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::DatarefNotFound`] for the first missing name.
    pub fn bind<H>(host: &H) -> Result<Self, HostError>
    where
        H: SimHost + ?Sized,
    {
        Ok(Self {
            force_factor: Dataref::resolve(host, RAIN_FORCE_FACTOR)?,
            friction_dynamic: Dataref::resolve(host, RAIN_FRICTION_DYNAMIC)?,
            max_force: Dataref::resolve(host, RAIN_MAX_FORCE)?,
            scale: Dataref::resolve(host, RAIN_SCALE)?,
            spawn_adjust: Dataref::resolve(host, RAIN_SPAWN_ADJUST)?,
        })
    }

    /// Returns `true` when the live force factor has drifted from `target`.
    ///
    /// The force factor is the one value the simulator resets when it
    /// reloads weather, so it stands in for the whole profile. A failed read
    /// is logged and reported as "no adjustment needed".
    pub fn needs_adjustment<H>(&self, host: &H, target: &RainProfile, tolerance: f32) -> bool
    where
        H: SimHost + ?Sized,
    {
        match host.read_float(&self.force_factor) {
            Ok(current) => !is_close(current, target.force_factor, tolerance),
            Err(error) => {
                tracing::error!(
                    target: "windshield::datarefs",
                    dataref = self.force_factor.name(),
                    error = %error,
                    "failed to read rain force factor"
                );
                false
            }
        }
    }

    /// Writes every value of `profile`.
    pub fn apply<H>(&self, host: &H, profile: &RainProfile) -> WriteReport
    where
        H: SimHost + ?Sized,
    {
        write_all(
            host,
            &[
                (self.force_factor, profile.force_factor),
                (self.friction_dynamic, profile.friction_dynamic),
                (self.max_force, profile.max_force),
                (self.scale, profile.scale),
                (self.spawn_adjust, profile.spawn_adjust),
            ],
        )
    }
}

/// Ambient temperature, window heat and window ice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IceDatarefs {
    ambient_temperature: Dataref,
    window_heat: Dataref,
    window_ice: Dataref,
}

impl IceDatarefs {
    /// Resolves the ice datarefs.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::DatarefNotFound`] for the first missing name.
    pub fn bind<H>(host: &H) -> Result<Self, HostError>
    where
        H: SimHost + ?Sized,
    {
        Ok(Self {
            ambient_temperature: Dataref::resolve(host, AMBIENT_TEMPERATURE)?,
            window_heat: Dataref::resolve(host, WINDOW_HEAT_ON)?,
            window_ice: Dataref::resolve(host, WINDOW_ICE)?,
        })
    }

    /// Outside air temperature in degrees Celsius.
    ///
    /// # Errors
    ///
    /// Propagates host read failures.
    pub fn ambient_temperature<H>(&self, host: &H) -> Result<f32, HostError>
    where
        H: SimHost + ?Sized,
    {
        host.read_float(&self.ambient_temperature)
    }

    /// Whether the window heat switch is on.
    ///
    /// # Errors
    ///
    /// Propagates host read failures.
    pub fn window_heat_on<H>(&self, host: &H) -> Result<bool, HostError>
    where
        H: SimHost + ?Sized,
    {
        host.read_int(&self.window_heat).map(|state| state != 0)
    }

    /// Current window ice ratio.
    ///
    /// # Errors
    ///
    /// Propagates host read failures.
    pub fn window_ice<H>(&self, host: &H) -> Result<f32, HostError>
    where
        H: SimHost + ?Sized,
    {
        host.read_float(&self.window_ice)
    }

    /// Lowers window ice to `ceiling` when it is above it.
    ///
    /// Returns `true` when a write happened.
    ///
    /// # Errors
    ///
    /// Propagates host read and write failures.
    pub fn clamp_window_ice<H>(&self, host: &H, ceiling: f32) -> Result<bool, HostError>
    where
        H: SimHost + ?Sized,
    {
        let current = self.window_ice(host)?;
        if current <= ceiling {
            return Ok(false);
        }
        host.write_float(&self.window_ice, ceiling)?;
        Ok(true)
    }
}

fn write_all<H>(host: &H, values: &[(Dataref, f32)]) -> WriteReport
where
    H: SimHost + ?Sized,
{
    let mut report = WriteReport::default();
    for (dataref, value) in values {
        report.attempted += 1;
        if let Err(error) = host.write_float(dataref, *value) {
            report.failed += 1;
            tracing::error!(
                target: "windshield::datarefs",
                dataref = dataref.name(),
                value = *value,
                error = %error,
                "failed to write dataref"
            );
        }
    }
    report
}

/// Relative closeness test with no absolute floor.
pub(crate) fn is_close(a: f32, b: f32, tolerance: f32) -> bool {
    if a == b {
        return true;
    }
    if !a.is_finite() || !b.is_finite() {
        return false;
    }
    (a - b).abs() <= tolerance * a.abs().max(b.abs())
}
