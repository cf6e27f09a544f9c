//! Values written to the simulator's rain and ice controls.

use serde::{Deserialize, Serialize};

use crate::defaults::{
    DEFAULT_FREEZING_THRESHOLD_C, DEFAULT_MAX_WINDOW_ICE, DEFAULT_RAIN_TOLERANCE,
};

/// One complete set of rain shader parameters.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct RainProfile {
    /// Force applied to droplets by the airflow.
    pub force_factor: f32,
    /// Dynamic friction of droplets on the glass.
    pub friction_dynamic: f32,
    /// Upper bound on the force a droplet can receive.
    pub max_force: f32,
    /// Droplet size scale.
    pub scale: f32,
    /// Droplet spawn rate adjustment.
    pub spawn_adjust: f32,
}

impl RainProfile {
    /// Profile tuned for the Zibo 737 windshield.
    #[must_use]
    pub const fn aircraft() -> Self {
        Self {
            force_factor: 0.005,
            friction_dynamic: 0.05,
            max_force: 20.0,
            scale: 0.5,
            spawn_adjust: 2000.0,
        }
    }

    /// The simulator's stock values.
    #[must_use]
    pub const fn simulator_default() -> Self {
        Self {
            force_factor: 0.1,
            friction_dynamic: 0.3,
            max_force: 50.0,
            scale: 1.0,
            spawn_adjust: 1000.0,
        }
    }
}

/// Rain adjustment settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RainSettings {
    /// Values written while the aircraft is loaded.
    pub target: RainProfile,
    /// Values restored once the aircraft is unloaded.
    pub defaults: RainProfile,
    /// Relative tolerance before the live force factor counts as drifted.
    pub tolerance: f32,
}

impl Default for RainSettings {
    fn default() -> Self {
        Self {
            target: RainProfile::aircraft(),
            defaults: RainProfile::simulator_default(),
            tolerance: DEFAULT_RAIN_TOLERANCE,
        }
    }
}

/// Windshield ice settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct IceSettings {
    /// Whether the ice regime is considered at all.
    pub enabled: bool,
    /// Ambient temperature in degrees Celsius at or below which ice applies.
    pub freezing_threshold_c: f32,
    /// Window ice ratio ceiling enforced while window heat is on.
    pub max_window_ice: f32,
}

impl Default for IceSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            freezing_threshold_c: DEFAULT_FREEZING_THRESHOLD_C,
            max_window_ice: DEFAULT_MAX_WINDOW_ICE,
        }
    }
}
