//! Which adjustment, if any, a tick performs.

use strum::{Display, EnumString};

/// Adjustment regime selected on each tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Regime {
    /// The target aircraft is not loaded; nothing is touched.
    #[default]
    Uninstrumented,
    /// Keep the rain shader on the aircraft profile.
    Rain,
    /// Keep the rain profile and, while window heat is on, hold windshield
    /// ice within bounds.
    Ice,
}

impl Regime {
    /// Picks the regime for the current conditions.
    ///
    /// An unknown temperature falls back to [`Regime::Rain`].
    #[must_use]
    pub fn select(loaded: bool, ambient_temp_c: Option<f32>, freezing_threshold_c: f32) -> Self {
        if !loaded {
            return Self::Uninstrumented;
        }
        match ambient_temp_c {
            Some(temperature) if temperature <= freezing_threshold_c => Self::Ice,
            _ => Self::Rain,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(false, Some(-20.0), Regime::Uninstrumented)]
    #[case(false, None, Regime::Uninstrumented)]
    #[case(true, None, Regime::Rain)]
    #[case(true, Some(12.0), Regime::Rain)]
    #[case(true, Some(0.0), Regime::Ice)]
    #[case(true, Some(-5.0), Regime::Ice)]
    #[case(true, Some(f32::NAN), Regime::Rain)]
    fn selects_by_load_state_and_temperature(
        #[case] loaded: bool,
        #[case] temperature: Option<f32>,
        #[case] expected: Regime,
    ) {
        assert_eq!(Regime::select(loaded, temperature, 0.0), expected);
    }

    #[test]
    fn displays_in_snake_case() {
        assert_eq!(Regime::Uninstrumented.to_string(), "uninstrumented");
        assert_eq!(Regime::Ice.to_string(), "ice");
    }
}
