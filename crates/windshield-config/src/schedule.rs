//! Flight-loop re-arm intervals.
//!
//! The host interprets the value returned from a flight-loop callback as the
//! delay before the next call: positive values are seconds, negative values
//! are a number of rendered frames, and zero stops the loop. [`Schedule`]
//! gives those three cases names so the rest of the plugin never handles the
//! raw sign convention.

use std::fmt;

/// When the flight loop should run next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Schedule {
    /// Run again after this many seconds.
    Seconds(f32),
    /// Run again after this many frames.
    Cycles(u32),
    /// Do not run again until explicitly rescheduled.
    Disabled,
}

impl Schedule {
    /// Decodes the host's signed representation.
    ///
    /// Non-finite values and zero decode to [`Schedule::Disabled`]. Negative
    /// fractions round to the nearest frame count, never below one frame.
    #[must_use]
    pub fn from_raw(raw: f32) -> Self {
        if !raw.is_finite() || raw == 0.0 {
            Self::Disabled
        } else if raw > 0.0 {
            Self::Seconds(raw)
        } else {
            Self::Cycles(frames(-raw))
        }
    }

    /// Encodes the schedule in the host's signed representation.
    #[must_use]
    pub fn as_raw(self) -> f32 {
        match self {
            Self::Seconds(seconds) => seconds,
            Self::Cycles(cycles) => -(cycles as f32),
            Self::Disabled => 0.0,
        }
    }

    /// Multiplies the interval, keeping its unit.
    #[must_use]
    pub fn scaled(self, factor: f32) -> Self {
        match self {
            Self::Seconds(seconds) => Self::Seconds(seconds * factor),
            Self::Cycles(cycles) => Self::Cycles(frames(cycles as f32 * factor)),
            Self::Disabled => Self::Disabled,
        }
    }

    /// Returns `true` when the loop would stop.
    #[must_use]
    pub const fn is_disabled(self) -> bool {
        matches!(self, Self::Disabled)
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seconds(seconds) => write!(formatter, "{seconds}s"),
            Self::Cycles(cycles) => write!(formatter, "{cycles} frames"),
            Self::Disabled => formatter.write_str("disabled"),
        }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "input is finite and clamped to at least one before conversion"
)]
fn frames(count: f32) -> u32 {
    count.round().clamp(1.0, u32::MAX as f32) as u32
}
