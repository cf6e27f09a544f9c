//! Structured reporting for plugin lifecycle events.

use std::sync::Arc;

use windshield_config::{Config, Schedule};

use crate::lifecycle::{PluginInfo, StartError};

/// Observer trait used to surface lifecycle events to telemetry sinks.
pub trait LifecycleReporter: Send + Sync {
    /// Invoked after start completes successfully.
    fn start_succeeded(&self, info: &PluginInfo, config: &Config);

    /// Invoked when start fails.
    fn start_failed(&self, error: &StartError);

    /// Invoked after the flight loop has been scheduled.
    fn enabled(&self, interval: Schedule);

    /// Invoked after the flight loop has been paused.
    fn disabled(&self);

    /// Invoked after the flight loop has been destroyed.
    fn stopped(&self);
}

impl<T> LifecycleReporter for Arc<T>
where
    T: LifecycleReporter + ?Sized,
{
    fn start_succeeded(&self, info: &PluginInfo, config: &Config) {
        (**self).start_succeeded(info, config);
    }

    fn start_failed(&self, error: &StartError) {
        (**self).start_failed(error);
    }

    fn enabled(&self, interval: Schedule) {
        (**self).enabled(interval);
    }

    fn disabled(&self) {
        (**self).disabled();
    }

    fn stopped(&self) {
        (**self).stopped();
    }
}

/// Default reporter that records lifecycle events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredLifecycleReporter;

impl StructuredLifecycleReporter {
    /// Builds a new reporter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl LifecycleReporter for StructuredLifecycleReporter {
    fn start_succeeded(&self, info: &PluginInfo, config: &Config) {
        tracing::info!(
            target: "windshield::lifecycle",
            event = "start_succeeded",
            plugin = %info.name,
            poll_interval = %config.base_schedule(),
            loaded_interval = %config.loaded_schedule(),
            markers = ?config.aircraft_markers,
            log_filter = %config.log_filter,
            "plugin started"
        );
    }

    fn start_failed(&self, error: &StartError) {
        tracing::error!(
            target: "windshield::lifecycle",
            event = "start_failed",
            error = %error,
            "plugin failed to start"
        );
    }

    fn enabled(&self, interval: Schedule) {
        tracing::info!(
            target: "windshield::lifecycle",
            event = "enabled",
            interval = %interval,
            "flight loop scheduled"
        );
    }

    fn disabled(&self) {
        tracing::info!(
            target: "windshield::lifecycle",
            event = "disabled",
            "flight loop paused"
        );
    }

    fn stopped(&self) {
        tracing::info!(
            target: "windshield::lifecycle",
            event = "stopped",
            "flightloop closed, exiting"
        );
    }
}
