//! Structured telemetry initialisation for the plugin.
//!
//! The simulator owns stdout and stderr, so log lines are handed to a
//! [`LogSink`] instead; in production that sink is the simulator's own log
//! file.

use std::io;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{Subscriber, subscriber::SetGlobalDefaultError};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::{self, MakeWriter};

use windshield_config::{Config, LogFormat};

static TELEMETRY_GUARD: OnceCell<()> = OnceCell::new();

/// Handle returned when telemetry has been initialised.
#[derive(Debug, Default, Clone, Copy)]
pub struct TelemetryHandle;

/// Errors encountered while configuring telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Failed to parse the configured log filter expression.
    #[error("invalid log filter: {0}")]
    Filter(String),
    /// Failed to install the tracing subscriber.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Destination for complete, formatted log lines.
pub trait LogSink: Send + Sync {
    /// Emits one line, including its trailing newline.
    fn write_line(&self, line: &str);
}

/// [`MakeWriter`] that buffers each event and forwards it to a [`LogSink`].
#[derive(Debug)]
pub struct SinkWriter<S> {
    sink: Arc<S>,
    prefix: &'static str,
}

impl<S> SinkWriter<S> {
    /// Prefixes every line with `prefix` before handing it to `sink`.
    #[must_use]
    pub const fn new(sink: Arc<S>, prefix: &'static str) -> Self {
        Self { sink, prefix }
    }
}

impl<S> Clone for SinkWriter<S> {
    fn clone(&self) -> Self {
        Self {
            sink: Arc::clone(&self.sink),
            prefix: self.prefix,
        }
    }
}

impl<'a, S> MakeWriter<'a> for SinkWriter<S>
where
    S: LogSink + 'static,
{
    type Writer = SinkLine<S>;

    fn make_writer(&'a self) -> Self::Writer {
        SinkLine {
            sink: Arc::clone(&self.sink),
            prefix: self.prefix,
            buffer: Vec::new(),
        }
    }
}

/// One event's worth of output, flushed to the sink on drop.
#[derive(Debug)]
pub struct SinkLine<S: LogSink> {
    sink: Arc<S>,
    prefix: &'static str,
    buffer: Vec<u8>,
}

impl<S: LogSink> io::Write for SinkLine<S> {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: LogSink> Drop for SinkLine<S> {
    fn drop(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let text = String::from_utf8_lossy(&self.buffer);
        let mut line = format!("{}{}", self.prefix, text);
        if !line.ends_with('\n') {
            line.push('\n');
        }
        self.sink.write_line(&line);
    }
}

/// Configures the global tracing subscriber when invoked for the first time.
///
/// The filter is validated on every call so a bad configuration is reported
/// even when an earlier call already installed the subscriber. Only the first
/// successful call installs anything; later calls return a fresh handle.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] for an unparsable filter and
/// [`TelemetryError::Subscriber`] when another global subscriber exists.
pub fn initialise<W>(config: &Config, writer: W) -> Result<TelemetryHandle, TelemetryError>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_new(&config.log_filter)
        .map_err(|error| TelemetryError::Filter(error.to_string()))?;
    TELEMETRY_GUARD
        .get_or_try_init(|| install_subscriber(filter, config.log_format, writer))
        .map(|_| TelemetryHandle)
}

fn install_subscriber<W>(
    filter: EnvFilter,
    format: LogFormat,
    writer: W,
) -> Result<(), TelemetryError>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(writer)
        // The simulator log is a plain text file.
        .with_ansi(false)
        .with_timer(fmt::time::UtcTime::rfc_3339());

    let subscriber: Box<dyn Subscriber + Send + Sync> = match format {
        LogFormat::Json => Box::new(builder.json().flatten_event(true).finish()),
        LogFormat::Compact => Box::new(builder.compact().finish()),
    };

    tracing::subscriber::set_global_default(subscriber).map_err(TelemetryError::Subscriber)
}
