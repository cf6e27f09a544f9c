//! The seam between plugin logic and the simulator.
//!
//! Everything the plugin needs from the host goes through [`SimHost`]: name
//! lookup for datarefs, float and integer access, and the path of the user's
//! aircraft. The production implementation wraps the XPLM C API; tests use
//! in-memory doubles.

use thiserror::Error;

/// Opaque handle the host hands out for a resolved dataref name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DatarefHandle(usize);

impl DatarefHandle {
    /// Wraps a host-specific handle value.
    #[must_use]
    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    /// Returns the host-specific handle value.
    #[must_use]
    pub const fn into_raw(self) -> usize {
        self.0
    }
}

/// A dataref resolved by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dataref {
    name: &'static str,
    handle: DatarefHandle,
}

impl Dataref {
    /// Pairs a name with the handle the host returned for it.
    #[must_use]
    pub const fn new(name: &'static str, handle: DatarefHandle) -> Self {
        Self { name, handle }
    }

    /// Looks the name up on the host.
    ///
    /// # Errors
    ///
    /// Propagates [`HostError::DatarefNotFound`] from the host.
    pub fn resolve<H>(host: &H, name: &'static str) -> Result<Self, HostError>
    where
        H: SimHost + ?Sized,
    {
        host.find_dataref(name).map(|handle| Self::new(name, handle))
    }

    /// Dataref name as published by the simulator.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Host handle.
    #[must_use]
    pub const fn handle(&self) -> DatarefHandle {
        self.handle
    }
}

/// Errors reported by a [`SimHost`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The simulator does not publish a dataref with this name.
    #[error("dataref '{name}' not found")]
    DatarefNotFound {
        /// Name that was looked up.
        name: String,
    },

    /// The dataref exists but rejects writes.
    #[error("dataref '{name}' is read-only")]
    NotWritable {
        /// Dataref name.
        name: String,
    },

    /// Reading the dataref failed.
    #[error("failed to read dataref '{name}': {message}")]
    Read {
        /// Dataref name.
        name: String,
        /// Host-supplied description.
        message: String,
    },

    /// Writing the dataref failed.
    #[error("failed to write dataref '{name}': {message}")]
    Write {
        /// Dataref name.
        name: String,
        /// Host-supplied description.
        message: String,
    },

    /// No user aircraft is loaded.
    #[error("no user aircraft is loaded")]
    NoAircraft,
}

/// Access to the simulator's state variables.
///
/// Implementations are only called from the host's main thread.
pub trait SimHost {
    /// Resolves a dataref name to a handle.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::DatarefNotFound`] when the name is unknown.
    fn find_dataref(&self, name: &str) -> Result<DatarefHandle, HostError>;

    /// Reads a float dataref.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Read`] when the value cannot be read.
    fn read_float(&self, dataref: &Dataref) -> Result<f32, HostError>;

    /// Writes a float dataref.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::NotWritable`] or [`HostError::Write`].
    fn write_float(&self, dataref: &Dataref, value: f32) -> Result<(), HostError>;

    /// Reads an integer dataref.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Read`] when the value cannot be read.
    fn read_int(&self, dataref: &Dataref) -> Result<i32, HostError>;

    /// Path of the user's aircraft file (aircraft model index zero).
    ///
    /// # Errors
    ///
    /// Returns [`HostError::NoAircraft`] when nothing is loaded.
    fn user_aircraft_path(&self) -> Result<String, HostError>;
}

