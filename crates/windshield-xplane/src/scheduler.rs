//! [`LoopScheduler`] backed by the XPLM flight-loop API.

use std::ffi::c_int;
use std::ptr;

use windshield::{LoopScheduler, SchedulerError};
use windshield_config::Schedule;

use crate::ffi::{
    CreateFlightLoop, FLIGHT_LOOP_PHASE_AFTER_FLIGHT_MODEL, XPLMCreateFlightLoop,
    XPLMDestroyFlightLoop, XPLMScheduleFlightLoop, XplmFlightLoopFn, XplmFlightLoopId,
};

/// Owns the plugin's single flight loop.
#[derive(Debug)]
pub struct XplmScheduler {
    callback: XplmFlightLoopFn,
    id: Option<XplmFlightLoopId>,
}

impl XplmScheduler {
    /// Registers `callback` when [`LoopScheduler::create`] is called.
    #[must_use]
    pub const fn new(callback: XplmFlightLoopFn) -> Self {
        Self { callback, id: None }
    }
}

impl LoopScheduler for XplmScheduler {
    fn create(&mut self) -> Result<(), SchedulerError> {
        if self.id.is_some() {
            return Ok(());
        }
        let struct_size = c_int::try_from(size_of::<CreateFlightLoop>()).map_err(|_| {
            SchedulerError {
                message: "flight loop parameters too large".to_owned(),
            }
        })?;
        let mut params = CreateFlightLoop {
            struct_size,
            phase: FLIGHT_LOOP_PHASE_AFTER_FLIGHT_MODEL,
            callback: Some(self.callback),
            refcon: ptr::null_mut(),
        };
        // SAFETY: `params` is fully initialised and only read during the call.
        let id = unsafe { XPLMCreateFlightLoop(&raw mut params) };
        if id.is_null() {
            return Err(SchedulerError {
                message: "XPLMCreateFlightLoop returned null".to_owned(),
            });
        }
        self.id = Some(id);
        Ok(())
    }

    fn schedule(&mut self, interval: Schedule) {
        let Some(id) = self.id else {
            tracing::warn!(
                target: "windshield::xplane",
                %interval,
                "schedule requested before the flight loop exists"
            );
            return;
        };
        // SAFETY: `id` came from `XPLMCreateFlightLoop` and is not yet destroyed.
        unsafe { XPLMScheduleFlightLoop(id, interval.as_raw(), 1) };
    }

    fn destroy(&mut self) {
        if let Some(id) = self.id.take() {
            // SAFETY: `id` came from `XPLMCreateFlightLoop`; taking it prevents reuse.
            unsafe { XPLMDestroyFlightLoop(id) };
        }
    }
}
