//! Declarations for the subset of the XPLM API the plugin calls.

use std::ffi::{c_char, c_float, c_int, c_void};

/// Opaque dataref handle; null when lookup fails.
pub(crate) type XplmDataRef = *mut c_void;

/// Opaque flight-loop handle; null when creation fails.
pub(crate) type XplmFlightLoopId = *mut c_void;

/// Plugin identifier.
pub(crate) type XplmPluginId = c_int;

/// Flight-loop callback signature.
pub(crate) type XplmFlightLoopFn =
    extern "C" fn(c_float, c_float, c_int, *mut c_void) -> c_float;

/// Parameters for `XPLMCreateFlightLoop`.
#[repr(C)]
pub(crate) struct CreateFlightLoop {
    pub(crate) struct_size: c_int,
    pub(crate) phase: c_int,
    pub(crate) callback: Option<XplmFlightLoopFn>,
    pub(crate) refcon: *mut c_void,
}

/// Run the callback after the flight model has been integrated.
pub(crate) const FLIGHT_LOOP_PHASE_AFTER_FLIGHT_MODEL: c_int = 1;

/// Sent when an aircraft finishes loading; the parameter is its index.
pub(crate) const MSG_PLANE_LOADED: c_int = 102;

/// Size the SDK requires for name, signature and description buffers.
pub(crate) const INFO_BUFFER_LEN: usize = 256;

/// Generous size for file path buffers.
pub(crate) const PATH_BUFFER_LEN: usize = 512;

/// Feature flag switching path arguments to native separators.
pub(crate) const FEATURE_NATIVE_PATHS: &std::ffi::CStr = c"XPLM_USE_NATIVE_PATHS";

unsafe extern "C" {
    pub(crate) fn XPLMDebugString(string: *const c_char);

    pub(crate) fn XPLMEnableFeature(feature: *const c_char, enable: c_int);

    pub(crate) fn XPLMGetMyID() -> XplmPluginId;

    pub(crate) fn XPLMGetPluginInfo(
        plugin: XplmPluginId,
        out_name: *mut c_char,
        out_file_path: *mut c_char,
        out_signature: *mut c_char,
        out_description: *mut c_char,
    );

    pub(crate) fn XPLMFindDataRef(name: *const c_char) -> XplmDataRef;

    pub(crate) fn XPLMCanWriteDataRef(dataref: XplmDataRef) -> c_int;

    pub(crate) fn XPLMGetDataf(dataref: XplmDataRef) -> c_float;

    pub(crate) fn XPLMSetDataf(dataref: XplmDataRef, value: c_float);

    pub(crate) fn XPLMGetDatai(dataref: XplmDataRef) -> c_int;

    pub(crate) fn XPLMGetNthAircraftModel(
        index: c_int,
        out_file_name: *mut c_char,
        out_path: *mut c_char,
    );

    pub(crate) fn XPLMCreateFlightLoop(params: *mut CreateFlightLoop) -> XplmFlightLoopId;

    pub(crate) fn XPLMScheduleFlightLoop(
        flight_loop: XplmFlightLoopId,
        interval: c_float,
        relative_to_now: c_int,
    );

    pub(crate) fn XPLMDestroyFlightLoop(flight_loop: XplmFlightLoopId);
}

/// Reads a NUL-terminated string out of a fixed-size buffer.
///
/// A buffer without a terminator is read in full.
pub(crate) fn buffer_to_string(buffer: &[c_char]) -> String {
    let bytes: Vec<u8> = buffer
        .iter()
        .map(|&ch| u8::from_ne_bytes(ch.to_ne_bytes()))
        .take_while(|&byte| byte != 0)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Copies `text` into a caller-supplied buffer of `capacity` bytes,
/// truncating and always NUL-terminating.
///
/// # Safety
///
/// `destination` must be null or valid for writes of `capacity` bytes.
pub(crate) unsafe fn copy_to_buffer(destination: *mut c_char, capacity: usize, text: &str) {
    if destination.is_null() || capacity == 0 {
        return;
    }
    // SAFETY: the caller guarantees `capacity` writable bytes.
    let buffer = unsafe { std::slice::from_raw_parts_mut(destination.cast::<u8>(), capacity) };
    let length = text.len().min(capacity.saturating_sub(1));
    let source = text.as_bytes().get(..length).unwrap_or_default();
    if let Some(target) = buffer.get_mut(..length) {
        target.copy_from_slice(source);
    }
    if let Some(terminator) = buffer.get_mut(length) {
        *terminator = 0;
    }
}
