//! Routes log lines into the simulator's `Log.txt`.

use std::ffi::CString;

use windshield::LogSink;

use crate::ffi::XPLMDebugString;

/// [`LogSink`] writing through `XPLMDebugString`.
#[derive(Debug, Default, Clone, Copy)]
pub struct XplmLogSink;

impl LogSink for XplmLogSink {
    fn write_line(&self, line: &str) {
        debug_string(line);
    }
}

/// Writes `text` to the simulator log, replacing interior NUL bytes.
pub(crate) fn debug_string(text: &str) {
    let Ok(c_text) = CString::new(text.replace('\0', " ")) else {
        return;
    };
    // SAFETY: `c_text` is NUL-terminated and outlives the call.
    unsafe { XPLMDebugString(c_text.as_ptr()) };
}
