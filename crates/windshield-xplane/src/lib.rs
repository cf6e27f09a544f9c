//! X-Plane entry points for the Zibo 737 windshield plugin.
//!
//! The simulator loads this library as a `.xpl` plugin and drives it through
//! the five `XPlugin*` exports. All calls arrive on the simulator's main
//! thread, so the started [`Plugin`] lives in a thread-local slot and the
//! flight-loop callback borrows it from there.

mod ffi;
mod host;
mod log;
mod scheduler;

use std::cell::RefCell;
use std::ffi::{c_char, c_float, c_int, c_void};
use std::sync::Arc;

use camino::Utf8PathBuf;
use windshield::{
    PLUGIN_NAME, Plugin, PluginInfo, SinkWriter, StructuredLifecycleReporter,
};
use windshield_config::{FileConfigLoader, Schedule};

use crate::ffi::{
    FEATURE_NATIVE_PATHS, INFO_BUFFER_LEN, MSG_PLANE_LOADED, PATH_BUFFER_LEN, XPLMEnableFeature,
    XPLMGetMyID, XPLMGetPluginInfo,
};
use crate::host::XplmHost;
use crate::log::XplmLogSink;
use crate::scheduler::XplmScheduler;

const LOG_PREFIX: &str = "ZiboWindshield: ";

struct PluginState {
    plugin: Plugin,
    scheduler: XplmScheduler,
}

thread_local! {
    static STATE: RefCell<Option<PluginState>> = const { RefCell::new(None) };
}

extern "C" fn flight_loop_callback(
    _elapsed_since_last_call: c_float,
    _elapsed_since_last_loop: c_float,
    _counter: c_int,
    _refcon: *mut c_void,
) -> c_float {
    STATE.with(|cell| {
        let Ok(mut slot) = cell.try_borrow_mut() else {
            // Re-entered from inside another hook; try again next frame.
            return Schedule::Cycles(1).as_raw();
        };
        match slot.as_mut() {
            Some(state) => state.plugin.on_flight_loop(&XplmHost),
            None => Schedule::Disabled.as_raw(),
        }
    })
}

fn with_state<F>(action: F)
where
    F: FnOnce(&mut PluginState),
{
    STATE.with(|cell| {
        if let Ok(mut slot) = cell.try_borrow_mut()
            && let Some(state) = slot.as_mut()
        {
            action(state);
        }
    });
}

/// Path of this plugin's binary as reported by the plugin manager.
fn plugin_file_path() -> Option<Utf8PathBuf> {
    let mut path: [c_char; PATH_BUFFER_LEN] = [0; PATH_BUFFER_LEN];
    // SAFETY: null outputs are skipped by the SDK; `path` is large enough.
    unsafe {
        XPLMGetPluginInfo(
            XPLMGetMyID(),
            std::ptr::null_mut(),
            path.as_mut_ptr(),
            std::ptr::null_mut(),
            std::ptr::null_mut(),
        );
    }
    let path = ffi::buffer_to_string(&path);
    (!path.is_empty()).then(|| Utf8PathBuf::from(path))
}

fn config_loader() -> FileConfigLoader {
    plugin_file_path().map_or_else(FileConfigLoader::without_file, |path| {
        FileConfigLoader::beside_plugin(&path)
    })
}

/// Called once when the simulator loads the plugin.
///
/// Fills in the identification buffers, loads configuration and installs
/// telemetry. Returns 1 on success and 0 when the plugin should be unloaded.
///
/// # Safety
///
/// Each output pointer must be null or valid for 256 bytes of writes, as
/// guaranteed by the plugin manager.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn XPluginStart(
    out_name: *mut c_char,
    out_signature: *mut c_char,
    out_description: *mut c_char,
) -> c_int {
    let info = PluginInfo::current();
    // SAFETY: the plugin manager supplies 256-byte buffers.
    unsafe {
        ffi::copy_to_buffer(out_name, INFO_BUFFER_LEN, &info.name);
        ffi::copy_to_buffer(out_signature, INFO_BUFFER_LEN, info.signature);
        ffi::copy_to_buffer(out_description, INFO_BUFFER_LEN, info.description);
        XPLMEnableFeature(FEATURE_NATIVE_PATHS.as_ptr(), 1);
    }

    let writer = SinkWriter::new(Arc::new(XplmLogSink), LOG_PREFIX);
    let reporter = Arc::new(StructuredLifecycleReporter::new());
    match Plugin::start(&config_loader(), reporter, writer) {
        Ok(plugin) => {
            STATE.with(|cell| {
                *cell.borrow_mut() = Some(PluginState {
                    plugin,
                    scheduler: XplmScheduler::new(flight_loop_callback),
                });
            });
            1
        }
        Err(error) => {
            // Telemetry may not be installed yet, so write straight to the log.
            log::debug_string(&format!("{PLUGIN_NAME}: {error}\n"));
            0
        }
    }
}

/// Called when the plugin is enabled; creates and arms the flight loop.
///
/// Returns 1 on success and 0 when the flight loop could not be created.
#[unsafe(no_mangle)]
pub extern "C" fn XPluginEnable() -> c_int {
    let mut enabled = false;
    with_state(|state| enabled = state.plugin.enable(&mut state.scheduler));
    c_int::from(enabled)
}

/// Called when the plugin is disabled; pauses polling and releases datarefs.
#[unsafe(no_mangle)]
pub extern "C" fn XPluginDisable() {
    with_state(|state| state.plugin.disable(&XplmHost, &mut state.scheduler));
}

/// Called once before the simulator unloads the plugin.
#[unsafe(no_mangle)]
pub extern "C" fn XPluginStop() {
    STATE.with(|cell| {
        let Ok(mut slot) = cell.try_borrow_mut() else {
            return;
        };
        if let Some(mut state) = slot.take() {
            state.plugin.stop(&XplmHost, &mut state.scheduler);
        }
    });
}

/// Receives inter-plugin messages; reacts to the user aircraft loading.
#[unsafe(no_mangle)]
pub extern "C" fn XPluginReceiveMessage(_from: c_int, message: c_int, param: *mut c_void) {
    // For plane messages the parameter is the aircraft index, zero for the user.
    if message != MSG_PLANE_LOADED || param.addr() != 0 {
        return;
    }
    with_state(|state| state.plugin.aircraft_loaded(&mut state.scheduler));
}
