//! [`SimHost`] backed by the XPLM dataref and aircraft APIs.

use std::ffi::{CString, c_char, c_void};
use std::ptr;

use windshield::{Dataref, DatarefHandle, HostError, SimHost};

use crate::ffi::{
    self, INFO_BUFFER_LEN, PATH_BUFFER_LEN, XPLMCanWriteDataRef, XPLMFindDataRef, XPLMGetDataf,
    XPLMGetDatai, XPLMGetNthAircraftModel, XPLMSetDataf, XplmDataRef,
};

/// Index of the user's aircraft in the aircraft model list.
const USER_AIRCRAFT: i32 = 0;

/// The running simulator. Only valid on the simulator's main thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct XplmHost;

impl XplmHost {
    fn raw(dataref: &Dataref) -> XplmDataRef {
        ptr::with_exposed_provenance_mut::<c_void>(dataref.handle().into_raw())
    }
}

impl SimHost for XplmHost {
    fn find_dataref(&self, name: &str) -> Result<DatarefHandle, HostError> {
        let not_found = || HostError::DatarefNotFound {
            name: name.to_owned(),
        };
        let c_name = CString::new(name).map_err(|_| not_found())?;
        // SAFETY: `c_name` is NUL-terminated and outlives the call.
        let raw = unsafe { XPLMFindDataRef(c_name.as_ptr()) };
        if raw.is_null() {
            return Err(not_found());
        }
        Ok(DatarefHandle::from_raw(raw.expose_provenance()))
    }

    fn read_float(&self, dataref: &Dataref) -> Result<f32, HostError> {
        // SAFETY: the handle came from `XPLMFindDataRef`.
        Ok(unsafe { XPLMGetDataf(Self::raw(dataref)) })
    }

    fn write_float(&self, dataref: &Dataref, value: f32) -> Result<(), HostError> {
        let raw = Self::raw(dataref);
        // SAFETY: the handle came from `XPLMFindDataRef`.
        if unsafe { XPLMCanWriteDataRef(raw) } == 0 {
            return Err(HostError::NotWritable {
                name: dataref.name().to_owned(),
            });
        }
        // SAFETY: as above.
        unsafe { XPLMSetDataf(raw, value) };
        Ok(())
    }

    fn read_int(&self, dataref: &Dataref) -> Result<i32, HostError> {
        // SAFETY: the handle came from `XPLMFindDataRef`.
        Ok(unsafe { XPLMGetDatai(Self::raw(dataref)) })
    }

    fn user_aircraft_path(&self) -> Result<String, HostError> {
        let mut file_name: [c_char; INFO_BUFFER_LEN] = [0; INFO_BUFFER_LEN];
        let mut path: [c_char; PATH_BUFFER_LEN] = [0; PATH_BUFFER_LEN];
        // SAFETY: both buffers have the sizes the SDK documents.
        unsafe {
            XPLMGetNthAircraftModel(USER_AIRCRAFT, file_name.as_mut_ptr(), path.as_mut_ptr());
        }
        let path = ffi::buffer_to_string(&path);
        if path.is_empty() {
            return Err(HostError::NoAircraft);
        }
        Ok(path)
    }
}
