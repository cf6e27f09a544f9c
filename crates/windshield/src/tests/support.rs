//! In-memory simulator used by the unit and behavioural suites.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use windshield_config::RainProfile;

use crate::datarefs::{
    AMBIENT_TEMPERATURE, RAIN_FORCE_FACTOR, RAIN_FRICTION_DYNAMIC, RAIN_MAX_FORCE, RAIN_SCALE,
    RAIN_SPAWN_ADJUST, WINDOW_HEAT_ON, WINDOW_ICE,
};
use crate::host::{Dataref, DatarefHandle, HostError, SimHost};

pub(crate) const ZIBO_PATH: &str =
    "/X-Plane 12/Aircraft/B737-800X/b738_4k.acf";
pub(crate) const CESSNA_PATH: &str =
    "/X-Plane 12/Aircraft/Laminar Research/Cessna 172 SP/Cessna_172SP.acf";

/// Simulator double holding datarefs in hash maps.
#[derive(Debug, Default)]
pub(crate) struct FakeHost {
    names: RefCell<Vec<String>>,
    floats: RefCell<HashMap<String, f32>>,
    ints: RefCell<HashMap<String, i32>>,
    read_only: RefCell<HashSet<String>>,
    aircraft: RefCell<Option<String>>,
    writes: RefCell<Vec<(String, f32)>>,
}

impl FakeHost {
    /// A simulator publishing every dataref with stock values, no aircraft.
    pub(crate) fn stock() -> Self {
        let host = Self::default();
        host.publish_rain(&RainProfile::simulator_default());
        host.publish_float(AMBIENT_TEMPERATURE, 15.0);
        host.publish_int(WINDOW_HEAT_ON, 0);
        host.publish_float(WINDOW_ICE, 0.0);
        host
    }

    pub(crate) fn publish_rain(&self, profile: &RainProfile) {
        self.publish_float(RAIN_FORCE_FACTOR, profile.force_factor);
        self.publish_float(RAIN_FRICTION_DYNAMIC, profile.friction_dynamic);
        self.publish_float(RAIN_MAX_FORCE, profile.max_force);
        self.publish_float(RAIN_SCALE, profile.scale);
        self.publish_float(RAIN_SPAWN_ADJUST, profile.spawn_adjust);
    }

    pub(crate) fn publish_float(&self, name: &str, value: f32) {
        self.register(name);
        self.floats.borrow_mut().insert(name.to_owned(), value);
    }

    pub(crate) fn publish_int(&self, name: &str, value: i32) {
        self.register(name);
        self.ints.borrow_mut().insert(name.to_owned(), value);
    }

    pub(crate) fn withdraw(&self, name: &str) {
        self.floats.borrow_mut().remove(name);
        self.ints.borrow_mut().remove(name);
    }

    pub(crate) fn make_read_only(&self, name: &str) {
        self.read_only.borrow_mut().insert(name.to_owned());
    }

    pub(crate) fn load_aircraft(&self, path: &str) {
        *self.aircraft.borrow_mut() = Some(path.to_owned());
    }

    pub(crate) fn unload_aircraft(&self) {
        *self.aircraft.borrow_mut() = None;
    }

    pub(crate) fn float(&self, name: &str) -> Option<f32> {
        self.floats.borrow().get(name).copied()
    }

    pub(crate) fn rain_profile(&self) -> Option<RainProfile> {
        Some(RainProfile {
            force_factor: self.float(RAIN_FORCE_FACTOR)?,
            friction_dynamic: self.float(RAIN_FRICTION_DYNAMIC)?,
            max_force: self.float(RAIN_MAX_FORCE)?,
            scale: self.float(RAIN_SCALE)?,
            spawn_adjust: self.float(RAIN_SPAWN_ADJUST)?,
        })
    }

    pub(crate) fn writes(&self) -> Vec<(String, f32)> {
        self.writes.borrow().clone()
    }

    pub(crate) fn clear_writes(&self) {
        self.writes.borrow_mut().clear();
    }

    fn register(&self, name: &str) {
        let mut names = self.names.borrow_mut();
        if !names.iter().any(|known| known == name) {
            names.push(name.to_owned());
        }
    }

    fn is_published(&self, name: &str) -> bool {
        self.floats.borrow().contains_key(name) || self.ints.borrow().contains_key(name)
    }
}

impl SimHost for FakeHost {
    fn find_dataref(&self, name: &str) -> Result<DatarefHandle, HostError> {
        if !self.is_published(name) {
            return Err(HostError::DatarefNotFound {
                name: name.to_owned(),
            });
        }
        self.names
            .borrow()
            .iter()
            .position(|known| known == name)
            .map(DatarefHandle::from_raw)
            .ok_or_else(|| HostError::DatarefNotFound {
                name: name.to_owned(),
            })
    }

    fn read_float(&self, dataref: &Dataref) -> Result<f32, HostError> {
        self.float(dataref.name()).ok_or_else(|| HostError::Read {
            name: dataref.name().to_owned(),
            message: "withdrawn".to_owned(),
        })
    }

    fn write_float(&self, dataref: &Dataref, value: f32) -> Result<(), HostError> {
        let name = dataref.name();
        if self.read_only.borrow().contains(name) {
            return Err(HostError::NotWritable {
                name: name.to_owned(),
            });
        }
        let mut floats = self.floats.borrow_mut();
        let Some(slot) = floats.get_mut(name) else {
            return Err(HostError::Write {
                name: name.to_owned(),
                message: "withdrawn".to_owned(),
            });
        };
        *slot = value;
        self.writes.borrow_mut().push((name.to_owned(), value));
        Ok(())
    }

    fn read_int(&self, dataref: &Dataref) -> Result<i32, HostError> {
        self.ints
            .borrow()
            .get(dataref.name())
            .copied()
            .ok_or_else(|| HostError::Read {
                name: dataref.name().to_owned(),
                message: "withdrawn".to_owned(),
            })
    }

    fn user_aircraft_path(&self) -> Result<String, HostError> {
        self.aircraft.borrow().clone().ok_or(HostError::NoAircraft)
    }
}
