//! Crate-level test doubles and behavioural suites.

use mockall::mock;

use crate::host::{Dataref, DatarefHandle, HostError, SimHost};

pub(crate) mod support;

mock! {
    pub Host {}
    impl SimHost for Host {
        fn find_dataref(&self, name: &str) -> Result<DatarefHandle, HostError>;
        fn read_float(&self, dataref: &Dataref) -> Result<f32, HostError>;
        fn write_float(&self, dataref: &Dataref, value: f32) -> Result<(), HostError>;
        fn read_int(&self, dataref: &Dataref) -> Result<i32, HostError>;
        fn user_aircraft_path(&self) -> Result<String, HostError>;
    }
}

/// A mock that resolves every name, handing out sequential handles.
pub(crate) fn resolving_host() -> MockHost {
    let mut host = MockHost::new();
    let mut next = 0_usize;
    host.expect_find_dataref().returning(move |_| {
        next += 1;
        Ok(DatarefHandle::from_raw(next))
    });
    host
}
