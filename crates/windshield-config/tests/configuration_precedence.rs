//! Layering of defaults, the plugin file and environment overrides.

use std::cell::RefCell;
use std::ffi::OsString;
use std::fs;
use std::sync::{Mutex, MutexGuard, PoisonError};

use camino::Utf8PathBuf;
use once_cell::sync::Lazy;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

use windshield_config::{
    CONFIG_PATH_ENV, Config, ConfigLoader, FileConfigLoader, LOG_FILTER_ENV,
};

static ENV_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

struct Harness {
    temp_dir: TempDir,
    env_overrides: RefCell<Vec<(&'static str, Option<OsString>)>>,
    loaded: RefCell<Option<Config>>,
    error: RefCell<Option<String>>,
    _guard: MutexGuard<'static, ()>,
}

impl Harness {
    fn new() -> Self {
        let guard = ENV_MUTEX.lock().unwrap_or_else(PoisonError::into_inner);
        let temp_dir = match TempDir::new() {
            Ok(dir) => dir,
            Err(error) => panic!("failed to create temporary directory: {error}"),
        };
        let harness = Self {
            temp_dir,
            env_overrides: RefCell::new(Vec::new()),
            loaded: RefCell::new(None),
            error: RefCell::new(None),
            _guard: guard,
        };
        // Start every scenario from a clean slate, whatever the outer shell set.
        harness.clear_env(CONFIG_PATH_ENV);
        harness.clear_env(LOG_FILTER_ENV);
        harness
    }

    fn plugin_file_path(&self) -> Utf8PathBuf {
        self.utf8_path("windshield.toml")
    }

    fn utf8_path(&self, name: &str) -> Utf8PathBuf {
        match Utf8PathBuf::from_path_buf(self.temp_dir.path().join(name)) {
            Ok(path) => path,
            Err(path) => panic!("temporary path is not UTF-8: {}", path.display()),
        }
    }

    fn write(&self, path: &Utf8PathBuf, contents: &str) {
        if let Err(error) = fs::write(path, contents) {
            panic!("failed to write configuration: {error}");
        }
    }

    fn set_env(&self, key: &'static str, value: &str) {
        let previous = std::env::var_os(key);
        // Environment mutation is `unsafe` in edition 2024. Overrides are
        // serialised by `ENV_MUTEX` and restored in `Drop`.
        unsafe { std::env::set_var(key, value) };
        self.env_overrides.borrow_mut().push((key, previous));
    }

    fn clear_env(&self, key: &'static str) {
        let previous = std::env::var_os(key);
        unsafe { std::env::remove_var(key) };
        self.env_overrides.borrow_mut().push((key, previous));
    }

    fn load(&self) {
        if self.loaded.borrow().is_some() || self.error.borrow().is_some() {
            return;
        }

        let loader = FileConfigLoader::new(self.plugin_file_path());
        match loader.load() {
            Ok(config) => *self.loaded.borrow_mut() = Some(config),
            Err(error) => *self.error.borrow_mut() = Some(error.to_string()),
        }
    }

    fn config(&self) -> Config {
        if let Some(error) = self.error.borrow().as_ref() {
            panic!("configuration failed to load: {error}");
        }
        match self.loaded.borrow().as_ref() {
            Some(config) => config.clone(),
            None => panic!("configuration was not loaded"),
        }
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        let mut overrides = self.env_overrides.borrow_mut();
        while let Some((key, value)) = overrides.pop() {
            match value {
                Some(os_value) => unsafe { std::env::set_var(key, os_value) },
                None => unsafe { std::env::remove_var(key) },
            }
        }
    }
}

fn parse_number(text: &str) -> f32 {
    match text.trim().parse::<f32>() {
        Ok(value) => value,
        Err(error) => panic!("invalid number '{text}': {error}"),
    }
}

#[fixture]
fn harness() -> Harness {
    Harness::new()
}

#[given("no configuration file is present")]
fn given_no_file(harness: &Harness) {
    assert!(!harness.plugin_file_path().exists());
}

#[given("the plugin configuration file sets the poll interval to {seconds}")]
fn given_plugin_interval(harness: &Harness, seconds: String) {
    let path = harness.plugin_file_path();
    harness.write(&path, &format!("poll_interval = {}\n", parse_number(&seconds)));
}

#[given("the plugin configuration file sets the log filter to \"{filter}\"")]
fn given_plugin_filter(harness: &Harness, filter: String) {
    let path = harness.plugin_file_path();
    harness.write(&path, &format!("log_filter = \"{filter}\"\n"));
}

#[given("the environment points at a file setting the poll interval to {seconds}")]
fn given_env_file(harness: &Harness, seconds: String) {
    let path = harness.utf8_path("override.toml");
    harness.write(&path, &format!("poll_interval = {}\n", parse_number(&seconds)));
    harness.set_env(CONFIG_PATH_ENV, path.as_str());
}

#[given("the environment points at a missing file")]
fn given_env_missing_file(harness: &Harness) {
    let path = harness.utf8_path("absent.toml");
    harness.set_env(CONFIG_PATH_ENV, path.as_str());
}

#[given("the environment overrides the log filter to \"{filter}\"")]
fn given_env_filter(harness: &Harness, filter: String) {
    harness.set_env(LOG_FILTER_ENV, &filter);
}

#[when("the configuration is loaded")]
fn when_loaded(harness: &Harness) {
    harness.load();
}

#[then("loading succeeds")]
fn then_succeeds(harness: &Harness) {
    let _ = harness.config();
}

#[then("loading fails mentioning \"{fragment}\"")]
fn then_fails(harness: &Harness, fragment: String) {
    let error = harness.error.borrow();
    let Some(message) = error.as_ref() else {
        panic!("configuration loaded unexpectedly");
    };
    assert!(
        message.contains(&fragment),
        "expected '{fragment}' in error, got {message:?}"
    );
}

#[then("the poll interval is {seconds}")]
fn then_interval(harness: &Harness, seconds: String) {
    assert_eq!(harness.config().poll_interval, parse_number(&seconds));
}

#[then("the log filter is \"{filter}\"")]
fn then_filter(harness: &Harness, filter: String) {
    assert_eq!(harness.config().log_filter, filter);
}

#[then("the aircraft marker list is \"{marker}\"")]
fn then_markers(harness: &Harness, marker: String) {
    assert_eq!(harness.config().aircraft_markers, vec![marker]);
}

#[scenario(
    path = "tests/features/configuration_precedence.feature",
    name = "Built-in defaults apply without a configuration file"
)]
fn defaults_without_file(#[from(harness)] harness: Harness) {
    let _ = harness;
}

#[scenario(
    path = "tests/features/configuration_precedence.feature",
    name = "The file beside the plugin overrides defaults"
)]
fn plugin_file_overrides_defaults(#[from(harness)] harness: Harness) {
    let _ = harness;
}

#[scenario(
    path = "tests/features/configuration_precedence.feature",
    name = "The environment path takes precedence over the plugin file"
)]
fn environment_path_wins(#[from(harness)] harness: Harness) {
    let _ = harness;
}

#[scenario(
    path = "tests/features/configuration_precedence.feature",
    name = "The environment overrides the log filter"
)]
fn environment_filter_wins(#[from(harness)] harness: Harness) {
    let _ = harness;
}

#[scenario(
    path = "tests/features/configuration_precedence.feature",
    name = "A missing explicit file is an error"
)]
fn missing_explicit_file_fails(#[from(harness)] harness: Harness) {
    let _ = harness;
}
