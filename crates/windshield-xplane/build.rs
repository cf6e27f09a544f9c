//! Build script: link the XPLM stub library on platforms that need it.
//!
//! Linux resolves XPLM symbols when the simulator loads the plugin. macOS
//! defers them the same way through `dynamic_lookup`. Windows needs the
//! `XPLM_64.lib` import library from the SDK named by `XPLANE_SDK_PATH`.

use std::env;
use std::path::PathBuf;

const SDK_ENV: &str = "XPLANE_SDK_PATH";

fn main() {
    println!("cargo:rerun-if-env-changed={SDK_ENV}");
    println!("cargo:rerun-if-env-changed=CARGO_CFG_TARGET_OS");

    let target_os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    match target_os.as_str() {
        "macos" => {
            println!("cargo:rustc-cdylib-link-arg=-undefined");
            println!("cargo:rustc-cdylib-link-arg=dynamic_lookup");
        }
        "windows" => match env::var_os(SDK_ENV) {
            Some(sdk) => {
                let libraries = PathBuf::from(sdk).join("Libraries").join("Win");
                println!("cargo:rustc-link-search=native={}", libraries.display());
                println!("cargo:rustc-link-lib=dylib=XPLM_64");
            }
            None => {
                println!("cargo:warning={SDK_ENV} is not set; linking XPLM will fail");
            }
        },
        _ => {}
    }
}
