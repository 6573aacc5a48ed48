//! Command: print version information.

/// The build version: `MACSETUP_VERSION` from the build script when set,
/// otherwise the package version.
#[must_use]
pub const fn version() -> &'static str {
    match option_env!("MACSETUP_VERSION") {
        Some(v) => v,
        None => env!("CARGO_PKG_VERSION"),
    }
}

/// Print the macsetup version to stdout.
pub fn run() {
    println!("macsetup {}", version());
}
