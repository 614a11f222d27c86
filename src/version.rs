//! Version and build.

/// Return the program name.
pub const fn name() -> &'static str {
    match option_env!("PROGRAM_NAME") {
        Some(s) => s,
        None => "aaiclock",
    }
}

/// Return the program version.
pub const fn version() -> Option<&'static str> {
    option_env!("CARGO_PKG_VERSION")
}

/// One-line `name version` banner for `--version`.
pub fn banner() -> String {
    format!("{} {}", name(), version().unwrap_or("unknown"))
}
