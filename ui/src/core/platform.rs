//! Platform glue: where the page finds its data.

/// Environment variable naming the directory holding `tests.json` and
/// `history.json` on native targets.
pub const DATA_DIR_ENV: &str = "TESTWATCH_DATA_DIR";

/// Web builds fetch the payloads relative to the page instead.
#[cfg(not(target_arch = "wasm32"))]
pub fn data_dir() -> std::path::PathBuf {
    std::env::var_os(DATA_DIR_ENV)
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|| std::path::PathBuf::from("."))
}
