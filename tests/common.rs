//! Test utilities & fixtures.

use std::path::Path;

/// Initialize test logging once (RUST_LOG controls verbosity).
#[allow(dead_code)] // Not every test binary pulls this in.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Write a fixture file under `root/rel`, creating parent directories.
#[allow(dead_code)]
pub fn write_fixture(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}
