#![allow(dead_code)]

pub mod mocks;

use std::path::{Path, PathBuf};

/// Path of a file under `tests/data`.
pub fn data_file(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// Builds owned records from string slices.
pub fn rows(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| row.iter().map(|field| field.to_string()).collect())
        .collect()
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
