//! Shared helpers for composer integration tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use flat_config_utils::ConfigUnit;

/// Path to a config fixture under `tests/fixtures/configs`
pub fn config_path(file: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/configs")
        .join(file)
}

/// Parse a unit from JSON
pub fn unit(value: serde_json::Value) -> ConfigUnit {
    serde_json::from_value(value).expect("fixture unit")
}

/// Names of the units, `""` for unnamed ones
pub fn names(configs: &[ConfigUnit]) -> Vec<String> {
    configs
        .iter()
        .map(|c| c.name.clone().unwrap_or_default())
        .collect()
}
