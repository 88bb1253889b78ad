//! Loading config units from disk
//!
//! Supported formats:
//! - `.json`: an array of units, or a single unit object
//! - `.toml`: a `[[configs]]` array of tables
//!
//! Plugins declared in a file are plain definitions; every occurrence
//! becomes its own plugin instance.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use flat_config_core::ConfigUnit;

use crate::error::{ComposeError, Result};

/// Read config units from a JSON or TOML file
pub fn read_units(path: &Path) -> Result<Vec<ConfigUnit>> {
    let contents = fs::read_to_string(path).map_err(|e| load_error(path, e))?;

    let value = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&contents).map_err(|e| load_error(path, e))?,
        Some("toml") => {
            let table: toml::Value = toml::from_str(&contents).map_err(|e| load_error(path, e))?;
            let mut value = toml_to_json(table);
            match value.get_mut("configs").map(Value::take) {
                Some(configs) => configs,
                None => return Err(load_error(path, "missing `configs` array")),
            }
        }
        _ => return Err(load_error(path, "unsupported file extension")),
    };

    let units = units_from_value(value).map_err(|e| load_error(path, e))?;
    debug!(path = %path.display(), units = units.len(), "loaded configs");
    Ok(units)
}

fn units_from_value(value: Value) -> serde_json::Result<Vec<ConfigUnit>> {
    match value {
        Value::Array(_) => serde_json::from_value(value),
        single => serde_json::from_value(single).map(|unit| vec![unit]),
    }
}

fn load_error(path: &Path, reason: impl ToString) -> ComposeError {
    ComposeError::Load {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Convert TOML Value to JSON Value
fn toml_to_json(toml: toml::Value) -> Value {
    match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}
