//! Inline `extends` expansion
//!
//! A unit carrying an `extends` array is replaced by the units it extends,
//! each scoped to the parent's `files` and `ignores`, followed by the parent
//! itself without the `extends` key. Extended units may extend further.
//!
//! Entries are plain unit definitions. Every plugin they declare is a new
//! plugin instance, as with units loaded from a file. String references to
//! named shareable configs cannot be looked up and are rejected.

use serde_json::Value;
use tracing::trace;

use flat_config_core::ConfigUnit;

use crate::error::{ComposeError, Result};

const EXTENDS_KEY: &str = "extends";

/// Expand every `extends` array in `units`, keeping the array order
pub(crate) fn expand_extends(units: Vec<ConfigUnit>) -> Result<Vec<ConfigUnit>> {
    if !units.iter().any(|unit| unit.extra.contains_key(EXTENDS_KEY)) {
        return Ok(units);
    }

    let mut expanded = Vec::with_capacity(units.len());
    for (index, unit) in units.into_iter().enumerate() {
        expand_unit(unit, index, &mut expanded)?;
    }
    Ok(expanded)
}

fn expand_unit(mut unit: ConfigUnit, index: usize, out: &mut Vec<ConfigUnit>) -> Result<()> {
    let Some(extends) = unit.extra.remove(EXTENDS_KEY) else {
        out.push(unit);
        return Ok(());
    };
    let config = unit.display_name(index);

    let mut extended = Vec::new();
    for (position, entry) in flatten_entries(extends).into_iter().enumerate() {
        let child = match entry {
            Value::Object(_) => serde_json::from_value::<ConfigUnit>(entry)
                .map_err(|e| invalid_extends(&config, e))?,
            Value::String(reference) => {
                return Err(invalid_extends(
                    &config,
                    format!("cannot resolve config reference \"{}\"", reference),
                ))
            }
            other => return Err(invalid_extends(&config, format!("unexpected entry {}", other))),
        };
        expand_unit(child, position, &mut extended)?;
    }

    trace!(config = %config, extended = extended.len(), "extends expanded");
    out.extend(extended.into_iter().map(|child| scope_to_parent(&unit, child)));
    out.push(unit);
    Ok(())
}

/// `extends` may nest arrays one level deep; a single object is accepted too
fn flatten_entries(extends: Value) -> Vec<Value> {
    match extends {
        Value::Array(entries) => entries
            .into_iter()
            .flat_map(|entry| match entry {
                Value::Array(nested) => nested,
                single => vec![single],
            })
            .collect(),
        Value::Null => Vec::new(),
        single => vec![single],
    }
}

/// Restrict an extended unit to where its parent applies
fn scope_to_parent(parent: &ConfigUnit, mut child: ConfigUnit) -> ConfigUnit {
    child.name = match (&parent.name, child.name.take()) {
        (Some(parent_name), Some(child_name)) => {
            Some(format!("{} > {}", parent_name, child_name))
        }
        (parent_name, child_name) => child_name.or_else(|| parent_name.clone()),
    };

    if let Some(parent_files) = &parent.files {
        child.files = Some(match child.files.take() {
            None => parent_files.clone(),
            Some(child_files) => parent_files
                .iter()
                .flat_map(|outer| child_files.iter().map(move |inner| outer.intersect(inner)))
                .collect(),
        });
    }

    if let Some(parent_ignores) = &parent.ignores {
        let mut ignores = parent_ignores.clone();
        ignores.extend(child.ignores.take().unwrap_or_default());
        child.ignores = Some(ignores);
    }

    child
}

fn invalid_extends(config: &str, reason: impl ToString) -> ComposeError {
    ComposeError::InvalidExtends {
        config: config.to_string(),
        reason: reason.to_string(),
    }
}
