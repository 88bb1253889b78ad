//! Addressing of config units by index or name

use std::fmt;

use flat_config_core::ConfigUnit;

use crate::error::{ComposeError, Result};

/// Position of a unit in the config array, or its `name`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConfigTarget {
    Index(isize),
    Name(String),
}

impl From<&str> for ConfigTarget {
    fn from(name: &str) -> Self {
        ConfigTarget::Name(name.to_string())
    }
}

impl From<String> for ConfigTarget {
    fn from(name: String) -> Self {
        ConfigTarget::Name(name)
    }
}

impl From<&String> for ConfigTarget {
    fn from(name: &String) -> Self {
        ConfigTarget::Name(name.clone())
    }
}

impl From<isize> for ConfigTarget {
    fn from(index: isize) -> Self {
        ConfigTarget::Index(index)
    }
}

impl From<i32> for ConfigTarget {
    fn from(index: i32) -> Self {
        ConfigTarget::Index(index as isize)
    }
}

impl From<usize> for ConfigTarget {
    fn from(index: usize) -> Self {
        ConfigTarget::Index(isize::try_from(index).unwrap_or(isize::MAX))
    }
}

impl fmt::Display for ConfigTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigTarget::Index(index) => write!(f, "#{}", index),
            ConfigTarget::Name(name) => write!(f, "\"{}\"", name),
        }
    }
}

/// Resolve a target to a position in `units`.
///
/// Duplicate names resolve to the first match. A miss reports the names
/// known at the time of the lookup.
pub fn locate(units: &[ConfigUnit], target: &ConfigTarget) -> Result<usize> {
    match target {
        ConfigTarget::Index(index) => usize::try_from(*index)
            .ok()
            .filter(|i| *i < units.len())
            .ok_or(ComposeError::IndexOutOfRange {
                index: *index,
                total: units.len(),
            }),
        ConfigTarget::Name(name) => units
            .iter()
            .position(|unit| unit.name.as_deref() == Some(name.as_str()))
            .ok_or_else(|| {
                let available: Vec<String> = units
                    .iter()
                    .filter_map(|unit| unit.name.clone())
                    .filter(|name| !name.is_empty())
                    .collect();
                ComposeError::NameNotFound {
                    name: name.clone(),
                    unnamed: units.len() - available.len(),
                    available,
                }
            }),
    }
}
