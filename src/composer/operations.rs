//! Queued composer operations
//!
//! Operations are plain data. Insertions change which units are present and
//! where; adjustments change the content of units that are already there.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;
use tracing::trace;

use flat_config_core::{merge_configs, parse_rule_id, ConfigUnit};

use crate::error::Result;
use crate::source::{resolve_sources, ConfigSource};
use crate::target::{locate, ConfigTarget};

/// Async replacement for one unit
pub type OverrideFn =
    Arc<dyn Fn(ConfigUnit) -> BoxFuture<'static, Result<ConfigUnit>> + Send + Sync>;

/// Hook run on the resolved array; `Some` replaces the array
pub type ResolvedHook = Arc<dyn Fn(Vec<ConfigUnit>) -> HookFuture + Send + Sync>;

type HookFuture = BoxFuture<'static, Result<Option<Vec<ConfigUnit>>>>;

/// How `override_config` changes its target
#[derive(Clone)]
pub enum ConfigOverride {
    /// Merge the patch into the target unit
    Merge(ConfigUnit),
    /// Replace the target with the function's result
    Replace(OverrideFn),
}

impl ConfigOverride {
    /// Replace the target unit with the output of an async function
    pub fn with<F, Fut>(f: F) -> Self
    where
        F: Fn(ConfigUnit) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ConfigUnit>> + Send + 'static,
    {
        ConfigOverride::Replace(Arc::new(move |unit| f(unit).boxed()))
    }
}

impl From<ConfigUnit> for ConfigOverride {
    fn from(patch: ConfigUnit) -> Self {
        ConfigOverride::Merge(patch)
    }
}

impl fmt::Debug for ConfigOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigOverride::Merge(patch) => f.debug_tuple("Merge").field(patch).finish(),
            ConfigOverride::Replace(_) => f.write_str("Replace(..)"),
        }
    }
}

/// Operations that add, move or remove units
#[derive(Debug, Clone)]
pub(crate) enum Insertion {
    Append(Vec<ConfigSource>),
    Prepend(Vec<ConfigSource>),
    InsertBefore(ConfigTarget, Vec<ConfigSource>),
    InsertAfter(ConfigTarget, Vec<ConfigSource>),
    Remove(ConfigTarget),
    Replace(ConfigTarget, Vec<ConfigSource>),
}

impl Insertion {
    pub(crate) async fn apply(&self, mut units: Vec<ConfigUnit>) -> Result<Vec<ConfigUnit>> {
        match self {
            Insertion::Append(sources) => {
                units.extend(resolve_sources(sources).await?);
            }
            Insertion::Prepend(sources) => {
                let mut resolved = resolve_sources(sources).await?;
                resolved.append(&mut units);
                units = resolved;
            }
            Insertion::InsertBefore(target, sources) => {
                let resolved = resolve_sources(sources).await?;
                let index = locate(&units, target)?;
                units.splice(index..index, resolved);
            }
            Insertion::InsertAfter(target, sources) => {
                let resolved = resolve_sources(sources).await?;
                let index = locate(&units, target)? + 1;
                units.splice(index..index, resolved);
            }
            Insertion::Remove(target) => {
                let index = locate(&units, target)?;
                units.remove(index);
            }
            Insertion::Replace(target, sources) => {
                let resolved = resolve_sources(sources).await?;
                let index = locate(&units, target)?;
                units.splice(index..=index, resolved);
            }
        }
        trace!(operation = self.kind(), units = units.len(), "insertion applied");
        Ok(units)
    }

    fn kind(&self) -> &'static str {
        match self {
            Insertion::Append(_) => "append",
            Insertion::Prepend(_) => "prepend",
            Insertion::InsertBefore(..) => "insert_before",
            Insertion::InsertAfter(..) => "insert_after",
            Insertion::Remove(_) => "remove",
            Insertion::Replace(..) => "replace",
        }
    }
}

/// Operations that rewrite units in place; they run after every insertion
#[derive(Debug, Clone)]
pub(crate) enum Adjustment {
    Override(ConfigTarget, ConfigOverride),
    /// Rule id -> new setting; `None` or `null` deletes the rule
    Rules(Vec<(String, Option<Value>)>),
    RemovePlugins(Vec<String>),
}

impl Adjustment {
    pub(crate) async fn apply(&self, mut units: Vec<ConfigUnit>) -> Result<Vec<ConfigUnit>> {
        match self {
            Adjustment::Override(target, with) => {
                let index = locate(&units, target)?;
                let current = units[index].clone();
                units[index] = match with {
                    ConfigOverride::Merge(patch) => merge_configs([&current, patch]),
                    ConfigOverride::Replace(replace) => replace(current).await?,
                };
                trace!(config = %target, "override applied");
            }
            Adjustment::Rules(patch) => {
                for rules in units.iter_mut().filter_map(|unit| unit.rules.as_mut()) {
                    for (id, setting) in patch {
                        if !rules.contains_key(id) {
                            continue;
                        }
                        match setting {
                            Some(value) if !value.is_null() => {
                                rules.insert(id.clone(), value.clone());
                            }
                            _ => {
                                rules.remove(id);
                            }
                        }
                    }
                }
                trace!(rules = patch.len(), "rule overrides applied");
            }
            Adjustment::RemovePlugins(names) => {
                let is_removed = |id: &str| {
                    parse_rule_id(id)
                        .plugin
                        .is_some_and(|plugin| names.iter().any(|name| name == plugin))
                };
                for unit in units.iter_mut() {
                    if let Some(plugins) = unit.plugins.as_mut() {
                        plugins.retain(|name, _| !names.contains(name));
                    }
                    if let Some(rules) = unit.rules.as_mut() {
                        rules.retain(|id, _| !is_removed(id));
                    }
                }
                trace!(plugins = ?names, "plugins removed");
            }
        }
        Ok(units)
    }
}
