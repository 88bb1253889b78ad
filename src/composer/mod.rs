//! Chainable flat config composer
//!
//! The composer records operations and only runs them when resolved:
//! 1. Insertions (`append`, `prepend`, `insert_*`, `remove`, `replace`) in call order,
//!    then inline `extends` expansion
//! 2. Adjustments (`override_config`, `overrides`, `override_rules`, `remove_rules`,
//!    `remove_plugins`) in call order, against the array left by step 1
//! 3. Plugin renames, once, over the whole array
//! 4. `on_resolved` hooks in registration order
//! 5. Plugin conflict detection, when enabled
//!
//! ```
//! use flat_config_utils::{composer, ConfigUnit};
//! use serde_json::json;
//!
//! # async fn example() -> flat_config_utils::Result<()> {
//! let configs = composer([ConfigUnit::named("base").with_rule("no-console", json!("error"))])
//!     .append([ConfigUnit::named("tests")])
//!     .insert_after("base", [ConfigUnit::named("typescript")])
//!     .rename_plugins([("import-x", "import")])
//!     .override_config("base", ConfigUnit::default().with_rule("no-console", json!("off")))
//!     .await?;
//! assert_eq!(configs.len(), 3);
//! # Ok(())
//! # }
//! ```

mod extends;
mod operations;

pub use operations::{ConfigOverride, OverrideFn, ResolvedHook};

use std::future::{Future, IntoFuture};
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;
use tracing::debug;

use flat_config_core::{rename_plugins_in_configs, ConfigUnit, RenameMap};

use crate::conflicts::{ConflictMessage, ConflictPolicy};
use crate::error::Result;
use crate::source::ConfigSource;
use crate::target::ConfigTarget;

use extends::expand_extends;
use operations::{Adjustment, Insertion};

/// Create a composer seeded with `items`.
///
/// Equivalent to `FlatConfigComposer::new().append(items)`, except that no
/// operation is queued when `items` is empty.
pub fn composer<I>(items: I) -> FlatConfigComposer
where
    I: IntoIterator,
    I::Item: Into<ConfigSource>,
{
    let sources = collect_sources(items);
    if sources.is_empty() {
        return FlatConfigComposer::new();
    }
    FlatConfigComposer::new().append(sources)
}

/// Renamed to [`composer`]
#[deprecated(note = "renamed to `composer`")]
pub fn pipe<I>(items: I) -> FlatConfigComposer
where
    I: IntoIterator,
    I::Item: Into<ConfigSource>,
{
    composer(items)
}

/// Renamed to [`FlatConfigComposer`]
#[deprecated(note = "renamed to `FlatConfigComposer`")]
pub type FlatConfigPipeline = FlatConfigComposer;

/// Deferred pipeline of flat config operations.
///
/// Builder methods consume and return the composer. Resolve with
/// [`to_configs`](Self::to_configs) or by awaiting the composer directly.
/// Resolution never mutates the composer, so it can be repeated; cloning
/// gives an independent composer that shares the already queued operations.
#[derive(Clone, Default)]
#[must_use = "a composer does nothing until it is resolved"]
pub struct FlatConfigComposer {
    operations: Vec<Insertion>,
    overrides: Vec<Adjustment>,
    resolved_hooks: Vec<ResolvedHook>,
    renames: RenameMap,
    conflicts: ConflictPolicy,
}

fn collect_sources<I>(items: I) -> Vec<ConfigSource>
where
    I: IntoIterator,
    I::Item: Into<ConfigSource>,
{
    items.into_iter().map(Into::into).collect()
}

impl FlatConfigComposer {
    /// Create an empty composer
    pub fn new() -> Self {
        Self::default()
    }

    /// Set plugin renames, like `n` -> `node` or `import-x` -> `import`.
    ///
    /// Runs once after all operations; applies to `plugins` and `rules`.
    pub fn rename_plugins<I, K, V>(mut self, renames: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.renames
            .extend(renames.into_iter().map(|(from, to)| (from.into(), to.into())));
        self
    }

    /// Append configs to the end of the array
    pub fn append<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ConfigSource>,
    {
        self.operations.push(Insertion::Append(collect_sources(items)));
        self
    }

    /// Prepend configs to the beginning of the array
    pub fn prepend<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ConfigSource>,
    {
        self.operations.push(Insertion::Prepend(collect_sources(items)));
        self
    }

    /// Insert configs before the target
    pub fn insert_before<I>(mut self, target: impl Into<ConfigTarget>, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ConfigSource>,
    {
        self.operations.push(Insertion::InsertBefore(target.into(), collect_sources(items)));
        self
    }

    /// Insert configs after the target
    pub fn insert_after<I>(mut self, target: impl Into<ConfigTarget>, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ConfigSource>,
    {
        self.operations.push(Insertion::InsertAfter(target.into(), collect_sources(items)));
        self
    }

    /// Remove the target config
    pub fn remove(mut self, target: impl Into<ConfigTarget>) -> Self {
        self.operations.push(Insertion::Remove(target.into()));
        self
    }

    /// Replace the target config with `items`
    pub fn replace<I>(mut self, target: impl Into<ConfigTarget>, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ConfigSource>,
    {
        self.operations.push(Insertion::Replace(target.into(), collect_sources(items)));
        self
    }

    /// Override the target config.
    ///
    /// A unit is merged into the target; [`ConfigOverride::with`] replaces
    /// the target with the function's result.
    pub fn override_config(
        mut self,
        target: impl Into<ConfigTarget>,
        with: impl Into<ConfigOverride>,
    ) -> Self {
        self.overrides.push(Adjustment::Override(target.into(), with.into()));
        self
    }

    /// Override several configs; `None` entries are skipped
    pub fn overrides<I, K, V>(self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Option<V>)>,
        K: Into<ConfigTarget>,
        V: Into<ConfigOverride>,
    {
        entries
            .into_iter()
            .filter_map(|(target, with)| with.map(|with| (target, with)))
            .fold(self, |composer, (target, with)| {
                composer.override_config(target, with)
            })
    }

    /// Override rule settings in **all configs**.
    ///
    /// Only rules a config already sets are touched; `None` (or `null`)
    /// removes the rule.
    pub fn override_rules<I, K, V>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Option<Value>>,
    {
        let patch = rules
            .into_iter()
            .map(|(id, setting)| (id.into(), setting.into()))
            .collect();
        self.overrides.push(Adjustment::Rules(patch));
        self
    }

    /// Remove rules from **all configs**
    pub fn remove_rules<I, S>(self, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.override_rules(rules.into_iter().map(|id| (id, None::<Value>)))
    }

    /// Remove plugins, and every rule they provide, from **all configs**
    pub fn remove_plugins<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.overrides.push(Adjustment::RemovePlugins(
            names.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Hook run once all configs are resolved, before they are returned.
    ///
    /// Returning `Ok(Some(configs))` replaces the array.
    pub fn on_resolved<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(Vec<ConfigUnit>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<Vec<ConfigUnit>>>> + Send + 'static,
    {
        self.resolved_hooks.push(Arc::new(move |configs| hook(configs).boxed()));
        self
    }

    /// Report plugin names backed by different plugin instances, using the
    /// built-in message
    pub fn check_plugin_conflicts(mut self) -> Self {
        self.conflicts.set_default(ConflictMessage::default());
        self
    }

    /// Set the conflict message for plugins without a specific message.
    ///
    /// Enables conflict detection.
    pub fn set_plugin_conflicts_error(mut self, message: impl Into<ConflictMessage>) -> Self {
        self.conflicts.set_default(message.into());
        self
    }

    /// Set the conflict message for one plugin.
    ///
    /// Enables conflict detection.
    pub fn set_plugin_conflicts_error_for(
        mut self,
        plugin_name: impl Into<String>,
        message: impl Into<ConflictMessage>,
    ) -> Self {
        self.conflicts.set(plugin_name, message.into());
        self
    }

    /// Resolve the pipeline and return the final configs.
    ///
    /// Every call runs the whole pipeline again.
    pub async fn to_configs(&self) -> Result<Vec<ConfigUnit>> {
        debug!(
            operations = self.operations.len(),
            overrides = self.overrides.len(),
            renames = self.renames.len(),
            "resolving flat configs"
        );

        let mut configs = Vec::new();
        for operation in &self.operations {
            configs = operation.apply(configs).await?;
        }
        configs = expand_extends(configs)?;
        for adjustment in &self.overrides {
            configs = adjustment.apply(configs).await?;
        }

        configs = rename_plugins_in_configs(&configs, &self.renames);

        for hook in &self.resolved_hooks {
            if let Some(replaced) = hook(configs.clone()).await? {
                configs = replaced;
            }
        }

        self.conflicts.verify(&configs)?;

        debug!(configs = configs.len(), "flat configs resolved");
        Ok(configs)
    }
}

impl IntoFuture for FlatConfigComposer {
    type Output = Result<Vec<ConfigUnit>>;
    type IntoFuture = BoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        async move { self.to_configs().await }.boxed()
    }
}
