//! Config sources accepted by `append`, `prepend`, `insert_*` and `replace`
//!
//! A source is a unit, a list of optional units, nothing, or a deferred
//! computation producing another source. Deferred sources are shared: they
//! run at most once, and every resolution that awaits them observes the
//! same settled result.

use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::path::Path;

use futures::future::{self, try_join_all, BoxFuture, FutureExt, Shared};
use tracing::trace;

use flat_config_core::ConfigUnit;

use crate::composer::FlatConfigComposer;
use crate::error::{ComposeError, Result};
use crate::load::read_units;

type SharedSource = Shared<BoxFuture<'static, Result<ConfigSource>>>;

/// One item handed to an insertion-class operation
#[derive(Clone, Default)]
pub enum ConfigSource {
    /// Contributes nothing
    #[default]
    Empty,
    Unit(ConfigUnit),
    /// A flat list; `None` entries are dropped
    Many(Vec<Option<ConfigUnit>>),
    Deferred(SharedSource),
}

impl ConfigSource {
    /// Defer to a future resolving to anything convertible into a source.
    ///
    /// The future is not polled until the first resolution needs it.
    pub fn deferred<F, T, E>(future: F) -> Self
    where
        F: Future<Output = std::result::Result<T, E>> + Send + 'static,
        T: Into<ConfigSource>,
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        Self::from_future(async move {
            future
                .await
                .map(Into::into)
                .map_err(ComposeError::input)
        })
    }

    pub(crate) fn from_future<F>(future: F) -> Self
    where
        F: Future<Output = Result<ConfigSource>> + Send + 'static,
    {
        ConfigSource::Deferred(future.boxed().shared())
    }

    /// Read units from a JSON or TOML file.
    ///
    /// The file is read right away, so no blocking I/O happens while the
    /// composer is resolved. A read or parse failure surfaces on resolution.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        match read_units(path.as_ref()) {
            Ok(units) => ConfigSource::from(units),
            Err(err) => Self::from_future(future::ready(Err(err))),
        }
    }

    fn into_units(self) -> Vec<ConfigUnit> {
        match self {
            ConfigSource::Empty | ConfigSource::Deferred(_) => Vec::new(),
            ConfigSource::Unit(unit) => vec![unit],
            ConfigSource::Many(units) => units.into_iter().flatten().collect(),
        }
    }
}

impl fmt::Debug for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Empty => f.write_str("Empty"),
            ConfigSource::Unit(unit) => f.debug_tuple("Unit").field(unit).finish(),
            ConfigSource::Many(units) => f.debug_tuple("Many").field(units).finish(),
            ConfigSource::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

impl From<ConfigUnit> for ConfigSource {
    fn from(unit: ConfigUnit) -> Self {
        ConfigSource::Unit(unit)
    }
}

impl From<Option<ConfigUnit>> for ConfigSource {
    fn from(unit: Option<ConfigUnit>) -> Self {
        unit.map_or(ConfigSource::Empty, ConfigSource::Unit)
    }
}

impl From<Vec<ConfigUnit>> for ConfigSource {
    fn from(units: Vec<ConfigUnit>) -> Self {
        ConfigSource::Many(units.into_iter().map(Some).collect())
    }
}

impl From<Vec<Option<ConfigUnit>>> for ConfigSource {
    fn from(units: Vec<Option<ConfigUnit>>) -> Self {
        ConfigSource::Many(units)
    }
}

impl From<FlatConfigComposer> for ConfigSource {
    fn from(composer: FlatConfigComposer) -> Self {
        Self::from_future(async move {
            let units = composer.to_configs().await?;
            Ok(ConfigSource::from(units))
        })
    }
}

/// Settle one source into its units
pub(crate) async fn resolve_source(source: &ConfigSource) -> Result<Vec<ConfigUnit>> {
    let mut pending = match source {
        ConfigSource::Deferred(shared) => shared.clone(),
        settled => return Ok(settled.clone().into_units()),
    };
    loop {
        match pending.await? {
            ConfigSource::Deferred(next) => pending = next,
            settled => return Ok(settled.into_units()),
        }
    }
}

/// Settle all sources concurrently and flatten them, preserving order
pub(crate) async fn resolve_sources(sources: &[ConfigSource]) -> Result<Vec<ConfigUnit>> {
    let settled = try_join_all(sources.iter().map(resolve_source)).await?;
    let units: Vec<ConfigUnit> = settled.into_iter().flatten().collect();
    trace!(sources = sources.len(), units = units.len(), "sources settled");
    Ok(units)
}

/// Concat sources into a single flat config array.
///
/// Deferred sources are awaited concurrently; the result is flattened one
/// level and empty entries are dropped.
pub async fn concat<I>(sources: I) -> Result<Vec<ConfigUnit>>
where
    I: IntoIterator,
    I::Item: Into<ConfigSource>,
{
    let sources: Vec<ConfigSource> = sources.into_iter().map(Into::into).collect();
    resolve_sources(&sources).await
}

/// Build a `Vec<ConfigSource>` from heterogeneous items.
///
/// ```
/// use flat_config_utils::{sources, ConfigSource, ConfigUnit};
///
/// let items = sources![
///     ConfigUnit::named("base"),
///     vec![ConfigUnit::named("a"), ConfigUnit::named("b")],
///     ConfigSource::Empty,
/// ];
/// assert_eq!(items.len(), 3);
/// ```
#[macro_export]
macro_rules! sources {
    ($($item:expr),* $(,)?) => {
        vec![$($crate::ConfigSource::from($item)),*]
    };
}
