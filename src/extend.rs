//! Extending configs that live in another directory

use flat_config_core::{rebase_globs, ConfigUnit};

use crate::error::Result;
use crate::source::{resolve_source, ConfigSource};

/// Resolve `source` and rebase its `files` / `ignores` globs under
/// `relative_path`.
///
/// ```
/// use flat_config_utils::{composer, extend, ConfigSource};
///
/// # async fn example() -> flat_config_utils::Result<()> {
/// let configs = composer([ConfigSource::from(
///     extend(ConfigSource::from_path("packages/app/configs.json"), "packages/app").await?,
/// )])
/// .await?;
/// # Ok(())
/// # }
/// ```
pub async fn extend(
    source: impl Into<ConfigSource>,
    relative_path: &str,
) -> Result<Vec<ConfigUnit>> {
    let units = resolve_source(&source.into()).await?;
    Ok(rebase_globs(units, relative_path))
}
