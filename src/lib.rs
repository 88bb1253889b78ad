//! Flat Config Utils - composable linter flat configs
//!
//! This crate builds a linter's flat config array through a chainable,
//! deferred pipeline: append, prepend, insert around named configs, replace,
//! remove, override, rename plugin prefixes, patch rules, and detect
//! duplicated plugin instances. Nothing runs until the composer is resolved.

pub mod composer;
pub mod conflicts;
pub mod error;
pub mod extend;
pub mod load;
pub mod source;
pub mod target;

pub use composer::{composer, ConfigOverride, FlatConfigComposer};
#[allow(deprecated)]
pub use composer::{pipe, FlatConfigPipeline};
pub use conflicts::{ConflictMessage, ConflictPolicy, DEFAULT_PLUGIN_CONFLICTS_ERROR};
pub use error::{ComposeError, Result};
pub use extend::extend;
pub use source::{concat, ConfigSource};
pub use target::ConfigTarget;

pub use flat_config_core::{
    merge_configs, parse_rule_id, rename_plugins_in_configs, rename_plugins_in_rules, ConfigUnit,
    FilePattern, Plugin, RenameMap, RuleId, RuleMap,
};
