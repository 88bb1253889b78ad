//! Flat config object algebra.
//!
//! Pure, synchronous helpers over flat config units: the data model, the
//! structural merge, plugin prefix renames, rule id parsing and glob
//! rebasing. The async composer lives in `flat-config-utils`.

mod extend;
mod merge;
mod parse;
mod rename;
mod unit;

pub use extend::{join_glob, join_path, rebase_globs};
pub use merge::{merge_configs, merge_pair};
pub use parse::{parse_rule_id, RuleId};
pub use rename::{rename_plugins_in_configs, rename_plugins_in_rules, rename_rule_id, RenameMap};
pub use unit::{ConfigUnit, FilePattern, Plugin, PluginId, PluginMap, RuleMap};
