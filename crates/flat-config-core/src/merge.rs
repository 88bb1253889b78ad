//! Config unit merge logic
//!
//! Merges units left to right with:
//! - `files` / `ignores`: CONCATENATE (left then right)
//! - `plugins`, `rules`, `languageOptions`, `linterOptions`: shallow merge by key
//! - Everything else: override (last wins)

use std::collections::BTreeMap;

use serde_json::Map;

use crate::unit::ConfigUnit;

/// Merge two units.
///
/// A structural field stays absent only when both sides lack it.
pub fn merge_pair(mut base: ConfigUnit, overlay: &ConfigUnit) -> ConfigUnit {
    if let Some(name) = &overlay.name {
        base.name = Some(name.clone());
    }

    base.files = concat(base.files, overlay.files.as_deref());
    base.ignores = concat(base.ignores, overlay.ignores.as_deref());

    base.plugins = shallow_merge(base.plugins, overlay.plugins.as_ref());
    base.rules = shallow_merge_map(base.rules, overlay.rules.as_ref());
    base.language_options =
        shallow_merge_map(base.language_options, overlay.language_options.as_ref());
    base.linter_options =
        shallow_merge_map(base.linter_options, overlay.linter_options.as_ref());

    for (key, value) in &overlay.extra {
        base.extra.insert(key.clone(), value.clone());
    }

    base
}

/// Merge multiple units in order (last has highest precedence).
///
/// There is no guarantee the merged unit behaves the same as the inputs
/// applied one after another by the linter.
pub fn merge_configs<'a, I>(units: I) -> ConfigUnit
where
    I: IntoIterator<Item = &'a ConfigUnit>,
{
    units
        .into_iter()
        .fold(ConfigUnit::default(), merge_pair)
}

fn concat<T: Clone>(base: Option<Vec<T>>, overlay: Option<&[T]>) -> Option<Vec<T>> {
    match (base, overlay) {
        (None, None) => None,
        (base, overlay) => {
            let mut merged = base.unwrap_or_default();
            merged.extend_from_slice(overlay.unwrap_or_default());
            Some(merged)
        }
    }
}

fn shallow_merge<V: Clone>(
    base: Option<BTreeMap<String, V>>,
    overlay: Option<&BTreeMap<String, V>>,
) -> Option<BTreeMap<String, V>> {
    match (base, overlay) {
        (base, None) => base,
        (base, Some(overlay)) => {
            let mut merged = base.unwrap_or_default();
            merged.extend(overlay.iter().map(|(k, v)| (k.clone(), v.clone())));
            Some(merged)
        }
    }
}

fn shallow_merge_map(
    base: Option<Map<String, serde_json::Value>>,
    overlay: Option<&Map<String, serde_json::Value>>,
) -> Option<Map<String, serde_json::Value>> {
    match (base, overlay) {
        (base, None) => base,
        (base, Some(overlay)) => {
            let mut merged = base.unwrap_or_default();
            for (key, value) in overlay {
                merged.insert(key.clone(), value.clone());
            }
            Some(merged)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::{FilePattern, Plugin};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn unit(value: serde_json::Value) -> ConfigUnit {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_files_concat_and_rules_right_bias() {
        let left = unit(json!({ "files": ["a"], "rules": { "x": 1 } }));
        let right = unit(json!({ "files": ["b"], "rules": { "x": 2, "y": 3 } }));

        let merged = merge_configs([&left, &right]);

        assert_eq!(merged, unit(json!({ "files": ["a", "b"], "rules": { "x": 2, "y": 3 } })));
    }

    #[test]
    fn test_absent_structural_fields_stay_absent() {
        let merged = merge_configs([&ConfigUnit::named("a"), &ConfigUnit::named("b")]);

        assert_eq!(merged.name.as_deref(), Some("b"));
        assert!(merged.files.is_none());
        assert!(merged.ignores.is_none());
        assert!(merged.plugins.is_none());
        assert!(merged.rules.is_none());
        assert!(merged.language_options.is_none());
        assert!(merged.linter_options.is_none());
    }

    #[test]
    fn test_ignores_keep_duplicates_in_order() {
        let left = ConfigUnit::default().with_ignores(["dist/**", "node_modules/**"]);
        let right = ConfigUnit::default().with_ignores(["dist/**"]);

        let merged = merge_configs([&left, &right]);

        assert_eq!(
            merged.ignores,
            Some(vec![
                FilePattern::from("dist/**"),
                FilePattern::from("node_modules/**"),
                FilePattern::from("dist/**"),
            ])
        );
    }

    #[test]
    fn test_plugins_keep_identity() {
        let node = Plugin::default();
        let other = Plugin::default();
        let left = ConfigUnit::default().with_plugin("node", node.clone());
        let right = ConfigUnit::default().with_plugin("other", other.clone());

        let merged = merge_configs([&left, &right]);
        let plugins = merged.plugins.unwrap();

        assert!(plugins["node"].same_instance(&node));
        assert!(plugins["other"].same_instance(&other));
    }

    #[test]
    fn test_options_shallow_merge() {
        let left = unit(json!({
            "languageOptions": { "ecmaVersion": 2020, "parserOptions": { "jsx": true } },
            "linterOptions": { "reportUnusedDisableDirectives": "warn" }
        }));
        let right = unit(json!({
            "languageOptions": { "parserOptions": { "tsx": true } }
        }));

        let merged = merge_configs([&left, &right]);

        // shallow: parserOptions is replaced, not deep merged
        assert_eq!(
            merged.language_options,
            unit(json!({
                "languageOptions": { "ecmaVersion": 2020, "parserOptions": { "tsx": true } }
            }))
            .language_options
        );
        assert_eq!(merged.linter_options, left.linter_options);
    }

    #[test]
    fn test_extra_fields_last_wins() {
        let left = ConfigUnit::default()
            .with_field("settings", json!({ "a": 1 }))
            .with_field("processor", json!("md"));
        let right = ConfigUnit::default().with_field("settings", json!({ "b": 2 }));

        let merged = merge_configs([&left, &right]);

        assert_eq!(merged.extra["settings"], json!({ "b": 2 }));
        assert_eq!(merged.extra["processor"], "md");
    }

    #[test]
    fn test_three_way_merge() {
        let a = ConfigUnit::default().with_files(["a"]);
        let b =
            ConfigUnit::default().with_files([FilePattern::Group(vec!["b".into(), "c".into()])]);
        let c = ConfigUnit::named("c").with_files(["d"]);

        let merged = merge_configs([&a, &b, &c]);

        assert_eq!(merged.name.as_deref(), Some("c"));
        assert_eq!(merged.files.unwrap().len(), 3);
    }

    #[test]
    fn test_merge_nothing() {
        assert_eq!(merge_configs(std::iter::empty::<&ConfigUnit>()), ConfigUnit::default());
    }

    #[test]
    fn test_inputs_untouched() {
        let left = ConfigUnit::default().with_rule("a", json!("error"));
        let right = ConfigUnit::default().with_rule("a", json!("off"));
        let before = left.clone();

        let _ = merge_configs([&left, &right]);

        assert_eq!(left, before);
    }
}
