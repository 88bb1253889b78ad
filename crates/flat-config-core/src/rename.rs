//! Plugin prefix renames
//!
//! Renames apply to plugin keys (exact match) and to rule ids
//! (`<prefix>/<rule>`), e.g. `import-x` -> `import` turns
//! `import-x/order` into `import/order`.

use std::collections::BTreeMap;

use crate::unit::{ConfigUnit, PluginMap, RuleMap};

/// Source prefix -> target prefix
pub type RenameMap = BTreeMap<String, String>;

/// Rename the plugin prefix of a single rule id.
///
/// The first prefix in map order that matches wins; ids without a matching
/// prefix are returned unchanged.
pub fn rename_rule_id(id: &str, map: &RenameMap) -> String {
    for (from, to) in map {
        if let Some(rest) = id.strip_prefix(from.as_str()) {
            if rest.starts_with('/') {
                return format!("{}{}", to, rest);
            }
        }
    }
    id.to_string()
}

/// Rename plugin prefixes in a rule map
pub fn rename_plugins_in_rules(rules: &RuleMap, map: &RenameMap) -> RuleMap {
    rules
        .iter()
        .map(|(id, setting)| (rename_rule_id(id, map), setting.clone()))
        .collect()
}

fn rename_plugin_keys(plugins: &PluginMap, map: &RenameMap) -> PluginMap {
    plugins
        .iter()
        .map(|(name, plugin)| {
            let name = map.get(name).unwrap_or(name);
            (name.clone(), plugin.clone())
        })
        .collect()
}

/// Rename plugins in a flat config array, returning new units
pub fn rename_plugins_in_configs(units: &[ConfigUnit], map: &RenameMap) -> Vec<ConfigUnit> {
    units
        .iter()
        .map(|unit| {
            let mut renamed = unit.clone();
            if let Some(rules) = &unit.rules {
                renamed.rules = Some(rename_plugins_in_rules(rules, map));
            }
            if let Some(plugins) = &unit.plugins {
                renamed.plugins = Some(rename_plugin_keys(plugins, map));
            }
            renamed
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::Plugin;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn map(entries: &[(&str, &str)]) -> RenameMap {
        entries
            .iter()
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect()
    }

    #[test]
    fn test_rename_rules() {
        let rules: RuleMap = serde_json::from_value(json!({
            "@typescript-eslint/indent": "error",
            "import-x/order": ["warn", { "alphabetize": true }],
            "no-console": "off"
        }))
        .unwrap();

        let renamed = rename_plugins_in_rules(
            &rules,
            &map(&[("@typescript-eslint", "ts"), ("import-x", "import")]),
        );

        let expected: RuleMap = serde_json::from_value(json!({
            "ts/indent": "error",
            "import/order": ["warn", { "alphabetize": true }],
            "no-console": "off"
        }))
        .unwrap();
        assert_eq!(renamed, expected);
    }

    #[test]
    fn test_prefix_must_end_at_slash() {
        let renames = map(&[("n", "node")]);

        assert_eq!(rename_rule_id("n/no-sync", &renames), "node/no-sync");
        assert_eq!(rename_rule_id("no-sync", &renames), "no-sync");
        assert_eq!(rename_rule_id("n", &renames), "n");
    }

    #[test]
    fn test_only_first_prefix_replaced() {
        let renames = map(&[("a", "b"), ("b", "c")]);

        assert_eq!(rename_rule_id("a/b/rule", &renames), "b/b/rule");
    }

    #[test]
    fn test_rename_configs_plugins_and_rules() {
        let plugin = Plugin::default();
        let units = vec![
            ConfigUnit::named("with-plugin")
                .with_plugin("import-x", plugin.clone())
                .with_plugin("unicorn", Plugin::default())
                .with_rule("import-x/foo", json!("error")),
            ConfigUnit::named("plain"),
        ];

        let renamed = rename_plugins_in_configs(&units, &map(&[("import-x", "x")]));

        let plugins = renamed[0].plugins.as_ref().unwrap();
        assert!(plugins["x"].same_instance(&plugin));
        assert!(plugins.contains_key("unicorn"));
        assert!(!plugins.contains_key("import-x"));
        assert_eq!(renamed[0].rules.as_ref().unwrap()["x/foo"], "error");
        assert_eq!(renamed[1], units[1]);

        // source untouched
        assert!(units[0].plugins.as_ref().unwrap().contains_key("import-x"));
    }

    #[test]
    fn test_empty_map_is_identity() {
        let units = vec![ConfigUnit::named("a").with_rule("n/x", json!("warn"))];

        assert_eq!(rename_plugins_in_configs(&units, &RenameMap::new()), units);
    }
}
