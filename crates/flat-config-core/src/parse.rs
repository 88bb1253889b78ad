//! Rule id parsing

/// A rule id split into its plugin prefix and rule name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleId<'a> {
    /// Plugin prefix, `None` for core rules
    pub plugin: Option<&'a str>,
    pub rule: &'a str,
}

/// Split a rule id into plugin and rule.
///
/// Scoped plugins follow the npm convention: `@scope/pkg/rule` belongs to
/// `@scope/pkg`, while `@scope/rule` belongs to `@scope`.
pub fn parse_rule_id(id: &str) -> RuleId<'_> {
    let Some(first) = id.find('/') else {
        return RuleId {
            plugin: None,
            rule: id,
        };
    };

    let end = if id.starts_with('@') {
        id[first + 1..]
            .find('/')
            .map(|offset| first + 1 + offset)
            .unwrap_or(first)
    } else {
        first
    };

    RuleId {
        plugin: Some(&id[..end]),
        rule: &id[end + 1..],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_rule() {
        assert_eq!(
            parse_rule_id("indent"),
            RuleId {
                plugin: None,
                rule: "indent"
            }
        );
    }

    #[test]
    fn test_plugin_rule() {
        let parsed = parse_rule_id("ts/indent");
        assert_eq!(parsed.plugin, Some("ts"));
        assert_eq!(parsed.rule, "indent");
    }

    #[test]
    fn test_scope_only() {
        let parsed = parse_rule_id("@typescript-eslint/indent");
        assert_eq!(parsed.plugin, Some("@typescript-eslint"));
        assert_eq!(parsed.rule, "indent");
    }

    #[test]
    fn test_scoped_package() {
        let parsed = parse_rule_id("@scope/pkg/rule/name");
        assert_eq!(parsed.plugin, Some("@scope/pkg"));
        assert_eq!(parsed.rule, "rule/name");
    }

    #[test]
    fn test_nested_rule_name() {
        let parsed = parse_rule_id("foo/ts/indent");
        assert_eq!(parsed.plugin, Some("foo"));
        assert_eq!(parsed.rule, "ts/indent");
    }
}
