//! Plugin conflict detection
//!
//! Flags plugin names that are backed by more than one plugin instance
//! across the resolved config array. This usually means two shareable
//! configs bundled their own copy of the same plugin.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use flat_config_core::{ConfigUnit, PluginId};

use crate::error::{ComposeError, Result};

/// Built-in conflict message template
pub const DEFAULT_PLUGIN_CONFLICTS_ERROR: &str = "Different instances of plugin \"{{pluginName}}\" found in multiple configs: {{configNames}}. It's likely you misconfigured the merge of these configs.";

/// Policy key matching every plugin without a specific message
pub const WILDCARD: &str = "*";

/// An offending unit and its position in the resolved array
pub type Offender<'a> = (usize, &'a ConfigUnit);

/// Builds a conflict message from the plugin name and the offending units
pub type ConflictFormatter = Arc<dyn Fn(&str, &[Offender<'_>]) -> String + Send + Sync>;

/// Message produced for one conflicting plugin name.
///
/// Templates support `{{pluginName}}`, `{{configName1}}`, `{{configName2}}`
/// and `{{configNames}}`.
#[derive(Clone)]
pub enum ConflictMessage {
    Template(String),
    Custom(ConflictFormatter),
}

impl ConflictMessage {
    pub fn custom<F>(formatter: F) -> Self
    where
        F: Fn(&str, &[Offender<'_>]) -> String + Send + Sync + 'static,
    {
        ConflictMessage::Custom(Arc::new(formatter))
    }
}

impl Default for ConflictMessage {
    fn default() -> Self {
        ConflictMessage::Template(DEFAULT_PLUGIN_CONFLICTS_ERROR.to_string())
    }
}

impl From<&str> for ConflictMessage {
    fn from(template: &str) -> Self {
        ConflictMessage::Template(template.to_string())
    }
}

impl From<String> for ConflictMessage {
    fn from(template: String) -> Self {
        ConflictMessage::Template(template)
    }
}

impl fmt::Debug for ConflictMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictMessage::Template(template) => {
                f.debug_tuple("Template").field(template).finish()
            }
            ConflictMessage::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Substitute the conflict placeholders in `template`
pub fn render_conflict_template(
    template: &str,
    plugin_name: &str,
    config_names: &[String],
) -> String {
    let first = config_names.first().map(String::as_str).unwrap_or_default();
    let second = config_names.get(1).map(String::as_str).unwrap_or_default();
    template
        .replace("{{pluginName}}", plugin_name)
        .replace("{{configName1}}", first)
        .replace("{{configName2}}", second)
        .replace("{{configNames}}", &config_names.join(", "))
}

/// Plugin name (or `*`) -> message. Empty means detection is off.
#[derive(Debug, Clone, Default)]
pub struct ConflictPolicy {
    messages: HashMap<String, ConflictMessage>,
}

/// One plugin instance and the units that reference it
struct Instance<'a> {
    name: &'a str,
    units: Vec<usize>,
}

impl ConflictPolicy {
    pub fn is_enabled(&self) -> bool {
        !self.messages.is_empty()
    }

    /// Set the message used for plugins without a specific one
    pub fn set_default(&mut self, message: ConflictMessage) {
        self.messages.insert(WILDCARD.to_string(), message);
    }

    /// Set the message for one plugin name
    pub fn set(&mut self, plugin_name: impl Into<String>, message: ConflictMessage) {
        self.messages.insert(plugin_name.into(), message);
    }

    fn message_for(&self, plugin_name: &str) -> Option<&ConflictMessage> {
        self.messages
            .get(plugin_name)
            .or_else(|| self.messages.get(WILDCARD))
    }

    /// Check `units` for plugin names registered with different instances.
    ///
    /// Every conflicting name contributes one message; all of them are
    /// reported together.
    pub fn verify(&self, units: &[ConfigUnit]) -> Result<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let mut instances: Vec<Instance<'_>> = Vec::new();
        let mut by_id: HashMap<PluginId, usize> = HashMap::new();
        let mut names: Vec<&str> = Vec::new();

        for (index, unit) in units.iter().enumerate() {
            let Some(plugins) = &unit.plugins else {
                continue;
            };
            for (name, plugin) in plugins {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
                let slot = *by_id.entry(plugin.id()).or_insert_with(|| {
                    instances.push(Instance {
                        name,
                        units: Vec::new(),
                    });
                    instances.len() - 1
                });
                instances[slot].units.push(index);
            }
        }

        let mut errors = Vec::new();
        for name in names {
            let offenders: Vec<usize> = instances
                .iter()
                .filter(|instance| instance.name == name)
                .filter_map(|instance| instance.units.first().copied())
                .collect();
            if offenders.len() <= 1 {
                continue;
            }

            debug!(plugin = name, instances = offenders.len(), "plugin conflict detected");

            match self.message_for(name) {
                Some(ConflictMessage::Custom(formatter)) => {
                    let offending: Vec<Offender<'_>> =
                        offenders.iter().map(|&i| (i, &units[i])).collect();
                    errors.push(formatter(name, &offending));
                }
                Some(ConflictMessage::Template(template)) => {
                    let config_names: Vec<String> = offenders
                        .iter()
                        .map(|&i| units[i].display_name(i))
                        .collect();
                    errors.push(render_conflict_template(template, name, &config_names));
                }
                None => {}
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ComposeError::PluginConflicts(errors))
        }
    }
}
