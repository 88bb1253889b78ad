//! Config unit data model
//!
//! A config unit is one entry of a flat config array. Only the fields the
//! composer manipulates are typed; everything else is kept in `extra` and
//! passed through untouched.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Rule id -> rule setting (severity, `[severity, options]`, or `null`).
pub type RuleMap = Map<String, Value>;

/// Plugin name -> plugin instance.
pub type PluginMap = BTreeMap<String, Plugin>;

/// A `files` or `ignores` entry: one glob, or a group of globs that must
/// all match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilePattern {
    Glob(String),
    Group(Vec<String>),
}

impl FilePattern {
    /// Apply `f` to every glob in this pattern
    pub fn map_globs(&self, f: impl Fn(&str) -> String) -> Self {
        match self {
            FilePattern::Glob(glob) => FilePattern::Glob(f(glob)),
            FilePattern::Group(globs) => FilePattern::Group(globs.iter().map(|g| f(g)).collect()),
        }
    }

    /// The globs of this pattern, in order
    pub fn globs(&self) -> &[String] {
        match self {
            FilePattern::Glob(glob) => std::slice::from_ref(glob),
            FilePattern::Group(globs) => globs,
        }
    }

    /// A group matching only where both patterns match
    pub fn intersect(&self, other: &FilePattern) -> Self {
        FilePattern::Group(self.globs().iter().chain(other.globs()).cloned().collect())
    }
}

impl From<&str> for FilePattern {
    fn from(glob: &str) -> Self {
        FilePattern::Glob(glob.to_string())
    }
}

impl From<String> for FilePattern {
    fn from(glob: String) -> Self {
        FilePattern::Glob(glob)
    }
}

impl From<Vec<String>> for FilePattern {
    fn from(globs: Vec<String>) -> Self {
        FilePattern::Group(globs)
    }
}

/// Opaque identity of a plugin instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PluginId(usize);

/// A plugin object registered under a name in `plugins`.
///
/// Plugins are shared by reference: cloning a `Plugin` yields the same
/// instance, and equality is identity. Two plugins built from identical
/// definitions are still different instances.
#[derive(Clone)]
pub struct Plugin(Arc<Value>);

impl Plugin {
    /// Wrap a plugin definition into a new instance
    pub fn new(definition: Value) -> Self {
        Self(Arc::new(definition))
    }

    /// The opaque plugin definition
    pub fn definition(&self) -> &Value {
        &self.0
    }

    /// Identity of this instance, stable while any clone is alive
    pub fn id(&self) -> PluginId {
        PluginId(Arc::as_ptr(&self.0) as usize)
    }

    /// Whether both handles point at the same instance
    pub fn same_instance(&self, other: &Plugin) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for Plugin {
    fn default() -> Self {
        Self::new(Value::Object(Map::new()))
    }
}

impl PartialEq for Plugin {
    fn eq(&self, other: &Self) -> bool {
        self.same_instance(other)
    }
}

impl fmt::Debug for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Plugin")
            .field(&format_args!("{:#x}", self.id().0))
            .field(&self.0)
            .finish()
    }
}

impl Serialize for Plugin {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Plugin {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Plugin::new)
    }
}

/// One flat config item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigUnit {
    /// Identifier used to address this unit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Globs this unit applies to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<FilePattern>>,

    /// Globs this unit excludes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignores: Option<Vec<FilePattern>>,

    /// Registered plugins
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugins: Option<PluginMap>,

    /// Rule settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<RuleMap>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_options: Option<Map<String, Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub linter_options: Option<Map<String, Value>>,

    /// Unrecognized fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConfigUnit {
    /// Create an empty unit with a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Name for diagnostics: the unit's name, or `#<index>` when unnamed
    pub fn display_name(&self, index: usize) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("#{}", index),
        }
    }

    pub fn with_files<I, P>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<FilePattern>,
    {
        self.files
            .get_or_insert_with(Vec::new)
            .extend(files.into_iter().map(Into::into));
        self
    }

    pub fn with_ignores<I, P>(mut self, ignores: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<FilePattern>,
    {
        self.ignores
            .get_or_insert_with(Vec::new)
            .extend(ignores.into_iter().map(Into::into));
        self
    }

    /// Register a plugin instance under `name`
    pub fn with_plugin(mut self, name: impl Into<String>, plugin: Plugin) -> Self {
        self.plugins
            .get_or_insert_with(PluginMap::new)
            .insert(name.into(), plugin);
        self
    }

    /// Set one rule
    pub fn with_rule(mut self, id: impl Into<String>, setting: Value) -> Self {
        self.rules
            .get_or_insert_with(RuleMap::new)
            .insert(id.into(), setting);
        self
    }

    /// Set an unrecognized top-level field
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}
