//! Collaborator abstractions
//!
//! The resolver never touches HTTP machinery directly; the host platform
//! hands it a [`SyncRequest`] snapshot and a [`ResourceLocator`] for stored
//! source-context resources. Two locators are provided: an in-memory map and
//! a TOML-file-backed one.

use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use serde_json::Value;

/// One value of a multi-valued request parameter.
///
/// File uploads carry content alongside their string rendering; only simple
/// form fields are ever copied into a session's extra parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValue {
    pub value: String,
    pub is_form_field: bool,
}

impl FieldValue {
    /// A simple form field
    pub fn field(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            is_form_field: true,
        }
    }

    /// A file-upload part
    pub fn upload(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            is_form_field: false,
        }
    }
}

/// Snapshot of an incoming synchronization request
pub trait SyncRequest {
    /// First value of the named parameter, if present
    fn parameter(&self, name: &str) -> Option<&str>;

    /// All values of the named parameter, if present
    fn parameter_values(&self, name: &str) -> Option<&[FieldValue]>;

    /// All parameters in a stable iteration order
    fn parameter_map(&self) -> Vec<(&str, &[FieldValue])>;

    /// Structural path suffix beyond the matched resource path
    fn path_suffix(&self) -> Option<&str>;

    /// Structural selector tokens
    fn selectors(&self) -> &[String];

    /// Raw request URI as received, including any query string
    fn raw_uri(&self) -> &str;

    /// Declared character encoding of the request, if any
    fn character_encoding(&self) -> Option<&str>;
}

/// Typed property access with explicit defaults.
///
/// Backed by a JSON object; scalar string values coerce to integers and
/// booleans where they parse, otherwise the supplied default applies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    values: serde_json::Map<String, Value>,
}

impl Properties {
    pub fn new(values: serde_json::Map<String, Value>) -> Self {
        Self { values }
    }

    /// Wrap a JSON value; anything but an object yields no property set
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(values) => Some(Self { values }),
            _ => None,
        }
    }

    pub fn get_str(&self, name: &str) -> Option<String> {
        match self.values.get(name)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn get_u16(&self, name: &str, default: u16) -> u16 {
        match self.values.get(name) {
            Some(Value::Number(n)) => n
                .as_u64()
                .and_then(|n| u16::try_from(n).ok())
                .unwrap_or(default),
            Some(Value::String(s)) => s.parse().unwrap_or(default),
            _ => default,
        }
    }

    pub fn get_bool(&self, name: &str, default: bool) -> bool {
        match self.values.get(name) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s.parse().unwrap_or(default),
            _ => default,
        }
    }
}

/// Maps a path-like reference string to a stored property set
pub trait ResourceLocator {
    fn resource(&self, reference: &str) -> Option<Properties>;
}

/// In-memory locator, used in tests and by embedders with their own storage
#[derive(Debug, Clone, Default)]
pub struct StaticResources {
    resources: HashMap<String, Properties>,
}

impl StaticResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, reference: impl Into<String>, props: Properties) -> Self {
        self.resources.insert(reference.into(), props);
        self
    }
}

impl ResourceLocator for StaticResources {
    fn resource(&self, reference: &str) -> Option<Properties> {
        self.resources.get(reference).cloned()
    }
}

/// Locator resolving references to TOML files under a root directory.
///
/// A reference `/etc/sync/upstream` maps to `<root>/etc/sync/upstream.toml`.
/// References that would escape the root, as well as unreadable or
/// unparseable files, resolve to absent.
#[derive(Debug, Clone)]
pub struct TomlResources {
    root: PathBuf,
}

impl TomlResources {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn file_for(&self, reference: &str) -> Option<PathBuf> {
        let relative = Path::new(reference.trim_start_matches('/'));
        if relative.as_os_str().is_empty() {
            return None;
        }
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return None;
        }
        let mut path = self.root.join(relative);
        path.set_extension("toml");
        Some(path)
    }
}

impl ResourceLocator for TomlResources {
    fn resource(&self, reference: &str) -> Option<Properties> {
        let path = self.file_for(reference)?;
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) => {
                tracing::warn!(target: "treesync::resources",
                    "failed to read resource '{}' at {}: {}", reference, path.display(), err);
                return None;
            }
        };
        let value: toml::Value = match toml::from_str(&contents) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(target: "treesync::resources",
                    "failed to parse resource '{}' at {}: {}", reference, path.display(), err);
                return None;
            }
        };
        Properties::from_value(toml_to_json(value))
    }
}

fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => {
            let map: serde_json::Map<String, Value> = table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect();
            Value::Object(map)
        }
    }
}
