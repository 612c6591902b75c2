//! Manifest types and parsing for bridge.toml files.

mod file;
mod parse;
mod validate;

use indexmap::IndexMap;
pub use file::BridgeToml;
pub use parse::parse_manifest;
use serde::Deserialize;
pub use validate::ParseContext;

/// Root manifest for bridge.toml
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Manifest {
    /// Provider metadata
    pub provider: ProviderConfig,

    /// Overrides for provider configuration fields, keyed by field name
    #[serde(default)]
    pub config: IndexMap<String, FieldOverride>,

    /// Resource overlays, keyed by plugin type name
    #[serde(default)]
    pub resources: IndexMap<String, ResourceOverride>,

    /// Data source overlays, keyed by plugin type name
    #[serde(default)]
    pub data_sources: IndexMap<String, DataSourceOverride>,
}

impl Manifest {
    /// Resource prefix, falling back to the provider name.
    pub fn resource_prefix(&self) -> &str {
        self.provider
            .resource_prefix
            .as_deref()
            .unwrap_or(&self.provider.name)
    }
}

/// `[provider]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ProviderConfig {
    pub name: String,
    pub version: Option<String>,
    pub resource_prefix: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub license: Option<String>,
    pub homepage: Option<String>,
    pub repository: Option<String>,
    /// Version of the wrapped plugin
    pub upstream_version: Option<String>,
}

/// Literal default value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<DefaultValue>),
}

/// `default = { ... }` of a field override.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct DefaultOverride {
    pub value: Option<DefaultValue>,
    /// Provider configuration key to read the default from
    pub config: Option<String>,
    /// Environment variables to read the default from, in order
    #[serde(default)]
    pub env: Vec<String>,
    /// Derive the default from the resource name
    #[serde(default)]
    pub auto_named: bool,
}

/// Overrides for one field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FieldOverride {
    /// Property name to use instead of the derived one
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub type_token: Option<String>,
    #[serde(default)]
    pub alt_types: Vec<String>,
    pub secret: Option<bool>,
    pub force_new: Option<bool>,
    pub max_items_one: Option<bool>,
    pub deprecation_message: Option<String>,
    #[serde(default)]
    pub removed: bool,
    #[serde(default)]
    pub omit: bool,
    pub default: Option<DefaultOverride>,
    /// Overrides for the element of a list or map
    pub elem: Option<Box<FieldOverride>>,
    /// Overrides for the fields of a nested object
    #[serde(default)]
    pub fields: IndexMap<String, FieldOverride>,
}

/// `[resources.<type>]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ResourceOverride {
    pub token: String,
    #[serde(default)]
    pub fields: IndexMap<String, FieldOverride>,
    #[serde(default)]
    pub delete_before_replace: bool,
    pub deprecation_message: Option<String>,
    /// Tokens this resource was previously published under
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// `[data-sources.<type>]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct DataSourceOverride {
    pub token: String,
    #[serde(default)]
    pub fields: IndexMap<String, FieldOverride>,
    pub deprecation_message: Option<String>,
}
