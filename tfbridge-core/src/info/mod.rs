//! Provider customization overlay.
//!
//! A [`ProviderInfo`] describes how a wrapped provider is presented to the
//! engine: metadata, per-field overrides, resource and data source tokens,
//! and hooks that run around the wrapped provider's operations.
//!
//! # Module Organization
//!
//! - [`tokens`] - token and version helpers
//! - [`config`] - provider configuration lookups with environment fallbacks
//! - [`delegate`] - resource IDs read from a state field
//! - [`names`] - overlay-aware property naming
//! - [`metadata`] - serializable snapshot of an overlay (JSON)
//! - `lower` - building an overlay from a `bridge.toml` manifest

mod lower;

pub mod config;
pub mod delegate;
pub mod metadata;
pub mod names;
pub mod tokens;

use std::{fmt, sync::Arc};

use indexmap::IndexMap;
use tfbridge_shim::{CallContext, Provider, Schema};
use tfbridge_types::{PropertyMap, PropertyValue, Urn};

use crate::error::InfoError;

pub use names::OverlayNames;

/// License assumed for upstream providers that do not declare one.
pub const DEFAULT_UPSTREAM_LICENSE: &str = "MPL 2.0";

/// Transforms a property value before it reaches the wrapped provider.
pub type Transformer =
    Arc<dyn Fn(&PropertyValue) -> Result<PropertyValue, InfoError> + Send + Sync>;

/// Rewrites a resource's property map, e.g. to patch up outputs or state.
pub type PropertyTransform =
    Arc<dyn Fn(&CallContext, PropertyMap) -> Result<PropertyMap, InfoError> + Send + Sync>;

/// Computes a resource ID from its state.
pub type ComputeId =
    Arc<dyn Fn(&CallContext, &PropertyMap) -> Result<String, InfoError> + Send + Sync>;

/// Computes a default value for a property.
pub type ComputeDefault = Arc<
    dyn Fn(&CallContext, &ComputeDefaultOptions) -> Result<PropertyValue, InfoError> + Send + Sync,
>;

/// Input to a [`ComputeDefault`] hook.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComputeDefaultOptions {
    /// Set for resources, unset for functions.
    pub urn: Option<Urn>,
    /// Properties before defaults are applied.
    pub properties: PropertyMap,
    /// Prior state, for operations other than create.
    pub prior_state: PropertyMap,
    /// The property's value in the prior state, or null.
    pub prior_value: PropertyValue,
    /// Stable seed for generating random values.
    pub seed: Vec<u8>,
}

/// How a property gets a default value.
///
/// Sources are tried in order: environment variables, the provider config
/// key, the compute hook, then the literal value.
#[derive(Clone, Default)]
pub struct DefaultInfo {
    /// The default is an auto-generated name.
    pub auto_named: bool,
    /// Provider config variable used as the default.
    pub config: Option<String>,
    pub compute: Option<ComputeDefault>,
    pub value: Option<PropertyValue>,
    pub env_vars: Vec<String>,
}

impl DefaultInfo {
    pub fn value(value: impl Into<PropertyValue>) -> Self {
        Self {
            value: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn with_env_vars<I, S>(mut self, env_vars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.env_vars = env_vars.into_iter().map(Into::into).collect();
        self
    }

    /// Resolve the default, or `None` when no source has a value.
    pub fn resolve(
        &self,
        cx: &CallContext,
        provider_config: &PropertyMap,
        options: &ComputeDefaultOptions,
    ) -> Result<Option<PropertyValue>, InfoError> {
        if let Some(value) = self.env_vars.iter().find_map(|env| std::env::var(env).ok()) {
            return Ok(Some(PropertyValue::String(value)));
        }
        if let Some(value) = self
            .config
            .as_deref()
            .and_then(|key| provider_config.get(key))
        {
            return Ok(Some(value.clone()));
        }
        if let Some(compute) = &self.compute {
            return compute(cx, options).map(Some);
        }
        Ok(self.value.clone())
    }
}

impl fmt::Debug for DefaultInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultInfo")
            .field("auto_named", &self.auto_named)
            .field("config", &self.config)
            .field("compute", &self.compute.is_some())
            .field("value", &self.value)
            .field("env_vars", &self.env_vars)
            .finish()
    }
}

/// Overrides for one field of a provider config, resource, or data source.
#[derive(Clone, Default)]
pub struct SchemaInfo {
    /// Property name, replacing the naming rule.
    pub name: Option<String>,
    /// Type token replacing the field's structural type.
    pub type_token: Option<String>,
    pub alt_types: Vec<String>,
    pub transform: Option<Transformer>,
    /// Overrides for the elements of a list or map.
    pub elem: Option<Box<SchemaInfo>>,
    /// Overrides for the attributes of a nested object.
    pub fields: IndexMap<String, SchemaInfo>,
    pub default: Option<DefaultInfo>,
    /// Present a single-element list as a scalar.
    pub max_items_one: Option<bool>,
    pub secret: Option<bool>,
    pub force_new: Option<bool>,
    pub deprecation_message: Option<String>,
    /// Hide the field from the engine; it is being removed upstream.
    pub removed: bool,
    /// Hide the field from the engine entirely.
    pub omit: bool,
}

impl SchemaInfo {
    /// Override with only a property name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_elem(mut self, elem: SchemaInfo) -> Self {
        self.elem = Some(Box::new(elem));
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, info: SchemaInfo) -> Self {
        self.fields.insert(name.into(), info);
        self
    }

    pub fn with_secret(mut self, secret: bool) -> Self {
        self.secret = Some(secret);
        self
    }

    pub fn with_default(mut self, default: DefaultInfo) -> Self {
        self.default = Some(default);
        self
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    pub fn is_secret(&self) -> bool {
        self.secret == Some(true)
    }

    /// Apply the value transform, if any.
    pub fn transform_value(&self, value: &PropertyValue) -> Result<PropertyValue, InfoError> {
        match &self.transform {
            Some(transform) => transform(value),
            None => Ok(value.clone()),
        }
    }
}

impl fmt::Debug for SchemaInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaInfo")
            .field("name", &self.name)
            .field("type_token", &self.type_token)
            .field("alt_types", &self.alt_types)
            .field("transform", &self.transform.is_some())
            .field("elem", &self.elem)
            .field("fields", &self.fields)
            .field("default", &self.default)
            .field("max_items_one", &self.max_items_one)
            .field("secret", &self.secret)
            .field("force_new", &self.force_new)
            .field("deprecation_message", &self.deprecation_message)
            .field("removed", &self.removed)
            .field("omit", &self.omit)
            .finish()
    }
}

/// A provider config variable that has no counterpart upstream.
#[derive(Debug, Clone)]
pub struct ConfigInfo {
    pub schema: Schema,
    pub info: SchemaInfo,
}

/// A previous identity of a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasInfo {
    pub name: Option<String>,
    pub type_token: Option<String>,
    pub project: Option<String>,
}

impl AliasInfo {
    pub fn type_token(token: impl Into<String>) -> Self {
        Self {
            type_token: Some(token.into()),
            ..Default::default()
        }
    }
}

/// Overlay for one resource.
#[derive(Clone, Default)]
pub struct ResourceInfo {
    pub token: String,
    pub fields: IndexMap<String, SchemaInfo>,
    pub delete_before_replace: bool,
    pub aliases: Vec<AliasInfo>,
    pub deprecation_message: Option<String>,
    /// Runs on outputs before they are returned to the engine.
    pub transform_outputs: Option<PropertyTransform>,
    /// Runs on stored state before it is read back.
    pub transform_from_state: Option<PropertyTransform>,
    /// Computes the ID when the resource has no `id` attribute.
    pub compute_id: Option<ComputeId>,
}

impl ResourceInfo {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..Default::default()
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, info: SchemaInfo) -> Self {
        self.fields.insert(name.into(), info);
        self
    }

    pub fn with_compute_id(mut self, compute_id: ComputeId) -> Self {
        self.compute_id = Some(compute_id);
        self
    }
}

impl fmt::Debug for ResourceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceInfo")
            .field("token", &self.token)
            .field("fields", &self.fields)
            .field("delete_before_replace", &self.delete_before_replace)
            .field("aliases", &self.aliases)
            .field("deprecation_message", &self.deprecation_message)
            .field("transform_outputs", &self.transform_outputs.is_some())
            .field("transform_from_state", &self.transform_from_state.is_some())
            .field("compute_id", &self.compute_id.is_some())
            .finish()
    }
}

/// Overlay for one data source.
#[derive(Debug, Clone, Default)]
pub struct DataSourceInfo {
    pub token: String,
    pub fields: IndexMap<String, SchemaInfo>,
    pub deprecation_message: Option<String>,
}

impl DataSourceInfo {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..Default::default()
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, info: SchemaInfo) -> Self {
        self.fields.insert(name.into(), info);
        self
    }
}

/// Everything needed to present a wrapped provider to the engine.
#[derive(Clone, Default)]
pub struct ProviderInfo {
    pub provider: Option<Arc<dyn Provider>>,
    pub name: String,
    /// Prefix of upstream type names; defaults to `name`.
    pub resource_prefix: Option<String>,
    pub version: String,
    pub description: Option<String>,
    pub keywords: Vec<String>,
    /// Upstream license; defaults to [`DEFAULT_UPSTREAM_LICENSE`].
    pub license: Option<String>,
    pub homepage: Option<String>,
    pub repository: Option<String>,
    pub upstream_version: Option<String>,
    pub config: IndexMap<String, SchemaInfo>,
    pub extra_config: IndexMap<String, ConfigInfo>,
    pub resources: IndexMap<String, ResourceInfo>,
    pub data_sources: IndexMap<String, DataSourceInfo>,
    /// Upstream type names that are deliberately left unmapped.
    pub ignore_mappings: Vec<String>,
}

impl ProviderInfo {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            ..Default::default()
        }
    }

    pub fn with_provider(mut self, provider: Arc<dyn Provider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn resource_prefix(&self) -> &str {
        match self.resource_prefix.as_deref() {
            Some(prefix) if !prefix.is_empty() => prefix,
            _ => &self.name,
        }
    }

    pub fn license(&self) -> &str {
        self.license.as_deref().unwrap_or(DEFAULT_UPSTREAM_LICENSE)
    }

    /// Major version suffix for SDK module paths (`""`, `"v2"`, ...).
    pub fn module_major_version(&self) -> Result<String, InfoError> {
        tokens::module_major_version(&self.version)
    }

    /// Naming policy for the provider configuration.
    pub fn config_names(&self) -> OverlayNames<'_> {
        OverlayNames::new(Some(&self.config))
    }

    /// Naming policy for the attributes of resource `type_name`.
    pub fn resource_names(&self, type_name: &str) -> OverlayNames<'_> {
        OverlayNames::new(self.resources.get(type_name).map(|r| &r.fields))
    }

    /// Naming policy for the attributes of data source `type_name`.
    pub fn data_source_names(&self, type_name: &str) -> OverlayNames<'_> {
        OverlayNames::new(self.data_sources.get(type_name).map(|d| &d.fields))
    }

    /// Upstream resources and data sources with neither an overlay nor an
    /// ignore entry. Empty when no provider is attached.
    pub fn unmapped(&self, cx: &CallContext) -> Result<Vec<String>, InfoError> {
        let Some(provider) = &self.provider else {
            return Ok(Vec::new());
        };
        let resources = provider.resources_map(cx)?;
        let data_sources = provider.data_sources_map(cx)?;

        let ignored = |name: &str| self.ignore_mappings.iter().any(|i| i == name);
        let mut unmapped: Vec<String> = resources
            .names()
            .filter(|name| !self.resources.contains_key(*name) && !ignored(*name))
            .map(str::to_string)
            .collect();
        unmapped.extend(
            data_sources
                .names()
                .filter(|name| !self.data_sources.contains_key(*name) && !ignored(*name))
                .map(str::to_string),
        );
        Ok(unmapped)
    }
}

impl fmt::Debug for ProviderInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderInfo")
            .field("provider", &self.provider.is_some())
            .field("name", &self.name)
            .field("resource_prefix", &self.resource_prefix)
            .field("version", &self.version)
            .field("description", &self.description)
            .field("keywords", &self.keywords)
            .field("license", &self.license)
            .field("homepage", &self.homepage)
            .field("repository", &self.repository)
            .field("upstream_version", &self.upstream_version)
            .field("config", &self.config)
            .field("extra_config", &self.extra_config)
            .field("resources", &self.resources)
            .field("data_sources", &self.data_sources)
            .field("ignore_mappings", &self.ignore_mappings)
            .finish()
    }
}
