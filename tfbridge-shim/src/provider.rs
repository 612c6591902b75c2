//! The shim interface.
//!
//! A provider is split into two capability sets:
//!
//! - [`SchemaSource`] - read-only schema access, safe to repeat
//! - [`Runtime`] - the plugin's runtime operations
//!
//! [`Provider`] is implemented for every type that has both.

use std::{any::Any, fmt, sync::Arc};

use indexmap::IndexMap;
use tfbridge_types::TypedValue;

use crate::{
    context::CallContext,
    diagnostic::Diagnostics,
    error::ShimResult,
    schema::{ResourceMap, SchemaMap},
};

/// Plugin contract a provider was written against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// Schema declared as data; runtime implemented by the plugin.
    Legacy,
    /// Schema computed on request and reported with diagnostics.
    Modern,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Legacy => write!(f, "legacy"),
            Dialect::Modern => write!(f, "modern"),
        }
    }
}

/// Read access to a provider's schema.
///
/// Reads are idempotent. Implementations surface errors from the wrapped
/// plugin's own schema computation instead of dropping them.
pub trait SchemaSource: Send + Sync {
    fn dialect(&self) -> Dialect;

    /// Provider configuration schema.
    fn schema(&self, cx: &CallContext) -> ShimResult<Arc<SchemaMap>>;

    fn resources_map(&self, cx: &CallContext) -> ShimResult<Arc<ResourceMap>>;

    fn data_sources_map(&self, cx: &CallContext) -> ShimResult<Arc<ResourceMap>>;
}

impl<S: SchemaSource + ?Sized> SchemaSource for Arc<S> {
    fn dialect(&self) -> Dialect {
        (**self).dialect()
    }

    fn schema(&self, cx: &CallContext) -> ShimResult<Arc<SchemaMap>> {
        (**self).schema(cx)
    }

    fn resources_map(&self, cx: &CallContext) -> ShimResult<Arc<ResourceMap>> {
        (**self).resources_map(cx)
    }

    fn data_sources_map(&self, cx: &CallContext) -> ShimResult<Arc<ResourceMap>> {
        (**self).data_sources_map(cx)
    }
}

impl<S: SchemaSource + ?Sized> SchemaSource for Box<S> {
    fn dialect(&self) -> Dialect {
        (**self).dialect()
    }

    fn schema(&self, cx: &CallContext) -> ShimResult<Arc<SchemaMap>> {
        (**self).schema(cx)
    }

    fn resources_map(&self, cx: &CallContext) -> ShimResult<Arc<ResourceMap>> {
        (**self).resources_map(cx)
    }

    fn data_sources_map(&self, cx: &CallContext) -> ShimResult<Arc<ResourceMap>> {
        (**self).data_sources_map(cx)
    }
}

/// Opaque value produced by a configured provider.
pub type Meta = Arc<dyn Any + Send + Sync>;

/// Configuration values of a provider, resource, or data source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceConfig {
    pub values: IndexMap<String, TypedValue>,
}

impl ResourceConfig {
    pub fn new(values: IndexMap<String, TypedValue>) -> Self {
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        self.values.get(name)
    }

    /// True when the value is unknown or contains unknowns.
    pub fn is_computed(&self, name: &str) -> bool {
        self.values.get(name).is_some_and(|v| !v.is_fully_known())
    }
}

/// Recorded state of one resource instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstanceState {
    pub id: String,
    pub attributes: IndexMap<String, TypedValue>,
    pub meta: IndexMap<String, String>,
}

impl InstanceState {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

/// Planned change of one attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDiff {
    pub old: Option<TypedValue>,
    pub new: Option<TypedValue>,
    pub new_computed: bool,
    pub requires_new: bool,
}

/// Planned change of one resource instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstanceDiff {
    pub attributes: IndexMap<String, AttributeDiff>,
    pub destroy: bool,
}

impl InstanceDiff {
    pub fn destroy() -> Self {
        Self {
            attributes: IndexMap::new(),
            destroy: true,
        }
    }

    pub fn requires_new(&self) -> bool {
        self.attributes.values().any(|d| d.requires_new)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiffOptions {
    /// Attribute names whose changes are ignored.
    pub ignore_changes: Vec<String>,
}

/// Runtime operations of a provider plugin.
pub trait Runtime: Send + Sync {
    fn validate(&self, cx: &CallContext, config: &ResourceConfig) -> ShimResult<Diagnostics>;

    fn validate_resource(
        &self,
        cx: &CallContext,
        type_name: &str,
        config: &ResourceConfig,
    ) -> ShimResult<Diagnostics>;

    fn validate_data_source(
        &self,
        cx: &CallContext,
        type_name: &str,
        config: &ResourceConfig,
    ) -> ShimResult<Diagnostics>;

    fn configure(&self, cx: &CallContext, config: &ResourceConfig) -> ShimResult<()>;

    fn diff(
        &self,
        cx: &CallContext,
        type_name: &str,
        state: Option<&InstanceState>,
        config: &ResourceConfig,
        options: &DiffOptions,
    ) -> ShimResult<Option<InstanceDiff>>;

    fn apply(
        &self,
        cx: &CallContext,
        type_name: &str,
        state: Option<&InstanceState>,
        diff: &InstanceDiff,
    ) -> ShimResult<Option<InstanceState>>;

    fn refresh(
        &self,
        cx: &CallContext,
        type_name: &str,
        state: &InstanceState,
    ) -> ShimResult<Option<InstanceState>>;

    fn read_data_diff(
        &self,
        cx: &CallContext,
        type_name: &str,
        config: &ResourceConfig,
    ) -> ShimResult<Option<InstanceDiff>>;

    fn read_data_apply(
        &self,
        cx: &CallContext,
        type_name: &str,
        diff: &InstanceDiff,
    ) -> ShimResult<Option<InstanceState>>;

    fn meta(&self, cx: &CallContext) -> ShimResult<Option<Meta>>;

    fn stop(&self, cx: &CallContext) -> ShimResult<()>;

    fn init_logging(&self, cx: &CallContext) -> ShimResult<()>;

    fn new_destroy_diff(&self, cx: &CallContext) -> ShimResult<InstanceDiff>;

    fn new_resource_config(
        &self,
        cx: &CallContext,
        values: IndexMap<String, TypedValue>,
    ) -> ShimResult<ResourceConfig>;

    /// Elements of `value` when it is a set-like collection that is set.
    fn is_set(&self, cx: &CallContext, value: &TypedValue) -> ShimResult<Option<Vec<TypedValue>>>;
}

/// A full provider: schema reads plus runtime operations.
pub trait Provider: SchemaSource + Runtime {}

impl<T: SchemaSource + Runtime> Provider for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destroy_diff() {
        let diff = InstanceDiff::destroy();
        assert!(diff.destroy);
        assert!(!diff.requires_new());
    }

    #[test]
    fn test_resource_config_is_computed() {
        let mut values = IndexMap::new();
        values.insert("name".to_string(), TypedValue::string("a"));
        values.insert(
            "id".to_string(),
            TypedValue::unknown(tfbridge_types::TypeDescriptor::String),
        );
        let config = ResourceConfig::new(values);
        assert!(!config.is_computed("name"));
        assert!(config.is_computed("id"));
        assert!(!config.is_computed("missing"));
    }

    #[test]
    fn test_dialect_display() {
        assert_eq!(Dialect::Legacy.to_string(), "legacy");
        assert_eq!(Dialect::Modern.to_string(), "modern");
    }
}
