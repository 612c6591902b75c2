//! Capability-narrowed provider exposing schemas only.

use std::sync::Arc;

use indexmap::IndexMap;
use tfbridge_types::TypedValue;

use crate::{
    context::CallContext,
    diagnostic::Diagnostics,
    error::{Operation, ShimError, ShimResult},
    modern::{ModernPlugin, ModernSource},
    provider::{
        DiffOptions, Dialect, InstanceDiff, InstanceState, Meta, ResourceConfig, Runtime,
        SchemaSource,
    },
    schema::{ResourceMap, SchemaMap},
};

/// Full [`Provider`](crate::Provider) whose runtime operations all fail.
///
/// Schema reads go to the wrapped source; any failure there is fatal and
/// the schema is never used partially. Every runtime operation returns
/// [`ShimError::Unsupported`] without touching the wrapped source.
pub struct SchemaOnlyProvider<S> {
    source: S,
}

impl<S: SchemaSource> SchemaOnlyProvider<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<P: ModernPlugin> SchemaOnlyProvider<ModernSource<P>> {
    /// Schema-only view of a modern plugin.
    pub fn modern(plugin: P) -> Self {
        Self::new(ModernSource::new(plugin))
    }
}

impl<S: SchemaSource> SchemaSource for SchemaOnlyProvider<S> {
    fn dialect(&self) -> Dialect {
        self.source.dialect()
    }

    fn schema(&self, cx: &CallContext) -> ShimResult<Arc<SchemaMap>> {
        self.source.schema(cx).map_err(ShimError::into_fatal)
    }

    fn resources_map(&self, cx: &CallContext) -> ShimResult<Arc<ResourceMap>> {
        self.source.resources_map(cx).map_err(ShimError::into_fatal)
    }

    fn data_sources_map(&self, cx: &CallContext) -> ShimResult<Arc<ResourceMap>> {
        self.source
            .data_sources_map(cx)
            .map_err(ShimError::into_fatal)
    }
}

impl<S: SchemaSource> Runtime for SchemaOnlyProvider<S> {
    fn validate(&self, _cx: &CallContext, _config: &ResourceConfig) -> ShimResult<Diagnostics> {
        Err(ShimError::unsupported(Operation::Validate))
    }

    fn validate_resource(
        &self,
        _cx: &CallContext,
        _type_name: &str,
        _config: &ResourceConfig,
    ) -> ShimResult<Diagnostics> {
        Err(ShimError::unsupported(Operation::ValidateResource))
    }

    fn validate_data_source(
        &self,
        _cx: &CallContext,
        _type_name: &str,
        _config: &ResourceConfig,
    ) -> ShimResult<Diagnostics> {
        Err(ShimError::unsupported(Operation::ValidateDataSource))
    }

    fn configure(&self, _cx: &CallContext, _config: &ResourceConfig) -> ShimResult<()> {
        Err(ShimError::unsupported(Operation::Configure))
    }

    fn diff(
        &self,
        _cx: &CallContext,
        _type_name: &str,
        _state: Option<&InstanceState>,
        _config: &ResourceConfig,
        _options: &DiffOptions,
    ) -> ShimResult<Option<InstanceDiff>> {
        Err(ShimError::unsupported(Operation::Diff))
    }

    fn apply(
        &self,
        _cx: &CallContext,
        _type_name: &str,
        _state: Option<&InstanceState>,
        _diff: &InstanceDiff,
    ) -> ShimResult<Option<InstanceState>> {
        Err(ShimError::unsupported(Operation::Apply))
    }

    fn refresh(
        &self,
        _cx: &CallContext,
        _type_name: &str,
        _state: &InstanceState,
    ) -> ShimResult<Option<InstanceState>> {
        Err(ShimError::unsupported(Operation::Refresh))
    }

    fn read_data_diff(
        &self,
        _cx: &CallContext,
        _type_name: &str,
        _config: &ResourceConfig,
    ) -> ShimResult<Option<InstanceDiff>> {
        Err(ShimError::unsupported(Operation::ReadDataDiff))
    }

    fn read_data_apply(
        &self,
        _cx: &CallContext,
        _type_name: &str,
        _diff: &InstanceDiff,
    ) -> ShimResult<Option<InstanceState>> {
        Err(ShimError::unsupported(Operation::ReadDataApply))
    }

    fn meta(&self, _cx: &CallContext) -> ShimResult<Option<Meta>> {
        Err(ShimError::unsupported(Operation::Meta))
    }

    fn stop(&self, _cx: &CallContext) -> ShimResult<()> {
        Err(ShimError::unsupported(Operation::Stop))
    }

    fn init_logging(&self, _cx: &CallContext) -> ShimResult<()> {
        Err(ShimError::unsupported(Operation::InitLogging))
    }

    fn new_destroy_diff(&self, _cx: &CallContext) -> ShimResult<InstanceDiff> {
        Err(ShimError::unsupported(Operation::NewDestroyDiff))
    }

    fn new_resource_config(
        &self,
        _cx: &CallContext,
        _values: IndexMap<String, TypedValue>,
    ) -> ShimResult<ResourceConfig> {
        Err(ShimError::unsupported(Operation::NewResourceConfig))
    }

    fn is_set(
        &self,
        _cx: &CallContext,
        _value: &TypedValue,
    ) -> ShimResult<Option<Vec<TypedValue>>> {
        Err(ShimError::unsupported(Operation::IsSet))
    }
}
