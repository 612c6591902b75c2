//! Legacy dialect: schema declared as data, runtime implemented by the plugin.

use std::sync::Arc;

use indexmap::IndexMap;
use tfbridge_types::TypedValue;

use crate::{
    context::CallContext,
    diagnostic::Diagnostics,
    error::{Operation, SchemaKind, ShimError, ShimResult},
    provider::{
        DiffOptions, Dialect, InstanceDiff, InstanceState, Meta, ResourceConfig, Runtime,
        SchemaSource,
    },
    schema::{ResourceMap, SchemaMap},
};

/// A legacy-dialect plugin behind the shim interface.
///
/// Schema reads return the declared maps. Runtime operations are forwarded
/// to the plugin after checking that the named type is declared.
pub struct LegacyProvider<R> {
    schema: Arc<SchemaMap>,
    resources: Arc<ResourceMap>,
    data_sources: Arc<ResourceMap>,
    runtime: R,
}

impl<R: Runtime> LegacyProvider<R> {
    pub fn new(
        schema: SchemaMap,
        resources: ResourceMap,
        data_sources: ResourceMap,
        runtime: R,
    ) -> Self {
        Self {
            schema: Arc::new(schema),
            resources: Arc::new(resources),
            data_sources: Arc::new(data_sources),
            runtime,
        }
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    fn delegate(&self, cx: &CallContext, operation: Operation, type_name: Option<&str>) {
        match type_name {
            Some(name) => cx
                .logger()
                .debug(&format!("delegating {} of {} to legacy plugin", operation, name)),
            None => cx
                .logger()
                .debug(&format!("delegating {} to legacy plugin", operation)),
        }
    }

    fn require(&self, kind: SchemaKind, name: &str) -> ShimResult<()> {
        let declared = match kind {
            SchemaKind::Resource => self.resources.contains(name),
            SchemaKind::DataSource => self.data_sources.contains(name),
        };
        if declared {
            Ok(())
        } else {
            Err(ShimError::UnknownType {
                kind,
                name: name.to_string(),
            })
        }
    }
}

impl<R: Runtime> SchemaSource for LegacyProvider<R> {
    fn dialect(&self) -> Dialect {
        Dialect::Legacy
    }

    fn schema(&self, _cx: &CallContext) -> ShimResult<Arc<SchemaMap>> {
        Ok(Arc::clone(&self.schema))
    }

    fn resources_map(&self, _cx: &CallContext) -> ShimResult<Arc<ResourceMap>> {
        Ok(Arc::clone(&self.resources))
    }

    fn data_sources_map(&self, _cx: &CallContext) -> ShimResult<Arc<ResourceMap>> {
        Ok(Arc::clone(&self.data_sources))
    }
}

impl<R: Runtime> Runtime for LegacyProvider<R> {
    fn validate(&self, cx: &CallContext, config: &ResourceConfig) -> ShimResult<Diagnostics> {
        self.delegate(cx, Operation::Validate, None);
        self.runtime.validate(cx, config)
    }

    fn validate_resource(
        &self,
        cx: &CallContext,
        type_name: &str,
        config: &ResourceConfig,
    ) -> ShimResult<Diagnostics> {
        self.require(SchemaKind::Resource, type_name)?;
        self.delegate(cx, Operation::ValidateResource, Some(type_name));
        self.runtime.validate_resource(cx, type_name, config)
    }

    fn validate_data_source(
        &self,
        cx: &CallContext,
        type_name: &str,
        config: &ResourceConfig,
    ) -> ShimResult<Diagnostics> {
        self.require(SchemaKind::DataSource, type_name)?;
        self.delegate(cx, Operation::ValidateDataSource, Some(type_name));
        self.runtime.validate_data_source(cx, type_name, config)
    }

    fn configure(&self, cx: &CallContext, config: &ResourceConfig) -> ShimResult<()> {
        self.delegate(cx, Operation::Configure, None);
        self.runtime.configure(cx, config)
    }

    fn diff(
        &self,
        cx: &CallContext,
        type_name: &str,
        state: Option<&InstanceState>,
        config: &ResourceConfig,
        options: &DiffOptions,
    ) -> ShimResult<Option<InstanceDiff>> {
        self.require(SchemaKind::Resource, type_name)?;
        self.delegate(cx, Operation::Diff, Some(type_name));
        self.runtime.diff(cx, type_name, state, config, options)
    }

    fn apply(
        &self,
        cx: &CallContext,
        type_name: &str,
        state: Option<&InstanceState>,
        diff: &InstanceDiff,
    ) -> ShimResult<Option<InstanceState>> {
        self.require(SchemaKind::Resource, type_name)?;
        self.delegate(cx, Operation::Apply, Some(type_name));
        self.runtime.apply(cx, type_name, state, diff)
    }

    fn refresh(
        &self,
        cx: &CallContext,
        type_name: &str,
        state: &InstanceState,
    ) -> ShimResult<Option<InstanceState>> {
        self.require(SchemaKind::Resource, type_name)?;
        self.delegate(cx, Operation::Refresh, Some(type_name));
        self.runtime.refresh(cx, type_name, state)
    }

    fn read_data_diff(
        &self,
        cx: &CallContext,
        type_name: &str,
        config: &ResourceConfig,
    ) -> ShimResult<Option<InstanceDiff>> {
        self.require(SchemaKind::DataSource, type_name)?;
        self.delegate(cx, Operation::ReadDataDiff, Some(type_name));
        self.runtime.read_data_diff(cx, type_name, config)
    }

    fn read_data_apply(
        &self,
        cx: &CallContext,
        type_name: &str,
        diff: &InstanceDiff,
    ) -> ShimResult<Option<InstanceState>> {
        self.require(SchemaKind::DataSource, type_name)?;
        self.delegate(cx, Operation::ReadDataApply, Some(type_name));
        self.runtime.read_data_apply(cx, type_name, diff)
    }

    fn meta(&self, cx: &CallContext) -> ShimResult<Option<Meta>> {
        self.delegate(cx, Operation::Meta, None);
        self.runtime.meta(cx)
    }

    fn stop(&self, cx: &CallContext) -> ShimResult<()> {
        self.delegate(cx, Operation::Stop, None);
        self.runtime.stop(cx)
    }

    fn init_logging(&self, cx: &CallContext) -> ShimResult<()> {
        self.delegate(cx, Operation::InitLogging, None);
        self.runtime.init_logging(cx)
    }

    fn new_destroy_diff(&self, cx: &CallContext) -> ShimResult<InstanceDiff> {
        self.delegate(cx, Operation::NewDestroyDiff, None);
        self.runtime.new_destroy_diff(cx)
    }

    fn new_resource_config(
        &self,
        cx: &CallContext,
        values: IndexMap<String, TypedValue>,
    ) -> ShimResult<ResourceConfig> {
        self.delegate(cx, Operation::NewResourceConfig, None);
        self.runtime.new_resource_config(cx, values)
    }

    fn is_set(&self, cx: &CallContext, value: &TypedValue) -> ShimResult<Option<Vec<TypedValue>>> {
        self.delegate(cx, Operation::IsSet, None);
        self.runtime.is_set(cx, value)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        schema::{Resource, Schema},
        testing::{FakeRuntime, RecordingLogger},
    };

    fn provider() -> LegacyProvider<FakeRuntime> {
        LegacyProvider::new(
            SchemaMap::new().with("region", Schema::string().optional()),
            ResourceMap::new().with(
                "random_string",
                Resource::new(SchemaMap::new().with("length", Schema::int().required())),
            ),
            ResourceMap::new(),
            FakeRuntime::default(),
        )
    }

    #[test]
    fn test_schema_reads_return_declared_maps() {
        let provider = provider();
        let cx = CallContext::background();
        assert_eq!(provider.dialect(), Dialect::Legacy);
        assert!(provider.schema(&cx).unwrap().contains("region"));
        assert_eq!(provider.resources_map(&cx).unwrap().len(), 1);
        assert!(provider.data_sources_map(&cx).unwrap().is_empty());
    }

    #[test]
    fn test_runtime_operations_are_delegated_and_logged() {
        let provider = provider();
        let logger = Arc::new(RecordingLogger::default());
        let cx = CallContext::new("Configure").with_logger(logger.clone());

        provider.configure(&cx, &ResourceConfig::default()).unwrap();
        provider.stop(&cx).unwrap();

        assert_eq!(
            provider.runtime().calls(),
            vec![Operation::Configure, Operation::Stop]
        );
        assert_eq!(
            logger.messages(),
            vec![
                "debug: delegating Configure to legacy plugin",
                "debug: delegating Stop to legacy plugin",
            ]
        );
    }

    #[test]
    fn test_unknown_type_is_rejected_before_delegating() {
        let provider = provider();
        let cx = CallContext::background();
        let err = provider
            .refresh(&cx, "random_pet", &InstanceState::new("id"))
            .unwrap_err();
        assert!(matches!(err, ShimError::UnknownType { .. }));
        assert!(provider.runtime().calls().is_empty());

        provider
            .refresh(&cx, "random_string", &InstanceState::new("id"))
            .unwrap();
        assert_eq!(provider.runtime().calls(), vec![Operation::Refresh]);
    }
}
