//! Test doubles for shim consumers.
//!
//! This module is only available when the `testing` feature is enabled
//! or during tests.

use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicUsize, Ordering},
};

use indexmap::IndexMap;
use tfbridge_types::TypedValue;

use crate::{
    context::{CallContext, Log, Logger},
    diagnostic::{Diagnostic, Diagnostics},
    error::{Operation, ShimResult},
    modern::{ModernPlugin, ModernSchema, SchemaRequest, SchemaResponse, TypeFactory},
    provider::{DiffOptions, InstanceDiff, InstanceState, Meta, ResourceConfig, Runtime},
};

/// Logger that keeps every message as `"<level>: <message>"`.
///
/// Status messages are recorded as `"status <level>: <message>"`.
#[derive(Debug, Default)]
pub struct RecordingLogger {
    messages: Arc<Mutex<Vec<String>>>,
    status: RecordingStatus,
}

impl RecordingLogger {
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, level: &str, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(format!("{}: {}", level, message));
    }
}

impl Log for RecordingLogger {
    fn debug(&self, message: &str) {
        self.record("debug", message);
    }

    fn info(&self, message: &str) {
        self.record("info", message);
    }

    fn warn(&self, message: &str) {
        self.record("warn", message);
    }

    fn error(&self, message: &str) {
        self.record("error", message);
    }
}

impl Logger for RecordingLogger {
    fn status(&self) -> &dyn Log {
        &self.status
    }
}

#[derive(Debug, Default)]
struct RecordingStatus {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingLogger {
    /// Recorded status messages.
    pub fn status_messages(&self) -> Vec<String> {
        self.status
            .messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl RecordingStatus {
    fn record(&self, level: &str, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(format!("status {}: {}", level, message));
    }
}

impl Log for RecordingStatus {
    fn debug(&self, message: &str) {
        self.record("debug", message);
    }

    fn info(&self, message: &str) {
        self.record("info", message);
    }

    fn warn(&self, message: &str) {
        self.record("warn", message);
    }

    fn error(&self, message: &str) {
        self.record("error", message);
    }
}

/// Shared counter of calls into a fake.
#[derive(Debug, Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Resource or data source factory with a fixed schema.
#[derive(Debug, Clone)]
pub struct FakeType {
    suffix: String,
    schema: ModernSchema,
    diagnostics: Diagnostics,
}

impl FakeType {
    /// Type named `<provider>_<suffix>`.
    pub fn new(suffix: impl Into<String>, schema: ModernSchema) -> Self {
        Self {
            suffix: suffix.into(),
            schema,
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn with_error(mut self, summary: impl Into<String>) -> Self {
        self.diagnostics.push(Diagnostic::error(summary));
        self
    }
}

impl TypeFactory for FakeType {
    fn type_name(&self, provider_type_name: &str) -> String {
        format!("{}_{}", provider_type_name, self.suffix)
    }

    fn schema(&self, _cx: &CallContext) -> SchemaResponse {
        SchemaResponse {
            schema: self.schema.clone(),
            diagnostics: self.diagnostics.clone(),
        }
    }
}

/// Modern plugin answering from fixed schemas.
#[derive(Debug, Clone)]
pub struct FakeModernPlugin {
    type_name: String,
    schema: ModernSchema,
    diagnostics: Diagnostics,
    resources: Vec<FakeType>,
    data_sources: Vec<FakeType>,
    schema_calls: CallCounter,
}

impl FakeModernPlugin {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            schema: ModernSchema::new(),
            diagnostics: Diagnostics::new(),
            resources: Vec::new(),
            data_sources: Vec::new(),
            schema_calls: CallCounter::default(),
        }
    }

    pub fn with_provider_schema(mut self, schema: ModernSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn with_resource(mut self, resource: FakeType) -> Self {
        self.resources.push(resource);
        self
    }

    pub fn with_data_source(mut self, data_source: FakeType) -> Self {
        self.data_sources.push(data_source);
        self
    }

    pub fn with_schema_error(mut self, summary: impl Into<String>) -> Self {
        self.diagnostics.push(Diagnostic::error(summary));
        self
    }

    pub fn with_schema_warning(mut self, summary: impl Into<String>) -> Self {
        self.diagnostics.push(Diagnostic::warning(summary));
        self
    }

    /// Counter of provider-level schema requests.
    pub fn schema_calls(&self) -> CallCounter {
        self.schema_calls.clone()
    }
}

impl ModernPlugin for FakeModernPlugin {
    fn type_name(&self) -> String {
        self.type_name.clone()
    }

    fn schema(&self, _cx: &CallContext, _request: &SchemaRequest) -> SchemaResponse {
        self.schema_calls.bump();
        SchemaResponse {
            schema: self.schema.clone(),
            diagnostics: self.diagnostics.clone(),
        }
    }

    fn resources(&self) -> Vec<Arc<dyn TypeFactory>> {
        self.resources
            .iter()
            .map(|r| Arc::new(r.clone()) as Arc<dyn TypeFactory>)
            .collect()
    }

    fn data_sources(&self) -> Vec<Arc<dyn TypeFactory>> {
        self.data_sources
            .iter()
            .map(|d| Arc::new(d.clone()) as Arc<dyn TypeFactory>)
            .collect()
    }
}

/// Runtime that records each operation and returns empty results.
#[derive(Debug, Default)]
pub struct FakeRuntime {
    calls: Mutex<Vec<Operation>>,
}

impl FakeRuntime {
    pub fn calls(&self) -> Vec<Operation> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, operation: Operation) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(operation);
    }
}

impl Runtime for FakeRuntime {
    fn validate(&self, _cx: &CallContext, _config: &ResourceConfig) -> ShimResult<Diagnostics> {
        self.record(Operation::Validate);
        Ok(Diagnostics::new())
    }

    fn validate_resource(
        &self,
        _cx: &CallContext,
        _type_name: &str,
        _config: &ResourceConfig,
    ) -> ShimResult<Diagnostics> {
        self.record(Operation::ValidateResource);
        Ok(Diagnostics::new())
    }

    fn validate_data_source(
        &self,
        _cx: &CallContext,
        _type_name: &str,
        _config: &ResourceConfig,
    ) -> ShimResult<Diagnostics> {
        self.record(Operation::ValidateDataSource);
        Ok(Diagnostics::new())
    }

    fn configure(&self, _cx: &CallContext, _config: &ResourceConfig) -> ShimResult<()> {
        self.record(Operation::Configure);
        Ok(())
    }

    fn diff(
        &self,
        _cx: &CallContext,
        _type_name: &str,
        _state: Option<&InstanceState>,
        _config: &ResourceConfig,
        _options: &DiffOptions,
    ) -> ShimResult<Option<InstanceDiff>> {
        self.record(Operation::Diff);
        Ok(None)
    }

    fn apply(
        &self,
        _cx: &CallContext,
        _type_name: &str,
        state: Option<&InstanceState>,
        _diff: &InstanceDiff,
    ) -> ShimResult<Option<InstanceState>> {
        self.record(Operation::Apply);
        Ok(state.cloned())
    }

    fn refresh(
        &self,
        _cx: &CallContext,
        _type_name: &str,
        state: &InstanceState,
    ) -> ShimResult<Option<InstanceState>> {
        self.record(Operation::Refresh);
        Ok(Some(state.clone()))
    }

    fn read_data_diff(
        &self,
        _cx: &CallContext,
        _type_name: &str,
        _config: &ResourceConfig,
    ) -> ShimResult<Option<InstanceDiff>> {
        self.record(Operation::ReadDataDiff);
        Ok(None)
    }

    fn read_data_apply(
        &self,
        _cx: &CallContext,
        _type_name: &str,
        _diff: &InstanceDiff,
    ) -> ShimResult<Option<InstanceState>> {
        self.record(Operation::ReadDataApply);
        Ok(None)
    }

    fn meta(&self, _cx: &CallContext) -> ShimResult<Option<Meta>> {
        self.record(Operation::Meta);
        Ok(None)
    }

    fn stop(&self, _cx: &CallContext) -> ShimResult<()> {
        self.record(Operation::Stop);
        Ok(())
    }

    fn init_logging(&self, _cx: &CallContext) -> ShimResult<()> {
        self.record(Operation::InitLogging);
        Ok(())
    }

    fn new_destroy_diff(&self, _cx: &CallContext) -> ShimResult<InstanceDiff> {
        self.record(Operation::NewDestroyDiff);
        Ok(InstanceDiff::destroy())
    }

    fn new_resource_config(
        &self,
        _cx: &CallContext,
        values: IndexMap<String, TypedValue>,
    ) -> ShimResult<ResourceConfig> {
        self.record(Operation::NewResourceConfig);
        Ok(ResourceConfig::new(values))
    }

    fn is_set(
        &self,
        _cx: &CallContext,
        value: &TypedValue,
    ) -> ShimResult<Option<Vec<TypedValue>>> {
        self.record(Operation::IsSet);
        Ok(value.as_list().map(<[TypedValue]>::to_vec))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_logger_separates_status() {
        let logger = RecordingLogger::default();
        logger.info("starting");
        logger.status().info("50%");
        assert_eq!(logger.messages(), vec!["info: starting"]);
        assert_eq!(logger.status_messages(), vec!["status info: 50%"]);
    }
}
