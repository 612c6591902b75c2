//! Schema sources backed by already-computed maps.

use std::sync::{Arc, PoisonError, RwLock};

use crate::{
    context::CallContext,
    error::ShimResult,
    provider::{Dialect, SchemaSource},
    schema::{ResourceMap, SchemaMap},
};

/// In-memory schema, e.g. restored from persisted metadata.
#[derive(Debug, Clone)]
pub struct StaticSchema {
    dialect: Dialect,
    schema: Arc<SchemaMap>,
    resources: Arc<ResourceMap>,
    data_sources: Arc<ResourceMap>,
}

impl StaticSchema {
    pub fn new(schema: SchemaMap, resources: ResourceMap, data_sources: ResourceMap) -> Self {
        Self {
            dialect: Dialect::Legacy,
            schema: Arc::new(schema),
            resources: Arc::new(resources),
            data_sources: Arc::new(data_sources),
        }
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Snapshot every map of `source`.
    pub fn capture<S: SchemaSource + ?Sized>(source: &S, cx: &CallContext) -> ShimResult<Self> {
        Ok(Self {
            dialect: source.dialect(),
            schema: source.schema(cx)?,
            resources: source.resources_map(cx)?,
            data_sources: source.data_sources_map(cx)?,
        })
    }
}

impl SchemaSource for StaticSchema {
    fn dialect(&self) -> Dialect {
        self.dialect
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

/// Lazily filled, read-mostly cache of one map.
struct Slot<T> {
    value: RwLock<Option<Arc<T>>>,
}

impl<T> Slot<T> {
    fn new() -> Self {
        Self {
            value: RwLock::new(None),
        }
    }

    /// Returns the cached value, or computes and stores it.
    ///
    /// Concurrent first callers may each compute; the first stored value wins.
    /// Errors are returned without being stored.
    fn get_or_try_init(
        &self,
        compute: impl FnOnce() -> ShimResult<Arc<T>>,
    ) -> ShimResult<Arc<T>> {
        if let Some(value) = self
            .value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            return Ok(Arc::clone(value));
        }

        let computed = compute()?;
        let mut slot = self.value.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(slot.get_or_insert(computed)))
    }

    fn is_filled(&self) -> bool {
        self.value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

/// Caches the maps of a schema source for the cache's lifetime.
pub struct CachedSchema<S> {
    source: S,
    schema: Slot<SchemaMap>,
    resources: Slot<ResourceMap>,
    data_sources: Slot<ResourceMap>,
}

impl<S: SchemaSource> CachedSchema<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            schema: Slot::new(),
            resources: Slot::new(),
            data_sources: Slot::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// True once all three maps have been computed.
    pub fn is_warm(&self) -> bool {
        self.schema.is_filled() && self.resources.is_filled() && self.data_sources.is_filled()
    }
}

impl<S: SchemaSource> SchemaSource for CachedSchema<S> {
    fn dialect(&self) -> Dialect {
        self.source.dialect()
    }

    fn schema(&self, cx: &CallContext) -> ShimResult<Arc<SchemaMap>> {
        self.schema.get_or_try_init(|| self.source.schema(cx))
    }

    fn resources_map(&self, cx: &CallContext) -> ShimResult<Arc<ResourceMap>> {
        self.resources.get_or_try_init(|| self.source.resources_map(cx))
    }

    fn data_sources_map(&self, cx: &CallContext) -> ShimResult<Arc<ResourceMap>> {
        self.data_sources
            .get_or_try_init(|| self.source.data_sources_map(cx))
    }
}

#[cfg(test)]
mod tests {
    use tfbridge_types::TypeDescriptor;

    use super::*;
    use crate::{
        modern::{Attribute, ModernSchema, ModernSource},
        schema::Schema,
        testing::{FakeModernPlugin, FakeType},
    };

    #[test]
    fn test_static_schema() {
        let source = StaticSchema::new(
            SchemaMap::new().with("region", Schema::string()),
            ResourceMap::new(),
            ResourceMap::new(),
        );
        let cx = CallContext::background();
        assert_eq!(source.dialect(), Dialect::Legacy);
        let first = source.schema(&cx).unwrap();
        let second = source.schema(&cx).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_capture() {
        let plugin = FakeModernPlugin::new("random").with_resource(FakeType::new(
            "id",
            ModernSchema::new().with_attribute("b64", Attribute::new(TypeDescriptor::String)),
        ));
        let snapshot =
            StaticSchema::capture(&ModernSource::new(plugin), &CallContext::background()).unwrap();
        assert_eq!(snapshot.dialect(), Dialect::Modern);
        assert!(
            snapshot
                .resources_map(&CallContext::background())
                .unwrap()
                .contains("random_id")
        );
    }

    #[test]
    fn test_cache_computes_once() {
        let plugin = FakeModernPlugin::new("random");
        let calls = plugin.schema_calls();
        let cached = CachedSchema::new(ModernSource::new(plugin));
        let cx = CallContext::background();

        let first = cached.schema(&cx).unwrap();
        let second = cached.schema(&cx).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.get(), 1);
        assert!(!cached.is_warm());

        cached.resources_map(&cx).unwrap();
        cached.data_sources_map(&cx).unwrap();
        assert!(cached.is_warm());
    }

    #[test]
    fn test_cache_does_not_keep_failures() {
        let plugin = FakeModernPlugin::new("random").with_schema_error("boom");
        let calls = plugin.schema_calls();
        let cached = CachedSchema::new(ModernSource::new(plugin));
        let cx = CallContext::background();

        assert!(cached.schema(&cx).is_err());
        assert!(cached.schema(&cx).is_err());
        assert_eq!(calls.get(), 2);
    }
}
