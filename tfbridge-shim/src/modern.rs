//! Modern dialect: schemas computed on request.
//!
//! A modern plugin answers a provider-level schema request and hands out
//! factories for its resources and data sources. Each response carries
//! diagnostics; any error diagnostic makes the response unusable.

use std::sync::Arc;

use indexmap::IndexMap;
use tfbridge_types::TypeDescriptor;

use crate::{
    context::CallContext,
    diagnostic::{Diagnostic, Diagnostics},
    error::{SchemaKind, ShimError, ShimResult},
    provider::{Dialect, SchemaSource},
    schema::{Elem, Resource, ResourceMap, Schema, SchemaMap},
};

/// Provider-level schema request. Carries no payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchemaRequest;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaResponse {
    pub schema: ModernSchema,
    pub diagnostics: Diagnostics,
}

impl SchemaResponse {
    pub fn new(schema: ModernSchema) -> Self {
        Self {
            schema,
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn with_diagnostic(mut self, diagnostic: Diagnostic) -> Self {
        self.diagnostics.push(diagnostic);
        self
    }
}

/// A plugin written against the modern contract.
pub trait ModernPlugin: Send + Sync {
    /// Provider type name. Resource type names are derived from it.
    fn type_name(&self) -> String;

    fn schema(&self, cx: &CallContext, request: &SchemaRequest) -> SchemaResponse;

    fn resources(&self) -> Vec<Arc<dyn TypeFactory>>;

    fn data_sources(&self) -> Vec<Arc<dyn TypeFactory>>;
}

/// Factory for one resource or data source type of a modern plugin.
pub trait TypeFactory: Send + Sync {
    /// Type name, given the provider's type name.
    fn type_name(&self, provider_type_name: &str) -> String;

    fn schema(&self, cx: &CallContext) -> SchemaResponse;
}

/// Attribute of a modern schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub ty: TypeDescriptor,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
    pub description: Option<String>,
    pub deprecation_message: Option<String>,
}

impl Attribute {
    pub fn new(ty: TypeDescriptor) -> Self {
        Self {
            ty,
            required: false,
            optional: false,
            computed: false,
            sensitive: false,
            description: None,
            deprecation_message: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn to_schema(&self) -> Schema {
        let mut schema = schema_for(&self.ty);
        schema.required = self.required;
        schema.optional = self.optional;
        schema.computed = self.computed;
        schema.sensitive = self.sensitive;
        schema.description = self.description.clone();
        schema.deprecated = self.deprecation_message.clone();
        schema
    }
}

/// How a nested block repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NestingMode {
    List,
    Set,
    Single,
}

/// Nested block of a modern schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub nesting: NestingMode,
    pub schema: ModernSchema,
    pub min_items: usize,
    pub max_items: usize,
}

impl Block {
    pub fn new(nesting: NestingMode, schema: ModernSchema) -> Self {
        Self {
            nesting,
            schema,
            min_items: 0,
            max_items: 0,
        }
    }

    pub fn with_min_items(mut self, min_items: usize) -> Self {
        self.min_items = min_items;
        self
    }

    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    fn to_schema(&self) -> Schema {
        let resource = self.schema.to_resource();
        let schema = match self.nesting {
            NestingMode::List => Schema::list(resource),
            NestingMode::Set => Schema::set(resource),
            NestingMode::Single => Schema::object(resource),
        };
        let schema = schema
            .with_min_items(self.min_items)
            .with_max_items(self.max_items);
        if self.min_items > 0 {
            schema.required()
        } else {
            schema.optional()
        }
    }
}

/// Schema of a modern provider, resource, data source, or block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModernSchema {
    pub attributes: IndexMap<String, Attribute>,
    pub blocks: IndexMap<String, Block>,
    pub version: u64,
    pub description: Option<String>,
    pub deprecation_message: Option<String>,
}

impl ModernSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attribute(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
        self.attributes.insert(name.into(), attribute);
        self
    }

    pub fn with_block(mut self, name: impl Into<String>, block: Block) -> Self {
        self.blocks.insert(name.into(), block);
        self
    }

    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    /// Unified field specs: attributes first, then blocks.
    pub fn to_schema_map(&self) -> SchemaMap {
        let attributes = self
            .attributes
            .iter()
            .map(|(name, attribute)| (name.clone(), attribute.to_schema()));
        let blocks = self
            .blocks
            .iter()
            .map(|(name, block)| (name.clone(), block.to_schema()));
        attributes.chain(blocks).collect()
    }

    pub fn to_resource(&self) -> Resource {
        Resource {
            schema: self.to_schema_map(),
            schema_version: self.version,
            deprecation_message: self.deprecation_message.clone(),
            description: self.description.clone(),
        }
    }
}

fn schema_for(ty: &TypeDescriptor) -> Schema {
    match ty {
        TypeDescriptor::Bool => Schema::bool(),
        TypeDescriptor::Number => Schema::float(),
        TypeDescriptor::String => Schema::string(),
        TypeDescriptor::List(elem) => Schema::list(elem_for(elem)),
        TypeDescriptor::Map(elem) => Schema::map(elem_for(elem)),
        TypeDescriptor::Object(_) => Schema::object(resource_for(ty)),
    }
}

fn elem_for(ty: &TypeDescriptor) -> Elem {
    if ty.is_object() {
        Elem::Resource(resource_for(ty))
    } else {
        Elem::from(schema_for(ty))
    }
}

fn resource_for(ty: &TypeDescriptor) -> Resource {
    let schema = ty
        .fields()
        .into_iter()
        .flatten()
        .map(|(name, field)| (name.clone(), schema_for(field).optional()))
        .collect();
    Resource::new(schema)
}

/// Schema source over a modern plugin.
pub struct ModernSource<P> {
    plugin: P,
}

impl<P: ModernPlugin> ModernSource<P> {
    pub fn new(plugin: P) -> Self {
        Self { plugin }
    }

    pub fn plugin(&self) -> &P {
        &self.plugin
    }

    fn gather(
        &self,
        cx: &CallContext,
        kind: SchemaKind,
        factories: Vec<Arc<dyn TypeFactory>>,
    ) -> ShimResult<Arc<ResourceMap>> {
        let provider_type_name = self.plugin.type_name();
        let mut map = ResourceMap::new();

        for factory in factories {
            let name = factory.type_name(&provider_type_name);
            let response = factory.schema(cx);
            if response.diagnostics.has_error() {
                return Err(ShimError::Gather {
                    kind,
                    message: format!("{}: {}", name, first_error(&response.diagnostics)),
                    diagnostics: response.diagnostics.into_vec(),
                });
            }
            log_warnings(cx, &response.diagnostics);
            if map.contains(&name) {
                return Err(ShimError::DuplicateType { kind, name });
            }
            map.insert(name, response.schema.to_resource());
        }

        Ok(Arc::new(map))
    }
}

impl<P: ModernPlugin> SchemaSource for ModernSource<P> {
    fn dialect(&self) -> Dialect {
        Dialect::Modern
    }

    fn schema(&self, cx: &CallContext) -> ShimResult<Arc<SchemaMap>> {
        let response = self.plugin.schema(cx, &SchemaRequest);
        if response.diagnostics.has_error() {
            return Err(ShimError::SchemaDiagnostics {
                summary: first_error(&response.diagnostics),
                diagnostics: response.diagnostics.into_vec(),
            });
        }
        log_warnings(cx, &response.diagnostics);
        Ok(Arc::new(response.schema.to_schema_map()))
    }

    fn resources_map(&self, cx: &CallContext) -> ShimResult<Arc<ResourceMap>> {
        self.gather(cx, SchemaKind::Resource, self.plugin.resources())
    }

    fn data_sources_map(&self, cx: &CallContext) -> ShimResult<Arc<ResourceMap>> {
        self.gather(cx, SchemaKind::DataSource, self.plugin.data_sources())
    }
}

fn first_error(diagnostics: &Diagnostics) -> String {
    diagnostics
        .errors()
        .next()
        .map(|d| d.to_string())
        .unwrap_or_default()
}

fn log_warnings(cx: &CallContext, diagnostics: &Diagnostics) {
    for warning in diagnostics.warnings() {
        cx.logger().warn(&warning.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        schema::ValueType,
        testing::{FakeModernPlugin, FakeType, RecordingLogger},
    };

    #[test]
    fn test_attribute_shapes() {
        let schema = ModernSchema::new()
            .with_attribute("count", Attribute::new(TypeDescriptor::Number).optional())
            .with_attribute(
                "tags",
                Attribute::new(TypeDescriptor::map(TypeDescriptor::String)).optional(),
            )
            .with_attribute(
                "endpoint",
                Attribute::new(TypeDescriptor::object([("url", TypeDescriptor::String)]))
                    .computed(),
            )
            .to_schema_map();

        assert_eq!(schema.get("count").map(|s| s.ty), Some(ValueType::Float));
        assert_eq!(schema.get("tags").map(|s| s.ty), Some(ValueType::Map));
        let endpoint = schema.get("endpoint").unwrap();
        assert_eq!(endpoint.ty, ValueType::Object);
        assert!(endpoint.computed);
        assert_eq!(
            endpoint.type_descriptor(),
            TypeDescriptor::object([("url", TypeDescriptor::String)])
        );
    }

    #[test]
    fn test_descriptor_preserved_through_conversion() {
        let ty = TypeDescriptor::list(TypeDescriptor::object([
            ("port", TypeDescriptor::Number),
            ("hosts", TypeDescriptor::list(TypeDescriptor::String)),
        ]));
        let schema = ModernSchema::new()
            .with_attribute("rules", Attribute::new(ty.clone()).optional())
            .to_schema_map();
        assert_eq!(schema.get("rules").unwrap().type_descriptor(), ty);
    }

    #[test]
    fn test_blocks() {
        let inner = ModernSchema::new()
            .with_attribute("create", Attribute::new(TypeDescriptor::String).optional());
        let schema = ModernSchema::new()
            .with_attribute("name", Attribute::new(TypeDescriptor::String).required())
            .with_block("timeouts", Block::new(NestingMode::Single, inner.clone()))
            .with_block(
                "rule",
                Block::new(NestingMode::Set, inner).with_min_items(1).with_max_items(3),
            )
            .to_schema_map();

        assert_eq!(
            schema.names().collect::<Vec<_>>(),
            vec!["name", "timeouts", "rule"]
        );
        let timeouts = schema.get("timeouts").unwrap();
        assert_eq!(timeouts.ty, ValueType::Object);
        assert!(timeouts.optional);

        let rule = schema.get("rule").unwrap();
        assert_eq!(rule.ty, ValueType::Set);
        assert!(rule.required);
        assert_eq!((rule.min_items, rule.max_items), (1, 3));
        assert!(matches!(rule.elem, Some(Elem::Resource(_))));
    }

    #[test]
    fn test_gather_resources() {
        let plugin = FakeModernPlugin::new("random").with_resource(FakeType::new(
            "string",
            ModernSchema::new()
                .with_attribute("name", Attribute::new(TypeDescriptor::String).required())
                .with_version(2),
        ));
        let source = ModernSource::new(plugin);
        let resources = source.resources_map(&CallContext::background()).unwrap();

        assert_eq!(resources.names().collect::<Vec<_>>(), vec!["random_string"]);
        let resource = resources.get("random_string").unwrap();
        assert_eq!(resource.schema_version, 2);
        assert!(resource.schema.get("name").unwrap().required);
    }

    #[test]
    fn test_gather_rejects_duplicates() {
        let plugin = FakeModernPlugin::new("random")
            .with_data_source(FakeType::new("pet", ModernSchema::new()))
            .with_data_source(FakeType::new("pet", ModernSchema::new()));
        let err = ModernSource::new(plugin)
            .data_sources_map(&CallContext::background())
            .unwrap_err();
        assert!(matches!(
            err,
            ShimError::DuplicateType {
                kind: SchemaKind::DataSource,
                ..
            }
        ));
    }

    #[test]
    fn test_gather_surfaces_factory_errors() {
        let plugin = FakeModernPlugin::new("random").with_resource(
            FakeType::new("string", ModernSchema::new()).with_error("invalid attribute type"),
        );
        let err = ModernSource::new(plugin)
            .resources_map(&CallContext::background())
            .unwrap_err();
        insta::assert_snapshot!(
            err.to_string(),
            @"failed to gather resource schemas: random_string: error: invalid attribute type"
        );
    }

    #[test]
    fn test_schema_error_diagnostics_are_surfaced() {
        let plugin = FakeModernPlugin::new("random").with_schema_error("bad provider schema");
        let err = ModernSource::new(plugin)
            .schema(&CallContext::background())
            .unwrap_err();
        assert!(matches!(err, ShimError::SchemaDiagnostics { .. }));
    }

    #[test]
    fn test_schema_warnings_are_logged() {
        let plugin = FakeModernPlugin::new("random").with_schema_warning("region is deprecated");
        let logger = std::sync::Arc::new(RecordingLogger::default());
        let cx = CallContext::background().with_logger(logger.clone());
        ModernSource::new(plugin).schema(&cx).unwrap();
        assert_eq!(
            logger.messages(),
            vec!["warn: warning: region is deprecated"]
        );
    }
}
