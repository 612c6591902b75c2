//! Persisted schema metadata.
//!
//! A provider's schema can be written to JSON once and restored later
//! without loading the plugin. Restored schemas are wrapped in a
//! [`SchemaOnlyProvider`], so they cannot run anything.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    context::CallContext,
    error::ShimResult,
    provider::SchemaSource,
    schema::{Elem, Resource, ResourceMap, Schema, SchemaMap, ValueType},
    schema_only::SchemaOnlyProvider,
    snapshot::StaticSchema,
};

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_zero<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

/// Serializable field spec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarshallableSchema {
    #[serde(rename = "type")]
    pub ty: ValueType,
    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub computed: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub force_new: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub sensitive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<MarshallableElem>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub max_items: usize,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub min_items: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl MarshallableSchema {
    pub fn unmarshal(&self) -> Schema {
        Schema {
            ty: self.ty,
            optional: self.optional,
            required: self.required,
            computed: self.computed,
            force_new: self.force_new,
            sensitive: self.sensitive,
            elem: self.element.as_ref().map(MarshallableElem::unmarshal),
            max_items: self.max_items,
            min_items: self.min_items,
            deprecated: self.deprecated.clone(),
            description: self.description.clone(),
        }
    }
}

impl From<&Schema> for MarshallableSchema {
    fn from(schema: &Schema) -> Self {
        Self {
            ty: schema.ty,
            optional: schema.optional,
            required: schema.required,
            computed: schema.computed,
            force_new: schema.force_new,
            sensitive: schema.sensitive,
            element: schema.elem.as_ref().map(MarshallableElem::from),
            max_items: schema.max_items,
            min_items: schema.min_items,
            deprecated: schema.deprecated.clone(),
            description: schema.description.clone(),
        }
    }
}

/// Serializable element: `{"schema": ...}` or `{"resource": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarshallableElem {
    Schema(Box<MarshallableSchema>),
    Resource(MarshallableResource),
}

impl MarshallableElem {
    pub fn unmarshal(&self) -> Elem {
        match self {
            MarshallableElem::Schema(schema) => Elem::from(schema.unmarshal()),
            MarshallableElem::Resource(resource) => Elem::Resource(resource.unmarshal()),
        }
    }
}

impl From<&Elem> for MarshallableElem {
    fn from(elem: &Elem) -> Self {
        match elem {
            Elem::Schema(schema) => {
                MarshallableElem::Schema(Box::new(MarshallableSchema::from(schema.as_ref())))
            }
            Elem::Resource(resource) => {
                MarshallableElem::Resource(MarshallableResource::from(resource))
            }
        }
    }
}

pub type MarshallableSchemaMap = IndexMap<String, MarshallableSchema>;

fn marshal_schema_map(schema: &SchemaMap) -> MarshallableSchemaMap {
    schema
        .iter()
        .map(|(name, field)| (name.to_string(), MarshallableSchema::from(field)))
        .collect()
}

fn unmarshal_schema_map(schema: &MarshallableSchemaMap) -> SchemaMap {
    schema
        .iter()
        .map(|(name, field)| (name.clone(), field.unmarshal()))
        .collect()
}

/// Serializable resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarshallableResource {
    pub schema: MarshallableSchemaMap,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub schema_version: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecation_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl MarshallableResource {
    pub fn unmarshal(&self) -> Resource {
        Resource {
            schema: unmarshal_schema_map(&self.schema),
            schema_version: self.schema_version,
            deprecation_message: self.deprecation_message.clone(),
            description: self.description.clone(),
        }
    }
}

impl From<&Resource> for MarshallableResource {
    fn from(resource: &Resource) -> Self {
        Self {
            schema: marshal_schema_map(&resource.schema),
            schema_version: resource.schema_version,
            deprecation_message: resource.deprecation_message.clone(),
            description: resource.description.clone(),
        }
    }
}

pub type MarshallableResourceMap = IndexMap<String, MarshallableResource>;

fn marshal_resource_map(resources: &ResourceMap) -> MarshallableResourceMap {
    resources
        .iter()
        .map(|(name, resource)| (name.to_string(), MarshallableResource::from(resource)))
        .collect()
}

fn unmarshal_resource_map(resources: &MarshallableResourceMap) -> ResourceMap {
    resources
        .iter()
        .map(|(name, resource)| (name.clone(), resource.unmarshal()))
        .collect()
}

/// Serializable provider schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarshallableProvider {
    #[serde(default)]
    pub schema: MarshallableSchemaMap,
    #[serde(default)]
    pub resources: MarshallableResourceMap,
    #[serde(default)]
    pub data_sources: MarshallableResourceMap,
}

impl MarshallableProvider {
    /// Read every map of `source` into serializable form.
    pub fn from_source<S: SchemaSource + ?Sized>(
        source: &S,
        cx: &CallContext,
    ) -> ShimResult<Self> {
        Ok(Self {
            schema: marshal_schema_map(&*source.schema(cx)?),
            resources: marshal_resource_map(&*source.resources_map(cx)?),
            data_sources: marshal_resource_map(&*source.data_sources_map(cx)?),
        })
    }

    pub fn from_json(json: &str) -> ShimResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> ShimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_static(&self) -> StaticSchema {
        StaticSchema::new(
            unmarshal_schema_map(&self.schema),
            unmarshal_resource_map(&self.resources),
            unmarshal_resource_map(&self.data_sources),
        )
    }

    /// Restore as a provider that can only answer schema reads.
    pub fn to_provider(&self) -> SchemaOnlyProvider<StaticSchema> {
        SchemaOnlyProvider::new(self.to_static())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::Operation, provider::Runtime};

    fn sample() -> StaticSchema {
        let rule = Resource::new(
            SchemaMap::new()
                .with("port", Schema::int().required())
                .with("cidrs", Schema::list(Schema::string()).optional()),
        );
        StaticSchema::new(
            SchemaMap::new().with("token", Schema::string().optional().sensitive()),
            ResourceMap::new().with(
                "acme_firewall",
                Resource::new(
                    SchemaMap::new()
                        .with("name", Schema::string().required().force_new())
                        .with("rule", Schema::list(rule).with_max_items(10))
                        .with(
                            "legacy",
                            Schema::bool().optional().with_deprecated("use rule instead"),
                        ),
                )
                .with_schema_version(1),
            ),
            ResourceMap::new(),
        )
    }

    #[test]
    fn test_json_shape() {
        let field = MarshallableSchema::from(&Schema::list(Schema::string()).required().with_max_items(1));
        insta::assert_snapshot!(
            serde_json::to_string(&field).unwrap(),
            @r#"{"type":"list","required":true,"element":{"schema":{"type":"string"}},"maxItems":1}"#
        );
    }

    #[test]
    fn test_round_trip() {
        let cx = CallContext::background();
        let source = sample();
        let json = MarshallableProvider::from_source(&source, &cx)
            .unwrap()
            .to_json()
            .unwrap();

        let restored = MarshallableProvider::from_json(&json).unwrap().to_provider();
        assert_eq!(restored.schema(&cx).unwrap(), source.schema(&cx).unwrap());
        assert_eq!(
            restored.resources_map(&cx).unwrap(),
            source.resources_map(&cx).unwrap()
        );
        let firewall = restored.resources_map(&cx).unwrap();
        let firewall = firewall.get("acme_firewall").unwrap();
        assert_eq!(
            firewall.type_descriptor(),
            source
                .resources_map(&cx)
                .unwrap()
                .get("acme_firewall")
                .unwrap()
                .type_descriptor()
        );
    }

    #[test]
    fn test_restored_provider_cannot_run() {
        let provider = MarshallableProvider::default().to_provider();
        let err = provider.meta(&CallContext::background()).unwrap_err();
        assert_eq!(err.unsupported_operation(), Some(Operation::Meta));
    }

    #[test]
    fn test_invalid_json() {
        let err = MarshallableProvider::from_json(r#"{"schema": {"x": {"type": "tuple"}}}"#)
            .unwrap_err();
        assert!(matches!(err, crate::error::ShimError::Metadata(_)));
    }
}
