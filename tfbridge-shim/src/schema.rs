//! Unified schema model shared by both plugin dialects.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tfbridge_types::TypeDescriptor;

/// Value type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Bool,
    Int,
    Float,
    String,
    List,
    Map,
    Set,
    /// Single nested object; the element is always a [`Resource`].
    Object,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::String => "string",
            ValueType::List => "list",
            ValueType::Map => "map",
            ValueType::Set => "set",
            ValueType::Object => "object",
        }
    }

    /// Whether fields of this type carry an element.
    pub fn is_collection(&self) -> bool {
        matches!(
            self,
            ValueType::List | ValueType::Map | ValueType::Set | ValueType::Object
        )
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Element of a collection field.
#[derive(Debug, Clone, PartialEq)]
pub enum Elem {
    Schema(Box<Schema>),
    Resource(Resource),
}

impl Elem {
    pub fn type_descriptor(&self) -> TypeDescriptor {
        match self {
            Elem::Schema(schema) => schema.type_descriptor(),
            Elem::Resource(resource) => resource.type_descriptor(),
        }
    }
}

impl From<Schema> for Elem {
    fn from(schema: Schema) -> Self {
        Elem::Schema(Box::new(schema))
    }
}

impl From<Resource> for Elem {
    fn from(resource: Resource) -> Self {
        Elem::Resource(resource)
    }
}

/// Field spec.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub ty: ValueType,
    pub optional: bool,
    pub required: bool,
    pub computed: bool,
    pub force_new: bool,
    pub sensitive: bool,
    pub elem: Option<Elem>,
    /// Zero means unbounded.
    pub max_items: usize,
    pub min_items: usize,
    pub deprecated: Option<String>,
    pub description: Option<String>,
}

impl Schema {
    pub fn new(ty: ValueType) -> Self {
        Self {
            ty,
            optional: false,
            required: false,
            computed: false,
            force_new: false,
            sensitive: false,
            elem: None,
            max_items: 0,
            min_items: 0,
            deprecated: None,
            description: None,
        }
    }

    pub fn bool() -> Self {
        Self::new(ValueType::Bool)
    }

    pub fn int() -> Self {
        Self::new(ValueType::Int)
    }

    pub fn float() -> Self {
        Self::new(ValueType::Float)
    }

    pub fn string() -> Self {
        Self::new(ValueType::String)
    }

    pub fn list(elem: impl Into<Elem>) -> Self {
        Self::new(ValueType::List).with_elem(elem)
    }

    pub fn set(elem: impl Into<Elem>) -> Self {
        Self::new(ValueType::Set).with_elem(elem)
    }

    pub fn map(elem: impl Into<Elem>) -> Self {
        Self::new(ValueType::Map).with_elem(elem)
    }

    pub fn object(resource: Resource) -> Self {
        Self::new(ValueType::Object).with_elem(resource)
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

    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn with_elem(mut self, elem: impl Into<Elem>) -> Self {
        self.elem = Some(elem.into());
        self
    }

    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    pub fn with_min_items(mut self, min_items: usize) -> Self {
        self.min_items = min_items;
        self
    }

    pub fn with_deprecated(mut self, message: impl Into<String>) -> Self {
        self.deprecated = Some(message.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Descriptor of values stored in this field.
    ///
    /// Int and Float are both Number; Set is read as List. A collection
    /// without an element holds strings.
    pub fn type_descriptor(&self) -> TypeDescriptor {
        match self.ty {
            ValueType::Bool => TypeDescriptor::Bool,
            ValueType::Int | ValueType::Float => TypeDescriptor::Number,
            ValueType::String => TypeDescriptor::String,
            ValueType::List | ValueType::Set => TypeDescriptor::list(self.elem_descriptor()),
            ValueType::Map => TypeDescriptor::map(self.elem_descriptor()),
            ValueType::Object => match &self.elem {
                Some(Elem::Resource(resource)) => resource.type_descriptor(),
                _ => TypeDescriptor::object(std::iter::empty::<(String, TypeDescriptor)>()),
            },
        }
    }

    fn elem_descriptor(&self) -> TypeDescriptor {
        self.elem
            .as_ref()
            .map(Elem::type_descriptor)
            .unwrap_or(TypeDescriptor::String)
    }
}

/// Ordered field specs of a provider config or resource.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaMap(IndexMap<String, Schema>);

impl SchemaMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, schema: Schema) -> Option<Schema> {
        self.0.insert(name.into(), schema)
    }

    pub fn with(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.insert(name, schema);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Schema)> {
        self.0.iter().map(|(name, schema)| (name.as_str(), schema))
    }

    /// Object descriptor with one attribute per field.
    pub fn type_descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::object(
            self.0
                .iter()
                .map(|(name, schema)| (name.clone(), schema.type_descriptor())),
        )
    }
}

impl FromIterator<(String, Schema)> for SchemaMap {
    fn from_iter<I: IntoIterator<Item = (String, Schema)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for SchemaMap {
    type Item = (String, Schema);
    type IntoIter = indexmap::map::IntoIter<String, Schema>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// A resource, data source, or nested block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resource {
    pub schema: SchemaMap,
    pub schema_version: u64,
    pub deprecation_message: Option<String>,
    pub description: Option<String>,
}

impl Resource {
    pub fn new(schema: SchemaMap) -> Self {
        Self {
            schema,
            ..Default::default()
        }
    }

    pub fn with_schema_version(mut self, version: u64) -> Self {
        self.schema_version = version;
        self
    }

    pub fn with_deprecation_message(mut self, message: impl Into<String>) -> Self {
        self.deprecation_message = Some(message.into());
        self
    }

    pub fn type_descriptor(&self) -> TypeDescriptor {
        self.schema.type_descriptor()
    }
}

/// Ordered resources or data sources, keyed by type name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceMap(IndexMap<String, Resource>);

impl ResourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, resource: Resource) -> Option<Resource> {
        self.0.insert(name.into(), resource)
    }

    pub fn with(mut self, name: impl Into<String>, resource: Resource) -> Self {
        self.insert(name, resource);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Resource> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Resource)> {
        self.0.iter().map(|(name, resource)| (name.as_str(), resource))
    }
}

impl FromIterator<(String, Resource)> for ResourceMap {
    fn from_iter<I: IntoIterator<Item = (String, Resource)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ResourceMap {
    type Item = (String, Resource);
    type IntoIter = indexmap::map::IntoIter<String, Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_descriptors() {
        assert_eq!(Schema::bool().type_descriptor(), TypeDescriptor::Bool);
        assert_eq!(Schema::int().type_descriptor(), TypeDescriptor::Number);
        assert_eq!(Schema::float().type_descriptor(), TypeDescriptor::Number);
        assert_eq!(Schema::string().type_descriptor(), TypeDescriptor::String);
    }

    #[test]
    fn test_set_reads_as_list() {
        let set = Schema::set(Schema::int());
        assert_eq!(
            set.type_descriptor(),
            TypeDescriptor::list(TypeDescriptor::Number)
        );
    }

    #[test]
    fn test_collection_without_elem_holds_strings() {
        let map = Schema::new(ValueType::Map);
        assert_eq!(
            map.type_descriptor(),
            TypeDescriptor::map(TypeDescriptor::String)
        );
    }

    #[test]
    fn test_nested_resource_descriptor() {
        let rule = Resource::new(
            SchemaMap::new()
                .with("port", Schema::int().required())
                .with("protocol", Schema::string().optional()),
        );
        let schema = SchemaMap::new().with("rule", Schema::list(rule).with_max_items(1));

        insta::assert_snapshot!(
            schema.type_descriptor().to_string(),
            @r#"Object["rule":List[Object["port":Number, "protocol":String]]]"#
        );
    }

    #[test]
    fn test_object_field() {
        let timeouts = Resource::new(SchemaMap::new().with("create", Schema::string()));
        let field = Schema::object(timeouts);
        assert_eq!(
            field.type_descriptor(),
            TypeDescriptor::object([("create", TypeDescriptor::String)])
        );
        assert!(
            Schema::new(ValueType::Object)
                .type_descriptor()
                .fields()
                .is_some_and(|f| f.is_empty())
        );
    }

    #[test]
    fn test_order_preserved() {
        let schema = SchemaMap::new()
            .with("zeta", Schema::string())
            .with("alpha", Schema::string());
        assert_eq!(schema.names().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
    }
}
