//! Static type descriptors for plugin values.

use std::{fmt, sync::Arc};

use indexmap::IndexMap;

/// Ordered attribute map of an object descriptor.
pub type ObjectFields = IndexMap<String, TypeDescriptor>;

/// Static shape of a plugin value.
///
/// Descriptors are immutable. Composite descriptors hold their children
/// behind an [`Arc`], so cloning a descriptor never copies the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    Bool,
    Number,
    String,
    /// Ordered, homogeneous sequence.
    List(Arc<TypeDescriptor>),
    /// String-keyed, homogeneous collection.
    Map(Arc<TypeDescriptor>),
    /// Fixed set of named attributes.
    Object(Arc<ObjectFields>),
}

impl TypeDescriptor {
    /// Create a list descriptor.
    pub fn list(elem: TypeDescriptor) -> Self {
        Self::List(Arc::new(elem))
    }

    /// Create a map descriptor.
    pub fn map(elem: TypeDescriptor) -> Self {
        Self::Map(Arc::new(elem))
    }

    /// Create an object descriptor from `(name, descriptor)` pairs.
    pub fn object<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, TypeDescriptor)>,
        K: Into<String>,
    {
        Self::Object(Arc::new(
            fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Self::Bool | Self::Number | Self::String)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Self::Map(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// Element descriptor of a list or map.
    pub fn element(&self) -> Option<&TypeDescriptor> {
        match self {
            Self::List(elem) | Self::Map(elem) => Some(elem),
            _ => None,
        }
    }

    /// Attribute descriptors of an object.
    pub fn fields(&self) -> Option<&ObjectFields> {
        match self {
            Self::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// Descriptor of a single object attribute.
    pub fn field(&self, name: &str) -> Option<&TypeDescriptor> {
        self.fields().and_then(|fields| fields.get(name))
    }

    /// Short lowercase name of the descriptor's kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Number => "number",
            Self::String => "string",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Object(_) => "object",
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "Bool"),
            Self::Number => write!(f, "Number"),
            Self::String => write!(f, "String"),
            Self::List(elem) => write!(f, "List[{}]", elem),
            Self::Map(elem) => write!(f, "Map[{}]", elem),
            Self::Object(fields) => {
                write!(f, "Object[")?;
                for (i, (name, ty)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}:{}", name, ty)?;
                }
                write!(f, "]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(TypeDescriptor::String.to_string(), "String");
        assert_eq!(
            TypeDescriptor::list(TypeDescriptor::Number).to_string(),
            "List[Number]"
        );
        let obj = TypeDescriptor::object([
            ("name", TypeDescriptor::String),
            ("tags", TypeDescriptor::map(TypeDescriptor::String)),
        ]);
        assert_eq!(obj.to_string(), r#"Object["name":String, "tags":Map[String]]"#);
    }

    #[test]
    fn test_accessors() {
        let list = TypeDescriptor::list(TypeDescriptor::Bool);
        assert!(list.is_list());
        assert_eq!(list.element(), Some(&TypeDescriptor::Bool));
        assert!(list.fields().is_none());

        let obj = TypeDescriptor::object([("id", TypeDescriptor::String)]);
        assert_eq!(obj.field("id"), Some(&TypeDescriptor::String));
        assert_eq!(obj.field("missing"), None);
        assert_eq!(obj.kind(), "object");
    }

    #[test]
    fn test_clone_shares_children() {
        let list = TypeDescriptor::list(TypeDescriptor::object([("a", TypeDescriptor::Number)]));
        let copy = list.clone();
        match (&list, &copy) {
            (TypeDescriptor::List(a), TypeDescriptor::List(b)) => assert!(Arc::ptr_eq(a, b)),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_object_equality_ignores_field_order() {
        let a = TypeDescriptor::object([("x", TypeDescriptor::Bool), ("y", TypeDescriptor::String)]);
        let b = TypeDescriptor::object([("y", TypeDescriptor::String), ("x", TypeDescriptor::Bool)]);
        assert_eq!(a, b);
    }
}
