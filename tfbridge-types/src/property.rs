//! Engine-side property values.

use std::{borrow::Borrow, collections::BTreeSet, fmt};

use indexmap::IndexMap;

/// Key of a property object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyKey(String);

impl PropertyKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PropertyKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for PropertyKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl Borrow<str> for PropertyKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Property object.
pub type PropertyMap = IndexMap<PropertyKey, PropertyValue>;

/// Resource URN, used to track output dependencies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Urn(String);

impl Urn {
    pub fn new(urn: impl Into<String>) -> Self {
        Self(urn.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Urn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A value that may be unknown, secret, and depend on other resources.
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    pub element: Box<PropertyValue>,
    pub known: bool,
    pub secret: bool,
    pub dependencies: BTreeSet<Urn>,
}

impl Output {
    /// A known output with no secret-ness and no dependencies.
    pub fn known(element: PropertyValue) -> Self {
        Self {
            element: Box::new(element),
            known: true,
            secret: false,
            dependencies: BTreeSet::new(),
        }
    }

    /// An output whose value is not known yet.
    pub fn unknown() -> Self {
        Self {
            element: Box::new(PropertyValue::Null),
            known: false,
            secret: false,
            dependencies: BTreeSet::new(),
        }
    }

    pub fn with_secret(mut self, secret: bool) -> Self {
        self.secret = secret;
        self
    }

    pub fn with_dependency(mut self, urn: Urn) -> Self {
        self.dependencies.insert(urn);
        self
    }
}

/// Engine-side property value.
///
/// Wrappers are built through [`PropertyValue::computed`] and
/// [`PropertyValue::secret`], which never stack a wrapper on itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PropertyValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<PropertyValue>),
    Object(PropertyMap),
    /// Unknown until the operation is applied; holds the pre-computation shape.
    Computed(Box<PropertyValue>),
    /// Must be redacted from logs and diffs.
    Secret(Box<PropertyValue>),
    Output(Output),
}

impl PropertyValue {
    /// Mark `element` as computed. A computed value is returned unchanged.
    pub fn computed(element: PropertyValue) -> Self {
        match element {
            computed @ PropertyValue::Computed(_) => computed,
            other => PropertyValue::Computed(Box::new(other)),
        }
    }

    /// Mark `element` as secret. A secret value is returned unchanged.
    pub fn secret(element: PropertyValue) -> Self {
        match element {
            secret @ PropertyValue::Secret(_) => secret,
            other => PropertyValue::Secret(Box::new(other)),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, PropertyValue::Computed(_))
    }

    pub fn is_secret(&self) -> bool {
        matches!(self, PropertyValue::Secret(_))
    }

    pub fn is_output(&self) -> bool {
        matches!(self, PropertyValue::Output(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[PropertyValue]> {
        match self {
            PropertyValue::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&PropertyMap> {
        match self {
            PropertyValue::Object(values) => Some(values),
            _ => None,
        }
    }

    /// Name of the value's kind, as shown in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Null => "null",
            PropertyValue::Bool(_) => "bool",
            PropertyValue::Number(_) => "number",
            PropertyValue::String(_) => "string",
            PropertyValue::Array(_) => "array",
            PropertyValue::Object(_) => "object",
            PropertyValue::Computed(_) => "computed",
            PropertyValue::Secret(_) => "secret",
            PropertyValue::Output(_) => "output",
        }
    }

    /// True when this value or any nested value is computed or an unknown output.
    pub fn contains_unknowns(&self) -> bool {
        match self {
            PropertyValue::Computed(_) => true,
            PropertyValue::Output(output) => !output.known || output.element.contains_unknowns(),
            PropertyValue::Secret(inner) => inner.contains_unknowns(),
            PropertyValue::Array(values) => values.iter().any(Self::contains_unknowns),
            PropertyValue::Object(values) => values.values().any(Self::contains_unknowns),
            _ => false,
        }
    }

    /// True when this value or any nested value is secret.
    pub fn contains_secrets(&self) -> bool {
        match self {
            PropertyValue::Secret(_) => true,
            PropertyValue::Output(output) => output.secret || output.element.contains_secrets(),
            PropertyValue::Computed(inner) => inner.contains_secrets(),
            PropertyValue::Array(values) => values.iter().any(Self::contains_secrets),
            PropertyValue::Object(values) => values.values().any(Self::contains_secrets),
            _ => false,
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Number(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<Vec<PropertyValue>> for PropertyValue {
    fn from(values: Vec<PropertyValue>) -> Self {
        PropertyValue::Array(values)
    }
}

impl From<PropertyMap> for PropertyValue {
    fn from(values: PropertyMap) -> Self {
        PropertyValue::Object(values)
    }
}

impl From<Output> for PropertyValue {
    fn from(output: Output) -> Self {
        PropertyValue::Output(output)
    }
}
