//! Plugin-side values with explicit null and unknown states.

use bigdecimal::BigDecimal;
use indexmap::IndexMap;
use thiserror::Error;

use crate::TypeDescriptor;

/// Error raised when a payload does not fit its declared descriptor.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    #[error("cannot use a {found} value as {expected}")]
    Shape {
        expected: TypeDescriptor,
        found: &'static str,
    },

    #[error("{location} has type {found}, expected {expected}")]
    ElementType {
        location: String,
        expected: TypeDescriptor,
        found: TypeDescriptor,
    },

    #[error("object value of type {expected} is missing attribute {name:?}")]
    MissingAttribute {
        expected: TypeDescriptor,
        name: String,
    },

    #[error("attribute {name:?} is not declared by {expected}")]
    UndeclaredAttribute {
        expected: TypeDescriptor,
        name: String,
    },
}

/// Payload of a known value.
#[derive(Debug, Clone, PartialEq)]
pub enum Known {
    Bool(bool),
    Number(BigDecimal),
    String(String),
    List(Vec<TypedValue>),
    Map(IndexMap<String, TypedValue>),
    Object(IndexMap<String, TypedValue>),
}

impl Known {
    /// Short lowercase name of the payload's shape.
    pub fn kind(&self) -> &'static str {
        match self {
            Known::Bool(_) => "bool",
            Known::Number(_) => "number",
            Known::String(_) => "string",
            Known::List(_) => "list",
            Known::Map(_) => "map",
            Known::Object(_) => "object",
        }
    }
}

/// Null, unknown, or known.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueState {
    Null,
    /// Not known until the plan is applied.
    Unknown,
    Known(Known),
}

/// A value paired with the descriptor it was declared with.
///
/// Construction validates the payload against the descriptor, so a
/// `TypedValue` always satisfies its own type, recursively.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedValue {
    ty: TypeDescriptor,
    state: ValueState,
}

impl TypedValue {
    pub fn null(ty: TypeDescriptor) -> Self {
        Self {
            ty,
            state: ValueState::Null,
        }
    }

    pub fn unknown(ty: TypeDescriptor) -> Self {
        Self {
            ty,
            state: ValueState::Unknown,
        }
    }

    /// Create a known value, checking the payload against `ty`.
    pub fn new(ty: TypeDescriptor, value: Known) -> Result<Self, ValueError> {
        check(&ty, &value)?;
        Ok(Self {
            ty,
            state: ValueState::Known(value),
        })
    }

    pub fn bool(value: bool) -> Self {
        Self {
            ty: TypeDescriptor::Bool,
            state: ValueState::Known(Known::Bool(value)),
        }
    }

    pub fn number(value: impl Into<BigDecimal>) -> Self {
        Self {
            ty: TypeDescriptor::Number,
            state: ValueState::Known(Known::Number(value.into())),
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self {
            ty: TypeDescriptor::String,
            state: ValueState::Known(Known::String(value.into())),
        }
    }

    /// Create a known list of `elem` values.
    pub fn list(elem: TypeDescriptor, values: Vec<TypedValue>) -> Result<Self, ValueError> {
        Self::new(TypeDescriptor::list(elem), Known::List(values))
    }

    /// Create a known map of `elem` values.
    pub fn map(
        elem: TypeDescriptor,
        values: IndexMap<String, TypedValue>,
    ) -> Result<Self, ValueError> {
        Self::new(TypeDescriptor::map(elem), Known::Map(values))
    }

    /// Create a known object; `ty` must be an object descriptor.
    pub fn object(
        ty: TypeDescriptor,
        values: IndexMap<String, TypedValue>,
    ) -> Result<Self, ValueError> {
        Self::new(ty, Known::Object(values))
    }

    pub fn ty(&self) -> &TypeDescriptor {
        &self.ty
    }

    pub fn state(&self) -> &ValueState {
        &self.state
    }

    pub fn into_parts(self) -> (TypeDescriptor, ValueState) {
        (self.ty, self.state)
    }

    pub fn is_null(&self) -> bool {
        matches!(self.state, ValueState::Null)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self.state, ValueState::Unknown)
    }

    pub fn is_known(&self) -> bool {
        matches!(self.state, ValueState::Known(_))
    }

    pub fn known(&self) -> Option<&Known> {
        match &self.state {
            ValueState::Known(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.known() {
            Some(Known::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&BigDecimal> {
        match self.known() {
            Some(Known::Number(n)) => Some(n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self.known() {
            Some(Known::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[TypedValue]> {
        match self.known() {
            Some(Known::List(values)) => Some(values),
            _ => None,
        }
    }

    /// Entries of a known map or attributes of a known object.
    pub fn as_entries(&self) -> Option<&IndexMap<String, TypedValue>> {
        match self.known() {
            Some(Known::Map(values) | Known::Object(values)) => Some(values),
            _ => None,
        }
    }

    /// True when neither this value nor any nested value is unknown.
    pub fn is_fully_known(&self) -> bool {
        match &self.state {
            ValueState::Null => true,
            ValueState::Unknown => false,
            ValueState::Known(Known::List(values)) => values.iter().all(Self::is_fully_known),
            ValueState::Known(Known::Map(values) | Known::Object(values)) => {
                values.values().all(Self::is_fully_known)
            }
            ValueState::Known(_) => true,
        }
    }
}

fn check(ty: &TypeDescriptor, value: &Known) -> Result<(), ValueError> {
    let shape = || ValueError::Shape {
        expected: ty.clone(),
        found: value.kind(),
    };

    match (ty, value) {
        (TypeDescriptor::Bool, Known::Bool(_))
        | (TypeDescriptor::Number, Known::Number(_))
        | (TypeDescriptor::String, Known::String(_)) => Ok(()),
        (TypeDescriptor::List(elem), Known::List(values)) => {
            for (index, v) in values.iter().enumerate() {
                check_element(elem, v, || format!("element {}", index))?;
            }
            Ok(())
        }
        (TypeDescriptor::Map(elem), Known::Map(values)) => {
            for (key, v) in values {
                check_element(elem, v, || format!("entry {:?}", key))?;
            }
            Ok(())
        }
        (TypeDescriptor::Object(fields), Known::Object(values)) => {
            for (name, field_ty) in fields.iter() {
                let Some(v) = values.get(name) else {
                    return Err(ValueError::MissingAttribute {
                        expected: ty.clone(),
                        name: name.clone(),
                    });
                };
                check_element(field_ty, v, || format!("attribute {:?}", name))?;
            }
            if let Some(extra) = values.keys().find(|k| !fields.contains_key(*k)) {
                return Err(ValueError::UndeclaredAttribute {
                    expected: ty.clone(),
                    name: extra.clone(),
                });
            }
            Ok(())
        }
        _ => Err(shape()),
    }
}

fn check_element(
    expected: &TypeDescriptor,
    value: &TypedValue,
    location: impl FnOnce() -> String,
) -> Result<(), ValueError> {
    if value.ty() == expected {
        Ok(())
    } else {
        Err(ValueError::ElementType {
            location: location(),
            expected: expected.clone(),
            found: value.ty().clone(),
        })
    }
}
