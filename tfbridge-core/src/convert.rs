//! Conversion between plugin values and engine property values.
//!
//! ```text
//! TypedValue ──to_property──> PropertyValue
//!      ^                            │
//!      └──────────to_typed──────────┘   (driven by the TypeDescriptor)
//! ```
//!
//! Null maps to Null for every descriptor. An unknown value becomes a
//! computed placeholder shaped by [`zero`], and any computed value converts
//! back to unknown regardless of its placeholder. Object attribute names go
//! through a [`FieldNames`] policy; map keys are kept verbatim.

use std::fmt;

use bigdecimal::BigDecimal;
use indexmap::IndexMap;
use tfbridge_types::{
    AttributePath, Known, ObjectFields, PropertyKey, PropertyMap, PropertyValue, TypeDescriptor,
    TypedValue, ValueState,
};

use crate::{
    error::ConvertError,
    naming::{FieldNames, PluralizingNames, object_property_keys},
};

/// Options shared by both conversion directions.
#[derive(Clone, Copy)]
pub struct ConvertOptions<'a> {
    /// Wrap the converted property value in a secret.
    pub secret: bool,
    pub names: &'a dyn FieldNames,
}

impl<'a> ConvertOptions<'a> {
    pub fn new(names: &'a dyn FieldNames) -> Self {
        Self {
            secret: false,
            names,
        }
    }

    pub fn with_secret(mut self, secret: bool) -> Self {
        self.secret = secret;
        self
    }
}

impl Default for ConvertOptions<'static> {
    fn default() -> Self {
        Self::new(&PluralizingNames)
    }
}

impl fmt::Debug for ConvertOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConvertOptions")
            .field("secret", &self.secret)
            .finish_non_exhaustive()
    }
}

/// Placeholder carried by a computed value of descriptor `ty`.
pub fn zero(ty: &TypeDescriptor) -> PropertyValue {
    match ty {
        TypeDescriptor::Bool => PropertyValue::Bool(false),
        TypeDescriptor::Number => PropertyValue::Number(0.0),
        TypeDescriptor::String => PropertyValue::String(String::new()),
        TypeDescriptor::List(_) => PropertyValue::Array(Vec::new()),
        TypeDescriptor::Map(_) | TypeDescriptor::Object(_) => PropertyValue::Object(PropertyMap::new()),
    }
}

/// Convert a plugin value to a property value.
///
/// Fails when a number lies outside the range of an f64, or when the naming
/// policy gives two attributes of one object the same key.
pub fn to_property(
    value: &TypedValue,
    options: &ConvertOptions<'_>,
) -> Result<PropertyValue, ConvertError> {
    let converted = typed_to_property(value, &AttributePath::root(), options.names)?;
    if options.secret {
        Ok(PropertyValue::secret(converted))
    } else {
        Ok(converted)
    }
}

/// Convert the top-level attributes of a resource to a property map.
///
/// `attributes` holds every declared attribute, the same set
/// [`to_typed_map`] receives as fields.
pub fn to_property_map(
    attributes: &IndexMap<String, TypedValue>,
    options: &ConvertOptions<'_>,
) -> Result<PropertyMap, ConvertError> {
    let mut map = attributes_to_properties(attributes, &AttributePath::root(), options.names)?;
    if options.secret {
        for value in map.values_mut() {
            *value = PropertyValue::secret(std::mem::take(value));
        }
    }
    Ok(map)
}

/// Convert a property value to a plugin value of descriptor `ty`.
///
/// Secret wrappers and output secret-ness are dropped.
pub fn to_typed(
    ty: &TypeDescriptor,
    value: &PropertyValue,
    options: &ConvertOptions<'_>,
) -> Result<TypedValue, ConvertError> {
    property_to_typed(ty, value, &AttributePath::root(), options.names)
}

/// Convert a resource's property map back to its top-level attributes.
pub fn to_typed_map(
    fields: &ObjectFields,
    properties: &PropertyMap,
    options: &ConvertOptions<'_>,
) -> Result<IndexMap<String, TypedValue>, ConvertError> {
    properties_to_attributes(fields, properties, &AttributePath::root(), options.names)
}

fn typed_to_property(
    value: &TypedValue,
    path: &AttributePath,
    names: &dyn FieldNames,
) -> Result<PropertyValue, ConvertError> {
    let known = match value.state() {
        ValueState::Null => return Ok(PropertyValue::Null),
        ValueState::Unknown => return Ok(PropertyValue::computed(zero(value.ty()))),
        ValueState::Known(known) => known,
    };

    let converted = match known {
        Known::Bool(b) => PropertyValue::Bool(*b),
        Known::Number(n) => PropertyValue::Number(number_to_f64(n, path)?),
        Known::String(s) => PropertyValue::String(s.clone()),
        Known::List(values) => PropertyValue::Array(
            values
                .iter()
                .enumerate()
                .map(|(index, v)| typed_to_property(v, &path.index(index), names))
                .collect::<Result<_, ConvertError>>()?,
        ),
        Known::Map(entries) => PropertyValue::Object(
            entries
                .iter()
                .map(|(key, v)| {
                    let value = typed_to_property(v, &path.key(key.clone()), names)?;
                    Ok((PropertyKey::new(key.clone()), value))
                })
                .collect::<Result<_, ConvertError>>()?,
        ),
        Known::Object(attributes) => {
            PropertyValue::Object(attributes_to_properties(attributes, path, names)?)
        }
    };
    Ok(converted)
}

fn attributes_to_properties(
    attributes: &IndexMap<String, TypedValue>,
    path: &AttributePath,
    names: &dyn FieldNames,
) -> Result<PropertyMap, ConvertError> {
    let fields: Vec<(&str, &TypeDescriptor)> = attributes
        .iter()
        .map(|(name, v)| (name.as_str(), v.ty()))
        .collect();
    let keys = resolve_keys(&fields, path, names)?;

    attributes
        .iter()
        .zip(keys)
        .map(|((name, v), key)| {
            let value = typed_to_property(v, &path.attribute(name.clone()), names)?;
            Ok::<_, ConvertError>((key, value))
        })
        .collect()
}

/// Keys for the attributes of one object; both directions resolve them the
/// same way so each key maps back to exactly one attribute.
fn resolve_keys(
    fields: &[(&str, &TypeDescriptor)],
    path: &AttributePath,
    names: &dyn FieldNames,
) -> Result<Vec<PropertyKey>, ConvertError> {
    let keys = object_property_keys(names, path, fields);
    for (i, key) in keys.iter().enumerate() {
        if keys[..i].contains(key) {
            return Err(ConvertError::DuplicateKey {
                path: path.clone(),
                key: key.as_str().to_string(),
            });
        }
    }
    Ok(keys)
}

fn property_to_typed(
    ty: &TypeDescriptor,
    value: &PropertyValue,
    path: &AttributePath,
    names: &dyn FieldNames,
) -> Result<TypedValue, ConvertError> {
    let mismatch = || ConvertError::Mismatch {
        path: path.clone(),
        expected: ty.clone(),
        found: value.type_name(),
    };
    let invalid = |source| ConvertError::Invalid {
        path: path.clone(),
        source,
    };

    match (ty, value) {
        (_, PropertyValue::Null) => Ok(TypedValue::null(ty.clone())),
        (_, PropertyValue::Computed(_)) => Ok(TypedValue::unknown(ty.clone())),
        (_, PropertyValue::Secret(inner)) => property_to_typed(ty, inner, path, names),
        (_, PropertyValue::Output(output)) if !output.known => Ok(TypedValue::unknown(ty.clone())),
        (_, PropertyValue::Output(output)) => property_to_typed(ty, &output.element, path, names),

        (TypeDescriptor::Bool, PropertyValue::Bool(b)) => Ok(TypedValue::bool(*b)),
        (TypeDescriptor::Number, PropertyValue::Number(n)) => {
            Ok(TypedValue::number(f64_to_number(*n, path)?))
        }
        (TypeDescriptor::String, PropertyValue::String(s)) => Ok(TypedValue::string(s.clone())),
        (TypeDescriptor::List(elem), PropertyValue::Array(values)) => {
            let items = values
                .iter()
                .enumerate()
                .map(|(index, v)| property_to_typed(elem, v, &path.index(index), names))
                .collect::<Result<Vec<_>, _>>()?;
            TypedValue::new(ty.clone(), Known::List(items)).map_err(invalid)
        }
        (TypeDescriptor::Map(elem), PropertyValue::Object(entries)) => {
            let items = entries
                .iter()
                .map(|(key, v)| {
                    let value = property_to_typed(elem, v, &path.key(key.as_str()), names)?;
                    Ok((key.as_str().to_string(), value))
                })
                .collect::<Result<IndexMap<_, _>, ConvertError>>()?;
            TypedValue::new(ty.clone(), Known::Map(items)).map_err(invalid)
        }
        (TypeDescriptor::Object(fields), PropertyValue::Object(properties)) => {
            let attributes = properties_to_attributes(fields, properties, path, names)?;
            TypedValue::new(ty.clone(), Known::Object(attributes)).map_err(invalid)
        }

        _ => Err(mismatch()),
    }
}

fn properties_to_attributes(
    fields: &ObjectFields,
    properties: &PropertyMap,
    path: &AttributePath,
    names: &dyn FieldNames,
) -> Result<IndexMap<String, TypedValue>, ConvertError> {
    let declared: Vec<(&str, &TypeDescriptor)> = fields
        .iter()
        .map(|(name, field_ty)| (name.as_str(), field_ty))
        .collect();
    let keys = resolve_keys(&declared, path, names)?;

    if let Some(extra) = properties.keys().find(|key| !keys.contains(key)) {
        return Err(ConvertError::UnexpectedKey {
            path: path.clone(),
            key: extra.as_str().to_string(),
        });
    }

    fields
        .iter()
        .zip(&keys)
        .map(|((name, field_ty), key)| {
            let value = match properties.get(key) {
                Some(v) => property_to_typed(field_ty, v, &path.attribute(name.clone()), names)?,
                None => TypedValue::null(field_ty.clone()),
            };
            Ok((name.clone(), value))
        })
        .collect()
}

fn number_to_f64(n: &BigDecimal, path: &AttributePath) -> Result<f64, ConvertError> {
    // Parsing the decimal text rounds correctly to the nearest f64.
    match n.to_string().parse::<f64>() {
        Ok(f) if f.is_finite() => Ok(f),
        _ => Err(ConvertError::OutOfRange {
            path: path.clone(),
            value: n.to_string(),
        }),
    }
}

fn f64_to_number(n: f64, path: &AttributePath) -> Result<BigDecimal, ConvertError> {
    let non_finite = || ConvertError::NonFiniteNumber {
        path: path.clone(),
        value: n,
    };
    if !n.is_finite() {
        return Err(non_finite());
    }
    // Shortest decimal that reads back as the same f64.
    n.to_string().parse::<BigDecimal>().map_err(|_| non_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::IdentityNames;

    fn strings() -> TypeDescriptor {
        TypeDescriptor::list(TypeDescriptor::String)
    }

    #[test]
    fn test_zero_values() {
        assert_eq!(zero(&TypeDescriptor::String), PropertyValue::from(""));
        assert_eq!(zero(&TypeDescriptor::Number), PropertyValue::from(0.0));
        assert_eq!(zero(&TypeDescriptor::Bool), PropertyValue::from(false));
        assert_eq!(zero(&strings()), PropertyValue::Array(Vec::new()));
        assert_eq!(
            zero(&TypeDescriptor::map(TypeDescriptor::Bool)),
            PropertyValue::Object(PropertyMap::new())
        );
    }

    #[test]
    fn test_number_text_round_trip() {
        let n: BigDecimal = "3.12".parse().unwrap();
        let f = number_to_f64(&n, &AttributePath::root()).unwrap();
        assert_eq!(f, 3.12);
        assert_eq!(f64_to_number(f, &AttributePath::root()).unwrap(), n);
    }

    #[test]
    fn test_large_integer_exact() {
        let n = BigDecimal::from(9_007_199_254_740_991_i64);
        let f = number_to_f64(&n, &AttributePath::root()).unwrap();
        assert_eq!(f64_to_number(f, &AttributePath::root()).unwrap(), n);
    }

    #[test]
    fn test_non_finite_rejected() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = f64_to_number(value, &AttributePath::root()).unwrap_err();
            assert!(matches!(err, ConvertError::NonFiniteNumber { .. }));
        }
    }

    #[test]
    fn test_out_of_range_number_rejected() {
        let n: BigDecimal = "-1e400".parse().unwrap();
        let err = number_to_f64(&n, &AttributePath::root().attribute("size")).unwrap_err();
        assert!(matches!(err, ConvertError::OutOfRange { .. }));
        assert_eq!(err.path().to_string(), "size");
    }

    #[test]
    fn test_map_keys_verbatim() {
        let mut entries = IndexMap::new();
        entries.insert("instance".to_string(), TypedValue::list(TypeDescriptor::String, vec![]).unwrap());
        let value = TypedValue::map(strings(), entries).unwrap();

        let property = to_property(&value, &ConvertOptions::default()).unwrap();
        let object = property.as_object().unwrap();
        assert!(object.contains_key("instance"));
    }

    #[test]
    fn test_identity_names_keep_list_names() {
        let ty = TypeDescriptor::object([("instance", strings())]);
        let mut attributes = IndexMap::new();
        attributes.insert(
            "instance".to_string(),
            TypedValue::list(TypeDescriptor::String, vec![TypedValue::string("a")]).unwrap(),
        );
        let value = TypedValue::object(ty.clone(), attributes).unwrap();

        let options = ConvertOptions::new(&IdentityNames);
        let property = to_property(&value, &options).unwrap();
        assert!(property.as_object().unwrap().contains_key("instance"));
        assert_eq!(to_typed(&ty, &property, &options).unwrap(), value);
    }
}
