use bigdecimal::BigDecimal;
use indexmap::IndexMap;
use proptest::prelude::*;
use tfbridge_core::{
    ConvertError, ConvertOptions, inflector, to_property, to_property_map, to_typed, to_typed_map,
    will_pluralize, zero,
};
use tfbridge_types::{ObjectFields, Output, PropertyMap, PropertyValue, TypeDescriptor, TypedValue};

fn strings() -> TypeDescriptor {
    TypeDescriptor::list(TypeDescriptor::String)
}

fn round_trip(value: &TypedValue) -> TypedValue {
    let options = ConvertOptions::default();
    let property = to_property(value, &options).unwrap();
    to_typed(value.ty(), &property, &options).unwrap()
}

#[test]
fn test_number_round_trip() {
    let value = TypedValue::number(BigDecimal::from(42));
    let property = to_property(&value, &ConvertOptions::default()).unwrap();
    assert_eq!(property, PropertyValue::Number(42.0));
    assert_eq!(round_trip(&value), value);
}

#[test]
fn test_primitive_round_trips() {
    for value in [
        TypedValue::bool(true),
        TypedValue::string("us-east-1"),
        TypedValue::string(""),
        TypedValue::number("-0.5".parse::<BigDecimal>().unwrap()),
    ] {
        assert_eq!(round_trip(&value), value);
    }
}

#[test]
fn test_null_for_every_descriptor() {
    for ty in [
        TypeDescriptor::Bool,
        TypeDescriptor::Number,
        TypeDescriptor::String,
        strings(),
        TypeDescriptor::map(TypeDescriptor::Number),
        TypeDescriptor::object([("name", TypeDescriptor::String)]),
    ] {
        let value = TypedValue::null(ty.clone());
        assert_eq!(to_property(&value, &ConvertOptions::default()).unwrap(), PropertyValue::Null);
        assert_eq!(round_trip(&value), value);
    }
}

#[test]
fn test_unknown_list_stays_unknown() {
    let value = TypedValue::unknown(strings());
    let property = to_property(&value, &ConvertOptions::default()).unwrap();
    assert_eq!(property, PropertyValue::computed(PropertyValue::Array(Vec::new())));

    let back = to_typed(&strings(), &property, &ConvertOptions::default()).unwrap();
    assert!(back.is_unknown());
    assert_eq!(back.ty(), &strings());
    assert_ne!(back, TypedValue::list(TypeDescriptor::String, Vec::new()).unwrap());
}

#[test]
fn test_any_computed_reads_unknown() {
    let computed = PropertyValue::computed(PropertyValue::from("placeholder"));
    let value = to_typed(&TypeDescriptor::Number, &computed, &ConvertOptions::default()).unwrap();
    assert_eq!(value, TypedValue::unknown(TypeDescriptor::Number));
}

#[test]
fn test_pluralized_object_keys() {
    let ty = TypeDescriptor::object([("instance", strings()), ("address", strings())]);
    let mut attributes = IndexMap::new();
    attributes.insert(
        "instance".to_string(),
        TypedValue::list(TypeDescriptor::String, vec![TypedValue::string("i-1")]).unwrap(),
    );
    attributes.insert(
        "address".to_string(),
        TypedValue::list(TypeDescriptor::String, vec![TypedValue::string("10.0.0.1")]).unwrap(),
    );
    let value = TypedValue::object(ty.clone(), attributes).unwrap();

    let property = to_property(&value, &ConvertOptions::default()).unwrap();
    let object = property.as_object().unwrap();
    assert!(object.contains_key("instances"));
    assert!(!object.contains_key("instance"));
    assert!(object.contains_key("address"));

    assert_eq!(to_typed(&ty, &property, &ConvertOptions::default()).unwrap(), value);
}

#[test]
fn test_pluralization_idempotent() {
    for name in ["instance", "address", "policy", "status", "rule", "sheep"] {
        if will_pluralize(name, &strings()) {
            let plural = inflector::pluralize(name);
            assert!(!will_pluralize(&plural, &strings()), "{} pluralized twice", plural);
            assert_eq!(inflector::singularize(&plural), name);
        }
    }
    assert!(!will_pluralize("instance", &TypeDescriptor::String));
}

#[test]
fn test_top_level_property_map() {
    let fields: ObjectFields = [
        ("name".to_string(), TypeDescriptor::String),
        ("rule".to_string(), strings()),
    ]
    .into_iter()
    .collect();
    let mut attributes = IndexMap::new();
    attributes.insert("name".to_string(), TypedValue::string("web"));
    attributes.insert("rule".to_string(), TypedValue::unknown(strings()));

    let options = ConvertOptions::default();
    let properties = to_property_map(&attributes, &options).unwrap();
    assert_eq!(properties.get("name"), Some(&PropertyValue::from("web")));
    assert!(properties.get("rules").is_some_and(PropertyValue::is_computed));

    assert_eq!(to_typed_map(&fields, &properties, &options).unwrap(), attributes);
}

#[test]
fn test_secret_wrapping_and_stripping() {
    let options = ConvertOptions::default().with_secret(true);
    let property = to_property(&TypedValue::string("hunter2"), &options).unwrap();
    assert!(property.is_secret());

    let back = to_typed(&TypeDescriptor::String, &property, &ConvertOptions::default()).unwrap();
    assert_eq!(back, TypedValue::string("hunter2"));
}

#[test]
fn test_outputs() {
    let options = ConvertOptions::default();
    let known = Output::known(PropertyValue::from(true)).with_secret(true);
    assert_eq!(
        to_typed(&TypeDescriptor::Bool, &known.into(), &options).unwrap(),
        TypedValue::bool(true)
    );

    let unknown = PropertyValue::from(Output::unknown());
    assert!(to_typed(&strings(), &unknown, &options).unwrap().is_unknown());
}

#[test]
fn test_mismatch_reports_path() {
    let ty = TypeDescriptor::object([("ports", TypeDescriptor::list(TypeDescriptor::Number))]);
    let mut properties = PropertyMap::new();
    properties.insert(
        "ports".into(),
        PropertyValue::from(vec![PropertyValue::from(80.0), PropertyValue::from("http")]),
    );

    let err = to_typed(&ty, &PropertyValue::Object(properties), &ConvertOptions::default())
        .unwrap_err();
    assert!(matches!(err, ConvertError::Mismatch { found: "string", .. }));
    assert_eq!(err.path().to_string(), "ports[1]");
}

#[test]
fn test_unexpected_key_rejected() {
    let ty = TypeDescriptor::object([("name", TypeDescriptor::String)]);
    let mut properties = PropertyMap::new();
    properties.insert("name".into(), PropertyValue::from("web"));
    properties.insert("size".into(), PropertyValue::from(1.0));

    let err = to_typed(&ty, &PropertyValue::Object(properties), &ConvertOptions::default())
        .unwrap_err();
    assert!(matches!(err, ConvertError::UnexpectedKey { ref key, .. } if key == "size"));
}

#[test]
fn test_missing_key_reads_null() {
    let ty = TypeDescriptor::object([("name", TypeDescriptor::String), ("zone", TypeDescriptor::String)]);
    let mut properties = PropertyMap::new();
    properties.insert("name".into(), PropertyValue::from("web"));

    let value = to_typed(&ty, &PropertyValue::Object(properties), &ConvertOptions::default()).unwrap();
    let entries = value.as_entries().unwrap();
    assert!(entries["zone"].is_null());
    assert_eq!(entries["name"], TypedValue::string("web"));
}

#[test]
fn test_non_finite_number_rejected() {
    let err = to_typed(
        &TypeDescriptor::Number,
        &PropertyValue::Number(f64::NAN),
        &ConvertOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ConvertError::NonFiniteNumber { .. }));
}

#[test]
fn test_unknown_law_for_every_descriptor() {
    let options = ConvertOptions::default();
    for ty in [
        TypeDescriptor::Bool,
        TypeDescriptor::String,
        TypeDescriptor::map(TypeDescriptor::Number),
        TypeDescriptor::object([("name", TypeDescriptor::String), ("rule", strings())]),
    ] {
        let property = to_property(&TypedValue::unknown(ty.clone()), &options).unwrap();
        assert_eq!(property, PropertyValue::computed(zero(&ty)), "{ty}");
        assert_eq!(to_typed(&ty, &property, &options).unwrap(), TypedValue::unknown(ty));
    }
}

#[test]
fn test_plural_colliding_with_sibling_keeps_name() {
    let ty = TypeDescriptor::object([("instance", strings()), ("instances", TypeDescriptor::String)]);
    let mut attributes = IndexMap::new();
    attributes.insert(
        "instance".to_string(),
        TypedValue::list(TypeDescriptor::String, vec![TypedValue::string("i-1")]).unwrap(),
    );
    attributes.insert("instances".to_string(), TypedValue::string("two"));
    let value = TypedValue::object(ty.clone(), attributes).unwrap();

    let options = ConvertOptions::default();
    let property = to_property(&value, &options).unwrap();
    let object = property.as_object().unwrap();
    let keys: Vec<&str> = object.keys().map(|k| k.as_str()).collect();
    assert_eq!(keys, vec!["instance", "instances"]);
    assert_eq!(object.get("instances"), Some(&PropertyValue::from("two")));

    assert_eq!(to_typed(&ty, &property, &options).unwrap(), value);
}

#[test]
fn test_number_beyond_f64_range_rejected() {
    let ty = TypeDescriptor::object([("size", TypeDescriptor::Number)]);
    let mut attributes = IndexMap::new();
    attributes.insert("size".to_string(), TypedValue::number("1e400".parse::<BigDecimal>().unwrap()));
    let value = TypedValue::object(ty, attributes).unwrap();

    let err = to_property(&value, &ConvertOptions::default()).unwrap_err();
    assert!(matches!(err, ConvertError::OutOfRange { .. }));
    assert_eq!(err.path().to_string(), "size");
    assert!(err.to_string().ends_with("is outside the range of a 64-bit float"));
}

const MAX_SAFE_INTEGER: i64 = 1 << 53;

proptest! {
    #[test]
    fn test_bool_round_trip(b in any::<bool>()) {
        let value = TypedValue::bool(b);
        prop_assert_eq!(round_trip(&value), value);
    }

    #[test]
    fn test_string_round_trip(s in any::<String>()) {
        let value = TypedValue::string(s);
        prop_assert_eq!(round_trip(&value), value);
    }

    #[test]
    fn test_safe_integer_round_trip(n in -MAX_SAFE_INTEGER..=MAX_SAFE_INTEGER) {
        let value = TypedValue::number(BigDecimal::from(n));
        prop_assert_eq!(round_trip(&value), value);
    }

    #[test]
    fn test_finite_float_stable(f in any::<f64>().prop_filter("finite", |f| f.is_finite())) {
        let options = ConvertOptions::default();
        let typed = to_typed(&TypeDescriptor::Number, &PropertyValue::Number(f), &options).unwrap();
        prop_assert_eq!(to_property(&typed, &options).unwrap(), PropertyValue::Number(f));
    }
}
