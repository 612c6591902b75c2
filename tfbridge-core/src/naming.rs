//! Property names for plugin attributes.
//!
//! List attributes get a plural property name when the pluralization can be
//! undone: `instance` becomes `instances`, while `address` (which already
//! reads as a plural) keeps its name.

use tfbridge_types::{AttributePath, PropertyKey, TypeDescriptor};

use crate::inflector::{pluralize, singularize};

/// True when `name` is renamed to its plural form for descriptor `ty`.
pub fn will_pluralize(name: &str, ty: &TypeDescriptor) -> bool {
    if !ty.is_list() {
        return false;
    }
    let plural = pluralize(name);
    plural != name && singularize(&plural) == name && singularize(name) == name
}

/// Property key for attribute `name` declared with descriptor `ty`.
pub fn to_property_key(name: &str, ty: &TypeDescriptor) -> PropertyKey {
    if will_pluralize(name, ty) {
        PropertyKey::new(pluralize(name))
    } else {
        PropertyKey::new(name)
    }
}

/// Property keys for every attribute of one object, in declaration order.
///
/// A renamed key that equals the name of a sibling attribute is declined and
/// the attribute keeps its own name, so both attributes stay addressable.
pub fn object_property_keys(
    names: &dyn FieldNames,
    path: &AttributePath,
    fields: &[(&str, &TypeDescriptor)],
) -> Vec<PropertyKey> {
    fields
        .iter()
        .map(|&(name, ty)| {
            let key = names.property_key(path, name, ty);
            let shadows_sibling = key.as_str() != name
                && fields.iter().any(|&(other, _)| other == key.as_str());
            if shadows_sibling {
                PropertyKey::new(name)
            } else {
                key
            }
        })
        .collect()
}

/// Naming policy used by value conversion.
///
/// `path` is the location of the object that declares `name`; the root path
/// denotes a resource's top-level attributes.
pub trait FieldNames: Send + Sync {
    fn property_key(&self, path: &AttributePath, name: &str, ty: &TypeDescriptor) -> PropertyKey;
}

/// The list pluralization rule, everywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct PluralizingNames;

impl FieldNames for PluralizingNames {
    fn property_key(&self, _path: &AttributePath, name: &str, ty: &TypeDescriptor) -> PropertyKey {
        to_property_key(name, ty)
    }
}

/// Attribute names used verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityNames;

impl FieldNames for IdentityNames {
    fn property_key(&self, _path: &AttributePath, name: &str, _ty: &TypeDescriptor) -> PropertyKey {
        PropertyKey::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings() -> TypeDescriptor {
        TypeDescriptor::list(TypeDescriptor::String)
    }

    #[test]
    fn test_list_names_pluralize() {
        assert_eq!(to_property_key("instance", &strings()).as_str(), "instances");
        assert_eq!(to_property_key("policy", &strings()).as_str(), "policies");
    }

    #[test]
    fn test_non_list_names_unchanged() {
        assert_eq!(to_property_key("instance", &TypeDescriptor::String).as_str(), "instance");
        let map = TypeDescriptor::map(TypeDescriptor::String);
        assert_eq!(to_property_key("tag", &map).as_str(), "tag");
    }

    #[test]
    fn test_unsafe_pluralization_declined() {
        assert!(!will_pluralize("address", &strings()));
        assert_eq!(to_property_key("address", &strings()).as_str(), "address");
    }

    #[test]
    fn test_plural_names_unchanged() {
        assert_eq!(to_property_key("instances", &strings()).as_str(), "instances");
        assert_eq!(to_property_key("equipment", &strings()).as_str(), "equipment");
    }

    #[test]
    fn test_double_s_list_names_unchanged() {
        // A trailing "ss" singularizes by dropping one "s", so these names
        // already read as plurals and list attributes keep them.
        for name in ["ingress", "egress", "access", "address"] {
            assert!(!will_pluralize(name, &strings()), "{name}");
            assert_eq!(to_property_key(name, &strings()).as_str(), name);
        }
    }

    #[test]
    fn test_sibling_collision_declines_plural() {
        let list = strings();
        let keys = object_property_keys(
            &PluralizingNames,
            &AttributePath::root(),
            &[("instance", &list), ("instances", &TypeDescriptor::String), ("policy", &list)],
        );
        let keys: Vec<&str> = keys.iter().map(PropertyKey::as_str).collect();
        assert_eq!(keys, vec!["instance", "instances", "policies"]);
    }

    #[test]
    fn test_identity_names() {
        let key = IdentityNames.property_key(&AttributePath::root(), "instance", &strings());
        assert_eq!(key.as_str(), "instance");
    }
}
