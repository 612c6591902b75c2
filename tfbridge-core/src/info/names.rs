use indexmap::IndexMap;
use tfbridge_types::{AttributePath, PathStep, PropertyKey, TypeDescriptor};

use super::SchemaInfo;
use crate::naming::{FieldNames, to_property_key};

/// Naming policy that honors explicit property names from field overrides
/// and falls back to the list pluralization rule.
#[derive(Debug, Clone, Copy)]
pub struct OverlayNames<'a> {
    fields: Option<&'a IndexMap<String, SchemaInfo>>,
}

impl<'a> OverlayNames<'a> {
    pub fn new(fields: Option<&'a IndexMap<String, SchemaInfo>>) -> Self {
        Self { fields }
    }

    /// Override for the attribute `name` of the object at `path`.
    pub fn lookup(&self, path: &AttributePath, name: &str) -> Option<&'a SchemaInfo> {
        let fields = self.fields?;
        if path.is_root() {
            return fields.get(name);
        }
        let parent = lookup_path(fields, path.steps())?;
        field_of(parent, name)
    }
}

impl FieldNames for OverlayNames<'_> {
    fn property_key(&self, path: &AttributePath, name: &str, ty: &TypeDescriptor) -> PropertyKey {
        match self.lookup(path, name).and_then(|info| info.name.as_deref()) {
            Some(explicit) => PropertyKey::new(explicit),
            None => to_property_key(name, ty),
        }
    }
}

fn lookup_path<'a>(
    fields: &'a IndexMap<String, SchemaInfo>,
    steps: &[PathStep],
) -> Option<&'a SchemaInfo> {
    let (first, rest) = steps.split_first()?;
    let PathStep::Attribute(name) = first else {
        return None;
    };
    let mut current = fields.get(name)?;
    for step in rest {
        current = match step {
            PathStep::Attribute(name) => field_of(current, name)?,
            // Without an element override, nested fields are declared inline.
            PathStep::Index(_) | PathStep::Key(_) => current.elem.as_deref().unwrap_or(current),
        };
    }
    Some(current)
}

fn field_of<'a>(info: &'a SchemaInfo, name: &str) -> Option<&'a SchemaInfo> {
    info.fields
        .get(name)
        .or_else(|| info.elem.as_deref().and_then(|elem| elem.fields.get(name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overrides() -> IndexMap<String, SchemaInfo> {
        let mut fields = IndexMap::new();
        fields.insert("override_special".to_string(), SchemaInfo::named("overrideSpecial"));
        fields.insert(
            "rule".to_string(),
            SchemaInfo::default()
                .with_elem(SchemaInfo::default().with_field("from_port", SchemaInfo::named("start"))),
        );
        fields.insert(
            "setting".to_string(),
            SchemaInfo::default().with_field("value_list", SchemaInfo::named("values")),
        );
        fields
    }

    #[test]
    fn test_explicit_name_wins() {
        let fields = overrides();
        let names = OverlayNames::new(Some(&fields));
        let key = names.property_key(&AttributePath::root(), "override_special", &TypeDescriptor::String);
        assert_eq!(key.as_str(), "overrideSpecial");
    }

    #[test]
    fn test_falls_back_to_rule() {
        let fields = overrides();
        let names = OverlayNames::new(Some(&fields));
        let list = TypeDescriptor::list(TypeDescriptor::String);
        assert_eq!(names.property_key(&AttributePath::root(), "instance", &list).as_str(), "instances");

        let none = OverlayNames::new(None);
        assert_eq!(none.property_key(&AttributePath::root(), "instance", &list).as_str(), "instances");
    }

    #[test]
    fn test_nested_element_override() {
        let fields = overrides();
        let names = OverlayNames::new(Some(&fields));
        let path = AttributePath::root().attribute("rule").index(0);
        let key = names.property_key(&path, "from_port", &TypeDescriptor::Number);
        assert_eq!(key.as_str(), "start");
    }

    #[test]
    fn test_inline_nested_fields() {
        let fields = overrides();
        let names = OverlayNames::new(Some(&fields));
        let list = TypeDescriptor::list(TypeDescriptor::String);

        let path = AttributePath::root().attribute("setting").index(0);
        assert_eq!(names.property_key(&path, "value_list", &list).as_str(), "values");

        let path = AttributePath::root().attribute("setting");
        assert_eq!(names.property_key(&path, "value_list", &list).as_str(), "values");
    }
}
