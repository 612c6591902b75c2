//! Inspect operation - property view of provider metadata.

use tfbridge_core::{InfoError, OverlayNames, ProviderInfo, object_property_keys};
use tfbridge_shim::{CallContext, Resource, ResourceMap, Schema, SchemaSource};
use tfbridge_types::{AttributePath, TypeDescriptor};

use crate::reports::{AttributeRow, InspectReport, TypeKind, TypeReport};

/// Execute the inspect operation.
///
/// With `only` set, just the resource or data source of that name is shown.
pub fn inspect(
    info: &ProviderInfo,
    cx: &CallContext,
    only: Option<&str>,
) -> Result<InspectReport, InfoError> {
    let mut types = Vec::new();
    let mut unmapped = Vec::new();

    if let Some(provider) = &info.provider {
        let resources = provider.resources_map(cx)?;
        let data_sources = provider.data_sources_map(cx)?;
        collect(&mut types, TypeKind::Resource, &resources, info, only);
        collect(&mut types, TypeKind::DataSource, &data_sources, info, only);
        unmapped = info.unmapped(cx)?;
    }

    tracing::debug!(provider = %info.name, types = types.len(), "inspected metadata");

    Ok(InspectReport {
        name: info.name.clone(),
        version: info.version.clone(),
        types,
        unmapped,
    })
}

fn collect(
    types: &mut Vec<TypeReport>,
    kind: TypeKind,
    map: &ResourceMap,
    info: &ProviderInfo,
    only: Option<&str>,
) {
    for (name, resource) in map.iter() {
        if only.is_some_and(|only| only != name) {
            continue;
        }
        let (token, names) = match kind {
            TypeKind::Resource => (
                info.resources.get(name).map(|r| r.token.clone()),
                info.resource_names(name),
            ),
            TypeKind::DataSource => (
                info.data_sources.get(name).map(|d| d.token.clone()),
                info.data_source_names(name),
            ),
        };
        types.push(TypeReport {
            kind,
            name: name.to_string(),
            token,
            attributes: attributes(resource, &names),
        });
    }
}

fn attributes(resource: &Resource, names: &OverlayNames<'_>) -> Vec<AttributeRow> {
    let root = AttributePath::root();
    let declared: Vec<(&str, &Schema, TypeDescriptor)> = resource
        .schema
        .iter()
        .map(|(name, schema)| (name, schema, schema.type_descriptor()))
        .collect();
    let fields: Vec<(&str, &TypeDescriptor)> =
        declared.iter().map(|(name, _, ty)| (*name, ty)).collect();
    let keys = object_property_keys(names, &root, &fields);

    declared
        .iter()
        .zip(keys)
        .map(|((name, schema, ty), key)| {
            let secret = names.lookup(&root, name).is_some_and(|i| i.is_secret());
            AttributeRow {
                name: name.to_string(),
                property: key.as_str().to_string(),
                ty: ty.to_string(),
                flags: flags(schema, secret),
            }
        })
        .collect()
}

fn flags(schema: &Schema, secret: bool) -> Vec<&'static str> {
    let mut flags = Vec::new();
    if schema.required {
        flags.push("required");
    }
    if schema.computed {
        flags.push("computed");
    }
    if schema.force_new {
        flags.push("force new");
    }
    if schema.sensitive || secret {
        flags.push("secret");
    }
    if schema.deprecated.is_some() {
        flags.push("deprecated");
    }
    flags
}
