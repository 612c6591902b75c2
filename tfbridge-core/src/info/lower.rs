use indexmap::IndexMap;
use tfbridge_manifest::{DefaultOverride, DefaultValue, FieldOverride, Manifest};
use tfbridge_types::PropertyValue;

use super::{AliasInfo, DataSourceInfo, DefaultInfo, ProviderInfo, ResourceInfo, SchemaInfo};

impl ProviderInfo {
    /// Overlay declared by a `bridge.toml` manifest, with no provider
    /// attached.
    pub fn from_manifest(manifest: &Manifest) -> Self {
        let provider = &manifest.provider;
        Self {
            provider: None,
            name: provider.name.clone(),
            resource_prefix: provider.resource_prefix.clone(),
            version: provider.version.clone().unwrap_or_default(),
            description: provider.description.clone(),
            keywords: provider.keywords.clone(),
            license: provider.license.clone(),
            homepage: provider.homepage.clone(),
            repository: provider.repository.clone(),
            upstream_version: provider.upstream_version.clone(),
            config: lower_fields(&manifest.config),
            resources: manifest
                .resources
                .iter()
                .map(|(name, r)| {
                    let info = ResourceInfo {
                        token: r.token.clone(),
                        fields: lower_fields(&r.fields),
                        delete_before_replace: r.delete_before_replace,
                        aliases: r.aliases.iter().map(AliasInfo::type_token).collect(),
                        deprecation_message: r.deprecation_message.clone(),
                        ..Default::default()
                    };
                    (name.clone(), info)
                })
                .collect(),
            data_sources: manifest
                .data_sources
                .iter()
                .map(|(name, d)| {
                    let info = DataSourceInfo {
                        token: d.token.clone(),
                        fields: lower_fields(&d.fields),
                        deprecation_message: d.deprecation_message.clone(),
                    };
                    (name.clone(), info)
                })
                .collect(),
            ..Default::default()
        }
    }
}

fn lower_fields(fields: &IndexMap<String, FieldOverride>) -> IndexMap<String, SchemaInfo> {
    fields
        .iter()
        .map(|(name, field)| (name.clone(), lower_field(field)))
        .collect()
}

fn lower_field(field: &FieldOverride) -> SchemaInfo {
    SchemaInfo {
        name: field.name.clone(),
        type_token: field.type_token.clone(),
        alt_types: field.alt_types.clone(),
        transform: None,
        elem: field.elem.as_deref().map(|elem| Box::new(lower_field(elem))),
        fields: lower_fields(&field.fields),
        default: field.default.as_ref().map(lower_default),
        max_items_one: field.max_items_one,
        secret: field.secret,
        force_new: field.force_new,
        deprecation_message: field.deprecation_message.clone(),
        removed: field.removed,
        omit: field.omit,
    }
}

fn lower_default(default: &DefaultOverride) -> DefaultInfo {
    DefaultInfo {
        auto_named: default.auto_named,
        config: default.config.clone(),
        compute: None,
        value: default.value.as_ref().map(lower_value),
        env_vars: default.env.clone(),
    }
}

fn lower_value(value: &DefaultValue) -> PropertyValue {
    match value {
        DefaultValue::Bool(b) => PropertyValue::Bool(*b),
        DefaultValue::Int(i) => PropertyValue::Number(*i as f64),
        DefaultValue::Float(f) => PropertyValue::Number(*f),
        DefaultValue::String(s) => PropertyValue::String(s.clone()),
        DefaultValue::List(values) => PropertyValue::Array(values.iter().map(lower_value).collect()),
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_from_manifest() {
        let manifest = Manifest::from_str(
            r#"
[provider]
name = "random"
version = "4.2.0"
resource-prefix = "rnd"

[config.region]
secret = true
default = { value = 3, env = ["RANDOM_REGION"] }

[resources.rnd_string]
token = "random:index/randomString:RandomString"
aliases = ["random:index/randomStr:RandomStr"]

[resources.rnd_string.fields.rule]
elem = { fields = { from_port = { name = "start" } } }

[data-sources.rnd_thing]
token = "random:index/getThing:getThing"
"#,
        )
        .expect("Failed to parse manifest");

        let info = ProviderInfo::from_manifest(&manifest);
        assert_eq!(info.name, "random");
        assert_eq!(info.resource_prefix(), "rnd");
        assert_eq!(info.module_major_version().unwrap(), "v4");
        assert!(info.provider.is_none());

        let region = &info.config["region"];
        assert!(region.is_secret());
        let default = region.default.as_ref().unwrap();
        assert_eq!(default.value, Some(PropertyValue::Number(3.0)));
        assert_eq!(default.env_vars, vec!["RANDOM_REGION"]);

        let resource = &info.resources["rnd_string"];
        assert_eq!(resource.token, "random:index/randomString:RandomString");
        assert_eq!(
            resource.aliases,
            vec![AliasInfo::type_token("random:index/randomStr:RandomStr")]
        );
        let rule = &resource.fields["rule"];
        assert_eq!(
            rule.elem.as_ref().unwrap().fields["from_port"].name.as_deref(),
            Some("start")
        );

        assert_eq!(info.data_sources["rnd_thing"].token, "random:index/getThing:getThing");
    }
}
