//! Persisted overlay metadata.
//!
//! Only the serializable part of a [`ProviderInfo`] survives: hooks and
//! transforms are dropped, and a default computed by a function is recorded
//! as `isFunc` and refuses to run once restored.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tfbridge_shim::{CallContext, MarshallableProvider};
use tfbridge_types::{PropertyKey, PropertyValue};

use super::{
    AliasInfo, ComputeDefaultOptions, DataSourceInfo, DefaultInfo, ProviderInfo, ResourceInfo,
    SchemaInfo,
};
use crate::error::InfoError;

fn is_false(value: &bool) -> bool {
    !*value
}

/// Serializable [`SchemaInfo`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarshallableSchemaInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_token: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alt_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<Box<MarshallableSchemaInfo>>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub fields: IndexMap<String, MarshallableSchemaInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<MarshallableDefaultInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items_one: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_new: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<bool>,
}

impl From<&SchemaInfo> for MarshallableSchemaInfo {
    fn from(info: &SchemaInfo) -> Self {
        Self {
            name: info.name.clone(),
            type_token: info.type_token.clone(),
            alt_types: info.alt_types.clone(),
            element: info.elem.as_deref().map(|elem| Box::new(elem.into())),
            fields: marshal_fields(&info.fields),
            default: info.default.as_ref().map(Into::into),
            max_items_one: info.max_items_one,
            deprecated: info.deprecation_message.clone(),
            force_new: info.force_new,
            secret: info.secret,
        }
    }
}

impl MarshallableSchemaInfo {
    /// Restore the overrides of field `field`.
    pub fn unmarshal(&self, field: &str) -> SchemaInfo {
        SchemaInfo {
            name: self.name.clone(),
            type_token: self.type_token.clone(),
            alt_types: self.alt_types.clone(),
            elem: self
                .element
                .as_ref()
                .map(|elem| Box::new(elem.unmarshal(field))),
            fields: unmarshal_fields(&self.fields),
            default: self.default.as_ref().map(|d| d.unmarshal(field)),
            max_items_one: self.max_items_one,
            secret: self.secret,
            force_new: self.force_new,
            deprecation_message: self.deprecated.clone(),
            ..Default::default()
        }
    }
}

/// Serializable [`DefaultInfo`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarshallableDefaultInfo {
    #[serde(rename = "autonamed", default, skip_serializing_if = "is_false")]
    pub auto_named: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_func: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    #[serde(rename = "envvars", default, skip_serializing_if = "Vec::is_empty")]
    pub env_vars: Vec<String>,
}

impl From<&DefaultInfo> for MarshallableDefaultInfo {
    fn from(info: &DefaultInfo) -> Self {
        Self {
            auto_named: info.auto_named,
            config: info.config.clone(),
            is_func: info.compute.is_some(),
            value: info.value.as_ref().map(property_to_json),
            env_vars: info.env_vars.clone(),
        }
    }
}

impl MarshallableDefaultInfo {
    pub fn unmarshal(&self, field: &str) -> DefaultInfo {
        let compute = self.is_func.then(|| {
            let field = field.to_string();
            let compute: super::ComputeDefault =
                Arc::new(move |_: &CallContext, _: &ComputeDefaultOptions| -> Result<PropertyValue, InfoError> {
                    Err(InfoError::RestoredDefault {
                        field: field.clone(),
                    })
                });
            compute
        });

        DefaultInfo {
            auto_named: self.auto_named,
            config: self.config.clone(),
            compute,
            value: self.value.as_ref().map(json_to_property),
            env_vars: self.env_vars.clone(),
        }
    }
}

/// Serializable [`ResourceInfo`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarshallableResourceInfo {
    pub tok: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub fields: IndexMap<String, MarshallableSchemaInfo>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub delete_before_replace: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
}

impl From<&ResourceInfo> for MarshallableResourceInfo {
    fn from(info: &ResourceInfo) -> Self {
        Self {
            tok: info.token.clone(),
            fields: marshal_fields(&info.fields),
            delete_before_replace: info.delete_before_replace,
            // Only type aliases have a token to record.
            aliases: info
                .aliases
                .iter()
                .filter_map(|alias| alias.type_token.clone())
                .collect(),
            deprecated: info.deprecation_message.clone(),
        }
    }
}

impl MarshallableResourceInfo {
    pub fn unmarshal(&self) -> ResourceInfo {
        ResourceInfo {
            token: self.tok.clone(),
            fields: unmarshal_fields(&self.fields),
            delete_before_replace: self.delete_before_replace,
            aliases: self.aliases.iter().map(AliasInfo::type_token).collect(),
            deprecation_message: self.deprecated.clone(),
            ..Default::default()
        }
    }
}

/// Serializable [`DataSourceInfo`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarshallableDataSourceInfo {
    pub tok: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub fields: IndexMap<String, MarshallableSchemaInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
}

impl From<&DataSourceInfo> for MarshallableDataSourceInfo {
    fn from(info: &DataSourceInfo) -> Self {
        Self {
            tok: info.token.clone(),
            fields: marshal_fields(&info.fields),
            deprecated: info.deprecation_message.clone(),
        }
    }
}

impl MarshallableDataSourceInfo {
    pub fn unmarshal(&self) -> DataSourceInfo {
        DataSourceInfo {
            token: self.tok.clone(),
            fields: unmarshal_fields(&self.fields),
            deprecation_message: self.deprecated.clone(),
        }
    }
}

/// Serializable [`ProviderInfo`], including the wrapped provider's schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarshallableProviderInfo {
    #[serde(default)]
    pub provider: MarshallableProvider,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub config: IndexMap<String, MarshallableSchemaInfo>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub resources: IndexMap<String, MarshallableResourceInfo>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub data_sources: IndexMap<String, MarshallableDataSourceInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream_version: Option<String>,
}

impl MarshallableProviderInfo {
    /// Snapshot `info`, reading the schema of its provider if one is attached.
    pub fn from_info(info: &ProviderInfo, cx: &CallContext) -> Result<Self, InfoError> {
        let provider = match &info.provider {
            Some(provider) => MarshallableProvider::from_source(&**provider, cx)?,
            None => MarshallableProvider::default(),
        };

        Ok(Self {
            provider,
            name: info.name.clone(),
            version: info.version.clone(),
            resource_prefix: info.resource_prefix.clone(),
            config: marshal_fields(&info.config),
            resources: info
                .resources
                .iter()
                .map(|(name, r)| (name.clone(), r.into()))
                .collect(),
            data_sources: info
                .data_sources
                .iter()
                .map(|(name, d)| (name.clone(), d.into()))
                .collect(),
            upstream_version: info.upstream_version.clone(),
        })
    }

    pub fn from_json(json: &str) -> Result<Self, InfoError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, InfoError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Restore the overlay. The restored provider answers schema reads only.
    pub fn to_info(&self) -> ProviderInfo {
        ProviderInfo {
            provider: Some(Arc::new(self.provider.to_provider())),
            name: self.name.clone(),
            version: self.version.clone(),
            resource_prefix: self.resource_prefix.clone(),
            upstream_version: self.upstream_version.clone(),
            config: unmarshal_fields(&self.config),
            resources: self
                .resources
                .iter()
                .map(|(name, r)| (name.clone(), r.unmarshal()))
                .collect(),
            data_sources: self
                .data_sources
                .iter()
                .map(|(name, d)| (name.clone(), d.unmarshal()))
                .collect(),
            ..Default::default()
        }
    }
}

fn marshal_fields(fields: &IndexMap<String, SchemaInfo>) -> IndexMap<String, MarshallableSchemaInfo> {
    fields
        .iter()
        .map(|(name, info)| (name.clone(), info.into()))
        .collect()
}

fn unmarshal_fields(fields: &IndexMap<String, MarshallableSchemaInfo>) -> IndexMap<String, SchemaInfo> {
    fields
        .iter()
        .map(|(name, info)| (name.clone(), info.unmarshal(name)))
        .collect()
}

/// Plain JSON for a literal default. Wrappers are dropped; unknowns become null.
fn property_to_json(value: &PropertyValue) -> serde_json::Value {
    use serde_json::Value;

    match value {
        PropertyValue::Null | PropertyValue::Computed(_) => Value::Null,
        PropertyValue::Bool(b) => Value::Bool(*b),
        PropertyValue::Number(n) => serde_json::Number::from_f64(*n).map_or(Value::Null, Value::Number),
        PropertyValue::String(s) => Value::String(s.clone()),
        PropertyValue::Array(values) => Value::Array(values.iter().map(property_to_json).collect()),
        PropertyValue::Object(values) => Value::Object(
            values
                .iter()
                .map(|(k, v)| (k.as_str().to_string(), property_to_json(v)))
                .collect(),
        ),
        PropertyValue::Secret(inner) => property_to_json(inner),
        PropertyValue::Output(output) if output.known => property_to_json(&output.element),
        PropertyValue::Output(_) => Value::Null,
    }
}

fn json_to_property(value: &serde_json::Value) -> PropertyValue {
    use serde_json::Value;

    match value {
        Value::Null => PropertyValue::Null,
        Value::Bool(b) => PropertyValue::Bool(*b),
        Value::Number(n) => n.as_f64().map_or(PropertyValue::Null, PropertyValue::Number),
        Value::String(s) => PropertyValue::String(s.clone()),
        Value::Array(values) => PropertyValue::Array(values.iter().map(json_to_property).collect()),
        Value::Object(values) => PropertyValue::Object(
            values
                .iter()
                .map(|(k, v)| (PropertyKey::new(k.clone()), json_to_property(v)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ProviderInfo {
        let mut info = ProviderInfo::new("random", "4.2.0");
        info.config.insert(
            "region".to_string(),
            SchemaInfo::named("region")
                .with_secret(true)
                .with_default(DefaultInfo::value("us-east-1").with_env_vars(["AWS_REGION"])),
        );
        info.resources.insert(
            "random_string".to_string(),
            ResourceInfo::new("random:index/randomString:RandomString")
                .with_field("override_special", SchemaInfo::named("overrideSpecial")),
        );
        info.data_sources.insert(
            "random_thing".to_string(),
            DataSourceInfo::new("random:index/getThing:getThing"),
        );
        info
    }

    #[test]
    fn test_json_shape() {
        let metadata =
            MarshallableProviderInfo::from_info(&sample(), &CallContext::background()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&metadata.to_json().unwrap()).unwrap();

        assert_eq!(json["name"], "random");
        assert_eq!(json["config"]["region"]["secret"], true);
        assert_eq!(json["config"]["region"]["default"]["value"], "us-east-1");
        assert_eq!(json["config"]["region"]["default"]["envvars"][0], "AWS_REGION");
        assert_eq!(
            json["resources"]["random_string"]["tok"],
            "random:index/randomString:RandomString"
        );
        assert_eq!(
            json["resources"]["random_string"]["fields"]["override_special"]["name"],
            "overrideSpecial"
        );
        assert_eq!(
            json["dataSources"]["random_thing"]["tok"],
            "random:index/getThing:getThing"
        );
    }

    #[test]
    fn test_round_trip() {
        let metadata =
            MarshallableProviderInfo::from_info(&sample(), &CallContext::background()).unwrap();
        let restored = MarshallableProviderInfo::from_json(&metadata.to_json().unwrap()).unwrap();
        assert_eq!(restored, metadata);

        let info = restored.to_info();
        assert_eq!(info.name, "random");
        assert_eq!(
            info.resources["random_string"].fields["override_special"].name.as_deref(),
            Some("overrideSpecial")
        );
        let default = info.config["region"].default.as_ref().unwrap();
        assert_eq!(default.value, Some(PropertyValue::from("us-east-1")));
        assert!(info.provider.is_some());
    }

    #[test]
    fn test_restored_function_default_refuses_to_run() {
        let mut info = sample();
        info.config.insert(
            "token".to_string(),
            SchemaInfo::default().with_default(DefaultInfo {
                compute: Some(Arc::new(|_: &CallContext, _: &ComputeDefaultOptions| {
                    Ok(PropertyValue::from("secret"))
                })),
                ..Default::default()
            }),
        );

        let cx = CallContext::background();
        let metadata = MarshallableProviderInfo::from_info(&info, &cx).unwrap();
        assert!(metadata.config["token"].default.as_ref().unwrap().is_func);

        let restored = metadata.to_info();
        let default = restored.config["token"].default.as_ref().unwrap();
        let err = default
            .resolve(&cx, &Default::default(), &ComputeDefaultOptions::default())
            .unwrap_err();
        assert!(matches!(err, InfoError::RestoredDefault { ref field } if field == "token"));
    }

    #[test]
    fn test_secret_default_value_unwrapped() {
        let value = PropertyValue::secret(PropertyValue::from(vec![PropertyValue::from(1.0)]));
        assert_eq!(property_to_json(&value), serde_json::json!([1.0]));
        assert_eq!(property_to_json(&PropertyValue::from(f64::NAN)), serde_json::Value::Null);
    }
}
