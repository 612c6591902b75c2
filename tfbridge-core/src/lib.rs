//! Value conversion and provider customization for the provider bridge.
//!
//! # Module Organization
//!
//! - [`convert`] - typed values to property values and back
//! - [`naming`] - property names for plugin attributes
//! - [`inflector`] - English pluralization rules used by the naming rule
//! - [`info`] - the provider overlay: overrides, tokens, hooks and metadata
//!
//! # Example
//!
//! ```ignore
//! let ty = TypeDescriptor::list(TypeDescriptor::String);
//! let value = TypedValue::unknown(ty.clone());
//!
//! let property = to_property(&value, &ConvertOptions::default())?;
//! assert!(property.is_computed());
//! assert!(to_typed(&ty, &property, &ConvertOptions::default())?.is_unknown());
//! ```

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

pub mod convert;
mod error;
pub mod inflector;
pub mod info;
pub mod naming;

pub use convert::{ConvertOptions, to_property, to_property_map, to_typed, to_typed_map, zero};
pub use error::{ConvertError, InfoError};
pub use info::{
    AliasInfo, ComputeDefault, ComputeDefaultOptions, ComputeId, ConfigInfo, DataSourceInfo,
    DefaultInfo, OverlayNames, PropertyTransform, ProviderInfo, ResourceInfo, SchemaInfo,
    Transformer,
    config::{config_array_value, config_bool_value, config_string_value, string_value},
    delegate::delegate_id_field,
    metadata::{
        MarshallableDataSourceInfo, MarshallableDefaultInfo, MarshallableProviderInfo,
        MarshallableResourceInfo, MarshallableSchemaInfo,
    },
    tokens::{make_data_source, make_member, make_resource, make_type, module_major_version},
};
pub use naming::{
    FieldNames, IdentityNames, PluralizingNames, object_property_keys, to_property_key,
    will_pluralize,
};
