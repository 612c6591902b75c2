//! Declarative overlay manifest (`bridge.toml`) for bridged providers.
//!
//! The manifest holds the serializable part of a provider overlay: provider
//! metadata, field overrides, and resource and data source tokens. Parse and
//! validation errors carry the source text and span for rendering with
//! `miette`.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod error;
mod manifest;

pub use error::{Error, Result, SourceContext};
pub use manifest::{
    BridgeToml, DataSourceOverride, DefaultOverride, DefaultValue, FieldOverride, Manifest,
    ParseContext, ProviderConfig, ResourceOverride, parse_manifest,
};
