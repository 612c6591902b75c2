//! Schema unification shim over the legacy and modern plugin contracts.
//!
//! Call sites work against one interface no matter which contract a plugin
//! was written for:
//!
//! - [`SchemaSource`] - schema reads (`schema`, `resources_map`, `data_sources_map`)
//! - [`Runtime`] - the fifteen runtime operations
//! - [`Provider`] - both, implemented for anything that has both
//!
//! # Module Organization
//!
//! - [`schema`] - unified field spec, resource and map types
//! - [`legacy`] - legacy dialect: declared schema plus a delegating runtime
//! - [`modern`] - modern dialect: schemas computed on request, with diagnostics
//! - [`schema_only`] - provider view that answers schema reads and nothing else
//! - [`snapshot`] - static schemas and a snapshot cache
//! - [`marshal`] - persisted schema metadata (JSON)
//! - [`context`] - per-call context and logger
//! - [`testing`] - fake plugins and a recording logger (feature-gated)

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

pub mod context;
pub mod diagnostic;
pub mod error;
pub mod legacy;
pub mod marshal;
pub mod modern;
pub mod provider;
pub mod schema;
pub mod schema_only;
pub mod snapshot;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use context::{CallContext, Log, Logger, TracingLogger};
pub use diagnostic::{Diagnostic, Diagnostics, Severity};
pub use error::{Operation, SchemaKind, ShimError, ShimResult};
pub use legacy::LegacyProvider;
pub use marshal::{MarshallableElem, MarshallableProvider, MarshallableResource, MarshallableSchema};
pub use modern::{
    Attribute, Block, ModernPlugin, ModernSchema, ModernSource, NestingMode, SchemaRequest,
    SchemaResponse, TypeFactory,
};
pub use provider::{
    AttributeDiff, Dialect, DiffOptions, InstanceDiff, InstanceState, Meta, Provider,
    ResourceConfig, Runtime, SchemaSource,
};
pub use schema::{Elem, Resource, ResourceMap, Schema, SchemaMap, ValueType};
pub use schema_only::SchemaOnlyProvider;
pub use snapshot::{CachedSchema, StaticSchema};
