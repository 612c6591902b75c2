//! Value models shared across the provider bridge.
//!
//! Two value representations meet at the plugin boundary:
//!
//! ```text
//! plugin (TypedValue + TypeDescriptor)  <->  engine (PropertyValue)
//! ```
//!
//! - [`TypeDescriptor`] - static shape of a plugin value
//! - [`TypedValue`] - plugin-side value with explicit null and unknown states
//! - [`PropertyValue`] - engine-side value with computed, secret and output wrappers
//! - [`AttributePath`] - location of a nested value, used in error reports
//!
//! This crate only defines the models; conversion lives in `tfbridge-core`.

mod descriptor;
mod path;
mod property;
mod typed;

pub use bigdecimal::BigDecimal;
pub use descriptor::{ObjectFields, TypeDescriptor};
pub use path::{AttributePath, PathStep};
pub use property::{Output, PropertyKey, PropertyMap, PropertyValue, Urn};
pub use typed::{Known, TypedValue, ValueError, ValueState};
