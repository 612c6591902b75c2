//! Core operations.
//!
//! This module contains the business logic for tfbridge commands,
//! separated from CLI argument parsing and output rendering.

pub mod check;
pub mod inspect;

pub use check::check;
pub use inspect::inspect;
