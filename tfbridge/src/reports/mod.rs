//! Report data structures for commands.
//!
//! Commands build reports, then render them to an Output target.

mod check;
mod inspect;
pub(crate) mod output;

pub use check::CheckReport;
pub use inspect::{AttributeRow, InspectReport, TypeKind, TypeReport};
pub use output::{Report, TerminalOutput};
