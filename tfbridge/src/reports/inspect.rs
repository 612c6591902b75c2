//! Inspect command report data structures.

use std::fmt;

use super::output::{Output, Report};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Resource,
    DataSource,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::Resource => write!(f, "resource"),
            TypeKind::DataSource => write!(f, "data source"),
        }
    }
}

/// One top-level attribute of a resource or data source.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeRow {
    /// Plugin attribute name.
    pub name: String,
    /// Property key the attribute converts to.
    pub property: String,
    /// Rendered type descriptor.
    pub ty: String,
    pub flags: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeReport {
    pub kind: TypeKind,
    pub name: String,
    /// Mapped token, `None` when the overlay does not map this type.
    pub token: Option<String>,
    pub attributes: Vec<AttributeRow>,
}

/// Report data from provider metadata.
#[derive(Debug)]
pub struct InspectReport {
    pub name: String,
    pub version: String,
    pub types: Vec<TypeReport>,
    /// Plugin types with neither an overlay nor an ignore entry.
    pub unmapped: Vec<String>,
}

impl Report for InspectReport {
    fn render(&self, out: &mut dyn Output) {
        if self.version.is_empty() {
            out.heading(&self.name);
        } else {
            out.heading(&format!("{} v{}", self.name, self.version));
        }

        for ty in &self.types {
            out.blank();
            out.group(&format!("{} {}", ty.kind, ty.name));
            out.field("token", ty.token.as_deref().unwrap_or("(unmapped)"));
            for attribute in &ty.attributes {
                let mut line = format!("{}: {}", attribute.property, attribute.ty);
                if attribute.property != attribute.name {
                    line.push_str(&format!(" (from {})", attribute.name));
                }
                if !attribute.flags.is_empty() {
                    line.push_str(&format!(" [{}]", attribute.flags.join(", ")));
                }
                out.item(&line);
            }
        }

        if !self.unmapped.is_empty() {
            out.blank();
            out.diagnostic(&format!(
                "warning: {} unmapped type{}: {}",
                self.unmapped.len(),
                if self.unmapped.len() == 1 { "" } else { "s" },
                self.unmapped.join(", ")
            ));
        }
    }
}
