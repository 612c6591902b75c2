//! Validation context and utilities for manifest parsing.

use std::sync::Arc;

use miette::SourceSpan;

use crate::{Result, error::SourceContext};

/// Parsing and validation context that carries source information.
///
/// Holds the source content, filename, and current path through the
/// manifest hierarchy, so nested validation can point at the right table.
///
/// # Example
///
/// ```ignore
/// let ctx = ParseContext::new(src, "bridge.toml");
/// ctx.validate_provider_name("random")?;
///
/// // For nested validation
/// let nested = ctx.push("resources").push("random_string");
/// nested.validate_token("random:index/randomString:RandomString")?;
/// ```
#[derive(Debug, Clone)]
pub struct ParseContext<'a> {
    /// Source context for error reporting (shared across nested contexts)
    source: Arc<SourceContext>,
    /// Path segments for nested validation (e.g., ["resources", "random_string"])
    path: Vec<&'a str>,
}

impl<'a> ParseContext<'a> {
    pub fn new(src: &str, filename: &str) -> Self {
        Self {
            source: Arc::new(SourceContext::new(src, filename)),
            path: Vec::new(),
        }
    }

    pub fn src(&self) -> &str {
        self.source.src()
    }

    pub fn filename(&self) -> &str {
        self.source.filename()
    }

    /// Push a path segment and return a new context.
    pub fn push(&self, segment: &'a str) -> Self {
        let mut new_path = self.path.clone();
        new_path.push(segment);
        Self {
            source: Arc::clone(&self.source),
            path: new_path,
        }
    }

    /// Get the current path as a dot-separated string.
    pub fn path_string(&self) -> String {
        self.path.join(".")
    }

    /// Get a context description for error messages.
    ///
    /// For example: "field in 'resources.random_string'" or just "field" if no path.
    pub fn context_for(&self, kind: &str) -> String {
        if self.path.is_empty() {
            kind.to_string()
        } else {
            format!("{} in '{}'", kind, self.path_string())
        }
    }

    /// Validate a provider name or resource prefix.
    pub fn validate_provider_name(&self, name: &str) -> Result<()> {
        match validate_identifier(name) {
            None => Ok(()),
            Some(reason) => Err(self.source.validation_error_at(
                format!("invalid provider name '{}': {}", name, reason),
                find_value_span(self.src(), name),
            )),
        }
    }

    /// Validate a semantic version, with or without a leading `v`.
    pub fn validate_version(&self, version: &str) -> Result<()> {
        let trimmed = version.strip_prefix('v').unwrap_or(version);
        match semver::Version::parse(trimmed) {
            Ok(_) => Ok(()),
            Err(e) => Err(self.source.validation_error_at(
                format!("invalid version '{}': {}", version, e),
                find_value_span(self.src(), version),
            )),
        }
    }

    /// Validate a `package:module:member` token.
    pub fn validate_token(&self, token: &str) -> Result<()> {
        match validate_token(token) {
            None => Ok(()),
            Some(reason) => Err(self.source.invalid_token_error(
                token,
                reason,
                find_value_span(self.src(), token),
            )),
        }
    }

    /// Validate an explicit property name override.
    pub fn validate_property_name(&self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            let message = format!("{} has an empty name", self.context_for("field"));
            let span = find_empty_name_span(self.src());
            return Err(self.source.validation_error_at(message, span));
        }
        Ok(())
    }
}

/// Find the span of a quoted string value in the TOML source.
pub(crate) fn find_value_span(src: &str, value: &str) -> Option<SourceSpan> {
    if value.is_empty() {
        return None;
    }
    for quote in ['"', '\''] {
        let pattern = format!("{quote}{value}{quote}");
        if let Some(pos) = src.find(&pattern) {
            // +1 to skip the opening quote
            return Some(SourceSpan::from((pos + 1, value.len())));
        }
    }
    None
}

/// Find the first `name = ""` in the source.
fn find_empty_name_span(src: &str) -> Option<SourceSpan> {
    ["name = \"\"", "name=\"\"", "name = ''"]
        .iter()
        .find_map(|pattern| src.find(pattern).map(|pos| (pos, pattern.len())))
        .map(SourceSpan::from)
}

/// Returns None if valid, Some(reason) if invalid.
///
/// Provider names start with a letter and contain only letters, numbers,
/// underscores, and dashes.
pub(crate) fn validate_identifier(name: &str) -> Option<&'static str> {
    let mut chars = name.chars();

    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        Some(_) => return Some("name must start with a letter"),
        None => return Some("name cannot be empty"),
    }

    if chars.any(|c| !(c.is_ascii_alphanumeric() || c == '_' || c == '-')) {
        return Some("name must contain only letters, numbers, underscores, and dashes");
    }

    None
}

/// Returns None if valid, Some(reason) if invalid.
pub(crate) fn validate_token(token: &str) -> Option<&'static str> {
    let parts: Vec<&str> = token.split(':').collect();
    if parts.len() != 3 {
        return Some("expected three ':'-separated parts");
    }
    if parts.iter().any(|part| part.is_empty()) {
        return Some("token parts cannot be empty");
    }
    if validate_identifier(parts[0]).is_some() {
        return Some("package must be a valid provider name");
    }
    if parts[2].contains('/') {
        return Some("member cannot contain '/'");
    }
    None
}
