//! Manifest parsing from files and strings.

use std::{path::Path, str::FromStr};

use indexmap::IndexMap;

use super::{FieldOverride, Manifest, validate::ParseContext};
use crate::{Error, Result, error::SourceContext};

impl FromStr for Manifest {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        parse_manifest(s, "bridge.toml")
    }
}

impl Manifest {
    /// Parse a bridge.toml file from the given path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Box::new(Error::Io {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        parse_manifest(&content, &path.display().to_string())
    }

    /// Parse a bridge.toml from a string with a custom filename for error reporting.
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        parse_manifest(content, filename)
    }
}

/// Parse a manifest from content with the given filename for error reporting.
pub fn parse_manifest(content: &str, filename: &str) -> Result<Manifest> {
    let source_ctx = SourceContext::new(content, filename);
    let manifest: Manifest = toml::from_str(content).map_err(|e| source_ctx.parse_error(e))?;
    validate_manifest(&manifest, content, filename)?;
    Ok(manifest)
}

/// Validate the manifest after parsing.
fn validate_manifest(manifest: &Manifest, src: &str, filename: &str) -> Result<()> {
    let ctx = ParseContext::new(src, filename);

    ctx.validate_provider_name(&manifest.provider.name)?;
    if let Some(version) = &manifest.provider.version {
        ctx.validate_version(version)?;
    }
    if let Some(prefix) = &manifest.provider.resource_prefix {
        ctx.validate_provider_name(prefix)?;
    }

    let config_ctx = ctx.push("config");
    validate_fields(&config_ctx, &manifest.config)?;

    for (type_name, resource) in &manifest.resources {
        let resource_ctx = ctx.push("resources").push(type_name);
        resource_ctx.validate_token(&resource.token)?;
        for alias in &resource.aliases {
            resource_ctx.validate_token(alias)?;
        }
        validate_fields(&resource_ctx.push("fields"), &resource.fields)?;
    }

    for (type_name, data_source) in &manifest.data_sources {
        let data_source_ctx = ctx.push("data-sources").push(type_name);
        data_source_ctx.validate_token(&data_source.token)?;
        validate_fields(&data_source_ctx.push("fields"), &data_source.fields)?;
    }

    Ok(())
}

fn validate_fields<'a>(
    ctx: &ParseContext<'a>,
    fields: &'a IndexMap<String, FieldOverride>,
) -> Result<()> {
    for (name, field) in fields {
        validate_field(&ctx.push(name), field)?;
    }
    Ok(())
}

fn validate_field<'a>(ctx: &ParseContext<'a>, field: &'a FieldOverride) -> Result<()> {
    if let Some(name) = &field.name {
        ctx.validate_property_name(name)?;
    }
    if let Some(token) = &field.type_token {
        ctx.validate_token(token)?;
    }
    for token in &field.alt_types {
        ctx.validate_token(token)?;
    }
    if let Some(elem) = &field.elem {
        validate_field(&ctx.push("elem"), elem)?;
    }
    validate_fields(&ctx.push("fields"), &field.fields)
}
