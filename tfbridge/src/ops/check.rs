//! Check operation - overlay validation.

use std::path::Path;

use tfbridge_core::ProviderInfo;
use tfbridge_manifest::Manifest;

use crate::reports::CheckReport;

/// Execute the check operation.
///
/// Structural problems are rejected when the manifest is parsed; this adds
/// the checks that need the lowered overlay.
pub fn check(manifest: &Manifest, config_path: &Path) -> CheckReport {
    let info = ProviderInfo::from_manifest(manifest);
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let module_version = match info.module_major_version() {
        _ if info.version.is_empty() => None,
        Ok(version) => Some(version),
        Err(err) => {
            errors.push(err.to_string());
            None
        }
    };

    let prefix = format!("{}_", info.resource_prefix());
    let types = info
        .resources
        .iter()
        .map(|(name, r)| ("resource", name, &r.token))
        .chain(
            info.data_sources
                .iter()
                .map(|(name, d)| ("data source", name, &d.token)),
        );
    for (kind, name, token) in types {
        if !name.starts_with(&prefix) {
            warnings.push(format!(
                "{} '{}' does not start with the resource prefix '{}'",
                kind, name, prefix
            ));
        }
        let package = token.split(':').next().unwrap_or_default();
        if package != info.name {
            warnings.push(format!(
                "{} '{}' is mapped to package '{}', expected '{}'",
                kind, name, package, info.name
            ));
        }
    }

    tracing::debug!(
        provider = %info.name,
        errors = errors.len(),
        warnings = warnings.len(),
        "checked overlay"
    );

    CheckReport {
        config_path: config_path.to_path_buf(),
        provider: info.name.clone(),
        version: info.version.clone(),
        module_version,
        resources: info.resources.len(),
        data_sources: info.data_sources.len(),
        config_fields: info.config.len(),
        errors,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::reports::output::render_to_string;

    fn manifest(content: &str) -> Manifest {
        Manifest::from_str(content).expect("Failed to parse manifest")
    }

    #[test]
    fn test_valid_overlay() {
        let manifest = manifest(
            r#"
[provider]
name = "random"
version = "4.2.0"

[config.region]
name = "location"

[resources.random_string]
token = "random:index/randomString:RandomString"

[data-sources.random_thing]
token = "random:index/getThing:getThing"
"#,
        );

        let report = check(&manifest, Path::new("bridge.toml"));
        assert!(report.is_valid());
        assert!(report.warnings.is_empty());
        assert_eq!(report.module_version.as_deref(), Some("v4"));

        insta::assert_snapshot!(render_to_string(&report), @r"
        ✓ bridge.toml is valid

          random v4.2.0
          module: v4
          resources: 1
          data sources: 1
          config overrides: 1
        ");
    }

    #[test]
    fn test_mismatched_prefix_and_package() {
        let manifest = manifest(
            r#"
[provider]
name = "random"
resource-prefix = "rnd"

[resources.random_string]
token = "other:index/randomString:RandomString"
"#,
        );

        let report = check(&manifest, Path::new("bridge.toml"));
        assert!(report.is_valid());
        assert_eq!(
            report.warnings,
            vec![
                "resource 'random_string' does not start with the resource prefix 'rnd_'",
                "resource 'random_string' is mapped to package 'other', expected 'random'",
            ]
        );
    }
}
