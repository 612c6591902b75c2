//! Result of validating a bridge.toml overlay.

use std::path::PathBuf;

use super::output::{Output, Report};

#[derive(Debug)]
pub struct CheckReport {
    pub config_path: PathBuf,
    pub provider: String,
    pub version: String,
    /// Major version suffix of the SDK module path.
    pub module_version: Option<String>,
    pub resources: usize,
    pub data_sources: usize,
    pub config_fields: usize,
    /// Problems that make the overlay unusable.
    pub errors: Vec<String>,
    /// Suspicious but loadable mappings.
    pub warnings: Vec<String>,
}

impl CheckReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        let diagnostics = self
            .errors
            .iter()
            .map(|e| ("error", e))
            .chain(self.warnings.iter().map(|w| ("warning", w)));
        let mut any = false;
        for (level, message) in diagnostics {
            out.diagnostic(&format!("{}: {}", level, message));
            any = true;
        }
        if any {
            out.blank();
        }
        if !self.is_valid() {
            return;
        }

        out.line(&format!("✓ {} is valid", self.config_path.display()));
        out.blank();
        if self.version.is_empty() {
            out.line(&format!("  {}", self.provider));
        } else {
            out.line(&format!("  {} v{}", self.provider, self.version));
        }
        if let Some(module_version) = self.module_version.as_deref().filter(|v| !v.is_empty()) {
            out.field("module", module_version);
        }
        out.field("resources", &self.resources.to_string());
        out.field("data sources", &self.data_sources.to_string());
        out.field("config overrides", &self.config_fields.to_string());
    }
}
