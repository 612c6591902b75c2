use std::path::Path;

use super::Manifest;
use crate::{Error, Result};

/// A parsed bridge.toml, keeping the text it was read from.
pub struct BridgeToml {
    content: String,
    manifest: Manifest,
}

impl BridgeToml {
    /// Reads and parses the overlay at `path`. Diagnostics name the file as given.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest = Manifest::from_str_with_filename(&content, &path.display().to_string())?;
        Ok(Self { content, manifest })
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }
}
