use tfbridge_shim::ShimError;
use tfbridge_types::{AttributePath, TypeDescriptor, ValueError};
use thiserror::Error;

/// A value could not be converted to or from its declared descriptor.
#[derive(Debug, Clone, PartialEq, Error, miette::Diagnostic)]
pub enum ConvertError {
    #[error("{path}: expected {expected}, found {found} value")]
    #[diagnostic(code(tfbridge::convert::mismatch))]
    Mismatch {
        path: AttributePath,
        expected: TypeDescriptor,
        found: &'static str,
    },

    #[error("{path}: number {value} has no finite representation")]
    #[diagnostic(code(tfbridge::convert::non_finite))]
    NonFiniteNumber { path: AttributePath, value: f64 },

    #[error("{path}: number {value} is outside the range of a 64-bit float")]
    #[diagnostic(code(tfbridge::convert::out_of_range))]
    OutOfRange { path: AttributePath, value: String },

    #[error("{path}: more than one attribute maps to property {key:?}")]
    #[diagnostic(code(tfbridge::convert::duplicate_key))]
    DuplicateKey { path: AttributePath, key: String },

    #[error("{path}: property {key:?} does not map to any attribute")]
    #[diagnostic(code(tfbridge::convert::unexpected_key))]
    UnexpectedKey { path: AttributePath, key: String },

    #[error("{path}: {source}")]
    #[diagnostic(code(tfbridge::convert::invalid))]
    Invalid {
        path: AttributePath,
        #[source]
        source: ValueError,
    },
}

impl ConvertError {
    /// Location of the offending value.
    pub fn path(&self) -> &AttributePath {
        match self {
            ConvertError::Mismatch { path, .. }
            | ConvertError::NonFiniteNumber { path, .. }
            | ConvertError::OutOfRange { path, .. }
            | ConvertError::DuplicateKey { path, .. }
            | ConvertError::UnexpectedKey { path, .. }
            | ConvertError::Invalid { path, .. } => path,
        }
    }
}

/// Errors raised by the provider overlay.
#[derive(Debug, Error, miette::Diagnostic)]
pub enum InfoError {
    #[error("invalid {kind} name {name:?}")]
    #[diagnostic(code(tfbridge::info::invalid_name))]
    InvalidName { kind: &'static str, name: String },

    #[error("invalid version {version:?}")]
    #[diagnostic(code(tfbridge::info::invalid_version))]
    InvalidVersion {
        version: String,
        #[source]
        source: semver::Error,
    },

    /// A resource's ID could not be read from its state.
    #[error("{message}. This is an error in {provider} resource provider, please report at {repository}")]
    #[diagnostic(code(tfbridge::info::delegate_id))]
    DelegateId {
        message: String,
        provider: String,
        repository: String,
    },

    #[error("default value of {field:?} is computed by a function that cannot run after being restored from metadata")]
    #[diagnostic(code(tfbridge::info::restored_default))]
    RestoredDefault { field: String },

    #[error("transform failed: {0}")]
    #[diagnostic(code(tfbridge::info::transform))]
    Transform(String),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Shim(#[from] ShimError),

    #[error("invalid overlay metadata")]
    #[diagnostic(code(tfbridge::info::metadata))]
    Metadata(#[from] serde_json::Error),
}
