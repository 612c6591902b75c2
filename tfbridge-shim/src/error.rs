use std::fmt;

use thiserror::Error;

use crate::diagnostic::Diagnostic;

/// Result type for shim operations.
pub type ShimResult<T> = std::result::Result<T, ShimError>;

/// Runtime operations of the shim interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Validate,
    ValidateResource,
    ValidateDataSource,
    Configure,
    Diff,
    Apply,
    Refresh,
    ReadDataDiff,
    ReadDataApply,
    Meta,
    Stop,
    InitLogging,
    NewDestroyDiff,
    NewResourceConfig,
    IsSet,
}

impl Operation {
    /// Every runtime operation, in interface order.
    pub const ALL: [Operation; 15] = [
        Operation::Validate,
        Operation::ValidateResource,
        Operation::ValidateDataSource,
        Operation::Configure,
        Operation::Diff,
        Operation::Apply,
        Operation::Refresh,
        Operation::ReadDataDiff,
        Operation::ReadDataApply,
        Operation::Meta,
        Operation::Stop,
        Operation::InitLogging,
        Operation::NewDestroyDiff,
        Operation::NewResourceConfig,
        Operation::IsSet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Validate => "Validate",
            Operation::ValidateResource => "ValidateResource",
            Operation::ValidateDataSource => "ValidateDataSource",
            Operation::Configure => "Configure",
            Operation::Diff => "Diff",
            Operation::Apply => "Apply",
            Operation::Refresh => "Refresh",
            Operation::ReadDataDiff => "ReadDataDiff",
            Operation::ReadDataApply => "ReadDataApply",
            Operation::Meta => "Meta",
            Operation::Stop => "Stop",
            Operation::InitLogging => "InitLogging",
            Operation::NewDestroyDiff => "NewDestroyDiff",
            Operation::NewResourceConfig => "NewResourceConfig",
            Operation::IsSet => "IsSet",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which declared type map a schema belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    Resource,
    DataSource,
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaKind::Resource => write!(f, "resource"),
            SchemaKind::DataSource => write!(f, "data source"),
        }
    }
}

#[derive(Debug, Error, miette::Diagnostic)]
pub enum ShimError {
    /// A runtime operation was invoked on a schema-only view.
    #[error("schema-only provider does not implement runtime operation {operation}")]
    #[diagnostic(
        code(tfbridge::unsupported_operation),
        help("schema-only providers expose type information only; load the full provider to run {operation}")
    )]
    Unsupported { operation: Operation },

    /// The schema cannot be used at all; nothing downstream may run with it.
    #[error("fatal schema error: {message}")]
    #[diagnostic(code(tfbridge::fatal_schema))]
    Fatal {
        message: String,
        diagnostics: Vec<Diagnostic>,
    },

    #[error("provider schema request returned error diagnostics: {summary}")]
    #[diagnostic(code(tfbridge::schema_diagnostics))]
    SchemaDiagnostics {
        summary: String,
        diagnostics: Vec<Diagnostic>,
    },

    #[error("failed to gather {kind} schemas: {message}")]
    #[diagnostic(code(tfbridge::gather))]
    Gather {
        kind: SchemaKind,
        message: String,
        diagnostics: Vec<Diagnostic>,
    },

    #[error("duplicate {kind} type name {name:?}")]
    #[diagnostic(code(tfbridge::duplicate_type))]
    DuplicateType { kind: SchemaKind, name: String },

    #[error("unknown {kind} type {name:?}")]
    #[diagnostic(code(tfbridge::unknown_type))]
    UnknownType { kind: SchemaKind, name: String },

    /// The wrapped plugin failed a runtime operation.
    #[error("{operation} failed: {message}")]
    #[diagnostic(code(tfbridge::plugin))]
    Plugin {
        operation: Operation,
        message: String,
    },

    #[error("invalid schema metadata")]
    #[diagnostic(code(tfbridge::metadata))]
    Metadata(#[from] serde_json::Error),
}

impl ShimError {
    pub fn unsupported(operation: Operation) -> Self {
        ShimError::Unsupported { operation }
    }

    pub fn plugin(operation: Operation, message: impl Into<String>) -> Self {
        ShimError::Plugin {
            operation,
            message: message.into(),
        }
    }

    /// Returns true if this error signals a schema-only view.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, ShimError::Unsupported { .. })
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, ShimError::Fatal { .. })
    }

    /// The operation named by an unsupported-operation error.
    pub fn unsupported_operation(&self) -> Option<Operation> {
        match self {
            ShimError::Unsupported { operation } => Some(*operation),
            _ => None,
        }
    }

    /// Escalate a schema failure to a fatal error, keeping its diagnostics.
    pub fn into_fatal(self) -> Self {
        match self {
            fatal @ ShimError::Fatal { .. } => fatal,
            ShimError::SchemaDiagnostics {
                summary,
                diagnostics,
            } => ShimError::Fatal {
                message: format!("provider schema returned error diagnostics: {}", summary),
                diagnostics,
            },
            ShimError::Gather {
                kind,
                message,
                diagnostics,
            } => ShimError::Fatal {
                message: format!("failed to gather {} schemas: {}", kind, message),
                diagnostics,
            },
            other => ShimError::Fatal {
                message: other.to_string(),
                diagnostics: Vec::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_message_names_operation() {
        for operation in Operation::ALL {
            let err = ShimError::unsupported(operation);
            assert!(err.is_unsupported());
            assert!(err.to_string().ends_with(operation.as_str()));
            assert_eq!(err.unsupported_operation(), Some(operation));
        }
    }

    #[test]
    fn test_into_fatal_keeps_diagnostics() {
        let err = ShimError::Gather {
            kind: SchemaKind::DataSource,
            message: "boom".into(),
            diagnostics: vec![Diagnostic::error("boom")],
        }
        .into_fatal();
        match err {
            ShimError::Fatal {
                message,
                diagnostics,
            } => {
                assert_eq!(message, "failed to gather data source schemas: boom");
                assert_eq!(diagnostics.len(), 1);
            }
            other => panic!("expected fatal error, got {other:?}"),
        }
    }

    #[test]
    fn test_unsupported_display() {
        insta::assert_snapshot!(
            ShimError::unsupported(Operation::ReadDataApply).to_string(),
            @"schema-only provider does not implement runtime operation ReadDataApply"
        );
    }
}
