use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for manifest operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Source content and filename of a manifest, for error reporting.
///
/// # Example
///
/// ```ignore
/// let ctx = SourceContext::new(content, "bridge.toml");
/// ctx.validation_error("provider name cannot be empty");
/// ctx.invalid_token_error("random:index", "expected three parts", span);
/// ```
#[derive(Debug, Clone)]
pub struct SourceContext {
    src: String,
    filename: String,
}

impl SourceContext {
    pub fn new(src: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            filename: filename.into(),
        }
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Create a NamedSource for miette error reporting.
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.filename, self.src.clone())
    }

    /// Create a parse error from a toml error.
    pub fn parse_error(&self, source: toml::de::Error) -> Box<Error> {
        let span = source.span().map(SourceSpan::from);
        Box::new(Error::Parse {
            src: self.named_source(),
            span,
            source,
        })
    }

    /// Create a validation error without a span.
    pub fn validation_error(&self, message: impl Into<String>) -> Box<Error> {
        Box::new(Error::Validation {
            src: self.named_source(),
            span: None,
            message: message.into(),
        })
    }

    /// Create a validation error, pointing at `span` when it is known.
    pub fn validation_error_at(
        &self,
        message: impl Into<String>,
        span: Option<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::Validation {
            src: self.named_source(),
            span,
            message: message.into(),
        })
    }

    /// Create an invalid token error.
    pub fn invalid_token_error(
        &self,
        token: impl Into<String>,
        reason: impl Into<String>,
        span: Option<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::InvalidToken {
            src: self.named_source(),
            span,
            token: token.into(),
            reason: reason.into(),
        })
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read '{path}'")]
    #[diagnostic(
        code(tfbridge::io),
        help("pass the overlay file with --config, e.g. 'tfbridge check --config bridge.toml'")
    )]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse bridge.toml")]
    #[diagnostic(code(tfbridge::parse_error))]
    Parse {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: toml::de::Error,
    },

    #[error("{message}")]
    #[diagnostic(code(tfbridge::validation_error))]
    Validation {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
        message: String,
    },

    #[error("invalid token '{token}'")]
    #[diagnostic(
        code(tfbridge::invalid_token),
        help("{reason}. Tokens have the form 'package:module:member', e.g. 'random:index/randomString:RandomString'.")
    )]
    InvalidToken {
        #[source_code]
        src: NamedSource<String>,
        #[label("invalid token")]
        span: Option<SourceSpan>,
        token: String,
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_has_span() {
        let ctx = SourceContext::new("[provider\nname = 1", "bridge.toml");
        let toml_err = toml::from_str::<toml::Table>(ctx.src()).unwrap_err();
        match *ctx.parse_error(toml_err) {
            Error::Parse { span, .. } => assert!(span.is_some()),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_token_message() {
        let ctx = SourceContext::new("", "bridge.toml");
        let err = ctx.invalid_token_error("random", "expected three parts", None);
        insta::assert_snapshot!(err.to_string(), @"invalid token 'random'");
    }
}
