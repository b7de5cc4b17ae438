//! Error types for the server-data pass

use oxc_span::Span;
use thiserror::Error;

/// Result type for server-data transforms
pub type Result<T> = std::result::Result<T, TransformError>;

/// Everything that aborts a module's transform.
///
/// None of these are recovered inside the pass: the module is either fully
/// rewritten or the error reaches the host untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// A destructuring element or declarator target outside the supported shapes
    #[error("unsupported {shape} at {}..{}", span.start, span.end)]
    UnsupportedPatternShape { shape: &'static str, span: Span },

    /// A removal found the tree in a shape the pass itself should have ruled out
    #[error("structural inconsistency: {detail}")]
    StructuralInconsistency { detail: String },

    /// The parser or another host collaborator failed
    #[error("host primitive failure: {message}")]
    HostPrimitiveFailure { message: String },

    /// The sweep did not converge within the configured number of passes
    #[error("dead-code sweep did not converge within {limit} passes")]
    PassLimitExceeded { limit: usize },
}

impl TransformError {
    pub fn unsupported(shape: &'static str, span: Span) -> Self {
        Self::UnsupportedPatternShape { shape, span }
    }

    pub fn inconsistent(detail: impl Into<String>) -> Self {
        Self::StructuralInconsistency {
            detail: detail.into(),
        }
    }

    pub fn host(message: impl Into<String>) -> Self {
        Self::HostPrimitiveFailure {
            message: message.into(),
        }
    }
}
