//! Error taxonomy for `SecurityPolicy` validation.

/// Reasons `SecurityPolicy::validate_function` / `validate_expression` can
/// refuse input. All variants are fatal for the template being compiled;
/// none carry I/O state since this crate performs no I/O.
#[derive(Debug, Clone, PartialEq)]
pub enum SecurityError {
    /// `name` is not on the built-in or additional-allow whitelist, or is on
    /// the deny list.
    DisallowedFunction { name: String },
    /// The unescaped expression matched a forbidden pattern.
    ForbiddenPattern {
        reason: &'static str,
        /// Up to 50 chars of the matching text, for diagnostics.
        excerpt: String,
    },
    /// An identifier immediately followed by `(` in an expression was not a
    /// whitelisted function and not a recognised language construct.
    FunctionInExpression { name: String },
    /// The raw (pre-unescape) expression exceeded the configured length cap.
    ExpressionTooLong { actual: usize, limit: usize },
}

impl std::fmt::Display for SecurityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecurityError::DisallowedFunction { name } => {
                write!(f, "function '{}' is not allowed", name)
            }
            SecurityError::ForbiddenPattern { reason, excerpt } => {
                write!(f, "forbidden pattern ({}): {}", reason, excerpt)
            }
            SecurityError::FunctionInExpression { name } => {
                write!(f, "function '{}' is not allowed in expression", name)
            }
            SecurityError::ExpressionTooLong { actual, limit } => write!(
                f,
                "expression length {} exceeds limit {}",
                actual, limit
            ),
        }
    }
}

impl std::error::Error for SecurityError {}
