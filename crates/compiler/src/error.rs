//! Error taxonomy for the compiler's own structural and security checks.

use cortex_security::SecurityError;

/// The compiler mirrors the parser's balance checks per token rather than
/// trusting that the token stream it was handed was already validated, and
/// wraps every `SecurityPolicy` rejection with the token that triggered it.
#[derive(Debug, Clone, PartialEq)]
pub enum CompileError {
    UnbalancedIf { position: usize },
    ElseWithoutIf { position: usize },
    ElseIfWithoutIf { position: usize },
    IfCloseWithoutIf { position: usize },
    MultipleElse { position: usize },
    ElseIfAfterElse { position: usize },
    /// A `SecurityPolicy` rejection, rewrapped with the offending token's
    /// kind and position.
    SecurityViolation {
        inner: SecurityError,
        position: usize,
        token_kind: &'static str,
    },
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::UnbalancedIf { position } => {
                write!(f, "</if> without matching <if> at byte {}", position)
            }
            CompileError::ElseWithoutIf { position } => {
                write!(f, "<else /> outside any <if> block at byte {}", position)
            }
            CompileError::ElseIfWithoutIf { position } => {
                write!(f, "<else if> outside any <if> block at byte {}", position)
            }
            CompileError::IfCloseWithoutIf { position } => {
                write!(f, "</if> without matching <if> at byte {}", position)
            }
            CompileError::MultipleElse { position } => {
                write!(f, "more than one <else /> in one <if> block at byte {}", position)
            }
            CompileError::ElseIfAfterElse { position } => {
                write!(f, "<else if> after <else /> at byte {}", position)
            }
            CompileError::SecurityViolation {
                inner,
                position,
                token_kind,
            } => write!(
                f,
                "security violation in {} at byte {}: {}",
                token_kind, position, inner
            ),
        }
    }
}

impl CompileError {
    /// The byte offset into the source template where this error was
    /// detected.
    pub fn position(&self) -> usize {
        match self {
            CompileError::UnbalancedIf { position }
            | CompileError::ElseWithoutIf { position }
            | CompileError::ElseIfWithoutIf { position }
            | CompileError::IfCloseWithoutIf { position }
            | CompileError::MultipleElse { position }
            | CompileError::ElseIfAfterElse { position }
            | CompileError::SecurityViolation { position, .. } => *position,
        }
    }
}

impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CompileError::SecurityViolation { inner, .. } => Some(inner),
            _ => None,
        }
    }
}
