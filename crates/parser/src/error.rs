//! Error taxonomy for tokenization and structural validation.

/// All variants carry a byte `position` into the source template: a parser
/// failure is fatal for that one template, and the caller needs to be able
/// to point at where it went wrong.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// `</if>` with an empty conditional stack.
    UnbalancedIf { position: usize },
    /// End of input with a non-empty conditional stack.
    UnclosedIf { position: usize },
    /// `<else />` with an empty conditional stack.
    OrphanElse { position: usize },
    /// `<else if ...>` with an empty conditional stack.
    OrphanElseIf { position: usize },
    /// A second `<else />` in the same conditional scope.
    MultipleElse { position: usize },
    /// `<else if ...>` appearing after `<else />` in the same scope.
    ElseIfAfterElse { position: usize },
    /// `</func>` with an empty function-call stack.
    UnbalancedFunc { position: usize },
    /// End of input with a non-empty function-call stack.
    UnclosedFunc { position: usize },
    /// Conditional nesting depth exceeded the configured limit.
    NestingTooDeep {
        actual: usize,
        limit: usize,
        position: usize,
        template: String,
    },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::UnbalancedIf { position } => {
                write!(f, "</if> without matching <if> at byte {}", position)
            }
            ParseError::UnclosedIf { position } => {
                write!(f, "<if> opened at byte {} was never closed", position)
            }
            ParseError::OrphanElse { position } => {
                write!(f, "<else /> outside any <if> block at byte {}", position)
            }
            ParseError::OrphanElseIf { position } => {
                write!(f, "<else if> outside any <if> block at byte {}", position)
            }
            ParseError::MultipleElse { position } => {
                write!(f, "more than one <else /> in one <if> block at byte {}", position)
            }
            ParseError::ElseIfAfterElse { position } => {
                write!(f, "<else if> after <else /> at byte {}", position)
            }
            ParseError::UnbalancedFunc { position } => {
                write!(f, "</func> without matching <func> at byte {}", position)
            }
            ParseError::UnclosedFunc { position } => {
                write!(f, "<func> opened at byte {} was never closed", position)
            }
            ParseError::NestingTooDeep {
                actual,
                limit,
                position,
                template,
            } => write!(
                f,
                "conditional nesting depth {} exceeds limit {} at byte {} in template '{}'",
                actual, limit, position, template
            ),
        }
    }
}

impl ParseError {
    /// The byte offset into the source template where this error was
    /// detected.
    pub fn position(&self) -> usize {
        match self {
            ParseError::UnbalancedIf { position }
            | ParseError::UnclosedIf { position }
            | ParseError::OrphanElse { position }
            | ParseError::OrphanElseIf { position }
            | ParseError::MultipleElse { position }
            | ParseError::ElseIfAfterElse { position }
            | ParseError::UnbalancedFunc { position }
            | ParseError::UnclosedFunc { position }
            | ParseError::NestingTooDeep { position, .. } => *position,
        }
    }
}

impl std::error::Error for ParseError {}
