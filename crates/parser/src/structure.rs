//! Structural validation: balanced conditionals, balanced function calls,
//! and (optionally) a maximum nesting depth.
//!
//! The parser maintains two stacks — one per `IfOpen`, one per `FuncOpen`.
//! Validation runs as a single left-to-right pass
//! over the already-tokenized stream; it never looks at expression or
//! function-name text (that is the Compiler's job, per token).

use crate::error::ParseError;
use cortex_core::{Token, TokenKind};

struct IfFrame {
    position: usize,
    seen_else: bool,
}

/// Validate block structure. `max_nesting_depth == 0` means unlimited.
pub fn validate_structure(
    tokens: &[Token],
    template_name: &str,
    max_nesting_depth: usize,
) -> Result<(), ParseError> {
    let mut if_stack: Vec<IfFrame> = Vec::new();
    let mut func_stack: Vec<usize> = Vec::new();

    for token in tokens {
        match &token.kind {
            TokenKind::IfOpen { .. } => {
                if_stack.push(IfFrame {
                    position: token.position,
                    seen_else: false,
                });
                if max_nesting_depth > 0 && if_stack.len() > max_nesting_depth {
                    return Err(ParseError::NestingTooDeep {
                        actual: if_stack.len(),
                        limit: max_nesting_depth,
                        position: token.position,
                        template: template_name.to_string(),
                    });
                }
            }
            TokenKind::ElseIf { .. } => match if_stack.last() {
                None => return Err(ParseError::OrphanElseIf { position: token.position }),
                Some(frame) if frame.seen_else => {
                    return Err(ParseError::ElseIfAfterElse { position: token.position })
                }
                Some(_) => {}
            },
            TokenKind::Else => match if_stack.last_mut() {
                None => return Err(ParseError::OrphanElse { position: token.position }),
                Some(frame) if frame.seen_else => {
                    return Err(ParseError::MultipleElse { position: token.position })
                }
                Some(frame) => frame.seen_else = true,
            },
            TokenKind::IfClose => {
                if if_stack.pop().is_none() {
                    return Err(ParseError::UnbalancedIf { position: token.position });
                }
            }
            TokenKind::FuncOpen { .. } => {
                func_stack.push(token.position);
            }
            TokenKind::FuncClose => {
                if func_stack.pop().is_none() {
                    return Err(ParseError::UnbalancedFunc { position: token.position });
                }
            }
            TokenKind::Text
            | TokenKind::Template { .. }
            | TokenKind::Expression { .. }
            | TokenKind::SetVar { .. } => {}
        }
    }

    if let Some(frame) = if_stack.last() {
        return Err(ParseError::UnclosedIf { position: frame.position });
    }
    if let Some(&position) = func_stack.last() {
        return Err(ParseError::UnclosedFunc { position });
    }

    Ok(())
}
