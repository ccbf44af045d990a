//! Cortex Parser: tokenizes a template and validates its block structure.
//!
//! Does **not** consult `cortex-security` — function names and expression
//! text are validated by the compiler, per token, as it emits output.

mod error;
mod lexer;
mod structure;

pub use error::ParseError;

use cortex_core::Token;

/// Tokenize `source` and validate its block structure, refusing a nesting
/// depth deeper than `max_nesting_depth` (0 = unlimited).
///
/// On success returns the token stream in source order, ready for the
/// compiler. On failure the template is not touched further — the caller
/// (`cortex-runtime`) degrades to the original raw text.
pub fn parse(
    source: &str,
    template_name: &str,
    max_nesting_depth: usize,
) -> Result<Vec<Token>, ParseError> {
    let tokens = lexer::tokenize(source);
    structure::validate_structure(&tokens, template_name, max_nesting_depth)?;
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cortex_core::TokenKind;

    #[test]
    fn parse_returns_tokens_on_success() {
        let tokens = parse("Hello, world", "greeting", 0).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Text);
    }

    #[test]
    fn parse_propagates_structural_errors() {
        let err = parse("</if>", "broken", 0).unwrap_err();
        assert!(matches!(err, ParseError::UnbalancedIf { .. }));
    }

    #[test]
    fn nesting_limit_is_enforced_end_to_end() {
        let source = "<if $a then><if $b then><if $c then>X</if></if></if>";
        let err = parse(source, "deep", 2).unwrap_err();
        assert!(matches!(err, ParseError::NestingTooDeep { .. }));
    }
}
