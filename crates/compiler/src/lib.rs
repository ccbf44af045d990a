//! Cortex Compiler: turns a validated token stream into a single output
//! expression in the host's interpolation dialect.

mod error;
mod sanitise;
mod setvar;

pub use error::CompileError;
pub use sanitise::{sanitise_setvar_name, sanitise_template_name};

use cortex_core::{Token, TokenKind};
use cortex_security::SecurityPolicy;

struct IfFrame {
    position: usize,
    elseif_count: usize,
    seen_else: bool,
}

/// Compile `tokens` against `policy`, producing the output expression.
///
/// Re-derives the same balance checks the parser already performed instead
/// of trusting that `tokens` came from a validated parse: security and
/// structural correctness are enforced per token, not assumed from upstream.
pub fn compile(tokens: &[Token], policy: &SecurityPolicy) -> Result<String, CompileError> {
    let mut out = String::new();
    let mut if_stack: Vec<IfFrame> = Vec::new();
    let mut func_depth: usize = 0;

    for token in tokens {
        match &token.kind {
            TokenKind::Text => out.push_str(&escape_literal(&token.raw)),

            TokenKind::IfOpen { condition } => {
                let validated = validate_condition(policy, condition, token.position, "IfOpen")?;
                out.push('"');
                out.push_str(".((");
                out.push_str(validated.as_str());
                out.push_str(")?\"");
                if_stack.push(IfFrame {
                    position: token.position,
                    elseif_count: 0,
                    seen_else: false,
                });
            }

            TokenKind::ElseIf { condition } => {
                {
                    let frame = if_stack
                        .last()
                        .ok_or(CompileError::ElseIfWithoutIf { position: token.position })?;
                    if frame.seen_else {
                        return Err(CompileError::ElseIfAfterElse { position: token.position });
                    }
                }
                let validated = validate_condition(policy, condition, token.position, "ElseIf")?;
                out.push('"');
                out.push_str(":((");
                out.push_str(validated.as_str());
                out.push_str(")?\"");
                let frame = if_stack.last_mut().expect("checked above");
                frame.elseif_count += 1;
            }

            TokenKind::Else => {
                let frame = if_stack
                    .last_mut()
                    .ok_or(CompileError::ElseWithoutIf { position: token.position })?;
                if frame.seen_else {
                    return Err(CompileError::MultipleElse { position: token.position });
                }
                frame.seen_else = true;
                out.push_str("\":\"");
            }

            TokenKind::IfClose => {
                let frame = if_stack
                    .pop()
                    .ok_or(CompileError::IfCloseWithoutIf { position: token.position })?;
                out.push('"');
                if !frame.seen_else {
                    out.push_str(":\"\"");
                }
                for _ in 0..=frame.elseif_count {
                    out.push(')');
                }
                out.push_str(".\"");
            }

            TokenKind::FuncOpen { name } => {
                let normalised = policy.validate_function(name).map_err(|inner| {
                    CompileError::SecurityViolation {
                        inner,
                        position: token.position,
                        token_kind: "FuncOpen",
                    }
                })?;
                out.push('"');
                out.push('.');
                out.push_str(normalised.as_str());
                out.push('(');
                out.push('"');
                func_depth += 1;
            }

            TokenKind::FuncClose => {
                debug_assert!(func_depth > 0, "FuncClose without matching FuncOpen");
                func_depth = func_depth.saturating_sub(1);
                out.push('"');
                out.push(')');
                out.push('.');
                out.push('"');
            }

            TokenKind::Template { name } => {
                let sanitised = sanitise_template_name(name);
                out.push('"');
                out.push('.');
                out.push_str("HOST_TEMPLATE_LOOKUP(");
                out.push_str(&sanitised);
                out.push(')');
                out.push('.');
                out.push('"');
            }

            TokenKind::Expression { expr } => {
                let validated = policy.validate_expression(expr).map_err(|inner| {
                    CompileError::SecurityViolation {
                        inner,
                        position: token.position,
                        token_kind: "Expression",
                    }
                })?;
                out.push('"');
                out.push('.');
                out.push_str("strval(");
                out.push_str(validated.as_str());
                out.push(')');
                out.push('.');
                out.push('"');
            }

            TokenKind::SetVar { name, value } => {
                let sanitised = sanitise_setvar_name(name);
                let trimmed = value.trim();
                let rhs = if setvar::looks_like_expression(trimmed) {
                    let validated =
                        policy
                            .validate_expression(trimmed)
                            .map_err(|inner| CompileError::SecurityViolation {
                                inner,
                                position: token.position,
                                token_kind: "SetVar",
                            })?;
                    validated.as_str().to_string()
                } else {
                    setvar::quote_and_escape(trimmed)
                };
                out.push('"');
                out.push('.');
                out.push_str("((");
                out.push('$');
                out.push_str(&sanitised);
                out.push_str(" = ");
                out.push_str(&rhs);
                out.push_str(") ? \"\" : \"\")");
                out.push('.');
                out.push('"');
            }
        }
    }

    if let Some(frame) = if_stack.last() {
        return Err(CompileError::UnbalancedIf { position: frame.position });
    }

    Ok(out)
}

fn validate_condition(
    policy: &SecurityPolicy,
    condition: &str,
    position: usize,
    token_kind: &'static str,
) -> Result<cortex_security::Unescaped, CompileError> {
    policy
        .validate_expression(condition)
        .map_err(|inner| CompileError::SecurityViolation {
            inner,
            position,
            token_kind,
        })
}

/// Escape `\` and `"` in literal template text so it stays valid once
/// embedded in the host's double-quoted string context.
fn escape_literal(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use cortex_core::Token;

    fn policy() -> SecurityPolicy {
        SecurityPolicy::new(&[], &[], 0)
    }

    fn tok(kind: TokenKind, pos: usize) -> Token {
        Token::new(kind, "", pos)
    }

    #[test]
    fn plain_text_round_trips() {
        let tokens = vec![Token::new(TokenKind::Text, "Hello, world", 0)];
        let out = compile(&tokens, &policy()).unwrap();
        assert_eq!(out, "Hello, world");
    }

    #[test]
    fn simple_conditional_no_else() {
        let tokens = vec![
            tok(
                TokenKind::IfOpen {
                    condition: "$x".to_string(),
                },
                0,
            ),
            Token::new(TokenKind::Text, "yes", 0),
            tok(TokenKind::IfClose, 0),
        ];
        let out = compile(&tokens, &policy()).unwrap();
        assert_eq!(out, r#"".(($x)?"yes":"")."#.to_string() + "\"");
    }

    #[test]
    fn if_elseif_else() {
        let tokens = vec![
            tok(
                TokenKind::IfOpen {
                    condition: "$a".to_string(),
                },
                0,
            ),
            Token::new(TokenKind::Text, "A", 0),
            tok(
                TokenKind::ElseIf {
                    condition: "$b".to_string(),
                },
                0,
            ),
            Token::new(TokenKind::Text, "B", 0),
            tok(TokenKind::Else, 0),
            Token::new(TokenKind::Text, "C", 0),
            tok(TokenKind::IfClose, 0),
        ];
        let out = compile(&tokens, &policy()).unwrap();
        assert_eq!(out, r#"".(($a)?"A":(($b)?"B":"C"))."#.to_string() + "\"");
    }

    #[test]
    fn expression_with_allowed_function() {
        let tokens = vec![
            Token::new(TokenKind::Text, "Hi ", 0),
            tok(
                TokenKind::Expression {
                    expr: "htmlspecialchars($name)".to_string(),
                },
                3,
            ),
        ];
        let out = compile(&tokens, &policy()).unwrap();
        assert_eq!(out, r#"Hi ".strval(htmlspecialchars($name))."#.to_string() + "\"");
    }

    #[test]
    fn expression_with_forbidden_function_is_security_violation() {
        let tokens = vec![tok(
            TokenKind::Expression {
                expr: "eval($x)".to_string(),
            },
            0,
        )];
        let err = compile(&tokens, &policy()).unwrap_err();
        assert!(matches!(err, CompileError::SecurityViolation { .. }));
    }

    #[test]
    fn func_open_validates_name() {
        let tokens = vec![
            tok(
                TokenKind::FuncOpen {
                    name: "eval".to_string(),
                },
                0,
            ),
            tok(TokenKind::FuncClose, 0),
        ];
        let err = compile(&tokens, &policy()).unwrap_err();
        assert!(matches!(err, CompileError::SecurityViolation { .. }));
    }

    #[test]
    fn func_open_allows_whitelisted_name() {
        let tokens = vec![
            tok(
                TokenKind::FuncOpen {
                    name: "htmlspecialchars".to_string(),
                },
                0,
            ),
            Token::new(TokenKind::Text, "hi", 0),
            tok(TokenKind::FuncClose, 0),
        ];
        let out = compile(&tokens, &policy()).unwrap();
        assert_eq!(out, "\".htmlspecialchars(\"hi\").\"");
    }

    #[test]
    fn template_include_sanitises_name() {
        let tokens = vec![tok(
            TokenKind::Template {
                name: "../secret".to_string(),
            },
            0,
        )];
        let out = compile(&tokens, &policy()).unwrap();
        assert_eq!(out, "\".HOST_TEMPLATE_LOOKUP(secret).\"");
    }

    #[test]
    fn setvar_quotes_plain_text() {
        let tokens = vec![tok(
            TokenKind::SetVar {
                name: "greeting".to_string(),
                value: "Hello there".to_string(),
            },
            0,
        )];
        let out = compile(&tokens, &policy()).unwrap();
        assert_eq!(out, "\".(($greeting = \"Hello there\") ? \"\" : \"\").\"");
    }

    #[test]
    fn setvar_leaves_variable_reference_bare() {
        let tokens = vec![tok(
            TokenKind::SetVar {
                name: "alias".to_string(),
                value: "$other".to_string(),
            },
            0,
        )];
        let out = compile(&tokens, &policy()).unwrap();
        assert_eq!(out, "\".(($alias = $other) ? \"\" : \"\").\"");
    }

    #[test]
    fn setvar_rejects_forbidden_expression_value() {
        let tokens = vec![tok(
            TokenKind::SetVar {
                name: "x".to_string(),
                value: "eval($y)".to_string(),
            },
            0,
        )];
        let err = compile(&tokens, &policy()).unwrap_err();
        assert!(matches!(err, CompileError::SecurityViolation { .. }));
    }

    #[test]
    fn unbalanced_if_close_is_rejected() {
        let tokens = vec![tok(TokenKind::IfClose, 0)];
        let err = compile(&tokens, &policy()).unwrap_err();
        assert!(matches!(err, CompileError::IfCloseWithoutIf { .. }));
    }

    #[test]
    fn trailing_unclosed_if_is_rejected() {
        let tokens = vec![tok(
            TokenKind::IfOpen {
                condition: "$x".to_string(),
            },
            0,
        )];
        let err = compile(&tokens, &policy()).unwrap_err();
        assert!(matches!(err, CompileError::UnbalancedIf { .. }));
    }

    #[test]
    fn security_closure_every_emitted_function_was_allowed() {
        let tokens = vec![tok(
            TokenKind::Expression {
                expr: "htmlspecialchars(strtoupper($x))".to_string(),
            },
            0,
        )];
        let out = compile(&tokens, &policy()).unwrap();
        for name in ["htmlspecialchars", "strtoupper"] {
            assert!(policy().is_allowed_function(name));
            assert!(out.contains(name));
        }
    }
}
