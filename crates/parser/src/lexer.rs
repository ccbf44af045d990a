//! Tokenizer: turns raw template text into a `Vec<Token>`.
//!
//! A hand-written scanner rather than a regex pass — the grammar is small
//! (seven tag shapes plus literal text) and each tag's terminator differs
//! (`then>` for conditionals, a bare `>` for `<func>`/`<template>`, `}` for
//! expressions, the literal `</setvar>` for assignments), so a single regex
//! can't drive all of it cleanly.

use cortex_core::{Token, TokenKind};

/// Tokenize `source`. Never fails: anything that doesn't match one of the
/// seven recognised tag shapes is literal `Text`, which is how the parser
/// satisfies the round-trip invariant for templates with no Cortex syntax
/// at all.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut text_start = 0usize;
    let mut pos = 0usize;
    let len = source.len();

    while pos < len {
        let rest = &source[pos..];
        let matched = if rest.starts_with('<') {
            match_angle_tag(source, pos)
        } else if rest.starts_with("{=") {
            match_expression(source, pos)
        } else {
            None
        };

        match matched {
            Some((kind, raw, next_pos)) => {
                flush_text(&mut tokens, source, text_start, pos);
                tokens.push(Token::new(kind, raw, pos));
                pos = next_pos;
                text_start = pos;
            }
            None => {
                pos += next_char_len(source, pos);
            }
        }
    }

    flush_text(&mut tokens, source, text_start, len);
    tokens
}

fn flush_text(tokens: &mut Vec<Token>, source: &str, start: usize, end: usize) {
    if end > start {
        tokens.push(Token::new(TokenKind::Text, &source[start..end], start));
    }
}

fn next_char_len(source: &str, pos: usize) -> usize {
    source[pos..]
        .chars()
        .next()
        .map(|c| c.len_utf8())
        .unwrap_or(1)
}

/// Try to match one of the `<...>`-shaped tags at `pos`. Returns the token,
/// its raw source text, and the byte offset just past it.
fn match_angle_tag(source: &str, pos: usize) -> Option<(TokenKind, &str, usize)> {
    let rest = &source[pos..];

    if let Some(rem) = strip_keyword(rest, "<else") {
        let trimmed = rem.trim_start();
        if let Some(after_if) = strip_keyword(trimmed, "if") {
            let (condition, end) = scan_until(source, after_if, "then>")?;
            let raw = &source[pos..end];
            return Some((TokenKind::ElseIf { condition }, raw, end));
        }
        if let Some(after_slash) = trimmed.strip_prefix('/') {
            if let Some(after_close) = after_slash.strip_prefix('>') {
                let end = source.len() - after_close.len();
                let raw = &source[pos..end];
                return Some((TokenKind::Else, raw, end));
            }
        }
        return None;
    }

    if let Some(rem) = strip_keyword(rest, "<if") {
        let (condition, end) = scan_until(source, rem, "then>")?;
        let raw = &source[pos..end];
        return Some((TokenKind::IfOpen { condition }, raw, end));
    }

    if let Some(after) = rest.strip_prefix("</if>") {
        let end = source.len() - after.len();
        return Some((TokenKind::IfClose, &source[pos..end], end));
    }

    if let Some(after) = rest.strip_prefix("</func>") {
        let end = source.len() - after.len();
        return Some((TokenKind::FuncClose, &source[pos..end], end));
    }

    if let Some(rem) = strip_keyword(rest, "<func") {
        let (name, end) = scan_until(source, rem, ">")?;
        let raw = &source[pos..end];
        return Some((TokenKind::FuncOpen { name }, raw, end));
    }

    if let Some(rem) = strip_keyword(rest, "<template") {
        let (name, end) = scan_until(source, rem, ">")?;
        let raw = &source[pos..end];
        return Some((TokenKind::Template { name }, raw, end));
    }

    if let Some(rem) = strip_keyword(rest, "<setvar") {
        let (name, after_name_end) = scan_until(source, rem, ">")?;
        let value_start = after_name_end;
        let close_rel = source[value_start..].find("</setvar>")?;
        let value_end = value_start + close_rel;
        let end = value_end + "</setvar>".len();
        let raw = &source[pos..end];
        return Some((
            TokenKind::SetVar {
                name,
                value: source[value_start..value_end].to_string(),
            },
            raw,
            end,
        ));
    }

    None
}

/// If `rest` starts with `keyword` followed by whitespace (a true keyword
/// boundary, not a prefix of a longer word like `<iframe>` matching `<if`),
/// return the remainder after the keyword.
fn strip_keyword<'a>(rest: &'a str, keyword: &str) -> Option<&'a str> {
    let after = rest.strip_prefix(keyword)?;
    match after.chars().next() {
        Some(c) if c.is_whitespace() => Some(after),
        Some('/') if keyword == "<else" => Some(after),
        _ => None,
    }
}

/// Scan forward from `after_keyword` for the literal `terminator`, returning
/// the text in between (trimmed) and the absolute byte offset just past the
/// terminator.
fn scan_until(source: &str, after_keyword: &str, terminator: &str) -> Option<(String, usize)> {
    let search_start = source.len() - after_keyword.len();
    let rel = after_keyword.find(terminator)?;
    let content_end = search_start + rel;
    let end = content_end + terminator.len();
    Some((source[search_start..content_end].trim().to_string(), end))
}

fn match_expression(source: &str, pos: usize) -> Option<(TokenKind, &str, usize)> {
    let after = &source[pos + 2..];
    let rel = after.find('}')?;
    let expr_end = pos + 2 + rel;
    let end = expr_end + 1;
    let expr = source[pos + 2..expr_end].trim().to_string();
    Some((TokenKind::Expression { expr }, &source[pos..end], end))
}
