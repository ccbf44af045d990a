//! `SecurityPolicy`: the pure validator at the engine's trust boundary.

use crate::error::SecurityError;
use crate::patterns::FORBIDDEN_PATTERNS;
use crate::whitelist::BUILTIN_WHITELIST;
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;

/// Language constructs that look like function calls but aren't, and so are
/// skipped by the identifier-in-expression scan.
const SKIPPED_CONSTRUCTS: &[&str] = &["isset", "empty", "array", "list", "unset", "echo", "print"];

/// Extended-allow entries that are individually safe but collectively worth
/// a host warning if enabled together.
const DANGEROUS_BUT_ALLOWED: &[&str] = &[
    "preg_match",
    "preg_split",
    "preg_quote",
    "preg_replace",
    "file_exists",
    "is_file",
    "is_dir",
    "is_readable",
    "is_writable",
    "var_dump",
    "print_r",
    "var_export",
    "getenv",
];

/// A function name that has passed `validate_function`, normalised to
/// lowercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalisedName(String);

impl NormalisedName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NormalisedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An expression that has passed `validate_expression`: host backslash
/// escaping reversed, scanned clean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unescaped(String);

impl Unescaped {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Unescaped {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Names present in the extended allow-list that are also in
/// `DANGEROUS_BUT_ALLOWED`, recorded so callers can warn an admin.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DangerousOverlap(pub Vec<String>);

/// Immutable, process-wide-constructible validator.
///
/// Constructed once per `Runtime` and shared thereafter — `SecurityPolicy`
/// holds no interior mutability and performs no I/O.
pub struct SecurityPolicy {
    whitelist: HashSet<String>,
    additional_allow: HashSet<String>,
    deny: HashSet<String>,
    forbidden: Vec<(Regex, &'static str)>,
    max_expression_length: usize,
    dangerous_overlap: DangerousOverlap,
}

impl SecurityPolicy {
    /// Build a policy from the built-in whitelist plus host-supplied
    /// extensions. `max_expression_length == 0` means unlimited.
    pub fn new(
        additional_allowed_functions: &[String],
        denied_functions: &[String],
        max_expression_length: usize,
    ) -> Self {
        let whitelist: HashSet<String> = BUILTIN_WHITELIST
            .iter()
            .map(|s| s.to_lowercase())
            .collect();
        let additional_allow: HashSet<String> = additional_allowed_functions
            .iter()
            .map(|s| s.to_lowercase())
            .collect();
        let deny: HashSet<String> = denied_functions.iter().map(|s| s.to_lowercase()).collect();

        let forbidden = FORBIDDEN_PATTERNS
            .iter()
            .map(|(pattern, reason)| {
                let regex = RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .unwrap_or_else(|e| panic!("invalid forbidden pattern {:?}: {}", pattern, e));
                (regex, *reason)
            })
            .collect();

        let dangerous: HashSet<&str> = DANGEROUS_BUT_ALLOWED.iter().copied().collect();
        let overlap: Vec<String> = additional_allow
            .iter()
            .filter(|name| dangerous.contains(name.as_str()))
            .cloned()
            .collect();

        SecurityPolicy {
            whitelist,
            additional_allow,
            deny,
            forbidden,
            max_expression_length,
            dangerous_overlap: DangerousOverlap(overlap),
        }
    }

    /// Names the extended allow-list shares with the dangerous-but-allowed
    /// set, for a host to surface as a warning. Empty if there's no overlap.
    pub fn dangerous_overlap(&self) -> &DangerousOverlap {
        &self.dangerous_overlap
    }

    /// Case-insensitive. False if `name` is denied; else true if built-in or
    /// additionally allowed; else false.
    pub fn is_allowed_function(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        if self.deny.contains(&lower) {
            return false;
        }
        self.whitelist.contains(&lower) || self.additional_allow.contains(&lower)
    }

    pub fn validate_function(&self, name: &str) -> Result<NormalisedName, SecurityError> {
        if self.is_allowed_function(name) {
            Ok(NormalisedName(name.to_lowercase()))
        } else {
            Err(SecurityError::DisallowedFunction {
                name: name.to_string(),
            })
        }
    }

    /// Length check on raw → unescape → forbidden-pattern scan on unescaped
    /// → identifier scan on unescaped. Unescaping before the pattern scan is
    /// load-bearing: a host-escaped `eval\(` must still be caught, so this
    /// order must not change.
    pub fn validate_expression(&self, raw: &str) -> Result<Unescaped, SecurityError> {
        if self.max_expression_length > 0 && raw.len() > self.max_expression_length {
            return Err(SecurityError::ExpressionTooLong {
                actual: raw.len(),
                limit: self.max_expression_length,
            });
        }

        let unescaped = unescape_host_backslashes(raw);

        for (pattern, reason) in &self.forbidden {
            if let Some(m) = pattern.find(&unescaped) {
                let excerpt = truncate_excerpt(m.as_str(), 50);
                return Err(SecurityError::ForbiddenPattern { reason, excerpt });
            }
        }

        self.reject_disallowed_calls(&unescaped)?;

        Ok(Unescaped(unescaped))
    }

    fn reject_disallowed_calls(&self, unescaped: &str) -> Result<(), SecurityError> {
        for name in identifiers_before_call(unescaped) {
            let lower = name.to_lowercase();
            if SKIPPED_CONSTRUCTS.contains(&lower.as_str()) {
                continue;
            }
            if !self.is_allowed_function(&name) {
                return Err(SecurityError::FunctionInExpression { name });
            }
        }
        Ok(())
    }
}

/// Reverse the host's single-pass backslash escaping: `\\` → `\`,
/// `\"` → `"`, `\'` → `'`. Any other backslash escape passes through
/// unchanged (the host only ever emits these three).
fn unescape_host_backslashes(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.peek() {
                Some('\\') => {
                    out.push('\\');
                    chars.next();
                }
                Some('"') => {
                    out.push('"');
                    chars.next();
                }
                Some('\'') => {
                    out.push('\'');
                    chars.next();
                }
                _ => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn truncate_excerpt(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        s.chars().take(max_chars).collect()
    }
}

/// Every identifier immediately followed by `(`, in source order.
fn identifiers_before_call(text: &str) -> Vec<String> {
    static CALL_RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    let re = CALL_RE.get_or_init(|| Regex::new(r"([A-Za-z_][A-Za-z0-9_]*)\s*\(").unwrap());
    re.captures_iter(text)
        .map(|cap| cap[1].to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> SecurityPolicy {
        SecurityPolicy::new(&[], &[], 0)
    }

    #[test]
    fn builtin_whitelist_accepts_known_function() {
        let p = policy();
        assert!(p.is_allowed_function("htmlspecialchars"));
        assert!(p.is_allowed_function("HTMLSPECIALCHARS"));
    }

    #[test]
    fn unknown_function_is_rejected() {
        let p = policy();
        assert!(!p.is_allowed_function("system"));
    }

    #[test]
    fn deny_list_overrides_builtin_whitelist() {
        let p = SecurityPolicy::new(&[], &["htmlspecialchars".to_string()], 0);
        assert!(!p.is_allowed_function("htmlspecialchars"));
    }

    #[test]
    fn deny_list_overrides_additional_allow() {
        let p = SecurityPolicy::new(
            &["my_func".to_string()],
            &["my_func".to_string()],
            0,
        );
        assert!(!p.is_allowed_function("my_func"));
    }

    #[test]
    fn additional_allow_extends_whitelist() {
        let p = SecurityPolicy::new(&["my_helper".to_string()], &[], 0);
        assert!(p.is_allowed_function("my_helper"));
    }

    #[test]
    fn validate_function_normalises_case() {
        let p = policy();
        let name = p.validate_function("HtmlSpecialChars").unwrap();
        assert_eq!(name.as_str(), "htmlspecialchars");
    }

    #[test]
    fn validate_function_rejects_disallowed() {
        let p = policy();
        let err = p.validate_function("eval").unwrap_err();
        assert!(matches!(err, SecurityError::DisallowedFunction { .. }));
    }

    #[test]
    fn expression_length_cap_boundary() {
        let p = SecurityPolicy::new(&[], &[], 10);
        assert!(p.validate_expression("0123456789").is_ok());
        let err = p.validate_expression("01234567890").unwrap_err();
        assert!(matches!(err, SecurityError::ExpressionTooLong { actual: 11, limit: 10 }));
    }

    #[test]
    fn expression_length_zero_is_unlimited() {
        let p = SecurityPolicy::new(&[], &[], 0);
        let long = "x".repeat(10_000);
        assert!(p.validate_expression(&long).is_ok());
    }

    #[test]
    fn unescapes_host_backslash_sequences() {
        let p = policy();
        let out = p.validate_expression(r#"\"hi\" \\n \'x\'"#).unwrap();
        assert_eq!(out.as_str(), "\"hi\" \\n 'x'");
    }

    #[test]
    fn forbidden_pattern_rejects_eval() {
        let p = policy();
        let err = p.validate_expression("eval($x)").unwrap_err();
        match err {
            SecurityError::ForbiddenPattern { reason, .. } => {
                assert_eq!(reason, "eval() code execution");
            }
            other => panic!("expected ForbiddenPattern, got {:?}", other),
        }
    }

    #[test]
    fn forbidden_pattern_detects_escaped_octal_null_byte() {
        let p = policy();
        let err = p.validate_expression(r"concat_path(\0)").unwrap_err();
        assert!(matches!(err, SecurityError::ForbiddenPattern { .. }));
    }

    #[test]
    fn function_in_expression_rejects_unknown_call() {
        let p = policy();
        let err = p.validate_expression("my_mystery_func($x)").unwrap_err();
        assert!(matches!(err, SecurityError::FunctionInExpression { .. }));
    }

    #[test]
    fn function_in_expression_allows_whitelisted_call() {
        let p = policy();
        let out = p.validate_expression("htmlspecialchars($name)").unwrap();
        assert_eq!(out.as_str(), "htmlspecialchars($name)");
    }

    #[test]
    fn skipped_constructs_are_not_treated_as_function_calls() {
        let p = policy();
        assert!(p.validate_expression("isset($x)").is_ok());
        assert!(p.validate_expression("empty($x)").is_ok());
    }

    #[test]
    fn dangerous_overlap_is_recorded() {
        let p = SecurityPolicy::new(&["file_exists".to_string()], &[], 0);
        assert_eq!(p.dangerous_overlap().0, vec!["file_exists".to_string()]);
    }

    #[test]
    fn no_overlap_when_extended_allow_list_is_safe() {
        let p = SecurityPolicy::new(&["my_helper".to_string()], &[], 0);
        assert!(p.dangerous_overlap().0.is_empty());
    }

    #[test]
    fn getenv_is_usable_once_explicitly_allowed() {
        let p = SecurityPolicy::new(&["getenv".to_string()], &[], 0);
        let out = p.validate_expression("getenv('FOO')").unwrap();
        assert_eq!(out.as_str(), "getenv('FOO')");
        assert_eq!(p.dangerous_overlap().0, vec!["getenv".to_string()]);
    }

    #[test]
    fn getenv_is_rejected_without_explicit_allow() {
        let p = policy();
        let err = p.validate_expression("getenv('FOO')").unwrap_err();
        assert!(matches!(err, SecurityError::FunctionInExpression { .. }));
    }
}
