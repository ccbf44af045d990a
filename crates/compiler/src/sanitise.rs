//! Name sanitisation for `Template` and `SetVar` tokens.
//!
//! Neither function can fail — sanitisation strips, it never rejects.

/// Strip every character outside `[A-Za-z0-9_\- ]` from a template name.
pub fn sanitise_template_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ' '))
        .collect()
}

/// Strip every character outside `[A-Za-z0-9_]` from a setvar name.
pub fn sanitise_setvar_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}
