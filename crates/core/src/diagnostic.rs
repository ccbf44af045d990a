//! The record emitted to the host's diagnostic stream in debug mode.

/// `{kind, position, template_name, excerpt}`. `kind` is the `Display`
/// rendering of whichever error enum raised the diagnostic
/// (`SecurityError`, `ParseError`, `CompileError`) — Runtime is the only
/// crate that sees all three, so it flattens them to a string
/// here rather than this crate depending on all three error types.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: String,
    pub position: Option<usize>,
    pub template_name: String,
    pub excerpt: Option<String>,
}

impl Diagnostic {
    pub fn new(kind: impl Into<String>, template_name: impl Into<String>) -> Self {
        Diagnostic {
            kind: kind.into(),
            position: None,
            template_name: template_name.into(),
            excerpt: None,
        }
    }

    pub fn with_position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} in template '{}'", self.kind, self.template_name)?;
        if let Some(pos) = self.position {
            write!(f, " at byte {}", pos)?;
        }
        if let Some(excerpt) = &self.excerpt {
            write!(f, ": {}", excerpt)?;
        }
        Ok(())
    }
}
