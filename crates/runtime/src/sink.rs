//! `DiagnosticSink`: where the debug-mode diagnostic stream goes.

use cortex_core::Diagnostic;

/// A destination for render-time diagnostics. Only consulted when
/// `Settings::debug` is set.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: Diagnostic);
}

/// Default sink: forwards to `tracing::warn!` rather than stdout.
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        tracing::warn!(%diagnostic, "cortex render diagnostic");
    }
}
