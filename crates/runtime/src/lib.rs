//! Cortex Runtime: per-render orchestration over Parser, Compiler, Cache,
//! and SecurityPolicy.
//!
//! Owns construction of the four pipeline components from host-supplied
//! `Settings` and exposes the host-facing surface: `render`, `invalidate`,
//! `clear`.

mod sink;

pub use sink::{DiagnosticSink, TracingSink};

use cortex_cache::Cache;
use cortex_core::{Diagnostic, Settings, SettingsValue};
use cortex_security::SecurityPolicy;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// The host collaborator that resolves a template name to its raw source,
/// modeled as a trait object rather than a process-wide singleton.
pub trait TemplateLookup {
    fn lookup(&self, name: &str) -> Option<String>;
}

/// Per-render orchestrator. `Arc<Runtime>` is safe to invoke concurrently:
/// `SecurityPolicy` is immutable after construction and the Cache's memory
/// tier serializes itself behind a mutex.
pub struct Runtime {
    settings: Settings,
    policy: Arc<SecurityPolicy>,
    cache: Cache,
    sink: Box<dyn DiagnosticSink>,
}

impl Runtime {
    /// Build a Runtime from a host settings map and an optional cache
    /// directory. `cache_dir = None` runs a memory-only cache regardless of
    /// `Settings::cache_enabled`.
    pub fn new(settings_map: &HashMap<String, SettingsValue>, cache_dir: Option<PathBuf>) -> Self {
        Self::with_sink(settings_map, cache_dir, Box::new(TracingSink))
    }

    /// As [`Runtime::new`], with an explicit `DiagnosticSink` in place of
    /// the default `tracing` forwarder.
    pub fn with_sink(
        settings_map: &HashMap<String, SettingsValue>,
        cache_dir: Option<PathBuf>,
        sink: Box<dyn DiagnosticSink>,
    ) -> Self {
        let settings = Settings::from_map(settings_map);
        let policy = Arc::new(SecurityPolicy::new(
            &settings.additional_allowed_functions,
            &settings.denied_functions,
            settings.max_expression_length,
        ));
        let cache = Cache::new(cache_dir, Duration::from_secs(settings.cache_ttl));

        Runtime {
            settings,
            policy,
            cache,
            sink,
        }
    }

    /// Render one template. Never fails: parse/compile failures degrade to
    /// the raw template text, optionally logged to the `DiagnosticSink`.
    pub fn render(&self, title: &str, raw_template: &str, set_id: Option<u64>) -> String {
        if !self.settings.enabled {
            return raw_template.to_string();
        }

        let hash = cortex_cache::hash_content(raw_template);

        if self.settings.cache_enabled {
            if let Some(hit) = self.cache.get(title, &hash, set_id) {
                return hit.to_string();
            }
        }

        let tokens = match cortex_parser::parse(raw_template, title, self.settings.max_nesting_depth) {
            Ok(tokens) => tokens,
            Err(err) => {
                self.report(title, "ParseError", Some(err.position()), &err.to_string());
                return raw_template.to_string();
            }
        };

        let output = match cortex_compiler::compile(&tokens, &self.policy) {
            Ok(output) => output,
            Err(err) => {
                self.report(title, "CompileError", Some(err.position()), &err.to_string());
                return raw_template.to_string();
            }
        };

        if self.settings.cache_enabled {
            self.cache.set(title, &hash, &output, set_id);
        }

        output
    }

    /// Remove every cached entry for `title`. Idempotent: a second call with
    /// nothing left to remove returns 0.
    pub fn invalidate(&self, title: &str) -> usize {
        self.cache.invalidate(title)
    }

    /// Drop every cached entry, memory and disk.
    pub fn clear(&self) -> usize {
        self.cache.clear()
    }

    /// The merged configuration this Runtime was built with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn report(&self, title: &str, kind: &str, position: Option<usize>, excerpt: &str) {
        if !self.settings.debug {
            return;
        }
        let mut diagnostic = Diagnostic::new(kind, title).with_excerpt(excerpt);
        if let Some(position) = position {
            diagnostic = diagnostic.with_position(position);
        }
        self.sink.emit(diagnostic);
    }
}
