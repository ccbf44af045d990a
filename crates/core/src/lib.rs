//! Cortex Core: shared primitives for the Cortex template-conditionals engine
//!
//! This crate provides the types that every pipeline stage (parser,
//! compiler, cache, runtime) needs but none of them own:
//!
//! - `token`: the `Token` / `TokenKind` model produced by the parser and
//!   consumed by the compiler.
//! - `settings`: the host-supplied configuration map and its typed view.
//! - `diagnostic`: the `{ErrorKind, position, template_name, excerpt}` record
//!   emitted to the host's diagnostic stream in debug mode.

pub mod diagnostic;
pub mod settings;
pub mod token;

pub use diagnostic::Diagnostic;
pub use settings::{Settings, SettingsValue};
pub use token::{Token, TokenKind};
