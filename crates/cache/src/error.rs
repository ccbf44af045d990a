//! Errors surfaced by the cache's disk tier.
//!
//! The memory tier never fails; only filesystem operations can.

#[derive(Debug)]
pub enum CacheError {
    Io { path: std::path::PathBuf, source: std::io::Error },
}

impl std::fmt::Display for CacheError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheError::Io { path, source } => {
                write!(f, "cache I/O error at {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for CacheError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CacheError::Io { source, .. } => Some(source),
        }
    }
}
