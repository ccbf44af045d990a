//! Cache key construction.

use sha2::{Digest, Sha256};

const HASH_PREFIX_LEN: usize = 16;
const MAX_TITLE_LEN: usize = 64;

/// Identifies one cache entry: a set (template set, `0` when unset), a
/// sanitised title, and a truncated content hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub set_id: u64,
    pub title: String,
    pub hash: String,
}

impl CacheKey {
    pub fn new(title: &str, hash: &str, set_id: Option<u64>) -> Self {
        CacheKey {
            set_id: set_id.unwrap_or(0),
            title: sanitise_title(title),
            hash: truncate_hash(hash),
        }
    }

    /// The `{set}_{title}_{hash}` stem shared by the memory key and the
    /// on-disk file name.
    pub fn stem(&self) -> String {
        format!("{}_{}_{}", self.set_id, self.title, self.hash)
    }
}

/// Replace every character outside `[A-Za-z0-9_]` with `_`, collapse runs of
/// `_`, trim leading/trailing `_`, and cap at 64 bytes.
pub fn sanitise_title(title: &str) -> String {
    let mut replaced = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            replaced.push(c);
        } else {
            replaced.push('_');
        }
    }

    let mut collapsed = String::with_capacity(replaced.len());
    let mut last_was_underscore = false;
    for c in replaced.chars() {
        if c == '_' {
            if !last_was_underscore {
                collapsed.push('_');
            }
            last_was_underscore = true;
        } else {
            collapsed.push(c);
            last_was_underscore = false;
        }
    }

    collapsed
        .trim_matches('_')
        .chars()
        .take(MAX_TITLE_LEN)
        .collect()
}

/// First 16 hex characters of a content digest. Accepts a digest already
/// shorter than 16 characters unchanged.
pub fn truncate_hash(hash: &str) -> String {
    hash.chars().take(HASH_PREFIX_LEN).collect()
}

/// SHA-256 digest of `raw`, hex-encoded and truncated to 16 characters.
/// The Runtime uses this to derive the hash half of a [`CacheKey`] from raw
/// template text.
pub fn hash_content(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    let digest = hasher.finalize();
    truncate_hash(&hex::encode(digest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitise_collapses_and_trims() {
        assert_eq!(sanitise_title("Header -- Bar!!"), "Header_Bar");
    }

    #[test]
    fn sanitise_caps_length() {
        let long = "a".repeat(100);
        assert_eq!(sanitise_title(&long).len(), MAX_TITLE_LEN);
    }

    #[test]
    fn sanitise_keeps_word_characters() {
        assert_eq!(sanitise_title("header_bar1"), "header_bar1");
    }

    #[test]
    fn hash_content_is_stable_and_truncated() {
        let a = hash_content("hello world");
        let b = hash_content("hello world");
        assert_eq!(a, b);
        assert_eq!(a.len(), HASH_PREFIX_LEN);
    }

    #[test]
    fn hash_content_differs_on_different_input() {
        assert_ne!(hash_content("a"), hash_content("b"));
    }

    #[test]
    fn cache_key_stem_has_three_parts() {
        let key = CacheKey::new("My Header!", "abcdef0123456789extra", Some(3));
        assert_eq!(key.stem(), "3_My_Header_abcdef0123456789");
    }

    #[test]
    fn cache_key_defaults_set_id_to_zero() {
        let key = CacheKey::new("x", "hash", None);
        assert_eq!(key.set_id, 0);
    }
}
