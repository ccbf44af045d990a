//! Cortex Cache: content-addressed memory + disk cache for compiled
//! template output.
//!
//! Atomicity on the disk tier comes entirely from write-temp-then-rename on
//! the same filesystem; no advisory locks are taken. Readers see either the
//! pre-rename absence of a file or the fully-written post-rename file, never
//! a partial write.

mod error;
mod key;

pub use error::CacheError;
pub use key::{hash_content, sanitise_title, truncate_hash, CacheKey};

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

const EXTENSION: &str = "cache";

/// Two-tier cache: an in-process memory map backed by an optional disk
/// directory.
///
/// `is_writable` is probed once at construction rather than per call, so a
/// directory that becomes unwritable mid-process is not re-detected until
/// the next `Cache` is built.
pub struct Cache {
    memory: Mutex<HashMap<String, std::sync::Arc<str>>>,
    dir: Option<PathBuf>,
    writable: bool,
    ttl: Duration,
}

impl Cache {
    /// Build a cache rooted at `dir`. `ttl == Duration::ZERO` disables
    /// expiry on the disk tier. Pass `dir = None` for a memory-only cache.
    pub fn new(dir: Option<PathBuf>, ttl: Duration) -> Self {
        let writable = match &dir {
            Some(path) => fs::create_dir_all(path).is_ok() && is_dir_writable(path),
            None => false,
        };
        Cache {
            memory: Mutex::new(HashMap::new()),
            dir,
            writable,
            ttl,
        }
    }

    /// Look up a compiled output. Checks memory first, then disk (subject to
    /// TTL); a disk hit populates memory.
    pub fn get(&self, title: &str, hash: &str, set_id: Option<u64>) -> Option<std::sync::Arc<str>> {
        let key = CacheKey::new(title, hash, set_id);
        let stem = key.stem();

        if let Some(hit) = self.memory.lock().expect("cache mutex poisoned").get(&stem) {
            return Some(hit.clone());
        }

        let path = self.path_for(&stem)?;
        let metadata = fs::metadata(&path).ok()?;

        if !self.ttl.is_zero() {
            let age = SystemTime::now()
                .duration_since(metadata.modified().ok()?)
                .unwrap_or(Duration::ZERO);
            if age > self.ttl {
                let _ = fs::remove_file(&path);
                return None;
            }
        }

        let contents = fs::read_to_string(&path).ok()?;
        let shared: std::sync::Arc<str> = contents.into();
        self.memory
            .lock()
            .expect("cache mutex poisoned")
            .insert(stem, shared.clone());
        Some(shared)
    }

    /// Store a compiled output. Always populates memory. Returns `false`
    /// without error when the disk tier is unavailable or the write fails;
    /// never panics or propagates an I/O error to the caller.
    pub fn set(&self, title: &str, hash: &str, output: &str, set_id: Option<u64>) -> bool {
        let key = CacheKey::new(title, hash, set_id);
        let stem = key.stem();
        let shared: std::sync::Arc<str> = output.into();
        self.memory
            .lock()
            .expect("cache mutex poisoned")
            .insert(stem.clone(), shared);

        if !self.writable {
            return false;
        }
        let Some(dir) = &self.dir else { return false };

        match write_to_disk(dir, &stem, output) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(%err, "cache disk write failed");
                false
            }
        }
    }

    /// Remove every entry (memory and disk) for `title`, across every set
    /// and hash. Returns the number of entries removed.
    pub fn invalidate(&self, title: &str) -> usize {
        let sanitised = sanitise_title(title);
        let needle = format!("_{sanitised}_");
        let mut removed = 0usize;

        {
            let mut memory = self.memory.lock().expect("cache mutex poisoned");
            let before = memory.len();
            memory.retain(|stem, _| !stem.contains(&needle));
            removed += before - memory.len();
        }

        if let Some(dir) = &self.dir {
            if let Ok(entries) = fs::read_dir(dir) {
                for entry in entries.flatten() {
                    let name = entry.file_name();
                    let name = name.to_string_lossy();
                    if name.contains(&needle) && name.ends_with(&format!(".{EXTENSION}")) {
                        if fs::remove_file(entry.path()).is_ok() {
                            removed += 1;
                        }
                    }
                }
            }
        }

        removed
    }

    /// Drop every entry, memory and disk. Returns the number removed.
    pub fn clear(&self) -> usize {
        let mut removed = {
            let mut memory = self.memory.lock().expect("cache mutex poisoned");
            let count = memory.len();
            memory.clear();
            count
        };

        if let Some(dir) = &self.dir {
            if let Ok(entries) = fs::read_dir(dir) {
                for entry in entries.flatten() {
                    let name = entry.file_name();
                    if name.to_string_lossy().ends_with(&format!(".{EXTENSION}"))
                        && fs::remove_file(entry.path()).is_ok()
                    {
                        removed += 1;
                    }
                }
            }
        }

        removed
    }

    /// Whether the disk tier was writable at construction time.
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// Number of entries currently held in the memory tier.
    pub fn count(&self) -> usize {
        self.memory.lock().expect("cache mutex poisoned").len()
    }

    fn path_for(&self, stem: &str) -> Option<PathBuf> {
        self.dir.as_ref().map(|dir| dir.join(format!("{stem}.{EXTENSION}")))
    }
}

/// Write-temp-then-rename into `dir`. Every failure is wrapped in a
/// `CacheError` carrying the path it happened at, for the caller to log.
fn write_to_disk(dir: &Path, stem: &str, output: &str) -> Result<(), CacheError> {
    let final_path = dir.join(format!("{stem}.{EXTENSION}"));

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|source| CacheError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    std::io::Write::write_all(&mut tmp, output.as_bytes()).map_err(|source| CacheError::Io {
        path: tmp.path().to_path_buf(),
        source,
    })?;

    tmp.persist(&final_path)
        .map(|_| ())
        .map_err(|err| CacheError::Io {
            path: final_path,
            source: err.error,
        })
}

fn is_dir_writable(dir: &Path) -> bool {
    match tempfile::NamedTempFile::new_in(dir) {
        Ok(tmp) => {
            let _ = tmp.close();
            true
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_only_cache_round_trips() {
        let cache = Cache::new(None, Duration::ZERO);
        assert!(!cache.set("Header", "deadbeef", "compiled", None));
        assert_eq!(cache.get("Header", "deadbeef", None).as_deref(), Some("compiled"));
    }

    #[test]
    fn disk_backed_cache_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Cache::new(Some(dir.path().to_path_buf()), Duration::ZERO);
        assert!(cache.is_writable());
        assert!(cache.set("Header", "deadbeef", "compiled", None));

        let fresh = Cache::new(Some(dir.path().to_path_buf()), Duration::ZERO);
        assert_eq!(fresh.get("Header", "deadbeef", None).as_deref(), Some("compiled"));
    }

    #[test]
    fn disk_hit_populates_memory() {
        let dir = tempfile::tempdir().unwrap();
        let writer = Cache::new(Some(dir.path().to_path_buf()), Duration::ZERO);
        writer.set("Header", "deadbeef", "compiled", None);

        let reader = Cache::new(Some(dir.path().to_path_buf()), Duration::ZERO);
        assert_eq!(reader.count(), 0);
        reader.get("Header", "deadbeef", None);
        assert_eq!(reader.count(), 1);
    }

    #[test]
    fn ttl_zero_never_expires() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Cache::new(Some(dir.path().to_path_buf()), Duration::ZERO);
        cache.set("Header", "deadbeef", "compiled", None);
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.get("Header", "deadbeef", None).is_some());
    }

    #[test]
    fn expired_entry_is_evicted_on_read() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Cache::new(Some(dir.path().to_path_buf()), Duration::from_millis(1));
        cache.set("Header", "deadbeef", "compiled", None);
        std::thread::sleep(Duration::from_millis(20));

        let fresh = Cache::new(Some(dir.path().to_path_buf()), Duration::from_millis(1));
        assert!(fresh.get("Header", "deadbeef", None).is_none());
    }

    #[test]
    fn invalidate_removes_all_sets_and_hashes_for_title() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Cache::new(Some(dir.path().to_path_buf()), Duration::ZERO);
        cache.set("Header", "aaaa", "v1", None);
        cache.set("Header", "bbbb", "v2", Some(7));
        cache.set("Footer", "cccc", "v3", None);

        let removed = cache.invalidate("Header");
        assert_eq!(removed, 4); // 2 memory + 2 disk
        assert!(cache.get("Header", "aaaa", None).is_none());
        assert!(cache.get("Footer", "cccc", None).is_some());
    }

    #[test]
    fn invalidate_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Cache::new(Some(dir.path().to_path_buf()), Duration::ZERO);
        cache.set("Header", "aaaa", "v1", None);
        cache.invalidate("Header");
        assert_eq!(cache.invalidate("Header"), 0);
    }

    #[test]
    fn clear_empties_memory_and_disk() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Cache::new(Some(dir.path().to_path_buf()), Duration::ZERO);
        cache.set("Header", "aaaa", "v1", None);
        cache.set("Footer", "bbbb", "v2", None);

        let removed = cache.clear();
        assert_eq!(removed, 4);
        assert_eq!(cache.count(), 0);
        assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[test]
    fn unwritable_directory_reports_not_writable_and_set_returns_false() {
        // A path whose parent component is a regular file can never be
        // created as a directory, regardless of process privileges.
        let base = tempfile::tempdir().unwrap();
        let blocker = base.path().join("blocker");
        fs::write(&blocker, b"not a directory").unwrap();
        let bogus_dir = blocker.join("child");

        let cache = Cache::new(Some(bogus_dir), Duration::ZERO);
        assert!(!cache.is_writable());
        assert!(!cache.set("Header", "aaaa", "v1", None));
        assert_eq!(cache.get("Header", "aaaa", None).as_deref(), Some("v1"));
    }

    #[test]
    fn set_surfaces_a_cache_error_when_the_directory_disappears_after_construction() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Cache::new(Some(dir.path().to_path_buf()), Duration::ZERO);
        assert!(cache.is_writable());

        fs::remove_dir_all(dir.path()).unwrap();

        let err = write_to_disk(dir.path(), "Header_aaaa", "v1").unwrap_err();
        assert!(matches!(err, CacheError::Io { .. }));
        assert!(err.to_string().contains("cache I/O error"));

        // The public surface still degrades to a clean `false`, memory-only.
        assert!(!cache.set("Header", "aaaa", "v1", None));
        assert_eq!(cache.get("Header", "aaaa", None).as_deref(), Some("v1"));
    }
}
