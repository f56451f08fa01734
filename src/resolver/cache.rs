//! Durable lookup cache and the memoizing resolver adapter.
//!
//! The cache is a single JSON file inside a configurable directory, loaded
//! when opened and written back atomically (temp file + rename) when closed.
//! Entries are only ever added, so the file is safe to share across
//! sequential runs. Failed lookups are cached alongside successful ones:
//! once a name is known to be unresolvable, later runs never ask the
//! external service about it again.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use super::{IdentifierKind, Resolution, Resolve, ResolverError};

/// File name of the cache inside its directory.
const CACHE_FILE: &str = "resolver_cache.json";

/// Key separator; U+001F never occurs in chemical names or kind names.
const KEY_SEPARATOR: char = '\u{1f}';

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    /// Candidate identifiers, or `None` for a cached lookup failure.
    result: Option<Vec<String>>,
    resolved_at: DateTime<Utc>,
}

/// On-disk memoization store keyed by `(input, kind)`.
#[derive(Debug)]
pub struct ResolverCache {
    path: PathBuf,
    entries: HashMap<String, CacheEntry>,
    dirty: bool,
}

impl ResolverCache {
    /// Open (or create) the cache inside `dir`. The directory is created if
    /// it does not exist; a missing cache file yields an empty cache.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, ResolverError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(CACHE_FILE);

        let entries = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            HashMap::new()
        };

        debug!(
            "Opened resolver cache at {} ({} entries)",
            path.display(),
            entries.len()
        );

        Ok(Self {
            path,
            entries,
            dirty: false,
        })
    }

    fn key(input: &str, kind: IdentifierKind) -> String {
        format!("{}{}{}", kind.as_str(), KEY_SEPARATOR, input)
    }

    /// Cached outcome for `(input, kind)`. The outer `Option` distinguishes
    /// "never looked up" from a cached miss (`Some(None)`).
    pub fn get(&self, input: &str, kind: IdentifierKind) -> Option<Option<Resolution>> {
        self.entries
            .get(&Self::key(input, kind))
            .map(|entry| entry.result.clone().and_then(Resolution::new))
    }

    /// Record the outcome of an external lookup.
    pub fn insert(&mut self, input: &str, kind: IdentifierKind, result: Option<&Resolution>) {
        let entry = CacheEntry {
            result: result.map(|r| r.candidates().to_vec()),
            resolved_at: Utc::now(),
        };
        self.entries.insert(Self::key(input, kind), entry);
        self.dirty = true;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the cache back to disk if it has new entries. The file is
    /// replaced atomically so a crash mid-write cannot corrupt it.
    pub fn persist(&mut self) -> Result<(), ResolverError> {
        if !self.dirty {
            return Ok(());
        }
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let temp = NamedTempFile::new_in(parent)?;
        serde_json::to_writer_pretty(temp.as_file(), &self.entries)?;
        temp.persist(&self.path)
            .map_err(|e| ResolverError::Io(e.error))?;
        self.dirty = false;
        debug!(
            "Persisted resolver cache ({} entries) to {}",
            self.entries.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Persist and drop the cache. Scoped counterpart to [`ResolverCache::open`].
    pub fn close(mut self) -> Result<(), ResolverError> {
        self.persist()
    }
}

/// Memoizing adapter around any [`Resolve`] backend.
#[derive(Debug)]
pub struct CachedResolver<R> {
    inner: R,
    cache: ResolverCache,
    external_calls: usize,
}

impl<R: Resolve> CachedResolver<R> {
    pub fn new(inner: R, cache: ResolverCache) -> Self {
        Self {
            inner,
            cache,
            external_calls: 0,
        }
    }

    /// Number of lookups that reached the wrapped backend since
    /// construction. Zero after a run against a fully warmed cache.
    pub fn external_calls(&self) -> usize {
        self.external_calls
    }

    pub fn cache(&self) -> &ResolverCache {
        &self.cache
    }

    /// Persist the cache and release the adapter.
    pub fn close(self) -> Result<(), ResolverError> {
        self.cache.close()
    }
}

impl<R: Resolve> Resolve for CachedResolver<R> {
    fn resolve(
        &mut self,
        input: &str,
        kind: IdentifierKind,
    ) -> Result<Option<Resolution>, ResolverError> {
        if let Some(cached) = self.cache.get(input, kind) {
            return Ok(cached);
        }
        let result = self.inner.resolve(input, kind)?;
        self.external_calls += 1;
        self.cache.insert(input, kind, result.as_ref());
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Backend that serves from a fixed map and counts invocations.
    struct CountingResolver {
        answers: HashMap<(String, IdentifierKind), Resolution>,
        calls: usize,
    }

    impl CountingResolver {
        fn new() -> Self {
            let mut answers = HashMap::new();
            answers.insert(
                ("water".to_string(), IdentifierKind::Smiles),
                Resolution::single("O"),
            );
            answers.insert(
                ("water".to_string(), IdentifierKind::Cas),
                Resolution::new(vec!["7732-18-5".to_string(), "558440-22-5".to_string()])
                    .expect("non-empty"),
            );
            Self { answers, calls: 0 }
        }
    }

    impl Resolve for CountingResolver {
        fn resolve(
            &mut self,
            input: &str,
            kind: IdentifierKind,
        ) -> Result<Option<Resolution>, ResolverError> {
            self.calls += 1;
            Ok(self.answers.get(&(input.to_string(), kind)).cloned())
        }
    }

    #[test]
    fn test_cache_memoizes_hits_and_misses() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResolverCache::open(dir.path()).unwrap();
        let mut resolver = CachedResolver::new(CountingResolver::new(), cache);

        let smiles = resolver
            .resolve("water", IdentifierKind::Smiles)
            .unwrap()
            .unwrap();
        assert_eq!(smiles.first(), "O");

        // Unknown name: the failure is cached too.
        assert!(resolver
            .resolve("unobtainium", IdentifierKind::Smiles)
            .unwrap()
            .is_none());

        // Repeats never reach the backend.
        resolver.resolve("water", IdentifierKind::Smiles).unwrap();
        resolver
            .resolve("unobtainium", IdentifierKind::Smiles)
            .unwrap();
        assert_eq!(resolver.external_calls(), 2);
        assert_eq!(resolver.inner.calls, 2);
    }

    #[test]
    fn test_first_entry_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResolverCache::open(dir.path()).unwrap();
        let mut resolver = CachedResolver::new(CountingResolver::new(), cache);

        let cas = resolver
            .resolve("water", IdentifierKind::Cas)
            .unwrap()
            .unwrap();
        assert_eq!(cas.first(), "7732-18-5");
        assert_eq!(cas.candidates().len(), 2);
    }

    #[test]
    fn test_warmed_cache_issues_zero_external_calls() {
        let dir = tempfile::tempdir().unwrap();

        let cache = ResolverCache::open(dir.path()).unwrap();
        let mut resolver = CachedResolver::new(CountingResolver::new(), cache);
        resolver.resolve("water", IdentifierKind::Smiles).unwrap();
        resolver
            .resolve("unobtainium", IdentifierKind::Cas)
            .unwrap();
        resolver.close().unwrap();

        // Second run against the same directory.
        let cache = ResolverCache::open(dir.path()).unwrap();
        assert_eq!(cache.len(), 2);
        let mut resolver = CachedResolver::new(CountingResolver::new(), cache);
        let smiles = resolver
            .resolve("water", IdentifierKind::Smiles)
            .unwrap()
            .unwrap();
        assert_eq!(smiles.first(), "O");
        assert!(resolver
            .resolve("unobtainium", IdentifierKind::Cas)
            .unwrap()
            .is_none());
        assert_eq!(resolver.external_calls(), 0);
    }

    #[test]
    fn test_distinct_kinds_are_distinct_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = ResolverCache::open(dir.path()).unwrap();
        cache.insert(
            "water",
            IdentifierKind::Smiles,
            Some(&Resolution::single("O")),
        );
        assert!(cache.get("water", IdentifierKind::Cas).is_none());
        assert!(cache.get("water", IdentifierKind::Smiles).is_some());
    }
}
