//! Cache module for incremental generation
//!
//! Tracks per-source content hashes between builds so an unchanged site
//! skips regeneration entirely and a small edit only re-renders the pages
//! it touched.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::Path;

/// Cache file name
const CACHE_FILE: &str = ".guidebook-cache/db.json";

/// Represents a cached entry for a source file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Content hash of the source file
    pub content_hash: u64,
    /// Route the file was published under
    pub route: String,
}

/// Cache database for tracking file changes
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CacheDb {
    /// Version of the cache format
    pub version: u32,
    /// Hash of the site config (changes trigger a full rebuild)
    pub config_hash: u64,
    /// Cached entries for guide documents, keyed by source path
    pub documents: HashMap<String, CacheEntry>,
    /// Cached entries for standalone pages, keyed by source path
    pub pages: HashMap<String, CacheEntry>,
    /// Total document count (for detecting additions/deletions)
    pub document_count: usize,
}

impl CacheDb {
    /// Current cache format version
    const VERSION: u32 = 1;

    /// Load cache from disk, or create a new empty cache
    pub fn load(base_dir: &Path) -> Self {
        let cache_path = base_dir.join(CACHE_FILE);
        if let Ok(content) = fs::read_to_string(&cache_path) {
            if let Ok(cache) = serde_json::from_str::<CacheDb>(&content) {
                if cache.version == Self::VERSION {
                    return cache;
                }
                tracing::info!("Cache version mismatch, rebuilding cache");
            }
        }
        Self::default()
    }

    /// Save cache to disk
    pub fn save(&self, base_dir: &Path) -> Result<()> {
        let cache_dir = base_dir.join(".guidebook-cache");
        fs::create_dir_all(&cache_dir)?;

        let cache_path = base_dir.join(CACHE_FILE);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(cache_path, content)?;
        Ok(())
    }

    /// Build a fresh cache from the current build state
    pub fn from_build(
        config_hash: u64,
        documents: &[(String, u64, String)],
        pages: &[(String, u64, String)],
    ) -> Self {
        let to_entries = |items: &[(String, u64, String)]| {
            items
                .iter()
                .map(|(source, hash, route)| {
                    (
                        source.clone(),
                        CacheEntry {
                            content_hash: *hash,
                            route: route.clone(),
                        },
                    )
                })
                .collect::<HashMap<_, _>>()
        };

        Self {
            version: Self::VERSION,
            config_hash,
            documents: to_entries(documents),
            pages: to_entries(pages),
            document_count: documents.len(),
        }
    }
}

/// The set of sources that need regeneration
#[derive(Debug, Default)]
pub struct ChangeSet {
    pub full_rebuild: bool,
    pub changed: HashSet<String>,
    pub removed: HashSet<String>,
}

impl ChangeSet {
    /// A changeset that regenerates everything
    pub fn full_rebuild() -> Self {
        Self {
            full_rebuild: true,
            ..Self::default()
        }
    }

    /// Whether any work is needed at all
    pub fn has_changes(&self) -> bool {
        self.full_rebuild || !self.changed.is_empty() || !self.removed.is_empty()
    }

    /// Whether the given source needs regeneration
    pub fn contains(&self, source: &str) -> bool {
        self.full_rebuild || self.changed.contains(source)
    }

    /// Human-readable summary for logging
    pub fn summary(&self) -> String {
        if self.full_rebuild {
            "full rebuild".to_string()
        } else {
            format!(
                "{} changed, {} removed",
                self.changed.len(),
                self.removed.len()
            )
        }
    }
}

/// Hash source content
pub fn hash_content(content: &str) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    content.hash(&mut hasher);
    hasher.finish()
}

/// Compare the cached state against the current sources
///
/// A config change or a document addition/removal falls back to a full
/// rebuild; otherwise only hash-changed sources land in the changeset.
pub fn detect_changes(
    cache: &CacheDb,
    config_hash: u64,
    documents: &[(String, u64, String)],
    pages: &[(String, u64, String)],
) -> ChangeSet {
    if cache.config_hash != config_hash {
        tracing::info!("Config changed, full rebuild");
        return ChangeSet::full_rebuild();
    }

    if cache.document_count != documents.len() {
        tracing::info!(
            "Document count changed ({} -> {}), full rebuild",
            cache.document_count,
            documents.len()
        );
        return ChangeSet::full_rebuild();
    }

    let mut changeset = ChangeSet::default();

    for (source, hash, _route) in documents {
        match cache.documents.get(source) {
            Some(entry) if entry.content_hash == *hash => {}
            _ => {
                changeset.changed.insert(source.clone());
            }
        }
    }

    for (source, hash, _route) in pages {
        match cache.pages.get(source) {
            Some(entry) if entry.content_hash == *hash => {}
            _ => {
                changeset.changed.insert(source.clone());
            }
        }
    }

    for source in cache.pages.keys() {
        if !pages.iter().any(|(s, _, _)| s == source) {
            changeset.removed.insert(source.clone());
        }
    }

    changeset
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn doc(source: &str, content: &str) -> (String, u64, String) {
        (
            source.to_string(),
            hash_content(content),
            format!("{}/", source.trim_end_matches(".md")),
        )
    }

    #[test]
    fn test_unchanged_build_has_no_changes() {
        let docs = vec![doc("_guides/a.md", "alpha"), doc("_guides/b.md", "beta")];
        let cache = CacheDb::from_build(42, &docs, &[]);

        let changeset = detect_changes(&cache, 42, &docs, &[]);
        assert!(!changeset.has_changes());
    }

    #[test]
    fn test_edited_document_is_detected() {
        let before = vec![doc("_guides/a.md", "alpha"), doc("_guides/b.md", "beta")];
        let cache = CacheDb::from_build(42, &before, &[]);

        let after = vec![doc("_guides/a.md", "alpha edited"), doc("_guides/b.md", "beta")];
        let changeset = detect_changes(&cache, 42, &after, &[]);

        assert!(!changeset.full_rebuild);
        assert!(changeset.contains("_guides/a.md"));
        assert!(!changeset.contains("_guides/b.md"));
    }

    #[test]
    fn test_config_change_forces_full_rebuild() {
        let docs = vec![doc("_guides/a.md", "alpha")];
        let cache = CacheDb::from_build(42, &docs, &[]);

        let changeset = detect_changes(&cache, 43, &docs, &[]);
        assert!(changeset.full_rebuild);
    }

    #[test]
    fn test_added_document_forces_full_rebuild() {
        let before = vec![doc("_guides/a.md", "alpha")];
        let cache = CacheDb::from_build(42, &before, &[]);

        let after = vec![doc("_guides/a.md", "alpha"), doc("_guides/b.md", "beta")];
        let changeset = detect_changes(&cache, 42, &after, &[]);
        assert!(changeset.full_rebuild);
    }

    #[test]
    fn test_cache_round_trip() {
        let dir = TempDir::new().unwrap();
        let docs = vec![doc("_guides/a.md", "alpha")];
        let cache = CacheDb::from_build(42, &docs, &[]);
        cache.save(dir.path()).unwrap();

        let loaded = CacheDb::load(dir.path());
        assert_eq!(loaded.config_hash, 42);
        assert_eq!(loaded.document_count, 1);
        assert!(loaded.documents.contains_key("_guides/a.md"));
    }

    #[test]
    fn test_stale_cache_is_discarded() {
        let dir = TempDir::new().unwrap();
        let mut cache = CacheDb::from_build(42, &[], &[]);
        cache.version = 999;
        cache.save(dir.path()).unwrap();

        let loaded = CacheDb::load(dir.path());
        assert_eq!(loaded.version, 0);
        assert_eq!(loaded.config_hash, 0);
    }
}
