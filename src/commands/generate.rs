//! Generate static files

use anyhow::Result;
use notify::Watcher;
use std::path::Path;
use std::sync::mpsc::channel;
use std::time::Duration;

use crate::cache::{self, CacheDb, ChangeSet};
use crate::content::loader::ContentLoader;
use crate::content::{Document, StandalonePage};
use crate::error::BuildError;
use crate::generator::Generator;
use crate::resolver;
use crate::Guidebook;

/// Generate the static site (with incremental support)
pub fn run(site: &Guidebook) -> Result<()> {
    run_with_options(site, false)
}

/// Generate with force option
pub fn run_with_options(site: &Guidebook, force: bool) -> Result<()> {
    let start = std::time::Instant::now();

    // Load content
    let loader = ContentLoader::new(site);
    let mut report = loader.load_guides()?;
    let standalone = loader.load_pages()?;

    if !report.failures.is_empty() {
        if site.config.strict {
            let first = report.failures.remove(0);
            return Err(anyhow::Error::new(first).context(format!(
                "{} document(s) failed to load, aborting (strict mode)",
                report.failures.len() + 1
            )));
        }
        tracing::warn!(
            "{} document(s) failed to load and were excluded from the output",
            report.failures.len()
        );
    }

    tracing::info!(
        "Loaded {} guides and {} pages",
        report.documents.len(),
        standalone.len()
    );

    // A route collision is always fatal
    let pages = resolver::resolve(report.documents).map_err(BuildError::from)?;

    // Load cache and compute current hashes
    let cache = CacheDb::load(&site.base_dir);
    let config_hash = config_hash(site)?;

    let current_docs: Vec<_> = pages
        .iter()
        .map(|p| {
            (
                p.document.source.clone(),
                document_hash(&p.document),
                p.route.clone(),
            )
        })
        .collect();

    let current_pages: Vec<_> = standalone
        .iter()
        .map(|p| (p.source.clone(), page_hash(p), p.path.clone()))
        .collect();

    // Detect changes
    let changeset = if force || cache.document_count == 0 {
        tracing::info!(
            "Full generation (force={}, cache_empty={})",
            force,
            cache.document_count == 0
        );
        ChangeSet::full_rebuild()
    } else {
        cache::detect_changes(&cache, config_hash, &current_docs, &current_pages)
    };

    let generator = Generator::new(site)?;

    if !changeset.has_changes() {
        tracing::info!(
            "No changes detected, skipping generation ({:.2}s)",
            start.elapsed().as_secs_f64()
        );
        return Ok(());
    }

    tracing::info!("Changes detected: {}", changeset.summary());

    if changeset.full_rebuild {
        generator.generate(&pages, &standalone)?;
    } else {
        generator.generate_incremental(&pages, &standalone, &changeset)?;
    }

    // Update cache
    let new_cache = CacheDb::from_build(config_hash, &current_docs, &current_pages);
    new_cache.save(&site.base_dir)?;

    tracing::info!("Generated in {:.2}s", start.elapsed().as_secs_f64());

    Ok(())
}

/// Watch for file changes and regenerate
pub async fn watch(site: &Guidebook) -> Result<()> {
    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    watcher.watch(site.source_dir.as_ref(), notify::RecursiveMode::Recursive)?;

    let config_path = site.base_dir.join("_config.yml");
    if config_path.exists() {
        watcher.watch(
            Path::new(&config_path),
            notify::RecursiveMode::NonRecursive,
        )?;
    }

    tracing::info!("Watching for changes (incremental mode). Press Ctrl+C to stop.");

    // Debounce events
    let mut last_rebuild = std::time::Instant::now();

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(_event) => {
                if last_rebuild.elapsed() > Duration::from_millis(500) {
                    tracing::info!("File changed, regenerating...");
                    if let Err(e) = run(site) {
                        tracing::error!("Generation failed: {}", e);
                    }
                    last_rebuild = std::time::Instant::now();
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {
                // Continue waiting
            }
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                break;
            }
        }
    }

    Ok(())
}

/// Hash the configuration as it affects every rendered page
fn config_hash(site: &Guidebook) -> Result<u64> {
    let serialized = serde_yaml::to_string(&site.config)?;
    Ok(cache::hash_content(&serialized))
}

/// Hash everything that affects a guide's rendered output
fn document_hash(doc: &Document) -> u64 {
    cache::hash_content(&format!(
        "{}\n{}\n{}\n{}",
        doc.title, doc.date, doc.order, doc.raw
    ))
}

/// Hash everything that affects a standalone page's rendered output
fn page_hash(page: &StandalonePage) -> u64 {
    cache::hash_content(&format!("{}\n{}", page.title, page.raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn scaffold(files: &[(&str, &str)]) -> (TempDir, Guidebook) {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            let path = dir.path().join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        let site = Guidebook::new(dir.path()).unwrap();
        (dir, site)
    }

    #[test]
    fn test_full_build_writes_pages_and_cache() {
        let (dir, site) = scaffold(&[(
            "source/_guides/one.md",
            "---\ntitle: One\ndate: 2024-01-01\norder: 1\n---\nFirst.\n",
        )]);

        run(&site).unwrap();

        assert!(site.public_dir.join("one/index.html").exists());
        assert!(dir.path().join(".guidebook-cache/db.json").exists());
    }

    #[test]
    fn test_second_build_is_a_no_op() {
        let (_dir, site) = scaffold(&[(
            "source/_guides/one.md",
            "---\ntitle: One\ndate: 2024-01-01\norder: 1\n---\nFirst.\n",
        )]);

        run(&site).unwrap();
        let index = site.public_dir.join("one/index.html");
        let first_mtime = fs::metadata(&index).unwrap().modified().unwrap();

        run(&site).unwrap();
        let second_mtime = fs::metadata(&index).unwrap().modified().unwrap();
        assert_eq!(first_mtime, second_mtime);
    }

    #[test]
    fn test_strict_mode_aborts_on_malformed_document() {
        let (_dir, site) = scaffold(&[
            ("_config.yml", "title: Strict Site\nstrict: true\n"),
            (
                "source/_guides/bad.md",
                "---\ntitle: Bad\norder: 1\n---\nNo date.\n",
            ),
        ]);

        let err = run(&site).unwrap_err();
        assert!(err.to_string().contains("strict"));
    }

    #[test]
    fn test_duplicate_route_aborts() {
        let (_dir, site) = scaffold(&[
            (
                "source/_guides/a_guide.md",
                "---\ntitle: A\ndate: 2024-01-01\norder: 1\n---\nx\n",
            ),
            (
                "source/_guides/A_Guide.md",
                "---\ntitle: B\ndate: 2024-01-02\norder: 2\n---\ny\n",
            ),
        ]);

        let result = run(&site);
        // Case-insensitive filesystems collapse the two sources into one
        // file; the collision only exists where both survive.
        if site.source_dir.join("_guides").read_dir().unwrap().count() == 2 {
            let err = result.unwrap_err();
            assert!(err.to_string().contains("duplicate route"));
        }
    }
}
