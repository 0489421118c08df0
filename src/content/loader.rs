//! Content loader - loads guides and standalone pages from the source directory

use anyhow::Result;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::{Document, FrontMatter, MarkdownRenderer, PageMatter, StandalonePage};
use crate::error::{BuildError, MalformedMetadataError};
use crate::Guidebook;

/// Outcome of loading the guide directory
///
/// Failures are kept alongside the documents that did load: the caller
/// decides whether they abort the build (strict mode) or are reported and
/// the offending documents excluded.
pub struct LoadReport {
    pub documents: Vec<Document>,
    pub failures: Vec<BuildError>,
}

/// Loads content from the source directory
pub struct ContentLoader<'a> {
    site: &'a Guidebook,
    renderer: MarkdownRenderer,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(site: &'a Guidebook) -> Self {
        let renderer = MarkdownRenderer::with_options(&site.config.highlight);
        Self { site, renderer }
    }

    /// Load all guide documents from source/_guides
    ///
    /// A document that fails to parse is reported with its file path and
    /// collected as a failure; it never silently disappears.
    pub fn load_guides(&self) -> Result<LoadReport> {
        let guides_dir = self.site.source_dir.join(&self.site.config.guide_dir);

        let mut documents = Vec::new();
        let mut failures = Vec::new();

        if !guides_dir.exists() {
            return Ok(LoadReport {
                documents,
                failures,
            });
        }

        for entry in WalkDir::new(&guides_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || !is_markdown_file(path) {
                continue;
            }

            let content = match fs::read_to_string(path) {
                Ok(content) => content,
                Err(e) => {
                    tracing::error!("Failed to read guide {:?}: {}", path, e);
                    failures.push(BuildError::Io(e));
                    continue;
                }
            };

            match self.load_guide(path, &content) {
                Ok(doc) => {
                    if !doc.draft || self.site.config.render_drafts {
                        documents.push(doc);
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to load guide {:?}: {}", path, e);
                    failures.push(BuildError::Metadata {
                        path: path.to_path_buf(),
                        source: e,
                    });
                }
            }
        }

        Ok(LoadReport {
            documents,
            failures,
        })
    }

    /// Parse a single guide from its raw text
    fn load_guide(
        &self,
        path: &Path,
        content: &str,
    ) -> std::result::Result<Document, MalformedMetadataError> {
        let (fm, body) = FrontMatter::parse(content)?;

        let source = path
            .strip_prefix(&self.site.source_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        let content_html = self.renderer.render(body);

        let mut doc = Document::new(fm.title, fm.date, fm.order, source);
        doc.raw = body.to_string();
        doc.content = content_html;
        doc.description = fm.description;
        doc.full_source = path.to_path_buf();
        doc.draft = fm.draft;
        doc.extra = fm.extra;

        Ok(doc)
    }

    /// Load standalone pages (markdown files outside underscore directories)
    pub fn load_pages(&self) -> Result<Vec<StandalonePage>> {
        let mut pages = Vec::new();

        for entry in WalkDir::new(&self.site.source_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            // Skip special directories (_guides, _drafts, ...)
            let relative = path.strip_prefix(&self.site.source_dir).unwrap_or(path);
            let first_component = relative
                .components()
                .next()
                .and_then(|c| c.as_os_str().to_str());

            if let Some(first) = first_component {
                if first.starts_with('_') {
                    continue;
                }
            }

            if path.is_file() && is_markdown_file(path) {
                match self.load_page(path) {
                    Ok(page) => pages.push(page),
                    Err(e) => {
                        tracing::error!("Failed to load page {:?}: {}", path, e);
                    }
                }
            }
        }

        Ok(pages)
    }

    /// Load a single standalone page from a file
    fn load_page(&self, path: &Path) -> Result<StandalonePage> {
        let content = fs::read_to_string(path)?;
        let (matter, body) = PageMatter::parse(&content)?;

        let title = matter.title.clone().unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Untitled")
                .to_string()
        });

        let date = matter.parse_date()?;

        let source = path
            .strip_prefix(&self.site.source_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        // For index.md files the parent directory is the path
        let page_path = {
            let without_ext = source.trim_end_matches(".md").trim_end_matches(".markdown");

            if without_ext.ends_with("/index") || without_ext == "index" {
                without_ext.trim_end_matches("index").to_string()
            } else {
                format!("{}/", without_ext)
            }
        };
        let page_path = if page_path.is_empty() {
            "/".to_string()
        } else {
            page_path
        };

        let content_html = self.renderer.render(body);

        Ok(StandalonePage {
            title,
            date,
            raw: body.to_string(),
            content: content_html,
            layout: matter.layout.unwrap_or_else(|| "page".to_string()),
            source,
            full_source: path.to_path_buf(),
            path: page_path,
            extra: matter.extra,
        })
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn site_with_sources(files: &[(&str, &str)]) -> (TempDir, Guidebook) {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            let path = dir.path().join("source").join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        let site = Guidebook::new(dir.path()).unwrap();
        (dir, site)
    }

    #[test]
    fn test_load_guides() {
        let (_dir, site) = site_with_sources(&[
            (
                "_guides/control_structures.md",
                "---\ntitle: Control Structures\ndate: 2014-05-01\norder: 1\n---\nBody one.\n",
            ),
            (
                "_guides/general_advice.md",
                "---\ntitle: General Advice\ndate: 2014-05-03\norder: 4\n---\nBody two.\n",
            ),
        ]);

        let loader = ContentLoader::new(&site);
        let report = loader.load_guides().unwrap();
        assert_eq!(report.documents.len(), 2);
        assert!(report.failures.is_empty());

        let doc = report
            .documents
            .iter()
            .find(|d| d.slug == "control-structures")
            .unwrap();
        assert_eq!(doc.order, 1);
        assert!(doc.content.contains("Body one."));
    }

    #[test]
    fn test_malformed_guide_is_reported_not_loaded() {
        let (_dir, site) = site_with_sources(&[
            (
                "_guides/good.md",
                "---\ntitle: Good\ndate: 2014-05-01\norder: 1\n---\nOk.\n",
            ),
            (
                "_guides/no_date.md",
                "---\ntitle: Missing Date\norder: 2\n---\nBroken.\n",
            ),
        ]);

        let loader = ContentLoader::new(&site);
        let report = loader.load_guides().unwrap();

        assert_eq!(report.documents.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].to_string().contains("no_date.md"));
        assert!(report.failures[0].to_string().contains("date"));
    }

    #[test]
    fn test_drafts_are_skipped_by_default() {
        let (_dir, site) = site_with_sources(&[(
            "_guides/wip.md",
            "---\ntitle: WIP\ndate: 2024-01-01\norder: 9\ndraft: true\n---\nSoon.\n",
        )]);

        let loader = ContentLoader::new(&site);
        let report = loader.load_guides().unwrap();
        assert!(report.documents.is_empty());
        assert!(report.failures.is_empty());
    }

    #[test]
    fn test_load_pages_skips_guide_dir() {
        let (_dir, site) = site_with_sources(&[
            ("about.md", "---\ntitle: About\n---\nWhy this exists.\n"),
            (
                "_guides/one.md",
                "---\ntitle: One\ndate: 2024-01-01\norder: 1\n---\nGuide.\n",
            ),
        ]);

        let loader = ContentLoader::new(&site);
        let pages = loader.load_pages().unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].title, "About");
        assert_eq!(pages[0].path, "about/");
    }
}
