//! Generator module - composes resolved pages into the static output tree

use anyhow::Result;
use std::fs;

use tera::Context;
use walkdir::WalkDir;

use crate::cache::ChangeSet;
use crate::content::StandalonePage;
use crate::helpers::{date_xml, format_date, full_url_for, toc, url_for};
use crate::resolver::ResolvedPage;
use crate::templates::{ConfigData, GuideData, MenuItem, PageData, SiteData, TemplateRenderer};
use crate::Guidebook;

/// Default stylesheet shipped with the chrome
const DEFAULT_STYLESHEET: &str = include_str!("../templates/chrome/guidebook.css");

/// Static site generator using the embedded chrome templates
pub struct Generator {
    site: Guidebook,
    renderer: TemplateRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(site: &Guidebook) -> Result<Self> {
        let renderer = TemplateRenderer::new()?;

        Ok(Self {
            site: site.clone(),
            renderer,
        })
    }

    /// Generate the entire site
    pub fn generate(&self, pages: &[ResolvedPage], standalone: &[StandalonePage]) -> Result<()> {
        fs::create_dir_all(&self.site.public_dir)?;

        self.write_stylesheet()?;
        self.copy_source_assets()?;

        let site_data = self.build_site_data(pages, standalone);
        let config_data = self.build_config_data();
        let menu = self.build_menu(standalone);

        self.generate_index_page(&site_data, &config_data, &menu)?;

        for page in pages {
            self.generate_guide_page(page, &site_data, &config_data, &menu)?;
        }

        for page in standalone {
            self.generate_standalone_page(page, &site_data, &config_data, &menu)?;
        }

        self.generate_search_index(pages)?;
        self.generate_sitemap(pages, standalone)?;

        Ok(())
    }

    /// Regenerate only the pages whose sources changed
    ///
    /// The index, search index, and sitemap are always rewritten: they
    /// aggregate every document and are cheap compared to page renders.
    pub fn generate_incremental(
        &self,
        pages: &[ResolvedPage],
        standalone: &[StandalonePage],
        changeset: &ChangeSet,
    ) -> Result<()> {
        fs::create_dir_all(&self.site.public_dir)?;

        self.write_stylesheet()?;
        self.copy_source_assets()?;

        let site_data = self.build_site_data(pages, standalone);
        let config_data = self.build_config_data();
        let menu = self.build_menu(standalone);

        let mut regenerated = 0;
        for page in pages {
            if changeset.contains(&page.document.source) {
                self.generate_guide_page(page, &site_data, &config_data, &menu)?;
                regenerated += 1;
            }
        }
        for page in standalone {
            if changeset.contains(&page.source) {
                self.generate_standalone_page(page, &site_data, &config_data, &menu)?;
                regenerated += 1;
            }
        }

        self.generate_index_page(&site_data, &config_data, &menu)?;
        self.generate_search_index(pages)?;
        self.generate_sitemap(pages, standalone)?;

        tracing::info!("Regenerated {} changed pages", regenerated);
        Ok(())
    }

    /// Build site data for templates
    fn build_site_data(
        &self,
        pages: &[ResolvedPage],
        standalone: &[StandalonePage],
    ) -> SiteData {
        let guides = pages.iter().map(|p| self.guide_data(p)).collect();

        let page_data = standalone
            .iter()
            .map(|p| PageData {
                title: p.title.clone(),
                date: p.date.as_ref().map(date_xml),
                path: url_for(&self.site.config, &p.path),
                permalink: self.permalink(&p.path),
                content: p.content.clone(),
                layout: p.layout.clone(),
            })
            .collect();

        SiteData {
            guides,
            pages: page_data,
        }
    }

    fn guide_data(&self, page: &ResolvedPage) -> GuideData {
        let doc = &page.document;
        GuideData {
            title: doc.title.clone(),
            date: format_date(&doc.date, &self.site.config.date_format),
            order: doc.order,
            path: url_for(&self.site.config, &page.route),
            permalink: self.permalink(&page.route),
            description: doc.description.clone(),
            content: doc.content.clone(),
        }
    }

    /// Build config data for templates
    fn build_config_data(&self) -> ConfigData {
        let config = &self.site.config;
        ConfigData {
            title: config.title.clone(),
            subtitle: config.subtitle.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            language: config.language.clone(),
            url: config.url.clone(),
            root: config.root.clone(),
        }
    }

    /// Build the navigation menu
    ///
    /// Configured entries come first in declaration order; an About link is
    /// appended automatically when source/about.md exists and the config
    /// does not already link it.
    fn build_menu(&self, standalone: &[StandalonePage]) -> Vec<MenuItem> {
        let mut menu: Vec<MenuItem> = self
            .site
            .config
            .menu
            .iter()
            .map(|(name, path)| MenuItem {
                name: name.clone(),
                path: url_for(&self.site.config, path),
            })
            .collect();

        let about_path = url_for(&self.site.config, "about/");
        let has_about_page = standalone
            .iter()
            .any(|p| url_for(&self.site.config, &p.path) == about_path);
        let already_linked = menu.iter().any(|item| item.path == about_path);

        if has_about_page && !already_linked {
            menu.push(MenuItem {
                name: "About".to_string(),
                path: about_path,
            });
        }

        menu
    }

    /// Create a base context with common variables
    fn create_base_context(
        &self,
        site_data: &SiteData,
        config_data: &ConfigData,
        menu: &[MenuItem],
    ) -> Context {
        let mut context = Context::new();
        context.insert("site", site_data);
        context.insert("config", config_data);
        context.insert("menu", menu);
        context.insert(
            "current_year",
            &chrono::Utc::now().format("%Y").to_string(),
        );
        context
    }

    /// Generate the site index listing all guides in order
    fn generate_index_page(
        &self,
        site_data: &SiteData,
        config_data: &ConfigData,
        menu: &[MenuItem],
    ) -> Result<()> {
        let mut context = self.create_base_context(site_data, config_data, menu);
        context.insert("guides", &site_data.guides);
        context.insert("current_path", "/");

        let html = self.renderer.render("index.html", &context)?;

        let output_path = self.site.public_dir.join("index.html");
        fs::write(&output_path, html)?;
        tracing::debug!("Generated: {:?}", output_path);

        Ok(())
    }

    /// Generate a single guide page
    fn generate_guide_page(
        &self,
        page: &ResolvedPage,
        site_data: &SiteData,
        config_data: &ConfigData,
        menu: &[MenuItem],
    ) -> Result<()> {
        let doc = &page.document;

        let toc_html = toc(&doc.content, 3);
        let has_toc = toc_html.contains("toc-item");

        let mut context = self.create_base_context(site_data, config_data, menu);
        context.insert("page_title", &doc.title);
        context.insert(
            "page_date",
            &format_date(&doc.date, &self.site.config.date_format),
        );
        context.insert("page_content", &doc.content);
        context.insert("current_path", &page.route);
        context.insert("toc", &toc_html);
        context.insert("show_toc", &has_toc);

        if let Some(ref prev) = page.prev {
            context.insert("prev_page", prev);
        }
        if let Some(ref next) = page.next {
            context.insert("next_page", next);
        }

        let html = self.renderer.render("guide.html", &context)?;

        let output_path = self
            .site
            .public_dir
            .join(page.route.trim_start_matches('/'))
            .join("index.html");
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| anyhow::anyhow!("Failed to create dir {:?}: {}", parent, e))?;
        }
        fs::write(&output_path, &html)
            .map_err(|e| anyhow::anyhow!("Failed to write {:?}: {}", output_path, e))?;
        tracing::debug!("Generated guide: {:?}", output_path);

        Ok(())
    }

    /// Generate a standalone page
    fn generate_standalone_page(
        &self,
        page: &StandalonePage,
        site_data: &SiteData,
        config_data: &ConfigData,
        menu: &[MenuItem],
    ) -> Result<()> {
        let mut context = self.create_base_context(site_data, config_data, menu);
        context.insert("page_title", &page.title);
        context.insert("page_content", &page.content);
        context.insert("current_path", &url_for(&self.site.config, &page.path));

        let html = self.renderer.render("page.html", &context)?;

        let clean_path = page.path.trim_start_matches('/');
        let output_path = self.site.public_dir.join(clean_path).join("index.html");
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&output_path, html)?;
        tracing::debug!("Generated page: {:?}", output_path);

        Ok(())
    }

    /// Generate the client-side search index (JSON)
    fn generate_search_index(&self, pages: &[ResolvedPage]) -> Result<()> {
        let search_data: Vec<serde_json::Value> = pages
            .iter()
            .map(|p| {
                serde_json::json!({
                    "title": p.document.title,
                    "url": url_for(&self.site.config, &p.route),
                    "content": crate::helpers::strip_html(&p.document.content),
                    "date": date_xml(&p.document.date),
                })
            })
            .collect();

        let output_path = self.site.public_dir.join("search.json");
        let json = serde_json::to_string_pretty(&search_data)?;
        fs::write(&output_path, json)?;
        tracing::info!("Generated search.json");

        Ok(())
    }

    /// Generate sitemap.xml
    fn generate_sitemap(
        &self,
        pages: &[ResolvedPage],
        standalone: &[StandalonePage],
    ) -> Result<()> {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
        xml.push('\n');

        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", self.permalink("")));
        xml.push_str("  </url>\n");

        for page in pages {
            xml.push_str("  <url>\n");
            xml.push_str(&format!(
                "    <loc>{}</loc>\n",
                escape_xml(&self.permalink(&page.route))
            ));
            xml.push_str(&format!(
                "    <lastmod>{}</lastmod>\n",
                date_xml(&page.document.date)
            ));
            xml.push_str("  </url>\n");
        }

        for page in standalone {
            xml.push_str("  <url>\n");
            xml.push_str(&format!(
                "    <loc>{}</loc>\n",
                escape_xml(&self.permalink(&page.path))
            ));
            xml.push_str("  </url>\n");
        }

        xml.push_str("</urlset>\n");

        let output_path = self.site.public_dir.join("sitemap.xml");
        fs::write(&output_path, xml)?;
        tracing::info!("Generated sitemap.xml");

        Ok(())
    }

    /// Write the embedded stylesheet
    fn write_stylesheet(&self) -> Result<()> {
        let css_dir = self.site.public_dir.join("css");
        fs::create_dir_all(&css_dir)?;
        fs::write(css_dir.join("guidebook.css"), DEFAULT_STYLESHEET)?;
        Ok(())
    }

    /// Copy source assets (images, etc.) to the public directory
    fn copy_source_assets(&self) -> Result<()> {
        let source_dir = &self.site.source_dir;
        if !source_dir.exists() {
            return Ok(());
        }

        for entry in WalkDir::new(source_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if path.is_file() {
                let ext = path.extension().and_then(|e| e.to_str());

                // Markdown files are processed separately
                if matches!(ext, Some("md") | Some("markdown")) {
                    continue;
                }

                // Skip underscore directories (_guides, _drafts)
                let relative = path.strip_prefix(source_dir)?;
                if relative
                    .components()
                    .any(|c| c.as_os_str().to_string_lossy().starts_with('_'))
                {
                    continue;
                }

                let dest = self.site.public_dir.join(relative);

                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)?;
                }

                fs::copy(path, &dest)?;
            }
        }

        Ok(())
    }

    fn permalink(&self, route: &str) -> String {
        full_url_for(&self.site.config, route)
    }
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
