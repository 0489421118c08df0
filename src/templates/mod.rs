//! Built-in chrome templates using the Tera template engine
//!
//! All templates are embedded directly in the binary, so a site needs no
//! theme directory: the chrome (header, navigation, footer) ships with the
//! generator.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

/// Template renderer with the embedded chrome
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all chrome templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // The templates compose pre-rendered HTML bodies, so autoescaping
        // would double-escape the content.
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("chrome/layout.html")),
            ("index.html", include_str!("chrome/index.html")),
            ("guide.html", include_str!("chrome/guide.html")),
            ("page.html", include_str!("chrome/page.html")),
            // Partials
            (
                "partials/head.html",
                include_str!("chrome/partials/head.html"),
            ),
            (
                "partials/header.html",
                include_str!("chrome/partials/header.html"),
            ),
            ("partials/nav.html", include_str!("chrome/partials/nav.html")),
            (
                "partials/footer.html",
                include_str!("chrome/partials/footer.html"),
            ),
        ])?;

        tera.register_filter("strip_html", strip_html_filter);
        tera.register_filter("truncate_chars", truncate_chars_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: strip HTML tags
fn strip_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("strip_html", "value", String, value);
    Ok(tera::Value::String(crate::helpers::strip_html(&s)))
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };
    Ok(tera::Value::String(crate::helpers::truncate(
        &s, length, None,
    )))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub guides: Vec<GuideData>,
    pub pages: Vec<PageData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GuideData {
    pub title: String,
    pub date: String,
    pub order: i64,
    pub path: String,
    pub permalink: String,
    pub description: Option<String>,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageData {
    pub title: String,
    pub date: Option<String>,
    pub path: String,
    pub permalink: String,
    pub content: String,
    pub layout: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigData {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub url: String,
    pub root: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MenuItem {
    pub name: String,
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_context() -> Context {
        let mut context = Context::new();
        context.insert(
            "config",
            &ConfigData {
                title: "The Handbook".to_string(),
                subtitle: String::new(),
                description: String::new(),
                author: String::new(),
                language: "en".to_string(),
                url: "https://example.com".to_string(),
                root: "/".to_string(),
            },
        );
        context.insert("menu", &Vec::<MenuItem>::new());
        context.insert(
            "site",
            &SiteData {
                guides: Vec::new(),
                pages: Vec::new(),
            },
        );
        context.insert("current_year", "2024");
        context
    }

    #[test]
    fn test_layout_carries_site_title_and_home_link() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = base_context();
        context.insert("page_title", "Control Structures");
        context.insert("page_content", "<p>Body</p>");
        context.insert("page_date", "2014-05-01");
        context.insert("toc", "");
        context.insert("show_toc", &false);
        context.insert("current_path", "control-structures/");

        let html = renderer.render("guide.html", &context).unwrap();
        assert!(html.contains("The Handbook"));
        assert!(html.contains(r#"href="/""#));
        assert!(html.contains("<p>Body</p>"));
    }

    #[test]
    fn test_nav_includes_menu_entries() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = base_context();
        context.insert(
            "menu",
            &vec![MenuItem {
                name: "About".to_string(),
                path: "/about/".to_string(),
            }],
        );
        context.insert("guides", &Vec::<GuideData>::new());
        context.insert("current_path", "/");

        let html = renderer.render("index.html", &context).unwrap();
        assert!(html.contains(r#"href="/about/""#));
        assert!(html.contains("About"));
    }

    #[test]
    fn test_index_lists_guides_in_given_order() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = base_context();
        let guides = vec![
            GuideData {
                title: "Control Structures".to_string(),
                date: "2014-05-01".to_string(),
                order: 1,
                path: "/control-structures/".to_string(),
                permalink: "https://example.com/control-structures/".to_string(),
                description: None,
                content: String::new(),
            },
            GuideData {
                title: "General Advice".to_string(),
                date: "2014-05-03".to_string(),
                order: 4,
                path: "/general-advice/".to_string(),
                permalink: "https://example.com/general-advice/".to_string(),
                description: None,
                content: String::new(),
            },
        ];
        context.insert("guides", &guides);
        context.insert("current_path", "/");

        let html = renderer.render("index.html", &context).unwrap();
        let first = html.find("Control Structures").unwrap();
        let second = html.find("General Advice").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_prev_next_links() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = base_context();
        context.insert("page_title", "Dynamic Typing");
        context.insert("page_content", "<p>Body</p>");
        context.insert("page_date", "2014-05-02");
        context.insert("toc", "");
        context.insert("show_toc", &false);
        context.insert("current_path", "dynamic-typing/");
        context.insert(
            "prev_page",
            &crate::resolver::PageRef {
                title: "Control Structures".to_string(),
                route: "control-structures/".to_string(),
            },
        );
        context.insert(
            "next_page",
            &crate::resolver::PageRef {
                title: "General Advice".to_string(),
                route: "general-advice/".to_string(),
            },
        );

        let html = renderer.render("guide.html", &context).unwrap();
        assert!(html.contains("Control Structures"));
        assert!(html.contains("General Advice"));
        assert!(html.contains("page-nav"));
    }
}
