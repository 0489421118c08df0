//! List site content

use anyhow::Result;

use crate::content::loader::ContentLoader;
use crate::Guidebook;

/// List site content by type
pub fn run(site: &Guidebook, content_type: &str) -> Result<()> {
    let loader = ContentLoader::new(site);

    match content_type {
        "guide" | "guides" => {
            let report = loader.load_guides()?;
            let pages = crate::resolver::resolve(report.documents)?;
            println!("Guides ({}):", pages.len());
            for page in pages {
                println!(
                    "  {:>3}. {} - {} [{}]",
                    page.document.order,
                    page.document.date.format("%Y-%m-%d"),
                    page.document.title,
                    page.document.source
                );
            }
            if !report.failures.is_empty() {
                println!("Failed to load ({}):", report.failures.len());
                for failure in &report.failures {
                    println!("  {}", failure);
                }
            }
        }
        "page" | "pages" => {
            let pages = loader.load_pages()?;
            println!("Pages ({}):", pages.len());
            for page in pages {
                println!("  {} [{}]", page.title, page.source);
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: guide, page", content_type);
        }
    }

    Ok(())
}
