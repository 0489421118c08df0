//! Create a new guide document

use anyhow::Result;
use std::fs;

use crate::content::loader::ContentLoader;
use crate::Guidebook;

/// Create a new guide with the next free order key
pub fn create_guide(site: &Guidebook, title: &str, draft: bool) -> Result<()> {
    let target_dir = if draft {
        site.source_dir.join("_drafts")
    } else {
        site.source_dir.join(&site.config.guide_dir)
    };
    fs::create_dir_all(&target_dir)?;

    let slug = slug::slugify(title);
    let file_path = target_dir.join(format!("{}.md", slug));

    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    // Next free order key: one past the current maximum
    let loader = ContentLoader::new(site);
    let report = loader.load_guides()?;
    let order = report
        .documents
        .iter()
        .map(|d| d.order)
        .max()
        .unwrap_or(0)
        + 1;

    let now = chrono::Local::now().date_naive();
    let content = format!(
        "---\ntitle: \"{}\"\ndate: \"{}\"\norder: {}\n{}---\n\n",
        title,
        now.format("%Y-%m-%d"),
        order,
        if draft { "draft: true\n" } else { "" }
    );

    fs::write(&file_path, content)?;

    println!("Created: {:?}", file_path);

    Ok(())
}

/// Run the new command
pub fn run(site: &Guidebook, title: &str, draft: bool) -> Result<()> {
    create_guide(site, title, draft)
}
