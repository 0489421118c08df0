//! Initialize a new guidebook site

use anyhow::Result;
use std::fs;
use std::path::Path;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir)?;
    fs::create_dir_all(target_dir.join("source/_guides"))?;
    fs::create_dir_all(target_dir.join("source/_drafts"))?;

    // Default _config.yml
    let config_content = r#"# Guidebook Configuration

# Site
title: Guidebook
subtitle: ''
description: ''
author: ''
language: en

# URL
url: http://example.com
root: /

# Directory
source_dir: source
public_dir: public
guide_dir: _guides

# Writing
render_drafts: false
strict: false
highlight:
  theme: base16-ocean.dark
  line_number: false

# Navigation (label: path). The About page is linked automatically.
menu: {}

# Date format for rendered pages
date_format: '%Y-%m-%d'
"#;

    let config_path = target_dir.join("_config.yml");
    if !config_path.exists() {
        fs::write(&config_path, config_content)?;
    }

    // A first guide so the site builds out of the box
    let first_guide = r#"---
title: "Getting Started"
date: "2024-01-01"
order: 1
description: "How this guide is organized."
---

Welcome to your new guidebook.

Each file under `source/_guides/` becomes one chapter. The `order` key in
its front-matter controls where it appears in the reading sequence.
"#;

    let guide_path = target_dir.join("source/_guides/getting-started.md");
    if !guide_path.exists() {
        fs::write(&guide_path, first_guide)?;
    }

    let about = r#"---
title: "About"
---

Describe this guide and its authors here.
"#;

    let about_path = target_dir.join("source/about.md");
    if !about_path.exists() {
        fs::write(&about_path, about)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_scaffolds_a_buildable_site() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();

        assert!(dir.path().join("_config.yml").exists());
        assert!(dir
            .path()
            .join("source/_guides/getting-started.md")
            .exists());
        assert!(dir.path().join("source/about.md").exists());

        // The scaffold must build cleanly
        let site = crate::Guidebook::new(dir.path()).unwrap();
        crate::commands::generate::run(&site).unwrap();
        assert!(site.public_dir.join("getting-started/index.html").exists());
        assert!(site.public_dir.join("about/index.html").exists());
    }

    #[test]
    fn test_init_does_not_overwrite_existing_config() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("_config.yml"), "title: Mine\n").unwrap();

        init_site(dir.path()).unwrap();

        let content = std::fs::read_to_string(dir.path().join("_config.yml")).unwrap();
        assert_eq!(content, "title: Mine\n");
    }
}
