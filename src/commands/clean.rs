//! Clean the public directory

use anyhow::Result;
use std::fs;

use crate::Guidebook;

/// Clean the public directory and cache
pub fn run(site: &Guidebook) -> Result<()> {
    if site.public_dir.exists() {
        fs::remove_dir_all(&site.public_dir)?;
        tracing::info!("Deleted: {:?}", site.public_dir);
    }

    let cache_dir = site.base_dir.join(".guidebook-cache");
    if cache_dir.exists() {
        fs::remove_dir_all(&cache_dir)?;
        tracing::info!("Deleted: {:?}", cache_dir);
    }

    Ok(())
}
