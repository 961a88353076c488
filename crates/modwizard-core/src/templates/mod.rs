//! Template loading, rendering, and writing
//!
//! This module provides:
//! - Template manifest type (`template.yaml`)
//! - Template sources: embedded, local directory, remote zip
//! - Pure placeholder substitution and renaming over an in-memory tree
//! - Writing rendered trees to disk
//! - Version compatibility checking

pub mod copier;
pub mod manifest;
pub mod render;
pub mod source;
pub mod tree;
pub mod version;

use crate::product::ProductConfig;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

pub use copier::write_tree;
pub use manifest::TemplateManifest;
pub use render::{render_tree, RenderedTemplate, Replacements};
pub use source::{LoadedTemplate, TemplateSource};
pub use tree::TemplateTree;
pub use version::check_compatibility;

/// Build `<template dir>.zip` next to a local template directory
pub async fn build_zip<C: ProductConfig>(config: &C, template_dir: &Path) -> Result<()> {
    println!(
        "{}",
        format!("Building {} template zip...", config.display_name())
            .cyan()
            .bold()
    );

    let zip_bytes = source::build_zip(template_dir).await?;

    let name = template_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "template".to_string());
    let zip_path = template_dir.with_file_name(format!("{}.zip", name));
    tokio::fs::write(&zip_path, &zip_bytes)
        .await
        .with_context(|| format!("Failed to write {}", zip_path.display()))?;

    println!(
        "{} {} ({} bytes)",
        "Built".green().bold(),
        zip_path.display(),
        zip_bytes.len()
    );

    Ok(())
}
