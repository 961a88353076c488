//! Writing a rendered template tree to disk

use super::tree::TemplateTree;
use crate::error::WizardError;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Write every file of `tree` below `target_dir`, returning the relative
/// paths written. A non-empty target is refused unless `overwrite` is set.
pub async fn write_tree(
    tree: &TemplateTree,
    target_dir: &Path,
    overwrite: bool,
) -> Result<Vec<String>> {
    if !overwrite && has_entries(target_dir).await? {
        return Err(WizardError::TargetNotEmpty {
            path: target_dir.to_path_buf(),
        }
        .into());
    }

    // Ensure target directory exists
    fs::create_dir_all(target_dir)
        .await
        .with_context(|| format!("Failed to create directory: {}", target_dir.display()))?;

    let mut written = Vec::with_capacity(tree.len());

    for (relative, contents) in tree.iter() {
        let target_path: PathBuf = relative
            .split('/')
            .fold(target_dir.to_path_buf(), |path, component| path.join(component));

        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        fs::write(&target_path, contents)
            .await
            .with_context(|| format!("Failed to write file: {}", target_path.display()))?;

        written.push(relative.to_string());
    }

    Ok(written)
}

async fn has_entries(dir: &Path) -> Result<bool> {
    match fs::read_dir(dir).await {
        Ok(mut entries) => Ok(entries.next_entry().await?.is_some()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(WizardError::io(dir, e).into()),
    }
}
