//! Template loading from the embedded default, a local directory, or a remote zip
//!
//! All sources produce the same [`LoadedTemplate`]: the parsed manifest plus
//! the remaining files as an in-memory tree, so rendering never touches disk.

use super::manifest::{TemplateManifest, MANIFEST_FILE};
use super::tree::TemplateTree;
use crate::error::WizardError;
use anyhow::{Context, Result};
use include_dir::{include_dir, Dir};
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};
use url::Url;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

static EMBEDDED_TEMPLATE: Dir<'static> =
    include_dir!("$CARGO_MANIFEST_DIR/templates/melonloader");

/// Where a template comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// The MelonLoader template compiled into the binary
    Embedded,
    Local(PathBuf),
    /// A zip archive of the template root
    Remote(Url),
}

impl TemplateSource {
    pub fn remote(url: &str) -> Result<Self> {
        let url = Url::parse(url).with_context(|| format!("Invalid template URL: {}", url))?;
        Ok(Self::Remote(url))
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Embedded => "built-in MelonLoader template".to_string(),
            Self::Local(path) => format!("local template at {}", path.display()),
            Self::Remote(url) => format!("remote template at {}", url),
        }
    }

    /// Load the template's manifest and files
    pub async fn load(&self, user_agent: &str) -> Result<LoadedTemplate> {
        let tree = match self {
            Self::Embedded => embedded_tree(),
            Self::Local(path) => local_tree(path).await?,
            Self::Remote(url) => {
                let bytes = fetch_zip(url, user_agent).await?;
                extract_zip(&bytes)?
            }
        };
        LoadedTemplate::from_tree(tree)
    }
}

/// A template ready for rendering
#[derive(Debug, Clone)]
pub struct LoadedTemplate {
    pub manifest: TemplateManifest,
    pub tree: TemplateTree,
}

impl LoadedTemplate {
    /// Split the manifest out of a raw tree. A tree without one gets defaults.
    pub fn from_tree(mut tree: TemplateTree) -> Result<Self> {
        let manifest = match tree.remove(MANIFEST_FILE) {
            Some(bytes) => {
                let content = String::from_utf8_lossy(&bytes);
                TemplateManifest::parse(&content).context("Failed to parse template.yaml")?
            }
            None => TemplateManifest::default(),
        };

        if tree.is_empty() {
            return Err(WizardError::Template(format!(
                "Template '{}' contains no files",
                manifest.name
            ))
            .into());
        }

        Ok(Self { manifest, tree })
    }
}

fn insert_or_skip(tree: &mut TemplateTree, path: &str, contents: Vec<u8>) {
    if !tree.insert(path, contents) {
        tracing::warn!(path, "skipping template file with unsafe path");
    }
}

fn embedded_tree() -> TemplateTree {
    fn collect(dir: &Dir<'_>, tree: &mut TemplateTree) {
        for file in dir.files() {
            insert_or_skip(tree, &file.path().to_string_lossy(), file.contents().to_vec());
        }
        for sub in dir.dirs() {
            collect(sub, tree);
        }
    }

    let mut tree = TemplateTree::new();
    collect(&EMBEDDED_TEMPLATE, &mut tree);
    tree
}

async fn local_tree(root: &Path) -> Result<TemplateTree> {
    if !root.is_dir() {
        anyhow::bail!("Template directory not found: {}", root.display());
    }

    let mut tree = TemplateTree::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(root)
            .context("Template file outside template root")?;
        let contents = tokio::fs::read(entry.path())
            .await
            .with_context(|| format!("Failed to read {}", entry.path().display()))?;
        insert_or_skip(&mut tree, &relative.to_string_lossy(), contents);
    }

    Ok(tree)
}

async fn fetch_zip(url: &Url, user_agent: &str) -> Result<Vec<u8>> {
    let client = reqwest::Client::builder()
        .user_agent(user_agent)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new());

    let response = client
        .get(url.clone())
        .send()
        .await
        .with_context(|| format!("Failed to fetch template from {}", url))?;

    if !response.status().is_success() {
        anyhow::bail!(
            "Failed to fetch template from {}: HTTP {}",
            url,
            response.status()
        );
    }

    Ok(response.bytes().await?.to_vec())
}

/// Unpack a template zip. Entries with unsafe names are skipped.
pub fn extract_zip(zip_bytes: &[u8]) -> Result<TemplateTree> {
    let mut archive =
        ZipArchive::new(Cursor::new(zip_bytes)).context("Failed to read template zip archive")?;

    let mut tree = TemplateTree::new();
    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() {
            continue;
        }

        let Some(name) = file.enclosed_name() else {
            tracing::warn!(entry = file.name(), "skipping unsafe zip entry");
            continue;
        };
        let name = name.to_string_lossy().into_owned();

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)?;
        insert_or_skip(&mut tree, &name, contents);
    }

    Ok(tree)
}

/// Pack a local template directory into a zip usable as a remote source
pub async fn build_zip(template_dir: &Path) -> Result<Vec<u8>> {
    let tree = local_tree(template_dir).await?;
    // Validate the manifest before publishing the archive
    LoadedTemplate::from_tree(tree.clone())?;

    let mut zip_buffer = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut zip_buffer));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        for (path, contents) in tree.iter() {
            zip.start_file(path, options)?;
            zip.write_all(contents)?;
        }

        zip.finish()?;
    }

    Ok(zip_buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_embedded_template_has_manifest_and_project() {
        let loaded = LoadedTemplate::from_tree(embedded_tree()).unwrap();
        assert_eq!(loaded.manifest.rename_token, "MyMod");
        assert!(loaded.tree.get("MyMod.csproj").is_some());
        assert!(loaded.tree.get("Core.cs").is_some());
        assert!(loaded.tree.get(MANIFEST_FILE).is_none());
    }

    #[test]
    fn test_tree_without_manifest_gets_defaults() {
        let mut tree = TemplateTree::new();
        tree.insert("MyMod.cs", b"class X {}".to_vec());
        let loaded = LoadedTemplate::from_tree(tree).unwrap();
        assert_eq!(loaded.manifest, TemplateManifest::default());
    }

    #[test]
    fn test_empty_template_is_rejected() {
        let mut tree = TemplateTree::new();
        tree.insert(MANIFEST_FILE, b"name: Empty\n".to_vec());
        let err = LoadedTemplate::from_tree(tree).unwrap_err();
        assert!(err.to_string().contains("no files"));
    }

    #[tokio::test]
    async fn test_local_template_loads_nested_files() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("MyMod/Patches")).unwrap();
        std::fs::write(temp.path().join("template.yaml"), "name: Local\n").unwrap();
        std::fs::write(temp.path().join("MyMod/Patches/Patch.cs"), "// $MOD_NAME$").unwrap();

        let loaded = TemplateSource::Local(temp.path().to_path_buf())
            .load("test")
            .await
            .unwrap();
        assert_eq!(loaded.manifest.name, "Local");
        assert_eq!(
            loaded.tree.paths().collect::<Vec<_>>(),
            vec!["MyMod/Patches/Patch.cs"]
        );
    }

    #[tokio::test]
    async fn test_missing_local_template_fails() {
        let temp = TempDir::new().unwrap();
        let result = TemplateSource::Local(temp.path().join("missing"))
            .load("test")
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_built_zip_extracts_to_same_tree() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("template.yaml"), "name: Zipped\n").unwrap();
        std::fs::create_dir_all(temp.path().join("src")).unwrap();
        std::fs::write(temp.path().join("src/MyMod.cs"), "$NAMESPACE$").unwrap();

        let bytes = build_zip(temp.path()).await.unwrap();
        let loaded = LoadedTemplate::from_tree(extract_zip(&bytes).unwrap()).unwrap();

        assert_eq!(loaded.manifest.name, "Zipped");
        assert_eq!(loaded.tree.get("src/MyMod.cs"), Some(&b"$NAMESPACE$"[..]));
    }

    #[test]
    fn test_remote_rejects_bad_url() {
        assert!(TemplateSource::remote("not a url").is_err());
        assert!(matches!(
            TemplateSource::remote("https://example.com/t.zip").unwrap(),
            TemplateSource::Remote(_)
        ));
    }
}
