//! Project creation workflow
//!
//! Ties game inspection, reference resolution, and template rendering
//! together without any prompting, so custom front ends can drive it.

use crate::error::WizardError;
use crate::game::references::xml_escape;
use crate::game::{self, FrameworkVersion, GameInfo};
use crate::templates::{self, LoadedTemplate, Replacements};
use anyhow::Result;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static MOD_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("mod name pattern is valid"));

/// First release with `OnInitializeMelon` and implicit usings
const MODERN_API: FrameworkVersion = FrameworkVersion::new(0, 5, 5);

/// Check that a mod name is usable as a C# identifier and file name
pub fn validate_mod_name(name: &str) -> Result<(), WizardError> {
    if MOD_NAME.is_match(name) {
        Ok(())
    } else {
        Err(WizardError::InvalidModName {
            name: name.to_string(),
        })
    }
}

/// Escape text for a C# regular string literal
fn csharp_escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Placeholder values for the MelonLoader template. `GAME_DIR` lands in the
/// `.csproj` and is XML-escaped; the names and author land in C# string
/// literals.
pub fn build_replacements(
    game: &GameInfo,
    references: &[PathBuf],
    mod_name: &str,
    author: &str,
) -> Replacements {
    let modern_api = game.framework_version >= MODERN_API;

    [
        ("GAME_DIR", xml_escape(&game.path.display().to_string())),
        ("GAME_DEV", csharp_escape(&game.game_developer)),
        ("GAME_NAME", csharp_escape(&game.game_name)),
        ("FRAMEWORK_VER", game.backend.target_framework().to_string()),
        ("AUTHOR", csharp_escape(author)),
        ("PROJ_REFERENCES", game::render_msbuild_items(references)),
        (
            "INIT_METHOD_NAME",
            if modern_api {
                "OnInitializeMelon"
            } else {
                "OnApplicationStart"
            }
            .to_string(),
        ),
        (
            "IMPLICIT_USINGS",
            if modern_api { "enable" } else { "disable" }.to_string(),
        ),
        ("MOD_NAME", mod_name.to_string()),
        ("NAMESPACE", mod_name.to_string()),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value))
    .collect()
}

/// Everything needed to create one project
#[derive(Debug, Clone)]
pub struct ProjectRequest {
    pub game: GameInfo,
    pub mod_name: String,
    pub author: String,
    /// Parent folder; the project goes into `<output_dir>/<mod_name>`
    pub output_dir: PathBuf,
    pub overwrite: bool,
}

impl ProjectRequest {
    pub fn project_dir(&self) -> PathBuf {
        self.output_dir.join(&self.mod_name)
    }
}

/// Outcome of a successful project creation
#[derive(Debug, Clone)]
pub struct CreatedProject {
    pub path: PathBuf,
    pub files: Vec<String>,
    pub references: Vec<PathBuf>,
    /// Template placeholders that had no value
    pub missing_keys: Vec<String>,
}

/// Render `template` for the requested game and write it to disk
pub async fn create_project(
    template: &LoadedTemplate,
    request: &ProjectRequest,
) -> Result<CreatedProject> {
    validate_mod_name(&request.mod_name)?;

    let references = game::resolve(&request.game);
    let replacements =
        build_replacements(&request.game, &references, &request.mod_name, &request.author);

    let rendered = templates::render_tree(
        &template.tree,
        &replacements,
        &template.manifest.rename_token,
        &request.mod_name,
    )?;

    let path = request.project_dir();
    let files = templates::write_tree(&rendered.tree, &path, request.overwrite).await?;

    tracing::info!(
        project = %path.display(),
        files = files.len(),
        references = references.len(),
        "created project"
    );

    Ok(CreatedProject {
        path,
        files,
        references,
        missing_keys: rendered.missing_keys,
    })
}

/// Open a created project with the system's default handler
pub fn open_project(path: &Path) -> Result<()> {
    open::that(path)?;
    Ok(())
}
