//! Product configuration trait for CLI binaries
//!
//! The binary implements this trait to name itself, point at its
//! environment variables, and word the instructions shown after a project
//! has been created.

use crate::game::GameInfo;
use std::path::Path;

/// Configuration trait for the scaffolding CLI
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for CLI command, env vars)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Environment variable naming a local template directory
    fn template_dir_env(&self) -> &'static str;

    /// Environment variable naming a remote template zip URL
    fn template_url_env(&self) -> &'static str;

    /// Environment variable overriding the default author
    fn author_env(&self) -> &'static str;

    /// URL for framework documentation
    fn docs_url(&self) -> &'static str;

    /// Generate the "next steps" instructions after project creation
    fn next_steps(&self, project_dir: &Path, game: &GameInfo) -> Vec<String>;

    /// CLI description shown in help text
    fn cli_description(&self) -> &'static str;

    /// Upgrade/install command shown in version warnings
    fn upgrade_command(&self) -> &'static str;

    /// User agent string for HTTP requests
    fn user_agent(&self) -> &'static str {
        self.name()
    }
}
