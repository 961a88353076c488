//! Modwizard Core - scaffolding MelonLoader mod projects from an installed game
//!
//! Given a game executable, the library works out whether the game is a
//! Unity title with MelonLoader installed, which runtime backend it uses,
//! and which MelonLoader version is present. From that it computes the
//! assemblies a new mod project must reference and renders a project
//! template with those references filled in.
//!
//! # Architecture
//!
//! - **Layer 1: Core Operations** - Game inspection, reference resolution,
//!   template loading and pure rendering
//! - **Layer 2: Workflow Orchestration** - `ProductConfig`, `WizardSettings`
//!   and `project::create_project` for custom front ends
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use modwizard_core::{game, project, templates::TemplateSource};
//!
//! let info = game::inspect(Path::new("C:/Games/Foo/Foo.exe"))?;
//! let template = TemplateSource::Embedded.load("my-tool").await?;
//! let created = project::create_project(&template, &ProjectRequest {
//!     game: info,
//!     mod_name: "FooMod".into(),
//!     author: "me".into(),
//!     output_dir: "C:/src".into(),
//!     overwrite: false,
//! }).await?;
//! ```

pub mod config;
pub mod error;
pub mod game;
pub mod product;
pub mod project;
pub mod report;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::WizardSettings;
pub use error::WizardError;
pub use game::{inspect, resolve, FrameworkVersion, GameInfo, RuntimeBackend};
pub use product::ProductConfig;
pub use project::{create_project, CreatedProject, ProjectRequest};
pub use templates::{LoadedTemplate, TemplateSource};

#[cfg(feature = "tui")]
pub use tui::run;
