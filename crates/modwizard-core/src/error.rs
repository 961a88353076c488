//! Error types for project scaffolding.
//!
//! [`WizardError`] covers the failures the core layer can detect itself.
//! Orchestration code wraps them in `anyhow::Error` and lets them travel to
//! the single top-level handler in the prompt flow.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for scaffolding operations.
#[derive(Debug, Error)]
pub enum WizardError {
    /// The selected executable is not a Unity game with MelonLoader installed.
    #[error("{message}")]
    InvalidLayout { path: PathBuf, message: String },

    /// Mod names become C# identifiers and file names.
    #[error("Invalid mod name '{name}'. Use only letters, numbers, and underscores.")]
    InvalidModName { name: String },

    /// A selection prompt was dismissed.
    #[error("Project creation cancelled.")]
    UserCancelled,

    /// Refusing to scaffold over existing files.
    #[error("Target directory is not empty: {}", path.display())]
    TargetNotEmpty { path: PathBuf },

    /// Template could not be loaded or parsed.
    #[error("Template error: {0}")]
    Template(String),

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WizardError {
    pub(crate) fn invalid_layout(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidLayout {
            path: path.into(),
            message: message.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error is a dismissed prompt rather than a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::UserCancelled)
    }
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, WizardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_layout_displays_message_verbatim() {
        let err = WizardError::invalid_layout(
            "/games/Foo",
            "MelonLoader is not installed in the selected game directory.",
        );
        assert_eq!(
            err.to_string(),
            "MelonLoader is not installed in the selected game directory."
        );
    }

    #[test]
    fn invalid_mod_name_mentions_name() {
        let err = WizardError::InvalidModName {
            name: "1bad".to_string(),
        };
        assert!(err.to_string().contains("'1bad'"));
    }

    #[test]
    fn cancelled_is_detected() {
        assert!(WizardError::UserCancelled.is_cancelled());
        assert!(!WizardError::Template("x".into()).is_cancelled());
    }

    #[test]
    fn target_not_empty_displays_path() {
        let err = WizardError::TargetNotEmpty {
            path: PathBuf::from("/tmp/MyMod"),
        };
        assert!(err.to_string().contains("/tmp/MyMod"));
    }
}
