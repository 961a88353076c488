//! Template manifest types and parsing

use serde::{Deserialize, Serialize};

/// Manifest file name at the template root; never copied into projects
pub const MANIFEST_FILE: &str = "template.yaml";

/// Name fragment replaced by the mod name in file and directory names
pub const DEFAULT_RENAME_TOKEN: &str = "MyMod";

fn default_rename_token() -> String {
    DEFAULT_RENAME_TOKEN.to_string()
}

/// Per-template manifest (`template.yaml`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateManifest {
    /// Display name of the template
    pub name: String,

    /// Description of what the template provides
    #[serde(default)]
    pub description: String,

    /// Minimum CLI version the template was written for
    #[serde(default)]
    pub version: Option<String>,

    /// Path fragment renamed to the mod name
    #[serde(default = "default_rename_token")]
    pub rename_token: String,
}

impl Default for TemplateManifest {
    fn default() -> Self {
        Self {
            name: "MelonLoader Mod".to_string(),
            description: String::new(),
            version: None,
            rename_token: default_rename_token(),
        }
    }
}

impl TemplateManifest {
    pub fn parse(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_manifest() {
        let manifest = TemplateManifest::parse(
            "name: Mod\ndescription: A mod\nversion: 0.2.0\nrename_token: TemplateMod\n",
        )
        .unwrap();
        assert_eq!(manifest.name, "Mod");
        assert_eq!(manifest.description, "A mod");
        assert_eq!(manifest.version.as_deref(), Some("0.2.0"));
        assert_eq!(manifest.rename_token, "TemplateMod");
    }

    #[test]
    fn test_rename_token_defaults() {
        let manifest = TemplateManifest::parse("name: Mod\n").unwrap();
        assert_eq!(manifest.rename_token, DEFAULT_RENAME_TOKEN);
        assert!(manifest.version.is_none());
    }

    #[test]
    fn test_missing_name_is_an_error() {
        assert!(TemplateManifest::parse("description: nameless\n").is_err());
    }
}
