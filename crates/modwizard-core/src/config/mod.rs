//! Settings resolved once at startup and injected into the core
//!
//! Nothing below the CLI layer reads the process environment; the author
//! name and template source are decided here and passed down.

use crate::product::ProductConfig;
use crate::templates::TemplateSource;
use anyhow::Result;
use std::path::PathBuf;

/// Author used when nothing else is known
pub const FALLBACK_AUTHOR: &str = "Unknown";

/// Resolved settings for one scaffolding run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardSettings {
    pub author: String,
    pub template_source: TemplateSource,
    pub open_after: bool,
    pub overwrite: bool,
}

/// Raw overrides, usually from CLI flags
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub author: Option<String>,
    pub template_dir: Option<PathBuf>,
    pub template_url: Option<String>,
    pub open_after: bool,
    pub overwrite: bool,
}

impl WizardSettings {
    /// Resolve settings from overrides, then the process environment
    pub fn resolve<C: ProductConfig>(config: &C, overrides: SettingsOverrides) -> Result<Self> {
        Self::resolve_with(config, overrides, |key| std::env::var(key).ok())
    }

    /// Resolve settings using `lookup` in place of the process environment
    pub fn resolve_with<C, F>(config: &C, overrides: SettingsOverrides, lookup: F) -> Result<Self>
    where
        C: ProductConfig,
        F: Fn(&str) -> Option<String>,
    {
        let author = overrides
            .author
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| default_author(config, &lookup));

        let template_source = match (overrides.template_dir, overrides.template_url) {
            (Some(dir), _) => TemplateSource::Local(dir),
            (None, Some(url)) => TemplateSource::remote(&url)?,
            (None, None) => {
                if let Some(dir) = lookup(config.template_dir_env()) {
                    TemplateSource::Local(PathBuf::from(dir))
                } else if let Some(url) = lookup(config.template_url_env()) {
                    TemplateSource::remote(&url)?
                } else {
                    TemplateSource::Embedded
                }
            }
        };

        Ok(Self {
            author,
            template_source,
            open_after: overrides.open_after,
            overwrite: overrides.overwrite,
        })
    }
}

/// Product author variable, then the OS user name, then [`FALLBACK_AUTHOR`]
pub fn default_author<C, F>(config: &C, lookup: F) -> String
where
    C: ProductConfig,
    F: Fn(&str) -> Option<String>,
{
    [config.author_env(), "USERNAME", "USER"]
        .into_iter()
        .filter_map(|key| lookup(key))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .unwrap_or_else(|| FALLBACK_AUTHOR.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameInfo;
    use std::collections::HashMap;
    use std::path::Path;

    #[derive(Clone)]
    struct TestConfig;

    impl ProductConfig for TestConfig {
        fn name(&self) -> &'static str {
            "test"
        }
        fn display_name(&self) -> &'static str {
            "Test"
        }
        fn template_dir_env(&self) -> &'static str {
            "TEST_TEMPLATE_DIR"
        }
        fn template_url_env(&self) -> &'static str {
            "TEST_TEMPLATE_URL"
        }
        fn author_env(&self) -> &'static str {
            "TEST_AUTHOR"
        }
        fn docs_url(&self) -> &'static str {
            "https://example.com"
        }
        fn next_steps(&self, _dir: &Path, _game: &GameInfo) -> Vec<String> {
            Vec::new()
        }
        fn cli_description(&self) -> &'static str {
            "test"
        }
        fn upgrade_command(&self) -> &'static str {
            "upgrade"
        }
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_author_precedence() {
        assert_eq!(
            default_author(&TestConfig, env(&[("USER", "u"), ("TEST_AUTHOR", "a")])),
            "a"
        );
        assert_eq!(
            default_author(&TestConfig, env(&[("USER", "u"), ("USERNAME", "w")])),
            "w"
        );
        assert_eq!(default_author(&TestConfig, env(&[("USER", "u")])), "u");
        assert_eq!(default_author(&TestConfig, env(&[("USER", "  ")])), FALLBACK_AUTHOR);
    }

    #[test]
    fn test_explicit_author_wins() {
        let settings = WizardSettings::resolve_with(
            &TestConfig,
            SettingsOverrides {
                author: Some("Flag".to_string()),
                ..Default::default()
            },
            env(&[("TEST_AUTHOR", "Env")]),
        )
        .unwrap();
        assert_eq!(settings.author, "Flag");
    }

    #[test]
    fn test_template_source_defaults_to_embedded() {
        let settings =
            WizardSettings::resolve_with(&TestConfig, SettingsOverrides::default(), env(&[]))
                .unwrap();
        assert_eq!(settings.template_source, TemplateSource::Embedded);
        assert_eq!(settings.author, FALLBACK_AUTHOR);
    }

    #[test]
    fn test_template_source_from_environment() {
        let settings = WizardSettings::resolve_with(
            &TestConfig,
            SettingsOverrides::default(),
            env(&[("TEST_TEMPLATE_DIR", "/tmp/tpl")]),
        )
        .unwrap();
        assert_eq!(
            settings.template_source,
            TemplateSource::Local(PathBuf::from("/tmp/tpl"))
        );
    }

    #[test]
    fn test_template_flag_beats_environment() {
        let settings = WizardSettings::resolve_with(
            &TestConfig,
            SettingsOverrides {
                template_url: Some("https://example.com/t.zip".to_string()),
                ..Default::default()
            },
            env(&[("TEST_TEMPLATE_DIR", "/tmp/tpl")]),
        )
        .unwrap();
        assert!(matches!(settings.template_source, TemplateSource::Remote(_)));
    }

    #[test]
    fn test_invalid_template_url_is_an_error() {
        let result = WizardSettings::resolve_with(
            &TestConfig,
            SettingsOverrides {
                template_url: Some("::nope".to_string()),
                ..Default::default()
            },
            env(&[]),
        );
        assert!(result.is_err());
    }
}
