//! Template compatibility with the running CLI

use super::manifest::TemplateManifest;
use semver::Version;

/// Warning text when the template asks for a newer CLI than `cli_version`
pub fn check_compatibility(
    cli_version: &str,
    manifest: &TemplateManifest,
    upgrade_command: &str,
) -> Option<String> {
    let required = manifest.version.as_deref()?;

    // Unparsable versions on either side skip the check
    let cli_ver = parse_version(cli_version)?;
    let template_ver = parse_version(required)?;

    (cli_ver < template_ver).then(|| {
        format!(
            "Template '{}' was written for CLI version {} or newer, you are running {}. \
             Consider updating: {}",
            manifest.name, template_ver, cli_ver, upgrade_command
        )
    })
}

fn parse_version(text: &str) -> Option<Version> {
    let cleaned = text.trim();
    Version::parse(cleaned.strip_prefix('v').unwrap_or(cleaned)).ok()
}
