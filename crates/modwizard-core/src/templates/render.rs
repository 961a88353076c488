//! Placeholder substitution and renaming over a template tree
//!
//! Text files may contain `$KEY$` tokens, replaced literally from the
//! replacement map. Unknown keys render as an empty string and are reported
//! back to the caller. Path components containing the rename token get the
//! project name instead.

use super::tree::TemplateTree;
use crate::error::WizardError;
use regex::{Captures, Regex};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

/// Placeholder key to replacement value
pub type Replacements = BTreeMap<String, String>;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(\w+)\$").expect("placeholder pattern is valid"));

/// Result of rendering a template tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTemplate {
    pub tree: TemplateTree,
    /// Placeholders with no replacement, sorted and de-duplicated
    pub missing_keys: Vec<String>,
}

/// Replace `$KEY$` tokens in `content`, collecting keys with no replacement
pub fn substitute_placeholders(
    content: &str,
    replacements: &Replacements,
    missing: &mut BTreeSet<String>,
) -> String {
    PLACEHOLDER
        .replace_all(content, |caps: &Captures<'_>| {
            let key = &caps[1];
            match replacements.get(key) {
                Some(value) => value.clone(),
                None => {
                    missing.insert(key.to_string());
                    String::new()
                }
            }
        })
        .into_owned()
}

/// Replace every occurrence of `token` in each path component
pub fn rename_path(path: &str, token: &str, project_name: &str) -> String {
    if token.is_empty() {
        return path.to_string();
    }
    path.split('/')
        .map(|component| component.replace(token, project_name))
        .collect::<Vec<_>>()
        .join("/")
}

/// Render a whole tree. UTF-8 files get placeholder substitution; anything
/// else is carried over byte for byte. Fails if two files rename to the same
/// path or a renamed path is not a safe relative path.
pub fn render_tree(
    tree: &TemplateTree,
    replacements: &Replacements,
    rename_token: &str,
    project_name: &str,
) -> Result<RenderedTemplate, WizardError> {
    let mut missing = BTreeSet::new();
    let mut rendered = TemplateTree::new();

    for (path, contents) in tree.iter() {
        let target = rename_path(path, rename_token, project_name);
        let output = match std::str::from_utf8(contents) {
            Ok(text) => substitute_placeholders(text, replacements, &mut missing).into_bytes(),
            Err(_) => contents.to_vec(),
        };

        let count = rendered.len();
        if !rendered.insert(&target, output) {
            return Err(WizardError::Template(format!(
                "Template file '{}' renames to unsafe path '{}'",
                path, target
            )));
        }
        if rendered.len() == count {
            return Err(WizardError::Template(format!(
                "Template files collide at '{}' after renaming '{}'",
                target, path
            )));
        }
    }

    for key in &missing {
        tracing::warn!(key = %key, "template placeholder has no replacement");
    }

    Ok(RenderedTemplate {
        tree: rendered,
        missing_keys: missing.into_iter().collect(),
    })
}
