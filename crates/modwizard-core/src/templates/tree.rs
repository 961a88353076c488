//! In-memory template file trees

use std::collections::BTreeMap;

/// Template files keyed by `/`-separated relative path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateTree {
    files: BTreeMap<String, Vec<u8>>,
}

impl TemplateTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a file, normalizing separators. Returns false for paths that
    /// are absolute or escape the tree.
    pub fn insert(&mut self, path: &str, contents: Vec<u8>) -> bool {
        match normalize(path) {
            Some(path) => {
                self.files.insert(path, contents);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    pub fn remove(&mut self, path: &str) -> Option<Vec<u8>> {
        self.files.remove(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.files.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn normalize(path: &str) -> Option<String> {
    let path = path.replace('\\', "/");
    if path.starts_with('/') || path.contains(':') {
        return None;
    }

    let mut components = Vec::new();
    for component in path.split('/') {
        match component {
            "" | "." => continue,
            ".." => return None,
            other => components.push(other),
        }
    }

    if components.is_empty() {
        None
    } else {
        Some(components.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_normalizes_separators() {
        let mut tree = TemplateTree::new();
        assert!(tree.insert(".\\MyMod\\Core.cs", b"x".to_vec()));
        assert_eq!(tree.paths().collect::<Vec<_>>(), vec!["MyMod/Core.cs"]);
    }

    #[test]
    fn test_insert_rejects_escaping_paths() {
        let mut tree = TemplateTree::new();
        assert!(!tree.insert("../evil.cs", Vec::new()));
        assert!(!tree.insert("/etc/passwd", Vec::new()));
        assert!(!tree.insert("C:/Windows/x", Vec::new()));
        assert!(!tree.insert("", Vec::new()));
        assert!(tree.is_empty());
    }

    #[test]
    fn test_iteration_is_sorted() {
        let mut tree = TemplateTree::new();
        tree.insert("b.txt", Vec::new());
        tree.insert("a/z.txt", Vec::new());
        tree.insert("a.txt", Vec::new());
        assert_eq!(
            tree.paths().collect::<Vec<_>>(),
            vec!["a.txt", "a/z.txt", "b.txt"]
        );
    }
}
