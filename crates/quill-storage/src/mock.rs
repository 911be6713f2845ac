//! In-memory storage for tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::storage::{Storage, StorageError};

const BACKEND: &str = "Mock";

/// In-memory storage backend.
///
/// Holds a flat map from paths to file contents. Directories exist
/// implicitly: a path "exists" when any stored file lives under it.
#[derive(Debug, Default)]
pub struct MockStorage {
    files: RwLock<HashMap<PathBuf, String>>,
}

impl MockStorage {
    /// Create an empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file (builder style).
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.write().unwrap().insert(path.into(), content.into());
        self
    }

    /// Get a file's content, if present.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn file(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.read().unwrap().get(path.as_ref()).cloned()
    }

    /// All stored paths, sorted.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.files.read().unwrap().keys().cloned().collect();
        paths.sort();
        paths
    }
}

impl Storage for MockStorage {
    fn exists(&self, path: &Path) -> bool {
        self.files
            .read()
            .unwrap()
            .keys()
            .any(|k| k.starts_with(path))
    }

    fn read_text(&self, path: &Path) -> Result<String, StorageError> {
        self.files
            .read()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::not_found(path).with_backend(BACKEND))
    }

    fn glob(&self, root: &Path, patterns: &[&str]) -> Result<Vec<PathBuf>, StorageError> {
        let compiled: Vec<glob::Pattern> = patterns
            .iter()
            .map(|p| glob::Pattern::new(p).map_err(|e| StorageError::pattern(e, p)))
            .collect::<Result<_, _>>()?;

        let options = glob::MatchOptions {
            require_literal_separator: true,
            ..glob::MatchOptions::new()
        };

        let mut matched: Vec<PathBuf> = self
            .files
            .read()
            .unwrap()
            .keys()
            .filter(|path| {
                path.strip_prefix(root).is_ok_and(|rel| {
                    let hidden = rel
                        .components()
                        .any(|c| c.as_os_str().to_string_lossy().starts_with('.'));
                    !hidden && compiled.iter().any(|p| p.matches_path_with(rel, options))
                })
            })
            .cloned()
            .collect();
        matched.sort();

        Ok(matched)
    }

    fn copy_file(&self, src: &Path, dst: &Path) -> Result<(), StorageError> {
        let content = self.read_text(src)?;
        self.files
            .write()
            .unwrap()
            .insert(dst.to_path_buf(), content);
        Ok(())
    }

    fn copy_tree(&self, src: &Path, dst: &Path) -> Result<(), StorageError> {
        let copies: Vec<(PathBuf, String)> = self
            .files
            .read()
            .unwrap()
            .iter()
            .filter_map(|(path, content)| {
                path.strip_prefix(src)
                    .ok()
                    .map(|rel| (dst.join(rel), content.clone()))
            })
            .collect();

        if copies.is_empty() {
            return Err(StorageError::not_found(src).with_backend(BACKEND));
        }

        let mut files = self.files.write().unwrap();
        for (path, content) in copies {
            files.insert(path, content);
        }
        Ok(())
    }

    fn write_text(&self, path: &Path, text: &str) -> Result<(), StorageError> {
        self.files
            .write()
            .unwrap()
            .insert(path.to_path_buf(), text.to_owned());
        Ok(())
    }

    fn remove_tree(&self, path: &Path) -> Result<(), StorageError> {
        self.files.write().unwrap().retain(|k, _| !k.starts_with(path));
        Ok(())
    }
}
