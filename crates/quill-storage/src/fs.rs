//! Filesystem-backed storage.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::storage::{Storage, StorageError};

const BACKEND: &str = "Fs";

/// Storage backend reading and writing the local filesystem.
///
/// Stateless: every call hits the disk directly, so concurrent readers see a
/// consistent view of whatever is on disk at that moment.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsStorage;

impl FsStorage {
    /// Create a filesystem storage backend.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Collect every regular file under `dir`, depth first.
///
/// Directory entries are visited in name order so the walk is deterministic
/// across platforms. Hidden entries (leading dot) are skipped.
fn walk(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), StorageError> {
    let mut entries: Vec<fs::DirEntry> = fs::read_dir(dir)
        .map_err(|e| StorageError::io(e, Some(dir.to_path_buf())).with_backend(BACKEND))?
        .collect::<Result<_, _>>()
        .map_err(|e| StorageError::io(e, Some(dir.to_path_buf())).with_backend(BACKEND))?;
    entries.sort_by_key(fs::DirEntry::file_name);

    for entry in entries {
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let file_type = entry
            .file_type()
            .map_err(|e| StorageError::io(e, Some(entry.path())).with_backend(BACKEND))?;
        if file_type.is_dir() {
            walk(&entry.path(), out)?;
        } else if file_type.is_file() {
            out.push(entry.path());
        }
    }

    Ok(())
}

fn create_parent_dirs(path: &Path) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| StorageError::io(e, Some(parent.to_path_buf())).with_backend(BACKEND))?;
    }
    Ok(())
}

impl Storage for FsStorage {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_text(&self, path: &Path) -> Result<String, StorageError> {
        trace!(path = %path.display(), "reading file");
        fs::read_to_string(path)
            .map_err(|e| StorageError::io(e, Some(path.to_path_buf())).with_backend(BACKEND))
    }

    fn glob(&self, root: &Path, patterns: &[&str]) -> Result<Vec<PathBuf>, StorageError> {
        if !root.is_dir() {
            return Ok(Vec::new());
        }

        let compiled: Vec<glob::Pattern> = patterns
            .iter()
            .map(|p| glob::Pattern::new(p).map_err(|e| StorageError::pattern(e, p)))
            .collect::<Result<_, _>>()?;

        // `*` must not cross directory boundaries; `**` handles recursion.
        let options = glob::MatchOptions {
            require_literal_separator: true,
            ..glob::MatchOptions::new()
        };

        let mut files = Vec::new();
        walk(root, &mut files)?;

        let mut matched: Vec<PathBuf> = files
            .into_iter()
            .filter(|path| {
                path.strip_prefix(root).is_ok_and(|rel| {
                    compiled.iter().any(|p| p.matches_path_with(rel, options))
                })
            })
            .collect();
        matched.sort();

        trace!(root = %root.display(), count = matched.len(), "glob matched files");
        Ok(matched)
    }

    fn copy_file(&self, src: &Path, dst: &Path) -> Result<(), StorageError> {
        create_parent_dirs(dst)?;
        fs::copy(src, dst)
            .map_err(|e| StorageError::io(e, Some(src.to_path_buf())).with_backend(BACKEND))?;
        Ok(())
    }

    fn copy_tree(&self, src: &Path, dst: &Path) -> Result<(), StorageError> {
        fs::create_dir_all(dst)
            .map_err(|e| StorageError::io(e, Some(dst.to_path_buf())).with_backend(BACKEND))?;

        let entries = fs::read_dir(src)
            .map_err(|e| StorageError::io(e, Some(src.to_path_buf())).with_backend(BACKEND))?;
        for entry in entries {
            let entry = entry
                .map_err(|e| StorageError::io(e, Some(src.to_path_buf())).with_backend(BACKEND))?;
            let file_type = entry
                .file_type()
                .map_err(|e| StorageError::io(e, Some(entry.path())).with_backend(BACKEND))?;
            let target = dst.join(entry.file_name());
            if file_type.is_dir() {
                self.copy_tree(&entry.path(), &target)?;
            } else if file_type.is_file() {
                self.copy_file(&entry.path(), &target)?;
            }
        }

        Ok(())
    }

    fn write_text(&self, path: &Path, text: &str) -> Result<(), StorageError> {
        create_parent_dirs(path)?;
        fs::write(path, text)
            .map_err(|e| StorageError::io(e, Some(path.to_path_buf())).with_backend(BACKEND))
    }

    fn remove_tree(&self, path: &Path) -> Result<(), StorageError> {
        if !path.exists() {
            return Ok(());
        }
        fs::remove_dir_all(path)
            .map_err(|e| StorageError::io(e, Some(path.to_path_buf())).with_backend(BACKEND))
    }
}
