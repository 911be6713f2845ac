//! Storage trait and error types.
//!
//! Provides the core [`Storage`] trait the build pipeline depends on, along
//! with [`StorageError`] for unified error handling across backends.
//!
//! All methods take plain filesystem paths; the mapping between web paths and
//! file paths is the engine's concern, not the storage layer's.

use std::path::{Path, PathBuf};

/// Semantic error categories.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// Resource does not exist.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// A glob pattern failed to parse.
    InvalidPattern,
    /// Other/unknown error category.
    Other,
}

/// Storage error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StorageError {
    /// Semantic error category.
    pub kind: StorageErrorKind,
    /// Path context (if applicable).
    pub path: Option<PathBuf>,
    /// Backend identifier (e.g., "Fs", "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    /// Create a new storage error.
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Downcast the source error to a concrete type.
    #[must_use]
    pub fn downcast_source<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.source.as_ref()?.downcast_ref()
    }

    /// Create a not found error with path.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::NotFound).with_path(path)
    }

    /// Create a storage error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: Option<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => StorageErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => StorageErrorKind::PermissionDenied,
            _ => StorageErrorKind::Other,
        };
        let mut error = Self::new(kind).with_source(err);
        if let Some(p) = path {
            error = error.with_path(p);
        }
        error
    }

    /// Create an error for a malformed glob pattern.
    #[must_use]
    pub fn pattern(err: glob::PatternError, pattern: &str) -> Self {
        Self::new(StorageErrorKind::InvalidPattern)
            .with_path(pattern)
            .with_source(err)
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (path: /foo/bar)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StorageErrorKind::NotFound => "Not found",
            StorageErrorKind::PermissionDenied => "Permission denied",
            StorageErrorKind::InvalidPattern => "Invalid pattern",
            StorageErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }

        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Filesystem operations the build pipeline depends on.
///
/// Kept deliberately narrow: existence checks and reads drive path
/// resolution, globbing drives content discovery, and the copy/write
/// operations are what the built-in plugins need to emit a site.
pub trait Storage: Send + Sync {
    /// Check whether a file or directory exists.
    ///
    /// Returns `false` on errors (treats errors as "doesn't exist").
    fn exists(&self, path: &Path) -> bool;

    /// Read a file as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file doesn't exist or can't be read.
    fn read_text(&self, path: &Path) -> Result<String, StorageError>;

    /// Enumerate regular files under `root` matching any of `patterns`.
    ///
    /// Patterns are relative to `root` (e.g. `**/*.md`). Hidden entries are
    /// skipped. Results are sorted lexicographically so discovery order is
    /// stable across platforms. A missing `root` yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if a pattern is malformed or the walk fails.
    fn glob(&self, root: &Path, patterns: &[&str]) -> Result<Vec<PathBuf>, StorageError>;

    /// Copy a single file, creating parent directories of `dst` as needed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if `src` doesn't exist or the copy fails.
    fn copy_file(&self, src: &Path, dst: &Path) -> Result<(), StorageError>;

    /// Recursively copy a directory tree.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if `src` doesn't exist or any copy fails.
    fn copy_tree(&self, src: &Path, dst: &Path) -> Result<(), StorageError>;

    /// Write UTF-8 text to a file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the write fails.
    fn write_text(&self, path: &Path, text: &str) -> Result<(), StorageError>;

    /// Recursively remove a directory tree. Removing a missing path is not
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the removal fails.
    fn remove_tree(&self, path: &Path) -> Result<(), StorageError>;
}
