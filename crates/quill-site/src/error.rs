//! Build-fatal error type.
//!
//! Per-route and per-file failures during resolution are logged and
//! skipped, never surfaced here. Only failures that abort the whole
//! build become a [`BuildError`].

use quill_storage::StorageError;

use crate::lifecycle::Phase;
use crate::plugin::PluginError;

/// A failure that aborts the build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// A plugin hook failed.
    #[error("plugin {plugin} failed during {phase}: {source}")]
    Plugin {
        /// Phase the hook was invoked in.
        phase: Phase,
        /// Name of the failing plugin.
        plugin: String,
        /// The hook's error.
        #[source]
        source: PluginError,
    },

    /// Storage failed outside the per-unit isolation boundaries.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_error_names_phase_and_plugin() {
        let err = BuildError::Plugin {
            phase: Phase::Render,
            plugin: "core-pages".to_owned(),
            source: "disk full".into(),
        };
        assert_eq!(
            err.to_string(),
            "plugin core-pages failed during render: disk full"
        );
    }

    #[test]
    fn test_storage_error_is_transparent() {
        let err = BuildError::from(StorageError::not_found("/missing"));
        assert_eq!(err.to_string(), "Not found (path: /missing)");
    }
}
