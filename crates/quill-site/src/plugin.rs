//! Plugin contract.
//!
//! A plugin exposes a name and zero or more lifecycle hooks. Capability is
//! expressed by overriding the default method bodies: a hook left at its
//! default returns [`HookOutcome::Skipped`] and is not counted as having
//! run.

use quill_config::Config;
use quill_storage::Storage;

use crate::page::Page;
use crate::shell::Shell;
use crate::sitemap::SitemapEntry;

/// Error type plugin hooks may fail with.
pub type PluginError = Box<dyn std::error::Error + Send + Sync>;

/// Name prefix marking built-in plugins.
pub const CORE_PREFIX: &str = "core-";

/// Markup fragments plugins contribute to every rendered document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragments {
    /// Fragments appended inside `<head>`.
    pub heads: Vec<String>,
    /// Fragments appended before `</body>`.
    pub scripts: Vec<String>,
}

impl Fragments {
    /// Create an empty fragment set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a head fragment (builder style).
    #[must_use]
    pub fn with_head(mut self, fragment: impl Into<String>) -> Self {
        self.heads.push(fragment.into());
        self
    }

    /// Add a script fragment (builder style).
    #[must_use]
    pub fn with_script(mut self, fragment: impl Into<String>) -> Self {
        self.scripts.push(fragment.into());
        self
    }

    /// Append another fragment set, preserving order.
    pub fn extend(&mut self, other: Self) {
        self.heads.extend(other.heads);
        self.scripts.extend(other.scripts);
    }

    /// Whether no fragments have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heads.is_empty() && self.scripts.is_empty()
    }
}

/// What a hook invocation did.
#[derive(Debug, PartialEq, Eq)]
pub enum HookOutcome {
    /// The plugin does not implement this hook.
    Skipped,
    /// The hook ran, contributing zero or more fragments.
    Ran(Fragments),
}

impl HookOutcome {
    /// A ran outcome with no fragments.
    #[must_use]
    pub fn ran() -> Self {
        Self::Ran(Fragments::new())
    }
}

/// Shared context handed to every plugin hook.
pub struct PluginContext<'a> {
    /// Validated site configuration.
    pub config: &'a Config,
    /// Storage backend.
    pub storage: &'a dyn Storage,
    /// Shell command runner.
    pub shell: &'a Shell,
}

/// Resolved build products handed to render hooks.
pub struct RenderData<'a> {
    /// All resolved pages, in page-store insertion order.
    pub pages: &'a [Page],
    /// Sitemap entries, shallowest first.
    pub sitemap: &'a [SitemapEntry],
    /// Head and script fragments accumulated over setup and build.
    pub fragments: &'a Fragments,
}

/// A build pipeline extension.
pub trait Plugin: Send + Sync {
    /// Unique plugin name. Built-in plugins carry the `core-` prefix;
    /// user plugins must not.
    fn name(&self) -> &str;

    /// Runs before any content is generated or discovered.
    ///
    /// # Errors
    ///
    /// A hook failure aborts the whole build.
    fn on_setup(&self, _ctx: &PluginContext<'_>) -> Result<HookOutcome, PluginError> {
        Ok(HookOutcome::Skipped)
    }

    /// Runs after pages are resolved, before rendering.
    ///
    /// # Errors
    ///
    /// A hook failure aborts the whole build.
    fn on_build(&self, _ctx: &PluginContext<'_>) -> Result<HookOutcome, PluginError> {
        Ok(HookOutcome::Skipped)
    }

    /// Runs last, with the resolved pages, sitemap and fragments.
    ///
    /// # Errors
    ///
    /// A hook failure aborts the whole build.
    fn on_render(
        &self,
        _ctx: &PluginContext<'_>,
        _data: &RenderData<'_>,
    ) -> Result<HookOutcome, PluginError> {
        Ok(HookOutcome::Skipped)
    }
}
