//! Build coordination.
//!
//! [`Builder`] owns the collaborators a build needs and sequences the
//! phases: setup, then path and page resolution, then build, then render.
//! The render phase receives the resolved pages, the sitemap, and every
//! head/script fragment accumulated during setup and build.

use std::sync::Arc;
use std::time::Instant;

use quill_config::Config;
use quill_renderer::{CmarkRenderer, Markdown};
use quill_storage::{FsStorage, Storage};

use crate::error::BuildError;
use crate::lifecycle::{Phase, elapsed_ms, run_phase};
use crate::page::PageBuilder;
use crate::plugin::{Plugin, PluginContext, RenderData};
use crate::plugins::core_plugins;
use crate::resolver::{Resolver, parse_path_filter};
use crate::route::Route;
use crate::shell::Shell;
use crate::sitemap;

/// Result of a completed build.
#[derive(Debug, Clone, Copy)]
pub struct BuildSummary {
    /// Number of pages resolved and handed to the render phase.
    pub page_count: usize,
    /// Wall time for the whole build in milliseconds.
    pub elapsed_ms: f64,
}

/// Coordinates one site build end to end.
///
/// Core plugins are registered ahead of user plugins, so user plugins
/// observe whatever the core suite set up.
pub struct Builder {
    config: Config,
    storage: Arc<dyn Storage>,
    renderer: Arc<dyn Markdown>,
    routes: Vec<Box<dyn Route>>,
    plugins: Vec<Box<dyn Plugin>>,
    shell: Shell,
}

impl Builder {
    /// Create a builder with the default collaborators: filesystem
    /// storage, the pulldown-cmark renderer, and the core plugin suite.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            storage: Arc::new(FsStorage::new()),
            renderer: Arc::new(CmarkRenderer::new()),
            routes: Vec::new(),
            plugins: core_plugins(),
            shell: Shell::new(),
        }
    }

    /// Replace the storage backend.
    #[must_use]
    pub fn with_storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.storage = storage;
        self
    }

    /// Replace the markdown renderer.
    #[must_use]
    pub fn with_renderer(mut self, renderer: impl Markdown + 'static) -> Self {
        self.renderer = Arc::new(renderer);
        self
    }

    /// Declare a route.
    #[must_use]
    pub fn with_route(mut self, route: impl Route + 'static) -> Self {
        self.routes.push(Box::new(route));
        self
    }

    /// Register a user plugin after the core suite.
    #[must_use]
    pub fn with_plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Run one build.
    ///
    /// With `paths` set, only that comma-separated subset of web paths is
    /// resolved; otherwise the full site is enumerated.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] when a plugin hook fails or storage fails
    /// outside the per-route/per-file isolation boundaries.
    pub fn build(&self, paths: Option<&str>) -> Result<BuildSummary, BuildError> {
        let start = Instant::now();
        match paths {
            Some(filter) => tracing::info!(paths = filter, "Rebuilding"),
            None => tracing::info!("Building"),
        }

        if self.config.build_resolved.clean {
            self.storage
                .remove_tree(&self.config.build_resolved.output_dir)?;
        }

        let ctx = PluginContext {
            config: &self.config,
            storage: self.storage.as_ref(),
            shell: &self.shell,
        };

        let setup = run_phase(Phase::Setup, &self.plugins, |plugin| plugin.on_setup(&ctx))?;

        let page_builder = PageBuilder::new(Arc::clone(&self.renderer));
        let resolver = Resolver::new(
            &self.config,
            self.storage.as_ref(),
            &self.routes,
            &page_builder,
        );
        let requested = match paths {
            Some(filter) => parse_path_filter(filter),
            None => resolver.enumerate_paths()?,
        };
        let store = resolver.resolve(&requested)?;
        let entries = sitemap::assemble(store.pages());

        let build = run_phase(Phase::Build, &self.plugins, |plugin| plugin.on_build(&ctx))?;

        let mut fragments = setup.fragments;
        fragments.extend(build.fragments);

        let data = RenderData {
            pages: store.pages(),
            sitemap: &entries,
            fragments: &fragments,
        };
        run_phase(Phase::Render, &self.plugins, |plugin| {
            plugin.on_render(&ctx, &data)
        })?;

        let summary = BuildSummary {
            page_count: store.len(),
            elapsed_ms: elapsed_ms(start),
        };
        tracing::info!(
            pages = summary.page_count,
            elapsed_ms = summary.elapsed_ms,
            "Build finished"
        );
        Ok(summary)
    }
}
