//! Build pipeline for the Quill static site engine.
//!
//! This crate provides:
//! - [`Builder`]: build coordinator wiring storage, routes and plugins
//! - [`Route`] and [`Plugin`]: the traits sites extend the build with
//! - [`PageBuilder`]: front-matter parsing and explode-mode page splitting
//! - [`Resolver`]: web path enumeration and path-to-page resolution
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), quill_site::BuildError> {
//! use std::path::Path;
//!
//! use quill_config::Config;
//! use quill_site::Builder;
//!
//! let config = Config::default_with_base(Path::new("."));
//! let summary = Builder::new(config).build(None)?;
//! println!("{} pages in {:.0}ms", summary.page_count, summary.elapsed_ms);
//! # Ok(())
//! # }
//! ```

mod builder;
mod error;
mod lifecycle;
mod page;
mod plugin;
pub mod plugins;
mod resolver;
mod route;
mod shell;
pub mod sitemap;
mod slug;
mod store;
pub mod web_path;

pub use builder::{BuildSummary, Builder};
pub use error::BuildError;
pub use lifecycle::{Phase, PhaseOutput, PluginTiming, run_phase};
pub use page::{DEFAULT_LAYOUT, Page, PageBuilder, PageError};
pub use plugin::{
    CORE_PREFIX, Fragments, HookOutcome, Plugin, PluginContext, PluginError, RenderData,
};
pub use plugins::core_plugins;
pub use resolver::{Resolver, parse_path_filter};
pub use route::{
    Route, RouteContext, RouteError, RouteMatch, RouteParams, expand_pattern, match_path,
};
pub use shell::Shell;
pub use sitemap::SitemapEntry;
pub use slug::{SlugCounter, slugify};
pub use store::PageStore;
