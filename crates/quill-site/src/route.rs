//! Declared routes and pattern matching.
//!
//! A route pattern is a `/`-separated sequence of segments; a segment
//! prefixed with `$` captures the corresponding path segment under that
//! name. Routes are declared before a build starts and stay immutable for
//! its duration.

use std::collections::HashMap;

use quill_config::Config;
use quill_storage::Storage;

use crate::page::{Page, PageBuilder};
use crate::web_path;

/// Error type route handlers may fail with.
pub type RouteError = Box<dyn std::error::Error + Send + Sync>;

/// Parameters captured from a route pattern.
pub type RouteParams = HashMap<String, String>;

/// A successful pattern match for one requested path.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// Captured parameters, keyed by `$` segment name.
    pub params: RouteParams,
    /// The concrete web path that matched.
    pub path: String,
}

/// Shared context handed to route handlers.
pub struct RouteContext<'a> {
    /// Validated site configuration.
    pub config: &'a Config,
    /// Storage backend.
    pub storage: &'a dyn Storage,
    /// Markdown page builder, for routes sourcing content from markdown.
    pub pages: &'a PageBuilder,
}

/// A configured path pattern with a handler producing pages.
///
/// Which optional capabilities a route has is expressed by overriding the
/// default method bodies: a route without [`path_params`](Route::path_params)
/// contributes its pattern as a literal path.
pub trait Route: Send + Sync {
    /// The route's path pattern.
    fn pattern(&self) -> &str;

    /// Produce the page for a matched path, or `None` to decline.
    ///
    /// # Errors
    ///
    /// Handler failures are isolated by the resolver: they are logged and
    /// the route contributes nothing for that path.
    fn page(
        &self,
        route_match: &RouteMatch,
        ctx: &RouteContext<'_>,
    ) -> Result<Option<Page>, RouteError>;

    /// Parameter mappings enumerating this route's concrete paths.
    ///
    /// `None` (the default) means the pattern itself is a concrete path.
    /// An empty list means the route currently enumerates no paths.
    ///
    /// # Errors
    ///
    /// Enumeration failures are isolated by the resolver: they are logged
    /// and the route contributes no paths.
    fn path_params(&self, _ctx: &RouteContext<'_>) -> Result<Option<Vec<RouteParams>>, RouteError> {
        Ok(None)
    }
}

/// Match a requested web path against a pattern.
///
/// Segment counts must be equal; a `$` segment matches any value and binds
/// it, every other segment must match literally.
#[must_use]
pub fn match_path(pattern: &str, path: &str) -> Option<RouteParams> {
    let pattern_segments: Vec<&str> = segments(pattern);
    let path_segments: Vec<&str> = segments(path);
    if pattern_segments.len() != path_segments.len() {
        return None;
    }

    let mut params = RouteParams::new();
    for (pattern_segment, path_segment) in pattern_segments.iter().zip(&path_segments) {
        if let Some(name) = pattern_segment.strip_prefix('$') {
            params.insert(name.to_owned(), (*path_segment).to_owned());
        } else if pattern_segment != path_segment {
            return None;
        }
    }
    Some(params)
}

/// Substitute `$name` segments in a pattern with values from `params`.
///
/// Segments without a corresponding parameter are left as-is.
#[must_use]
pub fn expand_pattern(pattern: &str, params: &RouteParams) -> String {
    let expanded: Vec<&str> = segments(pattern)
        .into_iter()
        .map(|segment| match segment.strip_prefix('$') {
            Some(name) => params.get(name).map_or(segment, String::as_str),
            None => segment,
        })
        .collect();
    web_path::normalize(&expanded.join("/"))
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}
