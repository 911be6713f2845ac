//! Path enumeration and page resolution.
//!
//! Enumeration produces the complete set of web paths a full build must
//! visit: every declared route contributes its concrete paths, and every
//! markdown file under the content root contributes the path it maps to.
//! Resolution turns a requested path into page records, first through the
//! declared routes, then through a markdown lookup chain.
//!
//! Both passes fan out with per-item failure isolation: a broken route or
//! an unparseable markdown file is logged and contributes nothing, the
//! rest of the build continues. Results are merged into the page store at
//! the join point, route pages first, so a route always wins over a
//! markdown file resolving to the same path.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use quill_config::Config;
use quill_storage::Storage;
use rayon::prelude::*;

use crate::error::BuildError;
use crate::page::{Page, PageBuilder};
use crate::route::{Route, RouteContext, RouteMatch, expand_pattern, match_path};
use crate::store::PageStore;
use crate::web_path;

const MARKDOWN_PATTERNS: &[&str] = &["**/*.md", "**/*.mdx"];

/// File name marking a document meant to be split into sibling pages.
const EXPLODE_FILE: &str = "!index.md";

/// Parse a comma-separated path filter into normalized web paths.
///
/// Entries are trimmed; empty entries are dropped.
#[must_use]
pub fn parse_path_filter(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(web_path::normalize)
        .collect()
}

/// Pages gathered for one requested path.
#[derive(Debug, Default)]
struct ResolvedPath {
    route_pages: Vec<Page>,
    markdown_pages: Vec<Page>,
}

/// Resolves web paths into pages for one build.
pub struct Resolver<'a> {
    config: &'a Config,
    storage: &'a dyn Storage,
    routes: &'a [Box<dyn Route>],
    pages: &'a PageBuilder,
}

impl<'a> Resolver<'a> {
    /// Create a resolver over the build's routes and content root.
    #[must_use]
    pub fn new(
        config: &'a Config,
        storage: &'a dyn Storage,
        routes: &'a [Box<dyn Route>],
        pages: &'a PageBuilder,
    ) -> Self {
        Self {
            config,
            storage,
            routes,
            pages,
        }
    }

    fn content_dir(&self) -> &Path {
        &self.config.build_resolved.content_dir
    }

    fn route_context(&self) -> RouteContext<'a> {
        RouteContext {
            config: self.config,
            storage: self.storage,
            pages: self.pages,
        }
    }

    /// Enumerate every web path a full build must produce.
    ///
    /// Route paths come first, in declaration order, then paths derived
    /// from markdown files under the content root. Duplicates keep their
    /// first occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Storage`] when the content glob fails. Route
    /// enumeration failures are isolated, not returned.
    pub fn enumerate_paths(&self) -> Result<Vec<String>, BuildError> {
        let ctx = self.route_context();
        let route_paths: Vec<Vec<String>> = self
            .routes
            .par_iter()
            .map(|route| {
                let pattern = route.pattern();
                match route.path_params(&ctx) {
                    Ok(None) => vec![web_path::normalize(pattern)],
                    Ok(Some(mappings)) => mappings
                        .iter()
                        .map(|params| expand_pattern(pattern, params))
                        .collect(),
                    Err(error) => {
                        tracing::error!(pattern, %error, "Skipping route during path enumeration");
                        Vec::new()
                    }
                }
            })
            .collect();

        let files = self.storage.glob(self.content_dir(), MARKDOWN_PATTERNS)?;
        let markdown_paths = files.iter().map(|file| self.file_to_web_path(file));

        let mut seen = HashSet::new();
        let mut paths = Vec::new();
        for path in route_paths.into_iter().flatten().chain(markdown_paths) {
            if seen.insert(path.clone()) {
                paths.push(path);
            }
        }
        Ok(paths)
    }

    /// Resolve every requested path and merge the results into a page store.
    ///
    /// Paths resolve concurrently. At the join point route pages are merged
    /// first (later routes overwrite earlier ones at the same path), then
    /// markdown pages fill only still-vacant paths.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Storage`] when an existing markdown file fails
    /// to read. Per-route and per-file content failures are isolated.
    pub fn resolve(&self, paths: &[String]) -> Result<PageStore, BuildError> {
        let mut resolved: Vec<ResolvedPath> = paths
            .par_iter()
            .map(|path| self.resolve_path(path))
            .collect::<Result<_, _>>()?;

        let mut store = PageStore::new();
        for item in &mut resolved {
            for page in item.route_pages.drain(..) {
                store.insert(page);
            }
        }
        for item in &mut resolved {
            for page in item.markdown_pages.drain(..) {
                store.insert_if_vacant(page);
            }
        }
        Ok(store)
    }

    fn resolve_path(&self, path: &str) -> Result<ResolvedPath, BuildError> {
        let ctx = self.route_context();
        let mut resolved = ResolvedPath::default();

        for route in self.routes {
            let Some(params) = match_path(route.pattern(), path) else {
                continue;
            };
            let route_match = RouteMatch {
                params,
                path: path.to_owned(),
            };
            match route.page(&route_match, &ctx) {
                Ok(Some(mut page)) => {
                    // The handler does not get to relocate the page.
                    page.path = path.to_owned();
                    resolved.route_pages.push(page);
                }
                Ok(None) => {}
                Err(error) => {
                    tracing::error!(
                        pattern = route.pattern(),
                        path,
                        %error,
                        "Route failed to produce a page"
                    );
                }
            }
        }

        if resolved.route_pages.is_empty() {
            resolved.markdown_pages = self.markdown_pages(path)?;
        }

        Ok(resolved)
    }

    /// Build pages for a path from its markdown file, if one exists.
    ///
    /// An absent file is not an error. A file that exists but fails to
    /// parse is logged and skipped.
    fn markdown_pages(&self, path: &str) -> Result<Vec<Page>, BuildError> {
        let Some(file) = self.find_markdown_file(path) else {
            return Ok(Vec::new());
        };
        let raw_markdown = self.storage.read_text(&file)?;
        let explode = file.file_name().is_some_and(|name| name == EXPLODE_FILE);

        match self.pages.from_markdown(&raw_markdown, path, explode) {
            Ok(pages) => Ok(pages),
            Err(error) => {
                tracing::error!(file = %file.display(), %error, "Skipping markdown file");
                Ok(Vec::new())
            }
        }
    }

    /// Lookup chain: `index.md` under the path, then `<path>.md`, then
    /// `!index.md` in the path's parent directory.
    fn find_markdown_file(&self, path: &str) -> Option<PathBuf> {
        let index = self.content_path(path).join("index.md");
        if self.storage.exists(&index) {
            return Some(index);
        }

        let mut direct = self.content_path(path).into_os_string();
        direct.push(".md");
        let direct = PathBuf::from(direct);
        if self.storage.exists(&direct) {
            return Some(direct);
        }

        let exploded = self
            .content_path(&web_path::parent(path))
            .join(EXPLODE_FILE);
        if self.storage.exists(&exploded) {
            return Some(exploded);
        }

        None
    }

    fn content_path(&self, web_path: &str) -> PathBuf {
        let rel = web_path.trim_start_matches('/');
        if rel.is_empty() {
            self.content_dir().to_path_buf()
        } else {
            self.content_dir().join(rel)
        }
    }

    /// Derive the web path a content file serves.
    ///
    /// Strips the content-root prefix, the markdown extension, and a
    /// trailing `/index` segment, so `guides/setup.md` serves
    /// `/guides/setup` and `guides/index.md` serves `/guides`.
    fn file_to_web_path(&self, file: &Path) -> String {
        let rel = file.strip_prefix(self.content_dir()).unwrap_or(file);

        let mut path = String::new();
        for component in rel.components() {
            path.push('/');
            path.push_str(&component.as_os_str().to_string_lossy());
        }

        for extension in [".md", ".mdx"] {
            if path.ends_with(extension) {
                path.truncate(path.len() - extension.len());
                break;
            }
        }
        if path.ends_with("/index") {
            path.truncate(path.len() - "/index".len());
        }

        web_path::normalize(&path)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use quill_renderer::CmarkRenderer;
    use quill_storage::MockStorage;

    use super::*;
    use crate::route::{RouteError, RouteParams};

    struct StaticRoute;

    impl Route for StaticRoute {
        fn pattern(&self) -> &str {
            "/about"
        }

        fn page(
            &self,
            route_match: &RouteMatch,
            _ctx: &RouteContext<'_>,
        ) -> Result<Option<Page>, RouteError> {
            Ok(Some(Page::new(&route_match.path, "<p>About</p>")))
        }
    }

    struct BlogRoute;

    impl Route for BlogRoute {
        fn pattern(&self) -> &str {
            "/blog/$slug"
        }

        fn page(
            &self,
            route_match: &RouteMatch,
            _ctx: &RouteContext<'_>,
        ) -> Result<Option<Page>, RouteError> {
            let slug = &route_match.params["slug"];
            Ok(Some(Page::new(&route_match.path, format!("<p>{slug}</p>"))))
        }

        fn path_params(
            &self,
            _ctx: &RouteContext<'_>,
        ) -> Result<Option<Vec<RouteParams>>, RouteError> {
            Ok(Some(vec![
                RouteParams::from([("slug".to_owned(), "one".to_owned())]),
                RouteParams::from([("slug".to_owned(), "two".to_owned())]),
            ]))
        }
    }

    struct BrokenRoute {
        pattern: &'static str,
    }

    impl Route for BrokenRoute {
        fn pattern(&self) -> &str {
            self.pattern
        }

        fn page(
            &self,
            _route_match: &RouteMatch,
            _ctx: &RouteContext<'_>,
        ) -> Result<Option<Page>, RouteError> {
            Err("handler exploded".into())
        }

        fn path_params(
            &self,
            _ctx: &RouteContext<'_>,
        ) -> Result<Option<Vec<RouteParams>>, RouteError> {
            Err("enumeration exploded".into())
        }
    }

    fn test_config() -> Config {
        Config::default_with_base(Path::new("/site"))
    }

    fn page_builder() -> PageBuilder {
        PageBuilder::new(Arc::new(CmarkRenderer::new()))
    }

    fn resolve_with(
        config: &Config,
        storage: &MockStorage,
        routes: &[Box<dyn Route>],
        paths: &[&str],
    ) -> PageStore {
        let pages = page_builder();
        let resolver = Resolver::new(config, storage, routes, &pages);
        let paths: Vec<String> = paths.iter().map(|p| (*p).to_owned()).collect();
        resolver.resolve(&paths).unwrap()
    }

    #[test]
    fn test_parse_path_filter() {
        assert_eq!(parse_path_filter(" /a, b ,,/c/ "), vec!["/a", "/b", "/c"]);
        assert!(parse_path_filter("").is_empty());
    }

    #[test]
    fn test_enumerate_routes_then_markdown() {
        let config = test_config();
        let storage = MockStorage::new()
            .with_file("/site/pages/index.md", "# Home")
            .with_file("/site/pages/guides/setup.md", "# Setup");
        let routes: Vec<Box<dyn Route>> = vec![Box::new(StaticRoute), Box::new(BlogRoute)];
        let pages = page_builder();

        let resolver = Resolver::new(&config, &storage, &routes, &pages);
        let paths = resolver.enumerate_paths().unwrap();

        assert_eq!(
            paths,
            vec!["/about", "/blog/one", "/blog/two", "/guides/setup", "/"]
        );
    }

    #[test]
    fn test_enumerate_strips_extension_and_index() {
        let config = test_config();
        let storage = MockStorage::new()
            .with_file("/site/pages/index.md", "")
            .with_file("/site/pages/docs/index.md", "")
            .with_file("/site/pages/docs/faq.mdx", "");
        let routes: Vec<Box<dyn Route>> = Vec::new();
        let pages = page_builder();

        let resolver = Resolver::new(&config, &storage, &routes, &pages);
        let paths = resolver.enumerate_paths().unwrap();

        assert_eq!(paths, vec!["/docs/faq", "/docs", "/"]);
    }

    #[test]
    fn test_enumerate_keeps_exploded_marker_path() {
        let config = test_config();
        let storage = MockStorage::new().with_file("/site/pages/guides/!index.md", "# A");
        let routes: Vec<Box<dyn Route>> = Vec::new();
        let pages = page_builder();

        let resolver = Resolver::new(&config, &storage, &routes, &pages);
        let paths = resolver.enumerate_paths().unwrap();

        assert_eq!(paths, vec!["/guides/!index"]);
    }

    #[test]
    fn test_enumerate_dedups_first_occurrence() {
        let config = test_config();
        let storage = MockStorage::new().with_file("/site/pages/about.md", "# About");
        let routes: Vec<Box<dyn Route>> = vec![Box::new(StaticRoute)];
        let pages = page_builder();

        let resolver = Resolver::new(&config, &storage, &routes, &pages);
        let paths = resolver.enumerate_paths().unwrap();

        assert_eq!(paths, vec!["/about"]);
    }

    #[test]
    fn test_enumerate_isolates_route_failure() {
        let config = test_config();
        let storage = MockStorage::new();
        let routes: Vec<Box<dyn Route>> = vec![
            Box::new(BrokenRoute { pattern: "/boom" }),
            Box::new(StaticRoute),
        ];
        let pages = page_builder();

        let resolver = Resolver::new(&config, &storage, &routes, &pages);
        let paths = resolver.enumerate_paths().unwrap();

        assert_eq!(paths, vec!["/about"]);
    }

    #[test]
    fn test_resolve_route_page() {
        let config = test_config();
        let storage = MockStorage::new();
        let routes: Vec<Box<dyn Route>> = vec![Box::new(StaticRoute)];

        let store = resolve_with(&config, &storage, &routes, &["/about"]);

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("/about").unwrap().html, "<p>About</p>");
    }

    #[test]
    fn test_resolve_route_binds_params() {
        let config = test_config();
        let storage = MockStorage::new();
        let routes: Vec<Box<dyn Route>> = vec![Box::new(BlogRoute)];

        let store = resolve_with(&config, &storage, &routes, &["/blog/my-post"]);

        assert_eq!(store.get("/blog/my-post").unwrap().html, "<p>my-post</p>");
    }

    #[test]
    fn test_resolve_route_wins_over_markdown() {
        let config = test_config();
        let storage = MockStorage::new().with_file("/site/pages/about.md", "# From markdown");
        let routes: Vec<Box<dyn Route>> = vec![Box::new(StaticRoute)];

        let store = resolve_with(&config, &storage, &routes, &["/about"]);

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("/about").unwrap().html, "<p>About</p>");
    }

    #[test]
    fn test_resolve_markdown_index_file() {
        let config = test_config();
        let storage = MockStorage::new().with_file("/site/pages/docs/index.md", "# Docs");
        let routes: Vec<Box<dyn Route>> = Vec::new();

        let store = resolve_with(&config, &storage, &routes, &["/docs"]);

        let page = store.get("/docs").unwrap();
        assert_eq!(page.title, "Docs");
    }

    #[test]
    fn test_resolve_markdown_direct_file() {
        let config = test_config();
        let storage = MockStorage::new().with_file("/site/pages/docs.md", "# Docs");
        let routes: Vec<Box<dyn Route>> = Vec::new();

        let store = resolve_with(&config, &storage, &routes, &["/docs"]);

        assert!(store.get("/docs").is_some());
    }

    #[test]
    fn test_resolve_index_file_preferred_over_direct() {
        let config = test_config();
        let storage = MockStorage::new()
            .with_file("/site/pages/docs/index.md", "# From index")
            .with_file("/site/pages/docs.md", "# From direct");
        let routes: Vec<Box<dyn Route>> = Vec::new();

        let store = resolve_with(&config, &storage, &routes, &["/docs"]);

        assert_eq!(store.get("/docs").unwrap().title, "From index");
    }

    #[test]
    fn test_resolve_exploded_parent_fallback() {
        let config = test_config();
        let storage = MockStorage::new().with_file(
            "/site/pages/guides/!index.md",
            "# Alpha\n\nFirst.\n\n# Beta\n\nSecond.",
        );
        let routes: Vec<Box<dyn Route>> = Vec::new();

        let store = resolve_with(&config, &storage, &routes, &["/guides/alpha"]);

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("/guides/alpha").unwrap().title, "Alpha");
        assert_eq!(store.get("/guides/beta").unwrap().title, "Beta");
    }

    #[test]
    fn test_resolve_exploded_marker_path_explodes() {
        let config = test_config();
        let storage = MockStorage::new().with_file(
            "/site/pages/guides/!index.md",
            "# Alpha\n\nFirst.\n\n# Beta\n\nSecond.",
        );
        let routes: Vec<Box<dyn Route>> = Vec::new();

        let store = resolve_with(&config, &storage, &routes, &["/guides/!index"]);

        assert_eq!(store.len(), 2);
        assert!(store.get("/guides/alpha").is_some());
        assert!(store.get("/guides/beta").is_some());
        assert!(store.get("/guides/!index").is_none());
    }

    #[test]
    fn test_resolve_absence_is_not_failure() {
        let config = test_config();
        let storage = MockStorage::new();
        let routes: Vec<Box<dyn Route>> = Vec::new();

        let store = resolve_with(&config, &storage, &routes, &["/nothing"]);

        assert!(store.is_empty());
    }

    #[test]
    fn test_resolve_front_matter_failure_is_isolated() {
        let config = test_config();
        let storage = MockStorage::new()
            .with_file("/site/pages/bad.md", "---\ntitle: [unclosed\n---\n# Bad")
            .with_file("/site/pages/good.md", "# Good");
        let routes: Vec<Box<dyn Route>> = Vec::new();

        let store = resolve_with(&config, &storage, &routes, &["/bad", "/good"]);

        assert_eq!(store.len(), 1);
        assert!(store.get("/good").is_some());
    }

    #[test]
    fn test_resolve_failing_route_falls_back_to_markdown() {
        let config = test_config();
        let storage = MockStorage::new().with_file("/site/pages/docs/index.md", "# Docs");
        let routes: Vec<Box<dyn Route>> = vec![Box::new(BrokenRoute { pattern: "/docs" })];

        let store = resolve_with(&config, &storage, &routes, &["/docs"]);

        assert_eq!(store.get("/docs").unwrap().title, "Docs");
    }

    #[test]
    fn test_resolve_route_page_path_is_forced() {
        struct RelocatingRoute;

        impl Route for RelocatingRoute {
            fn pattern(&self) -> &str {
                "/about"
            }

            fn page(
                &self,
                _route_match: &RouteMatch,
                _ctx: &RouteContext<'_>,
            ) -> Result<Option<Page>, RouteError> {
                Ok(Some(Page::new("/elsewhere", "<p>About</p>")))
            }
        }

        let config = test_config();
        let storage = MockStorage::new();
        let routes: Vec<Box<dyn Route>> = vec![Box::new(RelocatingRoute)];

        let store = resolve_with(&config, &storage, &routes, &["/about"]);

        assert!(store.get("/elsewhere").is_none());
        assert!(store.get("/about").is_some());
    }

    #[test]
    fn test_resolve_last_matching_route_wins() {
        struct FixedRoute {
            pattern: &'static str,
            html: &'static str,
        }

        impl Route for FixedRoute {
            fn pattern(&self) -> &str {
                self.pattern
            }

            fn page(
                &self,
                route_match: &RouteMatch,
                _ctx: &RouteContext<'_>,
            ) -> Result<Option<Page>, RouteError> {
                Ok(Some(Page::new(&route_match.path, self.html)))
            }
        }

        let config = test_config();
        let storage = MockStorage::new();
        let routes: Vec<Box<dyn Route>> = vec![
            Box::new(FixedRoute {
                pattern: "/about",
                html: "<p>first</p>",
            }),
            Box::new(FixedRoute {
                pattern: "/$any",
                html: "<p>second</p>",
            }),
        ];

        let store = resolve_with(&config, &storage, &routes, &["/about"]);

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("/about").unwrap().html, "<p>second</p>");
    }
}
