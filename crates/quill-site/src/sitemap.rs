//! Sitemap assembly.

use serde::Serialize;

use crate::page::Page;
use crate::web_path;

/// A navigable entry derived 1:1 from a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SitemapEntry {
    /// Web path of the page.
    pub path: String,
    /// Page title, possibly empty.
    pub title: String,
}

/// Derive sitemap entries from pages, shallowest paths first.
///
/// Sorted ascending by the count of non-empty `/` segments; the sort is
/// stable, so equal depths keep the pages' insertion order.
#[must_use]
pub fn assemble(pages: &[Page]) -> Vec<SitemapEntry> {
    let mut entries: Vec<SitemapEntry> = pages
        .iter()
        .map(|page| SitemapEntry {
            path: page.path.clone(),
            title: page.title.clone(),
        })
        .collect();
    entries.sort_by_key(|entry| web_path::depth(&entry.path));
    entries
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn page(path: &str) -> Page {
        Page::new(path, "")
    }

    #[test]
    fn test_sorts_by_depth() {
        let pages = vec![page("/a/b"), page("/a"), page("/a/b/c")];

        let entries = assemble(&pages);

        let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["/a", "/a/b", "/a/b/c"]);
    }

    #[test]
    fn test_equal_depth_keeps_input_order() {
        let pages = vec![page("/b"), page("/a"), page("/c")];

        let entries = assemble(&pages);

        let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["/b", "/a", "/c"]);
    }

    #[test]
    fn test_entry_per_page_with_title() {
        let pages = vec![page("/a").with_title("A"), page("/b")];

        let entries = assemble(&pages);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "A");
        assert_eq!(entries[1].title, "");
    }

    #[test]
    fn test_root_sorts_first() {
        let pages = vec![page("/docs/intro"), page("/")];

        let entries = assemble(&pages);

        assert_eq!(entries[0].path, "/");
    }
}
