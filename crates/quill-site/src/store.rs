//! Insertion-ordered page store.

use std::collections::HashMap;

use crate::page::Page;

/// Pages keyed by web path, iterated in insertion order.
///
/// All merging happens through [`insert`](PageStore::insert) and
/// [`insert_if_vacant`](PageStore::insert_if_vacant), applied at the
/// resolver's join point in a fixed documented order, so precedence between
/// producers is a property of merge order rather than timing.
#[derive(Debug, Default)]
pub struct PageStore {
    pages: Vec<Page>,
    path_index: HashMap<String, usize>,
}

impl PageStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a page, overwriting any page already at the same path.
    ///
    /// An overwrite keeps the original insertion position.
    pub fn insert(&mut self, page: Page) {
        match self.path_index.get(&page.path) {
            Some(&i) => self.pages[i] = page,
            None => {
                self.path_index.insert(page.path.clone(), self.pages.len());
                self.pages.push(page);
            }
        }
    }

    /// Insert a page only if no page occupies its path yet.
    pub fn insert_if_vacant(&mut self, page: Page) {
        if !self.path_index.contains_key(&page.path) {
            self.insert(page);
        }
    }

    /// Get a page by web path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Page> {
        self.path_index.get(path).map(|&i| &self.pages[i])
    }

    /// Number of stored pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether the store holds no pages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Pages in insertion order.
    #[must_use]
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Consume the store, yielding pages in insertion order.
    #[must_use]
    pub fn into_pages(self) -> Vec<Page> {
        self.pages
    }
}
