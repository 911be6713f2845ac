//! Heading slugs.

use std::collections::HashMap;

/// Kebab-case a heading into a URL slug.
///
/// Alphanumerics are lowercased; every other run of characters collapses
/// into a single `-`. No leading or trailing dashes.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            for lower in c.to_lowercase() {
                slug.push(lower);
            }
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Tracks slug occurrences within one document.
///
/// The first use of a slug is returned unchanged; the Nth repeat gets a
/// `-N` suffix, so `a, a, a` claims `a, a-1, a-2`.
#[derive(Debug, Default)]
pub struct SlugCounter {
    seen: HashMap<String, usize>,
}

impl SlugCounter {
    /// Create an empty counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the next unique variant of `slug`.
    pub fn claim(&mut self, slug: &str) -> String {
        let count = self.seen.entry(slug.to_owned()).or_insert(0);
        let claimed = if *count == 0 {
            slug.to_owned()
        } else {
            format!("{slug}-{count}")
        };
        *count += 1;
        claimed
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Getting Started"), "getting-started");
        assert_eq!(slugify("FAQ & Tips"), "faq-tips");
        assert_eq!(slugify("  Spaced  Out  "), "spaced-out");
        assert_eq!(slugify("v2.0 Release"), "v2-0-release");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_slug_counter_first_use_unchanged() {
        let mut counter = SlugCounter::new();
        assert_eq!(counter.claim("a"), "a");
        assert_eq!(counter.claim("b"), "b");
    }

    #[test]
    fn test_slug_counter_repeats_get_suffix() {
        let mut counter = SlugCounter::new();
        assert_eq!(counter.claim("a"), "a");
        assert_eq!(counter.claim("a"), "a-1");
        assert_eq!(counter.claim("a"), "a-2");
        assert_eq!(counter.claim("b"), "b");
    }
}
