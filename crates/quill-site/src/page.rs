//! Page records and the markdown page builder.
//!
//! [`PageBuilder::from_markdown`] turns one raw markdown document into one
//! or more [`Page`]s: front matter is split off and parsed, and in explode
//! mode the body is decomposed into a page per top-level heading.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use quill_renderer::{Markdown, first_h1, first_p};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::slug::{SlugCounter, slugify};
use crate::web_path;

/// Layout used when front matter names none.
pub const DEFAULT_LAYOUT: &str = "default";

/// Leading front-matter block: a `---` line pair anchored at text start.
static FRONT_MATTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\A---\r?\n(.*?)\r?\n---").unwrap());

/// A resolved page, keyed by its web path within one build.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    /// Canonical web path.
    pub path: String,
    /// Page title, empty when nothing supplied or derivable.
    pub title: String,
    /// Page description, empty when nothing supplied or derivable.
    pub description: String,
    /// Layout name.
    pub layout: String,
    /// Rendered HTML body. Skipped when serializing page props; the
    /// emitted document already carries the markup.
    #[serde(skip)]
    pub html: String,
    /// Custom front-matter fields passed through verbatim.
    #[serde(flatten)]
    pub vars: HashMap<String, serde_json::Value>,
}

impl Page {
    /// Create a page with the given path and HTML body.
    #[must_use]
    pub fn new(path: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            title: String::new(),
            description: String::new(),
            layout: DEFAULT_LAYOUT.to_owned(),
            html: html.into(),
            vars: HashMap::new(),
        }
    }

    /// Set the title (builder style).
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the description (builder style).
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the layout (builder style).
    #[must_use]
    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = layout.into();
        self
    }

    /// Add a custom field (builder style).
    #[must_use]
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

/// One unit of markdown text that becomes exactly one page.
#[derive(Debug)]
struct Document {
    path: String,
    raw_markdown: String,
}

/// Front matter with reserved keys peeled off.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FrontMatter {
    title: Option<String>,
    description: Option<String>,
    layout: Option<String>,
    #[serde(flatten)]
    extra: HashMap<String, serde_json::Value>,
}

/// Page construction error.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// Front matter failed to parse as YAML.
    #[error("invalid front matter: {0}")]
    FrontMatter(#[from] serde_yaml::Error),
}

/// Builds page records from markdown documents.
#[derive(Clone)]
pub struct PageBuilder {
    markdown: Arc<dyn Markdown>,
}

impl PageBuilder {
    /// Create a page builder rendering through the given markdown renderer.
    #[must_use]
    pub fn new(markdown: Arc<dyn Markdown>) -> Self {
        Self { markdown }
    }

    /// Build one or more pages from a raw markdown document.
    ///
    /// With `explode` false the whole body becomes a single page at
    /// `base_path`. With `explode` true the body is split at `# ` headings:
    /// each section becomes a page at the base path's parent joined with the
    /// slugged heading (repeats get a `-N` suffix), and content before the
    /// first heading is discarded.
    ///
    /// Front matter applies to every produced page: `title`, `description`
    /// and `layout` override derived values, all other keys pass through as
    /// custom fields.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::FrontMatter`] when a front-matter block is
    /// present but fails to parse.
    pub fn from_markdown(
        &self,
        raw_markdown: &str,
        base_path: &str,
        explode: bool,
    ) -> Result<Vec<Page>, PageError> {
        let (front, body) = split_front_matter(raw_markdown)?;

        let documents = if explode {
            explode_documents(&body, base_path)
        } else {
            vec![Document {
                path: web_path::normalize(base_path),
                raw_markdown: body,
            }]
        };

        Ok(documents
            .into_iter()
            .map(|document| self.build_page(document, &front))
            .collect())
    }

    fn build_page(&self, document: Document, front: &FrontMatter) -> Page {
        let html = self.markdown.render(&document.raw_markdown);
        let title = front
            .title
            .clone()
            .or_else(|| first_h1(&html))
            .unwrap_or_default();
        let description = front
            .description
            .clone()
            .or_else(|| first_p(&html))
            .unwrap_or_default();
        let layout = front
            .layout
            .clone()
            .unwrap_or_else(|| DEFAULT_LAYOUT.to_owned());

        Page {
            path: document.path,
            title,
            description,
            layout,
            html,
            vars: front.extra.clone(),
        }
    }
}

/// Split a leading front-matter block off the markdown body.
fn split_front_matter(raw: &str) -> Result<(FrontMatter, String), PageError> {
    let Some(caps) = FRONT_MATTER.captures(raw) else {
        return Ok((FrontMatter::default(), raw.to_owned()));
    };

    let yaml = &caps[1];
    let front = if yaml.trim().is_empty() {
        FrontMatter::default()
    } else {
        serde_yaml::from_str(yaml)?
    };
    let body = FRONT_MATTER.replace(raw, "").into_owned();
    Ok((front, body))
}

/// Split a body into one document per top-level heading.
///
/// A line starting with `# ` opens a new document holding that line and
/// everything up to the next top-level heading. The document's path is the
/// base path's parent joined with the slugged heading text.
fn explode_documents(body: &str, base_path: &str) -> Vec<Document> {
    let parent = web_path::parent(base_path);
    let mut counter = SlugCounter::new();
    let mut documents = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for line in body.lines() {
        if let Some(heading) = line.strip_prefix("# ") {
            if let Some((path, lines)) = current.take() {
                documents.push(Document {
                    path,
                    raw_markdown: lines.join("\n"),
                });
            }
            let slug = counter.claim(&slugify(heading));
            current = Some((web_path::join(&parent, &slug), vec![line]));
        } else if let Some((_, lines)) = &mut current {
            lines.push(line);
        }
    }
    if let Some((path, lines)) = current {
        documents.push(Document {
            path,
            raw_markdown: lines.join("\n"),
        });
    }

    documents
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use quill_renderer::CmarkRenderer;

    use super::*;

    fn builder() -> PageBuilder {
        PageBuilder::new(Arc::new(CmarkRenderer::new()))
    }

    #[test]
    fn test_single_page_at_base_path() {
        let pages = builder()
            .from_markdown("Some text.", "/guides/setup", false)
            .unwrap();

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].path, "/guides/setup");
    }

    #[test]
    fn test_title_from_first_heading() {
        let pages = builder()
            .from_markdown("# Hello\n\nBody.", "/a", false)
            .unwrap();

        assert_eq!(pages[0].title, "Hello");
    }

    #[test]
    fn test_description_from_first_paragraph() {
        let pages = builder()
            .from_markdown("# Hello\n\nFirst paragraph.\n\nSecond.", "/a", false)
            .unwrap();

        assert_eq!(pages[0].description, "First paragraph.");
    }

    #[test]
    fn test_front_matter_overrides_derived_values() {
        let raw = "---\ntitle: Custom Title\ndescription: Custom description\n---\n\n# Heading\n\nParagraph.";
        let pages = builder().from_markdown(raw, "/a", false).unwrap();

        assert_eq!(pages[0].title, "Custom Title");
        assert_eq!(pages[0].description, "Custom description");
    }

    #[test]
    fn test_missing_title_and_description_are_empty() {
        let pages = builder().from_markdown("- just\n- a list", "/a", false).unwrap();

        assert_eq!(pages[0].title, "");
        assert_eq!(pages[0].description, "");
    }

    #[test]
    fn test_layout_defaults_and_overrides() {
        let pages = builder().from_markdown("Text.", "/a", false).unwrap();
        assert_eq!(pages[0].layout, "default");

        let raw = "---\nlayout: docs\n---\n\nText.";
        let pages = builder().from_markdown(raw, "/a", false).unwrap();
        assert_eq!(pages[0].layout, "docs");
    }

    #[test]
    fn test_front_matter_extra_fields_pass_through() {
        let raw = "---\ntitle: T\nauthor: jane\nweight: 3\n---\n\nText.";
        let pages = builder().from_markdown(raw, "/a", false).unwrap();

        assert_eq!(
            pages[0].vars.get("author"),
            Some(&serde_json::Value::String("jane".to_owned()))
        );
        assert_eq!(
            pages[0].vars.get("weight"),
            Some(&serde_json::Value::from(3))
        );
        assert!(!pages[0].vars.contains_key("title"));
    }

    #[test]
    fn test_front_matter_stripped_from_body() {
        let raw = "---\ntitle: T\n---\n\nBody text.";
        let pages = builder().from_markdown(raw, "/a", false).unwrap();

        assert!(!pages[0].html.contains("title:"));
        assert!(pages[0].html.contains("Body text."));
    }

    #[test]
    fn test_empty_front_matter_block() {
        let raw = "---\n\n---\n\nBody.";
        let pages = builder().from_markdown(raw, "/a", false).unwrap();

        assert_eq!(pages[0].title, "");
        assert!(pages[0].vars.is_empty());
    }

    #[test]
    fn test_malformed_front_matter_is_an_error() {
        let raw = "---\ntitle: [unclosed\n---\n\nBody.";
        let err = builder().from_markdown(raw, "/a", false).unwrap_err();

        assert!(matches!(err, PageError::FrontMatter(_)));
    }

    #[test]
    fn test_explode_paths_and_order() {
        let raw = "# A\n\none\n\n# A\n\ntwo\n\n# B\n\nthree";
        let pages = builder().from_markdown(raw, "/x/page", true).unwrap();

        let paths: Vec<&str> = pages.iter().map(|p| p.path.as_str()).collect();
        assert_eq!(paths, vec!["/x/a", "/x/a-1", "/x/b"]);
    }

    #[test]
    fn test_explode_discards_preamble() {
        let raw = "intro text before any heading\n\n# Only\n\nbody";
        let pages = builder().from_markdown(raw, "/x/page", true).unwrap();

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].path, "/x/only");
        assert!(!pages[0].html.contains("intro text"));
    }

    #[test]
    fn test_explode_sections_keep_own_content() {
        let raw = "# First\n\nalpha\n\n# Second\n\nbeta";
        let pages = builder().from_markdown(raw, "/x/page", true).unwrap();

        assert!(pages[0].html.contains("<h1>First</h1>"));
        assert!(pages[0].html.contains("alpha"));
        assert!(!pages[0].html.contains("beta"));
        assert!(pages[1].html.contains("beta"));
        assert!(!pages[1].html.contains("alpha"));
    }

    #[test]
    fn test_explode_derives_section_titles() {
        let raw = "# First\n\nalpha\n\n# Second\n\nbeta";
        let pages = builder().from_markdown(raw, "/x/page", true).unwrap();

        assert_eq!(pages[0].title, "First");
        assert_eq!(pages[1].title, "Second");
    }

    #[test]
    fn test_explode_without_headings_yields_nothing() {
        let pages = builder()
            .from_markdown("no headings here", "/x/page", true)
            .unwrap();

        assert!(pages.is_empty());
    }

    #[test]
    fn test_explode_ignores_deeper_headings() {
        let raw = "# Top\n\n## Sub\n\ntext";
        let pages = builder().from_markdown(raw, "/x/page", true).unwrap();

        assert_eq!(pages.len(), 1);
        assert!(pages[0].html.contains("<h2>Sub</h2>"));
    }

    #[test]
    fn test_page_props_serialization_skips_html() {
        let page = Page::new("/a", "<h1>Hi</h1>")
            .with_title("Hi")
            .with_var("author", "jane");
        let json = serde_json::to_value(&page).unwrap();

        assert_eq!(json["path"], "/a");
        assert_eq!(json["title"], "Hi");
        assert_eq!(json["author"], "jane");
        assert!(json.get("html").is_none());
    }
}
