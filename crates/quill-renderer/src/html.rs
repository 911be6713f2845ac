//! HTML escaping and fragment extraction.

use std::sync::LazyLock;

use regex::Regex;

static H1_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<h1>(.*?)</h1>").unwrap());

static P_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<p>(.*?)</p>").unwrap());

/// Escape text for safe embedding in HTML.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Extract the inner HTML of the first `<h1>` element, if any.
///
/// Matches single-line headings only, which is what the renderer emits.
/// The inner HTML is returned verbatim (inline tags included).
#[must_use]
pub fn first_h1(html: &str) -> Option<String> {
    H1_PATTERN
        .captures(html)
        .map(|caps| caps[1].to_string())
}

/// Extract the inner HTML of the first `<p>` element, if any.
#[must_use]
pub fn first_p(html: &str) -> Option<String> {
    P_PATTERN
        .captures(html)
        .map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_escape_html_plain_text_unchanged() {
        assert_eq!(escape_html("plain text"), "plain text");
    }

    #[test]
    fn test_first_h1() {
        let html = "<h1>Getting Started</h1><p>Intro.</p><h1>Second</h1>";
        assert_eq!(first_h1(html), Some("Getting Started".to_string()));
    }

    #[test]
    fn test_first_h1_keeps_inline_markup() {
        let html = "<h1>Use <code>map</code></h1>";
        assert_eq!(first_h1(html), Some("Use <code>map</code>".to_string()));
    }

    #[test]
    fn test_first_h1_missing() {
        assert_eq!(first_h1("<h2>Not a title</h2>"), None);
    }

    #[test]
    fn test_first_p() {
        let html = "<h1>Title</h1><p>First paragraph.</p><p>Second.</p>";
        assert_eq!(first_p(html), Some("First paragraph.".to_string()));
    }

    #[test]
    fn test_first_p_missing() {
        assert_eq!(first_p("<h1>Title</h1>"), None);
    }
}
