//! Canonical web path handling.
//!
//! A web path always starts with `/`, uses single `/` separators and has no
//! trailing `/` except for the root itself.

/// Normalize a raw path into a canonical web path.
#[must_use]
pub fn normalize(path: &str) -> String {
    let joined = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    format!("/{joined}")
}

/// Parent of a web path: the path with its last segment dropped.
///
/// The root is its own parent.
#[must_use]
pub fn parent(path: &str) -> String {
    let normalized = normalize(path);
    match normalized.rfind('/') {
        Some(0) | None => "/".to_owned(),
        Some(idx) => normalized[..idx].to_owned(),
    }
}

/// Number of non-empty `/`-separated segments.
#[must_use]
pub fn depth(path: &str) -> usize {
    path.split('/').filter(|segment| !segment.is_empty()).count()
}

/// Join a segment onto a web path.
#[must_use]
pub fn join(base: &str, segment: &str) -> String {
    normalize(&format!("{base}/{segment}"))
}
