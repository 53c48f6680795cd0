//! Shared utility functions for markdown rendering.

use pulldown_cmark::HeadingLevel;

/// Resolve a dot-relative link against the page being rendered.
///
/// Links starting with `./` or `../` are resolved against the directory of
/// `page_path` into an absolute wiki path. `..` never climbs above the root.
/// Every other link (absolute, external, fragment-only, bare names) and any
/// link rendered without a page path is returned unchanged.
///
/// # Examples
///
/// ```
/// use wk_renderer::resolve_link;
///
/// assert_eq!(resolve_link("./todo", Some("/user/alice/memo")), "/user/alice/todo");
/// assert_eq!(resolve_link("../bob", Some("/user/alice/memo")), "/user/bob");
/// assert_eq!(resolve_link("https://example.com", Some("/a")), "https://example.com");
/// assert_eq!(resolve_link("./todo", None), "./todo");
/// ```
#[must_use]
pub fn resolve_link(url: &str, page_path: Option<&str>) -> String {
    let Some(page_path) = page_path else {
        return url.to_owned();
    };
    if !url.starts_with("./") && !url.starts_with("../") {
        return url.to_owned();
    }

    // The last segment of the page path is the page itself
    let mut segments: Vec<&str> = page_path.split('/').filter(|s| !s.is_empty()).collect();
    if !page_path.ends_with('/') {
        segments.pop();
    }

    for component in url.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(component),
        }
    }

    let mut resolved = format!("/{}", segments.join("/"));
    if url.ends_with('/') && !resolved.ends_with('/') {
        resolved.push('/');
    }
    resolved
}

/// Convert heading level enum to number (1-6).
#[must_use]
pub(crate) fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
