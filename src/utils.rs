use url::Url;

/// Canonical string form of a URL, used as the de-duplication key.
///
/// Scheme and host are already lowercased by `Url` parsing and default ports are
/// dropped. On top of that the fragment is removed, a trailing slash on a
/// non-root path is removed and an empty query (`?`) is dropped. Non-empty query
/// strings are kept verbatim, in their original order.
pub fn canonicalize(url: &Url) -> String {
    let mut canonical = url.clone();
    canonical.set_fragment(None);

    let path = canonical.path();
    if path.len() > 1 && path.ends_with('/') {
        let trimmed = path.trim_end_matches('/');
        let trimmed = if trimmed.is_empty() { "/" } else { trimmed };
        let trimmed = trimmed.to_string();
        canonical.set_path(&trimmed);
    }

    if canonical.query() == Some("") {
        canonical.set_query(None);
    }

    canonical.to_string()
}

/// Resolves an `href` found on a page against that page's final URL.
///
/// Returns `None` for links that cannot be parsed or that do not point at an
/// HTTP(S) resource (`mailto:`, `javascript:`, `tel:` and friends). The
/// fragment is stripped from the result.
pub fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let mut resolved = base.join(href).ok()?;
    if !is_http(&resolved) {
        return None;
    }
    resolved.set_fragment(None);
    Some(resolved)
}

pub fn is_http(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}
