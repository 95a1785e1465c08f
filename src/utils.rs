//! Small helpers shared by the scrapers and the mailer.

use url::Url;

/// Truncate a string for logging purposes.
///
/// Keeps at most `max` characters (not bytes, the notices are Cyrillic) and
/// appends how many bytes were dropped.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log("Патреш", 2), "Па…(+8 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Resolve an `href` found on `page` into an absolute URL.
///
/// Returns `None` for blank or unparseable references.
pub fn resolve_link(page: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    page.join(href).ok()
}
