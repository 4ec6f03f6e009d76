//! Utility functions and helpers.

pub mod http;

use unicode_segmentation::UnicodeSegmentation;
use url::Url;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Extract the domain from a URL string.
pub fn get_domain(url_str: &str) -> Option<String> {
    Url::parse(url_str)
        .ok()
        .and_then(|u| u.host_str().map(|s| s.to_string()))
}

/// Check whether a URL's host is `domain` or one of its subdomains.
pub fn is_on_domain(url_str: &str, domain: &str) -> bool {
    let domain = domain.trim_start_matches('.').to_ascii_lowercase();
    match get_domain(url_str) {
        Some(host) => {
            let host = host.to_ascii_lowercase();
            host == domain || host.ends_with(&format!(".{domain}"))
        }
        None => false,
    }
}

/// Collapse runs of whitespace into single spaces.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cut `text` to at most `max` chars, ending with an ellipsis when cut.
///
/// The cut lands on a grapheme boundary, so combining marks are never split
/// from their base character.
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for grapheme in text.graphemes(true) {
        let width = grapheme.chars().count();
        if used + width > max - 1 {
            break;
        }
        out.push_str(grapheme);
        used += width;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url() {
        let base = Url::parse("https://example.com/hn/?tags=+ai").unwrap();
        assert_eq!(
            resolve_url(&base, "/item?id=1"),
            "https://example.com/item?id=1"
        );
        assert_eq!(
            resolve_url(&base, "https://other.com/x"),
            "https://other.com/x"
        );
    }

    #[test]
    fn test_get_domain() {
        assert_eq!(
            get_domain("https://sub.example.com:8080/path"),
            Some("sub.example.com".to_string())
        );
        assert_eq!(get_domain("not a url"), None);
    }

    #[test]
    fn test_is_on_domain() {
        assert!(is_on_domain(
            "https://news.ycombinator.com/item?id=1",
            "ycombinator.com"
        ));
        assert!(is_on_domain("https://ycombinator.com/", "ycombinator.com"));
        assert!(!is_on_domain(
            "https://notycombinator.com/",
            "ycombinator.com"
        ));
        assert!(!is_on_domain("relative/path", "ycombinator.com"));
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a \n\t b  "), "a b");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 5), "hello");
        assert_eq!(truncate_chars("hello", 3), "he…");
        assert_eq!(truncate_chars("hello", 0), "");
    }

    #[test]
    fn test_truncate_counts_chars_not_graphemes() {
        // Three graphemes, six chars
        let text = "e\u{301}e\u{301}e\u{301}";
        let cut = truncate_chars(text, 4);
        assert_eq!(cut, "e\u{301}…");
        assert!(cut.chars().count() <= 4);
        assert_eq!(truncate_chars(text, 6), text);
    }
}
