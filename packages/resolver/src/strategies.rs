//! Strategy tables for the selector cascade.
//!
//! The cascade is modeled as data: ordered lists of named strategies
//! evaluated first-match-wins. New site layouts are additive entries
//! here, not new branches in the extractors.

use regex::Regex;

/// Browser-identifying user agent sent on every page fetch.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120 Safari/537.36";

/// A named CSS selector strategy.
#[derive(Debug, Clone, Copy)]
pub struct SelectorStrategy {
    /// Stable name used in logs and candidate tags
    pub name: &'static str,

    /// CSS selector matching the site's download control
    pub css: &'static str,
}

/// Selectors known to match the download button, in priority order.
pub const BUTTON_SELECTORS: &[SelectorStrategy] = &[
    SelectorStrategy {
        name: "download-button-id",
        css: "a#downloadButton",
    },
    SelectorStrategy {
        name: "download-button-any-id",
        css: "#downloadButton",
    },
    SelectorStrategy {
        name: "download-class",
        css: ".dlButton",
    },
    SelectorStrategy {
        name: "download-anchor-class",
        css: "a.dlButton",
    },
    SelectorStrategy {
        name: "download-aria-label",
        css: r#"a[aria-label="Download"]"#,
    },
];

/// Additional heuristics only worth trying on a fully rendered DOM,
/// appended after [`BUTTON_SELECTORS`] by the rendered extractor.
pub const RENDERED_EXTRA_SELECTORS: &[SelectorStrategy] = &[
    SelectorStrategy {
        name: "role-button-href",
        css: r#"[role="button"][href]"#,
    },
    SelectorStrategy {
        name: "detail-path-href",
        css: r#"a[href*="/d/"]"#,
    },
    SelectorStrategy {
        name: "download-substring-href",
        css: r#"a[href*="download"]"#,
    },
];

/// Per-element attribute priority: plain href, then the site's
/// obfuscated-URL attribute, then the alternate plain-URL attribute.
pub const URL_ATTRIBUTES: &[&str] = &["href", "data-scrambled-url", "data-url"];

/// Placeholder href on script-gated buttons; never a usable candidate.
pub const DEAD_HREF: &str = "javascript:void(0)";

/// Post-click navigations into folder listings are not file links.
pub const FOLDER_PATH_MARKER: &str = "/folder/";

/// Extensions that identify a byte-payload target (archives, video,
/// audio, images, documents).
pub const BINARY_EXTENSIONS: &[&str] = &[
    "zip", "rar", "7z", "tar", "gz", "iso", "apk", "mp4", "mkv", "avi", "mov", "mp3", "wav",
    "flac", "jpg", "jpeg", "png", "gif", "pdf", "doc", "docx",
];

/// Does this target match the "file detail page" path pattern?
pub fn is_detail_path(target: &str) -> bool {
    let re = Regex::new(r"(?i)^https?://.+/d/").unwrap();
    re.is_match(target)
}

/// Does this target end in a known binary-file extension?
///
/// Query strings and fragments are ignored; the check is against the
/// path only.
pub fn has_binary_extension(target: &str) -> bool {
    if !target.starts_with("http") {
        return false;
    }
    let path = target.split(['?', '#']).next().unwrap_or(target);
    let lower = path.to_ascii_lowercase();
    BINARY_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(&format!(".{}", ext)))
}

/// Scan a raw response body for an embedded absolute URL on a
/// "download" subdomain.
pub fn scan_download_host(body: &str) -> Option<&str> {
    let re = Regex::new(r#"(?i)(https?://download[^"'<>\s]+)"#).unwrap();
    re.captures(body)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str())
}

/// Extract the target URL from a meta-refresh `content` attribute,
/// e.g. `"3; url=/d/abc123"`.
pub fn parse_meta_refresh(content: &str) -> Option<&str> {
    let re = Regex::new(r#"(?i)url\s*=\s*['"]?([^'">\s]+)"#).unwrap();
    re.captures(content)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_path_pattern() {
        assert!(is_detail_path("https://files.example.com/d/abc123"));
        assert!(is_detail_path("HTTP://files.example.com/d/abc"));
        assert!(!is_detail_path("https://files.example.com/folder/abc"));
        assert!(!is_detail_path("/d/abc123"));
    }

    #[test]
    fn test_binary_extension_match() {
        assert!(has_binary_extension("https://dl.example.com/movie.MP4"));
        assert!(has_binary_extension(
            "https://dl.example.com/archive.zip?token=xyz"
        ));
        assert!(!has_binary_extension("https://dl.example.com/page.html"));
        // relative targets are never accepted by the scans
        assert!(!has_binary_extension("file.zip"));
    }

    #[test]
    fn test_scan_download_host() {
        let body = r#"<script>var u = "https://download.example.com/f/9j2?key=1";</script>"#;
        assert_eq!(
            scan_download_host(body),
            Some("https://download.example.com/f/9j2?key=1")
        );
        assert_eq!(scan_download_host("<html>nothing here</html>"), None);
    }

    #[test]
    fn test_parse_meta_refresh() {
        assert_eq!(parse_meta_refresh("3; url=/d/abc123"), Some("/d/abc123"));
        assert_eq!(
            parse_meta_refresh("0;URL='https://files.example.com/d/x'"),
            Some("https://files.example.com/d/x")
        );
        assert_eq!(parse_meta_refresh("5"), None);
    }
}
