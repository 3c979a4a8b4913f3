//! Candidate link normalization.
//!
//! A candidate may already be a direct link, a base64-scrambled token
//! in a non-standard attribute, or a relative meta-refresh target.
//! Decoding is pure and side-effect free; both extractors use it
//! identically, and a failed decode means "failed candidate", never a
//! fatal error at this layer.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use url::Url;

use crate::types::ResolvedLink;

/// Normalize a candidate value into an absolute HTTP(S) URL.
///
/// Values already starting with `http` pass through unchanged.
/// Anything else is treated as a possibly base64-scrambled URL: it
/// resolves only if the decoded text is itself an absolute HTTP(S)
/// URL.
pub fn decode(value: &str) -> Option<ResolvedLink> {
    if value.starts_with("http") {
        return ResolvedLink::parse(value);
    }

    let bytes = STANDARD.decode(value.trim()).ok()?;
    let decoded = String::from_utf8(bytes).ok()?;
    if decoded.starts_with("http") {
        ResolvedLink::parse(&decoded)
    } else {
        None
    }
}

/// Like [`decode`], but also resolves relative targets (meta-refresh
/// redirects) against the share page URL.
pub fn decode_relative(value: &str, base: &Url) -> Option<ResolvedLink> {
    if let Some(link) = decode(value) {
        return Some(link);
    }
    let joined = base.join(value).ok()?;
    ResolvedLink::parse(joined.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_value_passes_through_unchanged() {
        let link = decode("https://download.example.com/file.zip").unwrap();
        assert_eq!(link.as_str(), "https://download.example.com/file.zip");
    }

    #[test]
    fn test_base64_round_trip() {
        let url = "https://download.example.com/file.zip";
        let scrambled = STANDARD.encode(url);
        assert_eq!(decode(&scrambled).unwrap().as_str(), url);
    }

    #[test]
    fn test_known_scrambled_value() {
        // base64 of https://download.example.com/file.zip
        let scrambled = "aHR0cHM6Ly9kb3dubG9hZC5leGFtcGxlLmNvbS9maWxlLnppcA==";
        assert_eq!(
            decode(scrambled).unwrap().as_str(),
            "https://download.example.com/file.zip"
        );
    }

    #[test]
    fn test_non_base64_garbage_is_rejected() {
        assert!(decode("not a url at all!!").is_none());
        assert!(decode("").is_none());
    }

    #[test]
    fn test_base64_of_non_url_is_rejected() {
        let scrambled = STANDARD.encode("hello world");
        assert!(decode(&scrambled).is_none());
    }

    #[test]
    fn test_http_prefixed_junk_is_rejected() {
        // starts with http but is not a well-formed absolute URL
        assert!(decode("http//broken").is_none());
    }

    #[test]
    fn test_relative_target_resolves_against_base() {
        let base = Url::parse("https://files.example.com/view/abc").unwrap();
        let link = decode_relative("/d/abc123", &base).unwrap();
        assert_eq!(link.as_str(), "https://files.example.com/d/abc123");
    }

    #[test]
    fn test_relative_decode_prefers_absolute_value() {
        let base = Url::parse("https://files.example.com/view/abc").unwrap();
        let link = decode_relative("https://download.example.com/f.zip", &base).unwrap();
        assert_eq!(link.as_str(), "https://download.example.com/f.zip");
    }
}
