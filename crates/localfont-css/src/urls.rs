//! Asset URL extraction

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

/// `url(...)` references whose target mentions the WOFF2 extension.
/// The target stops at the first quote, whitespace or closing paren.
static WOFF2_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"url\(\s*['"]?([^'"\s)]*\.woff2[^'"\s)]*)['"]?\s*\)"#).unwrap()
});

/// `url(...)` references pointing at an external https host
pub(crate) static REMOTE_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"url\(\s*['"]?(https://[^'"\s)]+)['"]?\s*\)"#).unwrap()
});

/// Extract every WOFF2 `url()` target, quotes stripped.
///
/// Order of appearance is kept and duplicates are preserved: Google Fonts
/// reuses the same file across several @font-face blocks.
pub fn extract_woff2_urls(css: &str) -> Vec<String> {
    WOFF2_URL_REGEX
        .captures_iter(css)
        .map(|cap| cap[1].to_string())
        .collect()
}

/// Extract the distinct external `https://` asset URLs, in order of first appearance.
pub fn extract_remote_urls(css: &str) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();
    for cap in REMOTE_URL_REGEX.captures_iter(css) {
        let url = &cap[1];
        if !urls.iter().any(|u| u == url) {
            urls.push(url.to_string());
        }
    }
    urls
}

/// Last path segment of a URL, if there is a non-empty one.
///
/// Query strings and fragments are not part of the segment.
pub fn file_name_from_url(url: &str) -> Option<String> {
    let segment = match Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .map(|s| s.to_string()),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .and_then(|path| path.rsplit('/').next())
            .map(|s| s.to_string()),
    };
    segment.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_woff2_only() {
        let css = r#"
@font-face { src: url(https://fonts.gstatic.com/s/inter/v13/a.woff2) format('woff2'); }
@font-face { src: url(https://fonts.gstatic.com/s/inter/v13/b.woff) format('woff'); }
@font-face { src: url('https://fonts.gstatic.com/s/inter/v13/c.woff2') format('woff2'); }
"#;
        assert_eq!(
            extract_woff2_urls(css),
            vec![
                "https://fonts.gstatic.com/s/inter/v13/a.woff2",
                "https://fonts.gstatic.com/s/inter/v13/c.woff2",
            ]
        );
    }

    #[test]
    fn test_extract_woff2_keeps_duplicates() {
        let css = "src: url(\"https://x.test/a.woff2\"); src: url(https://x.test/a.woff2);";
        assert_eq!(
            extract_woff2_urls(css),
            vec!["https://x.test/a.woff2", "https://x.test/a.woff2"]
        );
    }

    #[test]
    fn test_extract_woff2_single_line() {
        let css = "@font-face{font-family:'Inter';src:url(https://fonts.gstatic.com/s/inter/b.woff) format('woff'),url(https://fonts.gstatic.com/s/inter/a.woff2) format('woff2')}";
        assert_eq!(
            extract_woff2_urls(css),
            vec!["https://fonts.gstatic.com/s/inter/a.woff2"]
        );

        let css = "src:url('https://x.test/a.woff2?v=1'),url(\"https://x.test/b.ttf\"),url( https://x.test/c.woff2 )";
        assert_eq!(
            extract_woff2_urls(css),
            vec!["https://x.test/a.woff2?v=1", "https://x.test/c.woff2"]
        );
    }

    #[test]
    fn test_extract_woff2_none() {
        assert!(extract_woff2_urls("body { color: red; }").is_empty());
    }

    #[test]
    fn test_extract_remote_urls_unique() {
        let css = "url(https://a.test/1.woff2) url('https://a.test/1.woff2') url(/local.woff2) url(https://a.test/2.ttf)";
        assert_eq!(
            extract_remote_urls(css),
            vec!["https://a.test/1.woff2", "https://a.test/2.ttf"]
        );
    }

    #[test]
    fn test_file_name_from_url() {
        assert_eq!(
            file_name_from_url("https://fonts.gstatic.com/s/inter/v13/abc.woff2"),
            Some("abc.woff2".to_string())
        );
        assert_eq!(
            file_name_from_url("https://x.test/font.woff2?v=3"),
            Some("font.woff2".to_string())
        );
        assert_eq!(file_name_from_url("https://x.test/fonts/"), None);
        assert_eq!(file_name_from_url("https://x.test"), None);
        assert_eq!(
            file_name_from_url("relative/dir/a.woff2"),
            Some("a.woff2".to_string())
        );
    }
}
