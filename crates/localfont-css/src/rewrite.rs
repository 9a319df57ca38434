//! Rewriting of remote font references
//!
//! Two flavours: point every external `url()` at a locally hosted copy under
//! `/fonts/<family>/`, or embed the fetched bytes as `data:` URLs.

use std::collections::HashMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use regex::Captures;

use crate::urls::{REMOTE_URL_REGEX, file_name_from_url};

/// Path prefix that local font copies are served from
pub const DEFAULT_LOCAL_PREFIX: &str = "/fonts";

/// Rewrite every external `url(https://...)` to `/fonts/<font-name>/<file>`.
///
/// Non-matching `url()` values are left untouched, so applying this to an
/// already rewritten stylesheet is a no-op.
pub fn rewrite_to_local_paths(css: &str, font_name: &str) -> String {
    rewrite_to_prefix(css, font_name, DEFAULT_LOCAL_PREFIX)
}

/// Same as [`rewrite_to_local_paths`] with a custom path prefix.
pub fn rewrite_to_prefix(css: &str, font_name: &str, prefix: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    REMOTE_URL_REGEX
        .replace_all(css, |caps: &Captures| {
            let file_name =
                file_name_from_url(&caps[1]).unwrap_or_else(|| format!("{font_name}.woff2"));
            format!("url(\"{prefix}/{font_name}/{file_name}\")")
        })
        .into_owned()
}

/// Replace external `url()` references with base64 `data:` URLs.
///
/// URLs missing from `assets` keep pointing at the remote file.
pub fn inline_font_data(css: &str, assets: &HashMap<String, Vec<u8>>) -> String {
    REMOTE_URL_REGEX
        .replace_all(css, |caps: &Captures| match assets.get(&caps[1]) {
            Some(bytes) => format!(
                "url(data:{};base64,{})",
                mime_for(&caps[1]),
                STANDARD.encode(bytes)
            ),
            None => caps[0].to_string(),
        })
        .into_owned()
}

fn mime_for(url: &str) -> &'static str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    match path.rsplit('.').next() {
        Some("woff2") => "font/woff2",
        Some("woff") => "font/woff",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSS: &str = "@font-face {\n  font-family: 'Inter';\n  src: url(https://fonts.gstatic.com/s/inter/v13/abc.woff2) format('woff2');\n}\n";

    #[test]
    fn test_rewrite_to_local_paths() {
        let out = rewrite_to_local_paths(CSS, "Inter");
        assert!(out.contains(r#"url("/fonts/Inter/abc.woff2") format('woff2')"#));
        assert!(!out.contains("gstatic"));
    }

    #[test]
    fn test_rewrite_quoted_url() {
        let css = r#"src: url("https://fonts.gstatic.com/s/a/b.woff2");"#;
        assert_eq!(
            rewrite_to_local_paths(css, "Lato"),
            r#"src: url("/fonts/Lato/b.woff2");"#
        );
    }

    #[test]
    fn test_rewrite_leaves_local_urls() {
        let css = "src: url(/already/local.woff2); background: url(data:image/png;base64,AAAA);";
        assert_eq!(rewrite_to_local_paths(css, "Inter"), css);
    }

    #[test]
    fn test_rewrite_idempotent() {
        let once = rewrite_to_local_paths(CSS, "Inter");
        let twice = rewrite_to_local_paths(&once, "Inter");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_rewrite_custom_prefix() {
        let out = rewrite_to_prefix(CSS, "Inter", "/static/fonts/");
        assert!(out.contains(r#"url("/static/fonts/Inter/abc.woff2")"#));
    }

    #[test]
    fn test_rewrite_without_file_name_uses_family() {
        let css = "src: url(https://fonts.gstatic.com/);";
        assert_eq!(
            rewrite_to_local_paths(css, "Inter"),
            r#"src: url("/fonts/Inter/Inter.woff2");"#
        );
    }

    #[test]
    fn test_inline_font_data() {
        let mut assets = HashMap::new();
        assets.insert(
            "https://fonts.gstatic.com/s/inter/v13/abc.woff2".to_string(),
            b"wOF2".to_vec(),
        );
        let out = inline_font_data(CSS, &assets);
        assert!(out.contains("url(data:font/woff2;base64,d09GMg==) format('woff2')"));
    }

    #[test]
    fn test_inline_keeps_missing_assets() {
        let out = inline_font_data(CSS, &HashMap::new());
        assert_eq!(out, CSS);
    }
}
