//! Stylesheet processing for localfont
//!
//! Everything in this crate is pure text processing over the CSS returned by
//! a Google Fonts endpoint:
//! - extracting the family name, declared weights and variable-font support
//! - rewriting remote `url()` references to local paths (or inlining them)
//! - computing `unicode-range` style subset ranges for a text sample
//! - generating Tailwind and CSS-in-JS snippets
//!
//! Network access lives in `localfont-fetch`.

mod error;
mod parse;
mod rewrite;
mod snippets;
mod subset;
mod urls;

pub use error::ParseError;
pub use parse::{StylesheetInfo, estimate_size_kb, parse_stylesheet};
pub use rewrite::{DEFAULT_LOCAL_PREFIX, inline_font_data, rewrite_to_local_paths, rewrite_to_prefix};
pub use snippets::{CssInJsSnippets, FontStack, css_in_js_snippets, fallback_chain, tailwind_config};
pub use subset::{parse_unicode_ranges, subset_ranges};
pub use urls::{extract_remote_urls, extract_woff2_urls, file_name_from_url};

/// Sample texts offered for previews and subset computation
pub mod templates {
    pub const PANGRAM: &str = "The quick brown fox jumps over the lazy dog";
    pub const ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
    pub const NUMBERS: &str = "0123456789";
    pub const SPECIAL: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";
    pub const PARAGRAPH: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. Sed do eiusmod tempor incididunt ut labore et dolore magna aliqua.";

    /// Look up a template by name (`pangram`, `alphabet`, ...)
    pub fn by_name(name: &str) -> Option<&'static str> {
        match name {
            "pangram" => Some(PANGRAM),
            "alphabet" => Some(ALPHABET),
            "numbers" => Some(NUMBERS),
            "special" => Some(SPECIAL),
            "paragraph" => Some(PARAGRAPH),
            _ => None,
        }
    }
}
