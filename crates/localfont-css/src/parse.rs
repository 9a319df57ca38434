//! Font metadata extraction from Google Fonts stylesheets

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::ParseError;

/// First quoted `font-family` declaration
static FAMILY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"font-family:\s*['"]([^'"]+)['"]"#).unwrap());

/// Integer `font-weight` declarations. For ranges like `100 900` only the
/// lower bound is captured.
static WEIGHT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"font-weight:\s*(\d+)").unwrap());

/// Matches both the property and `@supports (font-variation-settings: ...)`
const VARIATION_PROPERTY: &str = "font-variation-settings";

/// Ratio applied to the stylesheet length when estimating download size
const COMPRESSION_RATIO: f64 = 0.6;

/// Metadata extracted from a stylesheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylesheetInfo {
    /// The font-family name declared in the first @font-face
    pub family: String,
    /// Declared weights, deduplicated, in order of first occurrence
    pub weights: Vec<String>,
    /// Whether the stylesheet uses variable-font features
    pub is_variable: bool,
}

/// Extract family name, weights and variable-font support from CSS text.
pub fn parse_stylesheet(css: &str) -> Result<StylesheetInfo, ParseError> {
    let family = FAMILY_REGEX
        .captures(css)
        .map(|cap| cap[1].to_string())
        .filter(|name| !name.is_empty())
        .ok_or(ParseError::MissingFamily)?;

    let mut seen = HashSet::new();
    let weights: Vec<String> = WEIGHT_REGEX
        .captures_iter(css)
        .map(|cap| cap[1].to_string())
        .filter(|weight| seen.insert(weight.clone()))
        .collect();

    let is_variable = css.contains(VARIATION_PROPERTY);

    tracing::debug!(%family, ?weights, is_variable, "parsed stylesheet");

    Ok(StylesheetInfo {
        family,
        weights,
        is_variable,
    })
}

/// Rough size estimate in kilobytes, derived from the stylesheet length.
///
/// Length is counted in UTF-16 code units, the same unit browsers report,
/// so non-ASCII text counts once per character rather than per byte.
pub fn estimate_size_kb(css: &str) -> u64 {
    let length = css.encode_utf16().count();
    ((length as f64 * COMPRESSION_RATIO) / 1024.0).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTER_CSS: &str = r#"
/* latin */
@font-face {
  font-family: 'Inter';
  font-style: normal;
  font-weight: 400;
  font-display: swap;
  src: url(https://fonts.gstatic.com/s/inter/v13/UcC73FwrK3iLTeHuS_fvQtMwCp50KnMa1ZL7.woff2) format('woff2');
}
/* latin */
@font-face {
  font-family: 'Inter';
  font-style: normal;
  font-weight: 700;
  font-display: swap;
  src: url(https://fonts.gstatic.com/s/inter/v13/UcC73FwrK3iLTeHuS_fvQtMwCp50KnMa1ZL7.woff2) format('woff2');
}
"#;

    #[test]
    fn test_extracts_family_single_quotes() {
        let info = parse_stylesheet(INTER_CSS).unwrap();
        assert_eq!(info.family, "Inter");
    }

    #[test]
    fn test_extracts_family_double_quotes() {
        let css = r#"@font-face { font-family: "Playfair Display"; font-weight: 400; }"#;
        let info = parse_stylesheet(css).unwrap();
        assert_eq!(info.family, "Playfair Display");
    }

    #[test]
    fn test_first_family_wins() {
        let css = "@font-face { font-family: 'Roboto'; } @font-face { font-family: 'Lato'; }";
        assert_eq!(parse_stylesheet(css).unwrap().family, "Roboto");
    }

    #[test]
    fn test_missing_family_is_parse_error() {
        let css = "@font-face { font-weight: 400; src: url(a.woff2); }";
        assert_eq!(parse_stylesheet(css), Err(ParseError::MissingFamily));
        // Unquoted family names are not accepted either
        assert_eq!(
            parse_stylesheet("body { font-family: Inter; }"),
            Err(ParseError::MissingFamily)
        );
    }

    #[test]
    fn test_weights_deduplicated_in_order() {
        let css = "font-family: 'X'; font-weight: 400; font-weight: 400; \
                   font-weight: 700; font-weight: 400;";
        let info = parse_stylesheet(css).unwrap();
        assert_eq!(info.weights, vec!["400", "700"]);
    }

    #[test]
    fn test_weight_range_keeps_lower_bound() {
        let css = "font-family: 'Inter'; font-weight: 100 900;";
        assert_eq!(parse_stylesheet(css).unwrap().weights, vec!["100"]);
    }

    #[test]
    fn test_no_weights() {
        let css = "font-family: 'Inter'; font-weight: bold;";
        assert!(parse_stylesheet(css).unwrap().weights.is_empty());
    }

    #[test]
    fn test_variable_detection() {
        assert!(!parse_stylesheet(INTER_CSS).unwrap().is_variable);

        let css = "font-family: 'Inter'; font-variation-settings: 'wght' 400;";
        assert!(parse_stylesheet(css).unwrap().is_variable);

        let css = "@supports (font-variation-settings: normal) { @font-face { font-family: 'Inter'; } }";
        assert!(parse_stylesheet(css).unwrap().is_variable);
    }

    #[test]
    fn test_estimate_size_kb() {
        assert_eq!(estimate_size_kb(""), 0);
        // 2048 * 0.6 / 1024 = 1.2
        assert_eq!(estimate_size_kb(&"a".repeat(2048)), 1);
        // 3000 * 0.6 / 1024 = 1.76
        assert_eq!(estimate_size_kb(&"a".repeat(3000)), 2);
    }

    #[test]
    fn test_estimate_size_counts_utf16_units() {
        // 4096 UTF-8 bytes but 2048 UTF-16 units
        assert_eq!(estimate_size_kb(&"é".repeat(2048)), 1);
        // Astral characters take two units each
        assert_eq!(estimate_size_kb(&"𝔸".repeat(1024)), 1);
    }
}
