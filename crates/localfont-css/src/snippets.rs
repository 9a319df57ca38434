//! Integration snippets: Tailwind config, fallback stacks, CSS-in-JS wrappers

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

static SERIF_HINT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)georgia|times|playfair|garamond|merriweather").unwrap());

static MONO_HINT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)mono|console|code|hack").unwrap());

/// System font stack used behind a web font
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStack {
    Sans,
    Serif,
    Mono,
}

impl FontStack {
    /// Guess the generic stack from the family name
    pub fn for_family(family: &str) -> Self {
        if SERIF_HINT.is_match(family) {
            FontStack::Serif
        } else if MONO_HINT.is_match(family) {
            FontStack::Mono
        } else {
            FontStack::Sans
        }
    }

    pub fn system_fonts(self) -> &'static [&'static str] {
        match self {
            FontStack::Sans => &[
                "-apple-system",
                "BlinkMacSystemFont",
                "Segoe UI",
                "Roboto",
                "Oxygen",
                "Ubuntu",
                "Cantarell",
                "Fira Sans",
                "Droid Sans",
                "Helvetica Neue",
            ],
            FontStack::Serif => &["Georgia", "Cambria", "Times New Roman", "Times"],
            FontStack::Mono => &[
                "SFMono-Regular",
                "Menlo",
                "Monaco",
                "Consolas",
                "Liberation Mono",
                "Courier New",
            ],
        }
    }
}

fn stack_for(family: &str) -> impl Iterator<Item = &str> {
    let fallbacks: &[&str] = FontStack::for_family(family).system_fonts();
    std::iter::once(family).chain(fallbacks.iter().copied())
}

/// `Family, fallback, fallback, ...` suitable for a `font-family` value
pub fn fallback_chain(family: &str) -> String {
    stack_for(family).collect::<Vec<_>>().join(", ")
}

/// Tailwind utility keyword for a family: `Playfair Display` → `playfair-display`
fn tailwind_key(family: &str) -> String {
    family
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

fn js_quote(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Tailwind `fontFamily` configuration for the given families.
///
/// Each family becomes a `font-<key>` utility backed by its fallback chain.
pub fn tailwind_config<'a>(families: impl IntoIterator<Item = &'a str>) -> String {
    let mut out = String::new();
    out.push_str("// tailwind.config.js\n");
    out.push_str("module.exports = {\n");
    out.push_str("  theme: {\n");
    out.push_str("    extend: {\n");
    out.push_str("      fontFamily: {\n");
    for family in families {
        let stack: Vec<String> = stack_for(family).map(js_quote).collect();
        let _ = writeln!(
            out,
            "        {}: [{}],",
            js_quote(&tailwind_key(family)),
            stack.join(", ")
        );
    }
    out.push_str("      },\n");
    out.push_str("    },\n");
    out.push_str("  },\n");
    out.push_str("};\n");
    out
}

/// Stylesheet wrapped for CSS-in-JS libraries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssInJsSnippets {
    pub styled_components: String,
    pub emotion: String,
}

pub fn css_in_js_snippets(css: &str) -> CssInJsSnippets {
    let css = css.trim().replace('`', "\\`");

    let styled_components = format!(
        "import {{ createGlobalStyle }} from 'styled-components';\n\n\
         const GlobalFontStyle = createGlobalStyle`\n{css}\n`;\n"
    );

    let emotion = format!(
        "import {{ css, Global }} from '@emotion/react';\n\n\
         const globalFontStyles = css`\n{css}\n`;\n\n\
         const GlobalFontStyle = () => (\n  <Global styles={{globalFontStyles}} />\n);\n"
    );

    CssInJsSnippets {
        styled_components,
        emotion,
    }
}
