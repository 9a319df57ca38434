//! Self-host Google Fonts.
//!
//! A [`FontSession`] holds one [`FontRecord`] per font being processed.
//! [`process_font`] / [`process_all`] fetch and parse stylesheets into it;
//! the [`export`] functions turn populated records into local CSS, zip
//! archives of the WOFF2 files, and Tailwind / CSS-in-JS snippets.

pub mod config;
mod error;
pub mod export;
mod process;
mod record;
mod session;

pub use config::ResolvedConfig;
pub use error::{Error, ErrorKind};
pub use process::{fetch_and_parse, process_all, process_font};
pub use record::{
    Axis, DEFAULT_SAMPLE_TEXT, FontId, FontRecord, ParsedFont, PreviewStyle, VariableAxes,
};
pub use session::FontSession;

pub use localfont_css as css;
pub use localfont_fetch as fetch;
