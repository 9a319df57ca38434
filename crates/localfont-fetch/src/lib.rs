//! Network side of localfont
//!
//! Fetches Google Fonts stylesheets and the WOFF2 files they reference.
//! Every request carries a timeout and observes a shared cancellation token;
//! batch downloads are all-or-nothing and end up in a single zip archive.

mod archive;
mod error;
mod fetcher;

pub use archive::{FontArchive, archive_entry_name, build_archive};
pub use error::FetchError;
pub use fetcher::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, FetchOptions, Fetcher, GOOGLE_FONTS_HOST};
pub use tokio_util::sync::CancellationToken;
