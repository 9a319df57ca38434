//! Error types for network operations.

use std::time::Duration;

/// Errors that can occur while fetching stylesheets or font files.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The URL could not be parsed or uses an unsupported scheme.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The stylesheet host is not in the allowed list.
    #[error("please provide a valid Google Fonts URL (host '{host}' is not allowed)")]
    DisallowedHost { host: String },

    /// The server answered with a non-success status.
    #[error("HTTP {status} fetching {url}")]
    Http { url: String, status: u16 },

    /// Connection or body transfer failed.
    #[error("failed to fetch {url}: {message}")]
    Network { url: String, message: String },

    /// The request did not complete in time.
    #[error("request to {url} timed out after {after:?}")]
    Timeout { url: String, after: Duration },

    /// The request was cancelled through the fetcher's token.
    #[error("request to {url} was cancelled")]
    Cancelled { url: String },

    /// The stylesheet references no WOFF2 files.
    #[error("no WOFF2 files found in the CSS")]
    NoAssets,

    /// One of the files in a batch download failed.
    #[error("failed to download font files")]
    Download(#[source] Box<FetchError>),

    /// Writing the zip archive failed.
    #[error("failed to build archive: {0}")]
    Archive(String),

    /// The HTTP client could not be constructed.
    #[error("failed to create HTTP client: {0}")]
    Client(String),
}

impl FetchError {
    /// True for errors caused by the supplied URL rather than the network
    pub fn is_input_error(&self) -> bool {
        matches!(self, FetchError::InvalidUrl(_) | FetchError::DisallowedHost { .. })
    }

    pub(crate) fn from_reqwest(url: &str, error: reqwest::Error, timeout: Duration) -> Self {
        if error.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
                after: timeout,
            }
        } else {
            FetchError::Network {
                url: url.to_string(),
                message: error.to_string(),
            }
        }
    }
}

impl From<zip::result::ZipError> for FetchError {
    fn from(error: zip::result::ZipError) -> Self {
        FetchError::Archive(error.to_string())
    }
}

impl From<std::io::Error> for FetchError {
    fn from(error: std::io::Error) -> Self {
        FetchError::Archive(error.to_string())
    }
}
