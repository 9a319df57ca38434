//! User-facing error taxonomy
//!
//! Lower-level parse and fetch errors are folded into four categories, each
//! carrying the message shown to the user.

use localfont_css::ParseError;
use localfont_fetch::FetchError;

/// Error category, used to decide where a failure is surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or disallowed input (URL, setting value)
    Input,
    /// A fetch did not complete successfully
    Network,
    /// The stylesheet lacks required data
    Parse,
    /// Batch download or archive failure
    Download,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Input(String),

    #[error("{0}")]
    Network(String),

    #[error("{0}")]
    Parse(String),

    #[error("{0}")]
    Download(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Input(_) => ErrorKind::Input,
            Error::Network(_) => ErrorKind::Network,
            Error::Parse(_) => ErrorKind::Parse,
            Error::Download(_) => ErrorKind::Download,
        }
    }

    pub(crate) fn input(message: impl Into<String>) -> Self {
        Error::Input(message.into())
    }
}

impl From<ParseError> for Error {
    fn from(error: ParseError) -> Self {
        Error::Parse(error.to_string())
    }
}

impl From<FetchError> for Error {
    fn from(error: FetchError) -> Self {
        match error {
            e if e.is_input_error() => Error::Input(e.to_string()),
            e @ (FetchError::Download(_) | FetchError::NoAssets | FetchError::Archive(_)) => {
                Error::Download(e.to_string())
            }
            e => Error::Network(e.to_string()),
        }
    }
}
