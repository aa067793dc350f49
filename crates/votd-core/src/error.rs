use thiserror::Error;

/// Why a verse could not be loaded.
///
/// Every variant is shown to the user as the same "could not load verse"
/// line; [`VerseError::kind`] keeps them apart in the logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerseError {
    #[error("request to {source_name} failed: {message}")]
    Network {
        source_name: &'static str,
        message: String,
    },

    #[error("{source_name} responded with status {status}")]
    Status { source_name: &'static str, status: u16 },

    #[error("book \"{book}\" is not in the book code table")]
    Mapping { book: String },

    #[error("{source_name} response did not contain verse content")]
    PayloadMissing { source_name: &'static str },

    #[error("request to {source_name} timed out after {secs}s")]
    TimedOut { source_name: &'static str, secs: u64 },
}

impl VerseError {
    pub fn kind(&self) -> &'static str {
        match self {
            VerseError::Network { .. } | VerseError::Status { .. } => "network",
            VerseError::Mapping { .. } => "mapping",
            VerseError::PayloadMissing { .. } => "payload_missing",
            VerseError::TimedOut { .. } => "timed_out",
        }
    }

    /// Build a [`VerseError`] from a failed reqwest call.
    pub fn from_reqwest(source_name: &'static str, err: &reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return VerseError::Status {
                source_name,
                status: status.as_u16(),
            };
        }
        let message = if err.is_connect() {
            "could not connect".to_string()
        } else if err.is_decode() {
            "unexpected response format".to_string()
        } else {
            err.to_string()
        };
        VerseError::Network {
            source_name,
            message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShareError {
    #[error("sharing is not available on this system")]
    Unavailable,

    #[error("share was rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("clipboard write failed: {0}")]
pub struct ClipboardError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerseIdError {
    #[error("verse id \"{0}\" is not of the form BOOK.CHAPTER.VERSE")]
    Malformed(String),

    #[error("unknown book code \"{0}\"")]
    UnknownBook(String),

    #[error("chapter and verse must be positive integers without leading zeros")]
    BadNumber,
}
