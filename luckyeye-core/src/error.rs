//! Error types for luckyeye core.

use std::{error::Error, fmt, io};

/// Error type for luckyeye core operations.
///
/// These are engine or rule defects. A project that merely fails validation is reported through
/// [`crate::CheckResult::Fail`], never through this type.
#[derive(Debug)]
pub enum LuckyeyeError {
    /// An underlying I/O error.
    Io(io::Error),
    /// A JSON serialization error raised while rendering a report.
    Json(serde_json::Error),
    /// A rule added a check before opening any group.
    CheckOutsideGroup {
        /// Title of the orphaned check.
        title: String,
    },
    /// A check failed without explaining why.
    EmptyFailure {
        /// Group the check belongs to.
        group: String,
        /// Title of the offending check.
        title: String,
    },
    /// A catch-all error with a message.
    Other(String),
}

impl fmt::Display for LuckyeyeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Json(err) => write!(f, "json error: {err}"),
            Self::CheckOutsideGroup { title } => {
                write!(f, "check '{title}' was added before any group")
            }
            Self::EmptyFailure { group, title } => {
                write!(f, "check '{title}' in group '{group}' failed with an empty message")
            }
            Self::Other(message) => write!(f, "{message}"),
        }
    }
}

impl Error for LuckyeyeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for LuckyeyeError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for LuckyeyeError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Convenience result type for luckyeye core.
pub type Result<T> = std::result::Result<T, LuckyeyeError>;
