// Shared error classification for every failure the storefront can surface

use serde::{Deserialize, Serialize};

// Closed set of failure kinds callers branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    // Backend unreachable, timed out or answered with an error status
    IoFailure,
    // Input rejected before any store call was made
    ValidationFailure,
    // Referenced record does not exist
    NotFound,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::IoFailure => write!(f, "io_failure"),
            ErrorKind::ValidationFailure => write!(f, "validation_failure"),
            ErrorKind::NotFound => write!(f, "not_found"),
        }
    }
}
